//! Ordered write-behind persistence.

use super::{PersistedState, StateStore};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// A snapshot stamped with the version of the change that produced it.
#[derive(Debug, Clone)]
pub struct PersistTicket {
    pub version: u64,
    pub state: PersistedState,
}

/// Serializes saves on a background task.
///
/// Every submitted snapshot gets the next version number. The task is the
/// only caller of [`StateStore::save`]; a backlog is collapsed to its newest
/// ticket and a ticket is never written after a newer one.
pub struct PersistWriter {
    tx: mpsc::UnboundedSender<PersistTicket>,
    next_version: u64,
    written_rx: watch::Receiver<u64>,
    handle: JoinHandle<()>,
}

impl PersistWriter {
    /// Start the writer task.
    pub fn spawn(store: Arc<dyn StateStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (written_tx, written_rx) = watch::channel(0);
        let handle = tokio::spawn(run(store, rx, written_tx));

        Self {
            tx,
            next_version: 0,
            written_rx,
            handle,
        }
    }

    /// Queue a snapshot for saving. Returns its version.
    pub fn submit(&mut self, state: PersistedState) -> u64 {
        self.next_version += 1;
        let ticket = PersistTicket {
            version: self.next_version,
            state,
        };
        if self.tx.send(ticket).is_err() {
            tracing::error!(version = self.next_version, "persistence task is gone, change not saved");
        }
        self.next_version
    }

    /// Version of the newest snapshot that reached the store.
    #[cfg(test)]
    pub fn written_version(&self) -> u64 {
        *self.written_rx.borrow()
    }

    /// Wait until `version` (or a newer one) has been written.
    ///
    /// Returns `false` if the writer stopped first.
    #[cfg(test)]
    pub async fn wait_for(&self, version: u64) -> bool {
        let mut rx = self.written_rx.clone();
        rx.wait_for(|written| *written >= version).await.is_ok()
    }

    /// Flush queued tickets and stop the task.
    pub async fn shutdown(self) -> u64 {
        let Self {
            tx,
            written_rx,
            handle,
            ..
        } = self;
        drop(tx);
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "persistence task failed");
        }
        *written_rx.borrow()
    }
}

async fn run(
    store: Arc<dyn StateStore>,
    mut rx: mpsc::UnboundedReceiver<PersistTicket>,
    written_tx: watch::Sender<u64>,
) {
    let mut last_written = 0u64;

    while let Some(mut ticket) = rx.recv().await {
        while let Ok(newer) = rx.try_recv() {
            if newer.version > ticket.version {
                ticket = newer;
            }
        }

        if ticket.version <= last_written {
            tracing::debug!(
                version = ticket.version,
                last_written,
                "dropping stale snapshot"
            );
            continue;
        }

        match store.save(&ticket.state).await {
            Ok(()) => {
                last_written = ticket.version;
                written_tx.send_replace(last_written);
            }
            Err(e) => {
                tracing::warn!(version = ticket.version, error = %e, "failed to save selection");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Token;
    use crate::testing::MemoryStore;
    use std::time::Duration;

    fn state_with(ids: &[&str]) -> PersistedState {
        PersistedState {
            tokens: ids
                .iter()
                .map(|id| Token::new(*id, id.to_uppercase(), *id))
                .collect(),
            source: String::new(),
        }
    }

    #[tokio::test]
    async fn test_versions_increase() {
        let store = Arc::new(MemoryStore::new());
        let mut writer = PersistWriter::spawn(store.clone());
        assert_eq!(writer.submit(state_with(&["a"])), 1);
        assert_eq!(writer.submit(state_with(&["a", "b"])), 2);
        assert!(writer.wait_for(2).await);
        assert_eq!(writer.written_version(), 2);
        assert_eq!(store.current(), Some(state_with(&["a", "b"])));
    }

    #[tokio::test]
    async fn test_last_writer_wins_with_slow_store() {
        let store = Arc::new(MemoryStore::with_delay(Duration::from_millis(20)));
        let mut writer = PersistWriter::spawn(store.clone());

        for n in 1..=5 {
            let ids: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
            let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            writer.submit(state_with(&refs));
        }

        let written = writer.shutdown().await;
        assert_eq!(written, 5);

        let saves = store.saves();
        assert_eq!(saves.last().unwrap().tokens.len(), 5);
        // writes never go backwards
        let lens: Vec<usize> = saves.iter().map(|s| s.tokens.len()).collect();
        let mut sorted = lens.clone();
        sorted.sort_unstable();
        assert_eq!(lens, sorted);
        // the backlog was collapsed
        assert!(saves.len() < 5);
    }

    #[tokio::test]
    async fn test_failed_save_is_not_fatal() {
        let store = Arc::new(MemoryStore::failing());
        let mut writer = PersistWriter::spawn(store.clone());
        writer.submit(state_with(&["a"]));
        assert_eq!(writer.shutdown().await, 0);
        assert!(store.saves().is_empty());
    }
}
