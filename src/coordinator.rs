//! The single consumer of the event queue.
//!
//! Every event is handled to completion before the next one is taken, so a
//! refresh cycle always renders one snapshot of the selection and two cycles
//! never run at the same time.

use crate::api::PriceClient;
use crate::error::{Error, FetchError, Result};
use crate::events::Event;
use crate::state::{Action, Change, Store, Token};
use crate::storage::PersistWriter;
use crate::ui::{RenderFrame, TraySurface, render_title};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Internal tunables of the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Catalog fetch attempts before giving up.
    pub catalog_attempts: u32,
    /// Pause between catalog attempts.
    pub retry_delay: Duration,
    /// Blank the indicator briefly before each new text.
    pub blink: bool,
    /// How long the indicator stays blank.
    pub blink_duration: Duration,
    /// Size of the catalog.
    pub tokens_limit: usize,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            catalog_attempts: 10,
            retry_delay: Duration::from_secs(2),
            blink: false,
            blink_duration: Duration::from_millis(100),
            tokens_limit: 20,
        }
    }
}

/// Owns the selection and drives refresh cycles.
pub struct Coordinator {
    client: PriceClient,
    tray: Arc<dyn TraySurface>,
    writer: PersistWriter,
    store: Store,
    options: CoordinatorOptions,
}

impl Coordinator {
    /// Create a coordinator with an empty selection.
    pub fn new(
        client: PriceClient,
        tray: Arc<dyn TraySurface>,
        writer: PersistWriter,
        options: CoordinatorOptions,
    ) -> Self {
        Self {
            client,
            tray,
            writer,
            store: Store::new(),
            options,
        }
    }

    /// Current state.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Fetch the menu catalog, retrying on any failure.
    ///
    /// Every failed attempt is shown on the indicator. Running out of
    /// attempts is fatal.
    pub async fn load_catalog(&mut self) -> Result<Vec<Token>> {
        let attempts = self.options.catalog_attempts.max(1);
        let mut last: Option<FetchError> = None;

        for attempt in 1..=attempts {
            match self.client.fetch_catalog(self.options.tokens_limit).await {
                Ok(catalog) => {
                    tracing::info!(tokens = catalog.len(), attempt, "catalog loaded");
                    self.store.app.catalog_size = catalog.len();
                    return Ok(catalog);
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        attempts,
                        retryable = e.is_retryable(),
                        error = %e,
                        detail = %e.detail(),
                        "catalog fetch failed"
                    );
                    self.tray.set_display_text(&format!("tokentray: {e}"));
                    last = Some(e);
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.options.retry_delay).await;
            }
        }

        Err(Error::CatalogUnavailable {
            attempts,
            last: last.unwrap_or_else(|| FetchError::Connection("no attempt made".into())),
        })
    }

    /// Handle one event. Returns `false` once the loop should stop.
    pub async fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::TokenClicked(token) => {
                tracing::debug!(token = %token.id, "token clicked");
                self.apply(Action::ToggleToken(token)).await;
            }
            Event::SourceClicked(source) => {
                tracing::info!(%source, "source selected");
                self.apply(Action::SetSource(source)).await;
            }
            Event::Tick => {
                self.refresh().await;
            }
            Event::StartupLoad(state) => {
                self.store.reduce(Action::Restore(state));
            }
            Event::Quit => {
                tracing::info!("quit requested");
                self.store.reduce(Action::Quit);
            }
        }

        !self.store.app.should_quit
    }

    async fn apply(&mut self, action: Action) {
        if self.store.reduce(action) == Change::Selection {
            self.refresh().await;
            self.persist();
        }
    }

    /// Run one refresh cycle and return the pushed text.
    pub async fn refresh(&mut self) -> String {
        let snapshot = self.store.selection.snapshot();
        let quotes = self
            .client
            .fetch_all(snapshot.tokens.as_slice(), snapshot.source)
            .await;

        for quote in &quotes {
            if let Err(e) = &quote.result {
                tracing::debug!(token = %quote.token.id, error = %e, detail = %e.detail(), "fetch failed");
            }
        }

        let title = render_title(&RenderFrame {
            source: snapshot.source,
            quotes,
        });

        if self.options.blink {
            self.tray.set_display_text("");
            tokio::time::sleep(self.options.blink_duration).await;
        }
        self.tray.set_display_text(&title);

        self.store.reduce(Action::TitleRendered(title.clone()));
        title
    }

    fn persist(&mut self) -> u64 {
        let version = self.writer.submit(self.store.selection.to_persisted());
        tracing::trace!(version, "selection queued for saving");
        version
    }

    /// Consume events until `Quit` or until every sender is gone.
    pub async fn run(&mut self, mut events: mpsc::Receiver<Event>) -> Result<()> {
        while let Some(event) = events.recv().await {
            if !self.handle_event(event).await {
                return Ok(());
            }
        }

        tracing::debug!("event queue closed");
        Ok(())
    }

    /// Flush pending saves. Returns the last written version.
    pub async fn shutdown(self) -> u64 {
        self.writer.shutdown().await
    }
}
