//! Persistence of the watch list and active source.
//!
//! The on-disk record is read once at startup and fully replaced after
//! every selection change. Writes go through [`PersistWriter`] so they land
//! in the order the changes happened.

mod json_file;
mod writer;

pub use json_file::JsonFileStore;
pub use writer::{PersistTicket, PersistWriter};

use crate::error::Result;
use crate::state::Token;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Persisted selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    /// Watched tokens in display order.
    pub tokens: Vec<Token>,
    /// Source label, empty when unset.
    pub source: String,
}

/// Load/save capability for [`PersistedState`].
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the whole record. A missing record is an empty state.
    async fn load(&self) -> Result<PersistedState>;

    /// Replace the whole record.
    async fn save(&self, state: &PersistedState) -> Result<()>;
}

/// Load persisted state, treating any failure as an empty selection.
pub async fn load_or_default(store: &dyn StateStore) -> PersistedState {
    match store.load().await {
        Ok(state) => {
            tracing::info!(
                tokens = state.tokens.len(),
                source = %state.source,
                "loaded saved selection"
            );
            state
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not load saved selection, starting empty");
            PersistedState::default()
        }
    }
}
