//! State management for tokentray.
//!
//! The store follows a unidirectional data flow: the coordinator turns
//! events into actions and applies them with [`Store::reduce`]. Nothing else
//! mutates the selection.

mod app_state;
mod selection;
mod token;

pub use app_state::AppState;
pub use selection::{SelectionSnapshot, SelectionStore, WatchSet};
pub use token::{Source, Token, UnknownSource};

use crate::storage::PersistedState;

/// Actions that can be applied to the store.
#[derive(Debug, Clone)]
pub enum Action {
    /// Add or remove a token from the watch set.
    ToggleToken(Token),
    /// Switch the active price source.
    SetSource(Source),
    /// Seed the selection from disk. Applied at most once.
    Restore(PersistedState),
    /// A refresh cycle pushed this title.
    TitleRendered(String),
    /// Leave the event loop.
    Quit,
}

/// What an applied action changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Nothing observable changed.
    None,
    /// Bookkeeping changed; the selection did not.
    App,
    /// Watch set or source changed and must be persisted.
    Selection,
}

/// The application store.
#[derive(Debug, Default)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Watched tokens and source.
    pub selection: SelectionStore,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an action to update state.
    pub fn reduce(&mut self, action: Action) -> Change {
        match action {
            Action::ToggleToken(token) => {
                self.selection.toggle(token);
                Change::Selection
            }
            Action::SetSource(source) => {
                self.selection.set_source(source);
                Change::Selection
            }
            Action::Restore(state) => {
                if self.app.startup_loaded {
                    tracing::warn!("persisted state already applied, ignoring");
                    return Change::None;
                }
                self.app.startup_loaded = true;
                self.selection.restore(state);
                Change::App
            }
            Action::TitleRendered(title) => {
                self.app.record_refresh(title);
                Change::App
            }
            Action::Quit => {
                self.app.should_quit = true;
                Change::App
            }
        }
    }
}
