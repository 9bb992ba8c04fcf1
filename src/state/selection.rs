//! Watched tokens and the active source.

use super::{Source, Token};
use crate::storage::PersistedState;

/// Ordered set of watched tokens. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSet {
    tokens: Vec<Token>,
}

impl WatchSet {
    /// Create an empty watch set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a watch set, keeping the first occurrence of every id.
    pub fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut set = Self::new();
        for token in tokens {
            if !set.contains(&token.id) {
                set.tokens.push(token);
            }
        }
        set
    }

    /// Check membership by id.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t.id == id)
    }

    /// Remove the token if present, append it otherwise.
    ///
    /// Returns `true` when the token was added.
    pub fn toggle(&mut self, token: Token) -> bool {
        match self.position(&token.id) {
            Some(index) => {
                self.tokens.remove(index);
                false
            }
            None => {
                self.tokens.push(token);
                true
            }
        }
    }

    /// Number of watched tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Watched tokens as a slice.
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Watched ids in display order.
    pub fn ids(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.id.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a WatchSet {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Point-in-time copy of the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub tokens: WatchSet,
    pub source: Option<Source>,
}

/// Authoritative in-memory selection: watched tokens plus active source.
///
/// Only the coordinator holds it mutably.
#[derive(Debug, Default)]
pub struct SelectionStore {
    watch: WatchSet,
    source: Option<Source>,
}

impl SelectionStore {
    /// Create an empty store with the source unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a token in the watch set.
    pub fn toggle(&mut self, token: Token) -> &WatchSet {
        let added = self.watch.toggle(token);
        tracing::debug!(added, watched = self.watch.len(), "watch set toggled");
        &self.watch
    }

    /// Replace the active source.
    pub fn set_source(&mut self, source: Source) -> Option<Source> {
        self.source = Some(source);
        self.source
    }

    /// Currently watched tokens.
    pub fn watch_set(&self) -> &WatchSet {
        &self.watch
    }

    /// Active source, `None` when unset.
    pub fn source(&self) -> Option<Source> {
        self.source
    }

    /// Copy the current selection.
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            tokens: self.watch.clone(),
            source: self.source,
        }
    }

    /// Replace the selection with persisted state.
    pub fn restore(&mut self, state: PersistedState) {
        self.source = Source::from_label(&state.source);
        self.watch = WatchSet::from_tokens(state.tokens);
    }

    /// Selection in its persisted form.
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            tokens: self.watch.as_slice().to_vec(),
            source: self.source.map(|s| s.label().to_string()).unwrap_or_default(),
        }
    }
}
