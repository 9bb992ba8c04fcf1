//! JSON file backed state store.

use super::{PersistedState, StateStore};
use crate::error::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores the selection as one JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<PersistedState> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no saved selection yet");
                return Ok(PersistedState::default());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, state: &PersistedState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_vec(state)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, content).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), tokens = state.tokens.len(), "selection saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::state::Token;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_missing_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("selected-tokens.json"));
        let state = store.load().await.unwrap();
        assert_eq!(state, PersistedState::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("selected-tokens.json"));
        let state = PersistedState {
            tokens: vec![
                Token::new("bitcoin", "BTC", "Bitcoin")
                    .with_price(dec!(7791.7934691770748761))
                    .with_change(dec!(-1.4691508362430571)),
                Token::new("ethereum", "ETH", "Ethereum"),
            ],
            source: "binance".into(),
        };

        store.save(&state).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, state);
        assert!(loaded.tokens[0].same_values(&state.tokens[0]));
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_save_replaces_whole_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));
        let first = PersistedState {
            tokens: vec![Token::new("bitcoin", "BTC", "Bitcoin")],
            source: "binance".into(),
        };
        tokio_test::assert_ok!(store.save(&first).await);
        tokio_test::assert_ok!(store.save(&PersistedState::default()).await);

        assert_eq!(store.load().await.unwrap(), PersistedState::default());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load().await, Err(Error::Serialization(_))));
    }

    #[tokio::test]
    async fn test_reads_legacy_record_with_empty_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            br#"{"tokens":[{"id":"bitcoin","symbol":"BTC","name":"Bitcoin","priceUsd":"9.5","changePercent24Hr":"","comment":""}],"source":"binance"}"#,
        )
        .unwrap();

        let state = JsonFileStore::new(&path).load().await.unwrap();
        assert_eq!(state.tokens[0].price_usd, Some(dec!(9.5)));
        assert_eq!(state.tokens[0].change_percent_24h, None);
        assert_eq!(state.source, "binance");
    }
}
