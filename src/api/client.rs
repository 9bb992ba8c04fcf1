//! Price client over the CoinCap and Binance REST APIs.

use super::{DataConverter, HttpTransport};
use crate::error::FetchError;
use crate::state::{Source, Token};
use futures::future::join_all;
use std::sync::Arc;

/// CoinCap v2 base URL.
pub const COINCAP_API_URL: &str = "https://api.coincap.io/v2";

/// Binance base URL.
pub const BINANCE_API_URL: &str = "https://api.binance.com";

/// Quote asset used for Binance pairs.
pub const BINANCE_QUOTE_ASSET: &str = "USDT";

const HTTP_BAD_REQUEST: u16 = 400;

/// Provider base URLs.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub coincap: String,
    pub binance: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            coincap: COINCAP_API_URL.to_string(),
            binance: BINANCE_API_URL.to_string(),
        }
    }
}

/// Result of fetching one watched token.
#[derive(Debug, Clone)]
pub struct Quote {
    /// The token as it is in the watch set.
    pub token: Token,
    /// The refreshed token, or why there is none.
    pub result: Result<Token, FetchError>,
}

/// Stateless adapter from (token, source) to a priced token.
///
/// Every call makes exactly one request; retries are up to the caller.
#[derive(Clone)]
pub struct PriceClient {
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
}

impl PriceClient {
    /// Create a client for the public endpoints.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_endpoints(transport, Endpoints::default())
    }

    /// Create a client for custom endpoints.
    pub fn with_endpoints(transport: Arc<dyn HttpTransport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Refresh one token from the given source.
    ///
    /// An unset source uses the default provider.
    pub async fn fetch_one(&self, token: &Token, source: Option<Source>) -> Result<Token, FetchError> {
        match Source::resolve(source) {
            Source::CoinCap => self.fetch_coincap(token).await,
            Source::Binance => self.fetch_binance(token).await,
        }
    }

    /// Refresh every token concurrently.
    ///
    /// The output is in input order and a failed token does not affect the
    /// others.
    pub async fn fetch_all(&self, tokens: &[Token], source: Option<Source>) -> Vec<Quote> {
        let fetches = tokens.iter().map(|token| async move {
            Quote {
                token: token.clone(),
                result: self.fetch_one(token, source).await,
            }
        });

        join_all(fetches).await
    }

    /// Fetch the top `limit` assets from the catalog provider.
    pub async fn fetch_catalog(&self, limit: usize) -> Result<Vec<Token>, FetchError> {
        let url = format!("{}/assets?limit={}", self.endpoints.coincap, limit);
        let response = self.transport.get(&url).await?;

        if !response.is_success() {
            return Err(FetchError::ServerUnavailable {
                status: response.status,
            });
        }

        let tokens = DataConverter::assets(&response.body)?;
        tracing::debug!(count = tokens.len(), limit, "catalog fetched");
        Ok(tokens)
    }

    async fn fetch_coincap(&self, token: &Token) -> Result<Token, FetchError> {
        let url = format!("{}/assets/{}", self.endpoints.coincap, token.id);
        let response = self.transport.get(&url).await?;

        if !response.is_success() {
            return Err(FetchError::ServerUnavailable {
                status: response.status,
            });
        }

        DataConverter::asset(&response.body)
    }

    async fn fetch_binance(&self, token: &Token) -> Result<Token, FetchError> {
        let url = format!(
            "{}/api/v3/avgPrice?symbol={}{}",
            self.endpoints.binance,
            token.symbol.to_uppercase(),
            BINANCE_QUOTE_ASSET
        );
        let response = self.transport.get(&url).await?;

        // Binance answers unknown pairs with 400
        if response.status == HTTP_BAD_REQUEST {
            return Err(FetchError::TokenNotFound {
                token: token.clone(),
            });
        }
        if !response.is_success() {
            return Err(FetchError::ServerUnavailable {
                status: response.status,
            });
        }

        DataConverter::avg_price(token, &response.body)
    }
}
