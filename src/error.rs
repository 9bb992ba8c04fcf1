//! Error types for the tokentray application.

use crate::state::Token;
use thiserror::Error;

/// The main error type for tokentray.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal front end errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The startup catalog could not be fetched; there is no usable menu.
    #[error("Catalog unavailable after {attempts} attempts: {last}")]
    CatalogUnavailable { attempts: u32, last: FetchError },

    /// Generic application error
    #[error("{0}")]
    Application(String),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new application error.
    pub fn application(msg: impl Into<String>) -> Self {
        Self::Application(msg.into())
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CatalogUnavailable { .. } => 2,
            Self::Config(_) => 78,
            _ => 1,
        }
    }
}

/// Failure classes of a single upstream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    ConnectionFailure,
    ServerUnavailable,
    TokenNotFound,
    ParseFailure,
}

/// Error of one price or catalog request.
///
/// The `Display` text is what ends up on the indicator next to the token
/// symbol, so it stays short. The details are kept for the logs.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// The request never produced a response (refused, timed out, reset).
    #[error("connection problem")]
    Connection(String),

    /// Non-success HTTP status.
    #[error("server is not available")]
    ServerUnavailable { status: u16 },

    /// The provider does not know the symbol. Carries the token as it was
    /// requested so it can still be displayed.
    #[error("token not found")]
    TokenNotFound { token: Token },

    /// The body could not be decoded.
    #[error("parsing problem")]
    Parse(String),
}

impl FetchError {
    /// Create a new parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// The failure class of this error.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Connection(_) => FetchErrorKind::ConnectionFailure,
            Self::ServerUnavailable { .. } => FetchErrorKind::ServerUnavailable,
            Self::TokenNotFound { .. } => FetchErrorKind::TokenNotFound,
            Self::Parse(_) => FetchErrorKind::ParseFailure,
        }
    }

    /// Check if the caller may retry the request as is.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::ServerUnavailable { .. }
        )
    }

    /// Longer description for logging.
    pub fn detail(&self) -> String {
        match self {
            Self::Connection(cause) => format!("connection problem: {cause}"),
            Self::ServerUnavailable { status } => format!("server returned HTTP {status}"),
            Self::TokenNotFound { token } => format!("token {} not found", token.symbol),
            Self::Parse(cause) => format!("parsing problem: {cause}"),
        }
    }
}

/// Failure below HTTP: DNS, connect, TLS, timeout or body read.
#[derive(Error, Debug, Clone)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        Self::Connection(err.0)
    }
}
