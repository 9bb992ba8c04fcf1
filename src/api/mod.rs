//! Upstream price providers.
//!
//! This module turns provider HTTP responses into [`Token`](crate::state::Token)
//! values and classifies failures. The HTTP layer itself is behind the
//! [`HttpTransport`] trait.

mod client;
mod converter;
mod transport;

pub use client::{
    BINANCE_API_URL, BINANCE_QUOTE_ASSET, COINCAP_API_URL, Endpoints, PriceClient, Quote,
};
pub use converter::DataConverter;
pub use transport::{CONNECT_TIMEOUT, HttpResponse, HttpTransport, REQUEST_TIMEOUT, ReqwestTransport};

#[cfg(test)]
pub use transport::MockHttpTransport;
