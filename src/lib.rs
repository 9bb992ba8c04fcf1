//! # tokentray - live crypto prices in a status indicator
//!
//! Shows the prices of a user-chosen set of tokens in an always-visible
//! indicator and refreshes them periodically from CoinCap or Binance.
//!
//! ## Architecture
//!
//! - **API**: provider requests behind an HTTP transport trait
//! - **State**: the watched tokens and active source, changed only through actions
//! - **Storage**: the saved selection and its ordered writer
//! - **Events**: menu clicks and the refresh tick merged into one queue
//! - **Coordinator**: the single consumer of that queue
//! - **UI**: ticker text and the tray surfaces
//! - **Config**: layered configuration
//! - **App**: startup sequence and wiring

pub mod api;
pub mod app;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod state;
pub mod storage;
pub mod ui;

#[cfg(test)]
mod testing;

pub use app::{App, AppContext};
pub use config::Config;
pub use coordinator::{Coordinator, CoordinatorOptions};
pub use error::{Error, FetchError, Result};
