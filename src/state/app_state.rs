//! Application-level state.

use chrono::{DateTime, Local};

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Last text pushed to the indicator.
    pub title: String,
    /// When the last refresh cycle finished.
    pub last_refresh: Option<DateTime<Local>>,
    /// Number of finished refresh cycles.
    pub refresh_count: u64,
    /// Number of tokens in the menu catalog.
    pub catalog_size: usize,
    /// Whether persisted state has been applied.
    pub startup_loaded: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl AppState {
    /// Record a finished refresh cycle.
    pub fn record_refresh(&mut self, title: String) {
        self.title = title;
        self.refresh_count += 1;
        self.last_refresh = Some(Local::now());
    }
}
