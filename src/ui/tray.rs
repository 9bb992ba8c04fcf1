//! Indicator surfaces.

use crate::events::{Menu, MenuEntry};
use std::sync::Mutex;

/// Where the ticker text is shown and where menu clicks come from.
///
/// Implementations keep the installed [`Menu`] alive and call
/// [`MenuItem::click`](crate::events::MenuItem::click) when the user picks an
/// item.
pub trait TraySurface: Send + Sync {
    /// Replace the indicator text.
    fn set_display_text(&self, text: &str);

    /// Show the menu. Called once, after the catalog is loaded.
    fn install_menu(&self, menu: Menu);
}

/// Surface for headless runs: every change of the text goes to the log.
#[derive(Debug, Default)]
pub struct LogTray {
    last: Mutex<String>,
    menu: Mutex<Option<Menu>>,
}

impl LogTray {
    /// Create a new log surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text shown.
    pub fn text(&self) -> String {
        self.last
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}

impl TraySurface for LogTray {
    fn set_display_text(&self, text: &str) {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if *last != text {
            // blanking is a visual cue only, not worth a log line
            if !text.is_empty() {
                tracing::info!(target: "tokentray::ticker", "{text}");
            }
            *last = text.to_string();
        }
    }

    fn install_menu(&self, menu: Menu) {
        let labels: Vec<&str> = menu
            .entries()
            .iter()
            .map(|entry| match entry {
                MenuEntry::Item(item) => item.label.as_str(),
                MenuEntry::Separator => "|",
            })
            .collect();
        tracing::info!(items = %labels.join(" "), "menu installed (headless, Ctrl-C to quit)");

        *self.menu.lock().unwrap_or_else(|e| e.into_inner()) = Some(menu);
    }
}
