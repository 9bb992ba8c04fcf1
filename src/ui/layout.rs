//! Layout of the terminal tray.

use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// UI layout areas.
pub struct Layout {
    /// Indicator line (top).
    pub status_area: Rect,
    /// Menu area.
    pub main_area: Rect,
    /// Key hints (bottom).
    pub help_area: Rect,
}

impl Layout {
    /// Create a new layout from the terminal area.
    pub fn new(area: Rect) -> Self {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Indicator
                Constraint::Min(0),    // Menu
                Constraint::Length(1), // Help line
            ])
            .split(area);

        Self {
            status_area: chunks[0],
            main_area: chunks[1],
            help_area: chunks[2],
        }
    }
}
