//! Indicator surfaces and ticker text.
//!
//! The ticker text is built by [`render_title`] and pushed to a
//! [`TraySurface`]. Two surfaces ship: a full-screen ratatui
//! [`TerminalTray`] and a [`LogTray`] for headless runs.

mod keys;
mod layout;
mod terminal;
mod ticker;
mod tray;
mod widgets;

pub use keys::{KeyHandler, TrayCommand};
pub use layout::Layout;
pub use terminal::{TerminalTray, TrayModel};
pub use ticker::{EMPTY_PROMPT, RenderFrame, render_title};
pub use tray::{LogTray, TraySurface};
pub use widgets::{HelpLine, MenuList, StatusBar};

use ratatui::Frame;

/// Terminal tray renderer.
pub struct Ui;

impl Ui {
    /// Render the whole tray screen.
    pub fn render(frame: &mut Frame, model: &TrayModel) {
        let layout = Layout::new(frame.area());

        StatusBar::render(frame, layout.status_area, model);
        MenuList::render(frame, layout.main_area, model);
        HelpLine::render(frame, layout.help_area);
    }
}
