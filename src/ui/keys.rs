//! Key handling for the terminal tray.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the tray to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
    /// Click the highlighted item.
    Click,
    Quit,
}

/// Maps key events to tray commands.
pub struct KeyHandler;

impl KeyHandler {
    /// Handle a key event and return an optional command.
    pub fn handle(key: KeyEvent) -> Option<TrayCommand> {
        // Only process key press events
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(TrayCommand::Quit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(TrayCommand::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(TrayCommand::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(TrayCommand::Down),
            KeyCode::PageUp => Some(TrayCommand::PageUp),
            KeyCode::PageDown => Some(TrayCommand::PageDown),
            KeyCode::Home | KeyCode::Char('g') => Some(TrayCommand::Top),
            KeyCode::End | KeyCode::Char('G') => Some(TrayCommand::Bottom),
            KeyCode::Enter | KeyCode::Char(' ') => Some(TrayCommand::Click),
            _ => None,
        }
    }
}
