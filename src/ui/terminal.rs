//! Full-screen terminal stand-in for a system tray.
//!
//! The top line is the indicator, the rest is the menu. The terminal is
//! driven from a dedicated thread because crossterm input is blocking.

use super::keys::{KeyHandler, TrayCommand};
use super::tray::TraySurface;
use super::Ui;
use crate::error::{Error, Result};
use crate::events::{Menu, MenuAction, MenuEntry};

use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::watch;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const PAGE: isize = 10;

/// What the terminal shows.
#[derive(Debug, Default)]
pub struct TrayModel {
    /// Indicator text.
    pub title: String,
    /// When a non-blank text was last pushed.
    pub updated_at: Option<DateTime<Local>>,
    /// Installed menu.
    pub menu: Option<Menu>,
    /// Highlighted item, counted over clickable items.
    pub cursor: usize,
}

impl TrayModel {
    /// Number of clickable items.
    pub fn item_count(&self) -> usize {
        self.menu.as_ref().map(|m| m.items().count()).unwrap_or(0)
    }

    /// Move the highlight, clamped to the menu.
    pub fn move_cursor(&mut self, delta: isize) {
        let max = self.item_count().saturating_sub(1) as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, max.max(0)) as usize;
    }

    /// Index of the highlighted item among all entries, separators included.
    pub fn selected_entry_index(&self) -> Option<usize> {
        let menu = self.menu.as_ref()?;
        menu.entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| matches!(entry, MenuEntry::Item(_)))
            .nth(self.cursor)
            .map(|(index, _)| index)
    }

    /// Click the highlighted item.
    pub fn click_selected(&self) -> bool {
        self.menu
            .as_ref()
            .and_then(|menu| menu.items().nth(self.cursor))
            .map(|item| item.click())
            .unwrap_or(false)
    }

    /// Click the Quit item. Returns `false` when there is no menu yet.
    pub fn click_quit(&self) -> bool {
        self.menu
            .as_ref()
            .and_then(|menu| menu.item_for(&MenuAction::Quit))
            .map(|item| item.click())
            .unwrap_or(false)
    }

    /// Apply a key command. Returns `true` if quitting before the menu
    /// exists was requested.
    pub fn apply(&mut self, command: TrayCommand) -> bool {
        match command {
            TrayCommand::Up => self.move_cursor(-1),
            TrayCommand::Down => self.move_cursor(1),
            TrayCommand::PageUp => self.move_cursor(-PAGE),
            TrayCommand::PageDown => self.move_cursor(PAGE),
            TrayCommand::Top => self.cursor = 0,
            TrayCommand::Bottom => self.cursor = self.item_count().saturating_sub(1),
            TrayCommand::Click => {
                if !self.click_selected() {
                    tracing::debug!(cursor = self.cursor, "click dropped");
                }
            }
            TrayCommand::Quit => {
                if self.menu.is_none() {
                    return true;
                }
                self.click_quit();
            }
        }
        false
    }
}

fn lock(model: &Mutex<TrayModel>) -> MutexGuard<'_, TrayModel> {
    model.lock().unwrap_or_else(|e| e.into_inner())
}

/// Terminal-backed [`TraySurface`].
pub struct TerminalTray {
    model: Arc<Mutex<TrayModel>>,
    stop: Arc<AtomicBool>,
    quit_rx: watch::Receiver<bool>,
    thread: Mutex<Option<JoinHandle<Result<()>>>>,
}

impl TerminalTray {
    /// Take over the terminal and start drawing.
    pub fn start() -> Result<Self> {
        enable_raw_mode()?;
        let terminal = or_restore(enter_screen, restore_terminal)?;

        let model = Arc::new(Mutex::new(TrayModel::default()));
        let stop = Arc::new(AtomicBool::new(false));
        let (quit_tx, quit_rx) = watch::channel(false);

        let thread = or_restore(
            || {
                std::thread::Builder::new()
                    .name("tray-ui".into())
                    .spawn({
                        let model = model.clone();
                        let stop = stop.clone();
                        move || run_ui(terminal, model, stop, quit_tx)
                    })
                    .map_err(|e| Error::terminal(format!("failed to start UI thread: {e}")))
            },
            restore_terminal,
        )?;

        Ok(Self {
            model,
            stop,
            quit_rx,
            thread: Mutex::new(Some(thread)),
        })
    }

    /// Flips to `true` when the user quits before the menu is installed, or
    /// when the UI thread ends.
    pub fn quit_signal(&self) -> watch::Receiver<bool> {
        self.quit_rx.clone()
    }

    /// Stop drawing and give the terminal back.
    pub fn shutdown(&self) -> Result<()> {
        self.stop.store(true, Ordering::Release);
        let thread = self
            .thread
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        match thread {
            Some(thread) => thread
                .join()
                .map_err(|_| Error::terminal("UI thread panicked"))?,
            None => Ok(()),
        }
    }
}

impl TraySurface for TerminalTray {
    fn set_display_text(&self, text: &str) {
        let mut model = lock(&self.model);
        model.title = text.to_string();
        if !text.is_empty() {
            model.updated_at = Some(Local::now());
        }
    }

    fn install_menu(&self, menu: Menu) {
        let mut model = lock(&self.model);
        model.menu = Some(menu);
        model.cursor = 0;
    }
}

impl Drop for TerminalTray {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::error!(error = %e, "terminal shutdown failed");
        }
    }
}

fn enter_screen() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Run a setup step, giving the terminal back if it fails.
fn or_restore<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    setup().inspect_err(|e| {
        tracing::error!(error = %e, "terminal setup failed");
        restore();
    })
}

fn run_ui(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    model: Arc<Mutex<TrayModel>>,
    stop: Arc<AtomicBool>,
    quit_tx: watch::Sender<bool>,
) -> Result<()> {
    let result = ui_loop(&mut terminal, &model, &stop, &quit_tx);

    // Restore terminal state
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    // an early quit also covers the UI dying on its own
    quit_tx.send_replace(true);
    result
}

fn ui_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    model: &Mutex<TrayModel>,
    stop: &AtomicBool,
    quit_tx: &watch::Sender<bool>,
) -> Result<()> {
    while !stop.load(Ordering::Acquire) {
        {
            let model = lock(model);
            terminal.draw(|frame| Ui::render(frame, &model))?;
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        if let CrosstermEvent::Key(key) = event::read()? {
            if let Some(command) = KeyHandler::handle(key) {
                if lock(model).apply(command) {
                    quit_tx.send_replace(true);
                }
            }
        }
    }

    Ok(())
}
