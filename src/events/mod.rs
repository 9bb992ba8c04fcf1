//! Event handling for tokentray.
//!
//! Menu clicks and the refresh tick are merged into one bounded queue that
//! the coordinator consumes one event at a time.

mod menu;

pub use menu::{ClickSources, Menu, MenuAction, MenuBuilder, MenuEntry, MenuItem, build_menu};

use crate::state::{Source, Token};
use crate::storage::PersistedState;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

/// Events consumed by the coordinator.
#[derive(Debug, Clone)]
pub enum Event {
    /// A token menu item was clicked.
    TokenClicked(Token),
    /// A source menu item was clicked.
    SourceClicked(Source),
    /// Periodic refresh.
    Tick,
    /// Saved selection read at startup.
    StartupLoad(PersistedState),
    /// Quit was requested.
    Quit,
}

/// Configuration for the event loop.
#[derive(Debug, Clone)]
pub struct EventConfig {
    /// Interval between refresh ticks.
    pub tick_rate: Duration,
    /// Capacity of the merged event queue.
    pub buffer: usize,
    /// Turn Ctrl-C into [`Event::Quit`].
    pub handle_ctrl_c: bool,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_secs(5),
            buffer: 100,
            handle_ctrl_c: true,
        }
    }
}

impl EventConfig {
    /// Set the tick rate in milliseconds.
    pub fn with_tick_rate_ms(mut self, ms: u64) -> Self {
        self.tick_rate = Duration::from_millis(ms);
        self
    }

    /// Enable or disable Ctrl-C handling.
    pub fn with_ctrl_c(mut self, handle: bool) -> Self {
        self.handle_ctrl_c = handle;
        self
    }
}

/// Merges click queues and the tick into one bounded event queue.
pub struct EventLoop {
    /// Event sender.
    event_tx: mpsc::Sender<Event>,
    /// Event receiver.
    event_rx: mpsc::Receiver<Event>,
    /// Configuration.
    config: EventConfig,
}

impl EventLoop {
    /// Create a new event loop.
    pub fn new(config: EventConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(config.buffer.max(1));
        Self {
            event_tx,
            event_rx,
            config,
        }
    }

    /// Get a sender for injecting events.
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.event_tx.clone()
    }

    /// Start forwarding. The first tick fires one interval after start.
    pub fn start(self, clicks: ClickSources) -> (mpsc::Receiver<Event>, tokio::task::JoinHandle<()>) {
        let event_tx = self.event_tx;
        let tick_rate = self.config.tick_rate;
        let handle_ctrl_c = self.config.handle_ctrl_c;

        let handle = tokio::spawn(async move {
            let mut tick_interval = tokio::time::interval_at(Instant::now() + tick_rate, tick_rate);
            tick_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut clicks = clicks.into_stream();

            // One listener for the whole loop, so a Ctrl-C pressed while a
            // send is waiting is still seen.
            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);
            let mut ctrl_c_armed = handle_ctrl_c;

            loop {
                let event = tokio::select! {
                    _ = tick_interval.tick() => Event::Tick,
                    Some(event) = clicks.next() => event,
                    result = &mut ctrl_c, if ctrl_c_armed => {
                        if let Err(e) = result {
                            tracing::warn!(error = %e, "ctrl-c handler failed");
                            ctrl_c_armed = false;
                            continue;
                        }
                        ctrl_c.set(tokio::signal::ctrl_c());
                        Event::Quit
                    }
                };

                // waits while the coordinator is busy; events are never dropped
                if event_tx.send(event).await.is_err() {
                    break;
                }
            }

            tracing::debug!("event loop stopped");
        });

        (self.event_rx, handle)
    }
}
