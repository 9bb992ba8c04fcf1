//! Main application module.
//!
//! [`App`] wires the collaborators in an [`AppContext`] together and runs the
//! startup sequence followed by the event loop.

use crate::api::PriceClient;
use crate::config::Config;
use crate::coordinator::{Coordinator, CoordinatorOptions};
use crate::error::Result;
use crate::events::{Event, EventConfig, EventLoop, build_menu};
use crate::storage::{PersistWriter, StateStore, load_or_default};
use crate::ui::TraySurface;
use std::sync::Arc;
use tokio::sync::watch;

/// Everything the application needs, passed in explicitly.
pub struct AppContext {
    /// Effective configuration.
    pub config: Config,
    /// Price and catalog client.
    pub client: PriceClient,
    /// Indicator surface.
    pub tray: Arc<dyn TraySurface>,
    /// Selection storage.
    pub store: Arc<dyn StateStore>,
}

impl AppContext {
    /// Bundle the collaborators.
    pub fn new(
        config: Config,
        client: PriceClient,
        tray: Arc<dyn TraySurface>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            config,
            client,
            tray,
            store,
        }
    }
}

/// The main application.
pub struct App {
    ctx: AppContext,
    options: CoordinatorOptions,
    event_config: EventConfig,
    quit: Option<watch::Receiver<bool>>,
}

impl App {
    /// Create an application from its context.
    pub fn new(ctx: AppContext) -> Self {
        let options = ctx.config.coordinator_options();
        let event_config = EventConfig::default()
            .with_tick_rate_ms(ctx.config.ticker.refresh_interval().as_millis() as u64);

        Self {
            ctx,
            options,
            event_config,
            quit: None,
        }
    }

    /// Override the coordinator tunables.
    pub fn with_options(mut self, options: CoordinatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the event loop configuration.
    pub fn with_event_config(mut self, event_config: EventConfig) -> Self {
        self.event_config = event_config;
        self
    }

    /// Stop as soon as `signal` turns `true`, even before the menu exists.
    pub fn with_quit_signal(mut self, signal: watch::Receiver<bool>) -> Self {
        self.quit = Some(signal);
        self
    }

    /// Run until quit.
    ///
    /// Fails only when the catalog cannot be fetched.
    pub async fn run(self) -> Result<()> {
        let Self {
            ctx,
            options,
            event_config,
            mut quit,
        } = self;

        let writer = PersistWriter::spawn(ctx.store.clone());
        let mut coordinator = Coordinator::new(ctx.client, ctx.tray.clone(), writer, options);

        let startup = tokio::select! {
            loaded = async {
                tokio::join!(load_or_default(ctx.store.as_ref()), coordinator.load_catalog())
            } => Some(loaded),
            _ = quit_requested(quit.as_mut()) => None,
        };

        let Some((saved, catalog)) = startup else {
            tracing::info!("quit during startup");
            coordinator.shutdown().await;
            return Ok(());
        };

        let catalog = match catalog {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!(error = %e, "no catalog, giving up");
                coordinator.shutdown().await;
                return Err(e);
            }
        };

        // before the menu exists, so no click can race it
        coordinator.handle_event(Event::StartupLoad(saved)).await;

        let (menu, clicks) = build_menu(&catalog);
        ctx.tray.install_menu(menu);
        coordinator.refresh().await;

        let (events, handle) = EventLoop::new(event_config).start(clicks);
        tracing::info!("ticker running");

        let result = tokio::select! {
            result = coordinator.run(events) => result,
            _ = quit_requested(quit.as_mut()) => {
                tracing::info!("front end closed");
                Ok(())
            }
        };

        handle.abort();
        let written = coordinator.shutdown().await;
        tracing::info!(written, "shut down");

        result
    }
}

async fn quit_requested(signal: Option<&mut watch::Receiver<bool>>) {
    match signal {
        Some(rx) => {
            let _ = rx.wait_for(|quit| *quit).await;
        }
        None => std::future::pending().await,
    }
}
