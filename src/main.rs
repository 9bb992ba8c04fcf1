//! tokentray - live crypto prices in a status indicator.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokentray::api::{PriceClient, ReqwestTransport};
use tokentray::storage::JsonFileStore;
use tokentray::ui::{LogTray, TerminalTray};
use tokentray::{App, AppContext, Config};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "tokentray", version)]
#[command(about = "Live cryptocurrency prices in a status indicator")]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "TOKENTRAY_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of tokens offered in the menu
    #[arg(long)]
    tokens_limit: Option<usize>,

    /// Blank the indicator briefly before every update
    #[arg(long)]
    blink: bool,

    /// Milliseconds between refreshes
    #[arg(long, value_name = "MS")]
    updates_delay: Option<u64>,

    /// File holding the selected tokens
    #[arg(long, value_name = "PATH")]
    file_name: Option<PathBuf>,

    /// Log prices instead of taking over the terminal
    #[arg(long)]
    headless: bool,

    /// Write the effective configuration and exit
    #[arg(long)]
    write_config: bool,
}

impl Args {
    /// Command line flags win over every other layer.
    fn apply(&self, config: &mut Config) {
        if let Some(limit) = self.tokens_limit {
            config.ticker.tokens_limit = limit;
        }
        if self.blink {
            config.ticker.blink_on_update = true;
        }
        if let Some(ms) = self.updates_delay {
            config.ticker.refresh_interval_ms = ms;
        }
        if let Some(path) = &self.file_name {
            config.storage.state_file = path.clone();
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tokentray: {e:#}");
            let code = e
                .downcast_ref::<tokentray::Error>()
                .map(tokentray::Error::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::load(args.config.clone()).context("failed to load configuration")?;
    args.apply(&mut config);

    if args.write_config {
        let path = config
            .save(args.config.clone())
            .context("failed to write configuration")?;
        println!("{}", path.display());
        return Ok(());
    }

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = init_logging(&config, args.headless)?;
    tracing::info!(
        state_file = %config.storage.path().display(),
        tokens_limit = config.ticker.tokens_limit,
        refresh_ms = config.ticker.refresh_interval_ms,
        "starting tokentray"
    );

    let client = PriceClient::new(Arc::new(ReqwestTransport::new()?));
    let store = Arc::new(JsonFileStore::new(config.storage.path()));

    if args.headless {
        let ctx = AppContext::new(config, client, Arc::new(LogTray::new()), store);
        App::new(ctx).run().await?;
        return Ok(());
    }

    let tray = Arc::new(TerminalTray::start().context("failed to start the terminal")?);
    let quit = tray.quit_signal();
    let ctx = AppContext::new(config, client, tray.clone(), store);
    let result = App::new(ctx).with_quit_signal(quit).run().await;

    // Restore the terminal before anything is printed
    tray.shutdown()?;
    result?;
    Ok(())
}

fn init_logging(config: &Config, headless: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter));

    if headless {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    }

    // The terminal front end owns stdout, so logs go to a file
    let dir = config.log.directory();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(&dir, "tokentray.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(Some(guard))
}
