//! `subsman-tui`: terminal dashboard for a SubsManager backend.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `subsman-core`'s store. Pages follow the dashboard route table and are
//! reachable with number keys (1-6) or by typing a path after `:`.
//!
//! Logs are written to a file (default `/tmp/subsman-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task forwards store
//! changes into the TUI action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use subsman_core::Dashboard;

use crate::app::App;

/// Terminal dashboard for managing proxy subscriptions and nodes.
#[derive(Parser, Debug)]
#[command(name = "subsman-tui", version, about)]
struct Cli {
    /// Backend URL (e.g., http://localhost:3355)
    #[arg(short = 'u', long, env = "SUBSMAN_URL")]
    url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "SUBSMAN_TIMEOUT")]
    timeout: Option<u64>,

    /// Log file path (defaults to /tmp/subsman-tui.log)
    #[arg(long, default_value = "/tmp/subsman-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may go to stdout/stderr while the
/// terminal is in raw mode. Hold the returned guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("subsman_tui={log_level},subsman_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("subsman-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    // Priority: flags (and their env vars) > config file > defaults
    let mut cfg = subsman_config::load_config_or_default();
    if let Some(url) = &cli.url {
        cfg.backend.url.clone_from(url);
    }
    if let Some(timeout) = cli.timeout {
        cfg.backend.timeout = timeout;
    }
    let client_config = cfg.client_config()?;

    info!(url = %client_config.url, "starting subsman-tui");

    let refresh = (cfg.tui.refresh_interval > 0)
        .then(|| Duration::from_secs(cfg.tui.refresh_interval));
    let dashboard = Dashboard::new(&client_config)?;
    let mut app = App::new(dashboard, cfg.defaults, refresh);
    app.run().await?;

    Ok(())
}
