//! `lanportal`: terminal front end for the LAN captive portal.
//!
//! Users log in or register, get the machine enrolled, and see whether they
//! are online. Admins grant or revoke internet access per user. Pages are
//! thin controllers over `lanportal-core`; every widget callback and router
//! notification becomes an [`Action`](action::Action) handled by the app loop.
//!
//! Logs go to a file so they never corrupt the terminal. The session and the
//! path to reopen survive restarts in the session file.

mod action;
mod app;
mod context;
mod event;
mod pages;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lanportal_config::FileStore;

use crate::app::App;

/// Terminal front end for the LAN captive portal.
#[derive(Parser, Debug)]
#[command(name = "lanportal", version, about)]
struct Cli {
    /// Backend API root (e.g., http://portal.lan/api)
    #[arg(short = 'u', long, env = "LANPORTAL_URL")]
    url: Option<String>,

    /// Config file (defaults to the platform config dir)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log file path (defaults to lanportal.log in the platform data dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing; anything on stdout/stderr would corrupt the TUI. Hold
/// the returned guard until exit so buffered lines get flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lanportal={log_level},lanportal_core={log_level},lanportal_api={log_level},lanportal_config={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| lanportal_config::log_dir().join("lanportal.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("lanportal.log"));

    let file_appender = tracing_appender::rolling::never(&log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let config = match &cli.config {
        Some(path) => lanportal_config::load_config_from(path)?,
        None => lanportal_config::load_config_or_default(),
    };
    let client = lanportal_config::build_client(&config, cli.url.as_deref())?;
    let store = FileStore::open(config.session_path());

    info!(
        api = %client.base_url(),
        session = %store.path().display(),
        "starting lanportal"
    );

    let mut app = App::new(client, Rc::new(store)).await?;
    app.run().await?;

    Ok(())
}
