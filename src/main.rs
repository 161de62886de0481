// dashkit - terminal dashboard widgets demo
//
// Wires the two example dashboards together:
// - Feed: a chat conversation driven by a scripted demo task (mpsc channel)
// - Gallery: 32 markdown items behind paginator controls
//
// Logs are captured in memory by a tracing layer so they never write
// through the alternate screen; the status bar shows the latest warning.

use anyhow::Result;
use clap::Parser;
use dashkit::cli::{self, Cli, Dashboard};
use dashkit::config::Config;
use dashkit::logging::{LogBuffer, TuiLogLayer};
use dashkit::tui::app::View;
use dashkit::{demo, tui};
use tokio::sync::{mpsc, oneshot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli::handle_cli(&cli) {
        return Ok(());
    }

    let mut config = Config::from_env();
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }

    // In-memory log capture; nothing may print to stdout once the TUI owns it
    let log_buffer = LogBuffer::new();
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(TuiLogLayer::new(log_buffer.clone()))
        .init();

    tracing::info!(version = dashkit::config::VERSION, "starting dashkit demo");

    let start = match cli.demo {
        Dashboard::Feed => View::Feed,
        Dashboard::Gallery => View::Gallery,
    };

    // Scripted demo events flow into the TUI over a channel; the oneshot
    // lets the TUI stop the script on quit
    let (event_tx, event_rx) = mpsc::channel(64);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let demo_task = tokio::spawn(demo::run_demo(event_tx, shutdown_rx));

    let result = tui::run_tui(event_rx, log_buffer, config, start).await;

    let _ = shutdown_tx.send(());
    demo_task.abort();

    result
}
