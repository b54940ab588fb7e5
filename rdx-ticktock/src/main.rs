use anyhow::{Context, Result};
use colored::Colorize;
use std::env;
use ticktock::prelude::*;
use ticktock::{APP_NAME, VERSION};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Prints the version banner unless `QUIET_MODE` is set.
fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    println!("{} v{}", APP_NAME.cyan().bold(), VERSION);
    println!("{}", "-".repeat(66).dimmed());
}

/// Logs the coordinator's lifecycle events at debug level.
fn spawn_event_listener(coordinator: &ClockCoordinator) {
    let mut event_rx = coordinator.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            debug!("[CLOCK] => {:?}", event);
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the clock output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    print_banner();

    let config = ClockConfig::load().context("failed to load clock configuration")?;
    let coordinator =
        ClockCoordinator::new(config).context("failed to set up the clock coordinator")?;
    spawn_event_listener(&coordinator);

    let summary = coordinator.run().await?;
    if !summary.updater_stopped_in_time() {
        info!("Updater was abandoned after the join timeout");
    }
    Ok(())
}
