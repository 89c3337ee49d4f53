//! vrfsyncd - per-VRF routing table synchronization daemon.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use vrfsyncd::config::SyncConfig;
use vrfsyncd::monitor::{run_monitor, spawn_monitor};
use vrfsyncd::publisher::Publisher;
use vrfsyncd::snapshot::RtDump;
use vrfsyncd::topology::TopologyGraph;
use vrfsyncd::update;
use vrfsyncd::updater::RouteTableUpdater;

/// Per-VRF routing table synchronization daemon
#[derive(Parser, Debug)]
#[command(name = "vrfsyncd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path of the route toolkit binary
    #[arg(long, default_value = "rt")]
    rt_path: String,

    /// Log filter when RUST_LOG is not set
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    info!("--- Starting vrfsyncd ---");
    info!(rt_path = %args.rt_path, "using route toolkit");

    let config = SyncConfig::new().with_rt_path(&args.rt_path);
    let graph = Arc::new(TopologyGraph::new());

    let (handle, rx) = update::channel();
    let updater = RouteTableUpdater::new(
        RtDump::new(&config),
        Publisher::new(Arc::clone(&graph)),
        rx,
    );
    let updater_task = tokio::spawn(updater.run());

    let monitor_task = match spawn_monitor(&config) {
        Ok((child, stdout)) => {
            let monitor_handle = handle.clone();
            let family = config.family;
            Some(tokio::spawn(async move {
                // the child dies with this task
                let _child = child;
                if let Err(e) = run_monitor(stdout, monitor_handle, family).await {
                    error!(error = %e, "route monitor terminated");
                }
            }))
        }
        Err(e) => {
            error!(error = %e, "failed to start route monitor, continuing without route events");
            None
        }
    };

    signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("received shutdown signal, exiting");

    if let Some(task) = monitor_task {
        task.abort();
    }
    updater_task.abort();
    drop(handle);

    info!("vrfsyncd shutdown complete");
    Ok(())
}

fn init_logging(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();
}
