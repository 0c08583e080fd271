// SPDX-License-Identifier: GPL-3.0-only

//! Volumes service - command-line host for the volume manager
//!
//! Connects to UDisks on the system bus and either streams device events
//! or runs a single request, printing results as JSON lines on stdout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use volumes_contracts::RequestId;
use volumes_service::{ServiceConfig, VolumeManager, VolumeRequest};
use volumes_types::{DeviceId, bytes_to_pretty};
use volumes_udisks::{StatvfsStats, UDisksBackend, current_user_groups};

mod output;

use output::StdoutHandler;

#[derive(Debug, Parser)]
#[command(name = "volumes-service", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "VOLUMES_SERVICE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Stream device_added / device_changed / device_removed events
    Monitor,
    /// List visible volumes
    List {
        /// Print a human-readable table instead of JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Mount the filesystem on a device
    Mount { device: String },
    /// Unmount the filesystem on a device
    Unmount { device: String },
    /// Unmount a device and eject its drive
    Eject { device: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ServiceConfig::load_or_default(cli.config.as_deref())?;

    // Initialize logging to stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting volumes service v{}", env!("CARGO_PKG_VERSION"));

    let groups = current_user_groups()?;
    tracing::debug!("Session groups: {:?}", groups);

    let backend = UDisksBackend::system().await?;
    let manager = VolumeManager::new(Arc::new(backend), Arc::new(StatvfsStats), groups, &config);

    let request = match cli.command {
        Command::Monitor => return monitor(&manager).await,
        Command::List { pretty: true } => return print_table(&manager).await,
        Command::List { pretty: false } => VolumeRequest::List,
        Command::Mount { device } => VolumeRequest::Mount(DeviceId::from(device)),
        Command::Unmount { device } => VolumeRequest::Unmount(DeviceId::from(device)),
        Command::Eject { device } => VolumeRequest::Eject(DeviceId::from(device)),
    };

    let handler = StdoutHandler::default();
    manager.handle(RequestId::new(), request, &handler).await;
    if handler.has_failed() {
        anyhow::bail!("Request failed");
    }
    Ok(())
}

async fn monitor(manager: &VolumeManager) -> Result<()> {
    let mut events = manager.subscribe();
    let mut task = manager.start_hotplug().await?;

    tracing::info!("Waiting for device events...");
    loop {
        tokio::select! {
            maybe_event = events.recv() => {
                let Some(event) = maybe_event else {
                    break;
                };
                output::print_event(&event)?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received shutdown signal");
                break;
            }
            result = &mut task => {
                if let Err(e) = result {
                    tracing::warn!("Hotplug task ended abnormally: {e}");
                }
                tracing::info!("Device signal stream closed, exiting");
                return Ok(());
            }
        }
    }

    task.abort();
    Ok(())
}

async fn print_table(manager: &VolumeManager) -> Result<()> {
    let volumes = manager.list_volumes().await?;

    for volume in volumes {
        let free = volume
            .free_size
            .map(|bytes| bytes_to_pretty(&bytes, false))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<20} {:>12} {:>12}  {}",
            volume.display_name,
            volume.mount_point.as_deref().unwrap_or("-"),
            bytes_to_pretty(&volume.total_size, false),
            free,
            volume.id
        );
    }
    Ok(())
}
