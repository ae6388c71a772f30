use crate::app_config::AppConfig;
use crate::control::{DeviceController, HttpDeviceController};
use crate::domain::{Action, DeviceType};
use crate::inventory::{HttpInventory, Inventory};
use crate::sequencer::{RunError, Sequencer};
use crate::status::StatusBoard;
use crate::status_listener::{devices_refreshed, status_listener};
use clap::{Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::sync::Arc;
use tokio::task;
use tokio::time::timeout;
use tracing::{info, warn};

mod app_config;
mod control;
mod domain;
mod inventory;
mod sequencer;
mod status;
mod status_listener;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn the projectors on, wait for them to warm up, then start the PCs
    On,
    /// Shut the PCs down, wait for them to finish, then turn the projectors off
    Off,
    /// Print the projector, PC and PDU lists
    List,
    /// Turn a single projector or PC on or off
    Control {
        #[arg(value_enum)]
        kind: Kind,
        id: String,
        action: Action,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Projector,
    Pc,
}

impl From<Kind> for DeviceType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Projector => DeviceType::Projector,
            Kind::Pc => DeviceType::Pc,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
    let cli = Cli::parse();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = Arc::new(AppConfig::load()?);
    info!("✅  Loaded configuration");

    let client = inventory::new_client()?;
    let inventory = Arc::new(HttpInventory::new(client.clone(), config.api().url()));
    let controller = Arc::new(HttpDeviceController::new(client, config.clone()));

    match cli.command {
        Command::On => bulk(Action::On, inventory, controller, &config).await,
        Command::Off => bulk(Action::Off, inventory, controller, &config).await,
        Command::List => list(inventory.as_ref()).await,
        Command::Control { kind, id, action } => control_one(inventory.as_ref(), controller.as_ref(), kind.into(), &id, action).await,
    }
}

async fn bulk(action: Action, inventory: Arc<HttpInventory>, controller: Arc<HttpDeviceController>, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let status = StatusBoard::new(config.status().buffer_size());
    let refreshed_rx = status.subscribe();
    let listener_rx = status.subscribe();

    task::spawn(async move {
        status_listener(listener_rx).await;
    });
    info!("✅  Initialized status listener");

    let sequencer = Sequencer::new(inventory, controller, status, config.sequence().into());
    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    let result = sequencer.request_bulk_action(action)?.await?;
    info!("✅  Sequencer is {}", sequencer.status());

    match result {
        Ok(_) => {
            let grace = config.sequence().refresh_delay() + config.timeouts().control_api();
            if !matches!(timeout(grace, devices_refreshed(refreshed_rx)).await, Ok(true)) {
                warn!("⚠️ Device lists were not refreshed after the run");
            }
            Ok(())
        }
        Err(RunError::NoDevices) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn list(inventory: &dyn Inventory) -> Result<(), Box<dyn Error>> {
    let (projectors, pcs, pdus) = tokio::try_join!(
        inventory.devices(DeviceType::Projector),
        inventory.devices(DeviceType::Pc),
        inventory.devices(DeviceType::Pdu)
    )?;

    for device in projectors.iter().chain(&pcs).chain(&pdus) {
        println!(
            "{:<10} {:<8} {:<24} {:<16} {:<18} {:<5} {:<8} {:?}",
            device.r#type,
            device.id,
            device.name,
            device.ip,
            device.mac.as_deref().unwrap_or("-"),
            device.port.map_or_else(|| "-".to_string(), |port| port.to_string()),
            format!("{:?}", device.network_status),
            device.power_status
        );
    }

    Ok(())
}

async fn control_one(
    inventory: &dyn Inventory,
    controller: &dyn DeviceController,
    r#type: DeviceType,
    id: &str,
    action: Action,
) -> Result<(), Box<dyn Error>> {
    let device = inventory
        .devices(r#type)
        .await?
        .into_iter()
        .find(|device| device.id == id)
        .ok_or_else(|| format!("no {} with id '{}'", r#type, id))?;

    controller.control(&device, action).await?;
    info!(device_id = device.id, "✅ Turned {} {} '{}'", action, r#type, device.name);

    Ok(())
}
