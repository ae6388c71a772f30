use crate::control::DeviceController;
use crate::domain::{Action, Device, DeviceOutcome};
use futures::stream::{FuturesUnordered, StreamExt};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// Controls the devices one at a time, waiting `spacing` between two consecutive calls.
/// A failing device does not stop the phase.
#[instrument(skip(controller, devices), fields(devices = devices.len()))]
pub async fn serial(controller: &dyn DeviceController, devices: Vec<Device>, action: Action, spacing: Duration) -> Vec<DeviceOutcome> {
    let total = devices.len();
    let mut outcomes = Vec::with_capacity(total);

    for (index, device) in devices.into_iter().enumerate() {
        if index > 0 {
            sleep(spacing).await;
        }
        outcomes.push(attempt(controller, device, action, index, total).await);
    }

    outcomes
}

/// Controls all devices at once and waits until every call has resolved.
#[instrument(skip(controller, devices), fields(devices = devices.len()))]
pub async fn concurrent(controller: &dyn DeviceController, devices: Vec<Device>, action: Action) -> Vec<DeviceOutcome> {
    let total = devices.len();

    FuturesUnordered::from_iter(
        devices
            .into_iter()
            .enumerate()
            .map(|(index, device)| attempt(controller, device, action, index, total)),
    )
    .collect()
    .await
}

async fn attempt(controller: &dyn DeviceController, device: Device, action: Action, index: usize, total: usize) -> DeviceOutcome {
    match controller.control(&device, action).await {
        Ok(()) => {
            info!(device_id = device.id, "✅ {} {}/{} turned {}: {}", device.r#type, index + 1, total, action, device.name);
            DeviceOutcome::success(device)
        }
        Err(error) => {
            warn!(device_id = device.id, "❌ Unable to turn {} {} '{}': {}", action, device.r#type, device.name, error);
            DeviceOutcome::failure(device, error.to_string())
        }
    }
}
