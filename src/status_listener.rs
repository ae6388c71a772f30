use crate::status::StatusUpdate;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, instrument, warn};

/// Mirrors the status bar into the log until the board is dropped.
#[instrument(skip_all)]
pub async fn status_listener(mut rx: Receiver<StatusUpdate>) {
    loop {
        match rx.recv().await {
            Ok(update @ StatusUpdate::Countdown { remaining, .. }) => {
                if remaining.as_secs() % 10 == 0 {
                    info!("⏳ {}", update);
                } else {
                    debug!("⏳ {}", update);
                }
            }
            Ok(StatusUpdate::DevicesRefreshed { projectors, pcs }) => {
                for device in projectors.iter().chain(pcs.iter()) {
                    info!(
                        device_id = device.id,
                        "📋 {} '{}' ({}): network {:?}, power {:?}",
                        device.r#type,
                        device.name,
                        device.ip,
                        device.network_status,
                        device.power_status
                    );
                }
            }
            Ok(StatusUpdate::Message { text, display_for }) => match display_for {
                Some(display_for) => info!(display_secs = display_for.as_secs(), "📣 {}", text),
                None => info!("📣 {}", text),
            },
            Err(RecvError::Lagged(skipped)) => warn!("⚠️ Status listener skipped {} update(s)", skipped),
            Err(RecvError::Closed) => break,
        }
    }
}

/// Waits for the device lists that follow a completed run.
pub async fn devices_refreshed(mut rx: Receiver<StatusUpdate>) -> bool {
    loop {
        match rx.recv().await {
            Ok(StatusUpdate::DevicesRefreshed { .. }) => return true,
            Ok(_) | Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => return false,
        }
    }
}
