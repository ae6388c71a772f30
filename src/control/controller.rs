use crate::app_config::AppConfig;
use crate::control::fallback::{FallbackError, first_success};
use crate::control::requests::{ControlReply, PcControl, PcShutdown, ProjectorCommand};
use crate::domain::{Action, Device, DeviceType};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[async_trait]
pub trait DeviceController: Debug + Send + Sync {
    async fn control(&self, device: &Device, action: Action) -> Result<(), ControlError>;
}

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("request failed with status {0}")]
    Status(StatusCode),
    #[error("{0}")]
    Rejected(String),
    #[error("{0} devices cannot be controlled")]
    Unsupported(DeviceType),
    #[error("every shutdown method failed: {0}")]
    Exhausted(#[from] FallbackError),
}

/// Ways of shutting down a PC, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShutdownMethod {
    LocalAgent,
    ControlApi,
    RemoteManagement,
}

pub const SHUTDOWN_METHODS: [ShutdownMethod; 3] = [ShutdownMethod::LocalAgent, ShutdownMethod::ControlApi, ShutdownMethod::RemoteManagement];

impl fmt::Display for ShutdownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownMethod::LocalAgent => write!(f, "local agent"),
            ShutdownMethod::ControlApi => write!(f, "control API"),
            ShutdownMethod::RemoteManagement => write!(f, "remote management"),
        }
    }
}

#[derive(Debug)]
pub struct HttpDeviceController {
    client: Client,
    config: Arc<AppConfig>,
}

impl HttpDeviceController {
    pub fn new(client: Client, config: Arc<AppConfig>) -> Self {
        HttpDeviceController { client, config }
    }

    async fn control_projector(&self, device: &Device, action: Action) -> Result<(), ControlError> {
        let url = format!("{}/api/projector/command", self.config.api().url());
        self.post_command(&url, &ProjectorCommand::new(device, action), self.config.timeouts().control_api())
            .await
    }

    async fn power_on_pc(&self, device: &Device) -> Result<(), ControlError> {
        let url = format!("{}/api/pc/control", self.config.api().url());
        self.post_command(&url, &PcControl::new(device, Action::On), self.config.timeouts().control_api())
            .await
    }

    async fn shut_down_pc(&self, device: &Device) -> Result<(), ControlError> {
        let method = first_success(SHUTDOWN_METHODS, |method| self.shut_down_with(device, method)).await?;
        info!(device_id = device.id, "🔴 Shut down PC '{}' through the {}", device.name, method);
        Ok(())
    }

    async fn shut_down_with(&self, device: &Device, method: ShutdownMethod) -> Result<ShutdownMethod, ControlError> {
        let timeouts = self.config.timeouts();
        match method {
            ShutdownMethod::LocalAgent => {
                let url = format!("http://{}:{}/shutdown", device.ip, self.config.local_agent().port());
                let response = self.client.post(url).json(&json!({})).timeout(timeouts.local_agent()).send().await?;
                if !response.status().is_success() {
                    return Err(ControlError::Status(response.status()));
                }
            }
            ShutdownMethod::ControlApi => {
                let url = format!("{}/api/pc/control", self.config.api().url());
                self.post_command(&url, &PcControl::new(device, Action::Off), timeouts.control_api())
                    .await?;
            }
            ShutdownMethod::RemoteManagement => {
                let url = format!("{}/api/pc/shutdown", self.config.api().url());
                self.post_command(&url, &PcShutdown::wmi(device), timeouts.remote_management())
                    .await?;
            }
        }
        Ok(method)
    }

    async fn post_command<B: Serialize + Sync>(&self, url: &str, body: &B, timeout: Duration) -> Result<(), ControlError> {
        let response = self.client.post(url).json(body).timeout(timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status_code = %status, "⚠️ Control request to {} failed. Response: {:?}", url, body);
            return Err(ControlError::Status(status));
        }

        let reply = response.json::<ControlReply>().await?;
        if reply.success { Ok(()) } else { Err(ControlError::Rejected(reply.reason())) }
    }
}

#[async_trait]
impl DeviceController for HttpDeviceController {
    #[instrument(skip_all, fields(device_id = device.id, device_type = %device.r#type, action = %action))]
    async fn control(&self, device: &Device, action: Action) -> Result<(), ControlError> {
        info!("🎯 Turn {} {} '{}'", action, device.r#type, device.name);

        match (device.r#type, action) {
            (DeviceType::Projector, action) => self.control_projector(device, action).await,
            (DeviceType::Pc, Action::On) => self.power_on_pc(device).await,
            (DeviceType::Pc, Action::Off) => self.shut_down_pc(device).await,
            (DeviceType::Pdu, _) => Err(ControlError::Unsupported(DeviceType::Pdu)),
        }
    }
}
