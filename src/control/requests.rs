use crate::domain::{Action, Device};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ProjectorCommand<'a> {
    pub ip: &'a str,
    pub command: &'static str,
}

impl<'a> ProjectorCommand<'a> {
    pub fn new(device: &'a Device, action: Action) -> Self {
        let command = match action {
            Action::On => "power_on",
            Action::Off => "power_off",
        };
        ProjectorCommand { ip: &device.ip, command }
    }
}

#[derive(Debug, Serialize)]
pub struct PcControl<'a> {
    pub pc_id: &'a Value,
    pub ip: &'a str,
    pub action: &'static str,
}

impl<'a> PcControl<'a> {
    pub fn new(device: &'a Device, action: Action) -> Self {
        PcControl {
            pc_id: &device.raw_id,
            ip: &device.ip,
            action: action.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PcShutdown<'a> {
    pub ip: &'a str,
    pub name: &'a str,
    pub method: &'static str,
}

impl<'a> PcShutdown<'a> {
    pub fn wmi(device: &'a Device) -> Self {
        PcShutdown {
            ip: &device.ip,
            name: &device.name,
            method: "wmi",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ControlReply {
    #[serde(default)]
    pub success: bool,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ControlReply {
    /// Reason for an unsuccessful reply.
    pub fn reason(self) -> String {
        self.error.or(self.message).unwrap_or_else(|| "control failed".to_string())
    }
}
