use serde_json::Value;
use std::fmt;

#[derive(Clone, PartialEq, Debug)]
pub struct Device {
    pub id: String,
    /// The id exactly as the inventory reported it, echoed back on control requests.
    pub raw_id: Value,
    pub r#type: DeviceType,
    pub name: String,
    pub ip: String,
    pub mac: Option<String>,
    pub port: Option<u16>,
    pub network_status: NetworkStatus,
    pub power_status: PowerStatus,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DeviceType {
    Projector,
    Pc,
    Pdu,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceType::Projector => "projector",
            DeviceType::Pc => "pc",
            DeviceType::Pdu => "pdu",
        };
        f.pad(name)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NetworkStatus {
    Online,
    Offline,
}

impl NetworkStatus {
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "online" | "1" | "true" | "connected" | "up" => NetworkStatus::Online,
            _ => NetworkStatus::Offline,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PowerStatus {
    On,
    Warming,
    Cooling,
    Starting,
    ShuttingDown,
    Rebooting,
    Off,
    Unknown,
}

impl PowerStatus {
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "on" | "online" | "true" | "1" | "running" | "active" | "up" => PowerStatus::On,
            "warming" => PowerStatus::Warming,
            "cooling" => PowerStatus::Cooling,
            "starting" | "booting" => PowerStatus::Starting,
            "shutting_down" | "shutdown" => PowerStatus::ShuttingDown,
            "rebooting" | "reboot" => PowerStatus::Rebooting,
            _ => PowerStatus::Off,
        }
    }
}
