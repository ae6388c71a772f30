use crate::domain::{Device, DeviceType, NetworkStatus, PowerStatus};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Keys tried, in order, when a status field holds an object instead of a plain value.
const NESTED_STATUS_KEYS: [&str; 8] = ["status", "state", "value", "online", "connected", "power", "running", "active"];

/// One entry of an upstream device list. Every historical field name is kept so that
/// the mapping to [`Device`] happens in one place.
#[derive(Debug, Default, Deserialize)]
pub struct DeviceRecord {
    id: Option<Value>,
    name: Option<Value>,
    ip: Option<Value>,
    mac: Option<Value>,
    port: Option<Value>,
    network_status: Option<Value>,
    ping_status: Option<Value>,
    connection_status: Option<Value>,
    power_status: Option<Value>,
    status: Option<Value>,
    state: Option<Value>,
    power: Option<Value>,
}

impl DeviceRecord {
    fn into_device(self, r#type: DeviceType) -> Option<Device> {
        let raw_id = self.id?;
        let id = match &raw_id {
            Value::String(id) if !id.is_empty() => id.clone(),
            Value::Number(id) => id.to_string(),
            _ => return None,
        };

        let network_status = [&self.network_status, &self.ping_status, &self.connection_status]
            .into_iter()
            .find_map(|value| value.as_ref().and_then(status_token))
            .map_or(NetworkStatus::Offline, |token| NetworkStatus::from_token(&token));

        // PC lists historically report power in `status`, everything else in `power_status`
        let power_fields = match r#type {
            DeviceType::Pc => [&self.status, &self.power_status, &self.state, &self.power],
            _ => [&self.power_status, &self.status, &self.state, &self.power],
        };
        let power_status = power_fields
            .into_iter()
            .find_map(|value| value.as_ref().and_then(status_token))
            .map_or(PowerStatus::Unknown, |token| PowerStatus::from_token(&token));

        let port = self.port.as_ref().and_then(|port| match port {
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Value::String(s) => s.parse().ok(),
            _ => None,
        });

        Some(Device {
            id,
            raw_id,
            r#type,
            name: self.name.as_ref().and_then(scalar_text).unwrap_or_default(),
            ip: self.ip.as_ref().and_then(scalar_text).unwrap_or_default(),
            mac: self.mac.as_ref().and_then(scalar_text),
            port,
            network_status,
            power_status,
        })
    }
}

/// Maps any known list response for `r#type` to canonical devices. A response without a
/// recognizable list yields no devices.
pub fn normalize(body: &Value, r#type: DeviceType) -> Vec<Device> {
    let Some(items) = locate_list(body, r#type) else {
        warn!(device_type = %r#type, "⚠️ No {} list found in the response", r#type);
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let device = DeviceRecord::deserialize(item)
                .ok()
                .and_then(|record| record.into_device(r#type));
            if device.is_none() {
                warn!(device_type = %r#type, "⚠️ Skipping unreadable {} entry: {}", r#type, item);
            }
            device
        })
        .collect()
}

fn list_pointers(r#type: DeviceType) -> &'static [&'static str] {
    match r#type {
        DeviceType::Projector => &["/devices", "/data/devices", "/data/projectors", "/projectors"],
        DeviceType::Pc => &[
            "/pc_list",
            "/devices",
            "/data/devices",
            "/data/pcs",
            "/data/computers",
            "/pcs",
            "/computers",
        ],
        DeviceType::Pdu => &["/pdus", "/devices", "/data/devices", "/data/pdus"],
    }
}

fn locate_list(body: &Value, r#type: DeviceType) -> Option<&Vec<Value>> {
    if r#type == DeviceType::Pc {
        if let Some(items) = body.as_array() {
            return Some(items);
        }
    }

    list_pointers(r#type)
        .iter()
        .find_map(|pointer| body.pointer(pointer).and_then(Value::as_array))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn status_token(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => NESTED_STATUS_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(status_token)),
        Value::Null | Value::Array(_) => None,
    }
}
