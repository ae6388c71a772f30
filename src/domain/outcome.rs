use crate::domain::action::Action;
use crate::domain::device::{Device, DeviceType};

#[derive(Clone, Debug)]
pub struct DeviceOutcome {
    pub device: Device,
    pub error: Option<String>,
}

impl DeviceOutcome {
    pub fn success(device: Device) -> Self {
        DeviceOutcome { device, error: None }
    }

    pub fn failure(device: Device, error: String) -> Self {
        DeviceOutcome { device, error: Some(error) }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-device outcomes of one bulk run, in the order the devices were attempted.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub action: Action,
    pub outcomes: Vec<DeviceOutcome>,
}

impl RunReport {
    pub fn new(action: Action) -> Self {
        RunReport { action, outcomes: Vec::new() }
    }

    pub fn succeeded(&self, r#type: DeviceType) -> usize {
        self.outcomes.iter().filter(|o| o.device.r#type == r#type && o.is_success()).count()
    }

    pub fn failed(&self, r#type: DeviceType) -> usize {
        self.outcomes.iter().filter(|o| o.device.r#type == r#type && !o.is_success()).count()
    }
}
