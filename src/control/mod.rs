mod controller;
mod fallback;
mod requests;

pub use controller::{ControlError, DeviceController, HttpDeviceController};
