pub mod action;
pub mod device;
pub mod outcome;

pub use action::Action;
pub use device::{Device, DeviceType, NetworkStatus, PowerStatus};
pub use outcome::{DeviceOutcome, RunReport};
