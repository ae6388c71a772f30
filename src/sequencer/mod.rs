mod phases;
#[allow(clippy::module_inception)]
mod sequencer;

pub use sequencer::{RunError, Sequencer};
