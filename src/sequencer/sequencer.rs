use crate::app_config;
use crate::control::DeviceController;
use crate::domain::{Action, DeviceType, RunReport};
use crate::inventory::{Inventory, InventoryError};
use crate::sequencer::phases;
use crate::status::{StatusBoard, StatusUpdate};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

pub type RunHandle = JoinHandle<Result<RunReport, RunError>>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SequencerState {
    Idle,
    Running(Action),
}

#[derive(Error, Debug, PartialEq)]
pub enum SequencerError {
    #[error("bulk power {0} is already in progress")]
    AlreadyRunning(Action),
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("unable to retrieve the devices: {0}")]
    Inventory(#[from] InventoryError),
    #[error("no devices to control")]
    NoDevices,
}

#[derive(Clone, Copy, Debug)]
pub struct SequenceTiming {
    pub projector_spacing: Duration,
    pub dwell: Duration,
    pub refresh_delay: Duration,
}

impl From<&app_config::Sequence> for SequenceTiming {
    fn from(sequence: &app_config::Sequence) -> Self {
        SequenceTiming {
            projector_spacing: sequence.projector_spacing(),
            dwell: sequence.dwell(),
            refresh_delay: sequence.refresh_delay(),
        }
    }
}

/// Runs bulk power transitions for the room, one at a time.
///
/// Powering on turns the projectors on one by one, waits for the lamps to warm up and then
/// starts every PC at once. Powering off shuts every PC down at once, waits for them to
/// finish and then turns the projectors off one by one. A device that fails to respond is
/// reported and skipped.
#[derive(Clone, Debug)]
pub struct Sequencer {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    inventory: Arc<dyn Inventory>,
    controller: Arc<dyn DeviceController>,
    status: StatusBoard,
    timing: SequenceTiming,
    state: Mutex<SequencerState>,
}

impl Sequencer {
    pub fn new(inventory: Arc<dyn Inventory>, controller: Arc<dyn DeviceController>, status: StatusBoard, timing: SequenceTiming) -> Self {
        Sequencer {
            inner: Arc::new(Inner {
                inventory,
                controller,
                status,
                timing,
                state: Mutex::new(SequencerState::Idle),
            }),
        }
    }

    pub fn status(&self) -> SequencerState {
        *self.inner.state()
    }

    /// Starts a bulk run in the background. Requests made while another run is in progress
    /// are rejected, not queued.
    pub fn request_bulk_action(&self, action: Action) -> Result<RunHandle, SequencerError> {
        let guard = RunGuard::acquire(&self.inner, action)?;
        let inner = self.inner.clone();

        Ok(tokio::spawn(async move {
            let _guard = guard;
            inner.run(action).await
        }))
    }
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, SequencerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[instrument(skip(self))]
    async fn run(self: Arc<Self>, action: Action) -> Result<RunReport, RunError> {
        let result = self.execute(action).await;

        match &result {
            Ok(report) => {
                info!(
                    projectors_failed = report.failed(DeviceType::Projector),
                    pcs_failed = report.failed(DeviceType::Pc),
                    "🏁 Bulk power {} complete, {} projector(s) and {} PC(s) succeeded",
                    report.action,
                    report.succeeded(DeviceType::Projector),
                    report.succeeded(DeviceType::Pc)
                );
                self.status.info(format!("Bulk power {} complete", action));
                self.schedule_refresh();
            }
            Err(RunError::NoDevices) => {
                warn!("⚠️ No devices to control");
                self.status.info("No devices to control");
            }
            Err(e) => {
                error!("❌ Bulk power {} failed: {}", action, e);
                self.status.error(format!("Bulk power {} failed: {}", action, e));
            }
        }

        result
    }

    async fn execute(&self, action: Action) -> Result<RunReport, RunError> {
        let (projectors, pcs) = tokio::try_join!(
            self.inventory.devices(DeviceType::Projector),
            self.inventory.devices(DeviceType::Pc)
        )?;

        let total = projectors.len() + pcs.len();
        if total == 0 {
            return Err(RunError::NoDevices);
        }

        info!("🚀 Bulk power {} for {} device(s)...", action, total);
        self.status.info(format!("Bulk power {}: {} device(s)", action, total));

        let controller = self.controller.as_ref();
        let timing = self.timing;
        let progress = format!("Bulk power {} in progress", action);
        let mut report = RunReport::new(action);

        match action {
            Action::On => {
                report.outcomes.extend(phases::serial(controller, projectors, action, timing.projector_spacing).await);
                self.status.countdown(timing.dwell, "Projector warm-up", &progress).await;
                report.outcomes.extend(phases::concurrent(controller, pcs, action).await);
            }
            Action::Off => {
                report.outcomes.extend(phases::concurrent(controller, pcs, action).await);
                self.status.countdown(timing.dwell, "Waiting for PCs to shut down", &progress).await;
                report.outcomes.extend(phases::serial(controller, projectors, action, timing.projector_spacing).await);
            }
        }

        Ok(report)
    }

    fn schedule_refresh(self: &Arc<Self>) {
        let inner = self.clone();
        tokio::spawn(async move {
            sleep(inner.timing.refresh_delay).await;

            let lists = tokio::try_join!(
                inner.inventory.devices(DeviceType::Projector),
                inner.inventory.devices(DeviceType::Pc)
            );
            match lists {
                Ok((projectors, pcs)) => inner.status.publish(StatusUpdate::DevicesRefreshed { projectors, pcs }),
                Err(e) => warn!("⚠️ Unable to refresh the device lists: {}", e),
            }
        });
    }
}

/// Marks the sequencer as running for as long as it lives, whatever way the run ends.
struct RunGuard {
    inner: Arc<Inner>,
    action: Action,
}

impl RunGuard {
    fn acquire(inner: &Arc<Inner>, action: Action) -> Result<Self, SequencerError> {
        let mut state = inner.state();
        let current_state = *state;

        if let SequencerState::Running(current) = current_state {
            drop(state);
            warn!("⚠️ Rejected bulk power {}, bulk power {} is in progress", action, current);
            inner.status.info(format!("Bulk power {} is in progress, please wait", current));
            return Err(SequencerError::AlreadyRunning(current));
        }

        *state = SequencerState::Running(action);
        info!("🔒 Bulk power {} started", action);
        Ok(RunGuard {
            inner: inner.clone(),
            action,
        })
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        *self.inner.state() = SequencerState::Idle;
        info!("🔓 Bulk power {} released", self.action);
    }
}

impl fmt::Display for SequencerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequencerState::Idle => write!(f, "idle"),
            SequencerState::Running(action) => write!(f, "running bulk power {}", action),
        }
    }
}
