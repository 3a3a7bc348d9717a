use std::sync::Arc;

use shared::protocol::{
    FormValues, GenerationBrief, GenerationEvent, GenerationResult, ProgressState,
};
use tokio::sync::broadcast;
use tracing::info;

pub mod analytics;
pub mod api_keys;
pub mod catalog;
pub mod error;
pub mod progress;
pub mod projects;
pub mod session;
pub mod settings;
pub mod simulator;
pub mod validation;
pub mod wizard;

pub use error::{
    ProjectError, SessionError, SettingsError, SimulatorError, StudioError, WizardError,
};
pub use progress::{ProgressMeter, ProgressSchedule};
pub use projects::{ProjectDraft, ProjectFilter, ProjectService, ProjectSort};
pub use session::{MemorySessionStore, ProfileDraft, SessionManager, SessionStore};
pub use settings::{load_settings, prepare_database_url, Settings};
pub use simulator::{
    placeholder_result, EventForwarder, GenerationListener, GenerationSimulator, SimulatorState,
};
pub use wizard::{
    SimulatedSubmit, SubmitHandler, WizardController, WizardState, WizardStep,
};

const STUDIO_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum StudioEvent {
    Submitted(GenerationBrief),
    SubmitRejected(String),
    Generation(GenerationEvent),
}

/// Rebroadcasts simulator callbacks to every studio subscriber.
struct BroadcastListener {
    events: broadcast::Sender<StudioEvent>,
}

impl GenerationListener for BroadcastListener {
    fn on_progress(&self, progress: ProgressState) {
        let _ = self
            .events
            .send(StudioEvent::Generation(GenerationEvent::Progress(progress)));
    }

    fn on_complete(&self, result: GenerationResult) {
        let _ = self
            .events
            .send(StudioEvent::Generation(GenerationEvent::Completed { result }));
    }

    fn on_cancel(&self) {
        let _ = self
            .events
            .send(StudioEvent::Generation(GenerationEvent::Cancelled));
    }
}

/// Wizard and progress simulator wired together: an accepted submission
/// hands over to a fresh simulated run.
pub struct ContentStudio {
    wizard: WizardController,
    simulator: GenerationSimulator,
    submit_handler: Arc<dyn SubmitHandler>,
    events: broadcast::Sender<StudioEvent>,
}

impl ContentStudio {
    pub fn new(
        schedule: ProgressSchedule,
        submit_handler: Arc<dyn SubmitHandler>,
    ) -> Result<Self, SimulatorError> {
        let (events, _) = broadcast::channel(STUDIO_EVENT_CAPACITY);
        Ok(Self {
            wizard: WizardController::new(),
            simulator: GenerationSimulator::new(schedule)?,
            submit_handler,
            events,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let schedule = settings.progress_schedule()?;
        let handler = Arc::new(SimulatedSubmit {
            delay: settings.submit_delay(),
        });
        Self::new(schedule, handler).map_err(|err| SettingsError::InvalidValue {
            key: "progress_tick_ms",
            reason: err.to_string(),
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StudioEvent> {
        self.events.subscribe()
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut WizardController {
        &mut self.wizard
    }

    pub fn simulator_state(&self) -> SimulatorState {
        self.simulator.state()
    }

    pub fn progress(&self) -> ProgressState {
        self.simulator.progress()
    }

    /// Submits the wizard and, once the handler accepts, starts the run.
    pub async fn submit(&mut self) -> Result<GenerationBrief, StudioError> {
        if let Err(err) = self.wizard.submit(self.submit_handler.as_ref()).await {
            if let WizardError::Rejected(reason) = &err {
                let _ = self.events.send(StudioEvent::SubmitRejected(reason.clone()));
            }
            return Err(err.into());
        }
        let brief = self
            .wizard
            .brief()
            .cloned()
            .ok_or(WizardError::NotSubmitting)?;
        let _ = self.events.send(StudioEvent::Submitted(brief.clone()));

        self.simulator.start(Arc::new(BroadcastListener {
            events: self.events.clone(),
        }))?;
        Ok(brief)
    }

    pub fn cancel(&mut self) -> bool {
        self.simulator.cancel()
    }

    /// Drops the current run silently and opens a blank wizard, keeping the
    /// previous form values when asked to.
    pub fn start_over(&mut self, keep_values: bool) {
        self.simulator.stop();
        let values = if keep_values {
            self.wizard.values().clone()
        } else {
            FormValues::default()
        };
        info!(keep_values, from = self.wizard.state().label(), "starting a new piece");
        self.wizard = WizardController::with_values(values);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
