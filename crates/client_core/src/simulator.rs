//! Timer-driven stand-in for the generation backend.
//!
//! One simulator owns at most one ticking task. The run's phase lives behind
//! a mutex that every callback checks while holding it, so once `cancel` or
//! `stop` returns no further callback can fire for that run.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::protocol::{GenerationEvent, GenerationResult, ProgressState};
use tokio::{
    runtime::Handle,
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{interval_at, sleep, Instant, MissedTickBehavior},
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::SimulatorError,
    progress::{ProgressMeter, ProgressSchedule},
};

/// Host callbacks for a run. They are invoked from the runtime's worker
/// while the run lock is held and must not call back into the simulator.
pub trait GenerationListener: Send + Sync + 'static {
    fn on_progress(&self, _progress: ProgressState) {}
    fn on_complete(&self, result: GenerationResult);
    fn on_cancel(&self) {}
}

/// Relays callbacks as [`GenerationEvent`]s, for hosts that poll a queue.
pub struct EventForwarder {
    tx: mpsc::UnboundedSender<GenerationEvent>,
}

impl EventForwarder {
    pub fn new(tx: mpsc::UnboundedSender<GenerationEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Arc<Self>, mpsc::UnboundedReceiver<GenerationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self::new(tx)), rx)
    }
}

impl GenerationListener for EventForwarder {
    fn on_progress(&self, progress: ProgressState) {
        let _ = self.tx.send(GenerationEvent::Progress(progress));
    }

    fn on_complete(&self, result: GenerationResult) {
        let _ = self.tx.send(GenerationEvent::Completed { result });
    }

    fn on_cancel(&self) {
        let _ = self.tx.send(GenerationEvent::Cancelled);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunPhase {
    Running,
    Completed,
    Cancelled,
}

struct ActiveRun {
    id: Uuid,
    phase: Arc<Mutex<RunPhase>>,
    task: JoinHandle<()>,
    listener: Arc<dyn GenerationListener>,
}

pub struct GenerationSimulator {
    schedule: ProgressSchedule,
    progress: Arc<watch::Sender<ProgressState>>,
    run: Option<ActiveRun>,
}

impl GenerationSimulator {
    pub fn new(schedule: ProgressSchedule) -> Result<Self, SimulatorError> {
        schedule.validate()?;
        let (progress, _) = watch::channel(ProgressState::default());
        Ok(Self {
            schedule,
            progress: Arc::new(progress),
            run: None,
        })
    }

    pub fn schedule(&self) -> &ProgressSchedule {
        &self.schedule
    }

    /// Starts a fresh run from 0%. Any run still in flight is torn down
    /// first without firing its callbacks.
    pub fn start(&mut self, listener: Arc<dyn GenerationListener>) -> Result<(), SimulatorError> {
        let handle = Handle::try_current().map_err(|_| SimulatorError::NoRuntime)?;
        self.stop();

        self.progress.send_replace(ProgressState::default());
        let id = Uuid::new_v4();
        let phase = Arc::new(Mutex::new(RunPhase::Running));
        let task = handle.spawn(drive(
            id,
            self.schedule,
            Arc::clone(&phase),
            Arc::clone(&listener),
            Arc::clone(&self.progress),
        ));
        info!(
            run_id = %id,
            total_ms = self.schedule.total.as_millis() as u64,
            tick_ms = self.schedule.tick.as_millis() as u64,
            "generation simulator started"
        );
        self.run = Some(ActiveRun {
            id,
            phase,
            task,
            listener,
        });
        Ok(())
    }

    /// Cancels the active run. Returns whether a running run was cancelled;
    /// only then is `on_cancel` invoked.
    pub fn cancel(&mut self) -> bool {
        let Some(run) = self.run.take() else {
            return false;
        };
        let cancelled = {
            let mut phase = lock(&run.phase);
            let was_running = *phase == RunPhase::Running;
            if was_running {
                *phase = RunPhase::Cancelled;
            }
            was_running
        };
        run.task.abort();

        if cancelled {
            info!(run_id = %run.id, percent = self.progress().percent, "generation cancelled");
            run.listener.on_cancel();
        }
        self.run = Some(run);
        cancelled
    }

    /// Tears the run down without callbacks. Safe to call repeatedly.
    pub fn stop(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        {
            let mut phase = lock(&run.phase);
            if *phase == RunPhase::Running {
                *phase = RunPhase::Cancelled;
            }
        }
        run.task.abort();
        debug!(run_id = %run.id, "generation simulator stopped");
    }

    pub fn state(&self) -> SimulatorState {
        match &self.run {
            None => SimulatorState::Idle,
            Some(run) => match *lock(&run.phase) {
                RunPhase::Running => SimulatorState::Running,
                RunPhase::Completed => SimulatorState::Completed,
                RunPhase::Cancelled => SimulatorState::Cancelled,
            },
        }
    }

    /// Identifier of the current or last run, for log correlation.
    pub fn run_id(&self) -> Option<Uuid> {
        self.run.as_ref().map(|run| run.id)
    }

    pub fn is_running(&self) -> bool {
        self.state() == SimulatorState::Running
    }

    pub fn progress(&self) -> ProgressState {
        *self.progress.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.progress.subscribe()
    }
}

impl Drop for GenerationSimulator {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn drive(
    run_id: Uuid,
    schedule: ProgressSchedule,
    phase: Arc<Mutex<RunPhase>>,
    listener: Arc<dyn GenerationListener>,
    progress: Arc<watch::Sender<ProgressState>>,
) {
    let mut meter = ProgressMeter::new(&schedule);
    let mut ticker = interval_at(Instant::now() + schedule.tick, schedule.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let state = meter.tick();
        {
            let phase = lock(&phase);
            if *phase != RunPhase::Running {
                return;
            }
            progress.send_replace(state);
            listener.on_progress(state);
        }
        if state.is_complete() {
            break;
        }
    }
    debug!(%run_id, ticks = meter.ticks(), "progress reached 100%");

    sleep(schedule.settle).await;

    let mut phase = lock(&phase);
    if *phase != RunPhase::Running {
        return;
    }
    *phase = RunPhase::Completed;
    let result = placeholder_result();
    info!(%run_id, title = %result.title, seo_score = result.seo_score, "generation completed");
    listener.on_complete(result);
}

fn lock(phase: &Mutex<RunPhase>) -> MutexGuard<'_, RunPhase> {
    phase.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fixed article delivered at the end of every simulated run.
pub fn placeholder_result() -> GenerationResult {
    GenerationResult {
        title: "How to Build a Successful Content Marketing Strategy".to_string(),
        content: "# How to Build a Successful Content Marketing Strategy\n\n\
                  Content marketing has become one of the most reliable ways to reach \
                  an audience that is already searching for answers.\n\n\
                  ## Start With Keyword Research\n\n\
                  Map the questions your customers ask to the terms they type.\n\n\
                  ## Study What Already Ranks\n\n\
                  Look at the top results and find the gaps they leave open.\n\n\
                  ## Publish, Measure, Refine\n\n\
                  Track rankings and conversions, then update what underperforms."
            .to_string(),
        seo_score: 92,
        word_count: 1847,
        suggestions: vec![
            "Add more internal links".to_string(),
            "Include relevant images".to_string(),
            "Optimize meta description".to_string(),
        ],
    }
}

#[cfg(test)]
#[path = "tests/simulator_tests.rs"]
mod tests;
