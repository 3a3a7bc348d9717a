use super::*;
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

#[derive(Default)]
struct RecordingListener {
    progress: Mutex<Vec<ProgressState>>,
    completed: Mutex<Vec<GenerationResult>>,
    cancels: AtomicUsize,
}

impl RecordingListener {
    fn progress_len(&self) -> usize {
        self.progress.lock().expect("lock").len()
    }

    fn last_progress(&self) -> Option<ProgressState> {
        self.progress.lock().expect("lock").last().copied()
    }

    fn completions(&self) -> usize {
        self.completed.lock().expect("lock").len()
    }

    fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl GenerationListener for RecordingListener {
    fn on_progress(&self, progress: ProgressState) {
        self.progress.lock().expect("lock").push(progress);
    }

    fn on_complete(&self, result: GenerationResult) {
        self.completed.lock().expect("lock").push(result);
    }

    fn on_cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

fn started() -> (GenerationSimulator, Arc<RecordingListener>) {
    let mut simulator = GenerationSimulator::new(ProgressSchedule::default()).expect("schedule");
    let listener = Arc::new(RecordingListener::default());
    simulator
        .start(listener.clone() as Arc<dyn GenerationListener>)
        .expect("start");
    (simulator, listener)
}

async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn first_tick_reports_one_and_a_quarter_percent() {
    let (simulator, listener) = started();
    assert_eq!(simulator.progress().percent, 0.0);

    advance_ms(150).await;
    assert_eq!(listener.progress_len(), 1);
    let first = listener.last_progress().expect("one tick");
    assert!((first.percent - 1.25).abs() < 1e-9);
    assert_eq!(first.active_stage_index, 0);
    assert_eq!(simulator.progress(), first);
}

#[tokio::test(start_paused = true)]
async fn completes_only_after_settle_delay() {
    let (simulator, listener) = started();

    advance_ms(8050).await;
    assert_eq!(listener.progress_len(), 80);
    let last = listener.last_progress().expect("ticks");
    assert_eq!(last.percent, 100.0);
    assert_eq!(last.active_stage_index, 3);
    assert_eq!(listener.completions(), 0);
    assert!(simulator.is_running());

    advance_ms(900).await;
    assert_eq!(listener.completions(), 0);

    advance_ms(100).await;
    assert_eq!(listener.completions(), 1);
    assert_eq!(simulator.state(), SimulatorState::Completed);
    assert_eq!(listener.progress_len(), 80);

    let result = &listener.completed.lock().expect("lock")[0];
    assert_eq!(result.seo_score, 92);
    assert_eq!(result.word_count, 1847);
    assert_eq!(result.suggestions.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn progress_never_decreases() {
    let (_simulator, listener) = started();
    advance_ms(9500).await;

    let progress = listener.progress.lock().expect("lock");
    assert!(progress
        .windows(2)
        .all(|pair| pair[0].percent <= pair[1].percent
            && pair[0].active_stage_index <= pair[1].active_stage_index));
    assert!(progress.iter().all(|p| p.percent <= 100.0));
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_ticks_and_suppresses_completion() {
    let (mut simulator, listener) = started();
    advance_ms(2050).await;
    assert_eq!(listener.progress_len(), 20);

    assert!(simulator.cancel());
    assert_eq!(listener.cancels(), 1);
    assert_eq!(simulator.state(), SimulatorState::Cancelled);

    advance_ms(20_000).await;
    assert_eq!(listener.progress_len(), 20);
    assert_eq!(listener.completions(), 0);

    assert!(!simulator.cancel());
    assert_eq!(listener.cancels(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_during_settle_delay_suppresses_completion() {
    let (mut simulator, listener) = started();
    advance_ms(8500).await;
    assert_eq!(listener.last_progress().map(|p| p.percent), Some(100.0));

    assert!(simulator.cancel());
    advance_ms(5000).await;
    assert_eq!(listener.completions(), 0);
    assert_eq!(listener.cancels(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_after_completion_is_a_no_op() {
    let (mut simulator, listener) = started();
    advance_ms(9500).await;
    assert_eq!(listener.completions(), 1);

    assert!(!simulator.cancel());
    assert_eq!(listener.cancels(), 0);
    assert_eq!(simulator.state(), SimulatorState::Completed);
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent_and_silent() {
    let (mut simulator, listener) = started();
    advance_ms(550).await;

    simulator.stop();
    simulator.stop();
    assert_eq!(simulator.state(), SimulatorState::Idle);

    advance_ms(20_000).await;
    assert_eq!(listener.progress_len(), 5);
    assert_eq!(listener.completions(), 0);
    assert_eq!(listener.cancels(), 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_simulator_tears_down_the_timer() {
    let (simulator, listener) = started();
    advance_ms(350).await;
    drop(simulator);

    advance_ms(20_000).await;
    assert_eq!(listener.progress_len(), 3);
    assert_eq!(listener.completions(), 0);
}

#[tokio::test(start_paused = true)]
async fn restart_replaces_the_previous_run() {
    let (mut simulator, first) = started();
    let first_run = simulator.run_id().expect("run id");
    advance_ms(1050).await;

    let second = Arc::new(RecordingListener::default());
    simulator
        .start(second.clone() as Arc<dyn GenerationListener>)
        .expect("restart");
    assert_eq!(simulator.progress().percent, 0.0);
    assert_ne!(simulator.run_id(), Some(first_run));

    advance_ms(9500).await;
    assert_eq!(first.progress_len(), 10);
    assert_eq!(first.completions(), 0);
    assert_eq!(first.cancels(), 0);
    assert_eq!(second.progress_len(), 80);
    assert_eq!(second.completions(), 1);
}

#[tokio::test(start_paused = true)]
async fn forwarder_relays_events_in_order() {
    let mut simulator = GenerationSimulator::new(
        ProgressSchedule::from_millis(400, 100, 100).expect("schedule"),
    )
    .expect("simulator");
    let (forwarder, mut rx) = EventForwarder::channel();
    simulator.start(forwarder).expect("start");

    advance_ms(1000).await;
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert_eq!(events.len(), 5);
    assert!(matches!(events[0], GenerationEvent::Progress(p) if p.percent == 25.0));
    assert!(matches!(events[3], GenerationEvent::Progress(p) if p.is_complete()));
    assert!(matches!(&events[4], GenerationEvent::Completed { result } if result.seo_score == 92));
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_latest_progress() {
    let (simulator, _listener) = started();
    let mut rx = simulator.subscribe();

    advance_ms(4050).await;
    rx.changed().await.expect("progress changed");
    let seen = *rx.borrow_and_update();
    assert_eq!(seen.percent, 50.0);
    assert_eq!(seen.active_stage_index, 2);
}

#[test]
fn start_requires_a_runtime() {
    let mut simulator = GenerationSimulator::new(ProgressSchedule::default()).expect("schedule");
    let listener = Arc::new(RecordingListener::default());
    assert!(matches!(
        simulator.start(listener),
        Err(SimulatorError::NoRuntime)
    ));
    assert_eq!(simulator.state(), SimulatorState::Idle);
}

#[test]
fn rejects_invalid_schedule() {
    let schedule = ProgressSchedule {
        tick: Duration::ZERO,
        ..ProgressSchedule::default()
    };
    assert!(GenerationSimulator::new(schedule).is_err());
}
