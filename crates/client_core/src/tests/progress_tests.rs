use super::*;

#[test]
fn default_schedule_adds_one_and_a_quarter_percent_per_tick() {
    let schedule = ProgressSchedule::default();
    assert!((schedule.increment_percent() - 1.25).abs() < f64::EPSILON);
    assert_eq!(schedule.tick_count(), 80);
}

#[test]
fn meter_reaches_exactly_one_hundred_after_eighty_ticks() {
    let mut meter = ProgressMeter::new(&ProgressSchedule::default());
    let first = meter.tick();
    assert!((first.percent - 1.25).abs() < 1e-9);
    assert_eq!(first.active_stage_index, 0);

    let mut last = first;
    for _ in 1..80 {
        last = meter.tick();
    }
    assert_eq!(meter.ticks(), 80);
    assert_eq!(last.percent, 100.0);
    assert_eq!(last.active_stage_index, 3);
    assert!(last.is_complete());

    // Further ticks are inert once complete.
    assert_eq!(meter.tick().percent, 100.0);
    assert_eq!(meter.ticks(), 80);
}

#[test]
fn stage_index_follows_quarter_boundaries() {
    let mut meter = ProgressMeter::new(&ProgressSchedule::default());
    let mut seen = Vec::new();
    for _ in 0..80 {
        let state = meter.tick();
        seen.push((meter.ticks(), state.active_stage_index));
    }
    assert!(seen.contains(&(19, 0)));
    assert!(seen.contains(&(20, 1)));
    assert!(seen.contains(&(40, 2)));
    assert!(seen.contains(&(60, 3)));
    assert!(seen.windows(2).all(|pair| pair[0].1 <= pair[1].1));
}

#[test]
fn uneven_schedule_clamps_the_last_tick() {
    let schedule = ProgressSchedule::from_millis(1000, 300, 0).expect("valid");
    assert_eq!(schedule.tick_count(), 4);

    let mut meter = ProgressMeter::new(&schedule);
    for _ in 0..3 {
        assert!(!meter.tick().is_complete());
    }
    assert_eq!(meter.tick().percent, 100.0);
}

#[test]
fn rejects_degenerate_schedules() {
    assert!(matches!(
        ProgressSchedule::from_millis(8000, 0, 1000),
        Err(SimulatorError::InvalidSchedule(_))
    ));
    assert!(matches!(
        ProgressSchedule::from_millis(50, 100, 1000),
        Err(SimulatorError::InvalidSchedule(_))
    ));
}
