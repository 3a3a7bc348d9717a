use std::time::Duration;

use shared::protocol::ProgressState;

use crate::error::SimulatorError;

pub const DEFAULT_TOTAL: Duration = Duration::from_millis(8000);
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(1000);

/// Timing of one simulated generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSchedule {
    pub total: Duration,
    pub tick: Duration,
    /// Pause between reaching 100% and delivering the result.
    pub settle: Duration,
}

impl Default for ProgressSchedule {
    fn default() -> Self {
        Self {
            total: DEFAULT_TOTAL,
            tick: DEFAULT_TICK,
            settle: DEFAULT_SETTLE,
        }
    }
}

impl ProgressSchedule {
    pub fn from_millis(total_ms: u64, tick_ms: u64, settle_ms: u64) -> Result<Self, SimulatorError> {
        let schedule = Self {
            total: Duration::from_millis(total_ms),
            tick: Duration::from_millis(tick_ms),
            settle: Duration::from_millis(settle_ms),
        };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<(), SimulatorError> {
        if self.tick.is_zero() {
            return Err(SimulatorError::InvalidSchedule(
                "tick interval must be greater than zero".to_string(),
            ));
        }
        if self.total < self.tick {
            return Err(SimulatorError::InvalidSchedule(format!(
                "total duration {}ms is shorter than one tick ({}ms)",
                self.total.as_millis(),
                self.tick.as_millis()
            )));
        }
        Ok(())
    }

    /// Percentage points added on every tick.
    pub fn increment_percent(&self) -> f64 {
        self.tick.as_nanos() as f64 * 100.0 / self.total.as_nanos() as f64
    }

    /// Ticks needed to reach 100%.
    pub fn tick_count(&self) -> u32 {
        if self.tick.is_zero() {
            return u32::MAX;
        }
        let count = self.total.as_nanos().div_ceil(self.tick.as_nanos());
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

/// Tick counter for a single run. Percent is derived from the tick count so
/// repeated float additions cannot drift past or short of 100.
#[derive(Debug, Clone)]
pub struct ProgressMeter {
    ticks: u32,
    tick_count: u32,
    tick_nanos: f64,
    total_nanos: f64,
    state: ProgressState,
}

impl ProgressMeter {
    pub fn new(schedule: &ProgressSchedule) -> Self {
        Self {
            ticks: 0,
            tick_count: schedule.tick_count(),
            tick_nanos: schedule.tick.as_nanos() as f64,
            total_nanos: schedule.total.as_nanos() as f64,
            state: ProgressState::default(),
        }
    }

    pub fn tick(&mut self) -> ProgressState {
        if !self.state.is_complete() {
            self.ticks += 1;
            let percent = if self.ticks >= self.tick_count {
                100.0
            } else {
                f64::from(self.ticks) * self.tick_nanos * 100.0 / self.total_nanos
            };
            self.state = ProgressState::at_percent(percent);
        }
        self.state
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }
}

#[cfg(test)]
#[path = "tests/progress_tests.rs"]
mod tests;
