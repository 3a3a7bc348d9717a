//! Three-step content wizard.
//!
//! The controller owns the form values while the user edits them and
//! freezes them into a [`GenerationBrief`] on submit. Once a submission is
//! accepted the wizard sits in [`WizardState::Generating`] for good; the
//! progress simulator takes over from there.

use std::time::Duration;

use async_trait::async_trait;
use shared::{
    error::{ApiError, ErrorCode, ValidationErrors},
    protocol::{FormValues, GenerationBrief},
};
use tracing::{debug, info, warn};

use crate::{error::WizardError, validation};

pub const TOTAL_STEPS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Target,
    StyleAndAudience,
    AdvancedOptions,
}

impl WizardStep {
    pub const ALL: [WizardStep; TOTAL_STEPS as usize] = [
        WizardStep::Target,
        WizardStep::StyleAndAudience,
        WizardStep::AdvancedOptions,
    ];

    pub const FIRST: WizardStep = WizardStep::Target;
    pub const LAST: WizardStep = WizardStep::AdvancedOptions;

    /// 1-based position.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Target => 1,
            WizardStep::StyleAndAudience => 2,
            WizardStep::AdvancedOptions => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(WizardStep::Target),
            2 => Some(WizardStep::StyleAndAudience),
            3 => Some(WizardStep::AdvancedOptions),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number().saturating_sub(1))
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Target => "Content Target & Keywords",
            WizardStep::StyleAndAudience => "Style & Audience",
            WizardStep::AdvancedOptions => "Advanced Options",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WizardStep::Target => {
                "Define your target keyword and location for optimal SEO results"
            }
            WizardStep::StyleAndAudience => {
                "Customize the tone and target audience for your content"
            }
            WizardStep::AdvancedOptions => {
                "Optional settings to enhance your content generation"
            }
        }
    }

    /// Rules for the fields rendered on this step.
    pub fn validate(self, values: &FormValues) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        match self {
            WizardStep::Target => {
                validation::validate_keyword(values, &mut errors);
                validation::validate_location(values, &mut errors);
                validation::validate_content_type(values, &mut errors);
                validation::validate_word_count(values, &mut errors);
            }
            WizardStep::StyleAndAudience => {
                validation::validate_tone(values, &mut errors);
                validation::validate_target_audience(values, &mut errors);
            }
            WizardStep::AdvancedOptions => {
                validation::validate_competitor_urls(values, &mut errors);
            }
        }
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Editing(WizardStep),
    /// Values are frozen and the host's submit handler is running.
    Submitting,
    Generating,
}

impl WizardState {
    pub fn label(self) -> &'static str {
        match self {
            WizardState::Editing(_) => "editing",
            WizardState::Submitting => "submitting",
            WizardState::Generating => "generating",
        }
    }
}

/// Host-supplied hook that starts the real work for a frozen brief.
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    async fn submit(&self, brief: &GenerationBrief) -> anyhow::Result<()>;
}

/// Stand-in handler that accepts every brief after a fixed pause.
pub struct SimulatedSubmit {
    pub delay: Duration,
}

#[async_trait]
impl SubmitHandler for SimulatedSubmit {
    async fn submit(&self, brief: &GenerationBrief) -> anyhow::Result<()> {
        debug!(keyword = %brief.keyword, delay_ms = self.delay.as_millis() as u64, "simulating submit");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct WizardController {
    state: WizardState,
    values: FormValues,
    errors: ValidationErrors,
    notification: Option<ApiError>,
    brief: Option<GenerationBrief>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self::with_values(FormValues::default())
    }

    pub fn with_values(values: FormValues) -> Self {
        Self {
            state: WizardState::Editing(WizardStep::FIRST),
            values,
            errors: ValidationErrors::new(),
            notification: None,
            brief: None,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    /// Step the user is on. Submitting and generating report the last step,
    /// since that is where a rejected submission lands.
    pub fn current_step(&self) -> WizardStep {
        match self.state {
            WizardState::Editing(step) => step,
            WizardState::Submitting | WizardState::Generating => WizardStep::LAST,
        }
    }

    pub fn step_number(&self) -> u8 {
        self.current_step().number()
    }

    pub fn total_steps(&self) -> u8 {
        TOTAL_STEPS
    }

    /// Fraction of the wizard reached, for the header progress bar.
    pub fn completion(&self) -> f32 {
        f32::from(self.step_number()) / f32::from(TOTAL_STEPS)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, WizardState::Editing(_))
    }

    pub fn is_generating(&self) -> bool {
        self.state == WizardState::Generating
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Mutable form access, available only while the values are not frozen.
    pub fn values_mut(&mut self) -> Option<&mut FormValues> {
        if self.is_editing() {
            Some(&mut self.values)
        } else {
            None
        }
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.message_for(field)
    }

    pub fn notification(&self) -> Option<&ApiError> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Brief frozen by the accepted submission.
    pub fn brief(&self) -> Option<&GenerationBrief> {
        self.brief.as_ref()
    }

    /// Moves forward one step without checking fields. Returns whether the
    /// step changed.
    pub fn next(&mut self) -> bool {
        let WizardState::Editing(step) = self.state else {
            return false;
        };
        match step.next() {
            Some(next) => {
                self.state = WizardState::Editing(next);
                debug!(step = next.number(), "wizard next");
                true
            }
            None => false,
        }
    }

    pub fn back(&mut self) -> bool {
        let WizardState::Editing(step) = self.state else {
            return false;
        };
        match step.previous() {
            Some(previous) => {
                self.state = WizardState::Editing(previous);
                debug!(step = previous.number(), "wizard back");
                true
            }
            None => false,
        }
    }

    /// Validates the current step's fields and moves forward only when they
    /// pass. Errors are kept for inline display.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.editing_step()?;
        let errors = step.validate(&self.values);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(WizardError::Invalid(errors));
        }
        self.errors = ValidationErrors::new();
        self.next();
        Ok(self.current_step())
    }

    /// Validates the whole form and freezes it. On success the wizard is
    /// `Submitting` and the caller must report the handler outcome through
    /// [`WizardController::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<GenerationBrief, WizardError> {
        let step = self.editing_step()?;
        let brief = match validation::freeze(&self.values) {
            Ok(brief) => brief,
            Err(errors) => {
                debug!(step = step.number(), errors = errors.len(), "submit blocked by validation");
                self.errors = errors.clone();
                return Err(WizardError::Invalid(errors));
            }
        };
        if step != WizardStep::LAST {
            return Err(WizardError::NotOnFinalStep {
                step: step.number(),
            });
        }

        self.errors = ValidationErrors::new();
        self.notification = None;
        self.state = WizardState::Submitting;
        info!(keyword = %brief.keyword, content_type = %brief.content_type, "wizard submitted");
        Ok(brief)
    }

    /// Applies the submit handler outcome. Acceptance is one-way into
    /// `Generating`; rejection returns to the last step with values intact
    /// and a notification for the user.
    pub fn finish_submit(
        &mut self,
        brief: GenerationBrief,
        outcome: Result<(), String>,
    ) -> Result<(), WizardError> {
        if self.state != WizardState::Submitting {
            return Err(WizardError::NotSubmitting);
        }
        match outcome {
            Ok(()) => {
                self.state = WizardState::Generating;
                self.brief = Some(brief);
                Ok(())
            }
            Err(reason) => {
                warn!(%reason, "submit handler rejected the brief");
                self.state = WizardState::Editing(WizardStep::LAST);
                self.notification = Some(ApiError::new(
                    ErrorCode::Internal,
                    "Generation failed. Please try again or contact support.",
                ));
                Err(WizardError::Rejected(reason))
            }
        }
    }

    pub async fn submit(&mut self, handler: &dyn SubmitHandler) -> Result<(), WizardError> {
        let brief = self.begin_submit()?;
        let outcome = handler
            .submit(&brief)
            .await
            .map_err(|err| format!("{err:#}"));
        self.finish_submit(brief, outcome)
    }

    fn editing_step(&self) -> Result<WizardStep, WizardError> {
        match self.state {
            WizardState::Editing(step) => Ok(step),
            other => Err(WizardError::Locked(other.label())),
        }
    }
}

#[cfg(test)]
#[path = "tests/wizard_tests.rs"]
mod tests;
