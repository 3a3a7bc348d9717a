use super::*;
use anyhow::anyhow;
use shared::domain::{ContentType, Tone};
use std::sync::{Arc, Mutex};

fn filled_values() -> FormValues {
    FormValues {
        keyword: "content marketing".to_string(),
        location: "GB".to_string(),
        content_type: Some(ContentType::Article),
        word_count: 1500,
        tone: Some(Tone::Conversational),
        include_images: false,
        target_audience: "Small business owners".to_string(),
        competitor_urls: Vec::new(),
        internal_links: Vec::new(),
    }
}

fn on_last_step(values: FormValues) -> WizardController {
    let mut wizard = WizardController::with_values(values);
    wizard.next();
    wizard.next();
    wizard
}

struct RecordingSubmit {
    fail_with: Option<String>,
    seen: Arc<Mutex<Vec<GenerationBrief>>>,
}

#[async_trait]
impl SubmitHandler for RecordingSubmit {
    async fn submit(&self, brief: &GenerationBrief) -> anyhow::Result<()> {
        self.seen.lock().expect("lock").push(brief.clone());
        match &self.fail_with {
            Some(reason) => Err(anyhow!(reason.clone())),
            None => Ok(()),
        }
    }
}

#[test]
fn starts_on_first_step_with_defaults() {
    let wizard = WizardController::new();
    assert_eq!(wizard.state(), WizardState::Editing(WizardStep::Target));
    assert_eq!(wizard.step_number(), 1);
    assert_eq!(wizard.total_steps(), 3);
    assert_eq!(wizard.values().word_count, 1000);
    assert!(wizard.values().include_images);
    assert!(wizard.errors().is_empty());
}

#[test]
fn next_and_back_stay_within_bounds() {
    let mut wizard = WizardController::new();
    assert!(!wizard.back());
    assert_eq!(wizard.step_number(), 1);

    assert!(wizard.next());
    assert!(wizard.next());
    assert!(!wizard.next());
    assert_eq!(wizard.current_step(), WizardStep::AdvancedOptions);

    assert!(wizard.back());
    assert_eq!(wizard.current_step(), WizardStep::StyleAndAudience);
}

#[test]
fn next_does_not_validate_but_advance_does() {
    let mut wizard = WizardController::new();
    let err = wizard.advance().expect_err("empty keyword");
    assert_eq!(
        err.validation_errors()
            .and_then(|errors| errors.message_for("keyword")),
        Some("Keyword is required")
    );
    assert_eq!(wizard.step_number(), 1);
    assert_eq!(wizard.error_for("keyword"), Some("Keyword is required"));

    assert!(wizard.next());
    assert_eq!(wizard.step_number(), 2);
}

#[test]
fn advance_clears_errors_once_fields_pass() {
    let mut wizard = WizardController::new();
    let _ = wizard.advance();
    assert!(!wizard.errors().is_empty());

    *wizard.values_mut().expect("editable") = filled_values();
    assert_eq!(wizard.advance().expect("valid"), WizardStep::StyleAndAudience);
    assert!(wizard.errors().is_empty());
}

#[test]
fn submit_with_short_word_count_stays_on_step() {
    let mut values = filled_values();
    values.word_count = 250;
    let mut wizard = on_last_step(values);

    let err = wizard.begin_submit().expect_err("too short");
    assert!(matches!(err, WizardError::Invalid(_)));
    assert_eq!(wizard.error_for("wordCount"), Some("Minimum 300 words"));
    assert_eq!(wizard.state(), WizardState::Editing(WizardStep::AdvancedOptions));
}

#[test]
fn submit_with_long_word_count_reports_maximum() {
    let mut values = filled_values();
    values.word_count = 5500;
    let mut wizard = on_last_step(values);

    assert!(wizard.begin_submit().is_err());
    assert_eq!(wizard.error_for("wordCount"), Some("Maximum 5000 words"));
}

#[test]
fn submit_before_final_step_is_refused() {
    let mut wizard = WizardController::with_values(filled_values());
    let err = wizard.begin_submit().expect_err("step one");
    assert!(matches!(err, WizardError::NotOnFinalStep { step: 1 }));
    assert!(wizard.is_editing());
}

#[test]
fn accepted_submit_enters_generating_for_good() {
    let mut wizard = on_last_step(filled_values());
    let brief = wizard.begin_submit().expect("valid");
    assert_eq!(wizard.state(), WizardState::Submitting);
    assert!(wizard.values_mut().is_none());

    wizard.finish_submit(brief, Ok(())).expect("accepted");
    assert!(wizard.is_generating());
    assert_eq!(wizard.brief().map(|b| b.keyword.as_str()), Some("content marketing"));

    assert!(!wizard.back());
    assert!(!wizard.next());
    assert!(matches!(wizard.advance(), Err(WizardError::Locked("generating"))));
    assert!(matches!(wizard.begin_submit(), Err(WizardError::Locked(_))));
    assert!(wizard.values_mut().is_none());
    assert!(wizard.is_generating());
}

#[test]
fn finish_without_begin_is_rejected() {
    let mut wizard = on_last_step(filled_values());
    let brief = validation::freeze(wizard.values()).expect("valid");
    assert!(matches!(
        wizard.finish_submit(brief, Ok(())),
        Err(WizardError::NotSubmitting)
    ));
}

#[tokio::test]
async fn rejected_submit_returns_to_last_step_with_values() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let handler = RecordingSubmit {
        fail_with: Some("quota exceeded".to_string()),
        seen: Arc::clone(&seen),
    };
    let mut wizard = on_last_step(filled_values());

    let err = wizard.submit(&handler).await.expect_err("rejected");
    assert!(matches!(err, WizardError::Rejected(reason) if reason == "quota exceeded"));
    assert_eq!(wizard.state(), WizardState::Editing(WizardStep::AdvancedOptions));
    assert_eq!(wizard.values().keyword, "content marketing");
    assert!(wizard.notification().is_some());
    assert_eq!(seen.lock().expect("lock").len(), 1);

    wizard.dismiss_notification();
    assert!(wizard.notification().is_none());
}

#[tokio::test]
async fn handler_receives_the_frozen_brief() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let handler = RecordingSubmit {
        fail_with: None,
        seen: Arc::clone(&seen),
    };
    let mut wizard = on_last_step(filled_values());

    wizard.submit(&handler).await.expect("accepted");
    let seen = seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].tone, Tone::Conversational);
    assert!(wizard.is_generating());
}

#[tokio::test(start_paused = true)]
async fn simulated_submit_waits_for_its_delay() {
    let handler = SimulatedSubmit {
        delay: Duration::from_millis(2000),
    };
    let mut wizard = on_last_step(filled_values());
    let started = tokio::time::Instant::now();

    wizard.submit(&handler).await.expect("accepted");
    assert!(started.elapsed() >= Duration::from_millis(2000));
    assert!(wizard.is_generating());
}

#[test]
fn step_metadata() {
    assert_eq!(WizardStep::ALL.len(), 3);
    assert_eq!(WizardStep::from_number(0), None);
    assert_eq!(WizardStep::from_number(4), None);
    assert_eq!(WizardStep::Target.title(), "Content Target & Keywords");
    assert_eq!(WizardStep::LAST.previous(), Some(WizardStep::StyleAndAudience));
    assert!(WizardStep::AdvancedOptions.validate(&FormValues::default()).is_empty());
}
