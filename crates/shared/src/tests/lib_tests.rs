use crate::{
    domain::{ContentType, ProjectStatus, Tone},
    error::{ApiError, ErrorCode, ValidationErrors},
    protocol::{
        stage_index_for, FormValues, GenerationEvent, GenerationStage, ProfileDetails,
        ProgressState, StageStatus, UserProfile, DEFAULT_LANGUAGE, DEFAULT_TIMEZONE,
    },
};

#[test]
fn content_type_uses_kebab_case_tags() {
    assert_eq!(
        serde_json::to_string(&ContentType::LandingPage).expect("serialize"),
        "\"landing-page\""
    );
    let parsed: ContentType =
        serde_json::from_str("\"product-description\"").expect("deserialize");
    assert_eq!(parsed, ContentType::ProductDescription);
}

#[test]
fn parses_choices_case_insensitively() {
    assert_eq!("Casual".parse::<Tone>().expect("tone"), Tone::Casual);
    assert_eq!(
        " paused ".parse::<ProjectStatus>().expect("status"),
        ProjectStatus::Paused
    );
    let err = "poetic".parse::<Tone>().expect_err("unknown tone");
    assert_eq!(err.to_string(), "unknown tone 'poetic'");
}

#[test]
fn form_values_default_matches_wizard_defaults() {
    let values = FormValues::default();
    assert_eq!(values.word_count, 1000);
    assert!(values.include_images);
    assert!(values.content_type.is_none());
}

#[test]
fn form_values_omit_empty_optional_lists() {
    let json = serde_json::to_value(FormValues::default()).expect("serialize");
    assert!(json.get("competitorUrls").is_none());
    assert_eq!(json["wordCount"], 1000);
}

#[test]
fn stage_index_is_floor_of_fraction_and_clamped() {
    assert_eq!(stage_index_for(0.0, 4), 0);
    assert_eq!(stage_index_for(24.9, 4), 0);
    assert_eq!(stage_index_for(25.0, 4), 1);
    assert_eq!(stage_index_for(99.9, 4), 3);
    assert_eq!(stage_index_for(100.0, 4), 3);
    assert_eq!(stage_index_for(150.0, 4), 3);
    assert_eq!(stage_index_for(-5.0, 4), 0);
}

#[test]
fn progress_state_reports_stage_statuses() {
    let progress = ProgressState::at_percent(60.0);
    assert_eq!(progress.active_stage(), GenerationStage::ContentGeneration);
    assert_eq!(
        progress.stage_status(GenerationStage::KeywordResearch),
        StageStatus::Completed
    );
    assert_eq!(
        progress.stage_status(GenerationStage::ContentGeneration),
        StageStatus::Active
    );
    assert_eq!(
        progress.stage_status(GenerationStage::SeoOptimization),
        StageStatus::Pending
    );
}

#[test]
fn progress_state_clamps_above_hundred() {
    let progress = ProgressState::at_percent(101.25);
    assert_eq!(progress.percent, 100.0);
    assert!(progress.is_complete());
    assert_eq!(progress.active_stage_index, GenerationStage::COUNT - 1);
}

#[test]
fn stage_metadata_is_ordered() {
    let ids: Vec<_> = GenerationStage::ALL.iter().map(|s| s.id()).collect();
    assert_eq!(
        ids,
        vec![
            "keyword-research",
            "competitor-analysis",
            "content-generation",
            "seo-optimization"
        ]
    );
    let total: u32 = GenerationStage::ALL.iter().map(|s| s.estimated_secs()).sum();
    assert_eq!(total, 100);
}

#[test]
fn generation_event_is_adjacently_tagged() {
    let json = serde_json::to_value(GenerationEvent::Cancelled).expect("serialize");
    assert_eq!(json["type"], "cancelled");
}

#[test]
fn validation_errors_look_up_first_message_per_field() {
    let mut errors = ValidationErrors::new();
    errors.push("keyword", "Keyword is required");
    errors.push("wordCount", "Minimum 300 words");
    assert_eq!(errors.message_for("keyword"), Some("Keyword is required"));
    assert!(!errors.has("tone"));

    let api: ApiError = errors.into();
    assert_eq!(api.code, ErrorCode::Validation);
    assert!(api.message.contains("wordCount: Minimum 300 words"));
}

#[test]
fn profiles_saved_without_details_get_defaults() {
    let blob = r#"{"id":1,"email":"a@example.com","name":"Ada Lovelace","subscription":"pro","created_at":"2024-01-01T00:00:00Z","last_login":"2024-01-01T00:00:00Z"}"#;
    let profile: UserProfile = serde_json::from_str(blob).expect("legacy profile");
    assert_eq!(profile.details.timezone, DEFAULT_TIMEZONE);
    assert_eq!(profile.details.language, DEFAULT_LANGUAGE);
    assert!(profile.details.company.is_none());
}

#[test]
fn display_name_splits_into_first_and_last() {
    let details = ProfileDetails::from_display_name("  Mary Ann  Evans ");
    assert_eq!(details.first_name, "Mary");
    assert_eq!(details.last_name, "Ann  Evans");

    let single = ProfileDetails::from_display_name("ops");
    assert_eq!(single.first_name, "ops");
    assert!(single.last_name.is_empty());
}
