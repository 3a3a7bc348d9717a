use super::*;
use anyhow::anyhow;

#[test]
fn session_errors_map_to_notification_codes() {
    let mut errors = ValidationErrors::new();
    errors.push("firstName", "First name is required");
    let api = ApiError::from(&SessionError::Invalid(errors));
    assert_eq!(api.code, ErrorCode::Validation);
    assert!(api.message.contains("firstName: First name is required"));

    let api = ApiError::from(&SessionError::NotSignedIn);
    assert_eq!(api.code, ErrorCode::Unauthorized);
    assert_eq!(api.message, "no user is signed in");

    let api = ApiError::from(&SessionError::Store(anyhow!("disk full")));
    assert_eq!(api.code, ErrorCode::Internal);
    assert!(api.message.contains("disk full"));
}

#[test]
fn project_errors_map_to_notification_codes() {
    let api = ApiError::from(&ProjectError::NotFound(42));
    assert_eq!(api.code, ErrorCode::NotFound);
    assert_eq!(api.message, "project 42 not found");

    let api = ApiError::from(&ProjectError::Invalid(ValidationErrors::new()));
    assert_eq!(api.code, ErrorCode::Validation);

    let api = ApiError::from(&ProjectError::Storage(anyhow!("locked")));
    assert_eq!(api.code, ErrorCode::Internal);
}
