use shared::error::{ApiError, ErrorCode, ValidationErrors};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("form has invalid fields: {0}")]
    Invalid(ValidationErrors),
    #[error("submit is only available on the final step (currently on step {step})")]
    NotOnFinalStep { step: u8 },
    #[error("wizard is not editable while {0}")]
    Locked(&'static str),
    #[error("no submission is in flight")]
    NotSubmitting,
    #[error("submit handler rejected the request: {0}")]
    Rejected(String),
}

impl WizardError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            WizardError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("form has invalid fields: {0}")]
    Invalid(ValidationErrors),
    #[error("no user is signed in")]
    NotSignedIn,
    #[error("session storage failed: {0}")]
    Store(#[from] anyhow::Error),
    #[error("failed to encode session profile: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("project form has invalid fields: {0}")]
    Invalid(ValidationErrors),
    #[error("project {0} not found")]
    NotFound(i64),
    #[error("project storage failed: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<&SessionError> for ApiError {
    fn from(err: &SessionError) -> Self {
        let code = match err {
            SessionError::Invalid(_) => ErrorCode::Validation,
            SessionError::NotSignedIn => ErrorCode::Unauthorized,
            SessionError::Store(_) | SessionError::Encode(_) => ErrorCode::Internal,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<&ProjectError> for ApiError {
    fn from(err: &ProjectError) -> Self {
        let code = match err {
            ProjectError::Invalid(_) => ErrorCode::Validation,
            ProjectError::NotFound(_) => ErrorCode::NotFound,
            ProjectError::Storage(_) => ErrorCode::Internal,
        };
        ApiError::new(code, err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("failed to prepare database location: {0}")]
    Database(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("invalid progress schedule: {0}")]
    InvalidSchedule(String),
    #[error("no tokio runtime is available to drive the simulator")]
    NoRuntime,
}

#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Simulator(#[from] SimulatorError),
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
