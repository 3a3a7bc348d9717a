//! UI/backend events and error modeling for desktop GUI controller.

use client_core::api_keys::ApiKeyEntry;
use shared::{
    error::{ApiError, ErrorCode, ValidationErrors},
    protocol::{GenerationResult, ProgressState, ProjectRecord, UserProfile},
};

pub enum UiEvent {
    Info(String),
    SessionRestored(Option<UserProfile>),
    SignedIn(UserProfile),
    SignedOut,
    ProfileSaved(UserProfile),
    PasswordResetSent(String),
    /// Field messages from a form the backend refused.
    Invalid {
        context: UiErrorContext,
        errors: ValidationErrors,
    },
    SubmitAccepted,
    SubmitRejected(String),
    GenerationProgress(ProgressState),
    GenerationCompleted(GenerationResult),
    GenerationCancelled,
    ProjectsLoaded(Vec<ProjectRecord>),
    ProjectSaved(ProjectRecord),
    ApiKeysUpdated(Vec<ApiKeyEntry>),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Storage,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    SignIn,
    Profile,
    Generation,
    Projects,
    ApiKeys,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("credential")
            || message_lower.contains("signed out")
            || message_lower.contains("unauthorized")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("sqlite")
            || message_lower.contains("database")
            || message_lower.contains("storage")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Storage
        } else if message_lower.contains("invalid")
            || message_lower.contains("required")
            || message_lower.contains("must be")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Categorizes by code instead of sniffing the message.
    pub fn from_api(context: UiErrorContext, err: &ApiError) -> Self {
        let category = match err.code {
            ErrorCode::Unauthorized => UiErrorCategory::Auth,
            ErrorCode::Validation => UiErrorCategory::Validation,
            ErrorCode::Internal => UiErrorCategory::Storage,
            ErrorCode::NotFound => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.message.clone(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Text for the status banner.
    pub fn banner_text(&self) -> String {
        match self.category {
            UiErrorCategory::Storage => {
                format!("Local data problem: {}", self.message)
            }
            UiErrorCategory::Auth => format!("Sign-in problem: {}", self.message),
            UiErrorCategory::Validation | UiErrorCategory::Unknown => self.message.clone(),
        }
    }
}
