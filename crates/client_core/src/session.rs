//! Signed-in user, persisted in a single storage slot.
//!
//! Authentication is stubbed: any well-formed email and non-empty password
//! signs in after a short delay. Profile edits are written back to the same
//! slot.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::{SubscriptionTier, UserId},
    error::ValidationErrors,
    protocol::{ProfileDetails, UserProfile},
};
use storage::Storage;
use tracing::{debug, info, warn};

use crate::{
    error::SessionError,
    validation::{self, fields},
};

/// Stub accounts all share one id.
pub const STUB_USER_ID: UserId = UserId(1);

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<Option<String>>;
    async fn save(&self, profile_json: &str) -> anyhow::Result<()>;
    /// Returns whether anything was removed.
    async fn clear(&self) -> anyhow::Result<bool>;
}

#[async_trait]
impl SessionStore for Storage {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        self.load_session_blob().await
    }

    async fn save(&self, profile_json: &str) -> anyhow::Result<()> {
        self.save_session_blob(profile_json).await
    }

    async fn clear(&self) -> anyhow::Result<bool> {
        self.clear_session().await
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(blob.into())),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    async fn save(&self, profile_json: &str) -> anyhow::Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(profile_json.to_string());
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<bool> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some())
    }
}

/// Editable copy of the profile settings form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub job_title: String,
    pub bio: String,
    pub timezone: String,
    pub language: String,
}

impl ProfileDraft {
    pub fn from_profile(profile: &UserProfile) -> Self {
        let details = &profile.details;
        Self {
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
            email: profile.email.clone(),
            company: details.company.clone().unwrap_or_default(),
            job_title: details.job_title.clone().unwrap_or_default(),
            bio: details.bio.clone().unwrap_or_default(),
            timezone: details.timezone.clone(),
            language: details.language.clone(),
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.first_name.trim().is_empty() {
            errors.push(fields::FIRST_NAME, "First name is required");
        }
        if self.last_name.trim().is_empty() {
            errors.push(fields::LAST_NAME, "Last name is required");
        }
        if !validation::is_valid_email(&self.email) {
            errors.push(fields::EMAIL, "Invalid email address");
        }
        if self.timezone.trim().is_empty() {
            errors.push(fields::TIMEZONE, "Timezone is required");
        }
        if self.language.trim().is_empty() {
            errors.push(fields::LANGUAGE, "Language is required");
        }
        errors
    }

    fn details(&self) -> ProfileDetails {
        ProfileDetails {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            company: optional(&self.company),
            job_title: optional(&self.job_title),
            bio: optional(&self.bio),
            timezone: self.timezone.trim().to_string(),
            language: self.language.trim().to_string(),
        }
    }
}

fn optional(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    auth_delay: Duration,
    user: Option<UserProfile>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, auth_delay: Duration) -> Self {
        Self {
            store,
            auth_delay,
            user: None,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Loads the saved profile. An unreadable profile leaves the session
    /// signed out rather than failing.
    pub async fn restore(&mut self) -> Result<Option<&UserProfile>, SessionError> {
        let Some(blob) = self.store.load().await? else {
            debug!("no saved session");
            self.user = None;
            return Ok(None);
        };
        match serde_json::from_str::<UserProfile>(&blob) {
            Ok(profile) => {
                info!(email = %profile.email, "session restored");
                self.user = Some(profile);
            }
            Err(err) => {
                warn!(error = %err, "discarding unreadable saved session");
                self.user = None;
            }
        }
        Ok(self.user.as_ref())
    }

    /// Signs in as a `pro` user named after the email's local part.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&UserProfile, SessionError> {
        let email = email.trim();
        let mut errors = ValidationErrors::new();
        validation::validate_email(email, &mut errors);
        validation::validate_password(password, &mut errors);
        if !errors.is_empty() {
            return Err(SessionError::Invalid(errors));
        }

        let name = email.split('@').next().unwrap_or_default().to_string();
        self.establish(email, name, SubscriptionTier::Pro).await
    }

    /// Creates a `free` account under the given display name.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<&UserProfile, SessionError> {
        let email = email.trim();
        let name = name.trim();
        let mut errors = ValidationErrors::new();
        if name.is_empty() {
            errors.push(validation::fields::NAME, "Name is required");
        }
        validation::validate_email(email, &mut errors);
        validation::validate_password(password, &mut errors);
        if !errors.is_empty() {
            return Err(SessionError::Invalid(errors));
        }

        self.establish(email, name.to_string(), SubscriptionTier::Free)
            .await
    }

    pub async fn logout(&mut self) -> Result<(), SessionError> {
        let had_profile = self.user.take().is_some();
        let cleared = self.store.clear().await?;
        info!(had_profile, cleared, "signed out");
        Ok(())
    }

    /// Accepts a reset request for any well-formed address. Nothing is sent.
    pub async fn reset_password(&self, email: &str) -> Result<(), SessionError> {
        let mut errors = ValidationErrors::new();
        validation::validate_email(email, &mut errors);
        errors.into_result().map_err(SessionError::Invalid)?;
        self.wait_for_auth().await;
        info!(email = %email.trim(), "password reset requested");
        Ok(())
    }

    /// Validates and saves the profile form over the signed-in profile.
    /// The display name becomes "first last".
    pub async fn update_profile(
        &mut self,
        draft: &ProfileDraft,
    ) -> Result<&UserProfile, SessionError> {
        let Some(current) = self.user.as_ref() else {
            return Err(SessionError::NotSignedIn);
        };
        draft.validate().into_result().map_err(SessionError::Invalid)?;

        let details = draft.details();
        let mut profile = current.clone();
        profile.email = draft.email.trim().to_string();
        profile.name = format!("{} {}", details.first_name, details.last_name);
        profile.details = details;

        self.wait_for_auth().await;
        let blob = serde_json::to_string(&profile)?;
        self.store.save(&blob).await?;
        info!(email = %profile.email, "profile updated");
        Ok(self.user.insert(profile))
    }

    async fn establish(
        &mut self,
        email: &str,
        name: String,
        subscription: SubscriptionTier,
    ) -> Result<&UserProfile, SessionError> {
        self.wait_for_auth().await;

        let now = Utc::now();
        let details = ProfileDetails::from_display_name(&name);
        let profile = UserProfile {
            id: STUB_USER_ID,
            email: email.to_string(),
            name,
            avatar: None,
            subscription,
            created_at: now,
            last_login: now,
            details,
        };
        let blob = serde_json::to_string(&profile)?;
        self.store.save(&blob).await?;
        info!(email = %profile.email, tier = %profile.subscription, "signed in");
        Ok(self.user.insert(profile))
    }

    async fn wait_for_auth(&self) {
        if !self.auth_delay.is_zero() {
            tokio::time::sleep(self.auth_delay).await;
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
