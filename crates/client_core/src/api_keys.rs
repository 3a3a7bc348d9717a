use std::time::Duration;

use serde::Serialize;
use shared::domain::ApiKeyStatus;
use tracing::{info, warn};

const VISIBLE_SUFFIX_CHARS: usize = 4;
const MAX_MASK_CHARS: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyEntry {
    pub name: String,
    #[serde(skip_serializing)]
    pub key: String,
    pub status: ApiKeyStatus,
    pub description: String,
    pub documentation_url: String,
    pub required: bool,
}

impl ApiKeyEntry {
    pub fn new(
        name: &str,
        description: &str,
        documentation_url: &str,
        required: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            key: String::new(),
            status: ApiKeyStatus::Disconnected,
            description: description.to_string(),
            documentation_url: documentation_url.to_string(),
            required,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.key.trim().is_empty()
    }

    /// Key with everything but the last few characters hidden.
    pub fn masked_key(&self) -> String {
        mask_key(&self.key)
    }
}

pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= VISIBLE_SUFFIX_CHARS {
        return "*".repeat(chars.len());
    }
    let hidden = (chars.len() - VISIBLE_SUFFIX_CHARS).min(MAX_MASK_CHARS);
    let suffix: String = chars[chars.len() - VISIBLE_SUFFIX_CHARS..].iter().collect();
    format!("{}{suffix}", "*".repeat(hidden))
}

#[derive(Debug, Clone)]
pub struct ApiKeyRegistry {
    entries: Vec<ApiKeyEntry>,
}

impl Default for ApiKeyRegistry {
    fn default() -> Self {
        Self {
            entries: vec![
                ApiKeyEntry::new(
                    "OpenAI API",
                    "Used for AI content generation and text processing",
                    "https://platform.openai.com/docs",
                    true,
                ),
                ApiKeyEntry::new(
                    "Serper.dev",
                    "Powers SERP analysis and keyword research",
                    "https://serper.dev/api",
                    true,
                ),
                ApiKeyEntry::new(
                    "Firecrawl API",
                    "Web scraping for competitor content analysis",
                    "https://docs.firecrawl.dev",
                    false,
                ),
                ApiKeyEntry::new(
                    "Anthropic Claude",
                    "Alternative AI model for content generation",
                    "https://docs.anthropic.com",
                    false,
                ),
            ],
        }
    }
}

impl ApiKeyRegistry {
    pub fn entries(&self) -> &[ApiKeyEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ApiKeyEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Replaces a key. Any previous connection result no longer applies, so
    /// the entry goes back to disconnected.
    pub fn update_key(&mut self, name: &str, key: &str) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.name == name) else {
            return false;
        };
        entry.key = key.trim().to_string();
        entry.status = ApiKeyStatus::Disconnected;
        true
    }

    /// Simulated connection check: a configured key connects, a blank one
    /// errors.
    pub async fn test_connection(&mut self, name: &str, delay: Duration) -> Option<ApiKeyStatus> {
        let configured = self.get(name)?.is_configured();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let entry = self.entries.iter_mut().find(|entry| entry.name == name)?;
        entry.status = if configured {
            info!(provider = %name, "api key connected");
            ApiKeyStatus::Connected
        } else {
            warn!(provider = %name, "api key missing");
            ApiKeyStatus::Error
        };
        Some(entry.status)
    }

    /// Required providers that are not connected yet.
    pub fn missing_required(&self) -> Vec<&ApiKeyEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.required && entry.status != ApiKeyStatus::Connected)
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/api_keys_tests.rs"]
mod tests;
