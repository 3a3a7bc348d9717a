//! Field rules for the content wizard and the smaller account forms.
//!
//! Rules return data, never panic, and never stop at the first failure:
//! callers render every message inline next to its field.

use shared::{
    error::ValidationErrors,
    protocol::{FormValues, GenerationBrief, MAX_WORD_COUNT, MIN_WORD_COUNT},
};
use url::Url;

pub mod fields {
    pub const KEYWORD: &str = "keyword";
    pub const LOCATION: &str = "location";
    pub const CONTENT_TYPE: &str = "contentType";
    pub const WORD_COUNT: &str = "wordCount";
    pub const TONE: &str = "tone";
    pub const TARGET_AUDIENCE: &str = "targetAudience";
    pub const COMPETITOR_URLS: &str = "competitorUrls";
    pub const INTERNAL_LINKS: &str = "internalLinks";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const NAME: &str = "name";
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const TIMEZONE: &str = "timezone";
    pub const LANGUAGE: &str = "language";
}

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

pub fn validate_keyword(values: &FormValues, errors: &mut ValidationErrors) {
    if values.keyword.trim().is_empty() {
        errors.push(fields::KEYWORD, "Keyword is required");
    }
}

pub fn validate_location(values: &FormValues, errors: &mut ValidationErrors) {
    if values.location.trim().is_empty() {
        errors.push(fields::LOCATION, "Location is required");
    }
}

pub fn validate_content_type(values: &FormValues, errors: &mut ValidationErrors) {
    if values.content_type.is_none() {
        errors.push(fields::CONTENT_TYPE, "Content type is required");
    }
}

pub fn validate_word_count(values: &FormValues, errors: &mut ValidationErrors) {
    if let Some(message) = word_count_message(values.word_count) {
        errors.push(fields::WORD_COUNT, message);
    }
}

pub fn word_count_message(word_count: u32) -> Option<String> {
    if word_count < MIN_WORD_COUNT {
        Some(format!("Minimum {MIN_WORD_COUNT} words"))
    } else if word_count > MAX_WORD_COUNT {
        Some(format!("Maximum {MAX_WORD_COUNT} words"))
    } else {
        None
    }
}

pub fn validate_tone(values: &FormValues, errors: &mut ValidationErrors) {
    if values.tone.is_none() {
        errors.push(fields::TONE, "Tone is required");
    }
}

pub fn validate_target_audience(values: &FormValues, errors: &mut ValidationErrors) {
    if values.target_audience.trim().is_empty() {
        errors.push(fields::TARGET_AUDIENCE, "Target audience is required");
    }
}

/// Blank rows are placeholders and are skipped; anything else must be an
/// absolute http(s) URL.
pub fn validate_competitor_urls(values: &FormValues, errors: &mut ValidationErrors) {
    for (index, raw) in values.competitor_urls.iter().enumerate() {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        if !is_web_url(raw) {
            errors.push(format!("{}.{index}", fields::COMPETITOR_URLS), "Invalid url");
        }
    }
}

pub fn is_web_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Structural check only: one `@`, a non-empty local part, a dotted domain
/// and no whitespace.
pub fn is_valid_email(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

pub fn validate_email(email: &str, errors: &mut ValidationErrors) {
    if !is_valid_email(email) {
        errors.push(fields::EMAIL, INVALID_EMAIL_MESSAGE);
    }
}

pub fn validate_password(password: &str, errors: &mut ValidationErrors) {
    if password.is_empty() {
        errors.push(fields::PASSWORD, "Password is required");
    }
}

/// Runs every rule over the whole form.
pub fn validate_form(values: &FormValues) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    validate_keyword(values, &mut errors);
    validate_location(values, &mut errors);
    validate_content_type(values, &mut errors);
    validate_word_count(values, &mut errors);
    validate_tone(values, &mut errors);
    validate_target_audience(values, &mut errors);
    validate_competitor_urls(values, &mut errors);
    errors
}

/// Validates the whole form and freezes it into a brief, dropping blank
/// optional rows.
pub fn freeze(values: &FormValues) -> Result<GenerationBrief, ValidationErrors> {
    let errors = validate_form(values);
    let (Some(content_type), Some(tone)) = (values.content_type, values.tone) else {
        return Err(errors);
    };
    errors.into_result()?;

    Ok(GenerationBrief {
        keyword: values.keyword.trim().to_string(),
        location: values.location.trim().to_string(),
        content_type,
        word_count: values.word_count,
        tone,
        include_images: values.include_images,
        target_audience: values.target_audience.trim().to_string(),
        competitor_urls: non_blank(&values.competitor_urls),
        internal_links: non_blank(&values.internal_links),
    })
}

fn non_blank(rows: &[String]) -> Vec<String> {
    rows.iter()
        .map(|row| row.trim())
        .filter(|row| !row.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
