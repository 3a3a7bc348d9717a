//! Runtime settings: defaults, then `studio.toml`, then `APP__*` variables.

use std::{collections::HashMap, fs, io, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use crate::{error::SettingsError, progress::ProgressSchedule};

pub const SETTINGS_FILE: &str = "studio.toml";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/studio.db";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub progress_total_ms: u64,
    pub progress_tick_ms: u64,
    pub progress_settle_ms: u64,
    pub auth_delay_ms: u64,
    pub submit_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.into(),
            progress_total_ms: 8000,
            progress_tick_ms: 100,
            progress_settle_ms: 1000,
            auth_delay_ms: 1000,
            submit_delay_ms: 0,
        }
    }
}

impl Settings {
    pub fn progress_schedule(&self) -> Result<ProgressSchedule, SettingsError> {
        ProgressSchedule::from_millis(
            self.progress_total_ms,
            self.progress_tick_ms,
            self.progress_settle_ms,
        )
        .map_err(|err| SettingsError::InvalidValue {
            key: "progress_tick_ms",
            reason: err.to_string(),
        })
    }

    pub fn auth_delay(&self) -> Duration {
        Duration::from_millis(self.auth_delay_ms)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

pub fn load_settings() -> Result<Settings, SettingsError> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Layers the file at `path` (if present) and variables from `env` over the
/// defaults.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, SettingsError> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: HashMap<String, toml::Value> =
                toml::from_str(&raw).map_err(|source| SettingsError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;
            apply_file(&mut settings, &file_cfg)?;
            debug!(path = %path.display(), "loaded settings file");
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    }

    if let Some(v) = env("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }
    for (key, slot) in millis_fields(&mut settings) {
        let var = format!("APP__{}", key.to_ascii_uppercase());
        if let Some(v) = env(&var) {
            *slot = v.trim().parse::<u64>().map_err(|err| SettingsError::InvalidValue {
                key,
                reason: format!("{var}={v}: {err}"),
            })?;
        }
    }

    settings.progress_schedule()?;
    Ok(settings)
}

fn apply_file(
    settings: &mut Settings,
    file_cfg: &HashMap<String, toml::Value>,
) -> Result<(), SettingsError> {
    if let Some(v) = file_cfg.get("database_url") {
        settings.database_url = v
            .as_str()
            .ok_or_else(|| SettingsError::InvalidValue {
                key: "database_url",
                reason: "expected a string".to_string(),
            })?
            .to_string();
    }
    for (key, slot) in millis_fields(settings) {
        if let Some(v) = file_cfg.get(key) {
            let parsed = v
                .as_integer()
                .and_then(|n| u64::try_from(n).ok())
                .ok_or_else(|| SettingsError::InvalidValue {
                    key,
                    reason: format!("expected a non-negative integer, got {v}"),
                })?;
            *slot = parsed;
        }
    }
    Ok(())
}

fn millis_fields(settings: &mut Settings) -> [(&'static str, &mut u64); 5] {
    [
        ("progress_total_ms", &mut settings.progress_total_ms),
        ("progress_tick_ms", &mut settings.progress_tick_ms),
        ("progress_settle_ms", &mut settings.progress_settle_ms),
        ("auth_delay_ms", &mut settings.auth_delay_ms),
        ("submit_delay_ms", &mut settings.submit_delay_ms),
    ]
}

/// Turns plain paths into `sqlite://` URLs and creates the parent directory
/// of file-backed databases.
pub fn prepare_database_url(raw_database_url: &str) -> Result<String, SettingsError> {
    let database_url = normalize_database_url(raw_database_url);
    if let Some(parent) = storage::sqlite_path(&database_url)
        .as_deref()
        .and_then(Path::parent)
    {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create parent directory '{}' for database url '{database_url}'",
                parent.display()
            )
        })?;
    }
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return DEFAULT_DATABASE_URL.to_string();
    }

    if raw_database_url.starts_with("sqlite::memory:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
