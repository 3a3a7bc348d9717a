use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::{commands::BackendCommand, runtime};
use clap::Parser;
use client_core::{load_settings, prepare_database_url, settings::DEFAULT_DATABASE_URL, Settings};
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use ui::{AppPaths, DesktopGuiApp, PersistedDesktopSettings, SETTINGS_STORAGE_KEY};

#[derive(Debug, Parser)]
#[command(name = "desktop_gui", about = "SEO content studio desktop app")]
struct Args {
    /// Profile directory; defaults to the per-user local data dir.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Overrides every other database location.
    #[arg(long)]
    database_url: Option<String>,
}

/// Explicit flag, then a configured url, then the profile database.
fn resolve_database_url(
    args: &Args,
    settings: &Settings,
    paths: Option<&AppPaths>,
) -> Result<String, String> {
    let raw = match (&args.database_url, paths) {
        (Some(url), _) => url.clone(),
        (None, Some(paths)) if settings.database_url == DEFAULT_DATABASE_URL => {
            paths.database_url()
        }
        (None, _) => settings.database_url.clone(),
    };
    prepare_database_url(&raw).map_err(|err| err.to_string())
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("falling back to default settings: {err}");
            Settings::default()
        }
    };
    let paths = match AppPaths::resolve(args.data_dir.clone()) {
        Ok(paths) => Some(paths),
        Err(err) => {
            tracing::warn!("{err:#}");
            None
        }
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    match resolve_database_url(&args, &settings, paths.as_ref()) {
        Ok(database_url) => {
            if let Some(paths) = &paths {
                tracing::info!(data_root = %paths.data_root.display(), %database_url, "starting desktop gui");
            }
            runtime::launch(cmd_rx, ui_tx, settings, database_url);
        }
        Err(err) => {
            // The backend never starts; the UI reports the disconnect on first use.
            let _ = ui_tx.try_send(UiEvent::Error(controller::events::UiError::from_message(
                controller::events::UiErrorContext::BackendStartup,
                format!("backend worker startup failure: {err}"),
            )));
            drop(cmd_rx);
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("SEO Content Studio")
            .with_inner_size([1180.0, 780.0])
            .with_min_inner_size([860.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "SEO Content Studio",
        options,
        Box::new(|cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedDesktopSettings>(&text).ok())
            });
            Ok(Box::new(DesktopGuiApp::new(cmd_tx, ui_rx, persisted)))
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crossbeam_channel::bounded;

    use super::{resolve_database_url, Args};
    use crate::backend_bridge::{commands::BackendCommand, runtime::UiForwarder};
    use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};
    use crate::controller::orchestration::dispatch_backend_command;
    use crate::ui::{AppPaths, PersistedDesktopSettings};
    use client_core::{placeholder_result, GenerationListener, ProjectError, SessionError, Settings};
    use shared::error::ApiError;

    #[test]
    fn classifies_database_failures_as_storage_errors() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "failed to open database storage: unable to open sqlite file",
        );
        assert_eq!(err.category(), UiErrorCategory::Storage);
        assert!(err.banner_text().starts_with("Local data problem:"));
    }

    #[test]
    fn classifies_missing_fields_as_validation_errors() {
        let err = UiError::from_message(UiErrorContext::Projects, "Project name is required");
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.banner_text(), "Project name is required");
    }

    #[test]
    fn unknown_messages_keep_their_text() {
        let err = UiError::from_message(UiErrorContext::General, "something odd");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert_eq!(err.context(), UiErrorContext::General);
        assert_eq!(err.message(), "something odd");
    }

    #[test]
    fn api_errors_are_categorized_by_code() {
        let err = UiError::from_api(UiErrorContext::Profile, &ApiError::from(&SessionError::NotSignedIn));
        assert_eq!(err.category(), UiErrorCategory::Auth);
        assert_eq!(err.banner_text(), "Sign-in problem: no user is signed in");

        let err = UiError::from_api(UiErrorContext::Projects, &ApiError::from(&ProjectError::NotFound(3)));
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert_eq!(err.banner_text(), "project 3 not found");

        let storage = ProjectError::Storage(anyhow::anyhow!("locked"));
        let err = UiError::from_api(UiErrorContext::Projects, &ApiError::from(&storage));
        assert_eq!(err.category(), UiErrorCategory::Storage);
    }

    #[test]
    fn forwarder_survives_a_full_ui_queue() {
        let (tx, rx) = bounded::<UiEvent>(1);
        let forwarder = UiForwarder::new(tx);
        forwarder.on_cancel();
        forwarder.on_complete(placeholder_result());
        assert!(matches!(rx.try_recv(), Ok(UiEvent::GenerationCancelled)));
        assert!(rx.try_recv().is_err());

        forwarder.on_complete(placeholder_result());
        assert!(matches!(rx.try_recv(), Ok(UiEvent::GenerationCompleted(_))));

        drop(rx);
        forwarder.on_cancel();
    }

    #[test]
    fn dispatch_reports_full_and_disconnected_queues() {
        let (tx, rx) = bounded::<BackendCommand>(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, BackendCommand::Logout, &mut status));
        assert!(!dispatch_backend_command(&tx, BackendCommand::Logout, &mut status));
        assert!(status.contains("full"));

        drop(rx);
        assert!(!dispatch_backend_command(&tx, BackendCommand::RestoreSession, &mut status));
        assert!(status.contains("disconnected"));
    }

    #[test]
    fn explicit_database_url_wins() {
        let args = Args {
            data_dir: None,
            database_url: Some("sqlite::memory:".to_string()),
        };
        let url = resolve_database_url(&args, &Settings::default(), None).expect("url");
        assert_eq!(url, "sqlite::memory:");
    }

    #[test]
    fn default_settings_use_the_profile_database() {
        let root = std::env::temp_dir().join("seo_studio_gui_test_profile");
        let paths = AppPaths::resolve(Some(root.clone())).expect("paths");
        let args = Args {
            data_dir: Some(root.clone()),
            database_url: None,
        };
        let url = resolve_database_url(&args, &Settings::default(), Some(&paths)).expect("url");
        assert_eq!(url, format!("sqlite://{}", root.join("studio.sqlite3").display()));
        assert_eq!(paths.db_path, PathBuf::from(&root).join("studio.sqlite3"));
    }

    #[test]
    fn persisted_settings_tolerate_missing_fields() {
        let settings: PersistedDesktopSettings = serde_json::from_str("{}").expect("settings");
        assert!(settings.dark_mode);
        assert!(settings.draft.is_none());
    }
}
