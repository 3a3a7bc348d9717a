//! UI layer for desktop GUI: app shell, sign-in, the generation wizard,
//! the workspace views and profile settings.

pub mod app;
mod auth;
mod generation;
mod profile;
mod workspace;

pub use app::{AppPaths, DesktopGuiApp, PersistedDesktopSettings, SETTINGS_STORAGE_KEY};
