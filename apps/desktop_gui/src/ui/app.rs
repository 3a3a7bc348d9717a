use std::{collections::HashMap, path::PathBuf, time::Duration};

use client_core::{
    analytics::{RankingSort, RoiInputs},
    api_keys::ApiKeyEntry,
    catalog,
    projects::{ProjectDraft, ProjectFilter, ProjectSort},
    ProfileDraft, WizardController,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::{
    domain::ProjectId,
    error::ValidationErrors,
    protocol::{FormValues, GenerationBrief, GenerationResult, ProgressState, ProjectRecord, UserProfile},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
};

pub const SETTINGS_STORAGE_KEY: &str = "desktop_gui.settings";

/// Filesystem locations for one local profile.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_root: PathBuf,
    pub db_path: PathBuf,
}

impl AppPaths {
    pub fn resolve(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let root = match data_dir {
            Some(dir) => dir,
            None => dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("unable to resolve local app data dir"))?
                .join("seo_studio"),
        };
        Ok(Self {
            db_path: root.join("studio.sqlite3"),
            data_root: root,
        })
    }

    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.db_path.display())
    }
}

/// UI preferences kept in eframe storage between launches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedDesktopSettings {
    pub dark_mode: bool,
    pub draft: Option<FormValues>,
}

impl Default for PersistedDesktopSettings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            draft: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AppView {
    Generate,
    Projects,
    Analytics,
    Settings,
}

impl AppView {
    const ALL: [AppView; 4] = [
        AppView::Generate,
        AppView::Projects,
        AppView::Analytics,
        AppView::Settings,
    ];

    fn label(self) -> &'static str {
        match self {
            AppView::Generate => "Generate",
            AppView::Projects => "Projects",
            AppView::Analytics => "Analytics",
            AppView::Settings => "Settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum AuthMode {
    #[default]
    SignIn,
    Register,
    ResetPassword,
}

#[derive(Debug, Default)]
pub(crate) struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub name: String,
    pub errors: ValidationErrors,
    pub busy: bool,
}

#[derive(Debug, Default)]
pub(crate) struct ProfileUi {
    pub draft: ProfileDraft,
    pub errors: ValidationErrors,
    pub saving: bool,
}

/// A run the backend accepted: progress until a result or a cancel arrives.
#[derive(Debug, Default)]
pub(crate) struct GenerationView {
    pub progress: ProgressState,
    pub result: Option<GenerationResult>,
    pub cancel_requested: bool,
}

#[derive(Debug, Default)]
pub(crate) struct ProjectsUi {
    pub records: Vec<ProjectRecord>,
    pub filter: ProjectFilter,
    pub sort: ProjectSort,
    pub draft: ProjectDraft,
    pub keyword_input: String,
    pub errors: ValidationErrors,
    pub form_open: bool,
    /// Project credited when a generation completes.
    pub active: Option<ProjectId>,
}

pub(crate) struct AnalyticsUi {
    pub roi: RoiInputs,
    pub rankings: Vec<client_core::analytics::KeywordRanking>,
    pub ranking_sort: RankingSort,
}

impl Default for AnalyticsUi {
    fn default() -> Self {
        Self {
            roi: RoiInputs::default(),
            rankings: catalog::sample_rankings(),
            ranking_sort: RankingSort::CurrentRank,
        }
    }
}

pub struct DesktopGuiApp {
    pub(crate) cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    pub(crate) status: String,
    pub(crate) status_banner: Option<String>,
    pub(crate) session_checked: bool,
    pub(crate) user: Option<UserProfile>,
    pub(crate) view: AppView,
    pub(crate) dark_mode: bool,
    applied_dark_mode: Option<bool>,

    pub(crate) auth: AuthForm,
    pub(crate) profile: ProfileUi,

    pub(crate) wizard: WizardController,
    pub(crate) pending_brief: Option<GenerationBrief>,
    pub(crate) generation: Option<GenerationView>,
    pub(crate) competitor_input: String,
    pub(crate) link_input: String,

    pub(crate) projects: ProjectsUi,
    pub(crate) analytics: AnalyticsUi,
    pub(crate) api_keys: Vec<ApiKeyEntry>,
    pub(crate) api_key_drafts: HashMap<String, String>,
}

impl DesktopGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted: Option<PersistedDesktopSettings>,
    ) -> Self {
        let persisted = persisted.unwrap_or_default();
        let wizard = match persisted.draft {
            Some(values) => WizardController::with_values(values),
            None => WizardController::new(),
        };
        let mut app = Self {
            cmd_tx,
            ui_rx,
            status: "Restoring session...".to_string(),
            status_banner: None,
            session_checked: false,
            user: None,
            view: AppView::Generate,
            dark_mode: persisted.dark_mode,
            applied_dark_mode: None,
            auth: AuthForm::default(),
            profile: ProfileUi::default(),
            wizard,
            pending_brief: None,
            generation: None,
            competitor_input: String::new(),
            link_input: String::new(),
            projects: ProjectsUi::default(),
            analytics: AnalyticsUi::default(),
            api_keys: Vec::new(),
            api_key_drafts: HashMap::new(),
        };
        app.send(BackendCommand::RestoreSession);
        app
    }

    pub(crate) fn send(&mut self, cmd: BackendCommand) -> bool {
        let queued = dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
        if !queued {
            self.status_banner = Some(self.status.clone());
        }
        queued
    }

    pub(crate) fn refresh_projects(&mut self) {
        let cmd = BackendCommand::ListProjects {
            filter: self.projects.filter.clone(),
            sort: self.projects.sort,
        };
        self.send(cmd);
    }

    fn signed_in(&mut self, user: UserProfile) {
        self.status = format!("Signed in as {}", user.email);
        self.status_banner = None;
        self.auth = AuthForm::default();
        self.profile = ProfileUi {
            draft: ProfileDraft::from_profile(&user),
            ..ProfileUi::default()
        };
        self.user = Some(user);
        self.session_checked = true;
        self.refresh_projects();
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::SessionRestored(Some(user)) => self.signed_in(user),
                UiEvent::SessionRestored(None) => {
                    self.session_checked = true;
                    self.status = "Not signed in".to_string();
                }
                UiEvent::SignedIn(user) => self.signed_in(user),
                UiEvent::SignedOut => {
                    self.user = None;
                    self.generation = None;
                    self.pending_brief = None;
                    self.wizard = WizardController::new();
                    self.projects = ProjectsUi::default();
                    self.profile = ProfileUi::default();
                    self.view = AppView::Generate;
                    self.status = "Signed out".to_string();
                }
                UiEvent::ProfileSaved(user) => {
                    self.status = "Profile updated".to_string();
                    self.profile = ProfileUi {
                        draft: ProfileDraft::from_profile(&user),
                        ..ProfileUi::default()
                    };
                    self.user = Some(user);
                }
                UiEvent::PasswordResetSent(email) => {
                    self.auth.busy = false;
                    self.auth.mode = AuthMode::SignIn;
                    self.status = format!("Password reset link sent to {email}");
                }
                UiEvent::Invalid { context, errors } => match context {
                    UiErrorContext::SignIn => {
                        self.auth.busy = false;
                        self.auth.errors = errors;
                    }
                    UiErrorContext::Projects => self.projects.errors = errors,
                    UiErrorContext::Profile => {
                        self.profile.saving = false;
                        self.profile.errors = errors;
                    }
                    _ => self.status = errors.to_string(),
                },
                UiEvent::SubmitAccepted => {
                    if let Some(brief) = self.pending_brief.take() {
                        if self.wizard.finish_submit(brief, Ok(())).is_ok() {
                            self.generation = Some(GenerationView::default());
                            self.status = "Generating content...".to_string();
                        }
                    }
                }
                UiEvent::SubmitRejected(reason) => {
                    if let Some(brief) = self.pending_brief.take() {
                        let _ = self.wizard.finish_submit(brief, Err(reason.clone()));
                    }
                    self.status = format!("Submit failed: {reason}");
                }
                UiEvent::GenerationProgress(progress) => {
                    if let Some(generation) = self.generation.as_mut() {
                        generation.progress = progress;
                    }
                }
                UiEvent::GenerationCompleted(result) => {
                    if let Some(generation) = self.generation.as_mut() {
                        generation.progress = ProgressState::at_percent(100.0);
                        generation.result = Some(result);
                        self.status = "Content ready".to_string();
                        if let Some(project_id) = self.projects.active {
                            self.send(BackendCommand::RecordContent { project_id });
                        }
                    }
                }
                UiEvent::GenerationCancelled => {
                    self.return_to_wizard();
                    self.status = "Generation cancelled".to_string();
                }
                UiEvent::ProjectsLoaded(records) => {
                    self.projects.records = records;
                }
                UiEvent::ProjectSaved(project) => {
                    self.status = format!("Saved project '{}'", project.name);
                    match self
                        .projects
                        .records
                        .iter_mut()
                        .find(|existing| existing.id == project.id)
                    {
                        Some(existing) => *existing = project,
                        None => {
                            self.projects.form_open = false;
                            self.projects.draft = ProjectDraft::default();
                            self.projects.errors = ValidationErrors::new();
                            self.refresh_projects();
                        }
                    }
                }
                UiEvent::ApiKeysUpdated(entries) => {
                    self.api_keys = entries;
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), category = ?err.category(), "{}", err.message());
                    match err.context() {
                        UiErrorContext::SignIn => self.auth.busy = false,
                        UiErrorContext::Profile => self.profile.saving = false,
                        _ => {}
                    }
                    self.status = err.banner_text();
                    if matches!(
                        err.context(),
                        UiErrorContext::BackendStartup
                            | UiErrorContext::SignIn
                            | UiErrorContext::Generation
                    ) {
                        self.status_banner = Some(self.status.clone());
                    }
                }
            }
        }
    }

    /// Drops the finished or cancelled run and reopens the form with the
    /// values the user had entered.
    pub(crate) fn return_to_wizard(&mut self) {
        let values = self.wizard.values().clone();
        self.wizard = WizardController::with_values(values);
        self.generation = None;
    }

    pub(crate) fn start_over(&mut self) {
        self.send(BackendCommand::DiscardGeneration);
        self.wizard = WizardController::new();
        self.generation = None;
        self.status = "Ready".to_string();
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_dark_mode == Some(self.dark_mode) {
            return;
        }
        ctx.set_visuals(if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
        self.applied_dark_mode = Some(self.dark_mode);
    }

    pub(crate) fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(message) = self.status_banner.clone() else {
            return;
        };
        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(92, 32, 36))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(message).color(egui::Color32::WHITE));
                    if ui.small_button("Dismiss").clicked() {
                        self.status_banner = None;
                    }
                });
            });
        ui.add_space(6.0);
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("studio_top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("SEO Content Studio");
                ui.separator();
                for view in AppView::ALL {
                    ui.selectable_value(&mut self.view, view, view.label());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Sign out").clicked() {
                        self.send(BackendCommand::Logout);
                    }
                    ui.checkbox(&mut self.dark_mode, "Dark");
                    if let Some(user) = &self.user {
                        ui.weak(format!("{} ({})", user.name, user.subscription.label()));
                    }
                });
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("studio_status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });
    }

    fn show_main_workspace(&mut self, ctx: &egui::Context) {
        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| match self.view {
                    AppView::Generate => self.show_generate_view(ui),
                    AppView::Projects => self.show_projects_view(ui),
                    AppView::Analytics => self.show_analytics_view(ui),
                    AppView::Settings => {
                        self.show_profile_section(ui);
                        ui.separator();
                        self.show_api_keys_view(ui);
                    }
                });
        });
    }

    fn is_generating(&self) -> bool {
        self.generation
            .as_ref()
            .is_some_and(|generation| generation.result.is_none())
    }
}

/// Red inline message under a field, if the field has one.
pub(crate) fn field_error(ui: &mut egui::Ui, errors: &ValidationErrors, field: &str) {
    if let Some(message) = errors.message_for(field) {
        ui.label(
            egui::RichText::new(message)
                .small()
                .color(egui::Color32::from_rgb(240, 71, 71)),
        );
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.apply_theme_if_needed(ctx);

        if self.user.is_some() {
            self.show_main_workspace(ctx);
        } else {
            self.show_auth_screen(ctx);
        }

        if self.is_generating() || !self.session_checked || self.auth.busy {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let draft = self
            .wizard
            .is_editing()
            .then(|| self.wizard.values().clone());
        let settings = PersistedDesktopSettings {
            dark_mode: self.dark_mode,
            draft,
        };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
