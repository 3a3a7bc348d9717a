//! Backend worker: owns the tokio runtime, storage, session and simulator,
//! and answers UI commands with UI events.

use std::{sync::Arc, thread};

use client_core::{
    api_keys::ApiKeyRegistry,
    projects::{ProjectFilter, ProjectService, ProjectSort},
    GenerationListener, GenerationSimulator, ProjectError, SessionError, SessionManager,
    Settings, SimulatedSubmit, SubmitHandler,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::{
    error::ApiError,
    protocol::{GenerationResult, ProgressState},
};
use storage::Storage;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Relays simulator callbacks into the UI queue.
pub(crate) struct UiForwarder {
    ui_tx: Sender<UiEvent>,
}

impl UiForwarder {
    pub(crate) fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }

    /// Completion and cancel end a run; a dropped one leaves the progress view stuck.
    fn forward_final(&self, event: UiEvent, kind: &'static str) {
        match self.ui_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(event = kind, "ui queue full, generation event dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::warn!(event = kind, "ui queue disconnected, generation event dropped");
            }
        }
    }
}

impl GenerationListener for UiForwarder {
    fn on_progress(&self, progress: ProgressState) {
        let _ = self.ui_tx.try_send(UiEvent::GenerationProgress(progress));
    }

    fn on_complete(&self, result: GenerationResult) {
        self.forward_final(UiEvent::GenerationCompleted(result), "completed");
    }

    fn on_cancel(&self) {
        self.forward_final(UiEvent::GenerationCancelled, "cancelled");
    }
}

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: Settings,
    database_url: String,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let Some(mut backend) = Backend::start(&settings, &database_url, ui_tx).await else {
                return;
            };
            while let Ok(cmd) = cmd_rx.recv() {
                backend.handle(cmd).await;
            }
            backend.simulator.stop();
            tracing::info!("backend worker stopped");
        });
    });
}

struct Backend {
    ui_tx: Sender<UiEvent>,
    session: SessionManager,
    projects: ProjectService,
    simulator: GenerationSimulator,
    submit_handler: SimulatedSubmit,
    api_keys: ApiKeyRegistry,
}

impl Backend {
    async fn start(settings: &Settings, database_url: &str, ui_tx: Sender<UiEvent>) -> Option<Self> {
        let startup_error = |message: String| {
            tracing::error!(%database_url, "{message}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                message,
            )));
        };

        let storage = match Storage::new(database_url).await {
            Ok(storage) => storage,
            Err(err) => {
                startup_error(format!("failed to open database storage: {err:#}"));
                return None;
            }
        };
        let simulator = match settings
            .progress_schedule()
            .map_err(|err| err.to_string())
            .and_then(|schedule| GenerationSimulator::new(schedule).map_err(|err| err.to_string()))
        {
            Ok(simulator) => simulator,
            Err(err) => {
                startup_error(err);
                return None;
            }
        };

        let backend = Self {
            session: SessionManager::new(Arc::new(storage.clone()), settings.auth_delay()),
            projects: ProjectService::new(storage),
            simulator,
            submit_handler: SimulatedSubmit {
                delay: settings.submit_delay(),
            },
            api_keys: ApiKeyRegistry::default(),
            ui_tx,
        };
        backend.send(UiEvent::Info("Backend worker ready".to_string()));
        backend.send(UiEvent::ApiKeysUpdated(backend.api_keys.entries().to_vec()));
        Some(backend)
    }

    fn send(&self, event: UiEvent) {
        let _ = self.ui_tx.try_send(event);
    }

    fn send_error(&self, context: UiErrorContext, message: impl Into<String>) {
        self.send(UiEvent::Error(UiError::from_message(context, message)));
    }

    fn send_session_error(&self, context: UiErrorContext, err: SessionError) {
        match err {
            SessionError::Invalid(errors) => self.send(UiEvent::Invalid { context, errors }),
            other => self.send(UiEvent::Error(UiError::from_api(
                context,
                &ApiError::from(&other),
            ))),
        }
    }

    fn send_project_error(&self, err: ProjectError) {
        match err {
            ProjectError::Invalid(errors) => self.send(UiEvent::Invalid {
                context: UiErrorContext::Projects,
                errors,
            }),
            other => self.send(UiEvent::Error(UiError::from_api(
                UiErrorContext::Projects,
                &ApiError::from(&other),
            ))),
        }
    }

    async fn handle(&mut self, cmd: BackendCommand) {
        match cmd {
            BackendCommand::RestoreSession => match self.session.restore().await {
                Ok(user) => {
                    let user = user.cloned();
                    self.send(UiEvent::SessionRestored(user));
                }
                Err(err) => self.send_session_error(UiErrorContext::SignIn, err),
            },
            BackendCommand::Login { email, password } => {
                match self.session.login(&email, &password).await {
                    Ok(user) => {
                        let user = user.clone();
                        self.send(UiEvent::SignedIn(user));
                    }
                    Err(err) => self.send_session_error(UiErrorContext::SignIn, err),
                }
            }
            BackendCommand::Register {
                email,
                password,
                name,
            } => match self.session.register(&email, &password, &name).await {
                Ok(user) => {
                    let user = user.clone();
                    self.send(UiEvent::SignedIn(user));
                }
                Err(err) => self.send_session_error(UiErrorContext::SignIn, err),
            },
            BackendCommand::ResetPassword { email } => {
                match self.session.reset_password(&email).await {
                    Ok(()) => self.send(UiEvent::PasswordResetSent(email.trim().to_string())),
                    Err(err) => self.send_session_error(UiErrorContext::SignIn, err),
                }
            }
            BackendCommand::Logout => {
                self.simulator.stop();
                match self.session.logout().await {
                    Ok(()) => self.send(UiEvent::SignedOut),
                    Err(err) => self.send_session_error(UiErrorContext::SignIn, err),
                }
            }
            BackendCommand::UpdateProfile { draft } => {
                match self.session.update_profile(&draft).await {
                    Ok(user) => {
                        let user = user.clone();
                        self.send(UiEvent::ProfileSaved(user));
                    }
                    Err(err) => self.send_session_error(UiErrorContext::Profile, err),
                }
            }
            BackendCommand::Submit { brief } => {
                match self.submit_handler.submit(&brief).await {
                    Ok(()) => {
                        let listener = Arc::new(UiForwarder::new(self.ui_tx.clone()));
                        match self.simulator.start(listener) {
                            Ok(()) => self.send(UiEvent::SubmitAccepted),
                            Err(err) => self.send(UiEvent::SubmitRejected(err.to_string())),
                        }
                    }
                    Err(err) => self.send(UiEvent::SubmitRejected(format!("{err:#}"))),
                }
            }
            BackendCommand::CancelGeneration => {
                if !self.simulator.cancel() {
                    tracing::debug!("cancel requested with no active run");
                }
            }
            BackendCommand::DiscardGeneration => self.simulator.stop(),
            BackendCommand::ListProjects { filter, sort } => self.list_projects(&filter, sort).await,
            BackendCommand::CreateProject { draft } => {
                let owner = self.session.user().map(|user| user.id);
                match self.projects.create(owner, draft).await {
                    Ok(project) => self.send(UiEvent::ProjectSaved(project)),
                    Err(err) => self.send_project_error(err),
                }
            }
            BackendCommand::SetProjectStatus { project_id, status } => {
                match self.projects.set_status(project_id, status).await {
                    Ok(project) => self.send(UiEvent::ProjectSaved(project)),
                    Err(err) => self.send_project_error(err),
                }
            }
            BackendCommand::RecordContent { project_id } => {
                match self.projects.record_content(project_id).await {
                    Ok(project) => self.send(UiEvent::ProjectSaved(project)),
                    Err(err) => self.send_project_error(err),
                }
            }
            BackendCommand::UpdateApiKey { name, key } => {
                if !self.api_keys.update_key(&name, &key) {
                    self.send_error(UiErrorContext::ApiKeys, format!("unknown provider '{name}'"));
                }
                self.send(UiEvent::ApiKeysUpdated(self.api_keys.entries().to_vec()));
            }
            BackendCommand::TestApiKey { name } => {
                let delay = std::time::Duration::from_millis(2000);
                match self.api_keys.test_connection(&name, delay).await {
                    Some(status) => self.send(UiEvent::Info(format!("{name}: {status}"))),
                    None => self.send_error(UiErrorContext::ApiKeys, format!("unknown provider '{name}'")),
                }
                self.send(UiEvent::ApiKeysUpdated(self.api_keys.entries().to_vec()));
            }
        }
    }

    async fn list_projects(&self, filter: &ProjectFilter, sort: ProjectSort) {
        let owner = self.session.user().map(|user| user.id);
        match self.projects.list(owner, filter, sort).await {
            Ok(projects) => self.send(UiEvent::ProjectsLoaded(projects)),
            Err(err) => self.send_project_error(err),
        }
    }
}
