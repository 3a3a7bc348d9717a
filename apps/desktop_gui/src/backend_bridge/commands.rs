//! Backend commands queued from UI to backend worker.

use client_core::{
    projects::{ProjectDraft, ProjectFilter, ProjectSort},
    ProfileDraft,
};
use shared::{
    domain::{ProjectId, ProjectStatus},
    protocol::GenerationBrief,
};

pub enum BackendCommand {
    RestoreSession,
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        name: String,
    },
    ResetPassword {
        email: String,
    },
    Logout,
    UpdateProfile {
        draft: ProfileDraft,
    },
    Submit {
        brief: GenerationBrief,
    },
    CancelGeneration,
    /// Tears down any run without notifying the UI.
    DiscardGeneration,
    ListProjects {
        filter: ProjectFilter,
        sort: ProjectSort,
    },
    CreateProject {
        draft: ProjectDraft,
    },
    SetProjectStatus {
        project_id: ProjectId,
        status: ProjectStatus,
    },
    RecordContent {
        project_id: ProjectId,
    },
    UpdateApiKey {
        name: String,
        key: String,
    },
    TestApiKey {
        name: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::RestoreSession => "restore_session",
            BackendCommand::Login { .. } => "login",
            BackendCommand::Register { .. } => "register",
            BackendCommand::ResetPassword { .. } => "reset_password",
            BackendCommand::Logout => "logout",
            BackendCommand::UpdateProfile { .. } => "update_profile",
            BackendCommand::Submit { .. } => "submit",
            BackendCommand::CancelGeneration => "cancel_generation",
            BackendCommand::DiscardGeneration => "discard_generation",
            BackendCommand::ListProjects { .. } => "list_projects",
            BackendCommand::CreateProject { .. } => "create_project",
            BackendCommand::SetProjectStatus { .. } => "set_project_status",
            BackendCommand::RecordContent { .. } => "record_content",
            BackendCommand::UpdateApiKey { .. } => "update_api_key",
            BackendCommand::TestApiKey { .. } => "test_api_key",
        }
    }
}
