//! Content projects: draft validation, keyword editing and the storage-backed
//! service behind the projects screen.

use serde::{Deserialize, Serialize};
use shared::{
    domain::{ProjectId, ProjectStatus, UserId},
    error::ValidationErrors,
    protocol::ProjectRecord,
};
use storage::{NewProject, Storage};
use tracing::info;

use crate::{catalog, error::ProjectError};

pub mod fields {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const CATEGORY: &str = "category";
    pub const KEYWORDS: &str = "keywords";
    pub const TARGET_COUNTRY: &str = "targetCountry";
    pub const CONTENT_GOAL: &str = "contentGoal";
    pub const TIMELINE: &str = "timeline";
    pub const TEMPLATE: &str = "template";
}

pub const MIN_DESCRIPTION_CHARS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub keywords: Vec<String>,
    pub target_country: String,
    pub content_goal: u32,
    pub timeline: String,
    pub use_template: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl ProjectDraft {
    /// Adds a trimmed keyword. Blanks and duplicates are ignored; returns
    /// whether the list changed.
    pub fn add_keyword(&mut self, raw: &str) -> bool {
        let keyword = raw.trim();
        if keyword.is_empty() || self.keywords.iter().any(|k| k == keyword) {
            return false;
        }
        self.keywords.push(keyword.to_string());
        true
    }

    pub fn remove_keyword(&mut self, keyword: &str) -> bool {
        let before = self.keywords.len();
        self.keywords.retain(|k| k != keyword);
        self.keywords.len() != before
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.push(fields::NAME, "Project name is required");
        }
        if self.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
            errors.push(
                fields::DESCRIPTION,
                format!("Description must be at least {MIN_DESCRIPTION_CHARS} characters"),
            );
        }
        if self.category.trim().is_empty() {
            errors.push(fields::CATEGORY, "Category is required");
        }
        if self.keywords.is_empty() {
            errors.push(fields::KEYWORDS, "At least one keyword is required");
        }
        if self.target_country.trim().is_empty() {
            errors.push(fields::TARGET_COUNTRY, "Target country is required");
        }
        if self.content_goal < 1 {
            errors.push(fields::CONTENT_GOAL, "Content goal must be at least 1");
        }
        if self.timeline.trim().is_empty() {
            errors.push(fields::TIMELINE, "Timeline is required");
        }
        if self.use_template {
            if let Some(id) = self.template.as_deref() {
                if catalog::template_by_id(id).is_none() {
                    errors.push(fields::TEMPLATE, "Unknown template");
                }
            }
        }
        errors
    }

    fn into_new_project(self, owner: Option<UserId>) -> NewProject {
        NewProject {
            user_id: owner,
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            keywords: self.keywords,
            location: self.target_country.trim().to_string(),
            content_goal: self.content_goal,
            timeline: self.timeline.trim().to_string(),
            template: if self.use_template { self.template } else { None },
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    /// Matched case-insensitively against name, description and keywords.
    pub query: String,
}

impl ProjectFilter {
    pub fn matches(&self, project: &ProjectRecord) -> bool {
        if self.status.is_some_and(|status| status != project.status) {
            return false;
        }
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        project.name.to_lowercase().contains(&query)
            || project.description.to_lowercase().contains(&query)
            || project
                .keywords
                .iter()
                .any(|keyword| keyword.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectSort {
    #[default]
    RecentlyUpdated,
    Name,
}

pub fn filter_and_sort(
    projects: Vec<ProjectRecord>,
    filter: &ProjectFilter,
    sort: ProjectSort,
) -> Vec<ProjectRecord> {
    let mut projects: Vec<ProjectRecord> = projects
        .into_iter()
        .filter(|project| filter.matches(project))
        .collect();
    match sort {
        ProjectSort::RecentlyUpdated => projects.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        }),
        ProjectSort::Name => projects.sort_by_key(|project| project.name.to_lowercase()),
    }
    projects
}

/// Share of the content goal produced so far, capped at 100.
pub fn completion_percent(project: &ProjectRecord) -> u32 {
    if project.content_goal == 0 {
        return 0;
    }
    let percent = u64::from(project.content_count) * 100 / u64::from(project.content_goal);
    percent.min(100) as u32
}

#[derive(Clone)]
pub struct ProjectService {
    storage: Storage,
}

impl ProjectService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn create(
        &self,
        owner: Option<UserId>,
        draft: ProjectDraft,
    ) -> Result<ProjectRecord, ProjectError> {
        draft.validate().into_result().map_err(ProjectError::Invalid)?;
        let project = self
            .storage
            .insert_project(&draft.into_new_project(owner))
            .await?;
        info!(project_id = project.id.0, name = %project.name, "project created");
        Ok(project)
    }

    pub async fn list(
        &self,
        owner: Option<UserId>,
        filter: &ProjectFilter,
        sort: ProjectSort,
    ) -> Result<Vec<ProjectRecord>, ProjectError> {
        let projects = self.storage.list_projects(owner).await?;
        Ok(filter_and_sort(projects, filter, sort))
    }

    pub async fn get(&self, project_id: ProjectId) -> Result<ProjectRecord, ProjectError> {
        self.storage
            .get_project(project_id)
            .await?
            .ok_or(ProjectError::NotFound(project_id.0))
    }

    pub async fn set_status(
        &self,
        project_id: ProjectId,
        status: ProjectStatus,
    ) -> Result<ProjectRecord, ProjectError> {
        if !self.storage.update_project_status(project_id, status).await? {
            return Err(ProjectError::NotFound(project_id.0));
        }
        info!(project_id = project_id.0, status = %status, "project status changed");
        self.get(project_id).await
    }

    /// Counts one more finished piece towards the project's goal.
    pub async fn record_content(&self, project_id: ProjectId) -> Result<ProjectRecord, ProjectError> {
        if !self.storage.increment_content_count(project_id).await? {
            return Err(ProjectError::NotFound(project_id.0));
        }
        self.get(project_id).await
    }

    pub async fn delete(&self, project_id: ProjectId) -> Result<(), ProjectError> {
        if !self.storage.delete_project(project_id).await? {
            return Err(ProjectError::NotFound(project_id.0));
        }
        info!(project_id = project_id.0, "project deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/projects_tests.rs"]
mod tests;
