use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::{
    domain::{ProjectId, ProjectStatus, UserId},
    protocol::ProjectRecord,
};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

/// Columns supplied by the caller when a project is created. Status,
/// counters and timestamps are assigned here.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub user_id: Option<UserId>,
    pub name: String,
    pub description: String,
    pub category: String,
    pub keywords: Vec<String>,
    pub location: String,
    pub content_goal: u32,
    pub timeline: String,
    pub template: Option<String>,
    pub tags: Vec<String>,
}

const PROJECT_COLUMNS: &str = "id, user_id, name, description, category, keywords_json, location, status, content_count, content_goal, timeline, template, tags_json, created_at, updated_at";

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to an in-memory database gets its own schema.
        let max_connections = if is_memory_url(database_url) { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Raw JSON of the signed-in profile, if one was saved.
    pub async fn load_session_blob(&self) -> Result<Option<String>> {
        let row = sqlx::query("SELECT profile_json FROM session_slot WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .context("failed to read session slot")?;
        Ok(row.map(|r| r.get::<String, _>(0)))
    }

    pub async fn save_session_blob(&self, profile_json: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO session_slot (id, profile_json, updated_at) VALUES (1, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(id) DO UPDATE SET profile_json = excluded.profile_json,
                                           updated_at = CURRENT_TIMESTAMP",
        )
        .bind(profile_json)
        .execute(&self.pool)
        .await
        .context("failed to write session slot")?;
        Ok(())
    }

    /// Returns whether a saved session was removed.
    pub async fn clear_session(&self) -> Result<bool> {
        let result = sqlx::query("DELETE FROM session_slot WHERE id = 1")
            .execute(&self.pool)
            .await
            .context("failed to clear session slot")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_project(&self, project: &NewProject) -> Result<ProjectRecord> {
        let now = Utc::now();
        let keywords_json = serde_json::to_string(&project.keywords)?;
        let tags_json = serde_json::to_string(&project.tags)?;
        let rec = sqlx::query(
            "INSERT INTO projects (user_id, name, description, category, keywords_json, location,
                                   status, content_count, content_goal, timeline, template,
                                   tags_json, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(project.user_id.map(|id| id.0))
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.category)
        .bind(keywords_json)
        .bind(&project.location)
        .bind(ProjectStatus::Active.as_str())
        .bind(i64::from(project.content_goal))
        .bind(&project.timeline)
        .bind(project.template.as_deref())
        .bind(tags_json)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert project")?;

        Ok(ProjectRecord {
            id: ProjectId(rec.get::<i64, _>(0)),
            name: project.name.clone(),
            description: project.description.clone(),
            category: project.category.clone(),
            keywords: project.keywords.clone(),
            location: project.location.clone(),
            status: ProjectStatus::Active,
            content_count: 0,
            content_goal: project.content_goal,
            timeline: project.timeline.clone(),
            template: project.template.clone(),
            tags: project.tags.clone(),
            user_id: project.user_id,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_project(&self, project_id: ProjectId) -> Result<Option<ProjectRecord>> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(project_id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| project_from_row(&row)).transpose()
    }

    /// Projects owned by `user_id`, or every project when no owner is given,
    /// oldest first.
    pub async fn list_projects(&self, user_id: Option<UserId>) -> Result<Vec<ProjectRecord>> {
        let rows = match user_id {
            Some(user_id) => {
                let sql = format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects WHERE user_id = ? ORDER BY id ASC"
                );
                sqlx::query(&sql)
                    .bind(user_id.0)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id ASC");
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };
        rows.iter().map(project_from_row).collect()
    }

    pub async fn update_project_status(
        &self,
        project_id: ProjectId,
        status: ProjectStatus,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE projects SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(project_id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_content_count(&self, project_id: ProjectId) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE projects SET content_count = content_count + 1, updated_at = ? WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(project_id.0)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_project(&self, project_id: ProjectId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(project_id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn project_from_row(row: &SqliteRow) -> Result<ProjectRecord> {
    let keywords_json: String = row.try_get("keywords_json")?;
    let tags_json: String = row.try_get("tags_json")?;
    let status_raw: String = row.try_get("status")?;
    let content_count: i64 = row.try_get("content_count")?;
    let content_goal: i64 = row.try_get("content_goal")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(ProjectRecord {
        id: ProjectId(row.try_get("id")?),
        user_id: row.try_get::<Option<i64>, _>("user_id")?.map(UserId),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        keywords: serde_json::from_str(&keywords_json)
            .context("corrupt keywords column in projects")?,
        location: row.try_get("location")?,
        status: status_raw
            .parse::<ProjectStatus>()
            .context("corrupt status column in projects")?,
        content_count: u32::try_from(content_count).unwrap_or_default(),
        content_goal: u32::try_from(content_goal).unwrap_or_default(),
        timeline: row.try_get("timeline")?,
        template: row.try_get("template")?,
        tags: serde_json::from_str(&tags_json).context("corrupt tags column in projects")?,
        created_at,
        updated_at,
    })
}

pub fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

/// Filesystem path behind a `sqlite:` URL; `None` for in-memory and non-sqlite URLs.
pub fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
