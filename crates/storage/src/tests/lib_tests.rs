use super::*;

fn sample_project(name: &str, user_id: Option<UserId>) -> NewProject {
    NewProject {
        user_id,
        name: name.to_string(),
        description: "Topic cluster for spring launch".to_string(),
        category: "blog".to_string(),
        keywords: vec!["seo automation".to_string(), "content marketing".to_string()],
        location: "US".to_string(),
        content_goal: 12,
        timeline: "3 months".to_string(),
        template: Some("blog".to_string()),
        tags: Vec::new(),
    }
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn session_slot_round_trips_and_clears() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    assert!(storage.load_session_blob().await.expect("load").is_none());

    storage
        .save_session_blob(r#"{"name":"first"}"#)
        .await
        .expect("save");
    storage
        .save_session_blob(r#"{"name":"second"}"#)
        .await
        .expect("overwrite");
    assert_eq!(
        storage.load_session_blob().await.expect("load").as_deref(),
        Some(r#"{"name":"second"}"#)
    );

    assert!(storage.clear_session().await.expect("clear"));
    assert!(!storage.clear_session().await.expect("clear twice"));
    assert!(storage.load_session_blob().await.expect("load").is_none());
}

#[tokio::test]
async fn inserts_and_reads_back_projects() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let created = storage
        .insert_project(&sample_project("Spring launch", Some(UserId(1))))
        .await
        .expect("insert");
    assert_eq!(created.status, ProjectStatus::Active);
    assert_eq!(created.content_count, 0);

    let loaded = storage
        .get_project(created.id)
        .await
        .expect("get")
        .expect("some project");
    assert_eq!(loaded.name, "Spring launch");
    assert_eq!(loaded.keywords.len(), 2);
    assert_eq!(loaded.template.as_deref(), Some("blog"));
    assert_eq!(loaded.user_id, Some(UserId(1)));
}

#[tokio::test]
async fn lists_projects_per_owner() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .insert_project(&sample_project("Mine", Some(UserId(1))))
        .await
        .expect("insert");
    storage
        .insert_project(&sample_project("Theirs", Some(UserId(2))))
        .await
        .expect("insert");

    let mine = storage.list_projects(Some(UserId(1))).await.expect("list");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Mine");

    let all = storage.list_projects(None).await.expect("list all");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn updates_status_and_counters() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let project = storage
        .insert_project(&sample_project("Counter", None))
        .await
        .expect("insert");

    assert!(storage
        .update_project_status(project.id, ProjectStatus::Paused)
        .await
        .expect("status"));
    assert!(storage
        .increment_content_count(project.id)
        .await
        .expect("increment"));

    let loaded = storage
        .get_project(project.id)
        .await
        .expect("get")
        .expect("some project");
    assert_eq!(loaded.status, ProjectStatus::Paused);
    assert_eq!(loaded.content_count, 1);

    assert!(!storage
        .update_project_status(ProjectId(9999), ProjectStatus::Completed)
        .await
        .expect("missing project"));
}

#[tokio::test]
async fn deletes_projects() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let project = storage
        .insert_project(&sample_project("Doomed", None))
        .await
        .expect("insert");
    assert!(storage.delete_project(project.id).await.expect("delete"));
    assert!(storage.get_project(project.id).await.expect("get").is_none());
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("seo_studio_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("storage.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn memory_urls_have_no_file_path() {
    assert!(sqlite_path("sqlite::memory:").is_none());
    assert_eq!(
        sqlite_path("sqlite://./data/app.db?mode=rwc"),
        Some(PathBuf::from("./data/app.db"))
    );
}
