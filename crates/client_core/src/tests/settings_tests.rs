use super::*;
use std::path::PathBuf;

fn temp_dir(label: &str) -> PathBuf {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("seo_studio_{label}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    dir
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings =
        load_settings_from(Path::new("/definitely/not/here/studio.toml"), no_env).expect("load");
    assert_eq!(settings, Settings::default());
    let schedule = settings.progress_schedule().expect("schedule");
    assert_eq!(schedule, ProgressSchedule::default());
}

#[test]
fn file_values_override_defaults_and_env_overrides_file() {
    let dir = temp_dir("settings_layers");
    let path = dir.join("studio.toml");
    fs::write(
        &path,
        "database_url = \"sqlite://./from-file.db\"\nprogress_total_ms = 4000\nauth_delay_ms = 0\n",
    )
    .expect("write");

    let settings = load_settings_from(&path, |key| match key {
        "APP__PROGRESS_TOTAL_MS" => Some("2000".to_string()),
        "APP__SUBMIT_DELAY_MS" => Some(" 250 ".to_string()),
        _ => None,
    })
    .expect("load");

    assert_eq!(settings.database_url, "sqlite://./from-file.db");
    assert_eq!(settings.progress_total_ms, 2000);
    assert_eq!(settings.auth_delay(), Duration::ZERO);
    assert_eq!(settings.submit_delay(), Duration::from_millis(250));

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn app_prefixed_database_url_wins() {
    let settings = load_settings_from(Path::new("missing.toml"), |key| match key {
        "DATABASE_URL" => Some("sqlite://plain.db".to_string()),
        "APP__DATABASE_URL" => Some("sqlite::memory:".to_string()),
        _ => None,
    })
    .expect("load");
    assert_eq!(settings.database_url, "sqlite::memory:");
}

#[test]
fn malformed_values_are_reported() {
    let err = load_settings_from(Path::new("missing.toml"), |key| {
        (key == "APP__PROGRESS_TICK_MS").then(|| "fast".to_string())
    })
    .expect_err("bad number");
    assert!(matches!(
        err,
        SettingsError::InvalidValue {
            key: "progress_tick_ms",
            ..
        }
    ));

    let err = load_settings_from(Path::new("missing.toml"), |key| {
        (key == "APP__PROGRESS_TICK_MS").then(|| "0".to_string())
    })
    .expect_err("zero tick");
    assert!(matches!(err, SettingsError::InvalidValue { .. }));

    let dir = temp_dir("settings_bad_file");
    let path = dir.join("studio.toml");
    fs::write(&path, "progress_total_ms = \"soon\"").expect("write");
    assert!(matches!(
        load_settings_from(&path, no_env),
        Err(SettingsError::InvalidValue { .. })
    ));
    fs::write(&path, "this is = = not toml").expect("write");
    assert!(matches!(
        load_settings_from(&path, no_env),
        Err(SettingsError::Parse { .. })
    ));
    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn normalizes_database_urls() {
    assert_eq!(normalize_database_url(""), DEFAULT_DATABASE_URL);
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(normalize_database_url("sqlite:data/app.db"), "sqlite://data/app.db");
    assert_eq!(normalize_database_url(r"data\app.db"), "sqlite://data/app.db");
    assert_eq!(
        normalize_database_url("sqlite://./data/app.db"),
        "sqlite://./data/app.db"
    );
}

#[test]
fn prepare_creates_parent_directory() {
    let dir = temp_dir("settings_prepare");
    let db_path = dir.join("nested").join("studio.db");
    let raw = db_path.to_string_lossy().replace('\\', "/");

    let url = prepare_database_url(&raw).expect("prepare");
    assert!(url.starts_with("sqlite://"));
    assert!(dir.join("nested").is_dir());

    fs::remove_dir_all(dir).expect("cleanup");
}
