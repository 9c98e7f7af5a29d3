use super::*;

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_settings_dir(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("clone_ai_config_{label}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    dir
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_point_at_local_backend() {
    let settings = load_settings_from(Path::new("does/not/exist.toml"), env_from(&[]));
    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.server_url, "http://127.0.0.1:8000");
    assert_eq!(settings.request_timeout, None);
    assert_eq!(settings.answer_fallback, AnswerFallback::NoData);
}

#[test]
fn file_values_apply_then_environment_overrides() {
    let dir = temp_settings_dir("layering");
    let path = dir.join(SETTINGS_FILE);
    fs::write(
        &path,
        r#"
server_url = "http://10.0.0.5:9000/"
request_timeout_secs = 15
answer_fallback = "no-response"
"#,
    )
    .expect("write settings");

    let from_file = load_settings_from(&path, env_from(&[]));
    assert_eq!(from_file.server_url, "http://10.0.0.5:9000");
    assert_eq!(from_file.request_timeout, Some(Duration::from_secs(15)));
    assert_eq!(from_file.answer_fallback, AnswerFallback::NoResponse);

    let overridden = load_settings_from(
        &path,
        env_from(&[
            ("CLONE_AI_SERVER_URL", "http://ignored.example:1"),
            ("APP__SERVER_URL", "https://assistant.example"),
            ("APP__REQUEST_TIMEOUT_SECS", "0"),
            ("APP__ANSWER_FALLBACK", "no_data"),
        ]),
    );
    assert_eq!(overridden.server_url, "https://assistant.example");
    assert_eq!(overridden.request_timeout, None);
    assert_eq!(overridden.answer_fallback, AnswerFallback::NoData);

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn unparsable_values_are_ignored() {
    let settings = load_settings_from(
        Path::new("does/not/exist.toml"),
        env_from(&[
            ("APP__SERVER_URL", "ftp://files.example"),
            ("APP__REQUEST_TIMEOUT_SECS", "soon"),
            ("APP__ANSWER_FALLBACK", "shrug"),
        ]),
    );
    assert_eq!(settings, ClientSettings::default());
}

#[test]
fn malformed_settings_file_falls_back_to_defaults() {
    let dir = temp_settings_dir("malformed");
    let path = dir.join(SETTINGS_FILE);
    fs::write(&path, "server_url = [not toml").expect("write settings");

    assert_eq!(
        load_settings_from(&path, env_from(&[])),
        ClientSettings::default()
    );

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn normalize_server_url_rejects_empty_and_non_http() {
    assert_eq!(normalize_server_url("   "), Err(ConfigError::EmptyServerUrl));
    assert!(matches!(
        normalize_server_url("not a url"),
        Err(ConfigError::InvalidServerUrl { .. })
    ));
    assert!(matches!(
        normalize_server_url("ws://127.0.0.1:8000"),
        Err(ConfigError::InvalidServerUrl { .. })
    ));
    assert_eq!(
        normalize_server_url(" http://127.0.0.1:8000// ").as_deref(),
        Ok("http://127.0.0.1:8000")
    );
}
