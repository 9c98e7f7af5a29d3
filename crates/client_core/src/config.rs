use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::controller::AnswerFallback;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const SETTINGS_FILE: &str = "clone_ai.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub request_timeout: Option<Duration>,
    pub answer_fallback: AnswerFallback,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            request_timeout: None,
            answer_fallback: AnswerFallback::NoData,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("server url is empty")]
    EmptyServerUrl,
    #[error("invalid server url '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    answer_fallback: Option<String>,
}

/// Defaults, then `clone_ai.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from<F>(path: &Path, env: F) -> ClientSettings
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.server_url {
                    settings.apply_server_url(&v);
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout = timeout_from_secs(v);
                }
                if let Some(v) = file_cfg.answer_fallback {
                    settings.apply_answer_fallback(&v);
                }
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable settings file");
            }
        }
    }

    if let Some(v) = env("CLONE_AI_SERVER_URL") {
        settings.apply_server_url(&v);
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.apply_server_url(&v);
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout = timeout_from_secs(parsed),
            Err(err) => warn!(value = %v, error = %err, "ignoring APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    if let Some(v) = env("APP__ANSWER_FALLBACK") {
        settings.apply_answer_fallback(&v);
    }

    settings
}

impl ClientSettings {
    fn apply_server_url(&mut self, raw: &str) {
        match normalize_server_url(raw) {
            Ok(url) => self.server_url = url,
            Err(err) => warn!(error = %err, "keeping server url {}", self.server_url),
        }
    }

    fn apply_answer_fallback(&mut self, raw: &str) {
        match raw.parse::<AnswerFallback>() {
            Ok(fallback) => self.answer_fallback = fallback,
            Err(err) => warn!(error = %err, "keeping answer fallback {:?}", self.answer_fallback),
        }
    }
}

/// Validates an http(s) base url and strips trailing slashes so endpoint
/// paths can be appended directly.
pub fn normalize_server_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyServerUrl);
    }

    let parsed = Url::parse(trimmed).map_err(|err| ConfigError::InvalidServerUrl {
        url: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidServerUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
