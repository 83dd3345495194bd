//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_FILE_NAME: &str = ".clinic-session.json";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API base URL {0:?}: expected an http:// or https:// URL")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Whole-request timeout; `None` waits for as long as the server takes.
    pub request_secs: Option<u64>,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: None, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CLINIC_API_BASE_URL`: default `http://localhost:5000/api`
    /// - `CLINIC_SESSION_FILE`: default `$HOME/.clinic/session.json`
    /// - `CLINIC_REQUEST_TIMEOUT_SECS`: unset means no request timeout
    /// - `CLINIC_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("CLINIC_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned());
        let session_file = std::env::var_os("CLINIC_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(default_session_file);
        let timeouts = Timeouts {
            request_secs: env_parse_u64("CLINIC_REQUEST_TIMEOUT_SECS"),
            connect_secs: env_parse_u64("CLINIC_CONNECT_TIMEOUT_SECS").unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Self { api_base_url, session_file, timeouts }.validated()
    }

    /// Replace the base URL, e.g. from a command-line flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the new base URL is not an http(s) URL.
    pub fn with_api_base_url(self, api_base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self { api_base_url: api_base_url.into(), ..self }.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(&self.api_base_url)?;
        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn default_session_file() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(".clinic").join("session.json"),
        _ => PathBuf::from(DEFAULT_SESSION_FILE_NAME),
    }
}

fn env_parse_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<u64>().ok())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
