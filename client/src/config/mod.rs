//! Central module for client-wide configuration settings.
//!
//! This module handles loading the backend base URL, the location of the
//! persisted session file and HTTP timeouts from the environment.

use anyhow::{Context, Result, bail};
use expanduser::expanduser;
use reqwest::Url;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_SESSION_FILE: &str = "~/.campusconnect/session.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub session_file: PathBuf,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Config {
    /// Builds a configuration for the given backend with default tunables.
    pub fn new(api_base_url: &str) -> Result<Self> {
        Ok(Config {
            api_base_url: parse_base_url(api_base_url)?,
            session_file: expanduser(DEFAULT_SESSION_FILE)
                .context("Could not expand default session file path")?,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        })
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("CAMPUSCONNECT_API_URL")
            .or_else(|_| env::var("VITE_API_BASE_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_base_url = parse_base_url(&api_base_url)?;

        let session_file = env::var("CAMPUSCONNECT_SESSION_FILE")
            .unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_string());
        let session_file =
            expanduser(&session_file).context("CAMPUSCONNECT_SESSION_FILE must be a valid path")?;

        let request_timeout = env::var("HTTP_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("HTTP_TIMEOUT_SECONDS must be a valid number")?;

        let connect_timeout = env::var("HTTP_CONNECT_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .context("HTTP_CONNECT_TIMEOUT_SECONDS must be a valid number")?;

        Ok(Config {
            api_base_url,
            session_file,
            request_timeout: Duration::from_secs(request_timeout),
            connect_timeout: Duration::from_secs(connect_timeout),
        })
    }
}

/// Parses the backend URL, accepting only http(s).
///
/// A trailing slash is enforced so that joining `api/...` paths keeps any
/// path prefix the deployment mounts the API under.
fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    let url = Url::parse(&normalized)
        .with_context(|| format!("API base URL '{}' is not a valid URL", trimmed))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("API base URL must use http or https, got '{}'", other),
    }
}
