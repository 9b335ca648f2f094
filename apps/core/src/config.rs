//! Runtime configuration.
//!
//! Read from environment variables (optionally seeded from a `.env` file) and
//! validated once at startup.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use url::Url;
use validator::Validate;

use crate::catalog::spotify::{SpotifyCredentials, DEFAULT_API_URL, DEFAULT_AUTH_URL};
use crate::error::AppError;
use crate::fs_manager::PortablePathManager;
use crate::models::DEFAULT_PLAYLIST_SIZE;

pub const MODEL_PATH_ENV: &str = "VIBECURATOR_MODEL_PATH";
pub const PLAYLIST_SIZE_ENV: &str = "VIBECURATOR_PLAYLIST_SIZE";
pub const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";
pub const API_URL_ENV: &str = "SPOTIFY_API_URL";
pub const AUTH_URL_ENV: &str = "SPOTIFY_AUTH_URL";
pub const CATALOG_TIMEOUT_ENV: &str = "CATALOG_TIMEOUT_SECS";
pub const CATALOG_CONCURRENCY_ENV: &str = "CATALOG_CONCURRENCY";
pub const REQUEST_TIMEOUT_ENV: &str = "REQUEST_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Log output style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// Bunyan-style JSON lines
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "{} must be 'pretty' or 'json', got '{}'",
                LOG_FORMAT_ENV, other
            ))),
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    pub model_path: PathBuf,
    #[validate(range(min = 10, max = 50))]
    pub playlist_size: usize,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_api_url: Url,
    pub spotify_auth_url: Url,
    #[validate(range(min = 1, max = 120))]
    pub catalog_timeout_secs: u64,
    #[validate(range(min = 1, max = 16))]
    pub catalog_concurrency: usize,
    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load `.env` (if any) then read the environment
    pub fn load() -> Result<Self, AppError> {
        if let Ok(path) = dotenv::dotenv() {
            debug!("Loaded environment from {:?}", path);
        }
        Self::from_env()
    }

    /// Read and validate configuration from the process environment
    pub fn from_env() -> Result<Self, AppError> {
        let config = Self {
            model_path: optional(MODEL_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(PortablePathManager::default_model_path),
            playlist_size: parse_or(PLAYLIST_SIZE_ENV, DEFAULT_PLAYLIST_SIZE)?,
            spotify_client_id: optional(CLIENT_ID_ENV),
            spotify_client_secret: optional(CLIENT_SECRET_ENV),
            spotify_api_url: Url::parse(&optional(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string()))?,
            spotify_auth_url: Url::parse(&optional(AUTH_URL_ENV).unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()))?,
            catalog_timeout_secs: parse_or(CATALOG_TIMEOUT_ENV, 10)?,
            catalog_concurrency: parse_or(CATALOG_CONCURRENCY_ENV, 4)?,
            request_timeout_secs: parse_or(REQUEST_TIMEOUT_ENV, 60)?,
            log_format: optional(LOG_FORMAT_ENV)
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Both halves of the client credentials, or nothing
    pub fn spotify_credentials(&self) -> Option<SpotifyCredentials> {
        match (&self.spotify_client_id, &self.spotify_client_secret) {
            (Some(id), Some(secret)) => Some(SpotifyCredentials {
                client_id: id.clone(),
                client_secret: secret.clone(),
            }),
            _ => None,
        }
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// A set, non-blank variable
fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match optional(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}
