//! Client configuration.
//!
//! Defaults are hardcoded constants. At startup they can be overridden
//! from the environment (or a `.env` file) via [`ClientConfig::from_env`].

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Backend base URL used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Path prefix of every campaign endpoint.
pub const API_BASE_PATH: &str = "/email";

/// Timeout for the background recipient sync.
pub const SYNC_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for recipient-file and attachment uploads.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Recipient-file extensions accepted before upload (matched case-insensitively).
pub const RECIPIENT_FILE_EXTENSIONS: [&str; 3] = [".xlsx", ".xls", ".csv"];

/// Environment variable holding the backend URL.
pub const ENV_BACKEND_URL: &str = "BULKMAIL_BACKEND_URL";

/// Environment variable holding the sync timeout in seconds.
pub const ENV_SYNC_TIMEOUT: &str = "BULKMAIL_SYNC_TIMEOUT_SECS";

/// Environment variable holding the upload timeout in seconds.
pub const ENV_UPLOAD_TIMEOUT: &str = "BULKMAIL_UPLOAD_TIMEOUT_SECS";

/// Runtime settings for a campaign session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root, without the `/email` prefix.
    pub backend_url: String,
    /// Recipient sync timeout.
    pub sync_timeout: Duration,
    /// File and attachment upload timeout.
    pub upload_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            sync_timeout: SYNC_TIMEOUT,
            upload_timeout: UPLOAD_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Build a config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try loading .env file
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(url) = env::var(ENV_BACKEND_URL) {
            config = config.with_backend_url(&url)?;
        }
        if let Ok(value) = env::var(ENV_SYNC_TIMEOUT) {
            config.sync_timeout = parse_secs(ENV_SYNC_TIMEOUT, &value)?;
        }
        if let Ok(value) = env::var(ENV_UPLOAD_TIMEOUT) {
            config.upload_timeout = parse_secs(ENV_UPLOAD_TIMEOUT, &value)?;
        }

        Ok(config)
    }

    /// Override the backend URL. A trailing slash is dropped.
    pub fn with_backend_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ConfigError::EmptyBackendUrl);
        }
        self.backend_url = url.to_string();
        Ok(self)
    }

    /// Full URL of a campaign endpoint, e.g. `endpoint("/send")`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.backend_url, API_BASE_PATH, path)
    }

    /// Full URL of a root-level endpoint such as `/health`.
    pub fn root_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.backend_url, path)
    }
}

fn parse_secs(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidNumber { name, value: value.to_string() })
}
