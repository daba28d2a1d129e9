use serde::Deserialize;

use crate::error::AppError;
use crate::types::EntityType;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the mentorship REST API, without trailing slash
    pub api_url: String,

    /// Bearer token of the signed-in account
    pub api_token: String,

    /// Whether the signed-in account is a user or a mentor
    pub auth_type: EntityType,

    /// Request-status polling interval in milliseconds (default: 5000)
    pub poll_interval_ms: u64,

    /// Per-request HTTP timeout in milliseconds (default: 10000)
    pub http_timeout_ms: u64,

    /// Buffered notifier events per subscriber before the slowest one lags (default: 64)
    pub event_capacity: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Missing or malformed values are reported as [`AppError::Config`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_url = lookup("MENTOR_API_URL")
            .unwrap_or_else(|| "http://localhost:8000/api".to_string())
            .trim_end_matches('/')
            .to_string();

        let api_token = lookup("MENTOR_API_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| invalid("MENTOR_API_TOKEN environment variable is required"))?;

        let auth_type = lookup("MENTOR_AUTH_TYPE")
            .unwrap_or_else(|| "user".to_string())
            .parse()
            .map_err(|e| invalid(format!("MENTOR_AUTH_TYPE must be 'user' or 'mentor': {e}")))?;

        let poll_interval_ms: u64 = lookup("NOTIFIER_POLL_INTERVAL_MS")
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .map_err(|_| invalid("NOTIFIER_POLL_INTERVAL_MS must be a valid u64"))?;
        if poll_interval_ms == 0 {
            return Err(invalid("NOTIFIER_POLL_INTERVAL_MS must be greater than zero"));
        }

        let http_timeout_ms = lookup("HTTP_TIMEOUT_MS")
            .unwrap_or_else(|| "10000".to_string())
            .parse()
            .map_err(|_| invalid("HTTP_TIMEOUT_MS must be a valid u64"))?;

        let event_capacity: usize = lookup("NOTIFIER_EVENT_CAPACITY")
            .unwrap_or_else(|| "64".to_string())
            .parse()
            .map_err(|_| invalid("NOTIFIER_EVENT_CAPACITY must be a valid usize"))?;
        if event_capacity == 0 {
            return Err(invalid("NOTIFIER_EVENT_CAPACITY must be greater than zero"));
        }

        Ok(Self {
            api_url,
            api_token,
            auth_type,
            poll_interval_ms,
            http_timeout_ms,
            event_capacity,
        })
    }
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Config(message.into())
}
