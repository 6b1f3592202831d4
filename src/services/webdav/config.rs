use std::time::Duration;

use crate::errors::{Result, WebDavError};

pub const DEFAULT_USER_AGENT: &str = concat!("webdav-fs/", env!("CARGO_PKG_VERSION"));

/// WebDAV transport configuration
#[derive(Debug, Clone)]
pub struct WebDAVConfig {
    /// Root URL every relative href is appended to, e.g. `http://host/dav/`
    pub root_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

impl WebDAVConfig {
    /// Creates a new WebDAV configuration
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            timeout_seconds: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.root_url.is_empty() {
            return Err(WebDavError::invalid_config("Root URL cannot be empty"));
        }

        let parsed = url::Url::parse(&self.root_url)
            .map_err(|e| WebDavError::invalid_config(format!("Invalid root URL '{}': {}", self.root_url, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(WebDavError::invalid_config("Root URL must start with http:// or https://"));
        }

        if self.timeout_seconds == Some(0) {
            return Err(WebDavError::invalid_config("Timeout must be greater than zero"));
        }

        Ok(())
    }

    /// Gets the timeout duration, if one was configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}
