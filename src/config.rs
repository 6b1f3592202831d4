use anyhow::{anyhow, Result};
use std::env;

use crate::services::webdav::config::{WebDAVConfig, DEFAULT_USER_AGENT};

/// Settings for the `davfs` binary, read from the environment (and `.env`).
///
/// The library never reads the environment itself; embedders build a
/// [`WebDAVConfig`] directly.
#[derive(Clone, Debug)]
pub struct Config {
    pub root_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            root_url: env::var("WEBDAV_ROOT_URL").ok().filter(|s| !s.trim().is_empty()),
            timeout_seconds: env::var("WEBDAV_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok()),
            user_agent: env::var("WEBDAV_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        })
    }

    /// Builds the transport configuration. `root_override` (e.g. from the
    /// command line) wins over `WEBDAV_ROOT_URL`.
    pub fn webdav_config(&self, root_override: Option<&str>) -> Result<WebDAVConfig> {
        let root_url = root_override
            .map(str::to_string)
            .or_else(|| self.root_url.clone())
            .ok_or_else(|| anyhow!("No root URL given; pass --root or set WEBDAV_ROOT_URL"))?;

        let config = WebDAVConfig {
            root_url,
            timeout_seconds: self.timeout_seconds,
            user_agent: self.user_agent.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root_url: Option<&str>) -> Config {
        Config {
            root_url: root_url.map(str::to_string),
            timeout_seconds: Some(10),
            user_agent: "agent/1.0".to_string(),
        }
    }

    #[test]
    fn test_override_wins() {
        let webdav = config(Some("http://env/dav/"))
            .webdav_config(Some("http://cli/dav/"))
            .unwrap();
        assert_eq!(webdav.root_url, "http://cli/dav/");
        assert_eq!(webdav.timeout_seconds, Some(10));
        assert_eq!(webdav.user_agent, "agent/1.0");
    }

    #[test]
    fn test_falls_back_to_env_root() {
        let webdav = config(Some("http://env/dav/")).webdav_config(None).unwrap();
        assert_eq!(webdav.root_url, "http://env/dav/");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        assert!(config(None).webdav_config(None).is_err());
        assert!(config(None).webdav_config(Some("ftp://nope/")).is_err());
    }
}
