//! Client configuration.

use std::time::Duration;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin of the API server; paths such as `/api/tanks` are joined to it.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Read `SPBU_API_URL` and `SPBU_API_TIMEOUT_SECS`, falling back to the
    /// defaults for unset variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let mut config = Self::default();
        if let Some(url) = var("SPBU_API_URL").filter(|u| !u.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(secs) = var("SPBU_API_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClientError::Config(format!("SPBU_API_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
