//! Relay settings resolved from CLI flags and environment.

use anyhow::{Result, bail};
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.zeroc.green/v1";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the upstream provider lives and how long we wait for it.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl RelayConfig {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("Invalid upstream base URL '{}': {}", base_url, e))?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            bail!("Upstream base URL must be an http(s) URL, got '{}'", base_url);
        }
        if timeout.is_zero() {
            bail!("Upstream timeout must be greater than zero");
        }

        Ok(Self { base_url, timeout })
    }
}
