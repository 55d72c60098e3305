use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use crate::config::RelayConfig;
use crate::error::UpstreamError;
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::services::station_api::StationApi;

pub struct ZerocClient<C = BasicClient> {
    base_url: Url,
    http: C,
}

impl ZerocClient<BasicClient> {
    pub fn from_config(config: &RelayConfig) -> anyhow::Result<Self> {
        let http = BasicClient::with_timeout(config.timeout)?;
        Self::with_client(config.base_url.clone(), http)
    }
}

impl<C: HttpClient> ZerocClient<C> {
    /// Fails if `base_url` cannot take extra path segments (`mailto:`, `data:`, ...).
    pub fn with_client(base_url: Url, http: C) -> anyhow::Result<Self> {
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Upstream base URL '{}' cannot have a path appended", base_url);
        }
        Ok(Self { base_url, http })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl<C: HttpClient> StationApi for ZerocClient<C> {
    #[tracing::instrument(skip(self))]
    async fn list_stations(&self) -> Result<Value, UpstreamError> {
        fetch_json(&self.http, self.endpoint(&["stations"])).await
    }

    #[tracing::instrument(skip(self))]
    async fn station_detail(&self, station_id: &str) -> Result<Value, UpstreamError> {
        fetch_json(&self.http, self.endpoint(&["stations", station_id])).await
    }
}
