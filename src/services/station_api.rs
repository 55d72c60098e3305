//! Trait for reaching an air-quality station provider.

use serde_json::Value;

use crate::error::UpstreamError;

/// Abstraction over the upstream station provider.
///
/// Bodies come back as raw JSON; the relay passes the list through verbatim
/// and only reshapes the detail document.
#[async_trait::async_trait]
pub trait StationApi: Send + Sync {
    /// Returns the provider's station list document.
    async fn list_stations(&self) -> Result<Value, UpstreamError>;

    /// Returns the provider's detail document for one station.
    async fn station_detail(&self, station_id: &str) -> Result<Value, UpstreamError>;
}
