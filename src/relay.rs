//! Request-level relay operations shared by the HTTP routes and the CLI.

use serde_json::Value;
use tracing::{debug, info};

use crate::enrich::enrich_station_detail;
use crate::error::UpstreamError;
use crate::services::station_api::StationApi;

/// Station list, passed through verbatim.
pub async fn station_list(api: &dyn StationApi) -> Result<Value, UpstreamError> {
    let body = api.list_stations().await?;
    debug!("Station list relayed");
    Ok(body)
}

/// Station detail with every metric enriched.
///
/// Either the whole enriched document comes back or an error does; a body
/// that fails enrichment halfway is discarded.
pub async fn station_detail(api: &dyn StationApi, station_id: &str) -> Result<Value, UpstreamError> {
    let body = api.station_detail(station_id).await?;
    let enriched = enrich_station_detail(body)?;

    info!(station_id, "Station detail enriched");
    Ok(enriched)
}
