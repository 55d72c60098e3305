//! HTTP surface: `/api/stations` and `/api/stations/{station_id}`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::UpstreamError;
use crate::relay;
use crate::services::station_api::StationApi;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    api: Arc<dyn StationApi>,
}

impl AppState {
    pub fn new(api: impl StationApi + 'static) -> Self {
        Self { api: Arc::new(api) }
    }
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::BAD_GATEWAY, body).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/stations", get(list_stations))
        .route("/api/stations/{station_id}", get(station_detail))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_stations(State(state): State<AppState>) -> Result<Json<Value>, UpstreamError> {
    let body = relay::station_list(state.api.as_ref())
        .await
        .inspect_err(|e| warn!(error = %e, "Station list relay failed"))?;
    Ok(Json(body))
}

async fn station_detail(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> Result<Json<Value>, UpstreamError> {
    let body = relay::station_detail(state.api.as_ref(), &station_id)
        .await
        .inspect_err(|e| warn!(station_id = %station_id, error = %e, "Station detail relay failed"))?;
    Ok(Json(body))
}

/// Serves the relay on `listener` until Ctrl+C.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    info!(addr = %listener.local_addr()?, "Relay listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler, run until the process is killed.
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
