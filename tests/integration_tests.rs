use airq_relay::error::UpstreamError;
use airq_relay::server::{AppState, router};
use airq_relay::services::station_api::StationApi;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`

/// Serves canned documents, or fails every call with a timeout.
struct FakeApi {
    timeout: bool,
}

#[async_trait::async_trait]
impl StationApi for FakeApi {
    async fn list_stations(&self) -> Result<Value, UpstreamError> {
        if self.timeout {
            return Err(UpstreamError::Timeout("operation timed out".into()));
        }
        Ok(json!({"stations": [{"id": "IT0953A", "name": "Roma - Villa Ada"}]}))
    }

    async fn station_detail(&self, station_id: &str) -> Result<Value, UpstreamError> {
        if self.timeout {
            return Err(UpstreamError::Timeout("operation timed out".into()));
        }
        Ok(json!({
            "id": station_id,
            "metrics": {
                "pm25": {"daily": [{"average": 10, "sample_size": 5}, {"average": 20, "sample_size": 5}]},
                "no2": {"days": [{"average": 10, "sample_size": 0}, {"average": null, "sample_size": 5}]},
                "o3": {"unit": "ug/m3"}
            }
        }))
    }
}

async fn get(uri: &str, timeout: bool) -> (StatusCode, Value) {
    let app = router(AppState::new(FakeApi { timeout }));
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_station_list_passes_through() {
    let (status, body) = get("/api/stations", false).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"stations": [{"id": "IT0953A", "name": "Roma - Villa Ada"}]})
    );
}

#[tokio::test]
async fn test_station_detail_is_enriched() {
    let (status, body) = get("/api/stations/IT0953A", false).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "IT0953A");

    let metrics = &body["metrics"];
    assert_eq!(metrics["pm25"]["weighted_average_last7"], json!(15.0));
    assert_eq!(metrics["no2"]["weighted_average_last7"], Value::Null);
    assert_eq!(metrics["no2"]["daily"].as_array().unwrap().len(), 2);
    assert_eq!(metrics["o3"]["daily"], json!([]));
    assert_eq!(metrics["o3"]["weighted_average_last7"], Value::Null);
}

#[tokio::test]
async fn test_timeouts_become_bad_gateway() {
    for uri in ["/api/stations", "/api/stations/IT0953A"] {
        let (status, body) = get(uri, true).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY, "{uri}");
        assert!(body["error"].as_str().unwrap().contains("timed out"), "{uri}");
    }
}

#[tokio::test]
async fn test_any_origin_allowed() {
    let app = router(AppState::new(FakeApi { timeout: false }));
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/stations")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = router(AppState::new(FakeApi { timeout: false }));
    let resp = app
        .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
