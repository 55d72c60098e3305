mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::error::UpstreamError;

/// GETs `url` and decodes the body as JSON.
///
/// Non-2xx responses are an error; the body of a failed response is not read.
pub async fn fetch_json<C: HttpClient + ?Sized>(client: &C, url: Url) -> Result<Value, UpstreamError> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();

    if !status.is_success() {
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            url: resp.url().to_string(),
        });
    }

    let body: Value = resp.json().await?;
    debug!(status = status.as_u16(), "Upstream body decoded");
    Ok(body)
}
