//! Failure types for the upstream relay path.
//!
//! Every variant ends up as a `502` with `{"error": <Display>}` on the HTTP
//! surface, so the messages are written for API consumers.

use std::fmt;

/// Why a station detail body could not be enriched.
#[derive(Debug)]
pub enum EnrichError {
    /// The detail body itself is not a JSON object.
    BodyNotAnObject { found: &'static str },
    /// `metrics` is neither a mapping nor a sequence.
    UnexpectedMetrics { found: &'static str },
    MetricNotAnObject { metric: String, found: &'static str },
    SeriesNotAnArray { metric: String, found: &'static str },
    /// A daily entry failed to decode as a sample.
    Sample {
        metric: String,
        index: usize,
        source: serde_json::Error,
    },
}

impl fmt::Display for EnrichError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrichError::BodyNotAnObject { found } => {
                write!(f, "station detail is a JSON {found}, expected an object")
            }
            EnrichError::UnexpectedMetrics { found } => {
                write!(f, "metrics is a JSON {found}, expected an object or array")
            }
            EnrichError::MetricNotAnObject { metric, found } => {
                write!(f, "metric '{metric}' is a JSON {found}, expected an object")
            }
            EnrichError::SeriesNotAnArray { metric, found } => {
                write!(f, "daily series of metric '{metric}' is a JSON {found}, expected an array")
            }
            EnrichError::Sample {
                metric,
                index,
                source,
            } => write!(f, "metric '{metric}' day {index}: {source}"),
        }
    }
}

impl std::error::Error for EnrichError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnrichError::Sample { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Outcome of a failed call to the upstream station provider.
#[derive(Debug)]
pub enum UpstreamError {
    /// The provider did not answer within the configured timeout.
    Timeout(String),
    /// Connection refused, DNS failure, TLS, ...
    Transport(String),
    /// The provider answered with a non-2xx status.
    Status { status: u16, url: String },
    /// The body was not valid JSON.
    Decode(String),
    /// The body was JSON but not in a shape we can enrich.
    Shape(EnrichError),
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Timeout(msg) => write!(f, "upstream timed out: {msg}"),
            UpstreamError::Transport(msg) => write!(f, "upstream request failed: {msg}"),
            UpstreamError::Status { status, url } => {
                write!(f, "upstream returned status {status} for {url}")
            }
            UpstreamError::Decode(msg) => write!(f, "upstream returned malformed JSON: {msg}"),
            UpstreamError::Shape(e) => write!(f, "unexpected station detail shape: {e}"),
        }
    }
}

impl std::error::Error for UpstreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpstreamError::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout(e.to_string())
        } else if e.is_decode() {
            UpstreamError::Decode(e.to_string())
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }
}

impl From<EnrichError> for UpstreamError {
    fn from(e: EnrichError) -> Self {
        UpstreamError::Shape(e)
    }
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
