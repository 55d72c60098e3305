//! Station detail enrichment.
//!
//! The provider sends a station's metrics either as a mapping keyed by metric
//! id or as an array of metric documents. Both are flattened into one ordered
//! list of [`MetricEntry`] before any series work happens, then put back in
//! the shape they arrived in.

use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::aggregate::{DailySample, weighted_average_last7};
use crate::error::{EnrichError, json_kind};

pub const METRICS_FIELD: &str = "metrics";
/// Canonical series field, always present after enrichment.
pub const DAILY_FIELD: &str = "daily";
/// Older series field name, used when `daily` is missing.
pub const DAYS_FIELD: &str = "days";
pub const NAME_FIELD: &str = "name";
pub const WEIGHTED_AVERAGE_FIELD: &str = "weighted_average_last7";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsShape {
    /// `{"pm25": {...}, "no2": {...}}`
    Mapping,
    /// `[{"name": "pm25", ...}, {...}]`
    Sequence,
}

/// A metric document paired with its identifier.
///
/// For sequence-shaped metrics without a `name`, the identifier is the
/// entry's position. That id only holds as long as the provider keeps its
/// ordering stable between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEntry {
    pub id: String,
    pub document: Map<String, Value>,
}

/// Splits a `metrics` value into its shape and ordered entries.
pub fn normalize_metrics(metrics: Value) -> Result<(MetricsShape, Vec<MetricEntry>), EnrichError> {
    match metrics {
        Value::Object(map) => {
            let entries = map
                .into_iter()
                .map(|(id, doc)| match doc {
                    Value::Object(document) => Ok(MetricEntry { id, document }),
                    other => Err(EnrichError::MetricNotAnObject {
                        metric: id,
                        found: json_kind(&other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((MetricsShape::Mapping, entries))
        }
        Value::Array(items) => {
            let entries = items
                .into_iter()
                .enumerate()
                .map(|(index, doc)| match doc {
                    Value::Object(document) => Ok(MetricEntry {
                        id: sequence_id(&document, index),
                        document,
                    }),
                    other => Err(EnrichError::MetricNotAnObject {
                        metric: index.to_string(),
                        found: json_kind(&other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((MetricsShape::Sequence, entries))
        }
        other => Err(EnrichError::UnexpectedMetrics {
            found: json_kind(&other),
        }),
    }
}

fn sequence_id(document: &Map<String, Value>, index: usize) -> String {
    match document.get(NAME_FIELD) {
        Some(Value::String(name)) => name.clone(),
        Some(Value::Null) | None => index.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Inverse of [`normalize_metrics`].
pub fn reassemble(shape: MetricsShape, entries: Vec<MetricEntry>) -> Value {
    match shape {
        MetricsShape::Mapping => Value::Object(
            entries
                .into_iter()
                .map(|e| (e.id, Value::Object(e.document)))
                .collect(),
        ),
        MetricsShape::Sequence => Value::Array(
            entries
                .into_iter()
                .map(|e| Value::Object(e.document))
                .collect(),
        ),
    }
}

/// Picks the series for a metric document: `daily`, then `days`, then empty.
fn resolve_series(document: &Map<String, Value>) -> Value {
    [DAILY_FIELD, DAYS_FIELD]
        .iter()
        .filter_map(|field| document.get(*field))
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()))
}

/// Writes the resolved series under `daily` and attaches its weighted average.
pub fn enrich_metric(entry: &mut MetricEntry) -> Result<Option<f64>, EnrichError> {
    let series = resolve_series(&entry.document);

    let Value::Array(days) = &series else {
        return Err(EnrichError::SeriesNotAnArray {
            metric: entry.id.clone(),
            found: json_kind(&series),
        });
    };

    let samples = days
        .iter()
        .enumerate()
        .map(|(index, day)| {
            DailySample::deserialize(day).map_err(|source| EnrichError::Sample {
                metric: entry.id.clone(),
                index,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let average = weighted_average_last7(&samples);

    debug!(
        metric = %entry.id,
        days = samples.len(),
        weighted_average = ?average,
        "Metric enriched"
    );

    entry.document.insert(DAILY_FIELD.to_string(), series);
    entry
        .document
        .insert(WEIGHTED_AVERAGE_FIELD.to_string(), json!(average));

    Ok(average)
}

/// Enriches every metric of a station detail body.
///
/// A missing or `null` `metrics` is treated as an empty collection and
/// comes back as `{}`.
pub fn enrich_station_detail(body: Value) -> Result<Value, EnrichError> {
    let Value::Object(mut root) = body else {
        return Err(EnrichError::BodyNotAnObject {
            found: json_kind(&body),
        });
    };

    let slot = root
        .entry(METRICS_FIELD)
        .or_insert_with(|| Value::Object(Map::new()));

    if slot.is_null() {
        debug!("Station detail has no metrics to enrich");
        *slot = Value::Object(Map::new());
    }

    let (shape, mut entries) = normalize_metrics(std::mem::take(slot))?;
    for entry in &mut entries {
        enrich_metric(entry)?;
    }
    *slot = reassemble(shape, entries);

    Ok(Value::Object(root))
}
