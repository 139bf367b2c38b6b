//! Provenance envelope merged into successful proxy responses.
//!
//! The `_proxy` field is additive: it is inserted next to the upstream's own
//! keys and only replaces an existing `_proxy` key. Consumers strip it with
//! [`strip`] to get back the upstream's native payload.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which provenance metadata is stored.
pub const ENVELOPE_KEY: &str = "_proxy";

/// Provenance metadata describing the proxy hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyMetadata {
    pub service: String,
    pub timestamp: String,
    pub original_url: String,
    pub status: String,
}

impl ProxyMetadata {
    pub fn success(service: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            timestamp: iso_timestamp(),
            original_url: original_url.into(),
            status: "success".to_string(),
        }
    }
}

/// Current UTC time as ISO-8601 with millisecond precision (`...T12:00:00.000Z`).
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Merge `metadata` into the upstream body.
///
/// Objects keep all their keys. Arrays and strings are spread into
/// index-keyed entries; other scalars contribute no keys.
pub fn wrap(body: Value, metadata: &ProxyMetadata) -> Value {
    let mut map = spread(body);
    // ProxyMetadata only holds strings, serialization cannot fail.
    let meta = serde_json::to_value(metadata).unwrap_or(Value::Null);
    // An upstream `_proxy` would otherwise keep its position.
    map.shift_remove(ENVELOPE_KEY);
    map.insert(ENVELOPE_KEY.to_string(), meta);
    Value::Object(map)
}

/// Remove the envelope from a payload, returning the metadata if present.
///
/// The remaining keys keep their original order.
pub fn strip(body: &mut Value) -> Option<ProxyMetadata> {
    let removed = body.as_object_mut()?.shift_remove(ENVELOPE_KEY)?;
    serde_json::from_value(removed).ok()
}

fn spread(body: Value) -> Map<String, Value> {
    match body {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Value::String(s) => s
            .chars()
            .enumerate()
            .map(|(i, c)| (i.to_string(), Value::String(c.to_string())))
            .collect(),
        Value::Null | Value::Bool(_) | Value::Number(_) => Map::new(),
    }
}
