//! # Response normalization
//!
//! The REST backend is not consistent about payload shapes. Some endpoints wrap
//! their result in a `{ "data": … }` envelope, and the dashboard aggregates come
//! back as any of several chart shapes. This module turns those payloads into
//! what the views consume:
//!
//! - [`unwrap_envelope`] / [`into_unwrapped`] strip the envelope.
//! - [`to_chart_data`] parses a chart payload into [`ChartDatum`]s, trying each
//!   known shape in priority order and reporting which one matched
//!   ([`ChartPayload`]).
//! - [`decode_list`] turns a list payload into typed records, dropping
//!   elements that do not fit.
//!
//! Every function here is pure.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::models::ChartDatum;

/// Return the payload inside a `{ "data": … }` envelope.
///
/// Arrays are returned as-is. Objects with a `data` key yield that field,
/// even when it is `null`. Everything else is returned unchanged.
pub fn unwrap_envelope(payload: &Value) -> &Value {
    match payload {
        Value::Object(map) => map.get("data").unwrap_or(payload),
        _ => payload,
    }
}

/// Owning variant of [`unwrap_envelope`].
pub fn into_unwrapped(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Shape a chart payload was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartShape {
    /// Absent, `null` or an empty array.
    Empty,
    /// `[{ name, value }]`.
    Canonical,
    /// `[{ level, count }]`.
    LevelCount,
    /// `{ "<name>": <value>, … }`.
    KeyedObject,
}

/// Result of parsing a chart payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartPayload {
    Parsed {
        shape: ChartShape,
        data: Vec<ChartDatum>,
    },
    /// No known shape matched. `data` holds the best-effort reading: names from
    /// `name`/`label` (else `"Item N"`), values from `value`/`count` (else 0).
    Unrecognized { data: Vec<ChartDatum> },
}

impl ChartPayload {
    pub fn data(&self) -> &[ChartDatum] {
        match self {
            Self::Parsed { data, .. } | Self::Unrecognized { data } => data,
        }
    }

    pub fn into_data(self) -> Vec<ChartDatum> {
        match self {
            Self::Parsed { data, .. } | Self::Unrecognized { data } => data,
        }
    }

    pub fn shape(&self) -> Option<ChartShape> {
        match self {
            Self::Parsed { shape, .. } => Some(*shape),
            Self::Unrecognized { .. } => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::Parsed { .. })
    }

    fn empty() -> Self {
        Self::Parsed {
            shape: ChartShape::Empty,
            data: Vec::new(),
        }
    }
}

/// Parse a chart payload. Output order follows input order.
pub fn to_chart_data(payload: Option<&Value>) -> ChartPayload {
    match payload {
        None | Some(Value::Null) => ChartPayload::empty(),
        Some(Value::Array(items)) if items.is_empty() => ChartPayload::empty(),
        Some(Value::Array(items)) => parse_array(items),
        Some(Value::Object(map)) => ChartPayload::Parsed {
            shape: ChartShape::KeyedObject,
            data: map
                .iter()
                .map(|(name, value)| ChartDatum::new(name.clone(), coerce_value(Some(value))))
                .collect(),
        },
        Some(other) => {
            tracing::debug!("Chart payload is a scalar, ignoring: {}", other);
            ChartPayload::Unrecognized { data: Vec::new() }
        }
    }
}

fn parse_array(items: &[Value]) -> ChartPayload {
    if all_have(items, "name", "value") {
        return ChartPayload::Parsed {
            shape: ChartShape::Canonical,
            data: items
                .iter()
                .map(|item| datum_from(item, "name", "value"))
                .collect(),
        };
    }
    if all_have(items, "level", "count") {
        return ChartPayload::Parsed {
            shape: ChartShape::LevelCount,
            data: items
                .iter()
                .map(|item| datum_from(item, "level", "count"))
                .collect(),
        };
    }

    tracing::debug!("Chart payload shape not recognised, guessing {} items", items.len());
    let data = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let fields = item.as_object();
            let name = fields
                .and_then(|f| first_present(f, &["name", "label"]))
                .and_then(name_of)
                .unwrap_or_else(|| format!("Item {}", i + 1));
            let value = coerce_value(fields.and_then(|f| first_present(f, &["value", "count"])));
            ChartDatum::new(name, value)
        })
        .collect();
    ChartPayload::Unrecognized { data }
}

fn all_have(items: &[Value], name_key: &str, value_key: &str) -> bool {
    items.iter().all(|item| {
        item.as_object()
            .map(|f| f.contains_key(name_key) && f.contains_key(value_key))
            .unwrap_or(false)
    })
}

fn datum_from(item: &Value, name_key: &str, value_key: &str) -> ChartDatum {
    let name = item.get(name_key).and_then(name_of).unwrap_or_default();
    ChartDatum::new(name, coerce_value(item.get(value_key)))
}

fn first_present<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| fields.get(*k))
        .find(|v| !v.is_null())
}

fn name_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric reading of a chart value. Missing and `null` are 0; numeric
/// strings are parsed; anything else is 0.
fn coerce_value(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                tracing::debug!("Non-numeric chart value {:?}, using 0", s);
                0.0
            }
        },
        Some(other) => {
            tracing::debug!("Non-numeric chart value {}, using 0", other);
            0.0
        }
    }
}

/// Decode a list payload into typed records.
///
/// The envelope is stripped first. A payload that is not an array yields an
/// empty list, and elements that do not decode as `T` are skipped.
pub fn decode_list<T: DeserializeOwned>(payload: Value) -> Vec<T> {
    match into_unwrapped(payload) {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping malformed record: {}", e);
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            tracing::warn!("Expected a list payload, got {}", type_name(&other));
            Vec::new()
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
