//! Forgiving field decoders for server-owned records.
//!
//! Directory and catalog payloads come from more than one backend and are not
//! strict about types: counts arrive as `2` or `"2"`, names as `null`. A field
//! that does not fit falls back to its default instead of failing the whole
//! record (and with it the whole list).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::RecordId;

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn count_of(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
        }
        _ => None,
    }
}

/// Text, with numbers and booleans rendered; anything else is empty.
pub(crate) fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(text_of(Value::deserialize(d)?).unwrap_or_default())
}

pub(crate) fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(text_of(Value::deserialize(d)?))
}

/// Non-negative count from a number or numeric string.
pub(crate) fn opt_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(count_of(&Value::deserialize(d)?))
}

pub(crate) fn opt_score<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
    Ok(count_of(&Value::deserialize(d)?).and_then(|n| u8::try_from(n).ok()))
}

pub(crate) fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<RecordId>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_i64().map(RecordId::Number),
        Value::String(s) if !s.is_empty() => Some(RecordId::Text(s)),
        _ => None,
    })
}

/// Any nested record; `None` when it does not decode.
pub(crate) fn opt<'de, D: Deserializer<'de>, T: DeserializeOwned>(
    d: D,
) -> Result<Option<T>, D::Error> {
    Ok(serde_json::from_value(Value::deserialize(d)?).ok())
}

/// Array of nested records, skipping elements that do not decode.
pub(crate) fn list<'de, D: Deserializer<'de>, T: DeserializeOwned>(
    d: D,
) -> Result<Vec<T>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counts() {
        assert_eq!(count_of(&json!(4)), Some(4));
        assert_eq!(count_of(&json!("12")), Some(12));
        assert_eq!(count_of(&json!(" 2.0 ")), Some(2));
        assert_eq!(count_of(&json!(-1)), None);
        assert_eq!(count_of(&json!("many")), None);
        assert_eq!(count_of(&Value::Null), None);
    }

    #[test]
    fn test_text() {
        assert_eq!(text_of(json!("Rust")).as_deref(), Some("Rust"));
        assert_eq!(text_of(json!(7)).as_deref(), Some("7"));
        assert_eq!(text_of(Value::Null), None);
        assert_eq!(text_of(json!(["a"])), None);
    }
}
