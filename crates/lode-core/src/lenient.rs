//! Lenient decoders for retrieval payload fields.
//!
//! The retrieval service is asked for numbers but routinely returns strings
//! such as `"$1,200"`, `"12%"` or `"approx. 830"`. These helpers accept any
//! JSON scalar and yield `None` (or `NaN` inside lists) when no number can be
//! recovered, leaving the decision to the validator instead of failing the
//! whole parse.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a numeric string. Currency symbols, thousands separators and a
/// leading `~`/`approx.` are ignored; a trailing `%` divides by 100.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let mut s = raw.trim().to_ascii_lowercase();
    for prefix in ["approx.", "approx", "~", "≈"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim().to_string();
        }
    }
    let percent = s.ends_with('%');
    let cleaned: String = s
        .trim_end_matches('%')
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | '¥' | ',' | '_' | ' '))
        .collect();
    let value = cleaned.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if percent { value / 100.0 } else { value })
}

/// Recover a number from an arbitrary JSON value.
#[must_use]
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// `Option<f64>` field decoder.
///
/// # Errors
///
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// `Option<i32>` field decoder for calendar years and similar integers.
///
/// # Errors
///
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn opt_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|v| v.fract() == 0.0 && *v >= f64::from(i32::MIN) && *v <= f64::from(i32::MAX))
        .map(|v| {
            #[allow(clippy::cast_possible_truncation)]
            let year = v as i32;
            year
        }))
}

/// `Option<bool>` field decoder accepting `"yes"`/`"no"`/`"true"`/`"false"`.
///
/// # Errors
///
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "eligible" | "granted" => Some(true),
            "false" | "no" | "n" | "ineligible" | "none" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// `Option<String>` decoder that turns non-string scalars into text and
/// drops `null`.
///
/// # Errors
///
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// List-of-strings decoder; a bare string becomes a one-element list.
///
/// # Errors
///
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) => vec![s],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Numeric vector decoder; unparseable entries become `NaN` so that length
/// is preserved and the validator can point at the offending index.
///
/// # Errors
///
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn f64_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| number_from_value(item).unwrap_or(f64::NAN))
            .collect(),
        _ => Vec::new(),
    })
}

/// Share-map decoder (`region -> fraction`); unparseable shares become `NaN`.
///
/// # Errors
///
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn share_map<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(k, v)| (k, number_from_value(&v).unwrap_or(f64::NAN)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

/// Source-map decoder (`field -> [url]`).
///
/// # Errors
///
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn source_map<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<BTreeMap<String, Vec<String>>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(k, v)| {
                let urls = match v {
                    Value::String(s) => vec![s],
                    Value::Array(items) => items
                        .into_iter()
                        .filter_map(|item| match item {
                            Value::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                    _ => Vec::new(),
                };
                (k, urls)
            })
            .collect(),
        _ => BTreeMap::new(),
    })
}
