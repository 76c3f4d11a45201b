//! Lenient deserialization helpers.
//!
//! Character documents arrive from storage written by older clients, edited
//! by hand, or filled in by a language model. A single bad field must not
//! take the whole sheet down, so these helpers coerce what they can and fall
//! back to the field's default otherwise.
//!
//! All helpers are meant for `#[serde(default, deserialize_with = "...")]`
//! and require a self-describing format (JSON).

use std::str::FromStr;

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Coerce a JSON value into an integer.
///
/// Integers pass through, floats are truncated, numeric strings are parsed.
/// Everything else (null, bools, objects, non-finite floats) is `None`.
///
/// # Examples
///
/// ```
/// use grimsheet_domain::common::coerce_i64;
/// use serde_json::json;
///
/// assert_eq!(coerce_i64(&json!(14)), Some(14));
/// assert_eq!(coerce_i64(&json!("16")), Some(16));
/// assert_eq!(coerce_i64(&json!(12.7)), Some(12));
/// assert_eq!(coerce_i64(&json!("strong")), None);
/// ```
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| float_to_i64(n.as_f64()?)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| float_to_i64(trimmed.parse::<f64>().ok()?))
        }
        _ => None,
    }
}

/// Coerce a JSON value into a float. Same rules as [`coerce_i64`].
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Coerce a JSON value into a bool.
///
/// Accepts bools, `"true"`/`"false"` strings, and numbers (non-zero is true).
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" | "" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    }
}

fn float_to_i64(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}

/// Integer field; unusable input becomes `T::default()`.
pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_or(&value, T::default()))
}

/// Coerce an integer, keeping `fallback` when the value is unusable.
///
/// For fields whose safe default is not zero, wrapped in a small
/// `deserialize_with` function next to the field.
pub fn number_or<T>(value: &Value, fallback: T) -> T
where
    T: TryFrom<i64>,
{
    coerce_i64(value)
        .and_then(|n| T::try_from(n).ok())
        .unwrap_or(fallback)
}

/// Optional float field (cost, weight); unusable input becomes `None`.
pub fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_f64(&value))
}

/// Bool field; unusable input becomes `false`.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_bool(&value).unwrap_or(false))
}

/// String field; numbers and bools are stringified, anything else is empty.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value).unwrap_or_default())
}

/// Optional string field; empty strings become `None`.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value).filter(|s| !s.is_empty()))
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Enum field parsed through `FromStr`; unknown strings become the default.
pub fn parsed<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s.parse().unwrap_or_default(),
        _ => T::default(),
    })
}

/// Optional enum field parsed through `FromStr`; unknown strings become `None`.
pub fn optional_parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s.parse().ok(),
        _ => None,
    })
}

/// Nested object field; a malformed value becomes `T::default()`.
pub fn record<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Optional nested object field; null or malformed values become `None`.
pub fn optional_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// List field; non-arrays become empty and malformed elements are skipped.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(list_from_value(value).unwrap_or_default())
}

/// Shared by list helpers that need a different fallback for non-arrays.
pub(crate) fn list_from_value<T: DeserializeOwned>(value: Value) -> Option<Vec<T>> {
    match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "number")]
        count: i32,
        #[serde(default, deserialize_with = "flag")]
        on: bool,
        #[serde(default, deserialize_with = "text")]
        label: String,
        #[serde(default, deserialize_with = "list")]
        values: Vec<u32>,
        #[serde(default, deserialize_with = "optional_f64")]
        weight: Option<f64>,
    }

    #[test]
    fn coerces_numeric_strings_and_floats() {
        assert_eq!(coerce_i64(&json!(" 7 ")), Some(7));
        assert_eq!(coerce_i64(&json!(-3.9)), Some(-3));
        assert_eq!(coerce_i64(&json!(null)), None);
        assert_eq!(coerce_i64(&json!(true)), None);
    }

    #[test]
    fn number_or_keeps_fallback_for_unusable_values() {
        assert_eq!(number_or(&json!("12"), 10), 12);
        assert_eq!(number_or(&json!(0), 10), 0);
        assert_eq!(number_or(&json!("x"), 10), 10);
        assert_eq!(number_or(&json!(null), 10), 10);
        assert_eq!(number_or(&json!(-1), 5u32), 5);
    }

    #[test]
    fn coerces_bools() {
        assert_eq!(coerce_bool(&json!("TRUE")), Some(true));
        assert_eq!(coerce_bool(&json!(0)), Some(false));
        assert_eq!(coerce_bool(&json!({})), None);
    }

    #[test]
    fn garbage_fields_fall_back_to_defaults() {
        let sample: Sample = serde_json::from_value(json!({
            "count": "lots",
            "on": "maybe",
            "label": 12,
            "values": [1, "two", 3, -4],
            "weight": "heavy"
        }))
        .unwrap();

        assert_eq!(sample.count, 0);
        assert!(!sample.on);
        assert_eq!(sample.label, "12");
        assert_eq!(sample.values, vec![1, 3]);
        assert_eq!(sample.weight, None);
    }

    #[test]
    fn nulls_fall_back_to_defaults() {
        let sample: Sample = serde_json::from_value(json!({
            "count": null,
            "values": null,
            "label": null
        }))
        .unwrap();

        assert_eq!(sample.count, 0);
        assert!(sample.values.is_empty());
        assert!(sample.label.is_empty());
    }

    #[test]
    fn out_of_range_numbers_fall_back() {
        #[derive(Deserialize)]
        struct Small {
            #[serde(deserialize_with = "number")]
            n: u8,
        }
        let small: Small = serde_json::from_value(json!({ "n": 300 })).unwrap();
        assert_eq!(small.n, 0);
    }
}
