//! Tagged metadata values.
//!
//! Tag services hand back heterogeneous data: numbers, strings, lists,
//! nested objects, dates and raw byte blobs. [`RawValue`] models that input
//! and [`TagValue`] is what a [`MetadataRecord`](super::MetadataRecord)
//! stores after conversion.
//!
//! ## Conversion rules
//!
//! | Raw input | Stored as |
//! |---|---|
//! | `Null`, empty `Text` | skipped |
//! | `Bytes` | [`TagValue::Binary`] (rendered as `[Binary Data]`) |
//! | `Object` | `Scalar(Text)` holding the JSON serialization |
//! | `Date` | [`TagValue::Date`] |
//! | `List` | [`TagValue::Array`]; nested blobs become the sentinel text, nested lists/objects their JSON |
//! | `Bool`/`Int`/`Float`/`Text` | the matching [`Scalar`] |

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;

/// Display text for redacted binary payloads.
pub const BINARY_SENTINEL: &str = "[Binary Data]";

/// A single primitive value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// A value stored in a metadata record.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Scalar(Scalar),
    Array(Vec<Scalar>),
    Date(NaiveDateTime),
    /// A binary blob. The bytes themselves are never kept.
    Binary,
}

/// A value as produced by a tag service, before conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDateTime),
    List(Vec<RawValue>),
    Object(serde_json::Value),
}

impl Scalar {
    /// Numeric view; `None` for text and booleans.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::Text(s) => serde_json::Value::String(s.clone()),
            Scalar::Int(i) => serde_json::Value::from(*i),
            Scalar::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Scalar::Bool(b) => serde_json::Value::Bool(*b),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => f.write_str(&number_to_string(*x)),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl TagValue {
    /// Convert a tag-service value, returning `None` for values that must not
    /// be merged (null and empty text).
    pub fn from_raw(raw: RawValue) -> Option<TagValue> {
        match raw {
            RawValue::Null => None,
            RawValue::Text(s) if s.is_empty() => None,
            RawValue::Text(s) => Some(TagValue::Scalar(Scalar::Text(s))),
            RawValue::Bool(b) => Some(TagValue::Scalar(Scalar::Bool(b))),
            RawValue::Int(i) => Some(TagValue::Scalar(Scalar::Int(i))),
            RawValue::Float(f) => Some(TagValue::Scalar(Scalar::Float(f))),
            RawValue::Bytes(_) => Some(TagValue::Binary),
            RawValue::Date(d) => Some(TagValue::Date(d)),
            RawValue::Object(obj) => Some(TagValue::Scalar(Scalar::Text(obj.to_string()))),
            RawValue::List(items) => Some(TagValue::Array(
                items.into_iter().filter_map(list_element).collect(),
            )),
        }
    }

    /// Numeric view of a scalar number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Scalar(s) => s.as_f64(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Whether the value counts as present when picking the first available
    /// of several alternative fields: empty text, zero and NaN do not.
    pub fn is_truthy(&self) -> bool {
        match self {
            TagValue::Scalar(Scalar::Text(s)) => !s.is_empty(),
            TagValue::Scalar(Scalar::Int(i)) => *i != 0,
            TagValue::Scalar(Scalar::Float(f)) => *f != 0.0 && !f.is_nan(),
            TagValue::Scalar(Scalar::Bool(b)) => *b,
            TagValue::Array(_) | TagValue::Date(_) | TagValue::Binary => true,
        }
    }

    /// ISO-8601 rendering used for dates in JSON output.
    pub fn iso_date(date: &NaiveDateTime) -> String {
        date.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }

    /// JSON form: dates as ISO strings, blobs as the sentinel.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            TagValue::Scalar(s) => s.to_json(),
            TagValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(Scalar::to_json).collect())
            }
            TagValue::Date(d) => serde_json::Value::String(Self::iso_date(d)),
            TagValue::Binary => serde_json::Value::String(BINARY_SENTINEL.to_string()),
        }
    }
}

/// Plain rendering. Arrays are comma-joined without spaces; use
/// [`format_value`](super::format_value) for the human-oriented form.
impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Scalar(s) => s.fmt(f),
            TagValue::Array(items) => {
                let joined: Vec<String> = items.iter().map(Scalar::to_string).collect();
                f.write_str(&joined.join(","))
            }
            TagValue::Date(d) => f.write_str(&Self::iso_date(d)),
            TagValue::Binary => f.write_str(BINARY_SENTINEL),
        }
    }
}

impl Serialize for TagValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TagValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&item.to_json())?;
                }
                seq.end()
            }
            other => other.to_json().serialize(serializer),
        }
    }
}

fn list_element(raw: RawValue) -> Option<Scalar> {
    match raw {
        RawValue::Null => None,
        RawValue::Bool(b) => Some(Scalar::Bool(b)),
        RawValue::Int(i) => Some(Scalar::Int(i)),
        RawValue::Float(f) => Some(Scalar::Float(f)),
        RawValue::Text(s) => Some(Scalar::Text(s)),
        RawValue::Bytes(_) => Some(Scalar::Text(BINARY_SENTINEL.to_string())),
        RawValue::Date(d) => Some(Scalar::Text(TagValue::iso_date(&d))),
        RawValue::Object(obj) => Some(Scalar::Text(obj.to_string())),
        RawValue::List(items) => {
            let json: Vec<serde_json::Value> = items
                .into_iter()
                .filter_map(list_element)
                .map(|s| s.to_json())
                .collect();
            Some(Scalar::Text(serde_json::Value::Array(json).to_string()))
        }
    }
}

/// Shortest round-trip rendering of a number, without a trailing `.0` on
/// integral values (`72.0` renders as `72`).
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}")
    }
}

/// Fixed-point rendering with ties rounded away from zero.
///
/// `to_fixed(0.125, 2)` is `"0.13"`, `to_fixed(40.4461111, 6)` is `"40.446111"`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return number_to_string(value);
    }
    let factor = 10f64.powi(digits as i32);
    let scaled = (value.abs() * factor).round();
    let sign = if value < 0.0 && scaled != 0.0 { "-" } else { "" };
    let padded = format!("{:0>width$.0}", scaled, width = digits + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - digits);
    if digits == 0 {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::Scalar(Scalar::Text(s.to_string()))
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> Self {
        TagValue::Scalar(Scalar::Text(s))
    }
}

impl From<i64> for TagValue {
    fn from(i: i64) -> Self {
        TagValue::Scalar(Scalar::Int(i))
    }
}

impl From<u32> for TagValue {
    fn from(i: u32) -> Self {
        TagValue::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<u16> for TagValue {
    fn from(i: u16) -> Self {
        TagValue::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<u8> for TagValue {
    fn from(i: u8) -> Self {
        TagValue::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<f64> for TagValue {
    fn from(f: f64) -> Self {
        TagValue::Scalar(Scalar::Float(f))
    }
}

impl From<Vec<String>> for TagValue {
    fn from(items: Vec<String>) -> Self {
        TagValue::Array(items.into_iter().map(Scalar::Text).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 30)
            .unwrap()
    }

    // =========================================================================
    // from_raw
    // =========================================================================

    #[test]
    fn null_and_empty_text_are_skipped() {
        assert_eq!(TagValue::from_raw(RawValue::Null), None);
        assert_eq!(TagValue::from_raw(RawValue::Text(String::new())), None);
    }

    #[test]
    fn bytes_become_binary() {
        let v = TagValue::from_raw(RawValue::Bytes(vec![1, 2, 3])).unwrap();
        assert_eq!(v, TagValue::Binary);
        assert_eq!(v.to_string(), BINARY_SENTINEL);
    }

    #[test]
    fn objects_become_json_text() {
        let obj = serde_json::json!({"a": 1});
        let v = TagValue::from_raw(RawValue::Object(obj)).unwrap();
        assert_eq!(v.as_text(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn lists_keep_scalars_and_flatten_nested() {
        let raw = RawValue::List(vec![
            RawValue::Int(40),
            RawValue::Float(26.5),
            RawValue::Bytes(vec![0]),
            RawValue::List(vec![RawValue::Int(1), RawValue::Int(2)]),
        ]);
        let v = TagValue::from_raw(raw).unwrap();
        assert_eq!(
            v,
            TagValue::Array(vec![
                Scalar::Int(40),
                Scalar::Float(26.5),
                Scalar::Text(BINARY_SENTINEL.into()),
                Scalar::Text("[1,2]".into()),
            ])
        );
    }

    #[test]
    fn empty_list_is_kept() {
        let v = TagValue::from_raw(RawValue::List(vec![])).unwrap();
        assert_eq!(v, TagValue::Array(vec![]));
    }

    #[test]
    fn dates_are_kept_and_serialize_as_iso() {
        let v = TagValue::from_raw(RawValue::Date(date())).unwrap();
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            "\"2024-03-09T14:05:30.000Z\""
        );
    }

    // =========================================================================
    // truthiness
    // =========================================================================

    #[test]
    fn truthiness_follows_presence_rules() {
        assert!(!TagValue::from(0i64).is_truthy());
        assert!(!TagValue::from(0.0).is_truthy());
        assert!(!TagValue::from("").is_truthy());
        assert!(TagValue::from("0.000000").is_truthy());
        assert!(TagValue::from(3i64).is_truthy());
        assert!(TagValue::Array(vec![]).is_truthy());
    }

    // =========================================================================
    // number rendering
    // =========================================================================

    #[test]
    fn number_to_string_drops_trailing_zero() {
        assert_eq!(number_to_string(72.0), "72");
        assert_eq!(number_to_string(0.5), "0.5");
        assert_eq!(number_to_string(-12.25), "-12.25");
    }

    #[test]
    fn to_fixed_rounds_half_up() {
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(2.0, 2), "2.00");
        assert_eq!(to_fixed(40.44611111, 6), "40.446111");
        assert_eq!(to_fixed(-40.44611111, 6), "-40.446111");
        assert_eq!(to_fixed(1.5, 0), "2");
        assert_eq!(to_fixed(0.00001, 2), "0.00");
    }

    #[test]
    fn array_display_joins_with_commas() {
        let v = TagValue::Array(vec![Scalar::Int(1), Scalar::Float(2.5)]);
        assert_eq!(v.to_string(), "1,2.5");
    }
}
