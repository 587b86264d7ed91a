//! Lenient decoding for values produced by the settings endpoints.
//!
//! The endpoints sit on top of a MySQL driver that hands back ids, counts
//! and flags as numbers, numeric strings or booleans depending on the
//! column type and fetch mode. The helpers here accept all of these and
//! write flags back as `0` / `1`.

use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serializer};

use crate::types::DbId;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Deserialize an id that may be a number or a numeric string.
pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DbId, D::Error> {
    match Loose::deserialize(deserializer)? {
        Loose::Int(v) => Ok(v),
        Loose::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(&s), &"an integer id")),
        Loose::Float(f) => Err(de::Error::invalid_type(Unexpected::Float(f), &"an integer id")),
        Loose::Bool(b) => Err(de::Error::invalid_type(Unexpected::Bool(b), &"an integer id")),
        Loose::Null => Err(de::Error::invalid_type(Unexpected::Unit, &"an integer id")),
    }
}

/// Deserialize a boolean flag stored as `0`/`1`, `"0"`/`"1"`, `true`/`false`
/// or `null` (false).
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Loose::deserialize(deserializer)? {
        Loose::Null => Ok(false),
        Loose::Bool(b) => Ok(b),
        Loose::Int(v) => Ok(v != 0),
        Loose::Float(f) => Ok(f != 0.0),
        Loose::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            _ => Err(de::Error::invalid_value(Unexpected::Str(&s), &"a 0/1 flag")),
        },
    }
}

/// Deserialize an optional count; `null` and missing both map to `None`.
pub fn opt_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Loose::deserialize(deserializer)? {
        Loose::Null => Ok(None),
        Loose::Int(v) => Ok(Some(v)),
        Loose::Str(s) if s.trim().is_empty() => Ok(None),
        Loose::Str(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(&s), &"an integer count")),
        Loose::Float(f) => Err(de::Error::invalid_type(Unexpected::Float(f), &"an integer count")),
        Loose::Bool(b) => Err(de::Error::invalid_type(Unexpected::Bool(b), &"an integer count")),
    }
}

/// Deserialize a text column where `null` means empty.
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serialize a flag as `0` / `1`.
pub fn serialize_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

/// Serialize an optional flag as `0` / `1`. Pair with
/// `skip_serializing_if = "Option::is_none"`.
pub fn serialize_opt_flag<S: Serializer>(
    value: &Option<bool>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_u8(u8::from(*v)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "super::id")]
        id: i64,
        #[serde(default, deserialize_with = "super::flag")]
        on: bool,
        #[serde(default, deserialize_with = "super::opt_count")]
        count: Option<i64>,
        #[serde(default, deserialize_with = "super::string")]
        text: String,
    }

    fn row(json: &str) -> Row {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn id_accepts_numbers_and_numeric_strings() {
        assert_eq!(row(r#"{"id": 7}"#).id, 7);
        assert_eq!(row(r#"{"id": "42"}"#).id, 42);
    }

    #[test]
    fn id_rejects_non_numeric_strings() {
        assert!(serde_json::from_str::<Row>(r#"{"id": "abc"}"#).is_err());
        assert!(serde_json::from_str::<Row>(r#"{"id": null}"#).is_err());
    }

    #[test]
    fn flag_accepts_all_backend_spellings() {
        assert!(row(r#"{"id": 1, "on": 1}"#).on);
        assert!(row(r#"{"id": 1, "on": "1"}"#).on);
        assert!(row(r#"{"id": 1, "on": true}"#).on);
        assert!(!row(r#"{"id": 1, "on": 0}"#).on);
        assert!(!row(r#"{"id": 1, "on": "0"}"#).on);
        assert!(!row(r#"{"id": 1, "on": null}"#).on);
        assert!(!row(r#"{"id": 1}"#).on);
    }

    #[test]
    fn count_and_text_tolerate_null() {
        let r = row(r#"{"id": 1, "count": null, "text": null}"#);
        assert_eq!(r.count, None);
        assert_eq!(r.text, "");

        let r = row(r#"{"id": 1, "count": "3", "text": "hi"}"#);
        assert_eq!(r.count, Some(3));
        assert_eq!(r.text, "hi");
    }
}
