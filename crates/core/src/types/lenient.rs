//! Lenient decoding of free-text body fields.
//!
//! Form posts and loosely typed clients send scalars where text is expected.
//! A scalar is kept as its text form, except that falsy scalars (`0`,
//! `false`, `null`) count as absent. Arrays and objects are rejected.

use core::fmt;

use serde::Deserializer;
use serde::de::{self, Visitor};

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(v.then(|| "true".to_owned()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok((v != 0).then(|| v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok((v != 0).then(|| v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        // NaN also counts as absent
        Ok((v.abs() > 0.0).then(|| v.to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(Self)
    }
}

/// `deserialize_with` target for optional text fields.
///
/// # Errors
///
/// Fails when the value is an array or an object.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TextVisitor)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Default, Deserialize)]
    struct Field {
        #[serde(default, deserialize_with = "optional_text")]
        value: Option<String>,
    }

    fn decode(json: &str) -> Option<String> {
        serde_json::from_str::<Field>(json).unwrap().value
    }

    #[test]
    fn test_scalars_become_text() {
        assert_eq!(decode(r#"{"value": "C1"}"#).as_deref(), Some("C1"));
        assert_eq!(decode(r#"{"value": 1001}"#).as_deref(), Some("1001"));
        assert_eq!(decode(r#"{"value": -4}"#).as_deref(), Some("-4"));
        assert_eq!(decode(r#"{"value": 2.5}"#).as_deref(), Some("2.5"));
        assert_eq!(decode(r#"{"value": true}"#).as_deref(), Some("true"));
    }

    #[test]
    fn test_falsy_scalars_are_absent() {
        assert_eq!(decode(r#"{"value": 0}"#), None);
        assert_eq!(decode(r#"{"value": 0.0}"#), None);
        assert_eq!(decode(r#"{"value": false}"#), None);
        assert_eq!(decode(r#"{"value": null}"#), None);
        assert_eq!(decode("{}"), None);
    }

    #[test]
    fn test_empty_string_is_kept() {
        assert_eq!(decode(r#"{"value": ""}"#).as_deref(), Some(""));
    }

    #[test]
    fn test_containers_are_rejected() {
        assert!(serde_json::from_str::<Field>(r#"{"value": [1]}"#).is_err());
        assert!(serde_json::from_str::<Field>(r#"{"value": {"a": 1}}"#).is_err());
    }
}
