//! Typed value decoding.
//!
//! # Rules
//! - `String` targets receive the raw text unchanged
//! - Every other type is decoded from a JSON literal
//! - An empty raw value is read as JSON `null` (`Option` fields become `None`)

use std::any::{Any, TypeId};

use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// Whether `V` receives raw text without decoding.
pub fn is_textual<V: 'static>() -> bool {
    TypeId::of::<V>() == TypeId::of::<String>()
}

/// Decode a raw configuration value into `V`.
pub fn decode<V>(raw: &str) -> Result<V, DecodeError>
where
    V: DeserializeOwned + 'static,
{
    if is_textual::<V>() {
        let boxed: Box<dyn Any> = Box::new(raw.to_string());
        if let Ok(value) = boxed.downcast::<V>() {
            return Ok(*value);
        }
    }

    let literal = if raw.trim().is_empty() { "null" } else { raw };
    serde_json::from_str(literal).map_err(|source| DecodeError {
        type_name: std::any::type_name::<V>(),
        raw: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Endpoint {
        host: String,
        port: u16,
    }

    #[test]
    fn test_text_is_verbatim() {
        let raw = r#"  {"not": "parsed"} "#;
        assert_eq!(decode::<String>(raw).unwrap(), raw);
        assert_eq!(decode::<String>("").unwrap(), "");
        assert!(is_textual::<String>());
        assert!(!is_textual::<&'static str>());
    }

    #[test]
    fn test_primitives() {
        assert_eq!(decode::<u32>("3").unwrap(), 3);
        assert!(decode::<bool>("true").unwrap());
        assert_eq!(decode::<f64>("0.25").unwrap(), 0.25);
    }

    #[test]
    fn test_composite_round_trip() {
        let endpoints = vec![
            Endpoint { host: "a".into(), port: 1 },
            Endpoint { host: "b".into(), port: 2 },
        ];
        let raw = serde_json::to_string(&endpoints).unwrap();
        assert_eq!(decode::<Vec<Endpoint>>(&raw).unwrap(), endpoints);

        let weights: HashMap<String, u8> = decode(r#"{"x": 1, "y": 2}"#).unwrap();
        assert_eq!(weights["y"], 2);
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(decode::<Option<u32>>("").unwrap(), None);
        assert_eq!(decode::<Option<u32>>("7").unwrap(), Some(7));
        assert!(decode::<u32>("").is_err());
    }

    #[test]
    fn test_decode_error_context() {
        let err = decode::<Vec<Endpoint>>("[{broken").unwrap_err();
        assert_eq!(err.raw, "[{broken");
        assert!(err.type_name.contains("Endpoint"));
        assert!(err.to_string().contains("[{broken"));
    }
}
