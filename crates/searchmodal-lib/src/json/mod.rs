//! Small serde_json helpers shared by the command handlers.

use serde::Serialize;
use serde_json::Value;

use crate::errors::Result;

/// Serialize a value to a pretty-printed JSON string.
pub fn serialize_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// Interpret a command-line argument as JSON, falling back to a plain string.
///
/// `42` becomes a number and `{"all":16}` an object, while `https://x` stays
/// a string.
pub fn parse_loose(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_pretty() {
        let s = serialize_pretty(&json!({"a": 1})).unwrap();
        assert!(s.contains("\n"));
        assert!(s.contains("\"a\": 1"));
    }

    #[test]
    fn test_parse_loose() {
        assert_eq!(parse_loose("42"), json!(42));
        assert_eq!(parse_loose("true"), json!(true));
        assert_eq!(parse_loose(r#"{"all":16}"#), json!({"all": 16}));
        assert_eq!(parse_loose("https://tenon.io/api/"), json!("https://tenon.io/api/"));
        assert_eq!(parse_loose("\"quoted\""), json!("quoted"));
    }
}
