//! Wire entry point: turning text into a document. Delegated entirely to
//! `serde_json`; the core never parses JSON by any other means.

use thiserror::Error;

/// Failure to parse a text document as JSON. Carries the underlying parser
/// message only -- never panics.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ParseError(String);

/// Parse `text` as a [`serde_json::Value`]. On malformed input, returns a
/// [`ParseError`] rather than panicking.
pub fn parse_text(text: &str) -> Result<serde_json::Value, ParseError> {
    serde_json::from_str(text).map_err(|e| ParseError(e.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_text_ok() {
        let v = parse_text(r#"{"a": 1}"#).unwrap();
        assert_eq!(v, serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_parse_text_err() {
        let err = parse_text("{not json}").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
