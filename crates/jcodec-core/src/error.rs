//! Structured decode failures with precise path tracking. Errors are
//! values, never panics: every public decoder returns a [`Result`].

use crate::path::Path;
use jcodec_value::JsonValue;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// The reason a decoder failed, independent of where in the document it
/// failed (that's [`DecodeError`]'s job).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorReason {
    BadPrimitive { expected: String, value: String },
    BadType { expected: String, value: String },
    BadPrimitiveExtra { expected: String, value: String, detail: String },
    BadField { expected: String, value: String },
    BadPath { expected: String, value: String, unknown_field: String },
    TooSmallArray { expected: String, value: String },
    FailMessage(String),
    BadOneOf(Vec<String>),
}

/// A decode failure: the reason, paired with the path at which it occurred.
///
/// `Path` itself is an owned `Vec` of segments (see `path`'s module doc for
/// why); an error necessarily outlives the traversal that produced it, so
/// `DecodeError` stores the path already rendered to an owned `String`
/// rather than cloning the `Vec`. This is the one extra allocation a
/// failing decode pays that a succeeding one does not.
///
/// Implements [`std::error::Error`] by hand (rather than via `thiserror`'s
/// per-variant `#[error(...)]` derive) because `render`'s two-shape contract
/// -- `BadOneOf` prints no path, everything else does -- doesn't fit a
/// single per-variant format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    path: String,
    reason: ErrorReason,
}

impl DecodeError {
    pub fn new(path: &Path, reason: ErrorReason) -> Self {
        DecodeError { path: path.to_string(), reason }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn reason(&self) -> &ErrorReason {
        &self.reason
    }

    pub fn render(&self) -> String {
        render_parts(&self.path, &self.reason)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl std::error::Error for DecodeError {}

/// Render a `(path, reason)` pair to its final message: `BadOneOf` omits its
/// own path (each sub-error already carries one); every other reason is
/// `"Error at: \`<path>\`\n<reason>"`.
pub fn render(path: &Path, reason: &ErrorReason) -> String {
    render_parts(&path.to_string(), reason)
}

fn render_parts(path: &str, reason: &ErrorReason) -> String {
    match reason {
        ErrorReason::BadOneOf(errs) => {
            format!("The following errors were found:\n\n{}", errs.join("\n\n"))
        }
        other => format!("Error at: `{path}`\n{}", render_reason(other)),
    }
}

fn render_reason(reason: &ErrorReason) -> String {
    match reason {
        ErrorReason::BadPrimitive { expected, value } => generic_msg_str(expected, value),
        ErrorReason::BadType { expected, value } => generic_msg_str(expected, value),
        ErrorReason::BadPrimitiveExtra { expected, value, detail } => {
            format!("{}. {}", generic_msg_str(expected, value), detail)
        }
        ErrorReason::BadField { expected, value } => generic_msg_str(expected, value),
        ErrorReason::BadPath { expected, value, unknown_field } => {
            format!(
                "{} (the first unknown field was: `{}`)",
                generic_msg_str(expected, value),
                unknown_field
            )
        }
        ErrorReason::TooSmallArray { expected, value } => generic_msg_str(expected, value),
        ErrorReason::FailMessage(text) => text.clone(),
        ErrorReason::BadOneOf(_) => unreachable!("BadOneOf is rendered by render(), not here"),
    }
}

/// `"Expecting <expected> but instead got: <pretty json>"`. Guards against
/// pathological `Debug`/`Display` output on a user-supplied `JsonValue`
/// implementation that panics mid-render, e.g. one that recurses into a
/// circular document.
pub fn generic_msg<N: JsonValue>(expected: &str, value: &N, newline: bool) -> String {
    let pretty = catch_unwind(AssertUnwindSafe(|| value.to_debug_string()))
        .unwrap_or_else(|_| "<circular structure>".to_string());
    let sep = if newline { "\n" } else { " " };
    format!("Expecting {expected} but instead got:{sep}{pretty}")
}

/// Same contract as [`generic_msg`], but for call sites that already hold a
/// pre-rendered value string (used when building an [`ErrorReason`] that
/// must outlive the borrowed `JsonValue` it describes).
pub fn generic_msg_str(expected: &str, value: &str) -> String {
    format!("Expecting {expected} but instead got: {value}")
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_simple() {
        let path = Path::root().push_field("a");
        let reason = ErrorReason::BadPrimitive {
            expected: "a string".to_string(),
            value: "1".to_string(),
        };
        let rendered = render(&path, &reason);
        assert_eq!(rendered, "Error at: `$.a`\nExpecting a string but instead got: 1");
    }

    #[test]
    fn test_render_bad_one_of_has_no_outer_path() {
        let reason = ErrorReason::BadOneOf(vec!["err1".to_string(), "err2".to_string()]);
        let rendered = render(&Path::root(), &reason);
        assert_eq!(rendered, "The following errors were found:\n\nerr1\n\nerr2");
    }

    #[test]
    fn test_generic_msg_uses_json_debug_string() {
        let value = json!({"a": 1});
        let msg = generic_msg("an array", &value, false);
        assert!(msg.starts_with("Expecting an array but instead got:"));
        assert!(msg.contains("\"a\":1"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let path = Path::root().push_index(3);
        let reason = ErrorReason::FailMessage("boom".to_string());
        assert_eq!(render(&path, &reason), render(&path, &reason));
    }

    #[test]
    fn test_decode_error_survives_path_going_out_of_scope() {
        fn make_error() -> DecodeError {
            let path = Path::root().push_field("a");
            DecodeError::new(&path, ErrorReason::FailMessage("boom".to_string()))
        }
        let err = make_error();
        assert_eq!(err.path(), "$.a");
    }
}
