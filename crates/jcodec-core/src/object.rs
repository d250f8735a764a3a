//! The object-builder façade: assemble a struct from a set of field
//! getters that each report their own failure but let the rest of the
//! build continue, so a single failing decode reports *every* malformed
//! field in one pass rather than the first.

use crate::decode::{self, Decoder};
use crate::error::{DecodeError, ErrorReason};
use crate::path::Path;
use jcodec_value::{JsonKind, JsonValue};
use std::cell::RefCell;
use std::rc::Rc;

struct Shared<'a, J> {
    path: Path,
    json: &'a J,
    errors: RefCell<Vec<DecodeError>>,
}

/// Getters that record a failure (rather than short-circuiting the whole
/// build) and substitute `T::default()` so `build` can keep running.
pub struct Required<'a, J>(Rc<Shared<'a, J>>);

/// Getters that treat "missing"-shaped failures as `None` and otherwise
/// behave like [`Required`], recording genuine failures for the final
/// aggregate error.
pub struct Optional<'a, J>(Rc<Shared<'a, J>>);

/// Passed to an `object(build)` decoder's `build` closure; exposes
/// `required`/`optional` field accessors bound to the value currently
/// being decoded.
pub struct Getters<'a, J> {
    shared: Rc<Shared<'a, J>>,
    pub required: Required<'a, J>,
    pub optional: Optional<'a, J>,
}

impl<'a, J: JsonValue + 'static> Getters<'a, J> {
    fn new(path: Path, json: &'a J) -> Self {
        let shared = Rc::new(Shared { path, json, errors: RefCell::new(Vec::new()) });
        Getters { shared: shared.clone(), required: Required(shared.clone()), optional: Optional(shared) }
    }
}

impl<'a, J: JsonValue + 'static> Required<'a, J> {
    pub fn field<T: Default + 'static>(&self, name: &'static str, dec: Decoder<J, T>) -> T {
        self.run(decode::field(name, dec))
    }

    pub fn at<T: Default + 'static>(&self, names: &'static [&'static str], dec: Decoder<J, T>) -> T {
        self.run(decode::at(names, dec))
    }

    pub fn raw<T: Default + 'static>(&self, dec: Decoder<J, T>) -> T {
        self.run(dec)
    }

    fn run<T: Default + 'static>(&self, dec: Decoder<J, T>) -> T {
        match dec.decode(&self.0.path, self.0.json) {
            Ok(v) => v,
            Err(e) => {
                self.0.errors.borrow_mut().push(e);
                T::default()
            }
        }
    }
}

impl<'a, J: JsonValue + 'static> Optional<'a, J> {
    pub fn field<T: 'static>(&self, name: &'static str, dec: Decoder<J, T>) -> Option<T> {
        self.run(decode::optional(name, dec))
    }

    pub fn at<T: 'static>(&self, names: &'static [&'static str], dec: Decoder<J, T>) -> Option<T> {
        self.run(decode::optional_at(names, dec))
    }

    /// Unlike [`Optional::field`]/[`Optional::at`], `raw` isn't inherently
    /// missing-aware: it downgrades `BadField`/`BadPath` (there was simply
    /// nothing there) and a null-valued `BadPrimitive`/`BadPrimitiveExtra`/
    /// `BadType` (there was an explicit null where a value was wanted) to
    /// `None`; any other failure still counts against the aggregate error.
    pub fn raw<T: 'static>(&self, dec: Decoder<J, T>) -> Option<T> {
        match dec.decode(&self.0.path, self.0.json) {
            Ok(v) => Some(v),
            Err(e) => match e.reason() {
                ErrorReason::BadField { .. } | ErrorReason::BadPath { .. } => None,
                ErrorReason::BadPrimitive { .. }
                | ErrorReason::BadPrimitiveExtra { .. }
                | ErrorReason::BadType { .. }
                    if self.0.json.kind() == JsonKind::Null =>
                {
                    None
                }
                _ => {
                    self.0.errors.borrow_mut().push(e);
                    None
                }
            },
        }
    }

    fn run<T: 'static>(&self, dec: Decoder<J, Option<T>>) -> Option<T> {
        match dec.decode(&self.0.path, self.0.json) {
            Ok(v) => v,
            Err(e) => {
                self.0.errors.borrow_mut().push(e);
                None
            }
        }
    }
}

/// `object(build)`: run `build` once against a [`Getters`] bound to the
/// current path/value, then fold whatever errors its getters recorded into
/// a single `DecodeError` -- zero errors succeeds, one error forwards
/// unchanged, two or more become `BadOneOf` of their rendered text.
pub fn object<J: JsonValue + 'static, T: 'static>(
    build: impl Fn(&Getters<J>) -> T + Send + Sync + 'static,
) -> Decoder<J, T> {
    Decoder::new(move |path, json| {
        let getters = Getters::new(path.clone(), json);
        let result = build(&getters);
        let mut errors = getters.shared.errors.borrow_mut();
        match errors.len() {
            0 => Ok(result),
            1 => Err(errors.remove(0)),
            _ => Err(DecodeError::new(
                path,
                ErrorReason::BadOneOf(errors.iter().map(|e| e.render()).collect()),
            )),
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::{from_value, i32, string};
    use serde_json::json;

    #[derive(Debug, PartialEq, Default)]
    struct Person {
        name: String,
        age: i32,
        nickname: Option<String>,
    }

    fn person_decoder<J: JsonValue + 'static>() -> Decoder<J, Person> {
        object(|get: &Getters<J>| Person {
            name: get.required.field("name", string()),
            age: get.required.field("age", i32()),
            nickname: get.optional.field("nickname", string()),
        })
    }

    #[test]
    fn test_object_succeeds_with_zero_errors() {
        let dec = person_decoder();
        let value = json!({"name": "ferris", "age": 10});
        assert_eq!(
            from_value(&dec, &value).unwrap(),
            Person { name: "ferris".to_string(), age: 10, nickname: None }
        );
    }

    #[test]
    fn test_object_single_error_forwards_unchanged() {
        let dec = person_decoder();
        let value = json!({"age": 10});
        let err = from_value(&dec, &value).unwrap_err();
        assert!(matches!(err.reason(), ErrorReason::BadField { .. }));
    }

    #[test]
    fn test_object_multiple_errors_become_bad_one_of() {
        let dec = person_decoder();
        let value = json!({});
        let err = from_value(&dec, &value).unwrap_err();
        assert!(matches!(err.reason(), ErrorReason::BadOneOf(errs) if errs.len() == 2));
    }

    #[test]
    fn test_optional_raw_downgrades_missing_field_to_none() {
        let dec: Decoder<serde_json::Value, Option<i32>> =
            object(|get: &Getters<serde_json::Value>| get.optional.raw(decode::field("missing", i32())));
        let value = json!({});
        assert_eq!(from_value(&dec, &value).unwrap(), None);
    }
}
