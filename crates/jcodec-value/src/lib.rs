//! A minimal capability surface over a JSON DOM, generic over the concrete
//! representation, trimmed to exactly the operations a decoder/encoder
//! combinator engine needs: kind inspection, coercions, field access, and
//! iteration.
//!
//! The core combinator crate (`jcodec-core`) never constructs or inspects a
//! JSON value except through [`JsonValue`] and [`JsonBuilder`]; it is free to
//! work atop any document representation that implements both, not just
//! [`serde_json::Value`].

mod number;
mod parse;
mod value;

pub use number::TryFromJsonNumber;
pub use parse::{parse_text, ParseError};

/// The kind of a JSON value, independent of its representation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    /// Name used in error messages, e.g. "an object", "an array".
    pub fn describe(&self) -> &'static str {
        match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "a boolean",
            JsonKind::Number => "a number",
            JsonKind::String => "a string",
            JsonKind::Array => "an array",
            JsonKind::Object => "an object",
        }
    }
}

/// Read-side capability: a JSON value that can be inspected, coerced, and
/// navigated. Implemented for [`serde_json::Value`] in this crate; a host
/// could implement it for any other document representation (e.g. a
/// zero-copy parsed tape) without changing a single line of `jcodec-core`.
pub trait JsonValue: Sized {
    type ArrayIter<'a>: Iterator<Item = &'a Self>
    where
        Self: 'a;
    type ObjectIter<'a>: Iterator<Item = (&'a str, &'a Self)>
    where
        Self: 'a;

    fn kind(&self) -> JsonKind;

    fn as_bool(&self) -> Option<bool>;
    fn as_i64(&self) -> Option<i64>;
    fn as_u64(&self) -> Option<u64>;
    fn as_f64(&self) -> Option<f64>;
    fn as_f32(&self) -> Option<f32> {
        self.as_f64().map(|f| f as f32)
    }
    fn as_str(&self) -> Option<&str>;

    /// Parse this value as an integer of type `T`, accepting either a JSON
    /// integer within `T`'s range, or (for wide integer types, leniently) a
    /// numeric string that parses.
    fn try_parse_integer<T: TryFromJsonNumber>(&self) -> Option<T> {
        if let Some(n) = self.as_i64() {
            return T::from_i64(n);
        }
        if let Some(n) = self.as_u64() {
            return T::from_u64(n);
        }
        if let Some(s) = self.as_str() {
            return T::from_decimal_str(s);
        }
        None
    }

    /// True when this value is shaped like an integer candidate -- a JSON
    /// number, or a string that parses as *some* number -- but
    /// [`try_parse_integer`] still failed. Distinguishes "out of range or
    /// non-integral" (the value was numeric, just not a fit) from "wrong
    /// JSON kind entirely" (not a number or numeric string at all), so a
    /// decoder can choose between `BadPrimitiveExtra` and `BadPrimitive`.
    fn looks_like_integer(&self) -> bool {
        match self.kind() {
            JsonKind::Number => true,
            JsonKind::String => self.as_str().is_some_and(|s| {
                let s = s.trim();
                s.parse::<i128>().is_ok() || s.parse::<u128>().is_ok() || s.parse::<f64>().is_ok()
            }),
            _ => false,
        }
    }

    fn field<'a>(&'a self, name: &str) -> Option<&'a Self>;
    fn iter_array(&self) -> Option<Self::ArrayIter<'_>>;
    fn array_len(&self) -> Option<usize>;
    fn array_get(&self, index: usize) -> Option<&Self>;
    fn iter_object(&self) -> Option<Self::ObjectIter<'_>>;

    /// Render this value as pretty/compact text for diagnostics (used by
    /// error messages, not by the encoder's own `to_string`).
    fn to_debug_string(&self) -> String;
}

/// Write-side capability: construction of fresh JSON values. The dual of
/// [`JsonValue`].
pub trait JsonBuilder: Sized {
    fn null() -> Self;
    fn bool(v: bool) -> Self;
    fn i64(v: i64) -> Self;
    fn u64(v: u64) -> Self;
    /// `NaN`/`Infinity` callers are expected to have already substituted
    /// `null` before calling this (see `jcodec-core::encode::float`); this
    /// constructor assumes a finite value.
    fn f64(v: f64) -> Self;
    fn string(v: impl Into<String>) -> Self;
    fn array(items: Vec<Self>) -> Self;
    fn object(fields: Vec<(String, Self)>) -> Self;
}

pub use value::*;
