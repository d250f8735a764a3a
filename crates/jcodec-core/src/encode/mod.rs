//! The encoder combinator algebra: the dual of [`crate::decode`]. An
//! `Encoder<J, T>` is a pure, total function `&T -> J`; there is no failure
//! mode, since constructing JSON from a known Rust value can't go wrong the
//! way parsing JSON into one can.

mod combinator;
mod primitive;

pub use combinator::*;
pub use primitive::*;

use jcodec_value::JsonBuilder;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// An encoder of `T` into a JSON value of representation `J`. Cheaply
/// `Clone`-able and safe to share across threads.
pub struct Encoder<J, T>(Arc<dyn Fn(&T) -> J + Send + Sync>);

impl<J, T> Clone for Encoder<J, T> {
    fn clone(&self) -> Self {
        Encoder(self.0.clone())
    }
}

impl<J, T> fmt::Debug for Encoder<J, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Encoder<{}>", std::any::type_name::<T>())
    }
}

impl<J: JsonBuilder + 'static, T: 'static> Encoder<J, T> {
    pub fn new(f: impl Fn(&T) -> J + Send + Sync + 'static) -> Self {
        Encoder(Arc::new(f))
    }

    /// Run this encoder against a value.
    pub fn encode(&self, value: &T) -> J {
        (self.0)(value)
    }
}

/// Render `json` to text. `space = 0` produces compact output
/// (`serde_json::to_string`); any other value produces output indented by
/// that many spaces (`serde_json::to_string_pretty` with a matching
/// indent width). Newlines are always `\n`, never platform-native, so
/// golden-file tests stay portable across platforms.
pub fn to_string(space: usize, json: &serde_json::Value) -> String {
    if space == 0 {
        serde_json::to_string(json).expect("serde_json::Value serialization is infallible")
    } else {
        let indent = " ".repeat(space);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        json.serialize(&mut ser).expect("serde_json::Value serialization is infallible");
        String::from_utf8(buf).expect("serde_json's writer only ever emits UTF-8")
    }
}
