//! [`JsonValue`]/[`JsonBuilder`] implementation over [`serde_json::Value`].
//! This is the only representation the rest of this workspace ships with,
//! but the traits themselves place no requirement on it: a host could
//! implement both for any other document representation (e.g. a zero-copy
//! parsed tape) without touching `jcodec-core`.

use crate::{JsonBuilder, JsonKind, JsonValue};
use serde_json::{Map, Number, Value};

impl JsonValue for Value {
    type ArrayIter<'a> = std::slice::Iter<'a, Value>;
    type ObjectIter<'a> = MapIter<'a>;

    fn kind(&self) -> JsonKind {
        match self {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Bool,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        Value::as_bool(self)
    }

    fn as_i64(&self) -> Option<i64> {
        Value::as_i64(self)
    }

    fn as_u64(&self) -> Option<u64> {
        Value::as_u64(self)
    }

    fn as_f64(&self) -> Option<f64> {
        Value::as_f64(self)
    }

    fn as_str(&self) -> Option<&str> {
        Value::as_str(self)
    }

    fn field<'a>(&'a self, name: &str) -> Option<&'a Self> {
        self.as_object().and_then(|m| m.get(name))
    }

    fn iter_array(&self) -> Option<Self::ArrayIter<'_>> {
        self.as_array().map(|a| a.iter())
    }

    fn array_len(&self) -> Option<usize> {
        self.as_array().map(|a| a.len())
    }

    fn array_get(&self, index: usize) -> Option<&Self> {
        self.as_array().and_then(|a| a.get(index))
    }

    fn iter_object(&self) -> Option<Self::ObjectIter<'_>> {
        self.as_object().map(|m| MapIter(m.iter()))
    }

    fn to_debug_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "<unprintable json>".to_string())
    }
}

/// Iterator adapter so `serde_json::map::Iter` (whose `Item` is
/// `(&String, &Value)`) satisfies `Item = (&str, &Value)`.
pub struct MapIter<'a>(serde_json::map::Iter<'a>);

impl<'a> Iterator for MapIter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.as_str(), v))
    }
}

impl JsonBuilder for Value {
    fn null() -> Self {
        Value::Null
    }

    fn bool(v: bool) -> Self {
        Value::Bool(v)
    }

    fn i64(v: i64) -> Self {
        Value::Number(v.into())
    }

    fn u64(v: u64) -> Self {
        Value::Number(v.into())
    }

    fn f64(v: f64) -> Self {
        Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
    }

    fn string(v: impl Into<String>) -> Self {
        Value::String(v.into())
    }

    fn array(items: Vec<Self>) -> Self {
        Value::Array(items)
    }

    fn object(fields: Vec<(String, Self)>) -> Self {
        Value::Object(Map::from_iter(fields))
    }
}
