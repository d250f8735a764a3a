//! The decoder combinator algebra: primitives plus structural and algebraic
//! combinators over them. A `Decoder<J, T>` is a pure function
//! `(path, json) -> Result<T, DecodeError>`; combinators build larger
//! decoders out of smaller ones without ever touching a JSON value except
//! through [`JsonValue`].

mod combinator;
mod primitive;

pub use combinator::*;
pub use primitive::*;

use crate::error::{generic_msg, DecodeError, ErrorReason};
use crate::path::Path;
use jcodec_value::{parse_text, JsonKind, JsonValue};
use std::fmt;
use std::sync::Arc;

/// A decoder of `T` out of a JSON value of representation `J`. Cheaply
/// `Clone`-able (an `Arc` around the underlying closure) and safe to share
/// across threads, so a decoder built once can be reused for every decode
/// call a program makes.
pub struct Decoder<J, T>(Arc<dyn Fn(&Path, &J) -> Result<T, DecodeError> + Send + Sync>);

impl<J, T> Clone for Decoder<J, T> {
    fn clone(&self) -> Self {
        Decoder(self.0.clone())
    }
}

impl<J, T> fmt::Debug for Decoder<J, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decoder<{}>", std::any::type_name::<T>())
    }
}

impl<J: JsonValue + 'static, T: 'static> Decoder<J, T> {
    pub fn new(f: impl Fn(&Path, &J) -> Result<T, DecodeError> + Send + Sync + 'static) -> Self {
        Decoder(Arc::new(f))
    }

    /// Run this decoder at the given path against the given value.
    pub fn decode(&self, path: &Path, json: &J) -> Result<T, DecodeError> {
        (self.0)(path, json)
    }
}

/// Require that `json` is a JSON object, or fail with `BadType`.
fn require_object<'v, J: JsonValue>(path: &Path, json: &'v J) -> Result<(), DecodeError> {
    if json.kind() == JsonKind::Object {
        Ok(())
    } else {
        Err(DecodeError::new(
            path,
            ErrorReason::BadType {
                expected: "an object".to_string(),
                value: generic_msg("an object", json, false),
            },
        ))
    }
}

fn require_array<'v, J: JsonValue>(path: &Path, json: &'v J) -> Result<(), DecodeError> {
    if json.kind() == JsonKind::Array {
        Ok(())
    } else {
        Err(DecodeError::new(
            path,
            ErrorReason::BadType {
                expected: "an array".to_string(),
                value: generic_msg("an array", json, false),
            },
        ))
    }
}

/// `field(name, dec)`: requires an object; a missing field fails with
/// `BadField`; a present field (even JSON null) descends with path
/// `path + "." + name`.
pub fn field<J: JsonValue + 'static, T: 'static>(name: &'static str, dec: Decoder<J, T>) -> Decoder<J, T> {
    Decoder::new(move |path, json| {
        require_object(path, json)?;
        match json.field(name) {
            Some(value) => {
                let child_path = path.push_field(name);
                dec.decode(&child_path, value)
            }
            None => Err(DecodeError::new(
                path,
                ErrorReason::BadField {
                    expected: format!("an object with a field named `{name}`"),
                    value: generic_msg("an object with a field named", json, false),
                },
            )),
        }
    })
}

/// `at(&[names...], dec)`: chained `field` navigation. A `null` or missing
/// field encountered mid-path fails with `BadPath`.
pub fn at<J: JsonValue + 'static, T: 'static>(names: &'static [&'static str], dec: Decoder<J, T>) -> Decoder<J, T> {
    Decoder::new(move |path, json| {
        let mut cur_path = path.clone();
        let mut cur_value: &J = json;

        for (i, name) in names.iter().enumerate() {
            let is_last = i + 1 == names.len();
            if cur_value.kind() != JsonKind::Object {
                return Err(DecodeError::new(
                    &cur_path,
                    ErrorReason::BadPath {
                        expected: format!("a path through {:?}", names),
                        value: generic_msg("an object", cur_value, false),
                        unknown_field: name.to_string(),
                    },
                ));
            }
            match cur_value.field(name) {
                Some(next) => {
                    cur_path = cur_path.push_field(name);
                    if !is_last && next.kind() == JsonKind::Null {
                        return Err(DecodeError::new(
                            &cur_path,
                            ErrorReason::BadPath {
                                expected: format!("a path through {:?}", names),
                                value: "null".to_string(),
                                unknown_field: names[i + 1].to_string(),
                            },
                        ));
                    }
                    cur_value = next;
                }
                None => {
                    return Err(DecodeError::new(
                        &cur_path,
                        ErrorReason::BadPath {
                            expected: format!("a path through {:?}", names),
                            value: generic_msg("a matching field", cur_value, false),
                            unknown_field: name.to_string(),
                        },
                    ));
                }
            }
        }
        dec.decode(&cur_path, cur_value)
    })
}

/// `optional(name, dec)`: a missing field or JSON `null` yields `Ok(None)`,
/// checked *before* `dec` ever runs -- safer for an inner decoder that
/// assumes non-null input. A present non-null value is decoded and wrapped
/// in `Some`.
pub fn optional<J: JsonValue + 'static, T: 'static>(
    name: &'static str,
    dec: Decoder<J, T>,
) -> Decoder<J, Option<T>> {
    Decoder::new(move |path, json| {
        require_object(path, json)?;
        match json.field(name) {
            None => Ok(None),
            Some(value) if value.kind() == JsonKind::Null => Ok(None),
            Some(value) => {
                let child_path = path.push_field(name);
                dec.decode(&child_path, value).map(Some)
            }
        }
    })
}

/// `optional_at(&[names...], dec)`: chained `optional` navigation. Any
/// missing field or explicit `null` anywhere along the path yields
/// `Ok(None)` rather than failing.
pub fn optional_at<J: JsonValue + 'static, T: 'static>(
    names: &'static [&'static str],
    dec: Decoder<J, T>,
) -> Decoder<J, Option<T>> {
    Decoder::new(move |path, json| {
        let mut cur_path = path.clone();
        let mut cur_value: &J = json;

        for name in names {
            if cur_value.kind() != JsonKind::Object {
                return Ok(None);
            }
            match cur_value.field(name) {
                None => return Ok(None),
                Some(next) => {
                    cur_path = cur_path.push_field(name);
                    if next.kind() == JsonKind::Null {
                        return Ok(None);
                    }
                    cur_value = next;
                }
            }
        }
        dec.decode(&cur_path, cur_value).map(Some)
    })
}

/// `index(i, dec)`: requires an array; an out-of-bounds index fails with
/// `TooSmallArray`.
pub fn index<J: JsonValue + 'static, T: 'static>(i: usize, dec: Decoder<J, T>) -> Decoder<J, T> {
    Decoder::new(move |path, json| {
        require_array(path, json)?;
        match json.array_get(i) {
            Some(value) => {
                let child_path = path.push_index(i);
                dec.decode(&child_path, value)
            }
            None => Err(DecodeError::new(
                path,
                ErrorReason::TooSmallArray {
                    expected: format!("an array with at least {} element(s)", i + 1),
                    value: generic_msg("a longer array", json, false),
                },
            )),
        }
    })
}

/// `exact_length(n)`: requires an array of exactly `n` elements, failing
/// with `TooSmallArray` on a shorter *or longer* array. Used by
/// discriminated-union variant decoding, where [`index`] alone only
/// guarantees enough elements, not that trailing ones are absent.
pub fn exact_length<J: JsonValue + 'static>(n: usize) -> Decoder<J, ()> {
    Decoder::new(move |path, json| {
        require_array(path, json)?;
        if json.array_len().unwrap() != n {
            return Err(DecodeError::new(
                path,
                ErrorReason::TooSmallArray {
                    expected: format!("an array with exactly {n} element(s)"),
                    value: generic_msg("a different-length array", json, false),
                },
            ));
        }
        Ok(())
    })
}

/// `option(dec)`: `null` decodes to `None`; anything else decodes via `dec`
/// and is wrapped in `Some`.
pub fn option<J: JsonValue + 'static, T: 'static>(dec: Decoder<J, T>) -> Decoder<J, Option<T>> {
    Decoder::new(move |path, json| {
        if json.kind() == JsonKind::Null {
            Ok(None)
        } else {
            dec.decode(path, json).map(Some)
        }
    })
}

/// `list(dec)` / `array(dec)`: decode every array element with `dec`,
/// stopping at the first failing element and keeping that element's path.
pub fn list<J: JsonValue + 'static, T: 'static>(dec: Decoder<J, T>) -> Decoder<J, Vec<T>> {
    Decoder::new(move |path, json| {
        require_array(path, json)?;
        let mut out = Vec::new();
        for (i, item) in json.iter_array().unwrap().enumerate() {
            let child_path = path.push_index(i);
            out.push(dec.decode(&child_path, item)?);
        }
        Ok(out)
    })
}

/// Alias of [`list`]. Rust has no distinct "array vs. list" runtime type
/// worth modeling at the decoder-output level; both target `Vec<T>`.
pub fn array<J: JsonValue + 'static, T: 'static>(dec: Decoder<J, T>) -> Decoder<J, Vec<T>> {
    list(dec)
}

/// `keys`: an object's field names, in insertion order.
pub fn keys<J: JsonValue + 'static>() -> Decoder<J, Vec<String>> {
    Decoder::new(|path, json| {
        require_object(path, json)?;
        Ok(json.iter_object().unwrap().map(|(k, _)| k.to_string()).collect())
    })
}

/// `key_value_pairs(dec)`: an object's `(key, value)` pairs, each value
/// decoded at path `path + "." + key`, in insertion order.
pub fn key_value_pairs<J: JsonValue + 'static, T: 'static>(
    dec: Decoder<J, T>,
) -> Decoder<J, Vec<(String, T)>> {
    Decoder::new(move |path, json| {
        require_object(path, json)?;
        let mut out = Vec::new();
        for (k, v) in json.iter_object().unwrap() {
            let child_path = path.push_field(k);
            out.push((k.to_string(), dec.decode(&child_path, v)?));
        }
        Ok(out)
    })
}

/// `dict(dec)`: an object decoded into a `HashMap<String, T>` (the
/// stringifiable-key specialization of [`key_value_pairs`]).
pub fn dict<J: JsonValue + 'static, T: 'static>(
    dec: Decoder<J, T>,
) -> Decoder<J, std::collections::HashMap<String, T>> {
    let pairs = key_value_pairs(dec);
    Decoder::new(move |path, json| Ok(pairs.decode(path, json)?.into_iter().collect()))
}

/// `assoc_list(key_dec, value_dec)`: an array of two-element arrays decoded
/// into `Vec<(K, V)>`, for map types whose key is not a JSON-object-key
/// type. Callers `.collect()` the result into whatever map they need.
pub fn assoc_list<J: JsonValue + 'static, K: 'static, V: 'static>(
    key_dec: Decoder<J, K>,
    value_dec: Decoder<J, V>,
) -> Decoder<J, Vec<(K, V)>> {
    let pair = tuple2(key_dec, value_dec);
    list(pair)
}

macro_rules! impl_tuple_n {
    ($name:ident, $n:literal, $($idx:tt : $slot:ident : $T:ident),+) => {
        #[doc = concat!("`", stringify!($name), "`: a JSON array of exactly ", stringify!($n), " elements, decoded positionally.")]
        pub fn $name<J: JsonValue + 'static, $($T: 'static),+>(
            $($slot: Decoder<J, $T>),+
        ) -> Decoder<J, ($($T,)+)> {
            Decoder::new(move |path, json| {
                require_array(path, json)?;
                let len = json.array_len().unwrap();
                if len != $n {
                    return Err(DecodeError::new(
                        path,
                        ErrorReason::TooSmallArray {
                            expected: format!("an array with exactly {} element(s)", $n),
                            value: generic_msg("a different-length array", json, false),
                        },
                    ));
                }
                Ok((
                    $({
                        let child_path = path.push_index($idx);
                        $slot.decode(&child_path, json.array_get($idx).unwrap())?
                    },)+
                ))
            })
        }
    };
}

impl_tuple_n!(tuple2, 2, 0: d0: A, 1: d1: B);
impl_tuple_n!(tuple3, 3, 0: d0: A, 1: d1: B, 2: d2: C);
impl_tuple_n!(tuple4, 4, 0: d0: A, 1: d1: B, 2: d2: C, 3: d3: D);
impl_tuple_n!(tuple5, 5, 0: d0: A, 1: d1: B, 2: d2: C, 3: d3: D, 4: d4: E);
impl_tuple_n!(tuple6, 6, 0: d0: A, 1: d1: B, 2: d2: C, 3: d3: D, 4: d4: E, 5: d5: F);
impl_tuple_n!(tuple7, 7, 0: d0: A, 1: d1: B, 2: d2: C, 3: d3: D, 4: d4: E, 5: d5: F, 6: d6: G);
impl_tuple_n!(tuple8, 8, 0: d0: A, 1: d1: B, 2: d2: C, 3: d3: D, 4: d4: E, 5: d5: F, 6: d6: G, 7: d7: H);

/// Run `dec` against an already-parsed value, starting at the document root.
pub fn from_value<J: JsonValue + 'static, T: 'static>(dec: &Decoder<J, T>, json: &J) -> Result<T, DecodeError> {
    dec.decode(&Path::root(), json)
}

impl<T: 'static> Decoder<serde_json::Value, T> {
    /// Parse `text` and run this decoder against the result. Both the parse
    /// failure and the decode failure are rendered to plain `String`s -- the
    /// caller-facing boundary doesn't need to distinguish "not JSON" from
    /// "JSON, but the wrong shape".
    pub fn from_string(&self, text: &str) -> Result<T, String> {
        let value = parse_text(text).map_err(|e| format!("Given an invalid JSON: {e}"))?;
        from_value(self, &value).map_err(|e| e.render())
    }

    /// Like [`Decoder::from_string`], but panics on failure. For call sites
    /// (tests, `main`, one-off scripts) that would otherwise immediately
    /// `.unwrap()` the result.
    pub fn unsafe_from_string(&self, text: &str) -> T {
        self.from_string(text).unwrap_or_else(|e| panic!("{e}"))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::primitive::{i32, string};
    use serde_json::{json, Value};

    #[test]
    fn test_field_decodes_present_value() {
        let dec = field("name", string());
        let value = json!({"name": "ferris"});
        assert_eq!(from_value(&dec, &value).unwrap(), "ferris");
    }

    #[test]
    fn test_field_missing_is_bad_field() {
        let dec = field("name", string());
        let value = json!({});
        let err = from_value(&dec, &value).unwrap_err();
        assert!(matches!(err.reason(), ErrorReason::BadField { .. }));
    }

    #[test]
    fn test_at_chains_through_nested_objects() {
        let dec = at(&["a", "b"], i32());
        let value = json!({"a": {"b": 7}});
        assert_eq!(from_value(&dec, &value).unwrap(), 7);
    }

    #[test]
    fn test_at_mid_path_null_is_bad_path() {
        let dec = at(&["a", "b"], i32());
        let value = json!({"a": null});
        let err = from_value(&dec, &value).unwrap_err();
        assert!(matches!(err.reason(), ErrorReason::BadPath { .. }));
    }

    #[test]
    fn test_optional_missing_and_null_both_none() {
        let dec = optional::<Value, i32>("x", i32());
        assert_eq!(from_value(&dec, &json!({})).unwrap(), None);
        assert_eq!(from_value(&dec, &json!({"x": null})).unwrap(), None);
        assert_eq!(from_value(&dec, &json!({"x": 5})).unwrap(), Some(5));
    }

    #[test]
    fn test_index_out_of_bounds_is_too_small_array() {
        let dec = index(2, i32());
        let err = from_value(&dec, &json!([1, 2])).unwrap_err();
        assert!(matches!(err.reason(), ErrorReason::TooSmallArray { .. }));
    }

    #[test]
    fn test_exact_length_rejects_extra_trailing_elements() {
        let dec = exact_length(2);
        assert!(from_value(&dec, &json!([1, 2])).is_ok());
        let err = from_value(&dec, &json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err.reason(), ErrorReason::TooSmallArray { .. }));
    }

    #[test]
    fn test_list_reports_first_failing_element_path() {
        let dec = list(i32());
        let err = from_value(&dec, &json!([1, "x", 3])).unwrap_err();
        assert_eq!(err.path(), "$[1]");
    }

    #[test]
    fn test_dict_collects_key_value_pairs() {
        let dec = dict(i32());
        let value = json!({"a": 1, "b": 2});
        let mut out: Vec<_> = from_value(&dec, &value).unwrap().into_iter().collect();
        out.sort();
        assert_eq!(out, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
    }

    #[test]
    fn test_tuple2_decodes_positionally() {
        let dec = tuple2(string(), i32());
        let value = json!(["x", 1]);
        assert_eq!(from_value(&dec, &value).unwrap(), ("x".to_string(), 1));
    }

    #[test]
    fn test_tuple2_wrong_length_is_too_small_array() {
        let dec = tuple2(string(), i32());
        let err = from_value(&dec, &json!(["x"])).unwrap_err();
        assert!(matches!(err.reason(), ErrorReason::TooSmallArray { .. }));
    }

    #[test]
    fn test_from_string_parse_failure() {
        let dec = string();
        assert!(dec.from_string("not json").is_err());
    }

    #[test]
    fn test_from_string_roundtrip() {
        let dec = string();
        assert_eq!(dec.from_string("\"hi\"").unwrap(), "hi");
    }
}
