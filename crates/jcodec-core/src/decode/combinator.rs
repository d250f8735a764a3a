//! Algebraic combinators: decoders that only combine other decoders, never
//! inspecting `JsonValue` shape themselves.

use super::Decoder;
use crate::error::{DecodeError, ErrorReason};
use jcodec_value::JsonValue;

/// A decoder that always succeeds with the given value, ignoring the input.
pub fn succeed<J: JsonValue + 'static, T: Clone + 'static>(value: T) -> Decoder<J, T> {
    Decoder::new(move |_path, _json| Ok(value.clone()))
}

/// A decoder that always fails with the given message, ignoring the input.
pub fn fail<J: JsonValue + 'static, T: 'static>(message: impl Into<String>) -> Decoder<J, T> {
    let message = message.into();
    Decoder::new(move |path, _json| {
        Err(DecodeError::new(path, ErrorReason::FailMessage(message.clone())))
    })
}

/// The identity decoder: always succeeds with a clone of the raw JSON value
/// at the current path, performing no inspection of its own. Useful for
/// deferring to a later stage (e.g. stashing an `extras`-like untyped blob).
pub fn value<J: JsonValue + Clone + 'static>() -> Decoder<J, J> {
    Decoder::new(|_path, json| Ok(json.clone()))
}

/// `nil(x)`: requires a JSON `null`, yielding `x`; any other shape fails
/// with `BadPrimitive`.
pub fn nil<J: JsonValue + 'static, T: Clone + 'static>(x: T) -> Decoder<J, T> {
    Decoder::new(move |path, json| {
        if json.kind() == jcodec_value::JsonKind::Null {
            Ok(x.clone())
        } else {
            Err(DecodeError::new(
                path,
                ErrorReason::BadPrimitive {
                    expected: "null".to_string(),
                    value: crate::error::generic_msg("null", json, false),
                },
            ))
        }
    })
}

/// `and_then(dec, f)`: run `dec`, then feed its output through `f` to build
/// a second decoder, which is then run against the same path and value.
/// The monadic bind of the algebra -- every other multi-decoder combinator
/// can be expressed in terms of it, though most have direct implementations
/// for better error messages and less closure nesting.
pub fn and_then<J: JsonValue + 'static, A: 'static, B: 'static>(
    dec: Decoder<J, A>,
    f: impl Fn(A) -> Decoder<J, B> + Send + Sync + 'static,
) -> Decoder<J, B> {
    Decoder::new(move |path, json| {
        let a = dec.decode(path, json)?;
        f(a).decode(path, json)
    })
}

/// `one_of(&[dec, ...])`: try each decoder in order against the same path
/// and value, returning the first success. If every decoder fails and more
/// than one was tried, the combined failure is `BadOneOf` of all their
/// rendered errors; with exactly one decoder it forwards that decoder's
/// error unchanged.
pub fn one_of<J: JsonValue + 'static, T: 'static>(decoders: Vec<Decoder<J, T>>) -> Decoder<J, T> {
    Decoder::new(move |path, json| {
        let mut errors = Vec::new();
        for dec in &decoders {
            match dec.decode(path, json) {
                Ok(v) => return Ok(v),
                Err(e) => errors.push(e),
            }
        }
        match errors.len() {
            0 => Err(DecodeError::new(
                path,
                ErrorReason::FailMessage("one_of given no decoders to try".to_string()),
            )),
            1 => Err(errors.into_iter().next().unwrap()),
            _ => Err(DecodeError::new(
                path,
                ErrorReason::BadOneOf(errors.into_iter().map(|e| e.render()).collect()),
            )),
        }
    })
}

/// `and_map(dec_fn, dec_arg)`: applicative "ap" -- decode a function and an
/// argument against the same path/value, apply the function to the
/// argument. Lets a record decoder be assembled as
/// `map(|a| move |b| (a, b), dec_a).and_map(dec_b)` style pipelines; in
/// practice `map2`..`map8` below cover the common arities more directly.
pub fn and_map<J: JsonValue + 'static, A: 'static, B: 'static>(
    dec_fn: Decoder<J, Box<dyn Fn(A) -> B + Send + Sync>>,
    dec_arg: Decoder<J, A>,
) -> Decoder<J, B> {
    Decoder::new(move |path, json| {
        let f = dec_fn.decode(path, json)?;
        let a = dec_arg.decode(path, json)?;
        Ok(f(a))
    })
}

macro_rules! impl_map_n {
    ($name:ident, $($slot:ident : $T:ident),+) => {
        #[doc = concat!("`", stringify!($name), "`: decode each of the given decoders against the same path/value, then combine their outputs with `f`.")]
        pub fn $name<J: JsonValue + 'static, $($T: 'static,)+ R: 'static>(
            f: impl Fn($($T),+) -> R + Send + Sync + 'static,
            $($slot: Decoder<J, $T>),+
        ) -> Decoder<J, R> {
            Decoder::new(move |path, json| {
                Ok(f($($slot.decode(path, json)?),+))
            })
        }
    };
}

impl_map_n!(map1, d0: A);
impl_map_n!(map2, d0: A, d1: B);
impl_map_n!(map3, d0: A, d1: B, d2: C);
impl_map_n!(map4, d0: A, d1: B, d2: C, d3: D);
impl_map_n!(map5, d0: A, d1: B, d2: C, d3: D, d4: E);
impl_map_n!(map6, d0: A, d1: B, d2: C, d3: D, d4: E, d5: F);
impl_map_n!(map7, d0: A, d1: B, d2: C, d3: D, d4: E, d5: F, d6: G);
impl_map_n!(map8, d0: A, d1: B, d2: C, d3: D, d4: E, d5: F, d6: G, d7: H);

/// `all(&[dec, ...])`: decode every element of `decoders` against the same
/// path/value, collecting all outputs into order. Useful when a fixed,
/// heterogeneous-looking set of checks all validate the same value (e.g.
/// multiple invariants on a primitive) and are unified via `T` beforehand.
pub fn all<J: JsonValue + 'static, T: 'static>(decoders: Vec<Decoder<J, T>>) -> Decoder<J, Vec<T>> {
    Decoder::new(move |path, json| {
        decoders.iter().map(|dec| dec.decode(path, json)).collect()
    })
}

/// Decoders for C-like enums via their `#[repr(iNN)]` discriminant: the
/// mirror of `encode::Enum`. `variants` lists each discriminant value
/// paired with the `T` it maps to; the first match wins.
pub struct Enum;

macro_rules! impl_enum_repr {
    ($name:ident, $repr:ty) => {
        impl Enum {
            #[doc = concat!("Decode an enum's `", stringify!($repr), "` discriminant, matching it against `variants`.")]
            pub fn $name<J: JsonValue + 'static, T: Clone + Send + Sync + 'static>(
                variants: Vec<($repr, T)>,
            ) -> Decoder<J, T> {
                and_then(crate::decode::primitive::$name(), move |n: $repr| {
                    match variants.iter().find(|(disc, _)| *disc == n) {
                        Some((_, value)) => succeed(value.clone()),
                        None => fail(format!("unknown discriminant {n}")),
                    }
                })
            }
        }
    };
}

impl_enum_repr!(i8, i8);
impl_enum_repr!(u8, u8);
impl_enum_repr!(i16, i16);
impl_enum_repr!(u16, u16);
impl_enum_repr!(i32, i32);
impl_enum_repr!(u32, u32);

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::primitive::{i32, string};
    use crate::decode::{field, from_value};
    use serde_json::{json, Value};

    #[test]
    fn test_succeed_ignores_input() {
        let dec: Decoder<Value, i32> = succeed(7);
        assert_eq!(from_value(&dec, &json!("whatever")).unwrap(), 7);
    }

    #[test]
    fn test_fail_always_errors() {
        let dec: Decoder<Value, i32> = fail("nope");
        let err = from_value(&dec, &json!(1)).unwrap_err();
        assert!(matches!(err.reason(), ErrorReason::FailMessage(m) if m == "nope"));
    }

    #[test]
    fn test_and_then_threads_decoded_value() {
        let dec = and_then(i32(), |n: i32| if n > 0 { succeed(n) } else { fail("must be positive") });
        assert_eq!(from_value(&dec, &json!(5)).unwrap(), 5);
        assert!(from_value(&dec, &json!(-5)).is_err());
    }

    #[test]
    fn test_one_of_tries_in_order() {
        let dec = one_of(vec![field("a", i32()), field("b", i32())]);
        assert_eq!(from_value(&dec, &json!({"b": 3})).unwrap(), 3);
    }

    #[test]
    fn test_one_of_all_fail_is_bad_one_of() {
        let dec = one_of(vec![field("a", i32()), field("b", i32())]);
        let err = from_value(&dec, &json!({})).unwrap_err();
        assert!(matches!(err.reason(), ErrorReason::BadOneOf(errs) if errs.len() == 2));
    }

    #[test]
    fn test_one_of_all_fail_keeps_the_caller_s_path() {
        let dec = field("nested", one_of(vec![field("a", i32()), field("b", i32())]));
        let err = from_value(&dec, &json!({"nested": {}})).unwrap_err();
        assert_eq!(err.path(), "$.nested");
    }

    #[test]
    fn test_one_of_single_decoder_forwards_error() {
        let dec = one_of(vec![field("a", i32())]);
        let err = from_value(&dec, &json!({})).unwrap_err();
        assert!(matches!(err.reason(), ErrorReason::BadField { .. }));
    }

    #[test]
    fn test_map2_combines_two_fields() {
        let dec = map2(|name: String, age: i32| (name, age), field("name", string()), field("age", i32()));
        let value = json!({"name": "ferris", "age": 10});
        assert_eq!(from_value(&dec, &value).unwrap(), ("ferris".to_string(), 10));
    }

    #[test]
    fn test_all_collects_every_output() {
        let dec = all(vec![field("a", i32()), field("b", i32())]);
        let value = json!({"a": 1, "b": 2});
        assert_eq!(from_value(&dec, &value).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_value_returns_raw_json() {
        let dec: Decoder<Value, Value> = value();
        let v = json!({"anything": [1, 2]});
        assert_eq!(from_value(&dec, &v).unwrap(), v);
    }

    #[test]
    fn test_nil_requires_null() {
        let dec: Decoder<Value, i32> = nil(0);
        assert_eq!(from_value(&dec, &json!(null)).unwrap(), 0);
        assert!(from_value(&dec, &json!(1)).is_err());
    }
}
