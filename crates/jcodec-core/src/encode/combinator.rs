//! Structural encoder combinators: building compound JSON values out of
//! encoders for their parts.

use super::Encoder;
use jcodec_value::JsonBuilder;
use std::collections::HashMap;

/// Build a JSON object from already-encoded `(key, value)` pairs.
pub fn object<J: JsonBuilder>(pairs: Vec<(String, J)>) -> J {
    J::object(pairs)
}

/// Build a JSON array from already-encoded values.
pub fn array<J: JsonBuilder>(items: Vec<J>) -> J {
    J::array(items)
}

/// Alias of [`array`] taking any `IntoIterator`, kept as a distinct name
/// from `list` even though both target the same JSON shape -- `seq` reads
/// better at a call site building an array from an iterator rather than an
/// owned `Vec`.
pub fn seq<J: JsonBuilder>(items: impl IntoIterator<Item = J>) -> J {
    array(items.into_iter().collect())
}

/// `list(enc)`: an encoder for `Vec<T>`, applying `enc` elementwise.
pub fn list<J: JsonBuilder + 'static, T: 'static>(enc: Encoder<J, T>) -> Encoder<J, Vec<T>> {
    Encoder::new(move |items: &Vec<T>| array(items.iter().map(|item| enc.encode(item)).collect()))
}

/// `dict(value_enc)`: an encoder for `HashMap<String, V>`, encoded as a
/// JSON object. Key iteration order follows `HashMap`'s own order, which is
/// not stable across runs -- callers needing deterministic output should
/// encode a `BTreeMap` instead.
pub fn dict<J: JsonBuilder + 'static, V: 'static>(
    value_enc: Encoder<J, V>,
) -> Encoder<J, HashMap<String, V>> {
    Encoder::new(move |map: &HashMap<String, V>| {
        object(map.iter().map(|(k, v)| (k.clone(), value_enc.encode(v))).collect())
    })
}

/// `option(enc)`: `Some(x) -> enc(x)`; `None -> null`.
pub fn option<J: JsonBuilder + 'static, T: 'static>(enc: Encoder<J, T>) -> Encoder<J, Option<T>> {
    Encoder::new(move |v: &Option<T>| match v {
        Some(x) => enc.encode(x),
        None => J::null(),
    })
}

macro_rules! impl_tuple_n {
    ($name:ident, $($idx:tt : $slot:ident : $T:ident),+) => {
        #[doc = concat!("`", stringify!($name), "`: encode a tuple positionally as a JSON array.")]
        pub fn $name<J: JsonBuilder + 'static, $($T: 'static),+>(
            $($slot: Encoder<J, $T>),+
        ) -> Encoder<J, ($($T,)+)> {
            Encoder::new(move |v: &($($T,)+)| {
                array(vec![$($slot.encode(&v.$idx)),+])
            })
        }
    };
}

impl_tuple_n!(tuple2, 0: e0: A, 1: e1: B);
impl_tuple_n!(tuple3, 0: e0: A, 1: e1: B, 2: e2: C);
impl_tuple_n!(tuple4, 0: e0: A, 1: e1: B, 2: e2: C, 3: e3: D);
impl_tuple_n!(tuple5, 0: e0: A, 1: e1: B, 2: e2: C, 3: e3: D, 4: e4: E);
impl_tuple_n!(tuple6, 0: e0: A, 1: e1: B, 2: e2: C, 3: e3: D, 4: e4: E, 5: e5: F);
impl_tuple_n!(tuple7, 0: e0: A, 1: e1: B, 2: e2: C, 3: e3: D, 4: e4: E, 5: e5: F, 6: e6: G);
impl_tuple_n!(tuple8, 0: e0: A, 1: e1: B, 2: e2: C, 3: e3: D, 4: e4: E, 5: e5: F, 6: e6: G, 7: e7: H);

/// `assoc_list(key_enc, value_enc)`: an encoder for `Vec<(K, V)>`, for map
/// types whose key isn't a JSON-object-key type -- encodes as an array of
/// 2-element arrays.
pub fn assoc_list<J: JsonBuilder + 'static, K: 'static, V: 'static>(
    key_enc: Encoder<J, K>,
    value_enc: Encoder<J, V>,
) -> Encoder<J, Vec<(K, V)>> {
    let pair = tuple2(key_enc, value_enc);
    list(pair)
}

/// Encoders for C-like enums via their `#[repr(iNN)]` discriminant.
/// `discriminant` is typically `|v| *v as iNN` at the call site.
pub struct Enum;

macro_rules! impl_enum_repr {
    ($name:ident, $repr:ty) => {
        impl Enum {
            #[doc = concat!("Encode an enum's `", stringify!($repr), "` discriminant as a JSON integer.")]
            pub fn $name<J: JsonBuilder + 'static, T: 'static>(
                discriminant: impl Fn(&T) -> $repr + Send + Sync + 'static,
            ) -> Encoder<J, T> {
                Encoder::new(move |v: &T| J::i64(discriminant(v) as i64))
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
    use crate::encode::primitive::{i32, string};
    use serde_json::{json, Value};

    #[test]
    fn test_object_and_array() {
        let obj: Value = object(vec![("a".to_string(), json!(1))]);
        assert_eq!(obj, json!({"a": 1}));
        let arr: Value = array(vec![json!(1), json!(2)]);
        assert_eq!(arr, json!([1, 2]));
    }

    #[test]
    fn test_list_applies_elementwise() {
        let enc: Encoder<Value, Vec<i32>> = list(i32());
        assert_eq!(enc.encode(&vec![1, 2, 3]), json!([1, 2, 3]));
    }

    #[test]
    fn test_option_none_is_null() {
        let enc: Encoder<Value, Option<i32>> = option(i32());
        assert_eq!(enc.encode(&None), Value::Null);
        assert_eq!(enc.encode(&Some(5)), json!(5));
    }

    #[test]
    fn test_tuple2_encodes_positionally() {
        let enc: Encoder<Value, (String, i32)> = tuple2(string(), i32());
        assert_eq!(enc.encode(&("x".to_string(), 1)), json!(["x", 1]));
    }

    #[test]
    fn test_assoc_list_encodes_as_array_of_pairs() {
        let enc: Encoder<Value, Vec<(String, i32)>> = assoc_list(string(), i32());
        let pairs = vec![("a".to_string(), 1), ("b".to_string(), 2)];
        assert_eq!(enc.encode(&pairs), json!([["a", 1], ["b", 2]]));
    }

    #[test]
    fn test_dict_encodes_as_object() {
        let enc: Encoder<Value, HashMap<String, i32>> = dict(i32());
        let mut map = HashMap::new();
        map.insert("a".to_string(), 1);
        assert_eq!(enc.encode(&map), json!({"a": 1}));
    }

    #[derive(Clone, Copy)]
    #[repr(i32)]
    enum Color {
        Red = 0,
        Green = 1,
        Blue = 2,
    }

    #[test]
    fn test_enum_repr_encodes_discriminant() {
        let enc: Encoder<Value, Color> = Enum::i32(|c: &Color| *c as i32);
        assert_eq!(enc.encode(&Color::Green), json!(1));
    }
}
