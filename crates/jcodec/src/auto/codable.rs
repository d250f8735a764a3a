//! The actual generation mechanism behind `auto::generate_decoder`/
//! `generate_encoder`. `TypeDescriptor` (see `auto::descriptor`) describes a
//! type's *shape* for introspection, but Rust has no safe way to build a
//! concrete `T` generically from a shape description alone -- there is no
//! runtime field-setter registry to walk a value's fields by name the way
//! a reflection-capable language would. So the real mechanism is
//! `JsonCodable`: a second trait,
//! implemented by hand here for every built-in container/primitive and
//! emitted by `#[derive(JsonCoder)]` for user records/enums, whose
//! `build_decoder`/`build_encoder` directly construct a `Decoder`/`Encoder`
//! for `Self` using ordinary, monomorphic Rust code. The two traits still
//! agree in shape (a derived `Record`'s `TypeDescriptor` lists the same
//! fields its `JsonCodable` impl decodes, in the same order) -- `Described`
//! exists for introspection and the recursion/cache bookkeeping keyed by
//! `type_name`, while `JsonCodable` is what actually walks.

use super::extras::ExtraCoders;
use super::descriptor::CaseStrategy;
use jcodec_core::{decode, encode};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::any::Any;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

pub type Decoder<T> = jcodec_core::Decoder<Value, T>;
pub type Encoder<T> = jcodec_core::Encoder<Value, T>;

/// Per-generation-call state: the chosen case strategy and override table
/// (threaded down to every nested field), plus the in-progress recursion
/// cells that let a self-referential type terminate (Invariant 7: a
/// placeholder is installed *before* descending into fields, so a field
/// referencing the same type resolves to the in-progress coder instead of
/// re-entering generation).
pub struct GenContext {
    pub case: CaseStrategy,
    pub extras: ExtraCoders,
    pub skip_null_field: bool,
    decoders_in_progress: RefCell<HashMap<&'static str, Arc<OnceCell<Box<dyn Any + Send + Sync>>>>>,
    encoders_in_progress: RefCell<HashMap<&'static str, Arc<OnceCell<Box<dyn Any + Send + Sync>>>>>,
}

impl GenContext {
    pub fn new(case: CaseStrategy, extras: ExtraCoders, skip_null_field: bool) -> Self {
        GenContext {
            case,
            extras,
            skip_null_field,
            decoders_in_progress: RefCell::new(HashMap::new()),
            encoders_in_progress: RefCell::new(HashMap::new()),
        }
    }
}

/// A type whose decoder/encoder `auto` can build: either by hand (this
/// module, for foreign/built-in types) or via `#[derive(JsonCoder)]`.
pub trait JsonCodable: Sized + 'static {
    fn build_decoder(ctx: &GenContext) -> Decoder<Self>;
    fn build_encoder(ctx: &GenContext) -> Encoder<Self>;
}

/// Resolve (or start resolving) the decoder for `T` within an in-progress
/// generation. Consults `ctx.extras` first (Invariant: an override for `T`
/// applies transitively wherever `T` appears), then the recursion table,
/// then calls `T::build_decoder` and installs the result.
pub fn resolve_decoder<T: JsonCodable>(ctx: &GenContext) -> Decoder<T> {
    if let Some((_, dec)) = ctx.extras.get::<T>() {
        return dec;
    }
    let key = std::any::type_name::<T>();
    if let Some(cell) = ctx.decoders_in_progress.borrow().get(key).cloned() {
        return jcodec_core::Decoder::new(move |path, json| {
            let installed = cell
                .get()
                .unwrap_or_else(|| panic!("recursive decoder for `{key}` used before its own generation finished"));
            let dec = installed
                .downcast_ref::<Decoder<T>>()
                .expect("recursion cell type mismatch")
                .clone();
            dec.decode(path, json)
        });
    }
    let cell: Arc<OnceCell<Box<dyn Any + Send + Sync>>> = Arc::new(OnceCell::new());
    ctx.decoders_in_progress.borrow_mut().insert(key, cell.clone());
    tracing::trace!(type_name = key, "generating decoder");
    let decoder = T::build_decoder(ctx);
    let _ = cell.set(Box::new(decoder.clone()));
    ctx.decoders_in_progress.borrow_mut().remove(key);
    decoder
}

/// The encoder-side mirror of [`resolve_decoder`].
pub fn resolve_encoder<T: JsonCodable>(ctx: &GenContext) -> Encoder<T> {
    if let Some((enc, _)) = ctx.extras.get::<T>() {
        return enc;
    }
    let key = std::any::type_name::<T>();
    if let Some(cell) = ctx.encoders_in_progress.borrow().get(key).cloned() {
        return jcodec_core::Encoder::new(move |v: &T| {
            let installed = cell
                .get()
                .unwrap_or_else(|| panic!("recursive encoder for `{key}` used before its own generation finished"));
            let enc = installed
                .downcast_ref::<Encoder<T>>()
                .expect("recursion cell type mismatch")
                .clone();
            enc.encode(v)
        });
    }
    let cell: Arc<OnceCell<Box<dyn Any + Send + Sync>>> = Arc::new(OnceCell::new());
    ctx.encoders_in_progress.borrow_mut().insert(key, cell.clone());
    tracing::trace!(type_name = key, "generating encoder");
    let encoder = T::build_encoder(ctx);
    let _ = cell.set(Box::new(encoder.clone()));
    ctx.encoders_in_progress.borrow_mut().remove(key);
    encoder
}

/// A discriminated union's decoder: try each variant's own tag-checking
/// decoder in turn, falling back to a named "unknown variant" failure
/// rather than `one_of`'s generic `BadOneOf` when nothing matches at all.
pub fn union_decoder<T: 'static>(type_name: &'static str, mut variants: Vec<Decoder<T>>) -> Decoder<T> {
    variants.push(decode::fail(format!("no variant of `{type_name}` matched")));
    decode::one_of(variants)
}

macro_rules! leaf_codable {
    ($ty:ty, $dec:path, $enc:path) => {
        impl JsonCodable for $ty {
            fn build_decoder(_ctx: &GenContext) -> Decoder<Self> {
                $dec()
            }
            fn build_encoder(_ctx: &GenContext) -> Encoder<Self> {
                $enc()
            }
        }
    };
}

leaf_codable!(String, decode::string, encode::string);
leaf_codable!(bool, decode::bool, encode::bool);
leaf_codable!(char, decode::char, encode::char);
leaf_codable!((), decode::unit, encode::unit);
leaf_codable!(i8, decode::i8, encode::i8);
leaf_codable!(u8, decode::u8, encode::u8);
leaf_codable!(i16, decode::i16, encode::i16);
leaf_codable!(u16, decode::u16, encode::u16);
leaf_codable!(i32, decode::i32, encode::i32);
leaf_codable!(u32, decode::u32, encode::u32);
leaf_codable!(i64, decode::i64, encode::i64);
leaf_codable!(u64, decode::u64, encode::u64);
leaf_codable!(f32, decode::float32, encode::float32);
leaf_codable!(f64, decode::float, encode::float);
leaf_codable!(uuid::Uuid, decode::guid, encode::guid);
leaf_codable!(bigdecimal::BigDecimal, decode::decimal, encode::decimal);
leaf_codable!(num_bigint::BigInt, decode::bigint, encode::bigint);
leaf_codable!(time::OffsetDateTime, decode::datetime_utc, encode::datetime_offset);
leaf_codable!(time::PrimitiveDateTime, decode::datetime_local, encode::datetime_local);
leaf_codable!(time::Duration, decode::timespan, encode::timespan);

/// The "any" leaf: passes the raw JSON value through untouched, for fields
/// that deliberately opt out of a typed shape.
impl JsonCodable for Value {
    fn build_decoder(_ctx: &GenContext) -> Decoder<Self> {
        decode::value()
    }
    fn build_encoder(_ctx: &GenContext) -> Encoder<Self> {
        jcodec_core::Encoder::new(|v: &Value| v.clone())
    }
}

impl<T: JsonCodable> JsonCodable for Option<T> {
    fn build_decoder(ctx: &GenContext) -> Decoder<Self> {
        decode::option(resolve_decoder::<T>(ctx))
    }
    fn build_encoder(ctx: &GenContext) -> Encoder<Self> {
        encode::option(resolve_encoder::<T>(ctx))
    }
}

impl<T: JsonCodable> JsonCodable for Vec<T> {
    fn build_decoder(ctx: &GenContext) -> Decoder<Self> {
        decode::list(resolve_decoder::<T>(ctx))
    }
    fn build_encoder(ctx: &GenContext) -> Encoder<Self> {
        encode::list(resolve_encoder::<T>(ctx))
    }
}

/// Plain indirection: a self-referential record/union field is always
/// written as `Box<Self>` in Rust (an unboxed cycle has no finite size),
/// and that box carries no shape of its own on the wire.
impl<T: JsonCodable> JsonCodable for Box<T> {
    fn build_decoder(ctx: &GenContext) -> Decoder<Self> {
        let inner = resolve_decoder::<T>(ctx);
        jcodec_core::Decoder::new(move |path, json| inner.decode(path, json).map(Box::new))
    }
    fn build_encoder(ctx: &GenContext) -> Encoder<Self> {
        let inner = resolve_encoder::<T>(ctx);
        jcodec_core::Encoder::new(move |v: &Box<T>| inner.encode(v))
    }
}

impl<T: JsonCodable + Eq + std::hash::Hash> JsonCodable for HashSet<T> {
    fn build_decoder(ctx: &GenContext) -> Decoder<Self> {
        let inner = decode::list(resolve_decoder::<T>(ctx));
        jcodec_core::Decoder::new(move |path, json| inner.decode(path, json).map(|v| v.into_iter().collect()))
    }
    fn build_encoder(ctx: &GenContext) -> Encoder<Self> {
        let inner = resolve_encoder::<T>(ctx);
        jcodec_core::Encoder::new(move |set: &HashSet<T>| encode::seq(set.iter().map(|v| inner.encode(v))))
    }
}

impl<T: JsonCodable + Ord> JsonCodable for BTreeSet<T> {
    fn build_decoder(ctx: &GenContext) -> Decoder<Self> {
        let inner = decode::list(resolve_decoder::<T>(ctx));
        jcodec_core::Decoder::new(move |path, json| inner.decode(path, json).map(|v| v.into_iter().collect()))
    }
    fn build_encoder(ctx: &GenContext) -> Encoder<Self> {
        let inner = resolve_encoder::<T>(ctx);
        jcodec_core::Encoder::new(move |set: &BTreeSet<T>| encode::seq(set.iter().map(|v| inner.encode(v))))
    }
}

/// A type eligible to be a map key in AUTO-generated coders. `String` and
/// `Uuid` are "stringifiable" -- the map encodes as a JSON object, keyed by
/// `to_key_string`'s output. Every other key type falls back to an array of
/// `[key, value]` pairs (`decode`/`encode`'s `assoc_list`), the same wire
/// shape a hand-assembled coder would use for a non-string-keyed map.
///
/// There's no blanket impl for "every other `JsonCodable` type" here --
/// that would overlap the concrete `String`/`Uuid` impls below without
/// specialization -- so each array-shaped key type gets its own impl via
/// [`array_shaped_map_key!`].
pub trait MapKey: JsonCodable {
    const STRINGIFIABLE: bool;
    fn to_key_string(&self) -> String {
        unreachable!("to_key_string called on a non-stringifiable MapKey")
    }
    fn from_key_string(_s: &str) -> Option<Self> {
        None
    }
}

impl MapKey for String {
    const STRINGIFIABLE: bool = true;
    fn to_key_string(&self) -> String {
        self.clone()
    }
    fn from_key_string(s: &str) -> Option<Self> {
        Some(s.to_string())
    }
}

impl MapKey for uuid::Uuid {
    const STRINGIFIABLE: bool = true;
    fn to_key_string(&self) -> String {
        self.to_string()
    }
    fn from_key_string(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok()
    }
}

macro_rules! array_shaped_map_key {
    ($ty:ty) => {
        impl MapKey for $ty {
            const STRINGIFIABLE: bool = false;
        }
    };
}

array_shaped_map_key!(bool);
array_shaped_map_key!(char);
array_shaped_map_key!(i8);
array_shaped_map_key!(u8);
array_shaped_map_key!(i16);
array_shaped_map_key!(u16);
array_shaped_map_key!(i32);
array_shaped_map_key!(u32);
array_shaped_map_key!(i64);
array_shaped_map_key!(u64);

impl<K: MapKey + Eq + std::hash::Hash, V: JsonCodable> JsonCodable for HashMap<K, V> {
    fn build_decoder(ctx: &GenContext) -> Decoder<Self> {
        if K::STRINGIFIABLE {
            let inner = decode::key_value_pairs(resolve_decoder::<V>(ctx));
            jcodec_core::Decoder::new(move |path, json| {
                inner.decode(path, json)?.into_iter().map(|(k, v)| Ok((key_from_string::<K>(path, &k)?, v))).collect()
            })
        } else {
            let pairs = decode::assoc_list(resolve_decoder::<K>(ctx), resolve_decoder::<V>(ctx));
            jcodec_core::Decoder::new(move |path, json| pairs.decode(path, json).map(|v| v.into_iter().collect()))
        }
    }
    fn build_encoder(ctx: &GenContext) -> Encoder<Self> {
        if K::STRINGIFIABLE {
            let inner = resolve_encoder::<V>(ctx);
            jcodec_core::Encoder::new(move |map: &HashMap<K, V>| {
                encode::object(map.iter().map(|(k, v)| (k.to_key_string(), inner.encode(v))).collect())
            })
        } else {
            let key_enc = resolve_encoder::<K>(ctx);
            let value_enc = resolve_encoder::<V>(ctx);
            jcodec_core::Encoder::new(move |map: &HashMap<K, V>| {
                encode::seq(map.iter().map(|(k, v)| encode::array(vec![key_enc.encode(k), value_enc.encode(v)])))
            })
        }
    }
}

impl<K: MapKey + Ord, V: JsonCodable> JsonCodable for BTreeMap<K, V> {
    fn build_decoder(ctx: &GenContext) -> Decoder<Self> {
        if K::STRINGIFIABLE {
            let inner = decode::key_value_pairs(resolve_decoder::<V>(ctx));
            jcodec_core::Decoder::new(move |path, json| {
                inner.decode(path, json)?.into_iter().map(|(k, v)| Ok((key_from_string::<K>(path, &k)?, v))).collect()
            })
        } else {
            let pairs = decode::assoc_list(resolve_decoder::<K>(ctx), resolve_decoder::<V>(ctx));
            jcodec_core::Decoder::new(move |path, json| pairs.decode(path, json).map(|v| v.into_iter().collect()))
        }
    }
    fn build_encoder(ctx: &GenContext) -> Encoder<Self> {
        if K::STRINGIFIABLE {
            let inner = resolve_encoder::<V>(ctx);
            jcodec_core::Encoder::new(move |map: &BTreeMap<K, V>| {
                encode::object(map.iter().map(|(k, v)| (k.to_key_string(), inner.encode(v))).collect())
            })
        } else {
            let key_enc = resolve_encoder::<K>(ctx);
            let value_enc = resolve_encoder::<V>(ctx);
            jcodec_core::Encoder::new(move |map: &BTreeMap<K, V>| {
                encode::seq(map.iter().map(|(k, v)| encode::array(vec![key_enc.encode(k), value_enc.encode(v)])))
            })
        }
    }
}

/// Parse an object key back into `K` via [`MapKey::from_key_string`],
/// reporting the field itself as the failure location.
fn key_from_string<K: MapKey>(path: &jcodec_core::Path, key: &str) -> Result<K, jcodec_core::DecodeError> {
    K::from_key_string(key).ok_or_else(|| {
        jcodec_core::DecodeError::new(
            &path.push_field(key),
            jcodec_core::ErrorReason::FailMessage(format!("`{key}` is not a valid map key")),
        )
    })
}

macro_rules! impl_tuple_codable {
    ($dec:ident, $enc:ident, $($T:ident),+) => {
        impl<$($T: JsonCodable),+> JsonCodable for ($($T,)+) {
            fn build_decoder(ctx: &GenContext) -> Decoder<Self> {
                decode::$dec($(resolve_decoder::<$T>(ctx)),+)
            }
            fn build_encoder(ctx: &GenContext) -> Encoder<Self> {
                encode::$enc($(resolve_encoder::<$T>(ctx)),+)
            }
        }
    };
}

impl_tuple_codable!(tuple2, tuple2, A, B);
impl_tuple_codable!(tuple3, tuple3, A, B, C);
impl_tuple_codable!(tuple4, tuple4, A, B, C, D);
impl_tuple_codable!(tuple5, tuple5, A, B, C, D, E);
impl_tuple_codable!(tuple6, tuple6, A, B, C, D, E, F);
impl_tuple_codable!(tuple7, tuple7, A, B, C, D, E, F, G);
impl_tuple_codable!(tuple8, tuple8, A, B, C, D, E, F, G, H);

#[cfg(test)]
mod test {
    use super::*;
    use jcodec_core::decode::from_value;
    use serde_json::json;

    fn ctx() -> GenContext {
        GenContext::new(CaseStrategy::PascalCase, ExtraCoders::new(), true)
    }

    #[test]
    fn test_option_decoder_null_is_none() {
        let ctx = ctx();
        let dec = <Option<i32> as JsonCodable>::build_decoder(&ctx);
        assert_eq!(from_value(&dec, &json!(null)).unwrap(), None);
        assert_eq!(from_value(&dec, &json!(5)).unwrap(), Some(5));
    }

    #[test]
    fn test_vec_round_trips_through_encoder_and_decoder() {
        let ctx = ctx();
        let enc = <Vec<String> as JsonCodable>::build_encoder(&ctx);
        let dec = <Vec<String> as JsonCodable>::build_decoder(&ctx);
        let v = vec!["a".to_string(), "b".to_string()];
        let encoded = enc.encode(&v);
        assert_eq!(from_value(&dec, &encoded).unwrap(), v);
    }

    #[test]
    fn test_hashmap_string_key_round_trips() {
        let ctx = ctx();
        let enc = <HashMap<String, i32> as JsonCodable>::build_encoder(&ctx);
        let dec = <HashMap<String, i32> as JsonCodable>::build_decoder(&ctx);
        let mut map = HashMap::new();
        map.insert("a".to_string(), 1);
        let encoded = enc.encode(&map);
        assert_eq!(from_value(&dec, &encoded).unwrap(), map);
    }

    #[test]
    fn test_tuple2_round_trips() {
        let ctx = ctx();
        let enc = <(String, i32) as JsonCodable>::build_encoder(&ctx);
        let dec = <(String, i32) as JsonCodable>::build_decoder(&ctx);
        let pair = ("x".to_string(), 3);
        assert_eq!(from_value(&dec, &enc.encode(&pair)).unwrap(), pair);
    }

    #[test]
    fn test_extras_override_is_used_instead_of_builtin() {
        let override_encoder: Encoder<i32> = jcodec_core::Encoder::new(|v: &i32| json!(format!("n{v}")));
        let override_decoder: Decoder<i32> = jcodec_core::Decoder::new(|_p, j: &Value| {
            Ok(j.as_str().and_then(|s| s.strip_prefix('n')).and_then(|s| s.parse().ok()).unwrap_or(0))
        });
        let extras = ExtraCoders::new().with::<i32>(override_encoder, override_decoder);
        let ctx = GenContext::new(CaseStrategy::PascalCase, extras, true);
        let enc = resolve_encoder::<i32>(&ctx);
        assert_eq!(enc.encode(&7), json!("n7"));
    }
}
