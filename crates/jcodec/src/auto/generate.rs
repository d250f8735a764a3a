//! The public entry points: `generate_decoder`/`generate_encoder` build a
//! fresh coder every call; the `_cached` variants additionally consult and
//! populate the process-wide [`super::cache`]. `GenerateError` exists so a
//! generation-time failure surfaces as an ordinary `Result`, never a panic.

use super::cache;
use super::codable::{resolve_decoder, resolve_encoder, GenContext, JsonCodable};
use super::descriptor::CaseStrategy;
use super::extras::ExtraCoders;
use jcodec_core::{Decoder, Encoder};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A generation-time failure. In practice this library's `JsonCodable`
/// impls never fail to *build* a coder (failure happens later, when the
/// built decoder runs against a malformed document) -- this type exists so
/// the signature has somewhere to put a failure if a future `JsonCodable`
/// impl needs to reject a configuration (e.g. an extras override with a
/// mismatched hash) without panicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateError(pub String);

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for GenerateError {}

/// Build a decoder for `T` fresh, bypassing the process-wide cache.
pub fn generate_decoder<T: JsonCodable>(
    case_strategy: CaseStrategy,
    extras: ExtraCoders,
    skip_null_field: bool,
) -> Result<Decoder<Value, T>, GenerateError> {
    let ctx = GenContext::new(case_strategy, extras, skip_null_field);
    tracing::debug!(type_name = std::any::type_name::<T>(), ?case_strategy, "generating decoder");
    // Goes through `resolve_decoder`, not `T::build_decoder` directly, so a
    // self-referential `T` finds its own in-progress placeholder already
    // installed by the time a field tries to recurse into it (Invariant 7).
    Ok(resolve_decoder::<T>(&ctx))
}

/// Build an encoder for `T` fresh, bypassing the process-wide cache.
pub fn generate_encoder<T: JsonCodable>(
    case_strategy: CaseStrategy,
    extras: ExtraCoders,
    skip_null_field: bool,
) -> Result<Encoder<Value, T>, GenerateError> {
    let ctx = GenContext::new(case_strategy, extras, skip_null_field);
    tracing::debug!(type_name = std::any::type_name::<T>(), ?case_strategy, "generating encoder");
    Ok(resolve_encoder::<T>(&ctx))
}

/// `generate_decoder`, memoized by `(type_name::<T>(), case_strategy,
/// extras.hash())` in the process-wide cache. Two calls with an equal key
/// are guaranteed to agree on every input (Invariant 6).
pub fn generate_decoder_cached<T: JsonCodable>(
    case_strategy: CaseStrategy,
    extras: ExtraCoders,
    skip_null_field: bool,
) -> Result<Decoder<Value, T>, GenerateError> {
    let key = cache::key(
        "decoder",
        std::any::type_name::<T>(),
        case_name(case_strategy),
        &extras.hash(),
    );
    if let Some(hit) = cache::get(&key) {
        tracing::trace!(type_name = std::any::type_name::<T>(), "decoder cache hit");
        return Ok(downcast_decoder::<T>(hit));
    }
    tracing::trace!(type_name = std::any::type_name::<T>(), "decoder cache miss");
    let decoder = generate_decoder::<T>(case_strategy, extras, skip_null_field)?;
    let boxed: Arc<dyn Any + Send + Sync> = Arc::new(decoder.clone());
    let installed = cache::get_or_insert_with(key, || boxed);
    Ok(downcast_decoder::<T>(installed))
}

/// `generate_encoder`, memoized the same way as [`generate_decoder_cached`].
pub fn generate_encoder_cached<T: JsonCodable>(
    case_strategy: CaseStrategy,
    extras: ExtraCoders,
    skip_null_field: bool,
) -> Result<Encoder<Value, T>, GenerateError> {
    let key = cache::key(
        "encoder",
        std::any::type_name::<T>(),
        case_name(case_strategy),
        &extras.hash(),
    );
    if let Some(hit) = cache::get(&key) {
        tracing::trace!(type_name = std::any::type_name::<T>(), "encoder cache hit");
        return Ok(downcast_encoder::<T>(hit));
    }
    tracing::trace!(type_name = std::any::type_name::<T>(), "encoder cache miss");
    let encoder = generate_encoder::<T>(case_strategy, extras, skip_null_field)?;
    let boxed: Arc<dyn Any + Send + Sync> = Arc::new(encoder.clone());
    let installed = cache::get_or_insert_with(key, || boxed);
    Ok(downcast_encoder::<T>(installed))
}

/// Pretty/compact-print a value of `T` using its cached, default-
/// configuration encoder.
pub fn to_string<T: JsonCodable>(
    space: usize,
    value: &T,
    case_strategy: CaseStrategy,
    extras: ExtraCoders,
    skip_null_field: bool,
) -> Result<String, GenerateError> {
    let encoder = generate_encoder_cached::<T>(case_strategy, extras, skip_null_field)?;
    Ok(jcodec_core::encode::to_string(space, &encoder.encode(value)))
}

/// Parse and decode `text` using the cached, default-configuration decoder.
pub fn from_string<T: JsonCodable>(
    text: &str,
    case_strategy: CaseStrategy,
    extras: ExtraCoders,
    skip_null_field: bool,
) -> Result<T, String> {
    let decoder = generate_decoder_cached::<T>(case_strategy, extras, skip_null_field)
        .map_err(|e| e.to_string())?;
    decoder.from_string(text)
}

/// As [`from_string`], panicking (with the rendered decode error) instead
/// of returning `Err`. For call sites decoding a document the caller
/// already trusts (tests, config the program generated itself).
pub fn unsafe_from_string<T: JsonCodable>(
    text: &str,
    case_strategy: CaseStrategy,
    extras: ExtraCoders,
    skip_null_field: bool,
) -> T {
    from_string(text, case_strategy, extras, skip_null_field).unwrap_or_else(|e| panic!("{e}"))
}

fn case_name(case: CaseStrategy) -> &'static str {
    match case {
        CaseStrategy::PascalCase => "PascalCase",
        CaseStrategy::CamelCase => "CamelCase",
        CaseStrategy::SnakeCase => "SnakeCase",
    }
}

fn downcast_decoder<T: 'static>(boxed: Arc<dyn Any + Send + Sync>) -> Decoder<Value, T> {
    boxed
        .downcast_ref::<Decoder<Value, T>>()
        .expect("coder cache type mismatch for key")
        .clone()
}

fn downcast_encoder<T: 'static>(boxed: Arc<dyn Any + Send + Sync>) -> Encoder<Value, T> {
    boxed
        .downcast_ref::<Encoder<Value, T>>()
        .expect("coder cache type mismatch for key")
        .clone()
}
