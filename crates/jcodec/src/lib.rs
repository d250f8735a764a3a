//! Elm-style JSON decoder/encoder combinators ([`jcodec_core`]), plus a
//! derive-driven automatic coder generator ([`auto`]) for types that don't
//! need a hand-assembled coder. `jcodec-core`'s hand-written combinator core
//! never depends on `auto`, so a caller who only wants decoders/encoders
//! never pays for the generator's machinery.

pub mod auto;

pub use jcodec_core::{decode, encode, object, DecodeError, ErrorReason, Getters, Path};
pub use jcodec_derive::JsonCoder;

/// The JSON representation `auto` and the derive macro are fixed to.
/// `jcodec-core`'s combinators stay generic over any `JsonValue`/
/// `JsonBuilder` implementation; a type-erased, reflection-driven
/// generator needs one concrete representation to downcast its cached
/// coders against, and `serde_json::Value` is the only implementation this
/// workspace provides (see `jcodec-value`).
pub type Json = serde_json::Value;

pub type Decoder<T> = jcodec_core::Decoder<Json, T>;
pub type Encoder<T> = jcodec_core::Encoder<Json, T>;

/// `Json::Null`, exposed so `#[derive(JsonCoder)]`'s generated code can
/// write an explicit null for a missing `Option` field without requiring
/// the derived type's crate to depend on `serde_json` directly.
pub fn null() -> Json {
    Json::Null
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hand_assembled_decoder_runs_through_the_facade_types() {
        let dec: Decoder<i32> = decode::i32();
        assert_eq!(dec.from_string("5").unwrap(), 5);
    }
}
