//! The auto-coder generator (AUTO): type-directed derivation of boxed
//! encoders/decoders from a type's shape, with a user-extensible override
//! table ([`ExtraCoders`], EXT) and a process-wide memoization cache
//! ([`cache`], CACHE). See `codable`'s module doc for why the actual
//! construction mechanism is a second trait (`JsonCodable`) rather than a
//! generic interpreter over [`TypeDescriptor`].

pub mod cache;
mod codable;
mod descriptor;
mod extras;
mod generate;

pub use codable::{resolve_decoder, resolve_encoder, union_decoder, GenContext, JsonCodable};
pub use descriptor::{CaseStrategy, Described, Thunk, TypeDescriptor};
pub use extras::ExtraCoders;
pub use generate::{
    from_string, generate_decoder, generate_decoder_cached, generate_encoder, generate_encoder_cached,
    to_string, unsafe_from_string, GenerateError,
};
