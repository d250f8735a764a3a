//! Decoder/encoder combinator algebra, structured errors, and the getters
//! object builder: the hand-written half of this workspace's JSON coding
//! story. `jcodec`'s `auto` module builds on top of this crate rather than
//! duplicating it -- every coder the generator produces is, underneath,
//! just a value of [`decode::Decoder`] or [`encode::Encoder`].

pub mod decode;
pub mod encode;
pub mod error;
pub mod object;
pub mod path;

pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{DecodeError, ErrorReason};
pub use object::{object, Getters};
pub use path::Path;
