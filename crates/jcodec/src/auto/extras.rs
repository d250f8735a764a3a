//! `ExtraCoders` (EXT): a user-supplied override table `auto` consults
//! before structural generation, so a caller can special-case a type
//! (adjust a wire format, plug in a hand-written coder for a foreign type
//! with no `Described` impl) without forking the generator.

use jcodec_core::{Decoder, Encoder};
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

type BoxedEncoder = Box<dyn Any + Send + Sync>;
type BoxedDecoder = Box<dyn Any + Send + Sync>;

/// Stable by construction: cloning never rehashes, since the hash is fixed
/// at `with_hash` time or lazily derived from the override keys.
#[derive(Clone, Default)]
pub struct ExtraCoders {
    hash: Option<String>,
    entries: HashMap<&'static str, (BoxedEncoder, BoxedDecoder)>,
}

impl ExtraCoders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an override for `T`, keyed by `std::any::type_name::<T>()`
    /// (the library's compile-time stand-in for a runtime type identity).
    pub fn with<T: 'static>(mut self, encoder: Encoder<Value, T>, decoder: Decoder<Value, T>) -> Self {
        self.entries
            .insert(std::any::type_name::<T>(), (Box::new(encoder), Box::new(decoder)));
        self
    }

    /// Supply an explicit fingerprint instead of the derived default.
    /// Callers overriding the default are responsible for changing the
    /// hash whenever the override's *behavior* changes -- two calls with
    /// equal `(case_strategy, hash)` are assumed by [`super::cache`] to
    /// produce agreeing coders.
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn get<T: 'static>(&self) -> Option<(Encoder<Value, T>, Decoder<Value, T>)> {
        let (enc, dec) = self.entries.get(std::any::type_name::<T>())?;
        let enc = enc.downcast_ref::<Encoder<Value, T>>()?.clone();
        let dec = dec.downcast_ref::<Decoder<Value, T>>()?.clone();
        Some((enc, dec))
    }

    /// The fingerprint `auto::cache` folds into its memoization key: an
    /// explicit one if the caller supplied it, otherwise an `fxhash` of
    /// the sorted override keys.
    pub fn hash(&self) -> String {
        match &self.hash {
            Some(h) => h.clone(),
            None => {
                let mut keys: Vec<&str> = self.entries.keys().copied().collect();
                keys.sort_unstable();
                let mut hasher = fxhash::FxHasher::default();
                for key in &keys {
                    key.hash(&mut hasher);
                }
                format!("{:016x}", hasher.finish())
            }
        }
    }
}
