//! The coder cache (CACHE): a process-wide, `RwLock`-guarded table behind a
//! `once_cell::sync::Lazy`, memoizing coders by `(type_name, case_strategy,
//! extras_hash)`. No teardown, no eviction -- a coder, once generated, is
//! immutable and cheap enough (an `Arc`-backed closure) to keep forever.
//! Callers who cannot afford the footprint use the non-cached
//! `generate_decoder`/`generate_encoder`.

use once_cell::sync::Lazy;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type CachedCoder = Arc<dyn Any + Send + Sync>;

static CACHE: Lazy<RwLock<HashMap<String, CachedCoder>>> = Lazy::new(|| RwLock::new(HashMap::new()));

pub fn key(kind: &str, type_name: &str, case: &str, extras_hash: &str) -> String {
    format!("{kind}|{type_name}|{case}|{extras_hash}")
}

pub fn get(key: &str) -> Option<CachedCoder> {
    CACHE.read().expect("coder cache poisoned").get(key).cloned()
}

/// Installs `coder` under `key` unless another thread raced us and got
/// there first, in which case the existing entry wins (coders for the
/// same key are required to agree, so it doesn't matter which one is
/// kept).
pub fn get_or_insert_with(key: String, build: impl FnOnce() -> CachedCoder) -> CachedCoder {
    if let Some(hit) = get(&key) {
        return hit;
    }
    let coder = build();
    let mut guard = CACHE.write().expect("coder cache poisoned");
    guard.entry(key).or_insert(coder).clone()
}

#[cfg(test)]
pub(crate) fn clear_for_test() {
    CACHE.write().expect("coder cache poisoned").clear();
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get_or_insert_with_only_builds_once() {
        clear_for_test();
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let k = key("decoder", "i32", "PascalCase", "0");
        for _ in 0..5 {
            get_or_insert_with(k.clone(), || {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Arc::new(42i32)
            });
        }
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
