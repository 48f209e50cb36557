//! Memo of rendered knowledge fragments keyed by `(domain, regime)`.
//!
//! Unbounded: the key space is at most 7 × 3 entries. Cleared only on
//! request.

use std::collections::HashMap;
use std::sync::RwLock;

use bizpilot_core::{Domain, Regime};

pub type CacheKey = (Option<Domain>, Regime);

#[derive(Debug, Default)]
pub struct ContextCache {
    entries: RwLock<HashMap<CacheKey, String>>,
}

impl ContextCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Cached value for `key`, rendering and storing it on a miss.
    /// The flag is `true` on a hit.
    pub fn get_or_insert_with(&self, key: CacheKey, render: impl FnOnce() -> String) -> (String, bool) {
        if let Some(hit) = self.get(&key) {
            return (hit, true);
        }
        let value = render();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let stored = entries.entry(key).or_insert(value);
        (stored.clone(), false)
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
