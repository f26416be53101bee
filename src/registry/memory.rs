//! In-memory registry guarded by a single lock.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::observability::metrics;
use crate::registry::{Bookmark, Registry};

/// Process-lifetime registry.
///
/// A `BTreeMap` keeps entries ordered by name, so a snapshot is a single
/// in-order walk taken under the read lock. Every mutation holds the write
/// lock, so no reader ever sees a half-applied `put`.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Registry for MemoryRegistry {
    fn get(&self, short_name: &str) -> Option<String> {
        // Each mutation is one insert, so a poisoned lock still guards a whole map.
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(short_name).cloned()
    }

    fn put(&self, short_name: String, long_uri: String) {
        let len = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries.insert(short_name, long_uri);
            entries.len()
        };
        metrics::record_registry_size(len);
    }

    fn snapshot(&self) -> Vec<Bookmark> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .map(|(short_name, long_uri)| Bookmark {
                short_name: short_name.clone(),
                long_uri: long_uri.clone(),
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
