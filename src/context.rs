use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::contract::CompileResult;

/// A memoized delegate result and the fingerprint of the source it was built from.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub hash: String,
    pub result: CompileResult,
}

/// Caller-provided state bag threaded through every compiler call of one top-level
/// compile. Delegates memoize into it keyed by file identity; the inline compiler
/// only passes it along. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct CachingContext {
    entries: HashMap<String, CacheEntry>,
}

impl CachingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute_hash(source: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Returns the memoized result for `file_path` if it was built from `source`.
    pub fn get(&self, file_path: &str, source: &str) -> Option<&CompileResult> {
        let entry = self.entries.get(file_path)?;
        if entry.hash == Self::compute_hash(source) {
            Some(&entry.result)
        } else {
            None
        }
    }

    pub fn set(&mut self, file_path: &str, source: &str, result: CompileResult) {
        let hash = Self::compute_hash(source);
        self.entries
            .insert(file_path.to_string(), CacheEntry { hash, result });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
