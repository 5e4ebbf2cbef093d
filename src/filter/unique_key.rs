//! Key de-duplication for the applied filters.
//!
//! Magento 1.7 honours only one filter per key. Colliding keys are made
//! distinct by upper-casing their characters one at a time, left to right.
//! This is best effort: once every character has been visited the key is
//! kept as is, so already upper-case keys or more collisions than the key
//! has characters stay duplicated.

use std::collections::HashSet;
use tracing::warn;

/// Derive a key not present in `used_keys`, or the last attempted variant
/// when the key is exhausted.
pub fn create_unique_key(used_keys: &HashSet<String>, key: &str) -> String {
    let mut chars: Vec<char> = key.chars().collect();
    let mut candidate = key.to_string();
    let mut i = 0;

    while used_keys.contains(&candidate) && i < chars.len() {
        // Non-ASCII characters are left untouched
        chars[i].make_ascii_uppercase();
        candidate = chars.iter().collect();
        i += 1;
    }

    candidate
}

/// Tracks keys emitted so far during one pass over the filters
#[derive(Debug, Default)]
pub struct KeyDeduplicator {
    used_keys: HashSet<String>,
}

impl KeyDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the key to emit for `key` and mark it as used
    pub fn claim(&mut self, key: &str) -> String {
        let unique = create_unique_key(&self.used_keys, key);
        if self.used_keys.contains(&unique) {
            warn!(
                key = %key,
                emitted = %unique,
                "Unable to derive a unique filter key, the remote API may drop this filter"
            );
        }
        self.used_keys.insert(unique.clone());
        unique
    }
}
