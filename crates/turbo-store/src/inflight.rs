//! In-flight markers.
//!
//! A key is marked while its operation awaits the backend. A second attempt
//! on a marked key is turned away instead of queued, so a double click never
//! becomes a second request. Different keys never block each other.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

/// Set of keys with an operation pending.
#[derive(Debug)]
pub struct InFlight<K> {
    keys: Mutex<HashSet<K>>,
}

impl<K> Default for InFlight<K> {
    fn default() -> Self {
        Self {
            keys: Mutex::new(HashSet::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> InFlight<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key`, or return `None` if it is already marked.
    ///
    /// The mark is cleared when the guard drops, including when the
    /// operation's future is dropped mid-await.
    pub fn try_begin(&self, key: K) -> Option<InFlightGuard<'_, K>> {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if !keys.insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard { owner: self, key })
    }

    /// Check if `key` is marked.
    pub fn contains(&self, key: &K) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    /// Number of marked keys.
    pub fn len(&self) -> usize {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Clears its key on drop.
#[derive(Debug)]
pub struct InFlightGuard<'a, K: Eq + Hash> {
    owner: &'a InFlight<K>,
    key: K,
}

impl<K: Eq + Hash> InFlightGuard<'_, K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<K: Eq + Hash> Drop for InFlightGuard<'_, K> {
    fn drop(&mut self) {
        self.owner
            .keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_rejected_while_held() {
        let inflight: InFlight<String> = InFlight::new();
        let guard = inflight.try_begin("lst-1".to_string()).unwrap();
        assert!(inflight.try_begin("lst-1".to_string()).is_none());
        assert!(inflight.contains(&"lst-1".to_string()));
        drop(guard);
        assert!(inflight.try_begin("lst-1".to_string()).is_some());
    }

    #[test]
    fn test_different_keys_independent() {
        let inflight: InFlight<String> = InFlight::new();
        let _a = inflight.try_begin("a".to_string()).unwrap();
        let _b = inflight.try_begin("b".to_string()).unwrap();
        assert_eq!(inflight.len(), 2);
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let inflight: InFlight<String> = InFlight::new();
        {
            let guard = inflight.try_begin("a".to_string()).unwrap();
            assert_eq!(guard.key(), "a");
        }
        assert!(inflight.is_empty());
    }
}
