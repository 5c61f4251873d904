//! In-process expiring store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::store::{Entry, ExpirableStore, validate_key};

/// Entries held in a mutex-guarded map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore<C = SystemClock> {
    entries: Mutex<HashMap<String, Entry>>,
    clock: C,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> MemoryStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock> ExpirableStore for MemoryStore<C> {
    fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        validate_key(key)?;
        let entry = Entry::new(value, self.clock.now(), ttl)?;
        self.entries().insert(key.to_string(), entry);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;
        let now = self.clock.now();
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    fn delete(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let now = self.clock.now();
        Ok(self
            .entries()
            .remove(key)
            .is_some_and(|entry| !entry.is_expired(now)))
    }

    fn purge_expired(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use serde_json::json;

    #[test]
    fn test_put_get_delete() {
        let store = MemoryStore::new();
        store
            .put("plan", json!({"forum": "Forum"}), Duration::from_secs(60))
            .unwrap();

        assert_eq!(store.get("plan").unwrap(), Some(json!({"forum": "Forum"})));
        assert!(store.delete("plan").unwrap());
        assert_eq!(store.get("plan").unwrap(), None);
        assert!(!store.delete("plan").unwrap());
    }

    #[test]
    fn test_expired_entry_reads_as_absent() {
        let clock = ManualClock::default();
        let store = MemoryStore::with_clock(clock.clone());
        store.put("plan", json!(1), Duration::from_secs(60)).unwrap();

        clock.advance(chrono::Duration::seconds(61));
        assert_eq!(store.get("plan").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let clock = ManualClock::default();
        let store = MemoryStore::with_clock(clock.clone());
        store.put("short", json!(1), Duration::from_secs(10)).unwrap();
        store.put("long", json!(2), Duration::from_secs(100)).unwrap();

        clock.advance(chrono::Duration::seconds(30));
        assert_eq!(store.purge_expired().unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("long").unwrap(), Some(json!(2)));
    }

    #[test]
    fn test_rejects_invalid_key() {
        let store = MemoryStore::new();
        assert!(store.put("../x", json!(1), Duration::from_secs(1)).is_err());
    }
}
