//! The expiring key-value store abstraction.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Maximum key length in bytes.
pub const MAX_KEY_LEN: usize = 128;

/// A key-value store whose entries disappear after a time-to-live.
///
/// Expired entries read as absent whether or not they have been purged yet.
pub trait ExpirableStore {
    /// Store `value` under `key` for `ttl`, replacing any previous entry.
    fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()>;

    /// Fetch the live value under `key`.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Remove `key`. Returns whether a live entry was removed.
    fn delete(&self, key: &str) -> Result<bool>;

    /// Drop every expired entry, returning how many were dropped.
    fn purge_expired(&self) -> Result<usize>;
}

/// A stored value and the moment it stops being readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub expires_at: DateTime<Utc>,
    pub value: Value,
}

impl Entry {
    pub fn new(value: Value, now: DateTime<Utc>, ttl: Duration) -> Result<Self> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|_| Error::InvalidTtl {
            seconds: ttl.as_secs(),
        })?;
        let expires_at = now.checked_add_signed(ttl).ok_or(Error::InvalidTtl {
            seconds: ttl.num_seconds().unsigned_abs(),
        })?;
        Ok(Self { expires_at, value })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Check that `key` is usable by every store, including as a file name.
///
/// Keys are ASCII letters, digits, `-`, `_`, and `.`, and may not start
/// with a dot.
pub fn validate_key(key: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    if key.is_empty() {
        return Err(invalid("key is empty"));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(invalid("key is too long"));
    }
    if key.starts_with('.') {
        return Err(invalid("key starts with '.'"));
    }
    if let Some(c) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid(&format!("character '{c}' is not allowed")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("install-plan.admin")]
    #[case("a")]
    #[case("user_42")]
    fn test_valid_keys(#[case] key: &str) {
        assert!(validate_key(key).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case(".hidden")]
    #[case("../escape")]
    #[case("with space")]
    #[case("slash/inside")]
    fn test_invalid_keys(#[case] key: &str) {
        assert!(matches!(validate_key(key), Err(Error::InvalidKey { .. })));
    }

    #[test]
    fn test_overlong_key() {
        let key = "k".repeat(MAX_KEY_LEN + 1);
        assert!(validate_key(&key).is_err());
    }

    #[test]
    fn test_entry_expiry_boundary() {
        let now = Utc::now();
        let entry = Entry::new(Value::Null, now, Duration::from_secs(60)).unwrap();
        assert!(!entry.is_expired(now + chrono::Duration::seconds(59)));
        assert!(entry.is_expired(now + chrono::Duration::seconds(60)));
    }

    #[test]
    fn test_entry_rejects_huge_ttl() {
        let err = Entry::new(Value::Null, Utc::now(), Duration::MAX).unwrap_err();
        assert!(matches!(err, Error::InvalidTtl { .. }));
    }
}
