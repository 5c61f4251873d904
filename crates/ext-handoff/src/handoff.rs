//! Passing a value from one step to the next under an account key.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::store::{ExpirableStore, MAX_KEY_LEN};

/// How long a stashed value stays readable unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

const KEY_PREFIX: &str = "install-plan";

/// Longest account name that still yields a valid store key.
pub const MAX_ACCOUNT_LEN: usize = MAX_KEY_LEN - KEY_PREFIX.len() - 1;

/// Typed wrapper over an [`ExpirableStore`] keyed by account.
///
/// One step [`stash`](Self::stash)es a value for an account; the next step
/// [`take`](Self::take)s it, which also removes it. A value not taken within
/// the time-to-live is gone.
#[derive(Debug, Clone)]
pub struct Handoff<S> {
    store: S,
    ttl: Duration,
}

impl<S: ExpirableStore> Handoff<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store key used for `account`.
    pub fn key_for(account: &str) -> String {
        format!("{KEY_PREFIX}.{account}")
    }

    /// Replace whatever `account` has stashed with `value`.
    pub fn stash<T: Serialize>(&self, account: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.store.put(&Self::key_for(account), value, self.ttl)
    }

    /// Read the stashed value without removing it.
    pub fn peek<T: DeserializeOwned>(&self, account: &str) -> Result<Option<T>> {
        self.store
            .get(&Self::key_for(account))?
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    /// Read and remove the stashed value.
    pub fn take<T: DeserializeOwned>(&self, account: &str) -> Result<Option<T>> {
        let value = self.peek(account)?;
        if value.is_some() {
            self.store.delete(&Self::key_for(account))?;
        }
        Ok(value)
    }

    /// Discard whatever `account` has stashed.
    pub fn discard(&self, account: &str) -> Result<bool> {
        self.store.delete(&Self::key_for(account))
    }
}
