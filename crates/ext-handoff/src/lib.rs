//! Short-lived handoff storage for Extension Installer.
//!
//! The selection step stashes its computed install set here and the
//! confirmation step takes it back. Entries expire after a time-to-live.
//!
//! - [`ExpirableStore`]: `put`/`get`/`delete`/`purge_expired`
//! - [`MemoryStore`]: in-process map
//! - [`FileStore`]: one JSON file per key, written atomically
//! - [`Handoff`]: typed, account-keyed wrapper over any store

pub mod clock;
pub mod error;
pub mod file;
pub mod handoff;
pub mod memory;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use file::FileStore;
pub use handoff::{DEFAULT_TTL, Handoff, MAX_ACCOUNT_LEN};
pub use memory::MemoryStore;
pub use store::{Entry, ExpirableStore, validate_key};
