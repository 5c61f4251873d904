//! Expiring store backed by one JSON file per key.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use fs2::FileExt;
use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::store::{Entry, ExpirableStore, validate_key};

const ENTRY_EXTENSION: &str = "json";

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Entries stored as `<dir>/<key>.json` holding `{ "expires_at", "value" }`.
///
/// Writes go to a locked temp file that is renamed into place, so readers
/// never see a partial entry. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore<C = SystemClock> {
    dir: PathBuf,
    clock: C,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, SystemClock)
    }
}

impl<C: Clock> FileStore<C> {
    pub fn with_clock(dir: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{ENTRY_EXTENSION}")))
    }

    fn read_entry(path: &Path) -> Result<Option<Entry>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(path, e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| Error::Corrupt {
                path: path.to_path_buf(),
                source,
            })
    }

    fn remove(path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(path, e)),
        }
    }
}

impl<C: Clock> ExpirableStore for FileStore<C> {
    fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        let path = self.entry_path(key)?;
        let entry = Entry::new(value, self.clock.now(), ttl)?;
        let content = serde_json::to_vec_pretty(&entry)?;
        write_atomic(&path, &content)?;
        tracing::debug!("Stored '{}' until {}", key, entry.expires_at);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.entry_path(key)?;
        let Some(entry) = Self::read_entry(&path)? else {
            return Ok(None);
        };
        if entry.is_expired(self.clock.now()) {
            tracing::debug!("Entry '{}' expired at {}", key, entry.expires_at);
            Self::remove(&path)?;
            return Ok(None);
        }
        Ok(Some(entry.value))
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let path = self.entry_path(key)?;
        let live = match Self::read_entry(&path) {
            Ok(Some(entry)) => !entry.is_expired(self.clock.now()),
            Ok(None) => false,
            Err(Error::Corrupt { .. }) => false,
            Err(e) => return Err(e),
        };
        Self::remove(&path)?;
        Ok(live)
    }

    fn purge_expired(&self) -> Result<usize> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(Error::io(&self.dir, e)),
        };

        let now = self.clock.now();
        let mut purged = 0;
        for dir_entry in read_dir {
            let path = dir_entry.map_err(|e| Error::io(&self.dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }

            match Self::read_entry(&path) {
                Ok(Some(entry)) if entry.is_expired(now) => {
                    if Self::remove(&path)? {
                        purged += 1;
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping unreadable entry: {}", e),
            }
        }
        Ok(purged)
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial write.
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem.
    let temp_name = format!(
        ".{}.{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    let temp_path = path.with_file_name(&temp_name);

    let result = write_locked(&temp_path, path, content);
    if result.is_err() {
        // Drop the partial temp file.
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_locked(temp_path: &Path, path: &Path, content: &[u8]) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    fs::rename(temp_path, path).map_err(|e| Error::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_entry_file_layout() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("handoff"));
        store
            .put("install-plan.admin", json!({"a": 1}), Duration::from_secs(60))
            .unwrap();

        let path = dir.path().join("handoff/install-plan.admin.json");
        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["value"], json!({"a": 1}));
        assert!(raw["expires_at"].is_string());
    }

    #[test]
    fn test_missing_directory_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nowhere"));
        assert_eq!(store.get("plan").unwrap(), None);
        assert_eq!(store.purge_expired().unwrap(), 0);
        assert!(!store.delete("plan").unwrap());
    }

    #[test]
    fn test_corrupt_entry() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("plan.json"), "{not json").unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(store.get("plan"), Err(Error::Corrupt { .. })));
        // Purging skips it; deleting clears it.
        assert_eq!(store.purge_expired().unwrap(), 0);
        assert!(!store.delete("plan").unwrap());
        assert_eq!(store.get("plan").unwrap(), None);
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        // A non-empty directory in the way makes the final rename fail.
        let target = dir.path().join("plan.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        assert!(write_atomic(&target, b"{}").is_err());

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temp files left: {leftovers:?}");
    }
}
