//! `extinstall.toml` loading
//!
//! Every section is optional. Relative paths are taken relative to the
//! directory holding the config file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ext_catalog::HostEnvironment;
use ext_handoff::MAX_ACCOUNT_LEN;
use ext_resolver::ResolverOptions;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Config file name looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "extinstall.toml";

/// Account used when neither the config nor the environment names one.
pub const FALLBACK_ACCOUNT: &str = "anonymous";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub catalog: CatalogSection,
    pub host: HostEnvironment,
    pub site: SiteSection,
    pub resolver: ResolverOptions,
    pub handoff: HandoffSection,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// Where extension descriptors live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSection {
    pub path: PathBuf,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("extensions"),
        }
    }
}

/// State of the running site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Extensions already enabled.
    pub enabled: Vec<String>,
}

/// Where `plan` leaves its result for `confirm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandoffSection {
    pub dir: PathBuf,
    pub ttl_seconds: u64,
    pub account: Option<String>,
}

impl Default for HandoffSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".extinstall/handoff"),
            ttl_seconds: 60,
            account: None,
        }
    }
}

impl Config {
    /// Load `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut config = match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str::<Config>(&content).map_err(|source| {
                CliError::ConfigParse {
                    path: path.to_path_buf(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Config::default()
            }
            Err(source) => {
                return Err(CliError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        config.base_dir = base_dir;
        Ok(config)
    }

    /// Descriptor directory, resolved against the config location.
    pub fn catalog_dir(&self) -> PathBuf {
        self.base_dir.join(&self.catalog.path)
    }

    /// Handoff directory, resolved against the config location.
    pub fn handoff_dir(&self) -> PathBuf {
        self.base_dir.join(&self.handoff.dir)
    }

    pub fn handoff_ttl(&self) -> Duration {
        Duration::from_secs(self.handoff.ttl_seconds)
    }

    /// The account a plan is stored under.
    ///
    /// Taken from `[handoff] account`, then `USER`, then `USERNAME`.
    /// Characters that cannot appear in a store key become `_`, and the
    /// result is cut to [`MAX_ACCOUNT_LEN`].
    pub fn account(&self) -> String {
        let raw = self
            .handoff
            .account
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_default();
        sanitize_account(&raw)
    }
}

fn sanitize_account(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let mut cleaned = cleaned.trim_start_matches('.').to_string();
    // ASCII only at this point, so byte truncation is safe.
    cleaned.truncate(MAX_ACCOUNT_LEN);
    if cleaned.is_empty() {
        FALLBACK_ACCOUNT.to_string()
    } else {
        cleaned
    }
}
