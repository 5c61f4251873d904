//! Version constraint parsing and checking.
//!
//! Dependency declarations may carry a constraint on the version of the
//! extension they point at (e.g. `views (>=10.0,<11)`), and descriptors may
//! constrain the host core version. Both use the same grammar:
//!
//! - comma-separated specifiers, all of which must match
//! - operators `>=`, `>`, `<=`, `<`, `==`, `!=`; a bare version means `==`
//! - versions written as `major.minor` (patch defaults to 0) or full semver
//! - a leading core-compatibility prefix such as `8.x-` is ignored, so
//!   `8.x-1.2` compares as `1.2.0`
//!
//! # Examples
//!
//! ```
//! use ext_catalog::version::VersionConstraint;
//!
//! let constraint = VersionConstraint::parse(">=10.1").unwrap();
//! assert!(constraint.satisfies("10.2.3"));
//! assert!(!constraint.satisfies("10.0.9"));
//!
//! let constraint = VersionConstraint::parse(">=1.2,<2").unwrap();
//! assert!(constraint.satisfies("8.x-1.4"));
//! assert!(!constraint.satisfies("2.0.0"));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Gte,
    Gt,
    Lte,
    Lt,
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Specifier {
    op: CompareOp,
    version: semver::Version,
}

impl Specifier {
    fn matches(&self, candidate: &semver::Version) -> bool {
        match self.op {
            CompareOp::Gte => candidate >= &self.version,
            CompareOp::Gt => candidate > &self.version,
            CompareOp::Lte => candidate <= &self.version,
            CompareOp::Lt => candidate < &self.version,
            CompareOp::Eq => candidate == &self.version,
            CompareOp::Ne => candidate != &self.version,
        }
    }
}

/// A parsed version constraint that can be checked against concrete versions.
///
/// Serializes as its original string form.
#[derive(Debug, Clone)]
pub struct VersionConstraint {
    specifiers: Vec<Specifier>,
    raw: String,
}

impl VersionConstraint {
    /// Parse a constraint string such as `>=10.1` or `>=1.2,<2`.
    pub fn parse(constraint: &str) -> Result<Self> {
        let raw = constraint.trim().to_string();
        let mut specifiers = Vec::new();

        for part in raw.split(',').map(str::trim) {
            if part.is_empty() {
                continue;
            }
            specifiers.push(parse_specifier(part)?);
        }

        if specifiers.is_empty() {
            return Err(Error::VersionConstraintParse {
                constraint: raw,
                reason: "empty constraint".to_string(),
            });
        }

        Ok(Self { specifiers, raw })
    }

    /// Check if a version string satisfies this constraint.
    ///
    /// Returns `false` if the version string cannot be parsed.
    pub fn satisfies(&self, version: &str) -> bool {
        match normalize_version(version) {
            Ok(parsed) => self.satisfies_version(&parsed),
            Err(_) => false,
        }
    }

    /// Check if a `semver::Version` satisfies this constraint.
    pub fn satisfies_version(&self, version: &semver::Version) -> bool {
        self.specifiers.iter().all(|spec| spec.matches(version))
    }

    /// Return the original constraint string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for VersionConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.specifiers == other.specifiers
    }
}

impl Eq for VersionConstraint {}

impl std::fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for VersionConstraint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for VersionConstraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for VersionConstraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Returns `true` when `current` is at least `minimum`.
///
/// Unparseable input on either side counts as not meeting the minimum.
pub fn meets_minimum(current: &str, minimum: &str) -> bool {
    match (normalize_version(current), normalize_version(minimum)) {
        (Ok(current), Ok(minimum)) => current >= minimum,
        _ => false,
    }
}

fn parse_specifier(s: &str) -> Result<Specifier> {
    let (op, version_str) = if let Some(rest) = s.strip_prefix(">=") {
        (CompareOp::Gte, rest)
    } else if let Some(rest) = s.strip_prefix("<=") {
        (CompareOp::Lte, rest)
    } else if let Some(rest) = s.strip_prefix("!=") {
        (CompareOp::Ne, rest)
    } else if let Some(rest) = s.strip_prefix("==") {
        (CompareOp::Eq, rest)
    } else if let Some(rest) = s.strip_prefix('>') {
        (CompareOp::Gt, rest)
    } else if let Some(rest) = s.strip_prefix('<') {
        (CompareOp::Lt, rest)
    } else if let Some(rest) = s.strip_prefix('=') {
        (CompareOp::Eq, rest)
    } else {
        (CompareOp::Eq, s)
    };

    let version_str = version_str.trim();
    let version = normalize_version(version_str).map_err(|_| Error::VersionConstraintParse {
        constraint: s.to_string(),
        reason: format!("invalid version: {version_str}"),
    })?;

    Ok(Specifier { op, version })
}

/// Normalize a version string to semver.
///
/// - `"10.2"` -> `10.2.0`
/// - `"10"` -> `10.0.0`
/// - `"8.x-1.2"` -> `1.2.0`
/// - `"10.2.x-dev"` -> `10.2.0-dev` (a wildcard segment counts as `0`)
pub fn normalize_version(s: &str) -> std::result::Result<semver::Version, String> {
    let s = strip_core_prefix(s.trim());

    if let Ok(v) = semver::Version::parse(s) {
        return Ok(v);
    }

    let (release, pre) = match s.split_once('-') {
        Some((release, pre)) => (release, Some(pre)),
        None => (s, None),
    };
    let mut parts: Vec<&str> = release
        .split('.')
        .map(|part| if part.eq_ignore_ascii_case("x") { "0" } else { part })
        .collect();
    if parts.len() > 3 {
        return Err(format!("invalid version '{s}'"));
    }
    parts.resize(3, "0");

    let mut normalized = parts.join(".");
    if let Some(pre) = pre {
        normalized.push('-');
        normalized.push_str(pre);
    }
    semver::Version::parse(&normalized).map_err(|e| format!("invalid version '{s}': {e}"))
}

/// Strip a `N.x-` core-compatibility prefix.
///
/// Only applies when a version follows, so `10.x-dev` is left alone.
fn strip_core_prefix(s: &str) -> &str {
    if let Some((prefix, rest)) = s.split_once(".x-") {
        if !prefix.is_empty()
            && prefix.chars().all(|c| c.is_ascii_digit())
            && rest.starts_with(|c: char| c.is_ascii_digit())
        {
            return rest;
        }
    }
    s
}
