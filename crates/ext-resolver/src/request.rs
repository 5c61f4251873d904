//! The set of extensions a user asked to enable.

use std::collections::BTreeSet;

use ext_catalog::{Catalog, HostEnvironment, assess};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Extension names marked for enabling.
///
/// The resolver ignores names absent from the catalog. Use
/// [`ResolutionRequest::validated`] to reject them up front instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRequest {
    names: BTreeSet<String>,
}

impl ResolutionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a request, rejecting names that are unknown or that the
    /// catalog marks as not selectable on `host`.
    ///
    /// Already-enabled extensions are accepted and left in the request;
    /// the resolver skips them.
    pub fn validated<I, S>(catalog: &Catalog, host: &HostEnvironment, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request: Self = names.into_iter().collect();

        for name in &request.names {
            let extension = catalog
                .get(name)
                .ok_or_else(|| Error::UnknownExtension(name.clone()))?;
            if extension.enabled {
                continue;
            }

            let eligibility = assess(catalog, extension, host);
            if !eligibility.selectable {
                return Err(Error::NotSelectable {
                    name: name.clone(),
                    reasons: eligibility.blocking_reasons(),
                });
            }
        }

        Ok(request)
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ResolutionRequest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ext_catalog::Extension;

    fn catalog() -> Catalog {
        Catalog::from_extensions([
            Extension::new("system").enabled(),
            Extension::new("forum").depends_on("comment"),
            Extension::new("comment"),
            Extension::new("orphan").depends_on("ghost"),
            Extension::new("user").required(),
        ])
    }

    #[test]
    fn test_collects_and_dedups() {
        let request: ResolutionRequest = ["forum", "comment", "forum"].into_iter().collect();
        assert_eq!(request.len(), 2);
        assert!(request.contains("forum"));
        assert_eq!(request.names().collect::<Vec<_>>(), vec!["comment", "forum"]);
    }

    #[test]
    fn test_validated_accepts_selectable_and_enabled() {
        let request =
            ResolutionRequest::validated(&catalog(), &HostEnvironment::default(), ["forum", "system"])
                .unwrap();
        assert_eq!(request.len(), 2);
    }

    #[test]
    fn test_validated_rejects_unknown() {
        let err = ResolutionRequest::validated(&catalog(), &HostEnvironment::default(), ["nope"])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownExtension(ref name) if name == "nope"));
    }

    #[test]
    fn test_validated_rejects_missing_dependency() {
        let err = ResolutionRequest::validated(&catalog(), &HostEnvironment::default(), ["orphan"])
            .unwrap_err();
        match err {
            Error::NotSelectable { name, reasons } => {
                assert_eq!(name, "orphan");
                assert_eq!(reasons, vec!["requires ghost (missing)"]);
            }
            other => panic!("expected NotSelectable, got {other:?}"),
        }
    }

    #[test]
    fn test_validated_rejects_profile_required() {
        let err = ResolutionRequest::validated(&catalog(), &HostEnvironment::default(), ["user"])
            .unwrap_err();
        assert!(err.to_string().contains("required by the Standard profile"));
    }
}
