//! Dependency resolution for Extension Installer.
//!
//! Given a catalog and a selection, [`DependencyResolver`] computes which
//! extensions to enable: the selection, everything the install profile
//! requires, and every transitive dependency, minus anything that fails a
//! [`RequirementsChecker`] along with what depends on it.

pub mod error;
pub mod options;
pub mod request;
pub mod requirements;
pub mod resolver;
pub mod result;

pub use error::{Error, Result};
pub use options::{CascadeDepth, ExperimentalRule, ResolverOptions};
pub use request::ResolutionRequest;
pub use requirements::{
    AllInstallable, Blocklist, RequirementFailure, RequirementsChecker, SystemRequirements,
    check_binary_on_path,
};
pub use resolver::DependencyResolver;
pub use result::ResolutionResult;
