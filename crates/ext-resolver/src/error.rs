/// Result type for ext-resolver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while preparing a resolution.
///
/// Resolution itself never fails; these come from selection validation and
/// from the host checks that feed the requirements pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A selected name is not in the catalog.
    #[error("unknown extension: {0}")]
    UnknownExtension(String),

    /// A selected extension cannot be installed on this host.
    #[error("extension '{name}' cannot be selected: {}", reasons.join("; "))]
    NotSelectable { name: String, reasons: Vec<String> },

    /// A required executable was not found on PATH.
    #[error("required binary '{tool}' not found on PATH")]
    BinaryNotFound { tool: String },

    /// A resolver option string was not recognised.
    #[error("invalid {option} '{value}'")]
    InvalidOption { option: &'static str, value: String },

    /// Error from ext-catalog
    #[error(transparent)]
    Catalog(#[from] ext_catalog::Error),
}
