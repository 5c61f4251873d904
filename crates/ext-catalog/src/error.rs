use std::path::PathBuf;

/// Errors that can occur while building or loading an extension catalog.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to parse extension descriptor TOML.
    #[error("failed to parse extension descriptor: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to parse an extension descriptor file.
    #[error("failed to parse extension descriptor {path}: {source}")]
    DescriptorParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A descriptor file parsed but failed validation.
    #[error("invalid extension descriptor {path}: {reason}")]
    InvalidDescriptor { path: PathBuf, reason: String },

    /// Invalid extension name.
    #[error("invalid extension name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A dependency string could not be parsed.
    #[error("invalid dependency '{value}': {reason}")]
    InvalidDependency { value: String, reason: String },

    /// A version constraint string could not be parsed.
    #[error("invalid version constraint '{constraint}': {reason}")]
    VersionConstraintParse { constraint: String, reason: String },

    /// Two descriptors declare the same extension name.
    #[error("extension '{name}' is declared by both {first} and {second}")]
    DuplicateExtension {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// I/O error reading descriptor files.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extension not found in the catalog.
    #[error("unknown extension: {0}")]
    UnknownExtension(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
