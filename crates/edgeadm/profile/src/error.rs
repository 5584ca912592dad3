//! Profile resolution error types

use edgeadm_types::ValueTreeError;
use thiserror::Error;

/// Profile resolution and override errors
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid profile {0}: expected key=value")]
    InvalidProfileFormat(String),

    #[error("unsupported profile {0}")]
    UnsupportedProfile(String),

    #[error(
        "the given version {version} is not supported (minimum {minimum}), \
         you can try binary deployments with this version"
    )]
    UnsupportedVersion { version: String, minimum: String },

    #[error("invalid version {value}: {source}")]
    InvalidVersion {
        value: String,
        #[source]
        source: semver::Error,
    },

    #[error("failed parsing override {expression}: {reason}")]
    OverrideParse { expression: String, reason: String },

    #[error("profile store error: {0}")]
    Store(String),

    #[error("cannot load profile values: {0}")]
    Values(#[from] ValueTreeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for profile operations
pub type Result<T> = std::result::Result<T, ProfileError>;
