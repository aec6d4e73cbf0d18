use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TypeError>;

/// Failures raised by the type engine.
///
/// All of these are contract violations by the caller: the engine performs
/// no I/O, so nothing here is transient or worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A nominal type was requested from a value that is not a name.
    #[error("Invalid argument: cannot build a nominal type from {found}")]
    InvalidArgument { found: String },

    /// No subtyping rule is defined for this pair of variants.
    #[error("Unsupported comparison: {left} <: {right}")]
    UnsupportedComparison { left: String, right: String },

    /// Attribute merge applied to something other than an object or fusion type.
    #[error("Type {found} has no attribute record")]
    NotARecord { found: String },

    /// Member append applied to something other than a union or intersection.
    #[error("Type {found} is not a union or intersection")]
    NotAComposite { found: String },
}

impl TypeError {
    pub fn invalid_argument(found: impl Into<String>) -> Self {
        Self::InvalidArgument { found: found.into() }
    }

    pub fn unsupported(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::UnsupportedComparison {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn is_unsupported_comparison(&self) -> bool {
        matches!(self, Self::UnsupportedComparison { .. })
    }
}

/// Errors from loading or saving a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
