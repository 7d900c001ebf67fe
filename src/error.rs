//! Error types for rule registration, configuration and generation.

/// Result type alias for atomizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a registration or a generation call.
///
/// Class names that do not resolve are not errors; they surface as
/// [`Warning`](crate::core::Warning)s instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two rules share a prefix.
    #[error("duplicate rule prefix '{prefix}'")]
    DuplicatePrefix { prefix: String },

    /// A helper rule was emitted without a declaration template.
    #[error("helper rule '{prefix}' has no declaration")]
    MissingDeclaration { prefix: String },

    /// A breakpoint value is not a media query.
    #[error("breakpoint '{key}' must start with \"@media\", got '{value}'")]
    InvalidBreakpoint { key: String, value: String },

    /// Configuration or rule file could not be decoded.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The style-sheet compiler rejected the style tree.
    #[error("style sheet compilation failed: {0}")]
    Compile(String),
}

impl Error {
    pub fn duplicate_prefix(prefix: impl Into<String>) -> Self {
        Self::DuplicatePrefix {
            prefix: prefix.into(),
        }
    }

    pub fn invalid_breakpoint(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidBreakpoint {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn compile(message: impl Into<String>) -> Self {
        Self::Compile(message.into())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
