//! Error types for commons operations.

use thiserror::Error;

/// The main error type for commons operations.
///
/// Behavioral failures collapse into two kinds: [`CommonsError::NotFound`]
/// when a required resource is missing and no fallback was configured, and
/// [`CommonsError::Runtime`] for everything else. Library errors are wrapped
/// transparently so callers can still inspect the cause.
#[derive(Error, Debug)]
pub enum CommonsError {
    /// A required resource is absent and no fallback was configured
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Generic runtime failure (coercion, empty document, field access, ...)
    #[error("{0}")]
    Runtime(String),

    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON conversion error
    #[error("JSON conversion error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommonsError {
    /// Build a runtime error carrying the message of its cause.
    pub fn runtime(msg: impl std::fmt::Display, cause: impl std::fmt::Display) -> Self {
        CommonsError::Runtime(format!("{}: {}", msg, cause))
    }

    /// Whether this is the "resource not found" kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CommonsError::NotFound(_))
    }
}

/// A specialized Result type for commons operations.
pub type Result<T> = std::result::Result<T, CommonsError>;

/// Helper macro to bail out with a CommonsError
///
/// Without a variant the error is [`CommonsError::Runtime`].
///
/// # Example
///
/// ```ignore
/// if root.is_sequence() {
///     bail!("It's list, use to_maps() instead");
/// }
/// bail!(NotFound, "missing resource {}", name);
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::CommonsError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::CommonsError::$variant(format!($fmt, $($arg)*)))
    };
    ($msg:expr) => {
        return Err($crate::CommonsError::Runtime($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::CommonsError::Runtime(format!($fmt, $($arg)*)))
    };
}
