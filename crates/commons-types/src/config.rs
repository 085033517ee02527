//! Configuration types and structures.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resource lookup configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Extra root directories searched before the defaults
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    /// Skip the built-in roots (`src/test/resources`, `resources`, ...)
    #[serde(default)]
    pub no_defaults: bool,
}

/// Log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log file path, or `-` for stderr
    pub path: String,
    /// Log level for this output
    pub level: crate::LogLevel,
    /// Log format (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl LogConfig {
    /// Whether this output goes to stderr rather than a file.
    pub fn is_stderr(&self) -> bool {
        self.path == "-"
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format with colors
    Pretty,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}
