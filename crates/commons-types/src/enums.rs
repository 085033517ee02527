//! Common enumerations used throughout commons.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{CommonsError, Result};

/// Log level enumeration for the logging system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// No logging
    None,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Detailed trace messages
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::None => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = CommonsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "NONE" | "OFF" => Ok(LogLevel::None),
            "ERROR" => Ok(LogLevel::Error),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            "TRACE" => Ok(LogLevel::Trace),
            _ => Err(CommonsError::Config(format!("Invalid log level: {}", s))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::None => write!(f, "NONE"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Trace => write!(f, "TRACE"),
        }
    }
}

/// Semantic type a property's stored text is coerced to.
///
/// Names follow the wrapper types of the property mechanism this mirrors,
/// so `"Integer"` and `"int"` both resolve to [`PropType::Integer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    /// Text, passed through unchanged
    String,
    /// `true` (any case) or `false`
    Boolean,
    /// 8-bit signed integer
    Byte,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// Absolute URL
    Url,
}

impl FromStr for PropType {
    type Err = CommonsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "string" | "str" => Ok(PropType::String),
            "boolean" | "bool" => Ok(PropType::Boolean),
            "byte" | "i8" => Ok(PropType::Byte),
            "short" | "i16" => Ok(PropType::Short),
            "integer" | "int" | "i32" => Ok(PropType::Integer),
            "long" | "i64" => Ok(PropType::Long),
            "float" | "f32" => Ok(PropType::Float),
            "double" | "f64" => Ok(PropType::Double),
            "url" => Ok(PropType::Url),
            _ => Err(CommonsError::Runtime(format!("Type {} cannot be parsed", s))),
        }
    }
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropType::String => "String",
            PropType::Boolean => "Boolean",
            PropType::Byte => "Byte",
            PropType::Short => "Short",
            PropType::Integer => "Integer",
            PropType::Long => "Long",
            PropType::Float => "Float",
            PropType::Double => "Double",
            PropType::Url => "URL",
        };
        write!(f, "{}", s)
    }
}
