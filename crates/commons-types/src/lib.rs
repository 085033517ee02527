//! # Commons Types
//!
//! Core types, traits, and enums shared across the commons crates.
//!
//! This crate provides the fundamental building blocks for the commons
//! test-support helpers, including:
//!
//! - The error type and result alias, with a `bail!` helper
//! - Property types, log levels and log formats
//! - Seam traits for property stores, resource loaders and field access
//! - Configuration data types
//!
//! ## Example
//!
//! ```
//! use commons_types::{PropType, LogLevel};
//!
//! let ty: PropType = "Integer".parse().unwrap();
//! assert_eq!(ty, PropType::Integer);
//! assert_eq!(ty.to_string(), "Integer");
//!
//! let level: LogLevel = "debug".parse().unwrap();
//! assert_eq!(level.as_filter(), "debug");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod enums;
pub mod traits;
pub mod config;

// Re-export common types for convenience
pub use errors::{CommonsError, Result};
pub use enums::{LogLevel, PropType};
pub use traits::{PropertyStore, Reflect, ResourceLoader};
pub use config::{LogConfig, LogFormat, ResourcesConfig};

/// A flat, insertion-ordered string key/value map.
pub type Properties = indexmap::IndexMap<String, String>;
