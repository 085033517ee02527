//! # Commons Core
//!
//! Test-support helpers: typed properties, YAML test data, resources and
//! filesystem utilities.
//!
//! This crate provides:
//!
//! - **Properties**: Typed [`Prop`] handles over a property store, with defaults
//! - **YAML Data**: Loading resources into maps or serde models
//! - **Resources**: Lookup across resource roots or embedded content
//! - **Properties Files**: Reading and writing `.properties` files in any charset
//! - **Field Access**: Reading and writing fields by name
//! - **Configuration**: File and environment configuration for resource roots, charset and logs
//! - **Logging**: `tracing` subscriber setup for stderr and files
//!
//! ## Example
//!
//! ```rust,no_run
//! use commons_core::{Prop, YamlData};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Account {
//!     username: String,
//! }
//!
//! let browser = Prop::string_or("browser", "chrome")?;
//! let name = browser.get_value()?;
//!
//! let accounts: Vec<Account> = YamlData::new()
//!     .from_resource("accounts.yaml")
//!     .to_models()?;
//! # Ok::<(), commons_types::CommonsError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod log;
pub mod prop;
pub mod resource;
pub mod store;
pub mod time;
pub mod util;
pub mod yaml;

// Re-export commonly used items
pub use commons_types::{CommonsError, Result};
pub use config::CommonsConfig;
pub use prop::{Prop, PropValue};
pub use resource::{EmbeddedResources, ResourceDirs};
pub use store::{MapStore, SystemProperties};
pub use yaml::{YamlData, YamlMap, YamlModel};

/// Commons library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
