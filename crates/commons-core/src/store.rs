//! Property stores.
//!
//! [`SystemProperties`] is a handle to the single process-wide table that
//! [`crate::prop::Prop`] reads by default. [`MapStore`] is an isolated table
//! with the same interface, for tests and scoped configuration.

use commons_types::{Properties, PropertyStore};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::path::MAIN_SEPARATOR;

/// Working directory property.
pub const USER_DIR: &str = "user.dir";
/// Home directory property.
pub const USER_HOME: &str = "user.home";
/// Operating system name property.
pub const OS_NAME: &str = "os.name";
/// Path separator property.
pub const FILE_SEPARATOR: &str = "file.separator";
/// Line separator property.
pub const LINE_SEPARATOR: &str = "line.separator";

static SYSTEM: Lazy<RwLock<Properties>> = Lazy::new(|| RwLock::new(seed()));

fn seed() -> Properties {
    let mut props = Properties::new();
    if let Ok(cwd) = std::env::current_dir() {
        props.insert(USER_DIR.to_string(), cwd.display().to_string());
    }
    if let Some(home) = dirs::home_dir() {
        props.insert(USER_HOME.to_string(), home.display().to_string());
    }
    props.insert(OS_NAME.to_string(), std::env::consts::OS.to_string());
    props.insert(FILE_SEPARATOR.to_string(), MAIN_SEPARATOR.to_string());
    let newline = if cfg!(windows) { "\r\n" } else { "\n" };
    props.insert(LINE_SEPARATOR.to_string(), newline.to_string());
    props
}

/// Handle to the process-wide system property table.
///
/// All handles share one table. Each call locks it briefly; sequences of
/// calls are not atomic with respect to other threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemProperties;

impl SystemProperties {
    /// Create a handle.
    pub fn new() -> Self {
        Self
    }

    /// Merge every entry of `props` into the table.
    pub fn load(&self, props: &Properties) {
        let mut table = SYSTEM.write();
        for (key, value) in props {
            table.insert(key.clone(), value.clone());
        }
        tracing::debug!(count = props.len(), "Loaded properties into system store");
    }
}

impl PropertyStore for SystemProperties {
    fn get(&self, name: &str) -> Option<String> {
        SYSTEM.read().get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) {
        SYSTEM.write().insert(name.to_string(), value.to_string());
    }

    fn clear(&self, name: &str) -> Option<String> {
        SYSTEM.write().shift_remove(name)
    }

    fn snapshot(&self) -> Properties {
        SYSTEM.read().clone()
    }
}

/// An isolated in-memory property store.
#[derive(Debug, Default)]
pub struct MapStore {
    entries: RwLock<Properties>,
}

impl MapStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a copy of `props`.
    pub fn from_properties(props: Properties) -> Self {
        Self {
            entries: RwLock::new(props),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl PropertyStore for MapStore {
    fn get(&self, name: &str) -> Option<String> {
        self.entries.read().get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) {
        self.entries.write().insert(name.to_string(), value.to_string());
    }

    fn clear(&self, name: &str) -> Option<String> {
        self.entries.write().shift_remove(name)
    }

    fn snapshot(&self) -> Properties {
        self.entries.read().clone()
    }
}
