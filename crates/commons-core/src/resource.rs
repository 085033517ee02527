//! Named resource lookup.
//!
//! Resources are addressed by `/`-separated names such as
//! `com/foo/users.yml`. [`ResourceDirs`] finds them under a list of root
//! directories; [`EmbeddedResources`] serves content compiled into the
//! binary.

use crate::config::CommonsConfig;
use crate::store::{SystemProperties, USER_DIR};
use commons_types::{bail, CommonsError, PropertyStore, ResourceLoader, ResourcesConfig, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Roots searched when no configuration says otherwise, in order.
pub const DEFAULT_ROOTS: &[&str] = &[
    "src/test/resources",
    "src/main/resources",
    "tests/resources",
    "resources",
];

/// Split a resource name into path segments.
///
/// A leading `/` is ignored. Empty names and names that would escape the
/// root are rejected.
fn segments(name: &str) -> Result<Vec<&str>> {
    let parts: Vec<&str> = name
        .trim_start_matches('/')
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();

    if parts.is_empty() {
        bail!("Invalid resource name '{}'", name);
    }
    if parts.iter().any(|part| *part == "..") {
        bail!("Resource name '{}' escapes its root", name);
    }
    Ok(parts)
}

fn user_dir() -> PathBuf {
    SystemProperties
        .get(USER_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resource loader searching an ordered list of directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDirs {
    roots: Vec<PathBuf>,
}

impl ResourceDirs {
    /// Loader over the roots of [`CommonsConfig::global`].
    ///
    /// Without configuration these are the default roots, relative to the
    /// `user.dir` property.
    pub fn new() -> Self {
        CommonsConfig::global().resource_loader()
    }

    /// Loader over exactly `roots`.
    pub fn with_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Loader built from configuration.
    ///
    /// Configured roots come first; relative ones are taken against
    /// `user.dir`. The default roots follow unless disabled.
    pub fn from_config(config: &ResourcesConfig) -> Self {
        let base = user_dir();
        let mut roots: Vec<PathBuf> = config
            .roots
            .iter()
            .map(|root| if root.is_absolute() { root.clone() } else { base.join(root) })
            .collect();
        if !config.no_defaults {
            roots.extend(DEFAULT_ROOTS.iter().map(|root| base.join(root)));
        }
        Self { roots }
    }

    /// Append a root searched after the existing ones.
    pub fn push_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Roots in search order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Find the file backing resource `name`.
    pub fn locate(&self, name: &str) -> Result<PathBuf> {
        let parts = segments(name)?;
        for root in &self.roots {
            let candidate = parts.iter().fold(root.clone(), |path, part| path.join(part));
            if candidate.is_file() {
                tracing::trace!(resource = name, path = %candidate.display(), "Located resource");
                return Ok(candidate);
            }
        }
        Err(CommonsError::NotFound(name.to_string()))
    }
}

impl Default for ResourceDirs {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLoader for ResourceDirs {
    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.locate(name)?;
        fs::read(&path).map_err(Into::into)
    }

    fn exists(&self, name: &str) -> bool {
        self.locate(name).is_ok()
    }
}

/// In-memory resources, typically filled with `include_str!`.
///
/// ```rust
/// use commons_core::resource::EmbeddedResources;
/// use commons_types::ResourceLoader;
///
/// let resources = EmbeddedResources::new().with("data/users.yml", "- name: ann\n")?;
/// assert!(resources.exists("/data/users.yml"));
/// # Ok::<(), commons_types::CommonsError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    entries: HashMap<String, Vec<u8>>,
}

impl EmbeddedResources {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, builder style.
    pub fn with(mut self, name: &str, content: impl Into<Vec<u8>>) -> Result<Self> {
        self.insert(name, content)?;
        Ok(self)
    }

    /// Add a resource.
    pub fn insert(&mut self, name: &str, content: impl Into<Vec<u8>>) -> Result<()> {
        let key = segments(name)?.join("/");
        self.entries.insert(key, content.into());
        Ok(())
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceLoader for EmbeddedResources {
    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let key = segments(name)?.join("/");
        self.entries
            .get(&key)
            .cloned()
            .ok_or_else(|| CommonsError::NotFound(name.to_string()))
    }
}
