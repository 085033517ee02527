//! YAML documents as maps, models, and lists of models.
//!
//! The free functions read a resource into generic maps. [`YamlData`] binds
//! a resource to a model type `M`, which only needs to implement
//! `serde::Deserialize`; keys without a matching field are ignored.
//!
//! Only the first document of a multi-document stream is ever read.
//!
//! ## Example
//!
//! ```rust
//! use commons_core::resource::EmbeddedResources;
//! use commons_core::yaml::{self, YamlData};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! let resources = EmbeddedResources::new()
//!     .with("users.yml", "- name: ann\n- name: bob\n")
//!     .unwrap();
//!
//! let maps = yaml::to_maps_with(&resources, "users.yml").unwrap();
//! assert_eq!(maps.len(), 2);
//!
//! let users = YamlData::<User, _>::with_loader(&resources)
//!     .from_resource("users.yml")
//!     .to_models()
//!     .unwrap();
//! assert_eq!(users[1].name, "bob");
//! ```

use crate::resource::ResourceDirs;
use commons_types::{bail, CommonsError, ResourceLoader, Result};
use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::Value;
use std::fmt;
use std::marker::PhantomData;

/// A YAML mapping with string keys, in document order.
pub type YamlMap = IndexMap<String, Value>;

/// Parse the first document of a YAML stream.
///
/// A stream without content (empty, only comments, a bare `---`) or whose
/// first document is null is the runtime error "Yaml content is empty".
pub fn first_document(text: &str) -> Result<Value> {
    let document = match serde_yaml::Deserializer::from_str(text).next() {
        Some(document) => Value::deserialize(document)?,
        None => Value::Null,
    };
    if document.is_null() {
        bail!("Yaml content is empty");
    }
    Ok(document)
}

// Scalar keys keep their YAML text, so `200: OK` is keyed by "200".
fn key_text(key: Value) -> Result<String> {
    match key {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok("null".to_string()),
        other => bail!("Yaml key is {}, expected a scalar", kind(&other)),
    }
}

fn into_map(mapping: serde_yaml::Mapping) -> Result<YamlMap> {
    mapping
        .into_iter()
        .map(|(key, value)| key_text(key).map(|key| (key, value)))
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Read YAML text as a single map.
///
/// A list at the root is an error: use [`to_maps_str`] for that.
pub fn to_map_str(text: &str) -> Result<YamlMap> {
    match first_document(text)? {
        Value::Mapping(mapping) => into_map(mapping),
        Value::Sequence(_) => bail!("It's list, use to_maps() instead"),
        other => bail!("Yaml root is {}, expected a mapping", kind(&other)),
    }
}

/// Read YAML text as a list of maps.
///
/// A single map at the root becomes a one-element list.
pub fn to_maps_str(text: &str) -> Result<Vec<YamlMap>> {
    match first_document(text)? {
        Value::Sequence(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Mapping(mapping) => into_map(mapping),
                other => Err(CommonsError::Runtime(format!(
                    "Yaml list item {} is {}, expected a mapping",
                    index,
                    kind(&other)
                ))),
            })
            .collect(),
        Value::Mapping(mapping) => Ok(vec![into_map(mapping)?]),
        other => bail!("Yaml root is {}, expected a list or mapping", kind(&other)),
    }
}

/// Read a resource through `loader` as a single map.
pub fn to_map_with(loader: &impl ResourceLoader, resource: &str) -> Result<YamlMap> {
    tracing::debug!(resource, "Reading yaml as map");
    to_map_str(&loader.read_to_string(resource)?)
}

/// Read a resource through `loader` as a list of maps.
pub fn to_maps_with(loader: &impl ResourceLoader, resource: &str) -> Result<Vec<YamlMap>> {
    tracing::debug!(resource, "Reading yaml as maps");
    to_maps_str(&loader.read_to_string(resource)?)
}

/// Read a resource from the default resource roots as a single map.
pub fn to_map(resource: &str) -> Result<YamlMap> {
    to_map_with(&ResourceDirs::new(), resource)
}

/// Read a resource from the default resource roots as a list of maps.
pub fn to_maps(resource: &str) -> Result<Vec<YamlMap>> {
    to_maps_with(&ResourceDirs::new(), resource)
}

/// A model type with a fixed default resource.
///
/// ```rust
/// use commons_core::yaml::{YamlData, YamlModel};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Account {
///     user: String,
/// }
///
/// impl YamlModel for Account {
///     const RESOURCE: Option<&'static str> = Some("data/account.yml");
/// }
///
/// let data = YamlData::<Account>::for_model();
/// assert_eq!(data.resource_name().unwrap(), "data/account.yml");
/// ```
pub trait YamlModel: DeserializeOwned {
    /// Resource read when none is given explicitly.
    const RESOURCE: Option<&'static str> = None;
}

/// Loader binding a YAML resource to model type `M`.
pub struct YamlData<M, L = ResourceDirs> {
    loader: L,
    resource_name: Option<String>,
    default_resource: Option<String>,
    resolved: OnceCell<String>,
    _model: PhantomData<fn() -> M>,
}

impl<M: DeserializeOwned> YamlData<M> {
    /// Loader over the default resource roots.
    pub fn new() -> Self {
        Self::with_loader(ResourceDirs::new())
    }
}

impl<M: DeserializeOwned> Default for YamlData<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: YamlModel> YamlData<M> {
    /// Loader over the default resource roots, defaulting to `M::RESOURCE`.
    pub fn for_model() -> Self {
        let data = Self::new();
        match M::RESOURCE {
            Some(resource) => data.with_default_resource(resource),
            None => data,
        }
    }
}

impl<M: DeserializeOwned, L: ResourceLoader> YamlData<M, L> {
    /// Loader reading resources through `loader`.
    pub fn with_loader(loader: L) -> Self {
        Self {
            loader,
            resource_name: None,
            default_resource: None,
            resolved: OnceCell::new(),
            _model: PhantomData,
        }
    }

    /// Resource to read when [`YamlData::from_resource`] is never called.
    pub fn with_default_resource(mut self, resource: impl Into<String>) -> Self {
        self.default_resource = Some(resource.into());
        self.resolved = OnceCell::new();
        self
    }

    /// Read `resource`, overriding any default.
    pub fn from_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource_name = Some(resource.into());
        self.resolved = OnceCell::new();
        self
    }

    /// Name of the resource this loader reads.
    ///
    /// Resolved on first call and remembered afterwards.
    pub fn resource_name(&self) -> Result<&str> {
        self.resolved
            .get_or_try_init(|| {
                self.resource_name
                    .clone()
                    .or_else(|| self.default_resource.clone())
                    .ok_or_else(|| {
                        CommonsError::NotFound(
                            "Use with_default_resource() or call from_resource()".to_string(),
                        )
                    })
            })
            .map(String::as_str)
    }

    /// Name of the model type.
    pub fn model_name(&self) -> &'static str {
        std::any::type_name::<M>()
    }

    fn read(&self) -> Result<String> {
        let resource = self.resource_name()?;
        tracing::debug!(resource, model = self.model_name(), "Reading yaml resource");
        self.loader.read_to_string(resource)
    }

    /// Bind the document to one model.
    pub fn to_model(&self) -> Result<M> {
        let text = self.read()?;
        let document = first_document(&text)?;
        Ok(serde_yaml::from_value(document)?)
    }

    /// Bind each item of a list document to a model.
    ///
    /// Items are first parsed into generic YAML values, then converted
    /// through a JSON tree into `M`. The intermediate step means only
    /// string-keyed mappings bind.
    pub fn to_models(&self) -> Result<Vec<M>> {
        let text = self.read()?;
        match first_document(&text)? {
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| -> Result<M> {
                    let tree = serde_json::to_value(item)?;
                    Ok(serde_json::from_value(tree)?)
                })
                .collect(),
            other => bail!("Yaml root is {}, use to_model() instead", kind(&other)),
        }
    }
}

impl<M, L> fmt::Debug for YamlData<M, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YamlData")
            .field("model", &std::any::type_name::<M>())
            .field("resource_name", &self.resource_name)
            .field("default_resource", &self.default_resource)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::EmbeddedResources;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Browser {
        name: String,
        #[serde(default)]
        headless: bool,
        #[serde(default)]
        args: Vec<String>,
    }

    impl YamlModel for Browser {
        const RESOURCE: Option<&'static str> = Some("browser.yml");
    }

    #[derive(Debug, Deserialize)]
    struct Unbound {
        #[allow(dead_code)]
        name: String,
    }

    impl YamlModel for Unbound {}

    fn resources() -> EmbeddedResources {
        let mut resources = EmbeddedResources::new();
        for (name, content) in [
            ("browser.yml", "name: chrome\nheadless: true\nversion: 120\n"),
            (
                "browsers.yml",
                "- name: chrome\n  args: [--incognito]\n- name: firefox\n  headless: true\n",
            ),
            ("multi.yml", "name: first\n---\nname: second\n"),
            ("empty.yml", "# nothing here\n"),
            ("scalar.yml", "just text\n"),
            ("mixed.yml", "- name: chrome\n- plain\n"),
        ] {
            resources.insert(name, content).unwrap();
        }
        resources
    }

    #[test]
    fn test_to_map_reads_mapping() {
        let map = to_map_with(&resources(), "browser.yml").unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "headless", "version"]);
        assert_eq!(map["name"], Value::String("chrome".to_string()));
    }

    #[test]
    fn test_to_map_rejects_list() {
        let err = to_map_with(&resources(), "browsers.yml").unwrap_err();
        assert!(matches!(err, CommonsError::Runtime(_)));
        assert_eq!(err.to_string(), "It's list, use to_maps() instead");
    }

    #[test]
    fn test_to_maps_returns_list() {
        let maps = to_maps_with(&resources(), "browsers.yml").unwrap();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[1]["name"], Value::String("firefox".to_string()));
    }

    #[test]
    fn test_to_maps_wraps_single_mapping() {
        let maps = to_maps_with(&resources(), "browser.yml").unwrap();
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0], to_map_with(&resources(), "browser.yml").unwrap());
    }

    #[test]
    fn test_to_maps_rejects_non_mapping_items() {
        let err = to_maps_with(&resources(), "mixed.yml").unwrap_err();
        assert_eq!(err.to_string(), "Yaml list item 1 is a string, expected a mapping");
    }

    #[test]
    fn test_only_first_document_is_read() {
        let map = to_map_with(&resources(), "multi.yml").unwrap();
        assert_eq!(map["name"], Value::String("first".to_string()));
    }

    #[test]
    fn test_empty_stream_is_error() {
        let err = to_map_with(&resources(), "empty.yml").unwrap_err();
        assert_eq!(err.to_string(), "Yaml content is empty");
        for text in ["", "---\n", "\n\n", "# c\n"] {
            assert_eq!(to_map_str(text).unwrap_err().to_string(), "Yaml content is empty");
            assert_eq!(to_maps_str(text).unwrap_err().to_string(), "Yaml content is empty");
        }
    }

    #[test]
    fn test_empty_stream_binds_no_model() {
        let data = YamlData::<Browser, _>::with_loader(resources()).from_resource("empty.yml");
        assert_eq!(data.to_model().unwrap_err().to_string(), "Yaml content is empty");
        assert_eq!(data.to_models().unwrap_err().to_string(), "Yaml content is empty");
    }

    #[test]
    fn test_scalar_keys_become_text() {
        let map = to_map_str("200: OK\n404: Not Found\ntrue: yes\n").unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["200", "404", "true"]);
        assert_eq!(map["404"], Value::String("Not Found".to_string()));

        let maps = to_maps_str("- 1: a\n- 2.5: b\n").unwrap();
        assert_eq!(maps[0]["1"], Value::String("a".to_string()));
        assert!(maps[1].contains_key("2.5"));
    }

    #[test]
    fn test_collection_keys_are_rejected() {
        let err = to_map_str("? [a, b]\n: c\n").unwrap_err();
        assert_eq!(err.to_string(), "Yaml key is a list, expected a scalar");
    }

    #[test]
    fn test_scalar_root_is_error() {
        assert!(matches!(to_map_with(&resources(), "scalar.yml"), Err(CommonsError::Runtime(_))));
        assert!(matches!(to_maps_with(&resources(), "scalar.yml"), Err(CommonsError::Runtime(_))));
    }

    #[test]
    fn test_missing_resource_is_not_found() {
        assert!(to_map_with(&resources(), "nope.yml").unwrap_err().is_not_found());
    }

    #[test]
    fn test_to_model_uses_model_resource() {
        let data = YamlData::<Browser, _>::with_loader(resources())
            .with_default_resource(Browser::RESOURCE.unwrap());
        let browser = data.to_model().unwrap();
        assert_eq!(
            browser,
            Browser {
                name: "chrome".to_string(),
                headless: true,
                args: vec![],
            }
        );
    }

    #[test]
    fn test_from_resource_overrides_default() {
        let data = YamlData::<Browser, _>::with_loader(resources())
            .with_default_resource("browser.yml")
            .from_resource("multi.yml");
        assert_eq!(data.resource_name().unwrap(), "multi.yml");
        assert_eq!(data.to_model().unwrap().name, "first");
    }

    #[test]
    fn test_to_model_without_resource_is_not_found() {
        let data = YamlData::<Unbound, _>::with_loader(resources());
        let err = data.to_model().unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("from_resource()"));
    }

    #[test]
    fn test_for_model_without_resource_is_not_found() {
        let data = YamlData::<Unbound>::for_model();
        assert!(data.resource_name().unwrap_err().is_not_found());
    }

    #[test]
    fn test_to_models_binds_each_item() {
        let browsers = YamlData::<Browser, _>::with_loader(resources())
            .from_resource("browsers.yml")
            .to_models()
            .unwrap();
        assert_eq!(browsers.len(), 2);
        assert_eq!(browsers[0].args, vec!["--incognito".to_string()]);
        assert!(!browsers[0].headless);
        assert!(browsers[1].headless);
    }

    #[test]
    fn test_to_models_rejects_mapping_root() {
        let err = YamlData::<Browser, _>::with_loader(resources())
            .from_resource("browser.yml")
            .to_models()
            .unwrap_err();
        assert_eq!(err.to_string(), "Yaml root is a mapping, use to_model() instead");
    }

    #[test]
    fn test_resource_name_is_memoized() {
        let data = YamlData::<Browser, _>::with_loader(resources()).with_default_resource("browser.yml");
        let first = data.resource_name().unwrap().as_ptr();
        let second = data.resource_name().unwrap().as_ptr();
        assert_eq!(first, second);
        assert!(data.model_name().ends_with("Browser"));
    }
}
