//! Core trait definitions for commons abstractions.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use crate::errors::{CommonsError, Result};
use crate::Properties;

/// Trait for key/value property stores.
///
/// The process-wide system property table is one implementation; isolated
/// in-memory stores are another. Mutation goes through `&self` because the
/// canonical store is shared process state.
pub trait PropertyStore {
    /// Get the raw text stored under `name`.
    fn get(&self, name: &str) -> Option<String>;

    /// Store `value` under `name`, replacing any previous value.
    fn set(&self, name: &str, value: &str);

    /// Remove `name`, returning the previous value if there was one.
    fn clear(&self, name: &str) -> Option<String>;

    /// Copy of every entry currently in the store.
    fn snapshot(&self) -> Properties;

    /// Check whether `name` is set.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl<S: PropertyStore + ?Sized> PropertyStore for &S {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: &str) {
        (**self).set(name, value)
    }

    fn clear(&self, name: &str) -> Option<String> {
        (**self).clear(name)
    }

    fn snapshot(&self) -> Properties {
        (**self).snapshot()
    }
}

impl<S: PropertyStore + ?Sized> PropertyStore for Arc<S> {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: &str) {
        (**self).set(name, value)
    }

    fn clear(&self, name: &str) -> Option<String> {
        (**self).clear(name)
    }

    fn snapshot(&self) -> Properties {
        (**self).snapshot()
    }
}

/// Trait for named resource lookup.
///
/// A resource is a document found by name (e.g. `com/foo/users.yml`)
/// rather than by a direct file path.
pub trait ResourceLoader {
    /// Read the raw bytes of a resource.
    ///
    /// Returns [`CommonsError::NotFound`] when no such resource exists.
    fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Check whether a resource exists.
    fn exists(&self, name: &str) -> bool {
        self.read(name).is_ok()
    }

    /// Read a resource as UTF-8 text.
    fn read_to_string(&self, name: &str) -> Result<String> {
        let bytes = self.read(name)?;
        String::from_utf8(bytes)
            .map_err(|e| CommonsError::runtime(format!("Resource {} is not UTF-8", name), e))
    }
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for &L {
    fn read(&self, name: &str) -> Result<Vec<u8>> {
        (**self).read(name)
    }
}

/// Opt-in field access by name.
///
/// A type's fields are the keys of its serialized object form, so private
/// fields and `#[serde(flatten)]`ed parent structs are reachable. Fields
/// named in [`Reflect::sealed_fields`] are never overwritten.
///
/// Writes rebuild the value from its serialized form, so a value must
/// compare equal to its own round trip. State outside that form (a
/// `#[serde(skip)]` field holding a non-default value) makes writes fail
/// instead of being reset.
pub trait Reflect: Serialize + DeserializeOwned + PartialEq {
    /// Fields that writes must leave untouched.
    fn sealed_fields() -> &'static [&'static str] {
        &[]
    }
}
