//! Typed system properties.
//!
//! A [`Prop`] names one entry of a [`PropertyStore`] and the type its text
//! is coerced to. Every read goes back to the live store, so changes made by
//! other code (or other `Prop` instances) are always visible.
//!
//! ## Example
//!
//! ```rust
//! use commons_core::prop::Prop;
//! use commons_core::store::MapStore;
//!
//! let store = MapStore::new();
//! let mut retries = Prop::with_default_in(&store, "http.retries", 3).unwrap();
//! assert_eq!(retries.get_value().unwrap(), Some(3));
//!
//! retries.set_value(5);
//! assert_eq!(retries.get_value().unwrap(), Some(5));
//!
//! retries.clear_value();
//! assert_eq!(retries.get_value().unwrap(), Some(3));
//! ```

use crate::store::SystemProperties;
use commons_types::{CommonsError, PropType, PropertyStore, Result};
use url::Url;

/// A value that can live in a property store as text.
pub trait PropValue: Sized + Clone {
    /// Semantic type of the stored text.
    const TYPE: PropType;

    /// Coerce stored text into a value.
    fn parse_prop(raw: &str) -> Result<Self>;

    /// Canonical text form; [`PropValue::parse_prop`] reads it back unchanged.
    fn to_prop_string(&self) -> String;
}

impl PropValue for String {
    const TYPE: PropType = PropType::String;

    fn parse_prop(raw: &str) -> Result<Self> {
        Ok(raw.to_string())
    }

    fn to_prop_string(&self) -> String {
        self.clone()
    }
}

impl PropValue for bool {
    const TYPE: PropType = PropType::Boolean;

    // Anything other than "true" (ignoring case) is false, never an error.
    fn parse_prop(raw: &str) -> Result<Self> {
        Ok(raw.eq_ignore_ascii_case("true"))
    }

    fn to_prop_string(&self) -> String {
        self.to_string()
    }
}

impl PropValue for Url {
    const TYPE: PropType = PropType::Url;

    fn parse_prop(raw: &str) -> Result<Self> {
        Url::parse(raw).map_err(|e| CommonsError::runtime(format!("Cannot parse '{}' as URL", raw), e))
    }

    fn to_prop_string(&self) -> String {
        self.as_str().to_string()
    }
}

macro_rules! integer_prop_value {
    ($($ty:ty => $prop:expr),* $(,)?) => {
        $(
            impl PropValue for $ty {
                const TYPE: PropType = $prop;

                fn parse_prop(raw: &str) -> Result<Self> {
                    raw.parse::<$ty>().map_err(|e| {
                        CommonsError::runtime(format!("Cannot parse '{}' as {}", raw, $prop), e)
                    })
                }

                fn to_prop_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_prop_value! {
    i8 => PropType::Byte,
    i16 => PropType::Short,
    i32 => PropType::Integer,
    i64 => PropType::Long,
}

// Float text may be padded with whitespace and carry one `f`/`d` suffix.
fn float_text(raw: &str) -> &str {
    let trimmed = raw.trim_matches(|c: char| c <= ' ');
    trimmed
        .strip_suffix(|c: char| matches!(c, 'f' | 'F' | 'd' | 'D'))
        .unwrap_or(trimmed)
}

macro_rules! float_prop_value {
    ($($ty:ty => $prop:expr),* $(,)?) => {
        $(
            impl PropValue for $ty {
                const TYPE: PropType = $prop;

                fn parse_prop(raw: &str) -> Result<Self> {
                    float_text(raw).parse::<$ty>().map_err(|e| {
                        CommonsError::runtime(format!("Cannot parse '{}' as {}", raw, $prop), e)
                    })
                }

                fn to_prop_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

float_prop_value! {
    f32 => PropType::Float,
    f64 => PropType::Double,
}

/// A named, typed entry of a property store.
#[derive(Debug, Clone)]
pub struct Prop<T: PropValue, S: PropertyStore = SystemProperties> {
    name: String,
    store: S,
    default_value: Option<T>,
    value: Option<T>,
}

impl<T: PropValue> Prop<T> {
    /// Bind to the system store with no explicit default.
    ///
    /// The default becomes whatever the store currently resolves to, so a
    /// property that is unset right now has no default at all.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::new_in(SystemProperties, name)
    }

    /// Bind to the system store with an explicit default.
    pub fn with_default(name: impl Into<String>, default_value: T) -> Result<Self> {
        Self::with_default_in(SystemProperties, name, default_value)
    }
}

impl Prop<String> {
    /// String property without default.
    pub fn string(name: impl Into<String>) -> Result<Self> {
        Self::new(name)
    }

    /// String property with default.
    pub fn string_or(name: impl Into<String>, default_value: impl Into<String>) -> Result<Self> {
        Self::with_default(name, default_value.into())
    }
}

impl Prop<bool> {
    /// Boolean property without default.
    pub fn bool(name: impl Into<String>) -> Result<Self> {
        Self::new(name)
    }

    /// Boolean property with default.
    pub fn bool_or(name: impl Into<String>, default_value: bool) -> Result<Self> {
        Self::with_default(name, default_value)
    }
}

impl Prop<i32> {
    /// Integer property without default.
    pub fn integer(name: impl Into<String>) -> Result<Self> {
        Self::new(name)
    }

    /// Integer property with default.
    pub fn integer_or(name: impl Into<String>, default_value: i32) -> Result<Self> {
        Self::with_default(name, default_value)
    }
}

impl<T: PropValue, S: PropertyStore> Prop<T, S> {
    /// Bind to `store` with no explicit default.
    pub fn new_in(store: S, name: impl Into<String>) -> Result<Self> {
        let mut prop = Self {
            name: name.into(),
            store,
            default_value: None,
            value: None,
        };
        prop.value = prop.get_value()?;
        prop.default_value = prop.value.clone();
        Ok(prop)
    }

    /// Bind to `store` with an explicit default.
    pub fn with_default_in(store: S, name: impl Into<String>, default_value: T) -> Result<Self> {
        let mut prop = Self {
            name: name.into(),
            store,
            default_value: Some(default_value),
            value: None,
        };
        prop.value = prop.get_value()?;
        Ok(prop)
    }

    /// Property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic type of the property.
    pub fn prop_type(&self) -> PropType {
        T::TYPE
    }

    /// Default used while the property is unset.
    pub fn default_value(&self) -> Option<&T> {
        self.default_value.as_ref()
    }

    /// Value resolved at construction or last passed to [`Prop::set_value`].
    pub fn cached_value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve the current value from the store.
    ///
    /// Unset resolves to the default; set text is coerced to `T`, and text
    /// that does not coerce is a runtime error.
    pub fn get_value(&self) -> Result<Option<T>> {
        match self.store.get(&self.name) {
            None => Ok(self.default_value.clone()),
            Some(raw) => T::parse_prop(&raw).map(Some),
        }
    }

    /// Write `value` to the store in its canonical text form.
    pub fn set_value(&mut self, value: T) {
        self.store.set(&self.name, &value.to_prop_string());
        self.value = Some(value);
    }

    /// Remove the property from the store.
    pub fn clear_value(&self) {
        self.store.clear(&self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MapStore;
    use commons_types::Properties;
    use mockall::mock;
    use proptest::prelude::*;

    mock! {
        Store {}
        impl PropertyStore for Store {
            fn get(&self, name: &str) -> Option<String>;
            fn set(&self, name: &str, value: &str);
            fn clear(&self, name: &str) -> Option<String>;
            fn snapshot(&self) -> Properties;
        }
    }

    #[test]
    fn test_absent_without_default() {
        let store = MapStore::new();
        let prop: Prop<i32, _> = Prop::new_in(&store, "absent").unwrap();
        assert_eq!(prop.get_value().unwrap(), None);
        assert_eq!(prop.default_value(), None);
        assert_eq!(prop.prop_type(), PropType::Integer);
    }

    #[test]
    fn test_default_captured_from_store() {
        let store = MapStore::new();
        store.set("threads", "4");
        let prop: Prop<i32, _> = Prop::new_in(&store, "threads").unwrap();
        assert_eq!(prop.default_value(), Some(&4));

        store.set("threads", "8");
        assert_eq!(prop.get_value().unwrap(), Some(8));

        prop.clear_value();
        assert_eq!(prop.get_value().unwrap(), Some(4));
    }

    #[test]
    fn test_present_value_beats_default() {
        let store = MapStore::new();
        let prop = Prop::with_default_in(&store, "headless", false).unwrap();
        assert_eq!(prop.cached_value(), Some(&false));

        store.set("headless", "TRUE");
        assert_eq!(prop.get_value().unwrap(), Some(true));
    }

    #[test]
    fn test_clear_then_get_returns_default() {
        let store = MapStore::new();
        let mut prop = Prop::with_default_in(&store, "browser", "chrome".to_string()).unwrap();
        prop.set_value("firefox".to_string());
        assert_eq!(prop.get_value().unwrap().as_deref(), Some("firefox"));

        prop.clear_value();
        assert!(!store.contains("browser"));
        assert_eq!(prop.get_value().unwrap().as_deref(), Some("chrome"));
    }

    #[test]
    fn test_boolean_never_fails() {
        let store = MapStore::new();
        store.set("flag", "yes");
        let prop: Prop<bool, _> = Prop::new_in(&store, "flag").unwrap();
        assert_eq!(prop.get_value().unwrap(), Some(false));
    }

    #[test]
    fn test_malformed_number_is_runtime_error() {
        let store = MapStore::new();
        store.set("port", "eighty");
        let err = Prop::<i32, _>::new_in(&store, "port").unwrap_err();
        assert!(matches!(err, CommonsError::Runtime(_)));
        assert!(err.to_string().starts_with("Cannot parse 'eighty' as Integer"));
    }

    #[test]
    fn test_byte_overflow_is_runtime_error() {
        let store = MapStore::new();
        let prop = Prop::with_default_in(&store, "level", 1i8).unwrap();
        store.set("level", "300");
        assert!(matches!(prop.get_value(), Err(CommonsError::Runtime(_))));
    }

    #[test]
    fn test_url_values() {
        let store = MapStore::new();
        let default = Url::parse("http://localhost:4444/wd/hub").unwrap();
        let mut prop = Prop::with_default_in(&store, "grid.url", default.clone()).unwrap();
        assert_eq!(prop.get_value().unwrap(), Some(default));

        prop.set_value(Url::parse("https://grid.example.com/").unwrap());
        assert_eq!(store.get("grid.url").as_deref(), Some("https://grid.example.com/"));

        store.set("grid.url", "not a url");
        assert!(matches!(prop.get_value(), Err(CommonsError::Runtime(_))));
    }

    #[test]
    fn test_factories_use_system_store() {
        let name = "commons.test.prop.factory";
        SystemProperties.clear(name);

        let mut prop = Prop::integer_or(name, 10).unwrap();
        assert_eq!(prop.get_value().unwrap(), Some(10));
        prop.set_value(20);
        assert_eq!(SystemProperties.get(name).as_deref(), Some("20"));

        let other = Prop::integer(name).unwrap();
        assert_eq!(other.default_value(), Some(&20));

        prop.clear_value();
        assert_eq!(prop.get_value().unwrap(), Some(10));
        assert_eq!(Prop::string("commons.test.prop.unset").unwrap().get_value().unwrap(), None);
        assert_eq!(Prop::bool_or("commons.test.prop.unset", true).unwrap().get_value().unwrap(), Some(true));
    }

    #[test]
    fn test_every_read_goes_to_store() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .withf(|name: &str| name == "timeout")
            .times(3)
            .returning(|_| Some("30".to_string()));

        let prop: Prop<i64, _> = Prop::new_in(store, "timeout").unwrap();
        assert_eq!(prop.get_value().unwrap(), Some(30));
        assert_eq!(prop.get_value().unwrap(), Some(30));
    }

    #[test]
    fn test_set_writes_canonical_text() {
        let mut store = MockStore::new();
        store.expect_get().returning(|_| None);
        store
            .expect_set()
            .withf(|name: &str, value: &str| name == "ratio" && value == "0.25")
            .times(1)
            .return_const(());

        let mut prop: Prop<f64, _> = Prop::new_in(store, "ratio").unwrap();
        prop.set_value(0.25);
        assert_eq!(prop.cached_value(), Some(&0.25));
    }

    #[test]
    fn test_float_text_forms() {
        let store = MapStore::new();
        let prop: Prop<f32, _> = Prop::with_default_in(&store, "ratio", 0.0).unwrap();
        for (raw, expected) in [(" 1.5 ", 1.5f32), ("1.5f", 1.5), ("2d", 2.0), ("-0.25F", -0.25)] {
            store.set("ratio", raw);
            assert_eq!(prop.get_value().unwrap(), Some(expected));
        }
        store.set("ratio", "1.5ff");
        assert!(prop.get_value().is_err());
    }

    #[test]
    fn test_integers_are_not_trimmed() {
        let store = MapStore::new();
        store.set("count", " 7");
        assert!(Prop::<i32, _>::new_in(&store, "count").is_err());
    }

    proptest! {
        #[test]
        fn prop_set_then_get_round_trips_bytes(n in any::<i8>()) {
            let store = MapStore::new();
            let mut prop: Prop<i8, _> = Prop::new_in(&store, "b").unwrap();
            prop.set_value(n);
            prop_assert_eq!(prop.get_value().unwrap(), Some(n));
        }

        #[test]
        fn prop_set_then_get_round_trips_integers(n in any::<i32>()) {
            let store = MapStore::new();
            let mut prop: Prop<i32, _> = Prop::new_in(&store, "i").unwrap();
            prop.set_value(n);
            prop_assert_eq!(prop.get_value().unwrap(), Some(n));
        }

        #[test]
        fn prop_set_then_get_round_trips_floats(x in proptest::num::f32::NORMAL | proptest::num::f32::ZERO) {
            let store = MapStore::new();
            let mut prop: Prop<f32, _> = Prop::new_in(&store, "f").unwrap();
            prop.set_value(x);
            prop_assert_eq!(prop.get_value().unwrap(), Some(x));
        }

        #[test]
        fn prop_set_then_get_round_trips_booleans(flag in any::<bool>()) {
            let store = MapStore::new();
            let mut prop: Prop<bool, _> = Prop::new_in(&store, "flag").unwrap();
            prop.set_value(flag);
            prop_assert_eq!(prop.get_value().unwrap(), Some(flag));
        }

        #[test]
        fn prop_integers_parse_like_native(n in any::<i64>()) {
            let store = MapStore::new();
            store.set("n", &n.to_string());
            let prop: Prop<i64, _> = Prop::new_in(&store, "n").unwrap();
            prop_assert_eq!(prop.get_value().unwrap(), Some(n));
        }

        #[test]
        fn prop_set_then_get_round_trips_shorts(n in any::<i16>()) {
            let store = MapStore::new();
            let mut prop: Prop<i16, _> = Prop::new_in(&store, "s").unwrap();
            prop.set_value(n);
            prop_assert_eq!(prop.get_value().unwrap(), Some(n));
        }

        #[test]
        fn prop_set_then_get_round_trips_doubles(x in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
            let store = MapStore::new();
            let mut prop: Prop<f64, _> = Prop::new_in(&store, "d").unwrap();
            prop.set_value(x);
            prop_assert_eq!(prop.get_value().unwrap(), Some(x));
        }

        #[test]
        fn prop_strings_pass_through(s in ".*") {
            let store = MapStore::new();
            store.set("text", &s);
            let prop: Prop<String, _> = Prop::new_in(&store, "text").unwrap();
            prop_assert_eq!(prop.get_value().unwrap(), Some(s));
        }
    }
}
