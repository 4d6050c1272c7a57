//! Named strategy registries
//!
//! A registry maps names to strategies and tracks which one is the current
//! default. Registries are shared between every map of a session through
//! [`Shared`] handles, so selecting a default through one map is visible to
//! all of them.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{AttrError, Result};

/// A shared, mutable registry handle.
pub type Shared<T> = Rc<RefCell<Registry<T>>>;

/// Name → strategy, plus the current default.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    name: String,
    entries: IndexMap<String, T>,
    default: Option<String>,
}

impl<T: Clone> Registry<T> {
    /// Create an empty registry. `name` is used in error messages.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
            default: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add or replace an entry. Replacing keeps the entry's position.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> &mut Self {
        self.entries.insert(key.into(), value);
        self
    }

    /// Add or replace several entries.
    pub fn update<K, I>(&mut self, entries: I) -> &mut Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, T)>,
    {
        for (k, v) in entries {
            self.insert(k, v);
        }
        self
    }

    /// Select the default entry.
    pub fn set_default(&mut self, name: &str) -> Result<&mut Self> {
        if !self.entries.contains_key(name) {
            return Err(self.unknown(name));
        }
        self.default = Some(name.to_string());
        Ok(self)
    }

    /// The current default.
    pub fn get(&self) -> Result<T> {
        self.default
            .as_deref()
            .and_then(|d| self.entries.get(d))
            .cloned()
            .ok_or_else(|| AttrError::EmptyRegistry {
                registry: self.name.clone(),
            })
    }

    /// A named entry.
    pub fn get_named(&self, name: &str) -> Result<T> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| self.unknown(name))
    }

    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entry names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Wrap in a shared handle.
    pub fn shared(self) -> Shared<T> {
        Rc::new(RefCell::new(self))
    }

    fn unknown(&self, name: &str) -> AttrError {
        AttrError::UnknownStrategy {
            registry: self.name.clone(),
            name: name.to_string(),
            expected: self.keys().collect::<Vec<_>>().join(", "),
        }
    }
}
