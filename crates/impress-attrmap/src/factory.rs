//! Value factories
//!
//! A factory turns the raw string for an attribute key into a [`Value`].

use std::fmt;
use std::rc::Rc;

use impress_identifiers::{standard_kinds, Site, Value, ValueKind};
use indexmap::IndexMap;

use crate::error::{AttrError, Result};

/// Constructs attribute values from raw strings.
pub trait Factory: fmt::Debug {
    fn construct(&self, key: &str, raw: &str) -> Result<Value>;
}

/// Wraps every input as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFactory;

impl Factory for RawFactory {
    fn construct(&self, _key: &str, raw: &str) -> Result<Value> {
        Ok(Value::text(raw))
    }
}

/// Selects a value kind by key.
///
/// Keys without a kind fail in strict mode and become plain text otherwise.
#[derive(Debug, Clone)]
pub struct MappedFactory {
    kinds: IndexMap<String, ValueKind>,
    strict: bool,
}

impl MappedFactory {
    pub fn strict() -> Self {
        Self::with_standard_kinds(true)
    }

    pub fn loose() -> Self {
        Self::with_standard_kinds(false)
    }

    fn with_standard_kinds(strict: bool) -> Self {
        let kinds = standard_kinds()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Self { kinds, strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Map `key` to `kind`, replacing any previous kind.
    pub fn set_kind(&mut self, key: impl Into<String>, kind: ValueKind) -> &mut Self {
        self.kinds.insert(key.into(), kind);
        self
    }

    /// Map `key` to identifiers on `site`.
    pub fn add_site(&mut self, key: impl Into<String>, site: Site) -> &mut Self {
        self.set_kind(key, ValueKind::Site(Rc::new(site)))
    }

    pub fn kind(&self, key: &str) -> Option<&ValueKind> {
        self.kinds.get(key)
    }
}

impl Factory for MappedFactory {
    fn construct(&self, key: &str, raw: &str) -> Result<Value> {
        match self.kinds.get(key) {
            Some(kind) => Ok(kind.parse(raw)?),
            None if self.strict => Err(AttrError::UnknownKey {
                key: key.to_string(),
            }),
            None => Ok(Value::text(raw)),
        }
    }
}

/// The standard factory registry entries.
pub fn standard_factories() -> Vec<(&'static str, Rc<dyn Factory>)> {
    let raw: Rc<dyn Factory> = Rc::new(RawFactory);
    let loose: Rc<dyn Factory> = Rc::new(MappedFactory::loose());
    let strict: Rc<dyn Factory> = Rc::new(MappedFactory::strict());
    vec![
        ("raw", raw),
        ("typed", Rc::clone(&loose)),
        ("loose", loose),
        ("strict", strict),
    ]
}
