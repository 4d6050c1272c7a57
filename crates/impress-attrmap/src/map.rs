//! Ordered multi-valued attribute maps
//!
//! An [`AttributeMap`] maps keys to non-empty sequences of values. Key order
//! is insertion order and is visible in every encoding. Values are
//! immutable and shared between maps derived from one another.

use std::fmt;
use std::rc::Rc;

use impress_identifiers::{Uri, Value};
use indexmap::IndexMap;

use crate::codec::{Decoder, Encoder};
use crate::error::Result;
use crate::factory::Factory;
use crate::mode::Mode;
use crate::session::Registries;

/// Anything a map can store for a key: raw strings go through the active
/// factory, existing values are stored as they are.
pub trait IntoValue {
    fn into_value(self, factory: &dyn Factory, key: &str) -> Result<Rc<Value>>;
}

impl IntoValue for &str {
    fn into_value(self, factory: &dyn Factory, key: &str) -> Result<Rc<Value>> {
        Ok(Rc::new(factory.construct(key, self)?))
    }
}

impl IntoValue for &String {
    fn into_value(self, factory: &dyn Factory, key: &str) -> Result<Rc<Value>> {
        self.as_str().into_value(factory, key)
    }
}

impl IntoValue for Value {
    fn into_value(self, _factory: &dyn Factory, _key: &str) -> Result<Rc<Value>> {
        Ok(Rc::new(self))
    }
}

impl IntoValue for Rc<Value> {
    fn into_value(self, _factory: &dyn Factory, _key: &str) -> Result<Rc<Value>> {
        Ok(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    entries: IndexMap<String, Vec<Rc<Value>>>,
    registries: Registries,
}

impl AttributeMap {
    /// An empty map using the given session registries.
    pub fn new(registries: Registries) -> Self {
        Self {
            entries: IndexMap::new(),
            registries,
        }
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn factory(&self) -> Result<Rc<dyn Factory>> {
        self.registries.factory.borrow().get()
    }

    pub fn encoder(&self) -> Result<Rc<dyn Encoder>> {
        self.registries.encoder.borrow().get()
    }

    pub fn decoder(&self) -> Result<Rc<dyn Decoder>> {
        self.registries.decoder.borrow().get()
    }

    pub fn mode(&self) -> Result<Mode> {
        self.registries.mode.borrow().get()
    }

    fn construct(&self, key: &str, raw: impl IntoValue) -> Result<Rc<Value>> {
        let factory = self.factory()?;
        raw.into_value(&*factory, key)
    }

    /// Append a value to `key`.
    pub fn add(&mut self, key: &str, raw: impl IntoValue) -> Result<&mut Self> {
        let value = self.construct(key, raw)?;
        self.entries.entry(key.to_string()).or_default().push(value);
        Ok(self)
    }

    /// Replace all values of `key` with one value, moving `key` to the end.
    pub fn set(&mut self, key: &str, raw: impl IntoValue) -> Result<&mut Self> {
        let value = self.construct(key, raw)?;
        self.entries.shift_remove(key);
        self.entries.insert(key.to_string(), vec![value]);
        Ok(self)
    }

    /// Drop `key` and all its values.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.entries.shift_remove(key);
        self
    }

    /// Drop the values of `key` equal to the one built from `raw`.
    pub fn remove_value(&mut self, key: &str, raw: impl IntoValue) -> Result<&mut Self> {
        let value = self.construct(key, raw)?;
        if let Some(values) = self.entries.get_mut(key) {
            values.retain(|v| **v != *value);
            if values.is_empty() {
                self.entries.shift_remove(key);
            }
        }
        Ok(self)
    }

    /// A new map with only the listed keys, in the listed order.
    pub fn submap(&self, keys: &[&str]) -> AttributeMap {
        let mut out = AttributeMap::new(self.registries.clone());
        for key in keys {
            if let Some(values) = self.entries.get(*key) {
                out.entries
                    .entry(key.to_string())
                    .or_insert_with(|| values.clone());
            }
        }
        out
    }

    /// A new map with reordered keys.
    ///
    /// With `None`, keys are sorted. Otherwise the listed keys come first in
    /// the listed order and the rest follow in their current order.
    pub fn sortkeys(&self, keys: Option<&[&str]>) -> AttributeMap {
        let mut order: Vec<&str> = match keys {
            Some(keys) => keys.to_vec(),
            None => Vec::new(),
        };
        let mut rest: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        if keys.is_none() {
            rest.sort_unstable();
        }
        order.extend(rest);
        self.submap(&order)
    }

    /// Sort the values of the listed keys by short form, or of every key
    /// when `keys` is empty.
    pub fn sort(&mut self, keys: &[&str]) -> &mut Self {
        if keys.is_empty() {
            for values in self.entries.values_mut() {
                values.sort_by_cached_key(|v| v.short());
            }
        } else {
            for key in keys {
                if let Some(values) = self.entries.get_mut(*key) {
                    values.sort_by_cached_key(|v| v.short());
                }
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&[Rc<Value>]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every `(key, value)` pair in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rc<Value>)> {
        self.entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v)))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self
    }

    /// `(key, value)` pairs with values rendered in the active mode.
    pub fn rendered(&self) -> Result<Vec<(String, String)>> {
        let mode = self.mode()?;
        Ok(self
            .iter()
            .map(|(k, v)| (k.to_string(), mode.render(v)))
            .collect())
    }

    /// Encode with the active encoder.
    pub fn encode(&self) -> Result<String> {
        self.encoder()?.encode(self)
    }

    /// Replace the contents with the decoding of `s`.
    ///
    /// Values are built through the active factory; nothing changes unless
    /// every value can be built.
    pub fn decode(&mut self, s: &str) -> Result<&mut Self> {
        let pairs = self.decoder()?.decode(s)?;
        let factory = self.factory()?;
        let mut entries: IndexMap<String, Vec<Rc<Value>>> = IndexMap::new();
        for (key, raw) in pairs {
            let value = raw.as_str().into_value(&*factory, &key)?;
            entries.entry(key).or_default().push(value);
        }
        self.entries = entries;
        Ok(self)
    }

    /// URIs of every value that has one.
    pub fn uri(&self) -> Vec<Uri> {
        self.iter().filter_map(|(_, v)| v.uri().ok()).collect()
    }

    /// URLs of every value that has one.
    ///
    /// Plain text only counts when it looks like an address, i.e. it has a
    /// scheme or a `/`.
    pub fn url(&self) -> Vec<Uri> {
        self.iter()
            .filter(|(_, v)| {
                let value: &Value = v;
                match value {
                    Value::Text(s) => s.contains('/') || Uri::parse(s).is_ok(),
                    _ => true,
                }
            })
            .filter_map(|(_, v)| v.url().ok())
            .collect()
    }
}

impl PartialEq for AttributeMap {
    /// Key order matters; `IndexMap` equality alone would ignore it.
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl fmt::Display for AttributeMap {
    /// `[k=v; k=v]` with values in short form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "[{}]", body.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::RegistryKind;

    fn sample() -> AttributeMap {
        let mut m = AttributeMap::default();
        m.decode("[x=2; x=1; z=Z; z=Y; y=Why]").unwrap();
        m
    }

    #[test]
    fn test_add_and_set() {
        let mut m = AttributeMap::default();
        m.add("y", "7").unwrap();
        m.set("y", "8").unwrap();
        m.add("y", "9").unwrap();
        m.set("x", "7").unwrap();
        assert_eq!(m.to_string(), "[y=8; y=9; x=7]");
    }

    #[test]
    fn test_set_moves_key_to_end() {
        let mut m = sample();
        m.set("x", "7").unwrap();
        assert_eq!(m.to_string(), "[z=Z; z=Y; y=Why; x=7]");
    }

    #[test]
    fn test_remove_key() {
        let mut m = sample();
        m.remove("a").remove("z");
        assert_eq!(m.to_string(), "[x=2; x=1; y=Why]");
    }

    #[test]
    fn test_remove_value() {
        let mut m = sample();
        m.remove_value("y", "Why").unwrap();
        assert_eq!(m.to_string(), "[x=2; x=1; z=Z; z=Y]");
        assert!(!m.contains_key("y"));
        m.remove_value("x", "7").unwrap();
        m.remove_value("w", "7").unwrap();
        assert_eq!(m.get("x").map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_failed_construction_leaves_map_intact() {
        let mut m = sample();
        let before = m.clone();
        assert!(m.add("isbn", "7").is_err());
        assert!(m.set("x", Value::text("ok")).is_ok());
        assert!(m.set("isbn", "7").is_err());
        assert_eq!(m.get("x").map(<[_]>::len), Some(1));
        assert!(m.decode("[isbn=7]").is_err());
        assert_ne!(m, before);
        assert!(m.contains_key("x"));
    }

    #[test]
    fn test_submap_and_sortkeys() {
        let m = sample();
        assert_eq!(m.submap(&["w", "x"]).to_string(), "[x=2; x=1]");
        assert_eq!(
            m.sortkeys(Some(&["y", "z"])).to_string(),
            "[y=Why; z=Z; z=Y; x=2; x=1]"
        );
        assert_eq!(m.sortkeys(None).to_string(), "[x=2; x=1; y=Why; z=Z; z=Y]");
    }

    #[test]
    fn test_submap_shares_values() {
        let m = sample();
        let sub = m.submap(&["y"]);
        assert!(Rc::ptr_eq(&m.get("y").unwrap()[0], &sub.get("y").unwrap()[0]));
    }

    #[test]
    fn test_sort() {
        let mut m = sample();
        m.sort(&["w", "x", "y"]);
        assert_eq!(m.to_string(), "[x=1; x=2; z=Z; z=Y; y=Why]");
        m.sort(&[]);
        assert_eq!(m.to_string(), "[x=1; x=2; z=Y; z=Z; y=Why]");
    }

    #[test]
    fn test_typed_values_and_mode() {
        let mut m = AttributeMap::default();
        m.decode("Title [a=Author; isbn=9780123456786]").unwrap();
        assert_eq!(m.encode().unwrap(), "Title [a=Author; isbn=9780123456786]");
        m.registries().select(RegistryKind::Mode, "long").unwrap();
        assert_eq!(
            m.encode().unwrap(),
            "Title [a=Author; isbn=urn:isbn:9780123456786]"
        );
    }

    #[test]
    fn test_uri_and_url() {
        let mut m = AttributeMap::default();
        m.decode("T [doi=10.1234/5678-90; lccn=89456; a=George]").unwrap();
        let urls: Vec<String> = m.url().iter().map(ToString::to_string).collect();
        assert_eq!(
            urls,
            vec!["https://doi.org/10.1234/5678-90", "https://lccn.loc.gov/89456"]
        );
        let uris: Vec<String> = m.uri().iter().map(ToString::to_string).collect();
        assert_eq!(uris, vec!["info:doi/10.1234/5678-90", "info:lccn/89456"]);
    }

    #[test]
    fn test_text_url() {
        let mut m = AttributeMap::default();
        m.add("asdf", "what/a/thing").unwrap();
        let urls: Vec<String> = m.url().iter().map(ToString::to_string).collect();
        assert_eq!(urls, vec!["http://what/a/thing"]);
    }
}
