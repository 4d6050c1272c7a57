//! Encoders and decoders between attribute maps and strings
//!
//! - `v3`: `Title [k=v; k=v]`
//! - `v2`: `Title {k=v;k=v}`
//! - `json`: an object of string arrays
//!
//! Decoders only split text into `(key, raw)` pairs; the map builds the
//! values through its active factory.

mod bracket;
mod json;

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::map::AttributeMap;

pub use bracket::BracketCodec;
pub use json::JsonCodec;

/// Turns a map into a string, rendering values in the map's active mode.
pub trait Encoder: fmt::Debug {
    fn encode(&self, map: &AttributeMap) -> Result<String>;
}

/// Splits a string into ordered `(key, raw value)` pairs.
pub trait Decoder: fmt::Debug {
    fn decode(&self, s: &str) -> Result<Vec<(String, String)>>;
}

/// The standard encoder registry entries.
pub fn standard_encoders() -> Vec<(&'static str, Rc<dyn Encoder>)> {
    let v2: Rc<dyn Encoder> = Rc::new(BracketCodec::v2());
    let v3: Rc<dyn Encoder> = Rc::new(BracketCodec::v3());
    let json: Rc<dyn Encoder> = Rc::new(JsonCodec);
    vec![("v2", v2), ("v3", v3), ("json", json)]
}

/// The standard decoder registry entries.
pub fn standard_decoders() -> Vec<(&'static str, Rc<dyn Decoder>)> {
    let v2: Rc<dyn Decoder> = Rc::new(BracketCodec::v2());
    let v3: Rc<dyn Decoder> = Rc::new(BracketCodec::v3());
    let json: Rc<dyn Decoder> = Rc::new(JsonCodec);
    vec![("v2", v2), ("v3", v3), ("json", json)]
}
