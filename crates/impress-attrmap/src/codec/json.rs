//! JSON codec
//!
//! Maps encode as an object of string arrays. Object keys come back in
//! sorted order, so key order does not survive a round trip.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::{Decoder, Encoder};
use crate::error::{AttrError, Result};
use crate::map::AttributeMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

const NAME: &str = "json";

impl Encoder for JsonCodec {
    fn encode(&self, map: &AttributeMap) -> Result<String> {
        let mut object = Map::new();
        for (key, value) in map.rendered()? {
            let entry = object
                .entry(key)
                .or_insert_with(|| JsonValue::Array(Vec::new()));
            if let JsonValue::Array(values) = entry {
                values.push(JsonValue::String(value));
            }
        }
        Ok(JsonValue::Object(object).to_string())
    }
}

/// A key's value in decoded input: one string or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Values {
    One(String),
    Many(Vec<String>),
}

impl Decoder for JsonCodec {
    fn decode(&self, s: &str) -> Result<Vec<(String, String)>> {
        let object: BTreeMap<String, Values> =
            serde_json::from_str(s).map_err(|e| AttrError::decode(NAME, s, e.to_string()))?;

        let mut pairs = Vec::new();
        for (key, values) in object {
            match values {
                Values::One(v) => pairs.push((key, v)),
                Values::Many(vs) => pairs.extend(vs.into_iter().map(|v| (key.clone(), v))),
            }
        }
        Ok(pairs)
    }
}
