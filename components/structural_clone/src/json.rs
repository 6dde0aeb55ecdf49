//! JSON codec and the serialize round-trip tier
//!
//! `stringify` follows the rules of `JSON.stringify`: functions and undefined
//! are dropped from objects and become `null` in arrays, non-finite numbers
//! become `null`, dates become ISO strings and keyed collections, buffers and
//! handles have no enumerable members so they become `{}`. BigInt members and
//! cycles are errors.

use serde::Deserialize;
use serde_json::{Map, Number};

use crate::error::{CloneError, CloneResult};
use crate::native::CloneOptions;
use crate::tier::CloneTier;
use crate::value::Value;

/// Largest integer a double holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// JSON text conversions for [`Value`]
pub struct JsonCodec;

impl JsonCodec {
    /// JSON.parse(text)
    ///
    /// Nesting is not limited here; callers bound it when producing the text.
    pub fn parse(text: &str) -> CloneResult<Value> {
        let parse_error = |e: serde_json::Error| {
            CloneError::Deserialization(format!("JSON parse error: {}", e))
        };
        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let json = serde_json::Value::deserialize(&mut de).map_err(parse_error)?;
        de.end().map_err(parse_error)?;
        Ok(Self::json_to_value(&json))
    }

    /// JSON.stringify(value)
    pub fn stringify(value: &Value) -> CloneResult<String> {
        Self::stringify_with_limit(value, CloneOptions::default().max_depth)
    }

    /// JSON.stringify(value, null, 2)
    pub fn stringify_pretty(value: &Value) -> CloneResult<String> {
        match Self::to_json(value, CloneOptions::default().max_depth)? {
            Some(json) => serde_json::to_string_pretty(&json)
                .map_err(|e| CloneError::Serialization(e.to_string())),
            None => Ok("undefined".to_string()),
        }
    }

    /// Stringify with a bound on container nesting
    pub fn stringify_with_limit(value: &Value, max_depth: usize) -> CloneResult<String> {
        match Self::to_json(value, max_depth)? {
            Some(json) => {
                serde_json::to_string(&json).map_err(|e| CloneError::Serialization(e.to_string()))
            }
            // A bare undefined or function has no JSON text
            None => Ok("undefined".to_string()),
        }
    }

    /// Convert to a JSON tree; `None` marks a value JSON cannot represent
    pub fn to_json(value: &Value, max_depth: usize) -> CloneResult<Option<serde_json::Value>> {
        let mut path = Vec::new();
        Self::value_to_json(value, &mut path, max_depth)
    }

    /// Convert a parsed JSON tree into a fresh value graph
    pub fn json_to_value(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(arr) => {
                Value::array_from(arr.iter().map(Self::json_to_value).collect())
            }
            serde_json::Value::Object(obj) => Value::object_from(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Self::json_to_value(v)))
                    .collect(),
            ),
        }
    }

    fn value_to_json(
        value: &Value,
        path: &mut Vec<usize>,
        max_depth: usize,
    ) -> CloneResult<Option<serde_json::Value>> {
        let json = match value {
            Value::Undefined | Value::Function(_) => return Ok(None),
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => Self::number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::BigInt(_) => {
                return Err(CloneError::Serialization(
                    "Do not know how to serialize a BigInt".to_string(),
                ))
            }
            Value::Date(date) => match date.borrow().to_iso_string() {
                Some(iso) => serde_json::Value::String(iso),
                None => serde_json::Value::Null,
            },
            Value::Map(_) | Value::Set(_) | Value::Bytes(_) | Value::Handle(_) => {
                serde_json::Value::Object(Map::new())
            }
            Value::Object(obj) => {
                Self::enter(value, path, max_depth)?;
                let mut map = Map::new();
                for (key, member) in &obj.borrow().properties {
                    if let Some(json) = Self::value_to_json(member, path, max_depth)? {
                        map.insert(key.clone(), json);
                    }
                }
                path.pop();
                serde_json::Value::Object(map)
            }
            Value::Array(arr) => {
                Self::enter(value, path, max_depth)?;
                let mut elements = Vec::new();
                for element in &arr.borrow().elements {
                    let json = Self::value_to_json(element, path, max_depth)?;
                    elements.push(json.unwrap_or(serde_json::Value::Null));
                }
                path.pop();
                serde_json::Value::Array(elements)
            }
        };
        Ok(Some(json))
    }

    /// Push a container onto the current path, rejecting cycles and depth overflow
    fn enter(value: &Value, path: &mut Vec<usize>, max_depth: usize) -> CloneResult<()> {
        let id = value.identity().unwrap_or_default();
        if path.contains(&id) {
            return Err(CloneError::CircularReference);
        }
        if path.len() >= max_depth {
            return Err(CloneError::MaxDepthExceeded);
        }
        path.push(id);
        Ok(())
    }

    fn number_to_json(n: f64) -> serde_json::Value {
        if !n.is_finite() {
            return serde_json::Value::Null;
        }
        if n == n.trunc() && n.abs() <= MAX_SAFE_INTEGER {
            return serde_json::Value::Number(Number::from(n as i64));
        }
        Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Serialize to JSON text and parse it back
#[derive(Debug, Clone, Default)]
pub struct JsonRoundTrip {
    options: CloneOptions,
}

impl JsonRoundTrip {
    /// Create with the given options
    pub fn new(options: CloneOptions) -> Self {
        Self { options }
    }
}

impl CloneTier for JsonRoundTrip {
    fn name(&self) -> &'static str {
        "json_round_trip"
    }

    fn try_clone(&self, value: &Value) -> CloneResult<Value> {
        let text = JsonCodec::stringify_with_limit(value, self.options.max_depth)?;
        JsonCodec::parse(&text)
    }
}
