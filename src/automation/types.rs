//! Wire types for the automation service.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::client::AutomationError;

/// A dynamically-typed value carried in request payloads and response `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Name of the variant, for decode error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// Argument map sent as the request `data` field.
pub type Payload = BTreeMap<String, Value>;

/// Request body posted to every automation endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRequest {
    /// Correlation id (may be empty)
    pub id: String,

    /// Optional annotation, omitted from the wire when empty
    #[serde(rename = "msg", skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// Operation-specific arguments
    #[serde(rename = "data")]
    pub payload: Payload,
}

impl CommandRequest {
    pub fn new(id: impl Into<String>, payload: Payload) -> Self {
        Self {
            id: id.into(),
            message: String::new(),
            payload,
        }
    }
}

/// Response envelope shared by every automation endpoint.
///
/// Operations populate only the subset of fields their contract names; use the
/// typed accessors rather than indexing `data` directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i64>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: BTreeMap<String, Value>,
}

impl Point {
    /// Coordinates, with omitted fields read as zero.
    pub fn coords(&self) -> (i64, i64) {
        (self.x.unwrap_or(0), self.y.unwrap_or(0))
    }

    fn field(&self, key: &str) -> Result<&Value, AutomationError> {
        self.data
            .get(key)
            .ok_or_else(|| AutomationError::Decode(format!("missing data key '{}'", key)))
    }

    /// A string entry of `data`.
    pub fn string(&self, key: &str) -> Result<&str, AutomationError> {
        match self.field(key)? {
            Value::Str(s) => Ok(s),
            other => Err(AutomationError::Decode(format!(
                "data key '{}' is a {}, expected string",
                key,
                other.kind()
            ))),
        }
    }

    /// Recognized text returned by `/gettext`.
    pub fn text(&self) -> Result<&str, AutomationError> {
        self.string("text")
    }

    /// An integral numeric entry of `data` (JSON numbers like `255.0` are accepted).
    pub fn channel(&self, key: &str) -> Result<i64, AutomationError> {
        match self.field(key)? {
            Value::Int(v) => Ok(*v),
            Value::Float(v) if v.fract() == 0.0 && v.is_finite() => Ok(*v as i64),
            other => Err(AutomationError::Decode(format!(
                "data key '{}' is a {}, expected integer",
                key,
                other.kind()
            ))),
        }
    }

    /// The `data` map rendered as compact JSON.
    pub fn data_string(&self) -> String {
        serde_json::to_string(&self.data).unwrap_or_else(|_| "{}".to_string())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}
