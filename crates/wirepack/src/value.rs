//! [`Value`] — the closed value type every codec can encode and decode.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Prefix of the data URI used to carry binary data in text formats.
pub const BIN_URI_PREFIX: &str = "data:application/octet-stream;base64,";

/// A self-describing value tree.
///
/// Formats that lack a variant map it onto the nearest one they have: records
/// become arrays outside TransEnc, binary becomes a data URI string in JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer above `i64::MAX`. Decoders never produce smaller
    /// values here.
    UInt(u64),
    Float(f64),
    Str(String),
    Bin(Vec<u8>),
    Array(Vec<Value>),
    /// Ordered key-value pairs. Keys may be any value in binary formats.
    Map(Vec<(Value, Value)>),
    /// Positional tuple (TransEnc records).
    Record(Vec<Value>),
    /// MessagePack extension type and payload.
    Extension(i8, Vec<u8>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(int) => Value::Int(int),
            Err(_) => Value::UInt(u),
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bin(b)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::json!(i),
            Value::UInt(u) => serde_json::json!(u),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bin(b) => serde_json::Value::String(to_data_uri(&b)),
            Value::Str(s) => serde_json::Value::String(s),
            Value::Array(arr) | Value::Record(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Map(pairs) => serde_json::Value::Object(
                pairs
                    .into_iter()
                    .map(|(k, v)| (key_string(k), serde_json::Value::from(v)))
                    .collect(),
            ),
            Value::Extension(_, data) => serde_json::Value::String(to_data_uri(&data)),
        }
    }
}

/// Object keys in JSON must be strings; other keys use their JSON text.
fn key_string(key: Value) -> String {
    match key {
        Value::Str(s) => s,
        other => serde_json::Value::from(other).to_string(),
    }
}

/// Encodes bytes as a `data:application/octet-stream;base64,` URI.
pub fn to_data_uri(bytes: &[u8]) -> String {
    let mut uri = String::with_capacity(BIN_URI_PREFIX.len() + bytes.len().div_ceil(3) * 4);
    uri.push_str(BIN_URI_PREFIX);
    STANDARD.encode_string(bytes, &mut uri);
    uri
}

/// Decodes a data URI produced by [`to_data_uri`]. Returns `None` when the
/// prefix is missing or the base64 body is invalid.
pub fn from_data_uri(uri: &[u8]) -> Option<Vec<u8>> {
    let body = uri.strip_prefix(BIN_URI_PREFIX.as_bytes())?;
    STANDARD.decode(body).ok()
}
