//! `JsonEncoder` — compact JSON text serializer.

use tracing::trace;
use wirepack_buffers::Sink;

use crate::value::to_data_uri;
use crate::{CodecError, Result, Value};

/// Writes JSON text into a [`Sink`].
///
/// The primitive `put_*` methods write no separators; callers place them with
/// [`put_value_separator`](Self::put_value_separator) and
/// [`put_name_separator`](Self::put_name_separator). [`put_value`](Self::put_value)
/// writes a whole tree with its separators.
///
/// Floats are written in their shortest round-trip form and always keep a
/// fraction or exponent. NaN and the infinities have no JSON form and are
/// written as `null`. Binary is written as a base64 data URI string.
///
/// ```
/// use wirepack::json::JsonEncoder;
///
/// let mut encoder = JsonEncoder::new(Vec::new());
/// encoder.put_array_begin();
/// encoder.put_f64(1.0);
/// encoder.put_value_separator();
/// encoder.put_str("a\"b");
/// encoder.put_array_end();
/// assert_eq!(encoder.into_inner(), br#"[1.0,"a\"b"]"#);
/// ```
pub struct JsonEncoder<S> {
    sink: S,
}

impl<S: Sink> JsonEncoder<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    fn emit(&mut self, text: &[u8]) -> usize {
        if !self.sink.grow(text.len()) {
            trace!(total = text.len(), "json sink declined");
            return 0;
        }
        self.sink.write_all(text);
        text.len()
    }

    pub fn put_null(&mut self) -> usize {
        self.emit(b"null")
    }

    pub fn put_bool(&mut self, b: bool) -> usize {
        self.emit(if b { b"true" } else { b"false" })
    }

    pub fn put_i64(&mut self, int: i64) -> usize {
        self.emit(int.to_string().as_bytes())
    }

    pub fn put_u64(&mut self, uint: u64) -> usize {
        self.emit(uint.to_string().as_bytes())
    }

    pub fn put_f32(&mut self, float: f32) -> usize {
        if !float.is_finite() {
            return self.put_null();
        }
        self.emit(format!("{float:?}").as_bytes())
    }

    pub fn put_f64(&mut self, float: f64) -> usize {
        if !float.is_finite() {
            return self.put_null();
        }
        self.emit(format!("{float:?}").as_bytes())
    }

    /// Writes a quoted, escaped string.
    pub fn put_str(&mut self, s: &str) -> usize {
        match serde_json::to_string(s) {
            Ok(text) => self.emit(text.as_bytes()),
            Err(_) => 0,
        }
    }

    /// Writes binary data as a `data:application/octet-stream;base64,` string.
    pub fn put_binary(&mut self, bin: &[u8]) -> usize {
        self.emit(format!("\"{}\"", to_data_uri(bin)).as_bytes())
    }

    pub fn put_array_begin(&mut self) -> usize {
        self.emit(b"[")
    }

    pub fn put_array_end(&mut self) -> usize {
        self.emit(b"]")
    }

    pub fn put_object_begin(&mut self) -> usize {
        self.emit(b"{")
    }

    pub fn put_object_end(&mut self) -> usize {
        self.emit(b"}")
    }

    /// `,` between array elements and object members.
    pub fn put_value_separator(&mut self) -> usize {
        self.emit(b",")
    }

    /// `:` between an object key and its value.
    pub fn put_name_separator(&mut self) -> usize {
        self.emit(b":")
    }

    /// Writes a whole value tree, all or nothing.
    ///
    /// Records are written as arrays. Maps need string keys and extensions
    /// are not representable; both fail with [`CodecError::Unsupported`].
    pub fn put_value(&mut self, value: &Value) -> Result<usize> {
        let mut staged = JsonEncoder::new(Vec::new());
        staged.put_tree(value)?;
        let text = staged.into_inner();
        Ok(self.emit(&text))
    }

    fn put_tree(&mut self, value: &Value) -> Result<usize> {
        let written = match value {
            Value::Null => self.put_null(),
            Value::Bool(b) => self.put_bool(*b),
            Value::Int(i) => self.put_i64(*i),
            Value::UInt(u) => self.put_u64(*u),
            Value::Float(f) => self.put_f64(*f),
            Value::Str(s) => self.put_str(s),
            Value::Bin(b) => self.put_binary(b),
            Value::Extension(..) => return Err(CodecError::Unsupported("json")),
            Value::Array(items) | Value::Record(items) => {
                let mut n = self.put_array_begin();
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        n += self.put_value_separator();
                    }
                    n += self.put_tree(item)?;
                }
                n + self.put_array_end()
            }
            Value::Map(pairs) => {
                let mut n = self.put_object_begin();
                for (i, (key, val)) in pairs.iter().enumerate() {
                    let key = key.as_str().ok_or(CodecError::Unsupported("json"))?;
                    if i > 0 {
                        n += self.put_value_separator();
                    }
                    n += self.put_str(key);
                    n += self.put_name_separator();
                    n += self.put_tree(val)?;
                }
                n + self.put_object_end()
            }
        };
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &Value) -> String {
        let mut encoder = JsonEncoder::new(Vec::new());
        encoder.put_value(value).unwrap();
        String::from_utf8(encoder.into_inner()).unwrap()
    }

    #[test]
    fn floats_stay_floats() {
        assert_eq!(text(&Value::Float(2.0)), "2.0");
        assert_eq!(text(&Value::Float(-0.25)), "-0.25");
        assert_eq!(text(&Value::Float(f64::NAN)), "null");
        assert_eq!(text(&Value::Float(f64::NEG_INFINITY)), "null");
    }

    #[test]
    fn object_separators() {
        let value = Value::Map(vec![
            (Value::from("a"), Value::Array(vec![Value::Int(1), Value::Null])),
            (Value::from("b\n"), Value::Bool(false)),
        ]);
        assert_eq!(text(&value), r#"{"a":[1,null],"b\n":false}"#);
    }

    #[test]
    fn matches_serde_json() {
        let input = serde_json::json!({"x": [1, "two", {"three": 3.5}], "y": null});
        let encoded = text(&Value::from(input.clone()));
        let parsed: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(parsed, input);
    }

    #[test]
    fn binary_as_data_uri() {
        assert_eq!(
            text(&Value::Bin(vec![0xff])),
            "\"data:application/octet-stream;base64,/w==\""
        );
    }

    #[test]
    fn unsupported_shapes() {
        let mut encoder = JsonEncoder::new(Vec::new());
        let value = Value::Map(vec![(Value::Int(1), Value::Null)]);
        assert_eq!(encoder.put_value(&value), Err(CodecError::Unsupported("json")));
        assert_eq!(
            encoder.put_value(&Value::Extension(1, vec![])),
            Err(CodecError::Unsupported("json"))
        );
        assert!(encoder.into_inner().is_empty());
    }
}
