//! `UbjsonEncoder` — UBJSON serializer.

use tracing::trace;
use wirepack_buffers::Sink;

use super::constants::*;
use crate::header::Header;
use crate::{CodecError, Result, Value};

/// Writes UBJSON values into a [`Sink`].
///
/// Integers use the signed `i`/`I`/`l`/`L` markers only. UBJSON has no
/// representation for NaN or the infinities, so non-finite floats are written
/// as `Z` (null); decoding such a value yields `Null`, not a float.
///
/// ```
/// use wirepack::ubjson::UbjsonEncoder;
///
/// let mut encoder = UbjsonEncoder::new(Vec::new());
/// encoder.put_f64(f64::NAN);
/// encoder.put_str("hi");
/// assert_eq!(encoder.into_inner(), b"ZSi\x02hi");
/// ```
pub struct UbjsonEncoder<S> {
    sink: S,
}

impl<S: Sink> UbjsonEncoder<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    fn emit(&mut self, head: &[u8], body: &[u8]) -> usize {
        let total = head.len() + body.len();
        if !self.sink.grow(total) {
            trace!(total, "ubjson sink declined");
            return 0;
        }
        self.sink.write_all(head);
        self.sink.write_all(body);
        total
    }

    pub fn put_null(&mut self) -> usize {
        self.emit(&[NULL], &[])
    }

    /// Writes the `N` filler marker.
    pub fn put_noop(&mut self) -> usize {
        self.emit(&[NOOP], &[])
    }

    pub fn put_bool(&mut self, b: bool) -> usize {
        self.emit(&[if b { TRUE } else { FALSE }], &[])
    }

    pub fn put_i64(&mut self, int: i64) -> usize {
        self.emit(int_header(int).as_slice(), &[])
    }

    pub fn put_f32(&mut self, float: f32) -> usize {
        if !float.is_finite() {
            return self.put_null();
        }
        self.emit(Header::tag(FLOAT32).push(&float.to_be_bytes()).as_slice(), &[])
    }

    pub fn put_f64(&mut self, float: f64) -> usize {
        if !float.is_finite() {
            return self.put_null();
        }
        self.emit(Header::tag(FLOAT64).push(&float.to_be_bytes()).as_slice(), &[])
    }

    pub fn put_str(&mut self, s: &str) -> usize {
        let head = Header::tag(STRING).push(int_header(s.len() as i64).as_slice());
        self.emit(head.as_slice(), s.as_bytes())
    }

    /// Writes an object key: a length and the bytes, without the `S` marker.
    pub fn put_key(&mut self, key: &str) -> usize {
        self.emit(int_header(key.len() as i64).as_slice(), key.as_bytes())
    }

    /// Writes binary data as a strongly typed `uint8` array (`[$U#<len>`).
    pub fn put_binary(&mut self, bin: &[u8]) -> usize {
        let head = Header::tag(ARRAY_BEGIN)
            .push(&BINARY_HEADER[1..])
            .push(int_header(bin.len() as i64).as_slice());
        self.emit(head.as_slice(), bin)
    }

    pub fn put_array_begin(&mut self) -> usize {
        self.emit(&[ARRAY_BEGIN], &[])
    }

    pub fn put_array_end(&mut self) -> usize {
        self.emit(&[ARRAY_END], &[])
    }

    pub fn put_object_begin(&mut self) -> usize {
        self.emit(&[OBJECT_BEGIN], &[])
    }

    pub fn put_object_end(&mut self) -> usize {
        self.emit(&[OBJECT_END], &[])
    }

    /// Writes a whole value tree, all or nothing.
    ///
    /// Records are written as arrays. Maps need string keys; extensions and
    /// unsigned integers above `i64::MAX` are not representable.
    pub fn put_value(&mut self, value: &Value) -> Result<usize> {
        let mut staged = UbjsonEncoder::new(Vec::new());
        staged.put_tree(value)?;
        let bytes = staged.into_inner();
        Ok(self.emit(&bytes, &[]))
    }

    fn put_tree(&mut self, value: &Value) -> Result<usize> {
        let written = match value {
            Value::Null => self.put_null(),
            Value::Bool(b) => self.put_bool(*b),
            Value::Int(i) => self.put_i64(*i),
            Value::UInt(u) => {
                let int = i64::try_from(*u).map_err(|_| CodecError::Unsupported("ubjson"))?;
                self.put_i64(int)
            }
            Value::Float(f) => self.put_f64(*f),
            Value::Str(s) => self.put_str(s),
            Value::Bin(b) => self.put_binary(b),
            Value::Extension(..) => return Err(CodecError::Unsupported("ubjson")),
            Value::Array(items) | Value::Record(items) => {
                let mut n = self.put_array_begin();
                for item in items {
                    n += self.put_tree(item)?;
                }
                n + self.put_array_end()
            }
            Value::Map(pairs) => {
                let mut n = self.put_object_begin();
                for (key, val) in pairs {
                    let key = key.as_str().ok_or(CodecError::Unsupported("ubjson"))?;
                    n += self.put_key(key);
                    n += self.put_tree(val)?;
                }
                n + self.put_object_end()
            }
        };
        Ok(written)
    }
}

/// Marker and big-endian bytes of the narrowest signed integer type holding
/// `int`.
fn int_header(int: i64) -> Header {
    if let Ok(v) = i8::try_from(int) {
        Header::tag(INT8).push(&v.to_be_bytes())
    } else if let Ok(v) = i16::try_from(int) {
        Header::tag(INT16).push(&v.to_be_bytes())
    } else if let Ok(v) = i32::try_from(int) {
        Header::tag(INT32).push(&v.to_be_bytes())
    } else {
        Header::tag(INT64).push(&int.to_be_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: &Value) -> Vec<u8> {
        let mut encoder = UbjsonEncoder::new(Vec::new());
        let n = encoder.put_value(value).unwrap();
        let out = encoder.into_inner();
        assert_eq!(n, out.len());
        out
    }

    #[test]
    fn integer_markers() {
        assert_eq!(encoded(&Value::Int(-1)), b"i\xff");
        assert_eq!(encoded(&Value::Int(200)), b"I\x00\xc8");
        assert_eq!(encoded(&Value::Int(1 << 20)), b"l\x00\x10\x00\x00");
        assert_eq!(encoded(&Value::UInt(1 << 40)).first(), Some(&INT64));
    }

    #[test]
    fn object_keys_have_no_string_marker() {
        let value = Value::Map(vec![(Value::from("k"), Value::Null)]);
        assert_eq!(encoded(&value), b"{i\x01kZ}");
    }

    #[test]
    fn binary_is_typed_array() {
        assert_eq!(encoded(&Value::Bin(vec![1, 2])), b"[$U#i\x02\x01\x02");
    }

    #[test]
    fn infinity_is_null() {
        assert_eq!(encoded(&Value::Float(f64::INFINITY)), b"Z");
        let mut encoder = UbjsonEncoder::new(Vec::new());
        assert_eq!(encoder.put_f32(f32::NEG_INFINITY), 1);
        assert_eq!(encoder.into_inner(), b"Z");
    }

    #[test]
    fn non_string_key_is_unsupported() {
        let mut encoder = UbjsonEncoder::new(Vec::new());
        let value = Value::Map(vec![(Value::Int(1), Value::Null)]);
        assert_eq!(encoder.put_value(&value), Err(CodecError::Unsupported("ubjson")));
        assert!(encoder.into_inner().is_empty());
    }
}
