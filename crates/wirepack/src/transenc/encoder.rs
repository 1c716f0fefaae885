//! `TransEncEncoder` — smallest-tag TransEnc serializer.

use tracing::trace;
use wirepack_buffers::Sink;

use super::constants::*;
use crate::header::Header;
use crate::{CodecError, Result, Value};

/// Writes TransEnc values into a [`Sink`].
///
/// Every `put_*` returns the number of bytes written; zero means the sink
/// declined and nothing was written. Containers are delimited by explicit
/// begin and end tags.
///
/// ```
/// use wirepack::transenc::TransEncEncoder;
///
/// let mut encoder = TransEncEncoder::new(Vec::new());
/// encoder.put_array_begin();
/// encoder.put_i64(-1);
/// encoder.put_i64(300);
/// encoder.put_array_end();
/// assert_eq!(encoder.into_inner(), [0xa2, 0xff, 0x84, 0x01, 0x2c, 0xa3]);
/// ```
pub struct TransEncEncoder<S> {
    sink: S,
}

impl<S: Sink> TransEncEncoder<S> {
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
            trace!(total, "transenc sink declined");
            return 0;
        }
        self.sink.write_all(head);
        self.sink.write_all(body);
        total
    }

    pub fn put_null(&mut self) -> usize {
        self.emit(&[NULL], &[])
    }

    pub fn put_bool(&mut self, b: bool) -> usize {
        self.emit(&[if b { TRUE } else { FALSE }], &[])
    }

    /// Inline for `-32..=127`, otherwise the narrowest of int8/16/32/64.
    pub fn put_i64(&mut self, int: i64) -> usize {
        let head = if (INLINE_MIN..=INLINE_MAX).contains(&int) {
            Header::tag(int as u8)
        } else if let Ok(v) = i8::try_from(int) {
            Header::tag(INT8).push(&v.to_be_bytes())
        } else if let Ok(v) = i16::try_from(int) {
            Header::tag(INT16).push(&v.to_be_bytes())
        } else if let Ok(v) = i32::try_from(int) {
            Header::tag(INT32).push(&v.to_be_bytes())
        } else {
            Header::tag(INT64).push(&int.to_be_bytes())
        };
        self.emit(head.as_slice(), &[])
    }

    pub fn put_f32(&mut self, float: f32) -> usize {
        self.emit(Header::tag(FLOAT32).push(&float.to_be_bytes()).as_slice(), &[])
    }

    pub fn put_f64(&mut self, float: f64) -> usize {
        self.emit(Header::tag(FLOAT64).push(&float.to_be_bytes()).as_slice(), &[])
    }

    pub fn put_str(&mut self, s: &str) -> usize {
        let head = length_header(STR8, s.len());
        self.emit(head.as_slice(), s.as_bytes())
    }

    pub fn put_binary(&mut self, bin: &[u8]) -> usize {
        let head = length_header(BIN8, bin.len());
        self.emit(head.as_slice(), bin)
    }

    pub fn put_record_begin(&mut self) -> usize {
        self.emit(&[RECORD_BEGIN], &[])
    }

    pub fn put_record_end(&mut self) -> usize {
        self.emit(&[RECORD_END], &[])
    }

    pub fn put_array_begin(&mut self) -> usize {
        self.emit(&[ARRAY_BEGIN], &[])
    }

    pub fn put_array_end(&mut self) -> usize {
        self.emit(&[ARRAY_END], &[])
    }

    pub fn put_map_begin(&mut self) -> usize {
        self.emit(&[MAP_BEGIN], &[])
    }

    pub fn put_map_end(&mut self) -> usize {
        self.emit(&[MAP_END], &[])
    }

    /// Writes a whole value tree, all or nothing.
    ///
    /// Extensions and unsigned integers above `i64::MAX` have no TransEnc
    /// form and fail with [`CodecError::Unsupported`].
    pub fn put_value(&mut self, value: &Value) -> Result<usize> {
        let mut staged = TransEncEncoder::new(Vec::new());
        staged.put_tree(value)?;
        let bytes = staged.into_inner();
        Ok(self.emit(&bytes, &[]))
    }

    fn put_tree(&mut self, value: &Value) -> Result<usize> {
        let written = match value {
            Value::Null => self.put_null(),
            Value::Bool(b) => self.put_bool(*b),
            Value::Int(i) => self.put_i64(*i),
            Value::UInt(u) => match i64::try_from(*u) {
                Ok(i) => self.put_i64(i),
                Err(_) => return Err(CodecError::Unsupported("transenc")),
            },
            Value::Float(f) => self.put_f64(*f),
            Value::Str(s) => self.put_str(s),
            Value::Bin(b) => self.put_binary(b),
            Value::Extension(..) => return Err(CodecError::Unsupported("transenc")),
            Value::Array(items) => {
                let mut n = self.put_array_begin();
                for item in items {
                    n += self.put_tree(item)?;
                }
                n + self.put_array_end()
            }
            Value::Record(items) => {
                let mut n = self.put_record_begin();
                for item in items {
                    n += self.put_tree(item)?;
                }
                n + self.put_record_end()
            }
            Value::Map(pairs) => {
                let mut n = self.put_map_begin();
                for (key, val) in pairs {
                    n += self.put_tree(key)?;
                    n += self.put_tree(val)?;
                }
                n + self.put_map_end()
            }
        };
        Ok(written)
    }
}

/// Tag plus signed length prefix of the narrowest class holding `len`. The
/// 8/16/32/64-bit classes follow `base` in that order.
fn length_header(base: u8, len: usize) -> Header {
    if let Ok(n) = i8::try_from(len) {
        Header::tag(base).push(&n.to_be_bytes())
    } else if let Ok(n) = i16::try_from(len) {
        Header::tag(base + 1).push(&n.to_be_bytes())
    } else if let Ok(n) = i32::try_from(len) {
        Header::tag(base + 2).push(&n.to_be_bytes())
    } else {
        Header::tag(base + 3).push(&(len as i64).to_be_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(put: impl FnOnce(&mut TransEncEncoder<Vec<u8>>) -> usize) -> Vec<u8> {
        let mut encoder = TransEncEncoder::new(Vec::new());
        let n = put(&mut encoder);
        let out = encoder.into_inner();
        assert_eq!(n, out.len());
        out
    }

    #[test]
    fn integers_pick_smallest_tag() {
        assert_eq!(bytes(|e| e.put_i64(0)), [0x00]);
        assert_eq!(bytes(|e| e.put_i64(127)), [0x7f]);
        assert_eq!(bytes(|e| e.put_i64(-32)), [0xe0]);
        assert_eq!(bytes(|e| e.put_i64(-33)), [INT8, 0xdf]);
        assert_eq!(bytes(|e| e.put_i64(128)), [INT16, 0x00, 0x80]);
        assert_eq!(bytes(|e| e.put_i64(1)), [0x01]);
        assert_eq!(bytes(|e| e.put_i64(256)), [INT16, 0x01, 0x00]);
        assert_eq!(bytes(|e| e.put_i64(70_000)), [INT32, 0x00, 0x01, 0x11, 0x70]);
        assert_eq!(bytes(|e| e.put_i64(i64::MIN)).len(), 9);
    }

    #[test]
    fn string_length_classes() {
        assert_eq!(bytes(|e| e.put_str("hi")), [STR8, 0x02, b'h', b'i']);
        let long = "x".repeat(128);
        let out = bytes(|e| e.put_str(&long));
        assert_eq!(&out[..3], [STR16, 0x00, 0x80]);
        assert_eq!(bytes(|e| e.put_binary(&[7])), [BIN8, 0x01, 0x07]);
    }

    #[test]
    fn unsupported_values_write_nothing() {
        let mut encoder = TransEncEncoder::new(Vec::new());
        let value = Value::Array(vec![Value::Int(1), Value::UInt(u64::MAX)]);
        assert_eq!(
            encoder.put_value(&value),
            Err(CodecError::Unsupported("transenc"))
        );
        assert!(encoder.into_inner().is_empty());
    }
}
