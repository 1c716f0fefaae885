//! `MsgPackEncoder` — smallest-tag MessagePack serializer.

use tracing::trace;
use wirepack_buffers::Sink;

use super::constants::*;
use crate::header::Header;
use crate::{CodecError, Result, Value};

/// Writes MessagePack values into a [`Sink`].
///
/// Every `put_*` returns the number of bytes written. Zero means the sink
/// declined to grow and nothing was written.
///
/// ```
/// use wirepack::msgpack::MsgPackEncoder;
///
/// let mut encoder = MsgPackEncoder::new(Vec::new());
/// assert_eq!(encoder.put_i64(127), 1);
/// assert_eq!(encoder.put_i64(128), 3);
/// assert_eq!(encoder.into_inner(), [0x7f, 0xd1, 0x00, 0x80]);
/// ```
pub struct MsgPackEncoder<S> {
    sink: S,
}

impl<S: Sink> MsgPackEncoder<S> {
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
            trace!(total, "msgpack sink declined");
            return 0;
        }
        self.sink.write_all(head);
        self.sink.write_all(body);
        total
    }

    pub fn put_null(&mut self) -> usize {
        self.emit(&[NIL], &[])
    }

    pub fn put_bool(&mut self, b: bool) -> usize {
        self.emit(&[if b { TRUE } else { FALSE }], &[])
    }

    /// Writes a signed integer with the smallest signed tag covering it.
    pub fn put_i64(&mut self, int: i64) -> usize {
        let head = if (-32..=127).contains(&int) {
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

    /// Writes an unsigned integer with the smallest unsigned tag covering it.
    pub fn put_u64(&mut self, uint: u64) -> usize {
        let head = if uint <= u64::from(POSITIVE_FIXINT_MAX) {
            Header::tag(uint as u8)
        } else if let Ok(v) = u8::try_from(uint) {
            Header::tag(UINT8).push(&[v])
        } else if let Ok(v) = u16::try_from(uint) {
            Header::tag(UINT16).push(&v.to_be_bytes())
        } else if let Ok(v) = u32::try_from(uint) {
            Header::tag(UINT32).push(&v.to_be_bytes())
        } else {
            Header::tag(UINT64).push(&uint.to_be_bytes())
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
        let len = s.len();
        let head = if len <= FIXSTR_MAX {
            Header::tag(FIXSTR | len as u8)
        } else if let Ok(n) = u8::try_from(len) {
            Header::tag(STR8).push(&[n])
        } else if let Ok(n) = u16::try_from(len) {
            Header::tag(STR16).push(&n.to_be_bytes())
        } else if let Ok(n) = u32::try_from(len) {
            Header::tag(STR32).push(&n.to_be_bytes())
        } else {
            return 0;
        };
        self.emit(head.as_slice(), s.as_bytes())
    }

    pub fn put_binary(&mut self, bin: &[u8]) -> usize {
        let len = bin.len();
        let head = if let Ok(n) = u8::try_from(len) {
            Header::tag(BIN8).push(&[n])
        } else if let Ok(n) = u16::try_from(len) {
            Header::tag(BIN16).push(&n.to_be_bytes())
        } else if let Ok(n) = u32::try_from(len) {
            Header::tag(BIN32).push(&n.to_be_bytes())
        } else {
            return 0;
        };
        self.emit(head.as_slice(), bin)
    }

    /// Writes an extension, using the fixext tags for 1, 2, 4, 8 and 16 byte
    /// payloads.
    pub fn put_extension(&mut self, kind: i8, data: &[u8]) -> usize {
        let kind = kind as u8;
        let head = match data.len() {
            1 => Header::tag(FIXEXT1).push(&[kind]),
            2 => Header::tag(FIXEXT2).push(&[kind]),
            4 => Header::tag(FIXEXT4).push(&[kind]),
            8 => Header::tag(FIXEXT8).push(&[kind]),
            16 => Header::tag(FIXEXT16).push(&[kind]),
            len => {
                if let Ok(n) = u8::try_from(len) {
                    Header::tag(EXT8).push(&[n, kind])
                } else if let Ok(n) = u16::try_from(len) {
                    Header::tag(EXT16).push(&n.to_be_bytes()).push(&[kind])
                } else if let Ok(n) = u32::try_from(len) {
                    Header::tag(EXT32).push(&n.to_be_bytes()).push(&[kind])
                } else {
                    return 0;
                }
            }
        };
        self.emit(head.as_slice(), data)
    }

    /// Writes an array header for `count` elements. No end marker exists.
    pub fn put_array_begin(&mut self, count: usize) -> usize {
        self.put_container(FIXARRAY, ARRAY16, ARRAY32, count)
    }

    /// Writes a map header for `count` key-value pairs. No end marker exists.
    pub fn put_map_begin(&mut self, count: usize) -> usize {
        self.put_container(FIXMAP, MAP16, MAP32, count)
    }

    fn put_container(&mut self, fix: u8, tag16: u8, tag32: u8, count: usize) -> usize {
        let head = if count <= FIXCOUNT_MAX {
            Header::tag(fix | count as u8)
        } else if let Ok(n) = u16::try_from(count) {
            Header::tag(tag16).push(&n.to_be_bytes())
        } else if let Ok(n) = u32::try_from(count) {
            Header::tag(tag32).push(&n.to_be_bytes())
        } else {
            return 0;
        };
        self.emit(head.as_slice(), &[])
    }

    /// Writes a whole value tree, all or nothing. Records are written as
    /// arrays.
    pub fn put_value(&mut self, value: &Value) -> Result<usize> {
        let mut staged = MsgPackEncoder::new(Vec::new());
        staged.put_tree(value)?;
        let bytes = staged.into_inner();
        Ok(self.emit(&bytes, &[]))
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
            Value::Extension(kind, data) => self.put_extension(*kind, data),
            Value::Array(items) | Value::Record(items) => {
                let mut n = self.put_array_begin(items.len());
                for item in items {
                    n += self.put_tree(item)?;
                }
                n
            }
            Value::Map(pairs) => {
                let mut n = self.put_map_begin(pairs.len());
                for (key, val) in pairs {
                    n += self.put_tree(key)?;
                    n += self.put_tree(val)?;
                }
                n
            }
        };
        if written == 0 {
            return Err(CodecError::Unsupported("msgpack"));
        }
        Ok(written)
    }
}
