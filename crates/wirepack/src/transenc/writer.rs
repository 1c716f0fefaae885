//! `TransEncWriter` — TransEnc writer with optional declared counts.

use tracing::debug;
use wirepack_buffers::Sink;

use super::TransEncEncoder;
use crate::frame::{write_element, Frame};
use crate::{CodecError, Result, Token, Value};

/// Wraps a [`TransEncEncoder`] with a nesting stack.
///
/// TransEnc carries explicit end tags, so containers may be opened without a
/// count. When a count is given, it is enforced just as for MessagePack.
/// Returns follow the encoder: `Ok(0)` means the sink declined and the
/// nesting state is unchanged.
pub struct TransEncWriter<S> {
    encoder: TransEncEncoder<S>,
    stack: Vec<Frame>,
}

type Put<S> = fn(&mut TransEncEncoder<S>) -> usize;

impl<S: Sink> TransEncWriter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            encoder: TransEncEncoder::new(sink),
            stack: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn into_inner(self) -> S {
        self.encoder.into_inner()
    }

    fn write_with(&mut self, put: impl FnOnce(&mut TransEncEncoder<S>) -> usize) -> Result<usize> {
        let encoder = &mut self.encoder;
        write_element(&mut self.stack, || Ok(put(encoder)))
    }

    pub fn write_null(&mut self) -> Result<usize> {
        self.write_with(|e| e.put_null())
    }

    pub fn write_bool(&mut self, b: bool) -> Result<usize> {
        self.write_with(|e| e.put_bool(b))
    }

    pub fn write_i64(&mut self, int: i64) -> Result<usize> {
        self.write_with(|e| e.put_i64(int))
    }

    pub fn write_f32(&mut self, float: f32) -> Result<usize> {
        self.write_with(|e| e.put_f32(float))
    }

    pub fn write_f64(&mut self, float: f64) -> Result<usize> {
        self.write_with(|e| e.put_f64(float))
    }

    pub fn write_str(&mut self, s: &str) -> Result<usize> {
        self.write_with(|e| e.put_str(s))
    }

    pub fn write_binary(&mut self, bin: &[u8]) -> Result<usize> {
        self.write_with(|e| e.put_binary(bin))
    }

    /// Writes a complete value tree as one element.
    pub fn write_value(&mut self, value: &Value) -> Result<usize> {
        let encoder = &mut self.encoder;
        write_element(&mut self.stack, || encoder.put_value(value))
    }

    pub fn record_begin(&mut self) -> Result<usize> {
        self.open(Frame::Record, TransEncEncoder::put_record_begin)
    }

    /// Opens an array, checked against `count` when one is given.
    pub fn array_begin(&mut self, count: Option<usize>) -> Result<usize> {
        self.open(Frame::array(count), TransEncEncoder::put_array_begin)
    }

    /// Opens a map, checked against `count` key-value pairs when one is given.
    pub fn map_begin(&mut self, count: Option<usize>) -> Result<usize> {
        let frame = Frame::map(count).ok_or(CodecError::Overflow)?;
        self.open(frame, TransEncEncoder::put_map_begin)
    }

    fn open(&mut self, frame: Frame, put: Put<S>) -> Result<usize> {
        let written = self.write_with(put)?;
        if written > 0 {
            self.stack.push(frame);
        }
        Ok(written)
    }

    pub fn record_end(&mut self) -> Result<usize> {
        self.close(Token::RecordEnd, TransEncEncoder::put_record_end)
    }

    pub fn array_end(&mut self) -> Result<usize> {
        self.close(Token::ArrayEnd, TransEncEncoder::put_array_end)
    }

    pub fn map_end(&mut self) -> Result<usize> {
        self.close(Token::MapEnd, TransEncEncoder::put_map_end)
    }

    fn close(&mut self, end: Token, put: Put<S>) -> Result<usize> {
        match self.stack.last() {
            Some(frame) if frame.end_token() == end => frame.check_close()?,
            _ => {
                debug!(?end, depth = self.stack.len(), "unbalanced container end");
                return Err(CodecError::UnbalancedEnd(end));
            }
        }
        let written = put(&mut self.encoder);
        if written > 0 {
            self.stack.pop();
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transenc::decode;

    #[test]
    fn unchecked_containers() {
        let mut writer = TransEncWriter::new(Vec::new());
        writer.map_begin(None).unwrap();
        writer.write_str("k").unwrap();
        writer.record_begin().unwrap();
        writer.write_i64(1).unwrap();
        writer.write_bool(false).unwrap();
        writer.record_end().unwrap();
        writer.map_end().unwrap();
        assert_eq!(writer.depth(), 0);
        let value = decode(&writer.into_inner()).unwrap();
        assert_eq!(
            value,
            Value::Map(vec![(
                Value::Str("k".into()),
                Value::Record(vec![Value::Int(1), Value::Bool(false)])
            )])
        );
    }

    #[test]
    fn declared_count_is_enforced() {
        let mut writer = TransEncWriter::new(Vec::new());
        writer.array_begin(Some(2)).unwrap();
        writer.write_null().unwrap();
        assert_eq!(writer.array_end(), Err(CodecError::TooFewElements(1)));
        writer.write_null().unwrap();
        assert_eq!(writer.write_null(), Err(CodecError::TooManyElements));
        assert_eq!(writer.array_end(), Ok(1));
    }

    #[test]
    fn odd_unchecked_map_cannot_close() {
        let mut writer = TransEncWriter::new(Vec::new());
        writer.map_begin(None).unwrap();
        writer.write_null().unwrap();
        assert_eq!(writer.map_end(), Err(CodecError::TooFewElements(1)));
    }

    #[test]
    fn wrong_end_kind() {
        let mut writer = TransEncWriter::new(Vec::new());
        writer.record_begin().unwrap();
        assert_eq!(
            writer.array_end(),
            Err(CodecError::UnbalancedEnd(Token::ArrayEnd))
        );
        assert_eq!(writer.record_end(), Ok(1));
    }
}
