//! `MsgPackWriter` — arity-checked MessagePack writer.

use tracing::debug;
use wirepack_buffers::Sink;

use super::MsgPackEncoder;
use crate::frame::{write_element, Frame};
use crate::{CodecError, Result, Token, Value};

/// Wraps a [`MsgPackEncoder`] and checks that every container receives
/// exactly the number of elements its header declared.
///
/// Every `write_*` returns the bytes written. `Ok(0)` means the sink declined
/// and neither the output nor the nesting state changed.
///
/// ```
/// use wirepack::msgpack::MsgPackWriter;
/// use wirepack::CodecError;
///
/// let mut writer = MsgPackWriter::new(Vec::new());
/// writer.array_begin(Some(1)).unwrap();
/// writer.write_null().unwrap();
/// assert_eq!(writer.write_null(), Err(CodecError::TooManyElements));
/// writer.array_end().unwrap();
/// assert_eq!(writer.into_inner(), [0x91, 0xc0]);
/// ```
pub struct MsgPackWriter<S> {
    encoder: MsgPackEncoder<S>,
    stack: Vec<Frame>,
}

impl<S: Sink> MsgPackWriter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            encoder: MsgPackEncoder::new(sink),
            stack: Vec::new(),
        }
    }

    /// Number of open containers.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn encoder(&self) -> &MsgPackEncoder<S> {
        &self.encoder
    }

    pub fn into_inner(self) -> S {
        self.encoder.into_inner()
    }

    /// Runs `put` as one element of the innermost container.
    fn write_with(&mut self, put: impl FnOnce(&mut MsgPackEncoder<S>) -> usize) -> Result<usize> {
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

    pub fn write_u64(&mut self, uint: u64) -> Result<usize> {
        self.write_with(|e| e.put_u64(uint))
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

    pub fn write_extension(&mut self, kind: i8, data: &[u8]) -> Result<usize> {
        self.write_with(|e| e.put_extension(kind, data))
    }

    /// Writes a complete value tree as one element.
    pub fn write_value(&mut self, value: &Value) -> Result<usize> {
        let encoder = &mut self.encoder;
        write_element(&mut self.stack, || encoder.put_value(value))
    }

    /// Opens an array of `count` elements. MessagePack headers carry the
    /// count, so `None` fails with [`CodecError::MissingCount`].
    pub fn array_begin(&mut self, count: Option<usize>) -> Result<usize> {
        let count = count.ok_or(CodecError::MissingCount)?;
        self.open(Frame::array(Some(count)), |e| e.put_array_begin(count))
    }

    /// Opens a map of `count` key-value pairs.
    pub fn map_begin(&mut self, count: Option<usize>) -> Result<usize> {
        let count = count.ok_or(CodecError::MissingCount)?;
        let frame = Frame::map(Some(count)).ok_or(CodecError::Overflow)?;
        self.open(frame, |e| e.put_map_begin(count))
    }

    fn open(
        &mut self,
        frame: Frame,
        put: impl FnOnce(&mut MsgPackEncoder<S>) -> usize,
    ) -> Result<usize> {
        let written = self.write_with(put)?;
        if written > 0 {
            self.stack.push(frame);
        }
        Ok(written)
    }

    /// Closes the innermost array. Writes nothing.
    pub fn array_end(&mut self) -> Result<()> {
        self.close(Token::ArrayEnd)
    }

    /// Closes the innermost map. Writes nothing.
    pub fn map_end(&mut self) -> Result<()> {
        self.close(Token::MapEnd)
    }

    fn close(&mut self, end: Token) -> Result<()> {
        match self.stack.last() {
            Some(frame) if frame.end_token() == end => frame.check_close()?,
            _ => {
                debug!(?end, depth = self.stack.len(), "unbalanced container end");
                return Err(CodecError::UnbalancedEnd(end));
            }
        }
        self.stack.pop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirepack_buffers::FixedWriter;

    #[test]
    fn map_needs_every_value() {
        let mut writer = MsgPackWriter::new(Vec::new());
        writer.map_begin(Some(1)).unwrap();
        writer.write_str("k").unwrap();
        assert_eq!(writer.map_end(), Err(CodecError::TooFewElements(1)));
        writer.write_i64(1).unwrap();
        writer.map_end().unwrap();
        assert_eq!(writer.depth(), 0);
        assert_eq!(writer.into_inner(), [0x81, 0xa1, b'k', 0x01]);
    }

    #[test]
    fn end_must_match_open_kind() {
        let mut writer = MsgPackWriter::new(Vec::new());
        assert_eq!(
            writer.array_end(),
            Err(CodecError::UnbalancedEnd(Token::ArrayEnd))
        );
        writer.array_begin(Some(0)).unwrap();
        assert_eq!(writer.map_end(), Err(CodecError::UnbalancedEnd(Token::MapEnd)));
        writer.array_end().unwrap();
    }

    #[test]
    fn count_is_required() {
        let mut writer = MsgPackWriter::new(Vec::new());
        assert_eq!(writer.array_begin(None), Err(CodecError::MissingCount));
        assert_eq!(writer.depth(), 0);
    }

    #[test]
    fn declined_write_keeps_state() {
        let mut buf = [0u8; 2];
        let mut writer = MsgPackWriter::new(FixedWriter::new(&mut buf));
        writer.array_begin(Some(1)).unwrap();
        assert_eq!(writer.write_str("too long"), Ok(0));
        assert_eq!(writer.array_end(), Err(CodecError::TooFewElements(1)));
        assert_eq!(writer.write_bool(true), Ok(1));
        writer.array_end().unwrap();
        assert_eq!(writer.into_inner().as_slice(), [0x91, 0xc3]);
    }
}
