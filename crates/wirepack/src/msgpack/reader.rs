//! `MsgPackReader` — nested traversal with synthesized container ends.

use tracing::debug;

use super::MsgPackDecoder;
use crate::frame::Frame;
use crate::read::TokenReader;
use crate::{CodecError, DecodeConfig, Result, Token};

/// Walks a MessagePack buffer as a uniformly nested token stream.
///
/// MessagePack containers are count-prefixed and have no end marker on the
/// wire. The reader tracks the remaining element count of every open
/// container and reports a synthetic `ArrayEnd` / `MapEnd` once it runs out.
///
/// ```
/// use wirepack::msgpack::MsgPackReader;
/// use wirepack::Token;
///
/// let mut reader = MsgPackReader::new(&[0x91, 0xc0]);
/// assert_eq!(reader.token(), Token::ArrayBegin);
/// assert!(reader.next());
/// assert_eq!(reader.token(), Token::Null);
/// assert!(reader.next());
/// assert_eq!(reader.token(), Token::ArrayEnd);
/// assert!(!reader.next());
/// assert_eq!(reader.token(), Token::Eof);
/// ```
pub struct MsgPackReader<'a> {
    decoder: MsgPackDecoder<'a>,
    stack: Vec<Frame>,
    current: Token,
    fault: Option<CodecError>,
    config: DecodeConfig,
}

impl<'a> MsgPackReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, DecodeConfig::default())
    }

    pub fn with_config(input: &'a [u8], config: DecodeConfig) -> Self {
        let mut reader = Self {
            decoder: MsgPackDecoder::new(input),
            stack: Vec::new(),
            current: Token::Eof,
            fault: None,
            config,
        };
        reader.enter();
        reader
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.current
    }

    /// Number of open containers. A container counts while its begin or end
    /// token is current.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Moves to the next token. Returns `false` once `Eof` or `Error` is
    /// current.
    pub fn next(&mut self) -> bool {
        match self.current {
            Token::Eof | Token::Error => return false,
            Token::ArrayEnd | Token::MapEnd => {
                self.stack.pop();
                self.consume_element();
            }
            Token::ArrayBegin | Token::MapBegin => {
                self.decoder.next();
                match self.stack.last() {
                    Some(frame) if frame.is_exhausted() => self.current = frame.end_token(),
                    _ => self.enter(),
                }
            }
            _ => {
                self.decoder.next();
                self.consume_element();
            }
        }
        !self.current.is_terminal()
    }

    /// Accounts for a finished element of the innermost container. The
    /// decoder is already positioned after it.
    fn consume_element(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            if let Err(err) = frame.consume() {
                self.fail(err);
                return;
            }
            if frame.is_exhausted() {
                self.current = frame.end_token();
                return;
            }
        }
        self.enter();
    }

    /// Makes the decoder's token current, opening a frame for containers.
    fn enter(&mut self) {
        let token = self.decoder.token();
        match token {
            Token::Error => {
                let err = self
                    .decoder
                    .last_error()
                    .cloned()
                    .unwrap_or(CodecError::UnexpectedToken(Token::Error));
                self.fail(err);
            }
            Token::ArrayBegin | Token::MapBegin => {
                if self.stack.len() >= self.config.max_depth {
                    self.fail(CodecError::DepthExceeded(self.config.max_depth));
                    return;
                }
                let frame = match self.decoder.get_count() {
                    Ok(count) if token == Token::ArrayBegin => Some(Frame::array(Some(count))),
                    Ok(count) => Frame::map(Some(count)),
                    Err(err) => {
                        self.fail(err);
                        return;
                    }
                };
                match frame {
                    Some(frame) => {
                        self.stack.push(frame);
                        self.current = token;
                    }
                    None => self.fail(CodecError::Overflow),
                }
            }
            _ => self.current = token,
        }
    }

    fn fail(&mut self, err: CodecError) {
        debug!(offset = self.decoder.offset(), %err, "msgpack reader failed");
        self.fault = Some(err);
        self.current = Token::Error;
    }

    pub fn offset(&self) -> usize {
        self.decoder.offset()
    }

    pub fn last_error(&self) -> Option<&CodecError> {
        self.fault.as_ref()
    }

    /// The decoder, positioned on the current token unless that token is a
    /// synthetic end.
    fn wire(&self) -> Result<&MsgPackDecoder<'a>> {
        if self.current.is_end() || self.current.is_terminal() {
            return Err(CodecError::IncompatibleType {
                expected: "value",
                found: self.current,
            });
        }
        Ok(&self.decoder)
    }

    pub fn get_bool(&self) -> Result<bool> {
        self.wire()?.get_bool()
    }

    pub fn get_i64(&self) -> Result<i64> {
        self.wire()?.get_i64()
    }

    pub fn get_u64(&self) -> Result<u64> {
        self.wire()?.get_u64()
    }

    pub fn get_f32(&self) -> Result<f32> {
        self.wire()?.get_f32()
    }

    pub fn get_f64(&self) -> Result<f64> {
        self.wire()?.get_f64()
    }

    pub fn get_str(&self) -> Result<&'a str> {
        self.wire()?.get_str()
    }

    pub fn get_string(&self) -> Result<String> {
        self.wire()?.get_string()
    }

    pub fn get_bytes(&self) -> Result<&'a [u8]> {
        self.wire()?.get_bytes()
    }

    pub fn get_binary(&self) -> Result<Vec<u8>> {
        self.wire()?.get_binary()
    }

    pub fn get_extension(&self) -> Result<(i8, Vec<u8>)> {
        self.wire()?.get_extension()
    }

    /// Declared element count of the container whose begin token is current.
    pub fn get_count(&self) -> Result<usize> {
        self.wire()?.get_count()
    }
}

impl TokenReader for MsgPackReader<'_> {
    fn token(&self) -> Token {
        self.current
    }

    fn advance(&mut self) -> bool {
        self.next()
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }

    fn offset(&self) -> usize {
        self.decoder.offset()
    }

    fn last_error(&self) -> Option<CodecError> {
        self.fault.clone()
    }

    fn get_bool(&self) -> Result<bool> {
        MsgPackReader::get_bool(self)
    }

    fn get_i64(&self) -> Result<i64> {
        MsgPackReader::get_i64(self)
    }

    fn get_u64(&self) -> Result<u64> {
        MsgPackReader::get_u64(self)
    }

    fn get_f64(&self) -> Result<f64> {
        MsgPackReader::get_f64(self)
    }

    fn get_string(&self) -> Result<String> {
        MsgPackReader::get_string(self)
    }

    fn get_binary(&self) -> Result<Vec<u8>> {
        MsgPackReader::get_binary(self)
    }

    fn get_extension(&self) -> Result<(i8, Vec<u8>)> {
        MsgPackReader::get_extension(self)
    }
}
