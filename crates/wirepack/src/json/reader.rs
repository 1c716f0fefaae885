//! `JsonReader` — grammar-checked nested traversal of JSON text.

use tracing::debug;

use super::JsonDecoder;
use crate::frame::Frame;
use crate::read::TokenReader;
use crate::{CodecError, DecodeConfig, Result, Token};

/// Where an open container is in its own grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Just opened.
    Start,
    /// After a complete element or member.
    Item,
    /// After `,`.
    Comma,
    /// After an object key.
    Key,
    /// After `:`.
    Colon,
}

/// Walks JSON text as a nested token stream without separators.
///
/// `,` and `:` are consumed and validated internally: array elements must be
/// comma separated, object members must be `String` `:` value, and trailing
/// commas, missing separators or a second top-level value yield `Error`.
/// Object keys are reported as `String` tokens (see [`is_key`](Self::is_key)).
///
/// ```
/// use wirepack::json::JsonReader;
/// use wirepack::Token;
///
/// let mut reader = JsonReader::new(b"[1, [true]]");
/// let mut seen = vec![reader.token()];
/// while reader.next() {
///     seen.push(reader.token());
/// }
/// assert_eq!(
///     seen,
///     [
///         Token::ArrayBegin,
///         Token::SignedInt64,
///         Token::ArrayBegin,
///         Token::Boolean,
///         Token::ArrayEnd,
///         Token::ArrayEnd,
///     ]
/// );
/// assert_eq!(reader.token(), Token::Eof);
/// ```
pub struct JsonReader<'a> {
    decoder: JsonDecoder<'a>,
    stack: Vec<(Frame, Phase)>,
    current: Token,
    key: bool,
    top_done: bool,
    fault: Option<CodecError>,
    config: DecodeConfig,
}

impl<'a> JsonReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, DecodeConfig::default())
    }

    pub fn with_config(input: &'a [u8], config: DecodeConfig) -> Self {
        let mut reader = Self {
            decoder: JsonDecoder::new(input),
            stack: Vec::new(),
            current: Token::Eof,
            key: false,
            top_done: false,
            fault: None,
            config,
        };
        reader.settle();
        reader
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.current
    }

    /// True when the current `String` token is an object key.
    #[inline]
    pub fn is_key(&self) -> bool {
        self.key
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn next(&mut self) -> bool {
        if self.current.is_terminal() {
            return false;
        }
        if self.current.is_end() {
            self.stack.pop();
        }
        if self.stack.is_empty() && !self.current.is_begin() {
            self.top_done = true;
        }
        self.decoder.next();
        self.settle();
        !self.current.is_terminal()
    }

    /// Skips separators and makes the next structural token current.
    fn settle(&mut self) {
        self.key = false;
        loop {
            let token = self.decoder.token();
            let checked = match token {
                Token::Error => Err(self
                    .decoder
                    .last_error()
                    .cloned()
                    .unwrap_or(CodecError::UnexpectedToken(Token::Error))),
                Token::Eof => Ok(()),
                Token::ValueSeparator => self.separator(Phase::Item, Phase::Comma, token),
                Token::NameSeparator => self.separator(Phase::Key, Phase::Colon, token),
                t if t.is_end() => self.close(t),
                t => self.element(t),
            };
            if let Err(err) = checked {
                self.fail(err);
                return;
            }
            if !matches!(token, Token::ValueSeparator | Token::NameSeparator) {
                self.current = token;
                return;
            }
            self.decoder.next();
        }
    }

    fn separator(&mut self, from: Phase, to: Phase, token: Token) -> Result<()> {
        match self.stack.last_mut() {
            Some((frame, phase)) if *phase == from => {
                if to == Phase::Colon && *frame != Frame::Object {
                    return Err(CodecError::UnexpectedToken(token));
                }
                *phase = to;
                Ok(())
            }
            _ => Err(CodecError::UnexpectedToken(token)),
        }
    }

    fn close(&mut self, end: Token) -> Result<()> {
        match self.stack.last() {
            Some((frame, Phase::Start | Phase::Item)) if frame.end_token() == end => Ok(()),
            Some((frame, _)) if frame.end_token() == end => Err(CodecError::UnexpectedToken(end)),
            _ => Err(CodecError::UnbalancedEnd(end)),
        }
    }

    /// A scalar, key or container begin at the current position.
    fn element(&mut self, token: Token) -> Result<()> {
        if self.top_done {
            return Err(CodecError::TrailingData(self.decoder.offset()));
        }
        if let Some((frame, phase)) = self.stack.last_mut() {
            match (*frame, *phase) {
                (Frame::Object, Phase::Start | Phase::Comma) if token == Token::String => {
                    *phase = Phase::Key;
                    self.key = true;
                    return Ok(());
                }
                (Frame::Object, Phase::Colon) | (Frame::Array { .. }, Phase::Start | Phase::Comma) => {
                    *phase = Phase::Item;
                }
                _ => return Err(CodecError::UnexpectedToken(token)),
            }
        }
        if token.is_begin() {
            if self.stack.len() >= self.config.max_depth {
                return Err(CodecError::DepthExceeded(self.config.max_depth));
            }
            let frame = match token {
                Token::ObjectBegin => Frame::Object,
                _ => Frame::array(None),
            };
            self.stack.push((frame, Phase::Start));
        }
        Ok(())
    }

    fn fail(&mut self, err: CodecError) {
        debug!(offset = self.decoder.offset(), %err, "json reader failed");
        self.fault = Some(err);
        self.key = false;
        self.current = Token::Error;
    }

    pub fn offset(&self) -> usize {
        self.decoder.offset()
    }

    pub fn last_error(&self) -> Option<&CodecError> {
        self.fault.as_ref()
    }

    fn wire(&self) -> Result<&JsonDecoder<'a>> {
        if self.current.is_terminal() {
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

    pub fn get_f64(&self) -> Result<f64> {
        self.wire()?.get_f64()
    }

    pub fn get_raw(&self) -> Result<&'a [u8]> {
        self.wire()?.get_raw()
    }

    pub fn get_string(&self) -> Result<String> {
        self.wire()?.get_string()
    }

    pub fn get_binary(&self) -> Result<Vec<u8>> {
        self.wire()?.get_binary()
    }
}

impl TokenReader for JsonReader<'_> {
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
        JsonReader::get_bool(self)
    }

    fn get_i64(&self) -> Result<i64> {
        JsonReader::get_i64(self)
    }

    fn get_u64(&self) -> Result<u64> {
        JsonReader::get_u64(self)
    }

    fn get_f64(&self) -> Result<f64> {
        JsonReader::get_f64(self)
    }

    fn get_string(&self) -> Result<String> {
        JsonReader::get_string(self)
    }

    fn get_binary(&self) -> Result<Vec<u8>> {
        JsonReader::get_binary(self)
    }
}
