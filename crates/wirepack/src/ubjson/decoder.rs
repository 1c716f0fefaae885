//! `UbjsonDecoder` — pull tokenizer over a UBJSON buffer.

use tracing::debug;
use wirepack_buffers::{be_int, be_uint, ByteRange};

use super::constants::*;
use crate::current::{Current, Scan};
use crate::read::TokenReader;
use crate::{CodecError, DecodeConfig, Result, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Array,
    Object { expect_key: bool },
}

/// Tokenizes a UBJSON buffer.
///
/// UBJSON object keys carry no `S` marker, so the decoder keeps a small
/// scope stack to know when a key is due; keys are reported as `String`
/// tokens (see [`is_key`](Self::is_key)). End markers are checked against
/// that stack and `N` no-ops are skipped.
///
/// ```
/// use wirepack::ubjson::UbjsonDecoder;
/// use wirepack::Token;
///
/// let mut decoder = UbjsonDecoder::new(b"{i\x01aT}");
/// assert_eq!(decoder.token(), Token::ObjectBegin);
/// assert_eq!(decoder.next(), Token::String);
/// assert!(decoder.is_key());
/// assert_eq!(decoder.get_str().unwrap(), "a");
/// assert_eq!(decoder.next(), Token::Boolean);
/// assert_eq!(decoder.next(), Token::ObjectEnd);
/// assert_eq!(decoder.next(), Token::Eof);
/// ```
#[derive(Debug, Clone)]
pub struct UbjsonDecoder<'a> {
    input: ByteRange<'a>,
    current: Current<'a>,
    key: bool,
    scopes: Vec<Scope>,
    fault: Option<CodecError>,
    config: DecodeConfig,
}

impl<'a> UbjsonDecoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, DecodeConfig::default())
    }

    pub fn with_config(input: &'a [u8], config: DecodeConfig) -> Self {
        let mut decoder = Self {
            input: ByteRange::new(input),
            current: Current::EOF,
            key: false,
            scopes: Vec::new(),
            fault: None,
            config,
        };
        decoder.load();
        decoder
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.current.token
    }

    /// True when the current `String` token is an object key.
    #[inline]
    pub fn is_key(&self) -> bool {
        self.key
    }

    /// Number of open containers, including one whose begin or end marker is
    /// current.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn next(&mut self) -> Token {
        let token = self.current.token;
        if token.is_terminal() {
            return token;
        }
        self.input.advance(self.current.width);
        if token.is_end() {
            self.scopes.pop();
            self.value_done();
        } else if self.key {
            if let Some(Scope::Object { expect_key }) = self.scopes.last_mut() {
                *expect_key = false;
            }
        } else if !token.is_begin() {
            self.value_done();
        }
        self.load();
        self.current.token
    }

    fn value_done(&mut self) {
        if let Some(Scope::Object { expect_key }) = self.scopes.last_mut() {
            *expect_key = true;
        }
    }

    fn load(&mut self) {
        while self.input.peek() == Some(NOOP) {
            self.input.advance(1);
        }
        self.key = matches!(self.scopes.last(), Some(Scope::Object { expect_key: true }));
        let scanned = if self.key {
            scan_key(&self.input)
        } else {
            scan(&self.input)
        };
        let checked = scanned.and_then(|current| {
            self.enter(current.token)?;
            Ok(current)
        });
        match checked {
            Ok(current) => {
                self.key &= current.token == Token::String;
                self.current = current;
            }
            Err(err) => {
                debug!(offset = self.input.offset(), %err, "ubjson decoder failed");
                self.fault = Some(err);
                self.key = false;
                self.current = Current::ERROR;
            }
        }
    }

    /// Opens scopes and matches end markers against them.
    fn enter(&mut self, token: Token) -> Result<()> {
        match token {
            Token::ArrayBegin | Token::ObjectBegin => {
                if self.scopes.len() >= self.config.max_depth {
                    return Err(CodecError::DepthExceeded(self.config.max_depth));
                }
                self.scopes.push(match token {
                    Token::ArrayBegin => Scope::Array,
                    _ => Scope::Object { expect_key: true },
                });
                Ok(())
            }
            Token::ArrayEnd => match self.scopes.last() {
                Some(Scope::Array) => Ok(()),
                _ => Err(CodecError::UnbalancedEnd(token)),
            },
            Token::ObjectEnd => match self.scopes.last() {
                Some(Scope::Object { expect_key: true }) => Ok(()),
                Some(Scope::Object { expect_key: false }) => Err(CodecError::TooFewElements(1)),
                _ => Err(CodecError::UnbalancedEnd(token)),
            },
            _ => Ok(()),
        }
    }

    pub fn offset(&self) -> usize {
        self.input.offset()
    }

    pub fn last_error(&self) -> Option<&CodecError> {
        self.fault.as_ref()
    }

    pub fn get_bool(&self) -> Result<bool> {
        self.current.get_bool(TRUE)
    }

    pub fn get_i64(&self) -> Result<i64> {
        self.current.get_i64()
    }

    pub fn get_u64(&self) -> Result<u64> {
        self.current.get_u64()
    }

    pub fn get_f32(&self) -> Result<f32> {
        self.current.get_f32()
    }

    pub fn get_f64(&self) -> Result<f64> {
        self.current.get_f64()
    }

    pub fn get_str(&self) -> Result<&'a str> {
        self.current.get_str()
    }

    pub fn get_string(&self) -> Result<String> {
        self.get_str().map(str::to_owned)
    }

    pub fn get_bytes(&self) -> Result<&'a [u8]> {
        self.current.get_bytes()
    }

    pub fn get_binary(&self) -> Result<Vec<u8>> {
        self.get_bytes().map(<[u8]>::to_vec)
    }
}

fn scan<'a>(input: &ByteRange<'a>) -> Scan<'a> {
    let Some(tag) = input.peek() else {
        return Ok(Current::EOF);
    };
    let current = match tag {
        NULL => Current::inline(input, Token::Null, tag),
        TRUE | FALSE => Current::inline(input, Token::Boolean, tag),
        INT8 => Current::fixed(input, Token::SignedInt8, tag, 1),
        UINT8 => Current::fixed(input, Token::UnsignedInt8, tag, 1),
        INT16 => Current::fixed(input, Token::SignedInt16, tag, 2),
        INT32 => Current::fixed(input, Token::SignedInt32, tag, 4),
        INT64 => Current::fixed(input, Token::SignedInt64, tag, 8),
        FLOAT32 => Current::fixed(input, Token::Float32, tag, 4),
        FLOAT64 => Current::fixed(input, Token::Float64, tag, 8),
        CHAR => Current::fixed(input, Token::String, tag, 1),
        STRING => sized(input, Token::String, tag, 1)?,
        ARRAY_BEGIN => match input.peek_at(1) {
            Some(TYPE) => match input.head(BINARY_HEADER.len()) {
                None => Current::EOF,
                Some(head) if head == BINARY_HEADER => {
                    sized(input, Token::Binary, tag, BINARY_HEADER.len())?
                }
                Some(_) => return Err(invalid(input, TYPE, 1)),
            },
            Some(COUNT) => return Err(invalid(input, COUNT, 1)),
            _ => Current::inline(input, Token::ArrayBegin, tag),
        },
        OBJECT_BEGIN => match input.peek_at(1) {
            Some(marker @ (TYPE | COUNT)) => return Err(invalid(input, marker, 1)),
            _ => Current::inline(input, Token::ObjectBegin, tag),
        },
        ARRAY_END => Current::inline(input, Token::ArrayEnd, tag),
        OBJECT_END => Current::inline(input, Token::ObjectEnd, tag),
        _ => return Err(invalid(input, tag, 0)),
    };
    Ok(current)
}

/// Object key position: a length without the `S` marker, or the object end.
fn scan_key<'a>(input: &ByteRange<'a>) -> Scan<'a> {
    match input.peek() {
        None => Ok(Current::EOF),
        Some(OBJECT_END) => Ok(Current::inline(input, Token::ObjectEnd, OBJECT_END)),
        Some(tag) => sized(input, Token::String, tag, 0),
    }
}

/// A payload preceded by `skip` bytes and a nested integer length.
fn sized<'a>(input: &ByteRange<'a>, token: Token, tag: u8, skip: usize) -> Scan<'a> {
    Ok(match length(input, skip)? {
        Some((width, len)) => Current::sized(input, token, tag, skip + width, len),
        None => Current::EOF,
    })
}

/// Reads a marker-prefixed integer length at `skip`. Returns the width of
/// marker plus value and the length, or `None` when the input is short.
fn length(input: &ByteRange<'_>, skip: usize) -> Result<Option<(usize, usize)>> {
    let Some(marker) = input.peek_at(skip) else {
        return Ok(None);
    };
    let width = match marker {
        INT8 | UINT8 => 1,
        INT16 => 2,
        INT32 => 4,
        INT64 => 8,
        _ => return Err(invalid(input, marker, skip)),
    };
    let Some(bytes) = input.window(skip + 1, width) else {
        return Ok(None);
    };
    let len = if marker == UINT8 {
        be_uint(bytes) as i64
    } else {
        be_int(bytes)
    };
    if len < 0 {
        return Err(CodecError::NegativeLength(input.offset() + skip));
    }
    Ok(usize::try_from(len).ok().map(|len| (1 + width, len)))
}

fn invalid(input: &ByteRange<'_>, tag: u8, skip: usize) -> CodecError {
    CodecError::InvalidTag {
        tag,
        offset: input.offset() + skip,
    }
}

impl TokenReader for UbjsonDecoder<'_> {
    fn token(&self) -> Token {
        self.current.token
    }

    fn advance(&mut self) -> bool {
        !self.next().is_terminal()
    }

    fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn offset(&self) -> usize {
        self.input.offset()
    }

    fn last_error(&self) -> Option<CodecError> {
        self.fault.clone()
    }

    fn get_bool(&self) -> Result<bool> {
        UbjsonDecoder::get_bool(self)
    }

    fn get_i64(&self) -> Result<i64> {
        UbjsonDecoder::get_i64(self)
    }

    fn get_u64(&self) -> Result<u64> {
        UbjsonDecoder::get_u64(self)
    }

    fn get_f64(&self) -> Result<f64> {
        UbjsonDecoder::get_f64(self)
    }

    fn get_string(&self) -> Result<String> {
        UbjsonDecoder::get_string(self)
    }

    fn get_binary(&self) -> Result<Vec<u8>> {
        UbjsonDecoder::get_binary(self)
    }
}
