//! `TransEncDecoder` — pull tokenizer over a TransEnc buffer.

use tracing::debug;
use wirepack_buffers::ByteRange;

use super::constants::*;
use crate::current::{signed_len, Current, Scan};
use crate::{CodecError, Result, Token};

/// Tokenizes a complete TransEnc buffer one item at a time.
///
/// Container begin and end tags are reported as they appear on the wire; the
/// decoder does not check that they balance, see
/// [`TransEncReader`](super::TransEncReader).
///
/// ```
/// use wirepack::transenc::TransEncDecoder;
/// use wirepack::Token;
///
/// let mut decoder = TransEncDecoder::new(&[0xa2, 0x05, 0xa3]);
/// assert_eq!(decoder.token(), Token::ArrayBegin);
/// assert_eq!(decoder.next(), Token::SignedInt8);
/// assert_eq!(decoder.get_i64().unwrap(), 5);
/// assert_eq!(decoder.next(), Token::ArrayEnd);
/// assert_eq!(decoder.next(), Token::Eof);
/// ```
#[derive(Debug, Clone)]
pub struct TransEncDecoder<'a> {
    input: ByteRange<'a>,
    current: Current<'a>,
    fault: Option<CodecError>,
}

impl<'a> TransEncDecoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let mut decoder = Self {
            input: ByteRange::new(input),
            current: Current::EOF,
            fault: None,
        };
        decoder.load();
        decoder
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.current.token
    }

    /// Consumes the current token and decodes the next one. Stays put once
    /// `Eof` or `Error` is reached.
    pub fn next(&mut self) -> Token {
        if !self.current.token.is_terminal() {
            self.input.advance(self.current.width);
            self.load();
        }
        self.current.token
    }

    fn load(&mut self) {
        self.current = match scan(&self.input) {
            Ok(current) => current,
            Err(err) => {
                debug!(offset = self.input.offset(), %err, "transenc decoder failed");
                self.fault = Some(err);
                Current::ERROR
            }
        };
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

    /// Non-negative integers only; TransEnc has no unsigned tags.
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
        0x00..=SMALL_INT_MAX | SMALL_INT_MIN..=0xff => {
            Current::inline(input, Token::SignedInt8, tag)
        }
        NULL => Current::inline(input, Token::Null, tag),
        FALSE | TRUE => Current::inline(input, Token::Boolean, tag),
        INT8 => Current::fixed(input, Token::SignedInt8, tag, 1),
        INT16 => Current::fixed(input, Token::SignedInt16, tag, 2),
        INT32 => Current::fixed(input, Token::SignedInt32, tag, 4),
        INT64 => Current::fixed(input, Token::SignedInt64, tag, 8),
        FLOAT32 => Current::fixed(input, Token::Float32, tag, 4),
        FLOAT64 => Current::fixed(input, Token::Float64, tag, 8),
        STR8..=STR64 => prefixed(input, Token::String, tag, 1usize << (tag - STR8))?,
        BIN8..=BIN64 => prefixed(input, Token::Binary, tag, 1usize << (tag - BIN8))?,
        RECORD_BEGIN => Current::inline(input, Token::RecordBegin, tag),
        RECORD_END => Current::inline(input, Token::RecordEnd, tag),
        ARRAY_BEGIN => Current::inline(input, Token::ArrayBegin, tag),
        ARRAY_END => Current::inline(input, Token::ArrayEnd, tag),
        MAP_BEGIN => Current::inline(input, Token::MapBegin, tag),
        MAP_END => Current::inline(input, Token::MapEnd, tag),
        _ => {
            return Err(CodecError::InvalidTag {
                tag,
                offset: input.offset(),
            })
        }
    };
    Ok(current)
}

/// A payload whose signed length occupies `width` bytes after the tag.
fn prefixed<'a>(input: &ByteRange<'a>, token: Token, tag: u8, width: usize) -> Scan<'a> {
    Ok(match signed_len(input, 1, width)? {
        Some(len) => Current::sized(input, token, tag, 1 + width, len),
        None => Current::EOF,
    })
}
