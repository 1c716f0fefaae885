//! `MsgPackDecoder` — pull tokenizer over a MessagePack buffer.

use tracing::debug;
use wirepack_buffers::{be_uint, ByteRange};

use super::constants::*;
use crate::current::{unsigned_len, Current, Scan};
use crate::{CodecError, Result, Token};

/// Tokenizes a complete MessagePack buffer one item at a time.
///
/// Containers are reported by their header only (`ArrayBegin` / `MapBegin`
/// with [`get_count`](Self::get_count)); the wire has no end markers, see
/// [`MsgPackReader`](super::MsgPackReader) for a nested view.
///
/// ```
/// use wirepack::msgpack::MsgPackDecoder;
/// use wirepack::Token;
///
/// let mut decoder = MsgPackDecoder::new(&[0xa5, b'a', b'l', b'p', b'h', b'a']);
/// assert_eq!(decoder.token(), Token::String);
/// assert_eq!(decoder.get_string().unwrap(), "alpha");
/// assert_eq!(decoder.next(), Token::Eof);
/// ```
#[derive(Debug, Clone)]
pub struct MsgPackDecoder<'a> {
    input: ByteRange<'a>,
    current: Current<'a>,
    fault: Option<CodecError>,
}

impl<'a> MsgPackDecoder<'a> {
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
                debug!(offset = self.input.offset(), %err, "msgpack decoder failed");
                self.fault = Some(err);
                Current::ERROR
            }
        };
    }

    /// Byte offset of the current token.
    pub fn offset(&self) -> usize {
        self.input.offset()
    }

    /// The complete wire bytes of the current token.
    pub fn literal(&self) -> &'a [u8] {
        self.input.head(self.current.width).unwrap_or_default()
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

    /// Borrows the string payload.
    pub fn get_str(&self) -> Result<&'a str> {
        self.current.get_str()
    }

    pub fn get_string(&self) -> Result<String> {
        self.get_str().map(str::to_owned)
    }

    /// Borrows the binary (or raw string) payload.
    pub fn get_bytes(&self) -> Result<&'a [u8]> {
        self.current.get_bytes()
    }

    pub fn get_binary(&self) -> Result<Vec<u8>> {
        self.get_bytes().map(<[u8]>::to_vec)
    }

    /// Extension type and payload.
    pub fn get_extension(&self) -> Result<(i8, Vec<u8>)> {
        match (self.current.token, self.current.payload.split_first()) {
            (Token::Extension, Some((kind, data))) => Ok((*kind as i8, data.to_vec())),
            (found, _) => Err(CodecError::IncompatibleType {
                expected: "extension",
                found,
            }),
        }
    }

    /// Number of elements (arrays) or key-value pairs (maps) declared by the
    /// current container header.
    pub fn get_count(&self) -> Result<usize> {
        let current = &self.current;
        match current.token {
            Token::ArrayBegin | Token::MapBegin => match current.tag {
                FIXMAP..=0x9f => Ok(usize::from(current.tag & 0x0f)),
                _ => usize::try_from(be_uint(current.payload)).map_err(|_| CodecError::Overflow),
            },
            found => Err(CodecError::IncompatibleType {
                expected: "container",
                found,
            }),
        }
    }
}

fn scan<'a>(input: &ByteRange<'a>) -> Scan<'a> {
    let Some(tag) = input.peek() else {
        return Ok(Current::EOF);
    };
    let current = match tag {
        0x00..=POSITIVE_FIXINT_MAX | NEGATIVE_FIXINT_MIN..=0xff => {
            Current::inline(input, Token::SignedInt8, tag)
        }
        FIXMAP..=0x8f => Current::inline(input, Token::MapBegin, tag),
        FIXARRAY..=0x9f => Current::inline(input, Token::ArrayBegin, tag),
        FIXSTR..=0xbf => Current::sized(input, Token::String, tag, 1, usize::from(tag & 0x1f)),
        NIL => Current::inline(input, Token::Null, tag),
        FALSE | TRUE => Current::inline(input, Token::Boolean, tag),
        BIN8 => prefixed(input, Token::Binary, tag, 1, 0),
        BIN16 => prefixed(input, Token::Binary, tag, 2, 0),
        BIN32 => prefixed(input, Token::Binary, tag, 4, 0),
        EXT8 => prefixed(input, Token::Extension, tag, 1, 1),
        EXT16 => prefixed(input, Token::Extension, tag, 2, 1),
        EXT32 => prefixed(input, Token::Extension, tag, 4, 1),
        FLOAT32 => Current::fixed(input, Token::Float32, tag, 4),
        FLOAT64 => Current::fixed(input, Token::Float64, tag, 8),
        UINT8 => Current::fixed(input, Token::UnsignedInt8, tag, 1),
        UINT16 => Current::fixed(input, Token::UnsignedInt16, tag, 2),
        UINT32 => Current::fixed(input, Token::UnsignedInt32, tag, 4),
        UINT64 => Current::fixed(input, Token::UnsignedInt64, tag, 8),
        INT8 => Current::fixed(input, Token::SignedInt8, tag, 1),
        INT16 => Current::fixed(input, Token::SignedInt16, tag, 2),
        INT32 => Current::fixed(input, Token::SignedInt32, tag, 4),
        INT64 => Current::fixed(input, Token::SignedInt64, tag, 8),
        // Type byte plus 1, 2, 4, 8 or 16 data bytes.
        FIXEXT1..=FIXEXT16 => {
            let len = 1usize << (tag - FIXEXT1);
            Current::sized(input, Token::Extension, tag, 1, len + 1)
        }
        STR8 => prefixed(input, Token::String, tag, 1, 0),
        STR16 => prefixed(input, Token::String, tag, 2, 0),
        STR32 => prefixed(input, Token::String, tag, 4, 0),
        ARRAY16 => Current::fixed(input, Token::ArrayBegin, tag, 2),
        ARRAY32 => Current::fixed(input, Token::ArrayBegin, tag, 4),
        MAP16 => Current::fixed(input, Token::MapBegin, tag, 2),
        MAP32 => Current::fixed(input, Token::MapBegin, tag, 4),
        UNUSED => {
            return Err(CodecError::InvalidTag {
                tag,
                offset: input.offset(),
            })
        }
    };
    Ok(current)
}

/// A payload whose length is given by a `width`-byte prefix after the tag.
/// `extra` bytes (the extension type) sit between the prefix and the data and
/// are counted into the payload.
fn prefixed<'a>(
    input: &ByteRange<'a>,
    token: Token,
    tag: u8,
    width: usize,
    extra: usize,
) -> Current<'a> {
    match unsigned_len(input, 1, width).and_then(|len| len.checked_add(extra)) {
        Some(len) => Current::sized(input, token, tag, 1 + width, len),
        None => Current::EOF,
    }
}
