//! Current-token state shared by the binary decoders.

use wirepack_buffers::{be_int, be_uint, ByteRange};

use crate::{CodecError, Result, Token};

/// The token under a binary decoder's cursor.
///
/// `payload` borrows the undecoded bytes of the value. For kinds whose value
/// lives in the tag byte itself (fixints, booleans) it is the tag byte.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Current<'a> {
    pub token: Token,
    pub tag: u8,
    /// Full wire width: tag, length prefix and payload.
    pub width: usize,
    pub payload: &'a [u8],
}

pub(crate) type Scan<'a> = std::result::Result<Current<'a>, CodecError>;

impl<'a> Current<'a> {
    pub const EOF: Current<'static> = Current {
        token: Token::Eof,
        tag: 0,
        width: 0,
        payload: &[],
    };

    pub const ERROR: Current<'static> = Current {
        token: Token::Error,
        tag: 0,
        width: 0,
        payload: &[],
    };

    /// A one-byte token whose value is the tag byte.
    pub fn inline(input: &ByteRange<'a>, token: Token, tag: u8) -> Self {
        Current {
            token,
            tag,
            width: 1,
            payload: input.head(1).unwrap_or_default(),
        }
    }

    /// A token with a `width`-byte payload after a one-byte tag.
    pub fn fixed(input: &ByteRange<'a>, token: Token, tag: u8, width: usize) -> Self {
        match input.window(1, width) {
            Some(payload) => Current {
                token,
                tag,
                width: 1 + width,
                payload,
            },
            None => Current::EOF,
        }
    }

    /// A token with a `len`-byte payload following a `header`-byte prefix.
    pub fn sized(input: &ByteRange<'a>, token: Token, tag: u8, header: usize, len: usize) -> Self {
        match input.window(header, len) {
            Some(payload) => Current {
                token,
                tag,
                width: header + len,
                payload,
            },
            None => Current::EOF,
        }
    }

    fn mismatch<T>(&self, expected: &'static str) -> Result<T> {
        Err(CodecError::IncompatibleType {
            expected,
            found: self.token,
        })
    }

    pub fn get_i64(&self) -> Result<i64> {
        match self.token {
            t if t.is_signed() => Ok(be_int(self.payload)),
            t if t.is_unsigned() => {
                i64::try_from(be_uint(self.payload)).map_err(|_| CodecError::Overflow)
            }
            _ => self.mismatch("integer"),
        }
    }

    pub fn get_u64(&self) -> Result<u64> {
        match self.token {
            t if t.is_unsigned() => Ok(be_uint(self.payload)),
            t if t.is_signed() => {
                u64::try_from(be_int(self.payload)).map_err(|_| CodecError::Overflow)
            }
            _ => self.mismatch("integer"),
        }
    }

    pub fn get_f32(&self) -> Result<f32> {
        match self.token {
            Token::Float32 => Ok(f32::from_bits(be_uint(self.payload) as u32)),
            _ => self.mismatch("float32"),
        }
    }

    pub fn get_f64(&self) -> Result<f64> {
        match self.token {
            Token::Float32 => Ok(f64::from(f32::from_bits(be_uint(self.payload) as u32))),
            Token::Float64 => Ok(f64::from_bits(be_uint(self.payload))),
            t if t.is_signed() => Ok(be_int(self.payload) as f64),
            t if t.is_unsigned() => Ok(be_uint(self.payload) as f64),
            _ => self.mismatch("number"),
        }
    }

    pub fn get_str(&self) -> Result<&'a str> {
        match self.token {
            Token::String => std::str::from_utf8(self.payload).map_err(|_| CodecError::InvalidUtf8),
            _ => self.mismatch("string"),
        }
    }

    pub fn get_bytes(&self) -> Result<&'a [u8]> {
        match self.token {
            Token::String | Token::Binary => Ok(self.payload),
            _ => self.mismatch("binary"),
        }
    }

    pub fn get_bool(&self, true_tag: u8) -> Result<bool> {
        match self.token {
            Token::Boolean => Ok(self.tag == true_tag),
            _ => self.mismatch("boolean"),
        }
    }
}

/// Reads a big-endian length of `width` bytes located `skip` bytes past the
/// cursor. `Ok(None)` when the input is too short; lengths that do not fit
/// `usize` are reported as incomplete since no buffer can hold them.
pub(crate) fn unsigned_len(input: &ByteRange<'_>, skip: usize, width: usize) -> Option<usize> {
    let bytes = input.window(skip, width)?;
    usize::try_from(be_uint(bytes)).ok()
}

/// Like [`unsigned_len`] for two's complement lengths. Negative lengths fail
/// with [`CodecError::NegativeLength`].
pub(crate) fn signed_len(
    input: &ByteRange<'_>,
    skip: usize,
    width: usize,
) -> Result<Option<usize>> {
    let Some(bytes) = input.window(skip, width) else {
        return Ok(None);
    };
    let len = be_int(bytes);
    if len < 0 {
        return Err(CodecError::NegativeLength(input.offset()));
    }
    Ok(usize::try_from(len).ok())
}
