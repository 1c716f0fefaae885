//! `JsonDecoder` — pull tokenizer over JSON text.

use tracing::debug;
use wirepack_buffers::ByteRange;

use super::table::{self, class};
use crate::current::{Current, Scan};
use crate::value::from_data_uri;
use crate::{CodecError, Result, Token};

/// Tokenizes JSON text, separators included.
///
/// Whitespace is skipped. Integers are reported as `SignedInt64`, or
/// `UnsignedInt64` when they only fit `u64`; numbers with a fraction or
/// exponent, and integers beyond `u64`, as `Float64`. A string token's
/// payload is the raw text between the quotes.
///
/// Input that ends inside a literal (`tru`, `-`, `1e`, an open string) yields
/// `Eof`; input that cannot become valid JSON yields `Error`.
///
/// ```
/// use wirepack::json::JsonDecoder;
/// use wirepack::Token;
///
/// let mut decoder = JsonDecoder::new(br#" {"a": 1.5} "#);
/// assert_eq!(decoder.token(), Token::ObjectBegin);
/// assert_eq!(decoder.next(), Token::String);
/// assert_eq!(decoder.next(), Token::NameSeparator);
/// assert_eq!(decoder.next(), Token::Float64);
/// assert_eq!(decoder.get_f64().unwrap(), 1.5);
/// assert_eq!(decoder.next(), Token::ObjectEnd);
/// assert_eq!(decoder.next(), Token::Eof);
/// ```
#[derive(Debug, Clone)]
pub struct JsonDecoder<'a> {
    input: ByteRange<'a>,
    current: Current<'a>,
    fault: Option<CodecError>,
}

impl<'a> JsonDecoder<'a> {
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

    pub fn next(&mut self) -> Token {
        if !self.current.token.is_terminal() {
            self.input.advance(self.current.width);
            self.load();
        }
        self.current.token
    }

    fn load(&mut self) {
        while matches!(self.input.peek(), Some(byte) if class(byte) == table::WHITESPACE) {
            self.input.advance(1);
        }
        self.current = match scan(&self.input) {
            Ok(current) => current,
            Err(err) => {
                debug!(offset = self.input.offset(), %err, "json decoder failed");
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

    /// Source text of the current token, quotes included for strings.
    pub fn literal(&self) -> &'a [u8] {
        self.input.head(self.current.width).unwrap_or_default()
    }

    fn mismatch<T>(&self, expected: &'static str) -> Result<T> {
        Err(CodecError::IncompatibleType {
            expected,
            found: self.current.token,
        })
    }

    /// Number text of the current token.
    fn number(&self) -> Option<&'a str> {
        match self.current.token {
            Token::SignedInt64 | Token::UnsignedInt64 | Token::Float64 => {
                std::str::from_utf8(self.current.payload).ok()
            }
            _ => None,
        }
    }

    pub fn get_bool(&self) -> Result<bool> {
        self.current.get_bool(b't')
    }

    pub fn get_i64(&self) -> Result<i64> {
        match (self.current.token, self.number()) {
            (Token::SignedInt64, Some(text)) => text.parse().map_err(|_| CodecError::Overflow),
            (Token::UnsignedInt64, _) => Err(CodecError::Overflow),
            _ => self.mismatch("integer"),
        }
    }

    pub fn get_u64(&self) -> Result<u64> {
        match (self.current.token, self.number()) {
            (Token::SignedInt64 | Token::UnsignedInt64, Some(text)) => {
                text.parse().map_err(|_| CodecError::Overflow)
            }
            _ => self.mismatch("integer"),
        }
    }

    pub fn get_f64(&self) -> Result<f64> {
        match self.number() {
            Some(text) => text
                .parse()
                .map_err(|_| CodecError::InvalidLiteral(self.offset())),
            None => self.mismatch("number"),
        }
    }

    /// Raw string payload, escapes not yet resolved.
    pub fn get_raw(&self) -> Result<&'a [u8]> {
        match self.current.token {
            Token::String => Ok(self.current.payload),
            _ => self.mismatch("string"),
        }
    }

    /// Unescaped string value.
    pub fn get_string(&self) -> Result<String> {
        let raw = self.get_raw()?;
        if !raw.contains(&b'\\') {
            return std::str::from_utf8(raw)
                .map(str::to_owned)
                .map_err(|_| CodecError::InvalidUtf8);
        }
        serde_json::from_slice(self.literal()).map_err(|_| CodecError::InvalidLiteral(self.offset()))
    }

    /// Bytes of a `data:application/octet-stream;base64,` string.
    pub fn get_binary(&self) -> Result<Vec<u8>> {
        match from_data_uri(self.get_raw()?) {
            Some(bytes) => Ok(bytes),
            None => self.mismatch("binary"),
        }
    }
}

fn scan<'a>(input: &ByteRange<'a>) -> Scan<'a> {
    let Some(byte) = input.peek() else {
        return Ok(Current::EOF);
    };
    match class(byte) {
        table::QUOTE => string(input),
        table::NUMBER => number(input),
        table::KEYWORD => keyword(input, byte),
        table::STRUCTURAL => {
            let token = match byte {
                b'[' => Token::ArrayBegin,
                b']' => Token::ArrayEnd,
                b'{' => Token::ObjectBegin,
                b'}' => Token::ObjectEnd,
                b',' => Token::ValueSeparator,
                _ => Token::NameSeparator,
            };
            Ok(Current::inline(input, token, byte))
        }
        _ => Err(CodecError::InvalidTag {
            tag: byte,
            offset: input.offset(),
        }),
    }
}

fn string<'a>(input: &ByteRange<'a>) -> Scan<'a> {
    let text = input.as_slice();
    let mut x = 1;
    while let Some(&byte) = text.get(x) {
        match byte {
            b'"' => {
                return Ok(Current {
                    token: Token::String,
                    tag: b'"',
                    width: x + 1,
                    payload: &text[1..x],
                })
            }
            b'\\' => x += 2,
            0x00..=0x1f => return Err(CodecError::InvalidLiteral(input.offset() + x)),
            _ => x += 1,
        }
    }
    Ok(Current::EOF)
}

fn number<'a>(input: &ByteRange<'a>) -> Scan<'a> {
    let text = input.as_slice();
    let invalid = |x: usize| -> Scan<'a> { Err(CodecError::InvalidLiteral(input.offset() + x)) };
    let digits = |from: usize| {
        text[from..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut x = usize::from(text[0] == b'-');
    match text.get(x) {
        None => return Ok(Current::EOF),
        Some(b'0') => x += 1,
        Some(b'1'..=b'9') => x += digits(x),
        Some(_) => return invalid(x),
    }
    let mut float = false;
    if text.get(x) == Some(&b'.') {
        float = true;
        x += 1;
        match digits(x) {
            0 if x == text.len() => return Ok(Current::EOF),
            0 => return invalid(x),
            n => x += n,
        }
    }
    if matches!(text.get(x), Some(b'e' | b'E')) {
        float = true;
        x += 1;
        if matches!(text.get(x), Some(b'+' | b'-')) {
            x += 1;
        }
        match digits(x) {
            0 if x == text.len() => return Ok(Current::EOF),
            0 => return invalid(x),
            n => x += n,
        }
    }

    let literal = &text[..x];
    let token = if float {
        Token::Float64
    } else if parses::<i64>(literal) {
        Token::SignedInt64
    } else if parses::<u64>(literal) {
        Token::UnsignedInt64
    } else {
        Token::Float64
    };
    Ok(Current::sized(input, token, text[0], 0, x))
}

fn parses<T: std::str::FromStr>(literal: &[u8]) -> bool {
    std::str::from_utf8(literal).is_ok_and(|text| text.parse::<T>().is_ok())
}

fn keyword<'a>(input: &ByteRange<'a>, byte: u8) -> Scan<'a> {
    let (word, token): (&[u8], _) = match byte {
        b'n' => (b"null", Token::Null),
        b't' => (b"true", Token::Boolean),
        _ => (b"false", Token::Boolean),
    };
    let text = input.as_slice();
    let len = word.len().min(text.len());
    if text[..len] != word[..len] {
        return Err(CodecError::InvalidLiteral(input.offset()));
    }
    if len < word.len() {
        return Ok(Current::EOF);
    }
    Ok(Current::sized(input, token, byte, 0, word.len()))
}
