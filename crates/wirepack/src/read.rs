//! Building [`Value`] trees from a nested token stream.

use crate::{CodecError, Result, Token, Value};

/// A cursor over a uniformly nested token stream: every container begin is
/// eventually followed by its matching end token.
///
/// Implemented by the MessagePack, TransEnc and JSON readers and by the UBJSON
/// decoder, whose wire format already carries explicit ends.
pub trait TokenReader {
    /// Kind of the current token.
    fn token(&self) -> Token;

    /// Moves to the next token. Returns `false` once the stream is at `Eof`
    /// or `Error`.
    fn advance(&mut self) -> bool;

    /// Number of open containers.
    fn depth(&self) -> usize;

    /// Byte offset of the current token in the input.
    fn offset(&self) -> usize;

    /// Cause of the terminal `Error` token, if one was reached.
    fn last_error(&self) -> Option<CodecError>;

    fn get_bool(&self) -> Result<bool>;
    fn get_i64(&self) -> Result<i64>;
    fn get_u64(&self) -> Result<u64>;
    fn get_f64(&self) -> Result<f64>;
    fn get_string(&self) -> Result<String>;
    fn get_binary(&self) -> Result<Vec<u8>>;

    fn get_extension(&self) -> Result<(i8, Vec<u8>)> {
        Err(CodecError::IncompatibleType {
            expected: "extension",
            found: self.token(),
        })
    }
}

/// Reads the value starting at the current token and leaves the reader on the
/// token that follows it.
///
/// Integers are canonical: anything that fits `i64` becomes [`Value::Int`]
/// whatever its wire tag, and [`Value::UInt`] only holds larger values.
pub fn read_value<R: TokenReader + ?Sized>(reader: &mut R) -> Result<Value> {
    let token = reader.token();
    let value = match token {
        Token::Eof => return Err(reader.last_error().unwrap_or(CodecError::UnexpectedEof)),
        Token::Error => {
            return Err(reader
                .last_error()
                .unwrap_or(CodecError::UnexpectedToken(Token::Error)))
        }
        Token::Null => Value::Null,
        Token::Boolean => Value::Bool(reader.get_bool()?),
        t if t.is_integer() => match reader.get_i64() {
            Ok(int) => Value::Int(int),
            Err(CodecError::Overflow) if t.is_unsigned() => Value::UInt(reader.get_u64()?),
            Err(err) => return Err(err),
        },
        t if t.is_float() => Value::Float(reader.get_f64()?),
        Token::String => Value::Str(reader.get_string()?),
        Token::Binary => Value::Bin(reader.get_binary()?),
        Token::Extension => {
            let (kind, data) = reader.get_extension()?;
            Value::Extension(kind, data)
        }
        Token::ArrayBegin => Value::Array(read_items(reader, Token::ArrayEnd)?),
        Token::RecordBegin => Value::Record(read_items(reader, Token::RecordEnd)?),
        Token::MapBegin => Value::Map(read_pairs(reader, Token::MapEnd)?),
        Token::ObjectBegin => Value::Map(read_pairs(reader, Token::ObjectEnd)?),
        other => return Err(CodecError::UnexpectedToken(other)),
    };
    reader.advance();
    Ok(value)
}

fn read_items<R: TokenReader + ?Sized>(reader: &mut R, end: Token) -> Result<Vec<Value>> {
    let mut items = Vec::new();
    reader.advance();
    while reader.token() != end {
        items.push(read_value(reader)?);
    }
    Ok(items)
}

fn read_pairs<R: TokenReader + ?Sized>(reader: &mut R, end: Token) -> Result<Vec<(Value, Value)>> {
    let mut pairs = Vec::new();
    reader.advance();
    while reader.token() != end {
        let key = read_value(reader)?;
        if reader.token() == end {
            return Err(CodecError::TooFewElements(1));
        }
        let value = read_value(reader)?;
        pairs.push((key, value));
    }
    Ok(pairs)
}

/// Reads exactly one top-level value and requires the input to end there.
pub fn read_document<R: TokenReader + ?Sized>(reader: &mut R) -> Result<Value> {
    let value = read_value(reader)?;
    match reader.token() {
        Token::Eof => Ok(value),
        Token::Error => Err(reader
            .last_error()
            .unwrap_or(CodecError::UnexpectedToken(Token::Error))),
        _ => Err(CodecError::TrailingData(reader.offset())),
    }
}
