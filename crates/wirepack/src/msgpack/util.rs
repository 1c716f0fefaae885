//! Convenience MessagePack helpers.

use super::{MsgPackEncoder, MsgPackReader};
use crate::read::read_document;
use crate::{DecodeConfig, Result, Value};

/// Encodes a value tree into a fresh buffer.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut encoder = MsgPackEncoder::new(Vec::new());
    encoder.put_value(value)?;
    Ok(encoder.into_inner())
}

/// Decodes exactly one value from `blob`.
pub fn decode(blob: &[u8]) -> Result<Value> {
    decode_with(blob, DecodeConfig::default())
}

pub fn decode_with(blob: &[u8], config: DecodeConfig) -> Result<Value> {
    read_document(&mut MsgPackReader::with_config(blob, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodecError;

    #[test]
    fn nested_roundtrip() {
        let value = Value::Map(vec![
            (Value::Str("id".into()), Value::Int(-7)),
            (
                Value::Int(3),
                Value::Array(vec![Value::Null, Value::Bin(vec![1, 2]), Value::Float(0.5)]),
            ),
            (Value::Str("ext".into()), Value::Extension(4, vec![9; 3])),
        ]);
        assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn integers_decode_canonically() {
        assert_eq!(decode(&[0xcc, 0xff]).unwrap(), Value::Int(255));
        assert_eq!(decode(&[0x05]).unwrap(), Value::Int(5));
        let big = [0xcf, 0x80, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(decode(&big).unwrap(), Value::UInt(1 << 63));
        for uint in [0, 5, 200, 70_000, i64::MAX as u64] {
            let bytes = encode(&Value::UInt(uint)).unwrap();
            assert_eq!(decode(&bytes).unwrap(), Value::Int(uint as i64));
        }
    }

    #[test]
    fn trailing_bytes_rejected() {
        assert_eq!(decode(&[0xc0, 0xc0]), Err(CodecError::TrailingData(1)));
    }

    #[test]
    fn truncated_input_is_eof() {
        assert_eq!(decode(&[0x92, 0x01]), Err(CodecError::UnexpectedEof));
    }
}
