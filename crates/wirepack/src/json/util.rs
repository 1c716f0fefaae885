//! Convenience JSON helpers.

use super::{JsonEncoder, JsonReader};
use crate::read::read_document;
use crate::{DecodeConfig, Result, Value};

pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut encoder = JsonEncoder::new(Vec::new());
    encoder.put_value(value)?;
    Ok(encoder.into_inner())
}

pub fn decode(text: &[u8]) -> Result<Value> {
    decode_with(text, DecodeConfig::default())
}

pub fn decode_with(text: &[u8], config: DecodeConfig) -> Result<Value> {
    read_document(&mut JsonReader::with_config(text, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodecError;

    #[test]
    fn objects_become_maps() {
        let text = r#"{"a": [1, -2.5, "é"], "big": 18446744073709551615}"#;
        let value = decode(text.as_bytes()).unwrap();
        assert_eq!(
            value,
            Value::Map(vec![
                (
                    Value::from("a"),
                    Value::Array(vec![Value::Int(1), Value::Float(-2.5), Value::from("é")])
                ),
                (Value::from("big"), Value::UInt(u64::MAX)),
            ])
        );
    }

    #[test]
    fn incomplete_text() {
        for text in ["[1, 2", "tru", "{\"a\":", "\"open", "-", "1e"] {
            assert_eq!(decode(text.as_bytes()), Err(CodecError::UnexpectedEof), "{text}");
        }
    }

    #[test]
    fn invalid_literals() {
        assert_eq!(decode(b"trux"), Err(CodecError::InvalidLiteral(0)));
        assert_eq!(decode(b"1.x"), Err(CodecError::InvalidLiteral(2)));
        assert_eq!(
            decode(b"@"),
            Err(CodecError::InvalidTag { tag: b'@', offset: 0 })
        );
    }
}
