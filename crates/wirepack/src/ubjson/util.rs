//! Convenience UBJSON helpers.

use super::{UbjsonDecoder, UbjsonEncoder};
use crate::read::read_document;
use crate::{DecodeConfig, Result, Value};

pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut encoder = UbjsonEncoder::new(Vec::new());
    encoder.put_value(value)?;
    Ok(encoder.into_inner())
}

pub fn decode(blob: &[u8]) -> Result<Value> {
    decode_with(blob, DecodeConfig::default())
}

pub fn decode_with(blob: &[u8], config: DecodeConfig) -> Result<Value> {
    read_document(&mut UbjsonDecoder::with_config(blob, config))
}
