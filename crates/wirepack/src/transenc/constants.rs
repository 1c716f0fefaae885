//! TransEnc tag bytes.
//!
//! Multi-byte payloads and length prefixes are big-endian. Lengths are signed.

pub const SMALL_INT_MAX: u8 = 0x7f;
pub const NULL: u8 = 0x80;
pub const FALSE: u8 = 0x81;
pub const TRUE: u8 = 0x82;
pub const INT8: u8 = 0x83;
pub const INT16: u8 = 0x84;
pub const INT32: u8 = 0x85;
pub const INT64: u8 = 0x86;
pub const FLOAT32: u8 = 0x87;
pub const FLOAT64: u8 = 0x88;
pub const STR8: u8 = 0x90;
pub const STR16: u8 = 0x91;
pub const STR32: u8 = 0x92;
pub const STR64: u8 = 0x93;
pub const BIN8: u8 = 0x94;
pub const BIN16: u8 = 0x95;
pub const BIN32: u8 = 0x96;
pub const BIN64: u8 = 0x97;
pub const RECORD_BEGIN: u8 = 0xa0;
pub const RECORD_END: u8 = 0xa1;
pub const ARRAY_BEGIN: u8 = 0xa2;
pub const ARRAY_END: u8 = 0xa3;
pub const MAP_BEGIN: u8 = 0xa4;
pub const MAP_END: u8 = 0xa5;
pub const SMALL_INT_MIN: u8 = 0xe0;

/// Smallest value carried inline in the tag byte.
pub const INLINE_MIN: i64 = -32;
/// Largest value carried inline in the tag byte.
pub const INLINE_MAX: i64 = 127;
