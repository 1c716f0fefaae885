//! UBJSON type markers.

pub const NULL: u8 = b'Z';
pub const NOOP: u8 = b'N';
pub const TRUE: u8 = b'T';
pub const FALSE: u8 = b'F';
pub const INT8: u8 = b'i';
pub const UINT8: u8 = b'U';
pub const INT16: u8 = b'I';
pub const INT32: u8 = b'l';
pub const INT64: u8 = b'L';
pub const FLOAT32: u8 = b'd';
pub const FLOAT64: u8 = b'D';
pub const CHAR: u8 = b'C';
pub const STRING: u8 = b'S';
pub const ARRAY_BEGIN: u8 = b'[';
pub const ARRAY_END: u8 = b']';
pub const OBJECT_BEGIN: u8 = b'{';
pub const OBJECT_END: u8 = b'}';
/// Optimized container element type.
pub const TYPE: u8 = b'$';
/// Optimized container element count.
pub const COUNT: u8 = b'#';

/// Header of a strongly typed `uint8` array, read and written as binary.
pub const BINARY_HEADER: [u8; 4] = [ARRAY_BEGIN, TYPE, UINT8, COUNT];
