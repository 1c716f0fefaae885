//! UBJSON codec. The wire format carries explicit container ends, so the
//! decoder doubles as the nested reader.

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod util;

pub use decoder::UbjsonDecoder;
pub use encoder::UbjsonEncoder;
pub use util::{decode, decode_with, encode};
