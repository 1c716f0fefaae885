//! TransEnc, a compact binary format with explicit container delimiters and
//! a record (tuple) container besides arrays and maps.

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod reader;
pub mod util;
pub mod writer;

pub use decoder::TransEncDecoder;
pub use encoder::TransEncEncoder;
pub use reader::TransEncReader;
pub use util::{decode, decode_with, encode};
pub use writer::TransEncWriter;
