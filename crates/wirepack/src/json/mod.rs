//! JSON codec over UTF-8 text.
//!
//! [`JsonDecoder`] reports separators as tokens; [`JsonReader`] validates and
//! hides them, giving the same nested stream as the binary readers.

pub mod decoder;
pub mod encoder;
pub mod reader;
pub mod table;
pub mod util;

pub use decoder::JsonDecoder;
pub use encoder::JsonEncoder;
pub use reader::JsonReader;
pub use util::{decode, decode_with, encode};
