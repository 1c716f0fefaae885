//! MessagePack codec family.
//!
//! [`MsgPackDecoder`] tokenizes the wire, [`MsgPackReader`] adds synthetic
//! container ends, [`MsgPackEncoder`] writes with the smallest tags and
//! [`MsgPackWriter`] checks declared container counts.

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod reader;
pub mod util;
pub mod writer;

pub use decoder::MsgPackDecoder;
pub use encoder::MsgPackEncoder;
pub use reader::MsgPackReader;
pub use util::{decode, decode_with, encode};
pub use writer::MsgPackWriter;
