//! Pull decoders and push encoders for MessagePack, TransEnc, UBJSON and JSON.
//!
//! Every format has a decoder that tokenizes a complete in-memory buffer one
//! item at a time and an encoder that writes into any
//! [`Sink`](wirepack_buffers::Sink). MessagePack, TransEnc and JSON add a
//! reader that turns the raw tokens into a uniformly nested stream with
//! matching end tokens; MessagePack and TransEnc add a writer that enforces
//! declared container counts. [`read_value`] builds a [`Value`] from any
//! nested stream.

mod config;
pub(crate) mod current;
mod error;
mod frame;
pub(crate) mod header;
mod read;
mod token;
mod value;

pub mod json;
pub mod msgpack;
pub mod transenc;
pub mod ubjson;

pub use config::DecodeConfig;
pub use error::{CodecError, Result};
pub use frame::Frame;
pub use read::{read_document, read_value, TokenReader};
pub use token::Token;
pub use value::{from_data_uri, to_data_uri, Value, BIN_URI_PREFIX};

pub use wirepack_buffers as buffers;
