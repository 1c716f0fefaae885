//! Byte ranges and output sinks shared by the wirepack codecs.
//!
//! Decoders walk a [`ByteRange`] over a complete in-memory buffer; encoders
//! push into any [`Sink`]. Two sinks are provided: the growable [`Writer`] and
//! [`FixedWriter`] over a caller-owned slice.

mod range;
mod sink;
mod writer;

pub use range::{be_int, be_uint, ByteRange};
pub use sink::{FixedWriter, Sink};
pub use writer::Writer;
