//! Output sink contract and the fixed-capacity adapter.

use tracing::trace;

/// A destination for encoded bytes.
///
/// Encoders reserve room with [`Sink::grow`] before every value and write
/// nothing when the reservation is declined. Writing more bytes than were
/// reserved is a caller bug.
pub trait Sink {
    /// Reserves room for `additional` more bytes. Returns `false` when the
    /// sink cannot hold them, in which case its contents are unchanged.
    fn grow(&mut self, additional: usize) -> bool;

    /// Appends one byte.
    fn write(&mut self, byte: u8);

    /// Appends a byte slice.
    fn write_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write(byte);
        }
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    #[inline]
    fn grow(&mut self, additional: usize) -> bool {
        (**self).grow(additional)
    }

    #[inline]
    fn write(&mut self, byte: u8) {
        (**self).write(byte)
    }

    #[inline]
    fn write_all(&mut self, bytes: &[u8]) {
        (**self).write_all(bytes)
    }
}

impl Sink for Vec<u8> {
    fn grow(&mut self, additional: usize) -> bool {
        self.try_reserve(additional).is_ok()
    }

    #[inline]
    fn write(&mut self, byte: u8) {
        self.push(byte);
    }

    #[inline]
    fn write_all(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// A sink over a caller-owned, fixed-size buffer.
///
/// # Example
///
/// ```
/// use wirepack_buffers::{FixedWriter, Sink};
///
/// let mut storage = [0u8; 2];
/// let mut sink = FixedWriter::new(&mut storage);
/// assert!(sink.grow(2));
/// sink.write_all(&[0xaa, 0xbb]);
/// assert!(!sink.grow(1));
/// assert_eq!(sink.as_slice(), &[0xaa, 0xbb]);
/// ```
pub struct FixedWriter<'b> {
    uint8: &'b mut [u8],
    x: usize,
}

impl<'b> FixedWriter<'b> {
    pub fn new(uint8: &'b mut [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.x
    }

    pub fn is_empty(&self) -> bool {
        self.x == 0
    }

    /// Unused capacity.
    pub fn remaining(&self) -> usize {
        self.uint8.len() - self.x
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.uint8[..self.x]
    }
}

impl Sink for FixedWriter<'_> {
    fn grow(&mut self, additional: usize) -> bool {
        if additional > self.remaining() {
            trace!(additional, remaining = self.remaining(), "fixed buffer full");
            return false;
        }
        true
    }

    #[inline]
    fn write(&mut self, byte: u8) {
        self.uint8[self.x] = byte;
        self.x += 1;
    }

    #[inline]
    fn write_all(&mut self, bytes: &[u8]) {
        let end = self.x + bytes.len();
        self.uint8[self.x..end].copy_from_slice(bytes);
        self.x = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_declines_without_writing() {
        let mut storage = [0u8; 3];
        let mut sink = FixedWriter::new(&mut storage);
        assert!(sink.grow(2));
        sink.write_all(&[1, 2]);
        assert!(!sink.grow(2));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.remaining(), 1);
        assert_eq!(sink.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_vec_sink() {
        let mut out = Vec::new();
        assert!(Sink::grow(&mut out, 4));
        Sink::write(&mut out, 7);
        Sink::write_all(&mut out, &[8, 9]);
        assert_eq!(out, [7, 8, 9]);
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn fill<S: Sink>(mut sink: S) {
            assert!(sink.grow(1));
            sink.write(0x42);
        }
        let mut out = Vec::new();
        fill(&mut out);
        fill(&mut out);
        assert_eq!(out, [0x42, 0x42]);
    }
}
