//! Binary buffer writer with auto-growing capacity.

use tracing::trace;

use crate::Sink;

/// A binary buffer writer that grows automatically as needed.
///
/// # Example
///
/// ```
/// use wirepack_buffers::{Sink, Writer};
///
/// let mut writer = Writer::new();
/// assert!(writer.grow(3));
/// writer.write(0x01);
/// writer.write_all(&[0x02, 0x03]);
/// let data = writer.flush();
/// assert_eq!(data, [0x01, 0x02, 0x03]);
/// ```
pub struct Writer {
    /// The underlying byte buffer.
    uint8: Vec<u8>,
    /// Position where last flush happened.
    x0: usize,
    /// Current cursor position.
    x: usize,
    /// Allocation size when buffer needs to grow.
    alloc_size: usize,
    /// Upper bound on unflushed bytes, if any.
    limit: Option<usize>,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with default allocation size (64KB).
    pub fn new() -> Self {
        Self::with_alloc_size(64 * 1024)
    }

    /// Creates a new writer with custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
            limit: None,
        }
    }

    /// Caps the number of unflushed bytes. Reservations beyond the cap are
    /// declined by [`Sink::grow`].
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.x - self.x0
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ensures the buffer has at least `capacity` bytes available.
    fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.len() - self.x;
        if remaining < capacity {
            let total = self.uint8.len() - self.x0;
            let required = capacity - remaining;
            let total_required = total + required;
            let new_size = if total_required <= self.alloc_size {
                self.alloc_size
            } else {
                total_required * 2
            };
            self.realloc(new_size);
        }
    }

    fn realloc(&mut self, new_size: usize) {
        let x0 = self.x0;
        let x = self.x;
        let mut new_buf = vec![0u8; new_size];
        new_buf[..x - x0].copy_from_slice(&self.uint8[x0..x]);
        self.uint8 = new_buf;
        self.x = x - x0;
        self.x0 = 0;
    }

    /// Discards everything written since the last flush.
    pub fn reset(&mut self) {
        self.x = self.x0;
    }

    /// Returns the written data and advances the flush position.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    /// Unflushed bytes, without advancing the flush position.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8[self.x0..self.x]
    }
}

impl Sink for Writer {
    fn grow(&mut self, additional: usize) -> bool {
        if let Some(limit) = self.limit {
            if self.len().saturating_add(additional) > limit {
                trace!(additional, limit, "writer declined to grow");
                return false;
            }
        }
        self.ensure_capacity(additional);
        true
    }

    #[inline]
    fn write(&mut self, byte: u8) {
        self.ensure_capacity(1);
        self.uint8[self.x] = byte;
        self.x += 1;
    }

    #[inline]
    fn write_all(&mut self, bytes: &[u8]) {
        let length = bytes.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(bytes);
        self.x += length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write() {
        let mut writer = Writer::new();
        writer.write(0x01);
        writer.write(0x02);
        assert_eq!(writer.flush(), [0x01, 0x02]);
    }

    #[test]
    fn test_flush_multiple() {
        let mut writer = Writer::new();
        writer.write(0x01);
        assert_eq!(writer.flush(), [0x01]);
        writer.write(0x02);
        assert_eq!(writer.flush(), [0x02]);
    }

    #[test]
    fn test_grows_past_alloc_size() {
        let mut writer = Writer::with_alloc_size(2);
        assert!(writer.grow(5));
        writer.write_all(b"hello");
        writer.write_all(b" world");
        assert_eq!(writer.flush(), b"hello world");
    }

    #[test]
    fn test_limit_declines() {
        let mut writer = Writer::with_alloc_size(4).with_limit(3);
        assert!(writer.grow(3));
        writer.write_all(&[1, 2, 3]);
        assert!(!writer.grow(1));
        assert_eq!(writer.len(), 3);
        writer.flush();
        assert!(writer.grow(1));
    }

    #[test]
    fn test_reset_discards_unflushed() {
        let mut writer = Writer::new();
        writer.write(0x0a);
        writer.flush();
        writer.write(0x0b);
        writer.reset();
        assert!(writer.is_empty());
        assert_eq!(writer.flush(), Vec::<u8>::new());
    }
}
