//! Borrowed byte range with cursor tracking.

/// A non-owning `[begin, end)` view into an input buffer.
///
/// The range never copies or mutates the bytes it points to. Every slice it
/// hands out borrows from the original buffer, so tokens decoded from a range
/// cannot outlive the input.
///
/// # Example
///
/// ```
/// use wirepack_buffers::ByteRange;
///
/// let data = [0x01, 0x02, 0x03, 0x04];
/// let mut range = ByteRange::new(&data);
///
/// assert_eq!(range.peek(), Some(0x01));
/// range.advance(1);
/// assert_eq!(range.head(2), Some(&[0x02, 0x03][..]));
/// assert_eq!(range.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange<'a> {
    /// The underlying byte slice.
    uint8: &'a [u8],
    /// Current cursor position.
    x: usize,
}

impl<'a> ByteRange<'a> {
    /// Creates a range covering the whole of `uint8`.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Number of unread bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.uint8.len() - self.x
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset of the cursor from the start of the original buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.x
    }

    /// The unread bytes.
    #[inline]
    pub fn as_slice(&self) -> &'a [u8] {
        &self.uint8[self.x..]
    }

    /// Peeks at the current byte without advancing the cursor.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.uint8.get(self.x).copied()
    }

    /// Peeks at the byte `n` positions past the cursor.
    #[inline]
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.uint8.get(self.x + n).copied()
    }

    /// Returns the next `n` bytes without advancing, or `None` when fewer
    /// than `n` bytes remain.
    #[inline]
    pub fn head(&self, n: usize) -> Option<&'a [u8]> {
        let end = self.x.checked_add(n)?;
        self.uint8.get(self.x..end)
    }

    /// Returns `n` bytes starting `skip` bytes past the cursor.
    #[inline]
    pub fn window(&self, skip: usize, n: usize) -> Option<&'a [u8]> {
        let start = self.x.checked_add(skip)?;
        let end = start.checked_add(n)?;
        self.uint8.get(start..end)
    }

    /// Advances the cursor by `n` bytes, stopping at the end of the range.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.x = self.x.saturating_add(n).min(self.uint8.len());
    }

    /// Splits off the next `n` bytes and advances past them.
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let bytes = self.head(n)?;
        self.x += n;
        Some(bytes)
    }
}

/// Reconstructs an unsigned big-endian integer from up to eight bytes.
///
/// Byte `i` of `bytes` lands at bit position `8 * (len - 1 - i)`, independent
/// of host byte order.
#[inline]
pub fn be_uint(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= 8);
    bytes
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Reconstructs a two's complement big-endian integer from up to eight bytes,
/// sign-extending from the most significant byte.
#[inline]
pub fn be_int(bytes: &[u8]) -> i64 {
    let width = bytes.len();
    if width == 0 {
        return 0;
    }
    let raw = be_uint(bytes);
    let shift = 64 - 8 * width as u32;
    ((raw << shift) as i64) >> shift
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_and_take() {
        let data = [1u8, 2, 3];
        let mut range = ByteRange::new(&data);
        assert_eq!(range.head(4), None);
        assert_eq!(range.take(2), Some(&[1u8, 2][..]));
        assert_eq!(range.offset(), 2);
        assert_eq!(range.take(2), None);
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_advance_saturates() {
        let data = [1u8, 2];
        let mut range = ByteRange::new(&data);
        range.advance(10);
        assert!(range.is_empty());
        assert_eq!(range.peek(), None);
    }

    #[test]
    fn test_window() {
        let data = [1u8, 2, 3, 4];
        let range = ByteRange::new(&data);
        assert_eq!(range.window(1, 2), Some(&[2u8, 3][..]));
        assert_eq!(range.window(3, 2), None);
        assert_eq!(range.window(usize::MAX, 1), None);
    }

    #[test]
    fn test_be_uint() {
        assert_eq!(be_uint(&[]), 0);
        assert_eq!(be_uint(&[0x01, 0x02]), 0x0102);
        assert_eq!(be_uint(&[0xff; 8]), u64::MAX);
    }

    #[test]
    fn test_be_int_sign_extends() {
        assert_eq!(be_int(&[0xff]), -1);
        assert_eq!(be_int(&[0x80, 0x00]), i64::from(i16::MIN));
        assert_eq!(be_int(&[0x7f, 0xff, 0xff, 0xff]), i64::from(i32::MAX));
        assert_eq!(be_int(&(-9_999_999_999i64).to_be_bytes()), -9_999_999_999);
    }

    proptest::proptest! {
        #[test]
        fn be_int_matches_from_be_bytes(v: i32) {
            proptest::prop_assert_eq!(be_int(&v.to_be_bytes()), i64::from(v));
        }
    }
}
