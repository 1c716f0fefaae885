//! Small stack buffer for tag bytes and length prefixes.

/// Tag byte followed by up to fifteen bytes of big-endian prefix or payload.
pub(crate) struct Header {
    bytes: [u8; 16],
    len: usize,
}

impl Header {
    pub fn tag(tag: u8) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0] = tag;
        Header { bytes, len: 1 }
    }

    pub fn push(mut self, bytes: &[u8]) -> Self {
        self.bytes[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        self
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}
