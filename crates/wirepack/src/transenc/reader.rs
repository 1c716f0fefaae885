//! `TransEncReader` — nesting validation over the TransEnc token stream.

use tracing::debug;

use super::TransEncDecoder;
use crate::frame::Frame;
use crate::read::TokenReader;
use crate::{CodecError, DecodeConfig, Result, Token};

/// Walks a TransEnc buffer, checking that every end tag closes the innermost
/// open container and that maps hold whole key-value pairs.
///
/// ```
/// use wirepack::transenc::TransEncReader;
/// use wirepack::Token;
///
/// let mut reader = TransEncReader::new(&[0xa2, 0xa5]);
/// assert_eq!(reader.token(), Token::ArrayBegin);
/// assert!(!reader.next());
/// assert_eq!(reader.token(), Token::Error);
/// ```
pub struct TransEncReader<'a> {
    decoder: TransEncDecoder<'a>,
    stack: Vec<Frame>,
    current: Token,
    fault: Option<CodecError>,
    config: DecodeConfig,
}

impl<'a> TransEncReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, DecodeConfig::default())
    }

    pub fn with_config(input: &'a [u8], config: DecodeConfig) -> Self {
        let mut reader = Self {
            decoder: TransEncDecoder::new(input),
            stack: Vec::new(),
            current: Token::Eof,
            fault: None,
            config,
        };
        reader.enter();
        reader
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.current
    }

    /// Number of open containers, including one whose end tag is current.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn next(&mut self) -> bool {
        if self.current.is_terminal() {
            return false;
        }
        if self.current.is_end() {
            self.stack.pop();
        }
        self.decoder.next();
        self.enter();
        !self.current.is_terminal()
    }

    fn enter(&mut self) {
        let token = self.decoder.token();
        let checked = match token {
            Token::Error => Err(self
                .decoder
                .last_error()
                .cloned()
                .unwrap_or(CodecError::UnexpectedToken(Token::Error))),
            Token::Eof => Ok(()),
            Token::RecordEnd | Token::ArrayEnd | Token::MapEnd => self.close(token),
            t if t.is_begin() => self.open(t),
            _ => self.count_element(),
        };
        match checked {
            Ok(()) => self.current = token,
            Err(err) => self.fail(err),
        }
    }

    fn count_element(&mut self) -> Result<()> {
        match self.stack.last_mut() {
            Some(frame) => frame.consume(),
            None => Ok(()),
        }
    }

    fn open(&mut self, token: Token) -> Result<()> {
        self.count_element()?;
        if self.stack.len() >= self.config.max_depth {
            return Err(CodecError::DepthExceeded(self.config.max_depth));
        }
        let frame = match token {
            Token::RecordBegin => Frame::Record,
            Token::MapBegin => Frame::map(None).ok_or(CodecError::Overflow)?,
            _ => Frame::array(None),
        };
        self.stack.push(frame);
        Ok(())
    }

    fn close(&self, end: Token) -> Result<()> {
        match self.stack.last() {
            Some(frame) if frame.end_token() == end => frame.check_close(),
            _ => Err(CodecError::UnbalancedEnd(end)),
        }
    }

    fn fail(&mut self, err: CodecError) {
        debug!(offset = self.decoder.offset(), %err, "transenc reader failed");
        self.fault = Some(err);
        self.current = Token::Error;
    }

    pub fn offset(&self) -> usize {
        self.decoder.offset()
    }

    pub fn last_error(&self) -> Option<&CodecError> {
        self.fault.as_ref()
    }

    fn wire(&self) -> Result<&TransEncDecoder<'a>> {
        if self.current.is_terminal() {
            return Err(CodecError::IncompatibleType {
                expected: "value",
                found: self.current,
            });
        }
        Ok(&self.decoder)
    }

    pub fn get_bool(&self) -> Result<bool> {
        self.wire()?.get_bool()
    }

    pub fn get_i64(&self) -> Result<i64> {
        self.wire()?.get_i64()
    }

    pub fn get_u64(&self) -> Result<u64> {
        self.wire()?.get_u64()
    }

    pub fn get_f32(&self) -> Result<f32> {
        self.wire()?.get_f32()
    }

    pub fn get_f64(&self) -> Result<f64> {
        self.wire()?.get_f64()
    }

    pub fn get_str(&self) -> Result<&'a str> {
        self.wire()?.get_str()
    }

    pub fn get_string(&self) -> Result<String> {
        self.wire()?.get_string()
    }

    pub fn get_bytes(&self) -> Result<&'a [u8]> {
        self.wire()?.get_bytes()
    }

    pub fn get_binary(&self) -> Result<Vec<u8>> {
        self.wire()?.get_binary()
    }
}

impl TokenReader for TransEncReader<'_> {
    fn token(&self) -> Token {
        self.current
    }

    fn advance(&mut self) -> bool {
        self.next()
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }

    fn offset(&self) -> usize {
        self.decoder.offset()
    }

    fn last_error(&self) -> Option<CodecError> {
        self.fault.clone()
    }

    fn get_bool(&self) -> Result<bool> {
        TransEncReader::get_bool(self)
    }

    fn get_i64(&self) -> Result<i64> {
        TransEncReader::get_i64(self)
    }

    fn get_u64(&self) -> Result<u64> {
        TransEncReader::get_u64(self)
    }

    fn get_f64(&self) -> Result<f64> {
        TransEncReader::get_f64(self)
    }

    fn get_string(&self) -> Result<String> {
        TransEncReader::get_string(self)
    }

    fn get_binary(&self) -> Result<Vec<u8>> {
        TransEncReader::get_binary(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &[u8]) -> Vec<Token> {
        let mut reader = TransEncReader::new(input);
        let mut out = vec![reader.token()];
        while reader.next() {
            out.push(reader.token());
        }
        if out.last() != Some(&reader.token()) {
            out.push(reader.token());
        }
        out
    }

    #[test]
    fn nested_record_in_map() {
        let input = [0xa4, 0x01, 0xa0, 0x80, 0xa1, 0xa5];
        assert_eq!(
            tokens(&input),
            [
                Token::MapBegin,
                Token::SignedInt8,
                Token::RecordBegin,
                Token::Null,
                Token::RecordEnd,
                Token::MapEnd,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn depth_tracks_open_containers() {
        let mut reader = TransEncReader::new(&[0xa2, 0xa2, 0xa3, 0xa3]);
        assert_eq!(reader.depth(), 1);
        reader.next();
        assert_eq!(reader.depth(), 2);
        reader.next();
        assert_eq!((reader.token(), reader.depth()), (Token::ArrayEnd, 2));
        reader.next();
        assert_eq!((reader.token(), reader.depth()), (Token::ArrayEnd, 1));
        reader.next();
        assert_eq!((reader.token(), reader.depth()), (Token::Eof, 0));
    }

    #[test]
    fn odd_map_is_error() {
        let mut reader = TransEncReader::new(&[0xa4, 0x01, 0xa5]);
        reader.next();
        assert!(!reader.next());
        assert_eq!(reader.token(), Token::Error);
        assert_eq!(reader.last_error(), Some(&CodecError::TooFewElements(1)));
    }

    #[test]
    fn stray_end_at_top_level() {
        let reader = TransEncReader::new(&[0xa3]);
        assert_eq!(reader.token(), Token::Error);
        assert_eq!(
            reader.last_error(),
            Some(&CodecError::UnbalancedEnd(Token::ArrayEnd))
        );
    }

    #[test]
    fn depth_limit() {
        let config = DecodeConfig::default().with_max_depth(2);
        let mut reader = TransEncReader::with_config(&[0xa2, 0xa2, 0xa2], config);
        assert!(reader.next());
        assert!(!reader.next());
        assert_eq!(reader.last_error(), Some(&CodecError::DepthExceeded(2)));
    }
}
