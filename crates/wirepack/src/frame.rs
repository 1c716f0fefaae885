//! Nesting frames shared by readers and writers.

use tracing::debug;

use crate::{CodecError, Result, Token};

/// One open container.
///
/// `remaining` is the number of elements still expected, when the container
/// declared a count. Maps count keys and values separately, so a map of `n`
/// pairs starts at `2 * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Array { remaining: Option<usize> },
    Map { remaining: Option<usize>, seen: usize },
    Record,
    Object,
}

impl Frame {
    pub fn array(count: Option<usize>) -> Self {
        Frame::Array { remaining: count }
    }

    /// A map of `pairs` key-value pairs. `None` when `2 * pairs` overflows.
    pub fn map(pairs: Option<usize>) -> Option<Self> {
        let remaining = match pairs {
            Some(n) => Some(n.checked_mul(2)?),
            None => None,
        };
        Some(Frame::Map { remaining, seen: 0 })
    }

    pub fn end_token(&self) -> Token {
        match self {
            Frame::Array { .. } => Token::ArrayEnd,
            Frame::Map { .. } => Token::MapEnd,
            Frame::Record => Token::RecordEnd,
            Frame::Object => Token::ObjectEnd,
        }
    }

    pub fn remaining(&self) -> Option<usize> {
        match self {
            Frame::Array { remaining } | Frame::Map { remaining, .. } => *remaining,
            Frame::Record | Frame::Object => None,
        }
    }

    /// True once a counted container has received all its elements.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == Some(0)
    }

    /// Fails when the frame has no room for another element.
    pub fn admit(&self) -> Result<()> {
        if self.is_exhausted() {
            debug!(frame = ?self, "element written past declared count");
            return Err(CodecError::TooManyElements);
        }
        Ok(())
    }

    /// Accounts for one element.
    pub fn consume(&mut self) -> Result<()> {
        self.admit()?;
        match self {
            Frame::Array { remaining } => {
                if let Some(n) = remaining {
                    *n -= 1;
                }
            }
            Frame::Map { remaining, seen } => {
                if let Some(n) = remaining {
                    *n -= 1;
                }
                *seen += 1;
            }
            Frame::Record | Frame::Object => {}
        }
        Ok(())
    }

    /// Checks that the frame may be closed now.
    pub fn check_close(&self) -> Result<()> {
        match *self {
            Frame::Array {
                remaining: Some(n),
            }
            | Frame::Map {
                remaining: Some(n), ..
            } if n > 0 => {
                debug!(frame = ?self, missing = n, "container closed early");
                Err(CodecError::TooFewElements(n))
            }
            Frame::Map { seen, .. } if seen % 2 == 1 => {
                debug!(frame = ?self, "map closed after a key without value");
                Err(CodecError::TooFewElements(1))
            }
            _ => Ok(()),
        }
    }
}

/// Writes one element into the innermost frame of `stack`. `put` only runs
/// when the frame has room, and the element is counted only when `put`
/// actually wrote bytes.
pub(crate) fn write_element(
    stack: &mut [Frame],
    put: impl FnOnce() -> Result<usize>,
) -> Result<usize> {
    if let Some(frame) = stack.last() {
        frame.admit()?;
    }
    let written = put()?;
    if written > 0 {
        if let Some(frame) = stack.last_mut() {
            frame.consume()?;
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counted_array() {
        let mut frame = Frame::array(Some(2));
        assert_eq!(frame.check_close(), Err(CodecError::TooFewElements(2)));
        frame.consume().unwrap();
        frame.consume().unwrap();
        assert!(frame.is_exhausted());
        assert_eq!(frame.consume(), Err(CodecError::TooManyElements));
        assert_eq!(frame.check_close(), Ok(()));
    }

    #[test]
    fn map_counts_keys_and_values() {
        let mut frame = Frame::map(Some(1)).unwrap();
        assert_eq!(frame.remaining(), Some(2));
        frame.consume().unwrap();
        assert_eq!(frame.check_close(), Err(CodecError::TooFewElements(1)));
        frame.consume().unwrap();
        assert_eq!(frame.check_close(), Ok(()));
        assert_eq!(frame.end_token(), Token::MapEnd);
    }

    #[test]
    fn unchecked_map_requires_pairs() {
        let mut frame = Frame::map(None).unwrap();
        frame.consume().unwrap();
        assert_eq!(frame.check_close(), Err(CodecError::TooFewElements(1)));
        frame.consume().unwrap();
        assert_eq!(frame.check_close(), Ok(()));
        assert!(!frame.is_exhausted());
    }

    #[test]
    fn map_count_overflow() {
        assert_eq!(Frame::map(Some(usize::MAX)), None);
    }

    #[test]
    fn declined_element_is_not_counted() {
        let mut stack = vec![Frame::array(Some(1))];
        assert_eq!(write_element(&mut stack, || Ok(0)), Ok(0));
        assert_eq!(stack[0].remaining(), Some(1));
        assert_eq!(
            write_element(&mut stack, || Err(CodecError::Unsupported("test"))),
            Err(CodecError::Unsupported("test"))
        );
        assert_eq!(stack[0].remaining(), Some(1));
        assert_eq!(write_element(&mut stack, || Ok(3)), Ok(3));
        assert!(stack[0].is_exhausted());
    }

    #[test]
    fn full_frame_skips_the_write() {
        let mut stack = vec![Frame::array(Some(0))];
        let mut ran = false;
        let result = write_element(&mut stack, || {
            ran = true;
            Ok(1)
        });
        assert_eq!(result, Err(CodecError::TooManyElements));
        assert!(!ran);
        assert_eq!(write_element(&mut [], || Ok(2)), Ok(2));
    }
}
