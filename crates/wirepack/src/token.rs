//! Token kinds reported by decoders and readers.

/// Kind of the item currently under a decoder or reader cursor.
///
/// Every format maps its own wire tags onto a subset of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// End of input, or input truncated in the middle of a token.
    Eof,
    /// Malformed input. Terminal: the cursor never moves past it.
    Error,
    Null,
    Boolean,
    SignedInt8,
    SignedInt16,
    SignedInt32,
    SignedInt64,
    UnsignedInt8,
    UnsignedInt16,
    UnsignedInt32,
    UnsignedInt64,
    Float32,
    Float64,
    String,
    Binary,
    /// MessagePack extension: type byte plus opaque payload.
    Extension,
    ArrayBegin,
    ArrayEnd,
    MapBegin,
    MapEnd,
    RecordBegin,
    RecordEnd,
    ObjectBegin,
    ObjectEnd,
    /// JSON `,`. Only the raw JSON decoder reports it.
    ValueSeparator,
    /// JSON `:`. Only the raw JSON decoder reports it.
    NameSeparator,
}

impl Token {
    /// `Eof` or `Error`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Token::Eof | Token::Error)
    }

    #[inline]
    pub fn is_begin(self) -> bool {
        matches!(
            self,
            Token::ArrayBegin | Token::MapBegin | Token::RecordBegin | Token::ObjectBegin
        )
    }

    #[inline]
    pub fn is_end(self) -> bool {
        matches!(
            self,
            Token::ArrayEnd | Token::MapEnd | Token::RecordEnd | Token::ObjectEnd
        )
    }

    #[inline]
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Token::SignedInt8 | Token::SignedInt16 | Token::SignedInt32 | Token::SignedInt64
        )
    }

    #[inline]
    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Token::UnsignedInt8 | Token::UnsignedInt16 | Token::UnsignedInt32 | Token::UnsignedInt64
        )
    }

    #[inline]
    pub fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    #[inline]
    pub fn is_float(self) -> bool {
        matches!(self, Token::Float32 | Token::Float64)
    }

    /// A token that is a complete value on its own (not a container
    /// delimiter, separator or terminal state).
    #[inline]
    pub fn is_scalar(self) -> bool {
        !(self.is_terminal()
            || self.is_begin()
            || self.is_end()
            || matches!(self, Token::ValueSeparator | Token::NameSeparator))
    }
}
