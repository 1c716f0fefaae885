//! Character classes for the JSON tokenizer, one entry per byte value.

pub const INVALID: u8 = 0;
pub const WHITESPACE: u8 = 1;
/// Digit or `-`: starts a number.
pub const NUMBER: u8 = 2;
pub const QUOTE: u8 = 3;
/// `n`, `t` or `f`: starts a keyword.
pub const KEYWORD: u8 = 4;
/// One of `[ ] { } , :`.
pub const STRUCTURAL: u8 = 5;

pub static CLASS: [u8; 256] = build();

const fn build() -> [u8; 256] {
    let mut table = [INVALID; 256];
    table[b' ' as usize] = WHITESPACE;
    table[b'\t' as usize] = WHITESPACE;
    table[b'\n' as usize] = WHITESPACE;
    table[b'\r' as usize] = WHITESPACE;
    let mut digit = b'0';
    while digit <= b'9' {
        table[digit as usize] = NUMBER;
        digit += 1;
    }
    table[b'-' as usize] = NUMBER;
    table[b'"' as usize] = QUOTE;
    table[b'n' as usize] = KEYWORD;
    table[b't' as usize] = KEYWORD;
    table[b'f' as usize] = KEYWORD;
    table[b'[' as usize] = STRUCTURAL;
    table[b']' as usize] = STRUCTURAL;
    table[b'{' as usize] = STRUCTURAL;
    table[b'}' as usize] = STRUCTURAL;
    table[b',' as usize] = STRUCTURAL;
    table[b':' as usize] = STRUCTURAL;
    table
}

#[inline]
pub fn class(byte: u8) -> u8 {
    CLASS[byte as usize]
}
