//! Chunk text decoding.
//!
//! Import filters hand over byte strings that are nominally UTF-8 but are
//! frequently Latin-1. Any byte above 0x7F in a Latin-1 payload makes the
//! UTF-8 decode fail, which is the signal to reinterpret the bytes.

/// Encoding a payload was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

/// Code points of a chunk plus the encoding that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub chars: Vec<char>,
    pub encoding: TextEncoding,
}

impl DecodedText {
    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

/// Strict UTF-8 decode. Returns `None` on the first invalid sequence.
pub fn utf8_to_chars(bytes: &[u8]) -> Option<Vec<char>> {
    std::str::from_utf8(bytes).ok().map(|s| s.chars().collect())
}

/// Single-byte decode; every byte maps to the code point of the same value.
pub fn latin1_to_chars(bytes: &[u8]) -> Vec<char> {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Decodes a chunk payload, falling back to Latin-1 when it is not UTF-8.
pub fn decode_code_points(bytes: &[u8]) -> DecodedText {
    match utf8_to_chars(bytes) {
        Some(chars) => DecodedText {
            chars,
            encoding: TextEncoding::Utf8,
        },
        None => DecodedText {
            chars: latin1_to_chars(bytes),
            encoding: TextEncoding::Latin1,
        },
    }
}
