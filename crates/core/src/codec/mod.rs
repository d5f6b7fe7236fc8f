//! Text payload decoding.
//!
//! This module contains:
//! - `text`: UTF-8 decoding with the Latin-1 fallback used for mislabeled payloads

pub mod text;

pub use text::{DecodedText, TextEncoding, decode_code_points, latin1_to_chars, utf8_to_chars};
