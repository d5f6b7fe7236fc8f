//! Input fragments and the records a session keeps for them.
//!
//! Use `TextChunk::builder()` to describe a fragment before loading it.

use std::fmt;

use crate::arena::{FontId, RectId};
use crate::codec::TextEncoding;
use crate::font::FontStyle;

/// Which part of the text sits on the chunk's x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Which part of the text sits on the chunk's y coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    #[default]
    Baseline,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alignment {
    pub horizontal: HAlign,
    pub vertical: VAlign,
}

impl Alignment {
    pub const fn new(horizontal: HAlign, vertical: VAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Writing direction of a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const BLACK: Self = Self(0);

    pub const fn from_components(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0 & 0x00FF_FFFF)
    }
}

/// One absolutely positioned run of uniformly styled text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    /// Raw payload, UTF-8 or Latin-1.
    pub text: Vec<u8>,
    pub font: FontId,
    pub style: FontStyle,
    /// Placement point in page coordinates.
    pub x: f64,
    pub y: f64,
    /// Glyph orientation in degrees. Carried through, not used for geometry.
    pub orientation: f64,
    pub color: Rgb,
    pub alignment: Alignment,
    pub direction: Direction,
}

impl TextChunk {
    pub fn builder(font: FontId, text: impl Into<Vec<u8>>, x: f64, y: f64) -> TextChunkBuilder {
        TextChunkBuilder::new(font, text, x, y)
    }

    pub fn font_size(&self) -> f64 {
        self.style.size
    }
}

/// Builder for TextChunk with fluent API for optional fields.
///
/// # Example
/// ```ignore
/// let chunk = TextChunk::builder(font, "Hello", 72.0, 100.0)
///     .style(FontStyle::default().with_size(12.0))
///     .alignment(Alignment::new(HAlign::Center, VAlign::Baseline))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct TextChunkBuilder {
    chunk: TextChunk,
}

impl TextChunkBuilder {
    /// Optional fields default to: default style, black, left/baseline, left-to-right.
    pub fn new(font: FontId, text: impl Into<Vec<u8>>, x: f64, y: f64) -> Self {
        Self {
            chunk: TextChunk {
                text: text.into(),
                font,
                style: FontStyle::default(),
                x,
                y,
                orientation: 0.0,
                color: Rgb::BLACK,
                alignment: Alignment::default(),
                direction: Direction::default(),
            },
        }
    }

    pub fn style(mut self, style: FontStyle) -> Self {
        self.chunk.style = style;
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.chunk.style.size = size;
        self
    }

    pub fn orientation(mut self, degrees: f64) -> Self {
        self.chunk.orientation = degrees;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.chunk.color = color;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.chunk.alignment = alignment;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.chunk.direction = direction;
        self
    }

    pub fn build(self) -> TextChunk {
        self.chunk
    }
}

/// A loaded chunk with its computed geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRecord {
    /// Decoded text.
    pub text: String,
    pub encoding: TextEncoding,
    pub font: FontId,
    pub style: FontStyle,
    /// Baseline anchor in the run's rotated frame.
    pub x: f64,
    pub y: f64,
    pub orientation: f64,
    pub color: Rgb,
    pub alignment: Alignment,
    pub direction: Direction,
    /// Distance from the rectangle's bottom edge up to the baseline.
    pub boff: f64,
    /// Line spacing of the paragraph this record opens, as a multiple of
    /// its tallest line's ascent plus descent.
    pub vadvance: Option<f64>,
    pub rect: RectId,
}

impl TextRecord {
    pub fn font_size(&self) -> f64 {
        self.style.size
    }

    pub fn first_char(&self) -> Option<char> {
        self.text.chars().next()
    }

    pub fn last_char(&self) -> Option<char> {
        self.text.chars().next_back()
    }
}
