//! Collaborator traits for font matching and glyph measurement.
//!
//! All metric values cross this boundary as integers in 1/64 units:
//! - [`MetricsMode::Unscaled`]: design units normalised to a [`DESIGN_EM`]
//!   em, so `value / 64 * size / 32` is the size in points.
//! - [`MetricsMode::Scaled`]: 26.6 fixed point at the face's character size.

use std::fmt;
use std::path::PathBuf;

use crate::error::Result;
use crate::font::registry::FontQuery;

/// Sub-point resolution of every metric value.
pub const SUBPOINT: f64 = 64.0;

/// Em size that unscaled metrics are normalised to.
pub const DESIGN_EM: f64 = 2048.0;

/// How glyph metrics are reported by a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricsMode {
    /// Size-independent design units; the caller rescales by `size / 32`.
    #[default]
    Unscaled,
    /// Already scaled to the character size set on the face.
    Scaled,
}

/// How kerning pairs are reported by a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KerningMode {
    /// Scaled and rounded to whole points.
    Default,
    /// Scaled, not rounded.
    Unfitted,
    /// Design units, same scale as [`MetricsMode::Unscaled`].
    #[default]
    Unscaled,
}

/// A font file picked by a [`FontMatcher`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedFont {
    pub path: PathBuf,
    pub face_index: u32,
    pub family: String,
    /// Point size confirmed by the matcher.
    pub size_pt: f64,
}

/// Per-glyph measurement in 1/64 units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub advance: i32,
    pub x_min: i32,
    pub y_min: i32,
    pub y_max: i32,
}

/// Face-wide vertical metrics in 1/64 units.
///
/// `bbox_y_max`/`bbox_y_min` are only ever used as a ratio of each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaceMetrics {
    pub ascender: i32,
    pub descender: i32,
    pub bbox_y_max: i32,
    pub bbox_y_min: i32,
}

impl FaceMetrics {
    /// Fraction of the face's full height that lies above the baseline.
    pub fn ascent_ratio(&self) -> f64 {
        let height = f64::from(self.bbox_y_max) - f64::from(self.bbox_y_min);
        if height > 0.0 {
            f64::from(self.bbox_y_max) / height
        } else {
            0.0
        }
    }

    /// Fraction of the face's full height that lies below the baseline.
    pub fn descent_ratio(&self) -> f64 {
        let height = f64::from(self.bbox_y_max) - f64::from(self.bbox_y_min);
        if height > 0.0 {
            -f64::from(self.bbox_y_min) / height
        } else {
            0.0
        }
    }
}

/// An opened face that can measure glyphs.
pub trait FontFace: fmt::Debug {
    fn set_char_size(&mut self, size_pt: f64, dpi_x: u32, dpi_y: u32) -> Result<()>;

    /// Metrics of the glyph mapped to `ch`, or `None` when it cannot be loaded.
    fn glyph_metrics(&self, ch: char, mode: MetricsMode) -> Option<GlyphMetrics>;

    /// Horizontal adjustment between `left` and `right`. Zero when the face
    /// has no pair for them.
    fn kerning(&self, left: char, right: char, mode: KerningMode) -> i32;

    fn face_metrics(&self, mode: MetricsMode) -> FaceMetrics;
}

/// Maps a font query to a concrete font file.
pub trait FontMatcher {
    fn resolve_pattern(&self, query: &FontQuery) -> Result<MatchedFont>;
}

/// Opens matched font files.
pub trait Rasterizer {
    fn open_face(&self, font: &MatchedFont) -> Result<Box<dyn FontFace>>;
}

/// Everything a registry needs from the font stack.
pub trait FontBackend: FontMatcher + Rasterizer {}

impl<T: FontMatcher + Rasterizer> FontBackend for T {}
