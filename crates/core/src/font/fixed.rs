//! Deterministic synthetic font metrics.
//!
//! Every glyph is described in fractions of an em, which makes the geometry a
//! session computes exact and independent of whatever fonts are installed.

use std::path::PathBuf;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{ReassembleError, Result};
use crate::font::backend::{
    DESIGN_EM, FaceMetrics, FontFace, FontMatcher, GlyphMetrics, KerningMode, MatchedFont,
    MetricsMode, Rasterizer, SUBPOINT,
};
use crate::font::registry::FontQuery;

/// Em-relative description of one synthetic font.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedFont {
    /// Advance of every glyph without an override.
    pub advance: f64,
    pub ascender: f64,
    pub descender: f64,
    /// Top of every glyph's ink box.
    pub glyph_top: f64,
    /// Bottom of every glyph's ink box (negative below the baseline).
    pub glyph_bottom: f64,
    pub bbox_top: f64,
    pub bbox_bottom: f64,
    pub advances: FxHashMap<char, f64>,
    pub kerning: FxHashMap<(char, char), f64>,
    pub missing: FxHashSet<char>,
}

impl Default for FixedFont {
    fn default() -> Self {
        Self {
            advance: 0.5,
            ascender: 0.875,
            descender: -0.25,
            glyph_top: 0.75,
            glyph_bottom: -0.25,
            bbox_top: 0.75,
            bbox_bottom: -0.25,
            advances: FxHashMap::default(),
            kerning: FxHashMap::default(),
            missing: FxHashSet::default(),
        }
    }
}

impl FixedFont {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_advance(mut self, em: f64) -> Self {
        self.advance = em;
        self
    }

    pub fn with_advance(mut self, ch: char, em: f64) -> Self {
        self.advances.insert(ch, em);
        self
    }

    pub fn with_kerning(mut self, left: char, right: char, em: f64) -> Self {
        self.kerning.insert((left, right), em);
        self
    }

    pub fn with_glyph_extent(mut self, top: f64, bottom: f64) -> Self {
        self.glyph_top = top;
        self.glyph_bottom = bottom;
        self
    }

    pub fn with_line_metrics(mut self, ascender: f64, descender: f64) -> Self {
        self.ascender = ascender;
        self.descender = descender;
        self
    }

    /// Makes `ch` unmeasurable, as if the face had no usable glyph for it.
    pub fn without_glyph(mut self, ch: char) -> Self {
        self.missing.insert(ch);
        self
    }

    fn advance_of(&self, ch: char) -> f64 {
        self.advances.get(&ch).copied().unwrap_or(self.advance)
    }
}

/// Matcher and rasterizer over a fixed set of synthetic fonts.
///
/// Unknown families fall back to a default font unless the backend was built
/// with [`FixedMetrics::strict`].
#[derive(Debug, Clone)]
pub struct FixedMetrics {
    fonts: FxHashMap<String, FixedFont>,
    fallback: Option<FixedFont>,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedMetrics {
    pub fn new() -> Self {
        Self {
            fonts: FxHashMap::default(),
            fallback: Some(FixedFont::default()),
        }
    }

    /// A backend that only resolves families registered with [`with_font`](Self::with_font).
    pub fn strict() -> Self {
        Self {
            fonts: FxHashMap::default(),
            fallback: None,
        }
    }

    pub fn with_font(mut self, family: impl Into<String>, font: FixedFont) -> Self {
        self.fonts.insert(family.into(), font);
        self
    }

    pub fn with_fallback(mut self, font: FixedFont) -> Self {
        self.fallback = Some(font);
        self
    }

    fn lookup(&self, family: &str) -> Option<&FixedFont> {
        self.fonts.get(family).or(self.fallback.as_ref())
    }
}

impl FontMatcher for FixedMetrics {
    fn resolve_pattern(&self, query: &FontQuery) -> Result<MatchedFont> {
        if self.lookup(&query.family).is_none() {
            return Err(ReassembleError::font(
                &query.to_string(),
                "no synthetic font registered for this family",
            ));
        }
        Ok(MatchedFont {
            path: PathBuf::from(format!("fixed/{}", query.family)),
            face_index: 0,
            family: query.family.clone(),
            size_pt: query.style.size,
        })
    }
}

impl Rasterizer for FixedMetrics {
    fn open_face(&self, font: &MatchedFont) -> Result<Box<dyn FontFace>> {
        let metrics = self.lookup(&font.family).cloned().ok_or_else(|| {
            ReassembleError::font(&font.family, "no synthetic font registered for this family")
        })?;
        Ok(Box::new(FixedFace {
            font: metrics,
            size_pt: font.size_pt,
        }))
    }
}

#[derive(Debug, Clone)]
struct FixedFace {
    font: FixedFont,
    size_pt: f64,
}

impl FixedFace {
    fn units(&self, em: f64, mode: MetricsMode) -> i32 {
        let value = match mode {
            MetricsMode::Unscaled => em * DESIGN_EM,
            MetricsMode::Scaled => em * self.size_pt * SUBPOINT,
        };
        value.round() as i32
    }
}

impl FontFace for FixedFace {
    fn set_char_size(&mut self, size_pt: f64, dpi_x: u32, dpi_y: u32) -> Result<()> {
        if !(size_pt.is_finite() && size_pt > 0.0) || dpi_x == 0 || dpi_y == 0 {
            return Err(ReassembleError::InvalidParameter(format!(
                "character size {size_pt} at {dpi_x}x{dpi_y} dpi"
            )));
        }
        self.size_pt = size_pt * f64::from(dpi_y) / 72.0;
        Ok(())
    }

    fn glyph_metrics(&self, ch: char, mode: MetricsMode) -> Option<GlyphMetrics> {
        if self.font.missing.contains(&ch) {
            return None;
        }
        let (y_max, y_min) = if ch == ' ' {
            (0, 0)
        } else {
            (
                self.units(self.font.glyph_top, mode),
                self.units(self.font.glyph_bottom, mode),
            )
        };
        Some(GlyphMetrics {
            advance: self.units(self.font.advance_of(ch), mode),
            x_min: 0,
            y_min,
            y_max,
        })
    }

    fn kerning(&self, left: char, right: char, mode: KerningMode) -> i32 {
        let Some(&em) = self.font.kerning.get(&(left, right)) else {
            return 0;
        };
        match mode {
            KerningMode::Unscaled => (em * DESIGN_EM).round() as i32,
            KerningMode::Unfitted => (em * self.size_pt * SUBPOINT).round() as i32,
            KerningMode::Default => ((em * self.size_pt).round() * SUBPOINT) as i32,
        }
    }

    fn face_metrics(&self, mode: MetricsMode) -> FaceMetrics {
        FaceMetrics {
            ascender: self.units(self.font.ascender, mode),
            descender: self.units(self.font.descender, mode),
            bbox_y_max: self.units(self.font.bbox_top, mode),
            bbox_y_min: self.units(self.font.bbox_bottom, mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::registry::FontStyle;

    fn open(backend: &FixedMetrics, family: &str, size: f64) -> Box<dyn FontFace> {
        let query = FontQuery::new(family, FontStyle::default().with_size(size));
        let matched = backend.resolve_pattern(&query).unwrap();
        backend.open_face(&matched).unwrap()
    }

    #[test]
    fn unscaled_units_use_design_em() {
        let face = open(&FixedMetrics::new(), "Any", 12.0);
        let g = face.glyph_metrics('a', MetricsMode::Unscaled).unwrap();
        assert_eq!(g.advance, 1024);
        assert_eq!(g.y_max, 1536);
        assert_eq!(face.face_metrics(MetricsMode::Unscaled).descender, -512);
    }

    #[test]
    fn scaled_units_follow_size() {
        let face = open(&FixedMetrics::new(), "Any", 10.0);
        let g = face.glyph_metrics('a', MetricsMode::Scaled).unwrap();
        assert_eq!(g.advance, 320);
        let space = face.glyph_metrics(' ', MetricsMode::Scaled).unwrap();
        assert_eq!((space.y_min, space.y_max), (0, 0));
    }

    #[test]
    fn overrides_and_kerning() {
        let font = FixedFont::new()
            .with_advance('W', 1.0)
            .with_kerning('A', 'V', -0.125)
            .without_glyph('\u{fffd}');
        let face = open(&FixedMetrics::strict().with_font("Kern", font), "Kern", 16.0);
        assert_eq!(face.glyph_metrics('W', MetricsMode::Unscaled).unwrap().advance, 2048);
        assert_eq!(face.kerning('A', 'V', KerningMode::Unscaled), -256);
        assert_eq!(face.kerning('A', 'V', KerningMode::Default), -128);
        assert_eq!(face.kerning('V', 'A', KerningMode::Unscaled), 0);
        assert!(face.glyph_metrics('\u{fffd}', MetricsMode::Unscaled).is_none());
    }

    #[test]
    fn strict_rejects_unknown_family() {
        let backend = FixedMetrics::strict();
        let query = FontQuery::new("Nope", FontStyle::default());
        let err = backend.resolve_pattern(&query).unwrap_err();
        assert!(matches!(err, ReassembleError::FontResolution { .. }));
    }
}
