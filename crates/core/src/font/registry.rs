//! Resolved fonts keyed by their query string.

use std::fmt;
use std::ops::Index;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::arena::FontId;
use crate::error::{ReassembleError, Result};
use crate::font::backend::{FaceMetrics, FontBackend, FontFace, MetricsMode};

/// Device resolution faces are sized at.
pub const NOMINAL_DPI: u32 = 72;

/// Width forced on families whose name says they are narrow.
pub const NARROW_WIDTH: i32 = 75;

/// Style attributes shared by a font query and the chunks drawn with it.
///
/// Values use the matcher's scales: slant 0/100/110 for roman/italic/oblique,
/// weight 0..=215 with 80 as regular, width as a percentage of normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontStyle {
    pub italic: i32,
    pub weight: i32,
    pub condensed: i32,
    /// Family name implies a narrow cut regardless of `condensed`.
    pub condensed_override: bool,
    pub size: f64,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            italic: 0,
            weight: 80,
            condensed: 100,
            condensed_override: false,
            size: 12.0,
        }
    }
}

impl FontStyle {
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_italic(mut self, italic: i32) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_condensed(mut self, condensed: i32) -> Self {
        self.condensed = condensed;
        self
    }

    pub fn with_condensed_override(mut self, narrow: bool) -> Self {
        self.condensed_override = narrow;
        self
    }

    /// Width percentage sent to the matcher.
    pub fn width(&self) -> i32 {
        if self.condensed_override {
            NARROW_WIDTH
        } else {
            self.condensed
        }
    }

    pub fn is_italic(&self) -> bool {
        self.italic != 0
    }
}

/// A family plus style, printable as the canonical query string.
#[derive(Debug, Clone, PartialEq)]
pub struct FontQuery {
    pub family: String,
    pub style: FontStyle,
}

impl FontQuery {
    pub fn new(family: impl Into<String>, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            style,
        }
    }
}

impl fmt::Display for FontQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:slant={}:weight={}:size={:.6}:width={}",
            self.family,
            self.style.italic,
            self.style.weight,
            self.style.size,
            self.style.width()
        )
    }
}

/// Maps a matcher weight to a CSS `font-weight`. Unlisted weights are 400.
pub fn weight_to_css(weight: i32) -> u16 {
    match weight {
        0 => 100,
        40 => 200,
        50 => 300,
        80 => 400,
        100 => 500,
        180 => 600,
        200 => 700,
        205 => 800,
        210 => 900,
        _ => 400,
    }
}

/// An opened face together with what it was resolved from.
#[derive(Debug)]
pub struct FontHandle {
    face: Box<dyn FontFace>,
    path: PathBuf,
    face_index: u32,
    query: String,
    family: String,
    size_pt: f64,
    pub(crate) space_advance: Option<f64>,
}

impl FontHandle {
    pub fn face(&self) -> &dyn FontFace {
        self.face.as_ref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Family as requested: the query string up to the first `:`.
    pub fn requested_family(&self) -> &str {
        self.query.split(':').next().unwrap_or_default()
    }

    /// Family of the face the matcher settled on.
    pub fn matched_family(&self) -> &str {
        &self.family
    }

    pub fn size_pt(&self) -> f64 {
        self.size_pt
    }

    /// Advance of a space in points, zero until a chunk has been measured.
    pub fn space_advance(&self) -> f64 {
        self.space_advance.unwrap_or(0.0)
    }

    pub fn metrics(&self, mode: MetricsMode) -> FaceMetrics {
        self.face.face_metrics(mode)
    }
}

/// Cache of opened faces.
///
/// Handles keep insertion order, so a [`FontId`] stays valid until the
/// registry is cleared. Lookups are exact matches on the query string.
pub struct FontRegistry {
    backend: Box<dyn FontBackend>,
    fonts: IndexMap<String, FontHandle>,
}

impl fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontRegistry")
            .field("fonts", &self.fonts.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl FontRegistry {
    pub fn new(backend: impl FontBackend + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn FontBackend>) -> Self {
        Self {
            backend,
            fonts: IndexMap::new(),
        }
    }

    /// Returns the handle for `family` in `style`, opening the face on first use.
    ///
    /// On failure nothing is added.
    pub fn resolve(&mut self, family: &str, style: &FontStyle) -> Result<FontId> {
        let query = FontQuery::new(family, *style);
        let key = query.to_string();
        if let Some(index) = self.fonts.get_index_of(&key) {
            tracing::trace!(query = %key, index, "font cache hit");
            return Ok(FontId(index));
        }

        let matched = self.backend.resolve_pattern(&query)?;
        let mut face = self.backend.open_face(&matched)?;
        face.set_char_size(matched.size_pt, NOMINAL_DPI, NOMINAL_DPI)
            .map_err(|e| ReassembleError::font(&key, e.to_string()))?;

        self.fonts
            .try_reserve(1)
            .map_err(|_| ReassembleError::OutOfMemory("font registry"))?;
        tracing::debug!(
            query = %key,
            path = %matched.path.display(),
            family = %matched.family,
            "resolved font"
        );
        let handle = FontHandle {
            face,
            path: matched.path,
            face_index: matched.face_index,
            query: key.clone(),
            family: matched.family,
            size_pt: matched.size_pt,
            space_advance: None,
        };
        let (index, _) = self.fonts.insert_full(key, handle);
        Ok(FontId(index))
    }

    pub fn get(&self, id: FontId) -> Option<&FontHandle> {
        self.fonts.get_index(id.0).map(|(_, handle)| handle)
    }

    pub(crate) fn get_mut(&mut self, id: FontId) -> Option<&mut FontHandle> {
        self.fonts.get_index_mut(id.0).map(|(_, handle)| handle)
    }

    pub fn find(&self, query: &str) -> Option<FontId> {
        self.fonts.get_index_of(query).map(FontId)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FontId, &FontHandle)> {
        self.fonts
            .values()
            .enumerate()
            .map(|(i, handle)| (FontId(i), handle))
    }

    /// Closes every face but keeps the backend for further resolutions.
    pub fn clear(&mut self) {
        self.fonts.clear();
    }

    /// Closes every face and hands the backend back to its owner.
    pub fn release(self) {
        tracing::debug!(fonts = self.fonts.len(), "releasing font registry");
    }
}

impl Index<FontId> for FontRegistry {
    type Output = FontHandle;

    fn index(&self, id: FontId) -> &FontHandle {
        &self.fonts[id.0]
    }
}
