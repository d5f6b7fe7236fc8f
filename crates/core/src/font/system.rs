//! Installed fonts through `fontdb` (matching) and `ttf-parser` (metrics).

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use ttf_parser::GlyphId;

use crate::error::{ReassembleError, Result};
use crate::font::backend::{
    DESIGN_EM, FaceMetrics, FontFace, FontMatcher, GlyphMetrics, KerningMode, MatchedFont,
    MetricsMode, Rasterizer, SUBPOINT,
};
use crate::font::registry::{FontQuery, weight_to_css};

/// Live system database, shared by every `SystemFonts` that is still alive.
static SHARED: Mutex<Weak<Database>> = Mutex::new(Weak::new());

/// Font backend over the fonts installed on this machine.
///
/// Scanning the system font directories is expensive, so backends obtained
/// from [`SystemFonts::shared`] reuse one database until the last of them is
/// dropped.
#[derive(Clone)]
pub struct SystemFonts {
    db: Arc<Database>,
}

impl fmt::Debug for SystemFonts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemFonts")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl SystemFonts {
    pub fn shared() -> Self {
        let mut slot = SHARED.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(db) = slot.upgrade() {
            return Self { db };
        }
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system font database");
        let db = Arc::new(db);
        *slot = Arc::downgrade(&db);
        Self { db }
    }

    /// A backend over a caller-populated database, not shared with anyone.
    pub fn with_database(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn family_of(name: &str) -> Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => Family::Serif,
        "sans" | "sans-serif" | "sans serif" => Family::SansSerif,
        "mono" | "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(name),
    }
}

fn style_of(slant: i32) -> Style {
    match slant {
        0 => Style::Normal,
        110.. => Style::Oblique,
        _ => Style::Italic,
    }
}

fn stretch_of(width: i32) -> Stretch {
    match width {
        ..=56 => Stretch::UltraCondensed,
        57..=68 => Stretch::ExtraCondensed,
        69..=81 => Stretch::Condensed,
        82..=93 => Stretch::SemiCondensed,
        94..=106 => Stretch::Normal,
        107..=118 => Stretch::SemiExpanded,
        119..=137 => Stretch::Expanded,
        138..=175 => Stretch::ExtraExpanded,
        _ => Stretch::UltraExpanded,
    }
}

impl FontMatcher for SystemFonts {
    fn resolve_pattern(&self, query: &FontQuery) -> Result<MatchedFont> {
        let key = query.to_string();
        let families = [family_of(query.family.trim())];
        let wanted = Query {
            families: &families,
            weight: Weight(weight_to_css(query.style.weight)),
            stretch: stretch_of(query.style.width()),
            style: style_of(query.style.italic),
        };
        let id = self
            .db
            .query(&wanted)
            .or_else(|| {
                self.db.query(&Query {
                    families: &[Family::SansSerif],
                    ..wanted
                })
            })
            .ok_or_else(|| ReassembleError::font(&key, "no installed face matches"))?;
        let info = self
            .db
            .face(id)
            .ok_or_else(|| ReassembleError::font(&key, "matched face vanished"))?;
        let path = match &info.source {
            Source::File(path) => path.clone(),
            _ => return Err(ReassembleError::font(&key, "matched face has no file")),
        };
        let family = info
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| query.family.clone());

        Ok(MatchedFont {
            path,
            face_index: info.index,
            family,
            size_pt: query.style.size,
        })
    }
}

impl Rasterizer for SystemFonts {
    fn open_face(&self, font: &MatchedFont) -> Result<Box<dyn FontFace>> {
        let data = std::fs::read(&font.path).map_err(|e| {
            ReassembleError::font(&font.path.display().to_string(), e.to_string())
        })?;
        Ok(Box::new(SystemFace::parse(data, font.face_index)?))
    }
}

/// An owned font file with its face-wide metrics read up front.
struct SystemFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: f64,
    size_pt: f64,
    ascender: i16,
    descender: i16,
    bbox_y_max: i16,
    bbox_y_min: i16,
}

impl fmt::Debug for SystemFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemFace")
            .field("index", &self.index)
            .field("units_per_em", &self.units_per_em)
            .field("size_pt", &self.size_pt)
            .finish_non_exhaustive()
    }
}

impl SystemFace {
    fn parse(data: Vec<u8>, index: u32) -> Result<Self> {
        let face = ttf_parser::Face::parse(&data, index)
            .map_err(|e| ReassembleError::font("face", e.to_string()))?;
        let bbox = face.global_bounding_box();
        let units_per_em = f64::from(face.units_per_em());
        let (ascender, descender) = (face.ascender(), face.descender());
        Ok(Self {
            units_per_em,
            size_pt: 0.0,
            ascender,
            descender,
            bbox_y_max: bbox.y_max,
            bbox_y_min: bbox.y_min,
            data,
            index,
        })
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).ok()
    }

    fn design(&self, units: f64) -> i32 {
        (units * DESIGN_EM / self.units_per_em).round() as i32
    }

    fn scaled(&self, units: f64) -> f64 {
        units * self.size_pt * SUBPOINT / self.units_per_em
    }

    fn units(&self, units: impl Into<f64>, mode: MetricsMode) -> i32 {
        let units = units.into();
        match mode {
            MetricsMode::Unscaled => self.design(units),
            MetricsMode::Scaled => self.scaled(units).round() as i32,
        }
    }
}

impl FontFace for SystemFace {
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
        let face = self.face()?;
        // Unmapped characters measure as .notdef.
        let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
        let advance = face.glyph_hor_advance(glyph)?;
        let (x_min, y_min, y_max) = face
            .glyph_bounding_box(glyph)
            .map(|r| (r.x_min, r.y_min, r.y_max))
            .unwrap_or_default();
        Some(GlyphMetrics {
            advance: self.units(advance, mode),
            x_min: self.units(x_min, mode),
            y_min: self.units(y_min, mode),
            y_max: self.units(y_max, mode),
        })
    }

    fn kerning(&self, left: char, right: char, mode: KerningMode) -> i32 {
        let Some(face) = self.face() else {
            return 0;
        };
        let (Some(l), Some(r)) = (face.glyph_index(left), face.glyph_index(right)) else {
            return 0;
        };
        let Some(kern) = face.tables().kern else {
            return 0;
        };
        let value = kern
            .subtables
            .into_iter()
            .filter(|s| s.horizontal && !s.variable && !s.has_state_machine)
            .find_map(|s| s.glyphs_kerning(l, r))
            .map(f64::from)
            .unwrap_or(0.0);
        match mode {
            KerningMode::Unscaled => self.design(value),
            KerningMode::Unfitted => self.scaled(value).round() as i32,
            KerningMode::Default => ((self.scaled(value) / SUBPOINT).round() * SUBPOINT) as i32,
        }
    }

    fn face_metrics(&self, mode: MetricsMode) -> FaceMetrics {
        FaceMetrics {
            ascender: self.units(self.ascender, mode),
            descender: self.units(self.descender, mode),
            bbox_y_max: self.units(self.bbox_y_max, mode),
            bbox_y_min: self.units(self.bbox_y_min, mode),
        }
    }
}
