//! Reassembly session: stores, run state and chunk placement.

use std::fmt::Write as _;

use crate::arena::{FontId, RecordId, Store};
use crate::codec::{TextEncoding, decode_code_points};
use crate::error::{ReassembleError, Result};
use crate::font::{FontBackend, FontRegistry, FontStyle, KerningMode, MetricsMode, SUBPOINT};
use crate::font::registry::NARROW_WIDTH;
use crate::layout::analysis;
use crate::layout::chunk::{HAlign, TextChunk, TextRecord, VAlign};
use crate::layout::complex::{ComplexStore, Members};
use crate::layout::geometry::{BoundingRect, RectStore};
use crate::layout::params::{
    EMF_BOTTOM_FACTOR, KerningOptions, LoadFlags, OUTPUT_GROWTH, ReassembleParams,
    validate_quantization_error,
};
use crate::utils::{apply_matrix_pt, escapement_matrix};

/// Placement of the first chunk of a run; every later chunk is measured
/// relative to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOrigin {
    pub x: f64,
    pub y: f64,
    /// Rotation of the run in degrees, clockwise on screen.
    pub escapement: f64,
}

pub type RecordStore = Store<RecordId, TextRecord>;

/// Everything one run of text is reassembled from.
///
/// Lifecycle: load chunks sharing one escapement, [`analyze`](Self::analyze),
/// serialize, then [`clear`](Self::clear) for the next run. Fonts and
/// options survive `clear`; [`release`](Self::release) drops them too.
#[derive(Debug)]
pub struct Session {
    pub(crate) fonts: FontRegistry,
    pub(crate) records: RecordStore,
    pub(crate) rects: RectStore,
    pub(crate) complexes: ComplexStore,
    pub(crate) params: ReassembleParams,
    origin: Option<RunOrigin>,
    /// Rectangle count before the last analysis; everything past it belongs
    /// to complexes.
    analysis_mark: Option<usize>,
    out: String,
}

/// Geometry of a chunk, computed before anything is stored.
struct Placement {
    text: String,
    encoding: TextEncoding,
    x: f64,
    y: f64,
    boff: f64,
    rect: BoundingRect,
    space_advance: Option<f64>,
}

impl Session {
    pub fn new(backend: impl FontBackend + 'static) -> Self {
        Self::with_params(backend, ReassembleParams::default())
    }

    pub fn with_params(backend: impl FontBackend + 'static, params: ReassembleParams) -> Self {
        Self::from_registry(FontRegistry::new(backend), params)
    }

    pub fn from_registry(fonts: FontRegistry, params: ReassembleParams) -> Self {
        Self {
            fonts,
            records: Store::new("text record"),
            rects: Store::new("bounding rectangle"),
            complexes: ComplexStore::new(),
            params,
            origin: None,
            analysis_mark: None,
            out: String::new(),
        }
    }

    pub fn set_quantization_error(&mut self, qe: f64) -> Result<()> {
        validate_quantization_error(qe)?;
        self.params.quantization_error = qe;
        Ok(())
    }

    pub fn set_kerning_options(&mut self, enabled: bool, metrics_mode: MetricsMode, kerning_mode: KerningMode) {
        self.params.kerning = KerningOptions {
            enabled,
            metrics_mode,
            kerning_mode,
        };
    }

    pub fn params(&self) -> &ReassembleParams {
        &self.params
    }

    pub fn resolve_font(&mut self, family: &str, style: &FontStyle) -> Result<FontId> {
        self.fonts.resolve(family, style)
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn rects(&self) -> &RectStore {
        &self.rects
    }

    pub fn complexes(&self) -> &ComplexStore {
        &self.complexes
    }

    pub fn origin(&self) -> Option<RunOrigin> {
        self.origin
    }

    /// True once a chunk has been loaded since the last clear.
    pub fn is_dirty(&self) -> bool {
        self.origin.is_some()
    }

    /// Rectangle computed for record `id`.
    pub fn record_rect(&self, id: RecordId) -> Option<&BoundingRect> {
        self.records.get(id).and_then(|r| self.rects.get(r.rect))
    }

    /// Measures `chunk` and adds it to the current run.
    ///
    /// The first chunk after a clear fixes the run's origin and escapement.
    /// A later chunk with a different escapement fails with
    /// [`ReassembleError::EscapementMismatch`]; the caller is expected to
    /// analyze and flush the run, clear, and load the chunk again. Any error
    /// leaves the session untouched.
    pub fn load_text_chunk(&mut self, chunk: &TextChunk, escapement: f64, flags: LoadFlags) -> Result<RecordId> {
        let origin = match self.origin {
            Some(origin) if origin.escapement != escapement => {
                return Err(ReassembleError::EscapementMismatch {
                    expected: origin.escapement,
                    got: escapement,
                });
            }
            Some(origin) => origin,
            None => RunOrigin {
                x: chunk.x,
                y: chunk.y,
                escapement,
            },
        };

        let placement = self.place(chunk, &origin, flags)?;

        self.records.ensure_insertable()?;
        self.rects.ensure_insertable()?;
        self.reset_analysis();
        let rect = self.rects.push(placement.rect)?;
        let mut style = chunk.style;
        if style.condensed_override {
            style.condensed = NARROW_WIDTH;
        }
        let id = self.records.push(TextRecord {
            text: placement.text,
            encoding: placement.encoding,
            font: chunk.font,
            style,
            x: placement.x,
            y: placement.y,
            orientation: chunk.orientation,
            color: chunk.color,
            alignment: chunk.alignment,
            direction: chunk.direction,
            boff: placement.boff,
            vadvance: None,
            rect,
        })?;
        if let (Some(space), Some(font)) = (placement.space_advance, self.fonts.get_mut(chunk.font)) {
            font.space_advance = Some(space);
        }
        self.origin = Some(origin);

        tracing::trace!(
            record = id.0,
            left = placement.rect.left,
            right = placement.rect.right,
            baseline = placement.y,
            "placed chunk"
        );
        Ok(id)
    }

    fn place(&self, chunk: &TextChunk, origin: &RunOrigin, flags: LoadFlags) -> Result<Placement> {
        let font = self.fonts.get(chunk.font).ok_or_else(|| {
            ReassembleError::InvalidParameter(format!("font {} is not registered", chunk.font))
        })?;
        let face = font.face();
        let options = self.params.kerning;

        let (x, mut y) = apply_matrix_pt(
            escapement_matrix(origin.escapement),
            (chunk.x - origin.x, chunk.y - origin.y),
        );

        let decoded = decode_code_points(&chunk.text);
        if decoded.encoding == TextEncoding::Latin1 {
            tracing::warn!(bytes = chunk.text.len(), "chunk text is not UTF-8, decoded as Latin-1");
        }

        let mut advance = 0.0;
        let mut extent: Option<(i32, i32)> = None;
        let mut x_bearing = None;
        let mut space = None;
        let mut prev = None;
        for &ch in &decoded.chars {
            let glyph = face
                .glyph_metrics(ch, options.metrics_mode)
                .ok_or(ReassembleError::Advance(u32::from(ch)))?;
            let (low, high) = extent.unwrap_or((glyph.y_min, glyph.y_max));
            extent = Some((low.min(glyph.y_min), high.max(glyph.y_max)));
            x_bearing.get_or_insert(glyph.x_min);

            let mut units = glyph.advance;
            if options.enabled
                && let Some(prev) = prev
            {
                units += face.kerning(prev, ch, options.kerning_mode);
            }
            let step = f64::from(units) / SUBPOINT;
            advance += step;
            if ch == ' ' {
                space = Some(step);
            }
            prev = Some(ch);
        }

        let scale = options.point_scale(chunk.font_size());
        let space_advance = match space {
            Some(step) => Some(step * scale),
            None if font.space_advance.is_none() => {
                let glyph = face
                    .glyph_metrics(' ', options.metrics_mode)
                    .ok_or(ReassembleError::Advance(u32::from(' ')))?;
                Some(f64::from(glyph.advance) / SUBPOINT * scale)
            }
            None => None,
        };

        let width = advance * scale;
        let (left, right) = match chunk.alignment.horizontal {
            HAlign::Left => (x, x + width),
            HAlign::Center => (x - width / 2.0, x + width / 2.0),
            HAlign::Right => (x - width, x),
        };

        // Ink extent of this text, not of the whole face.
        let (low, high) = extent.unwrap_or((0, 0));
        let ascent = f64::from(high) / SUBPOINT * scale;
        let descent = f64::from(low) / SUBPOINT * scale;

        // The baseline follows the face's general metrics so neighbouring
        // chunks of one line land on the same baseline.
        let general = font.metrics(options.metrics_mode);
        match chunk.alignment.vertical {
            VAlign::Top => y += f64::from(general.ascender) / SUBPOINT * scale,
            VAlign::Baseline => {}
            VAlign::Bottom if flags.emf_bottom => y -= EMF_BOTTOM_FACTOR * chunk.font_size(),
            VAlign::Bottom => y += f64::from(general.descender) / SUBPOINT * scale,
        }

        let rect = BoundingRect::new(left, y - descent, right, y - ascent)
            .with_x_bearing(f64::from(x_bearing.unwrap_or(0)) / SUBPOINT * scale);

        Ok(Placement {
            text: decoded.as_string(),
            encoding: decoded.encoding,
            x,
            y,
            boff: -descent,
            rect,
            space_advance,
        })
    }

    /// Runs both grouping phases over the loaded chunks.
    pub fn analyze(&mut self) -> Result<usize> {
        analysis::analyze(self)
    }

    /// Forgets the complexes of a previous analysis so it can be redone.
    pub(crate) fn reset_analysis(&mut self) {
        if let Some(mark) = self.analysis_mark.take() {
            self.rects.truncate(mark);
            for record in self.records.values_mut() {
                record.vadvance = None;
            }
        }
        self.complexes.clear();
    }

    pub(crate) fn begin_analysis(&mut self) {
        self.reset_analysis();
        self.analysis_mark = Some(self.rects.len());
    }

    /// Kerning in points between the last character of `prev` and the first
    /// of `current`, measured with `prev`'s face. Zero when kerning is off.
    pub fn kern_gap(&self, prev: RecordId, current: RecordId) -> f64 {
        let options = self.params.kerning;
        if !options.enabled {
            return 0.0;
        }
        let (Some(prev), Some(current)) = (self.records.get(prev), self.records.get(current)) else {
            return 0.0;
        };
        let (Some(left), Some(right)) = (prev.last_char(), current.first_char()) else {
            return 0.0;
        };
        let Some(font) = self.fonts.get(prev.font) else {
            return 0.0;
        };
        let units = font.face().kerning(left, right, options.kerning_mode);
        f64::from(units) / SUBPOINT * options.point_scale(current.font_size())
    }

    /// Appends serialized text, growing the buffer in large steps.
    pub fn append_out(&mut self, text: &str) -> Result<()> {
        if self.out.len() + text.len() > self.out.capacity() {
            self.out
                .try_reserve(OUTPUT_GROWTH.max(text.len()))
                .map_err(|_| ReassembleError::OutOfMemory("output buffer"))?;
        }
        self.out.push_str(text);
        Ok(())
    }

    pub fn output(&self) -> &str {
        &self.out
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.out)
    }

    /// Ends the run: drops chunks, rectangles, complexes and output, keeps
    /// fonts and options.
    pub fn clear(&mut self) {
        self.records.release();
        self.rects.release();
        self.complexes.release();
        self.out = String::new();
        self.origin = None;
        self.analysis_mark = None;
    }

    /// Drops everything, fonts included.
    pub fn release(self) {
        self.fonts.release();
    }

    /// Human-readable listing of every complex and its members.
    pub fn dump(&self) -> String {
        let mut s = String::new();
        let cx = &self.complexes;
        let _ = writeln!(s, "complexes: {}", cx.len());
        let _ = writeln!(s, "phase1: {}", cx.phase1_count());
        let _ = writeln!(s, "lines: {}", cx.line_count());
        let _ = writeln!(s, "paragraphs: {}", cx.paragraph_count());
        for (id, complex) in cx.iter() {
            let r = self.rects.get(complex.rect).copied().unwrap_or_default();
            let _ = writeln!(
                s,
                "cx[{id}] {} rect:{} members:{} ({:.3},{:.3}),({:.3},{:.3})",
                complex.kind.label(),
                complex.rect,
                complex.members.len(),
                r.left,
                r.bottom,
                r.right,
                r.top
            );
            match &complex.members {
                Members::Records(list) => {
                    for (j, record_id) in list.iter().enumerate() {
                        let Some(record) = self.records.get(record_id) else {
                            continue;
                        };
                        let r = self.rects.get(record.rect).copied().unwrap_or_default();
                        let _ = writeln!(
                            s,
                            "  member:{j} record:{record_id} rect:{} ({:8.3},{:8.3}),({:8.3},{:8.3}) text:<{}>",
                            record.rect, r.left, r.bottom, r.right, r.top, record.text
                        );
                    }
                }
                Members::Lines(list) => {
                    for (j, line) in list.iter().enumerate() {
                        let _ = writeln!(s, "  member:{j} complex:{line}");
                    }
                }
            }
        }
        s
    }
}
