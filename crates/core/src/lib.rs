//! reassemble - rebuilds lines and paragraphs from positioned text fragments.
//!
//! Metafile text arrives as independently placed chunks. A [`Session`]
//! measures each chunk with a font backend, [`analyze`] groups the chunks
//! into lines and the lines into justified paragraphs, and [`emit_svg`]
//! writes the result as editable SVG text.

pub mod arena;
pub mod codec;
pub mod converter;
pub mod error;
pub mod font;
pub mod layout;
pub mod utils;

pub use arena::{ComplexId, FontId, RecordId, RectId};
pub use converter::{SvgConverter, emit_svg, svg_document_footer, svg_document_header};
pub use error::{ReassembleError, Result};
pub use font::{
    FixedFont, FixedMetrics, FontBackend, FontRegistry, FontStyle, KerningMode, MetricsMode,
    SystemFonts,
};
pub use layout::{
    Alignment, BoundingRect, ComplexKind, Direction, HAlign, Justification, KerningOptions,
    LoadFlags, ReassembleParams, Rgb, RunOrigin, Session, TextChunk, TextRecord, VAlign, analyze,
};
