//! Output converters for reassembled text.
//!
//! - SvgConverter: one `<text>` element per paragraph with line and chunk tspans

mod svg;

pub use svg::{DEFAULT_LINE_HEIGHT, PX_PER_PT, SvgConverter, emit_svg, svg_document_footer, svg_document_header};
