//! Font resolution and glyph metrics.
//!
//! This module contains:
//! - `backend`: the matcher/rasterizer traits a session measures text through
//! - `registry`: resolved faces keyed by their query string
//! - `system`: installed fonts via `fontdb` + `ttf-parser`
//! - `fixed`: deterministic synthetic metrics for tests and dry runs

pub mod backend;
pub mod fixed;
pub mod registry;
pub mod system;

pub use backend::{
    FaceMetrics, FontBackend, FontFace, FontMatcher, GlyphMetrics, KerningMode, MatchedFont,
    MetricsMode, Rasterizer, DESIGN_EM, SUBPOINT,
};
pub use fixed::{FixedFont, FixedMetrics};
pub use registry::{FontHandle, FontQuery, FontRegistry, FontStyle, weight_to_css};
pub use system::SystemFonts;
