//! Layout: chunk placement and reassembly.
//!
//! This module contains:
//! - Chunk and record types with their alignment attributes
//! - Rectangle geometry, padding and the overlap test
//! - The complex store built by analysis
//! - The session owning all stores of one run
//! - Grouping passes (lines, then paragraphs)

pub mod analysis;
pub mod chunk;
pub mod complex;
pub mod geometry;
pub mod params;
pub mod session;

pub use analysis::analyze;
pub use chunk::{Alignment, Direction, HAlign, Rgb, TextChunk, TextChunkBuilder, TextRecord, VAlign};
pub use complex::{Complex, ComplexKind, ComplexStore, Members};
pub use geometry::{BoundingRect, Justification, Padding, RectStore, classify_alignment, overlaps};
pub use params::{KerningOptions, LoadFlags, ReassembleParams};
pub use session::{RecordStore, RunOrigin, Session};
