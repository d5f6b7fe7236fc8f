//! Layout analysis: rebuilding lines and paragraphs from placed chunks.
//!
//! Contains the two grouping passes:
//! - Phase 1 merges overlapping chunks into lines
//! - Phase 2 stacks aligned, evenly spaced lines into paragraphs
//!
//! Both passes run over indices only; rectangles that must outlive a later
//! push are copied into the rectangle store first.

mod baseline;
mod lines;
mod paragraphs;

pub use baseline::{BaselineProbe, Track, baseline};
pub use lines::group_lines;
pub use paragraphs::group_paragraphs;

use crate::error::Result;
use crate::layout::session::Session;

/// Runs both phases over the chunks loaded into `session`.
///
/// A previous analysis of the same run is discarded first, so calling this
/// twice gives the same complexes. Returns the total number of complexes.
pub fn analyze(session: &mut Session) -> Result<usize> {
    session.begin_analysis();
    let phase1 = group_lines(session)?;
    let paragraphs = group_paragraphs(session)?;
    tracing::debug!(
        records = session.records.len(),
        phase1,
        lines = session.complexes.line_count(),
        paragraphs,
        "analysis complete"
    );
    Ok(session.complexes.len())
}
