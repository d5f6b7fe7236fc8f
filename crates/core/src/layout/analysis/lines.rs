//! Phase 1: chunks into lines.
//!
//! Chunks are visited in load order. Each opens a text complex that keeps
//! absorbing the following chunks while they overlap it, allowing for up to
//! two missing spaces after the growing line and one around the candidate.
//! A font-size jump of more than a factor two always ends the line; such
//! jumps come from formulas (a large integral sign beside the operands)
//! rather than running text.

use crate::arena::{RecordId, RectId};
use crate::error::Result;
use crate::layout::geometry::Padding;
use crate::layout::params::FONT_SIZE_RATIO_LIMIT;
use crate::layout::session::Session;

/// Groups every loaded chunk into text and line complexes.
///
/// Returns the number of complexes created.
pub fn group_lines(session: &mut Session) -> Result<usize> {
    let qe = session.params.quantization_error;
    let count = session.records.len();

    let mut i = 0;
    while i < count {
        let first = RecordId(i);
        let (first_rect, first_size, first_space) = chunk_info(session, first);
        let dst = session.rects.duplicate(first_rect)?;
        let complex = session.complexes.open_text(first, dst)?;
        let mut pad_dst = Padding::trailing(qe, first_space);

        let mut j = i + 1;
        while j < count {
            let candidate = RecordId(j);
            let (src, size, space) = chunk_info(session, candidate);
            let ratio = size / first_size;
            if !(1.0 / FONT_SIZE_RATIO_LIMIT..=FONT_SIZE_RATIO_LIMIT).contains(&ratio) {
                tracing::trace!(record = j, ratio, "font size jump ends line");
                break;
            }

            let pad_src = Padding::candidate(qe, space);
            if !session.rects.overlaps(dst, src, &pad_dst, &pad_src)? {
                break;
            }
            session.complexes.append_record(complex, candidate)?;
            session.rects.merge_into(dst, src)?;
            pad_dst = Padding::trailing(qe, space);
            tracing::trace!(complex = complex.0, record = j, "chunk joins line");
            j += 1;
        }
        i = j;
    }

    session.complexes.finish_phase1();
    Ok(session.complexes.phase1_count())
}

/// Rectangle, font size and cached space advance of a record.
fn chunk_info(session: &Session, id: RecordId) -> (RectId, f64, f64) {
    let record = &session.records[id];
    let space = session
        .fonts
        .get(record.font)
        .map_or(0.0, |font| font.space_advance());
    (record.rect, record.font_size(), space)
}
