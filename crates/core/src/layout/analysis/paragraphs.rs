//! Phase 2: lines into paragraphs.
//!
//! Every phase-1 complex opens a paragraph that absorbs the following ones
//! while they sit below it, share its left, right or center edge, and keep
//! the same line spacing. The spacing is stored as a multiple of the
//! tallest ascent plus descent on the paragraph's first record.

use crate::arena::{ComplexId, RecordId};
use crate::error::{ReassembleError, Result};
use crate::layout::analysis::baseline::{Track, baseline};
use crate::layout::geometry::{Justification, classify_alignment};
use crate::layout::params::VADVANCE_TOLERANCE;
use crate::layout::session::Session;

/// Groups the phase-1 complexes into paragraphs.
///
/// Returns the number of paragraphs created.
pub fn group_paragraphs(session: &mut Session) -> Result<usize> {
    let phase1 = session.complexes.phase1_count();
    let tolerance = session.params.alignment_tolerance();

    let mut i = 0;
    while i < phase1 {
        let first = ComplexId(i);
        let dst = session.rects.duplicate(session.complexes[first].rect)?;
        let para = session.complexes.open_paragraph(first, dst)?;
        let mut justification = Justification::Unknown;

        let mut j = i + 1;
        while j < phase1 {
            let candidate = ComplexId(j);
            let src = session.complexes[candidate].rect;
            let found = classify_alignment(
                &session.rects.rect(dst)?,
                &session.rects.rect(src)?,
                tolerance,
                justification,
            );
            if !found.is_known() {
                break;
            }
            if !check_set_vadvance(session, para, candidate, j - i)? {
                tracing::trace!(paragraph = para.0, line = j, "line spacing changes, paragraph ends");
                break;
            }
            session.complexes.append_line(para, candidate, found)?;
            session.rects.merge_into(dst, src)?;
            justification = found;
            tracing::trace!(paragraph = para.0, line = j, ?found, "line joins paragraph");
            j += 1;
        }
        i = j;
    }

    Ok(session.complexes.paragraph_count())
}

/// Checks `candidate` against the line spacing of paragraph `para`, or
/// records it when `para` has a single line so far.
///
/// `distance` is how many phase-1 complexes `candidate` lies past the
/// paragraph's first line; later lines move the running average less.
/// Returns false when the candidate does not fit.
pub(crate) fn check_set_vadvance(
    session: &mut Session,
    para: ComplexId,
    candidate: ComplexId,
    distance: usize,
) -> Result<bool> {
    let prev = baseline(session, para, Track::Descent, 0.0)?;
    let this = baseline(session, candidate, Track::Ascent, 0.0)?;
    let height = this.extent + prev.extent;
    if !height.is_finite() || height <= 0.0 {
        return Ok(false);
    }
    let advance = (this.baseline - prev.baseline) / height;

    let holder = spacing_holder(session, para)?;
    let record = session
        .records
        .get_mut(holder)
        .ok_or_else(|| ReassembleError::Internal(format!("record {holder} out of range")))?;
    match record.vadvance {
        Some(current) if (1.0 - current / advance).abs() > VADVANCE_TOLERANCE => Ok(false),
        Some(current) => {
            let weight = 1.0 / distance as f64;
            record.vadvance = Some(current * (1.0 - weight) + advance * weight);
            Ok(true)
        }
        None => {
            record.vadvance = Some(advance);
            Ok(true)
        }
    }
}

/// First record of the paragraph's first line.
fn spacing_holder(session: &Session, para: ComplexId) -> Result<RecordId> {
    let missing = || ReassembleError::Internal(format!("paragraph {para} has no first record"));
    let line = session.complexes[para]
        .lines()
        .and_then(|lines| lines.first())
        .ok_or_else(missing)?;
    session.complexes[line]
        .records()
        .and_then(|records| records.first())
        .ok_or_else(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FixedMetrics, FontStyle};
    use crate::layout::chunk::TextChunk;
    use crate::layout::params::LoadFlags;
    use crate::utils::approx_eq;

    fn rows(ys: &[f64]) -> Session {
        let mut s = Session::new(FixedMetrics::new());
        let font = s.resolve_font("Test", &FontStyle::default()).unwrap();
        for &y in ys {
            let chunk = TextChunk::builder(font, "line", 0.0, y).size(12.0).build();
            s.load_text_chunk(&chunk, 0.0, LoadFlags::default()).unwrap();
        }
        s.set_quantization_error(0.5).unwrap();
        s
    }

    #[test]
    fn evenly_spaced_rows_form_one_paragraph() {
        let mut s = rows(&[0.0, 18.0, 36.0]);
        s.analyze().unwrap();
        assert_eq!(s.complexes().paragraph_count(), 1);
        let (_, para) = s.complexes().paragraphs().next().unwrap();
        assert_eq!(para.justification(), Some(Justification::Left));
        assert_eq!(para.members.len(), 3);
        // ascent 9 + descent 3 at 12pt, baselines 18 apart
        let v = s.records()[RecordId(0)].vadvance.unwrap();
        assert!(approx_eq(v, 1.5, 1e-9));
    }

    #[test]
    fn spacing_change_splits_paragraph() {
        let mut s = rows(&[0.0, 18.0, 50.0]);
        s.analyze().unwrap();
        assert_eq!(s.complexes().paragraph_count(), 2);
        let sizes: Vec<_> = s.complexes().paragraphs().map(|(_, p)| p.members.len()).collect();
        assert_eq!(sizes, vec![2, 1]);
        assert_eq!(s.records()[RecordId(2)].vadvance, None);
    }
}
