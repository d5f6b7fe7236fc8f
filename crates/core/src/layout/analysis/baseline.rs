//! Baseline lookup for complexes.
//!
//! A text complex reports the baseline of its only record. A line reports
//! the baseline of whichever record carries the largest scaled ascent (or
//! descent), which misjudges a line that opens with a full-size superscript;
//! such lines are rare. A paragraph reports the baseline of its last line.

use crate::arena::{ComplexId, RecordId};
use crate::error::{ReassembleError, Result};
use crate::layout::complex::Members;
use crate::layout::session::Session;

/// Which extremum a lookup keeps track of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// Largest part of a font above its baseline.
    Ascent,
    /// Largest part of a font below its baseline.
    Descent,
}

/// Result of a baseline lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineProbe {
    pub baseline: f64,
    /// Running extremum after visiting the complex, in points.
    pub extent: f64,
}

/// Baseline of complex `id` and the tracked extremum, starting from `extent`.
pub fn baseline(session: &Session, id: ComplexId, track: Track, extent: f64) -> Result<BaselineProbe> {
    let complex = session
        .complexes
        .get(id)
        .ok_or_else(|| ReassembleError::Internal(format!("complex {id} out of range")))?;

    match &complex.members {
        Members::Records(list) if list.len() == 1 => {
            let record = list
                .first()
                .ok_or_else(|| ReassembleError::Internal(format!("complex {id} has no records")))?;
            let (base, tmp) = record_extent(session, record, track)?;
            Ok(BaselineProbe {
                baseline: base,
                extent: if extent <= tmp { tmp } else { extent },
            })
        }
        Members::Records(list) => {
            let mut probe = BaselineProbe { baseline: 0.0, extent };
            for record in list.iter().rev() {
                let (base, tmp) = record_extent(session, record, track)?;
                if probe.extent <= tmp {
                    probe = BaselineProbe {
                        baseline: base,
                        extent: tmp,
                    };
                }
            }
            Ok(probe)
        }
        Members::Lines(list) => {
            let last = list
                .last()
                .ok_or_else(|| ReassembleError::Internal(format!("paragraph {id} has no lines")))?;
            baseline(session, last, track, extent)
        }
    }
}

/// Baseline of one record and its scaled ascent or descent.
fn record_extent(session: &Session, id: RecordId, track: Track) -> Result<(f64, f64)> {
    let record = session
        .records
        .get(id)
        .ok_or_else(|| ReassembleError::Internal(format!("record {id} out of range")))?;
    let rect = session.rects.rect(record.rect)?;
    let font = session
        .fonts
        .get(record.font)
        .ok_or_else(|| ReassembleError::Internal(format!("font {} of record {id} is gone", record.font)))?;
    let metrics = font.metrics(session.params.kerning.metrics_mode);
    let ratio = match track {
        Track::Ascent => metrics.ascent_ratio(),
        Track::Descent => metrics.descent_ratio(),
    };
    Ok((rect.bottom - record.boff, record.font_size() * ratio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FixedMetrics, FontStyle};
    use crate::layout::chunk::TextChunk;
    use crate::layout::params::LoadFlags;
    use crate::utils::approx_eq;

    #[test]
    fn line_tracks_largest_font() {
        let mut s = Session::new(FixedMetrics::new());
        let small = s.resolve_font("Test", &FontStyle::default().with_size(10.0)).unwrap();
        let big = s.resolve_font("Test", &FontStyle::default().with_size(16.0)).unwrap();
        let a = TextChunk::builder(small, "ab", 0.0, 2.0).size(10.0).build();
        let b = TextChunk::builder(big, "cd", 10.0, 0.0).size(16.0).build();
        s.load_text_chunk(&a, 0.0, LoadFlags::default()).unwrap();
        s.load_text_chunk(&b, 0.0, LoadFlags::default()).unwrap();
        s.analyze().unwrap();

        let line = ComplexId(0);
        assert_eq!(s.complexes()[line].members.len(), 2);
        let probe = baseline(&s, line, Track::Ascent, 0.0).unwrap();
        // the 16pt record sits 2pt above the run origin; the fixed face's ascent ratio is 0.75
        assert!(approx_eq(probe.baseline, -2.0, 1e-9));
        assert!(approx_eq(probe.extent, 12.0, 1e-9));

        let probe = baseline(&s, line, Track::Descent, 0.0).unwrap();
        assert!(approx_eq(probe.extent, 4.0, 1e-9));
    }

    #[test]
    fn larger_running_extent_is_kept() {
        let mut s = Session::new(FixedMetrics::new());
        let font = s.resolve_font("Test", &FontStyle::default()).unwrap();
        let chunk = TextChunk::builder(font, "a", 0.0, 0.0).size(12.0).build();
        s.load_text_chunk(&chunk, 0.0, LoadFlags::default()).unwrap();
        s.analyze().unwrap();
        let probe = baseline(&s, ComplexId(0), Track::Ascent, 50.0).unwrap();
        assert_eq!(probe.extent, 50.0);
        // paragraphs defer to their last line
        let para = s.complexes().paragraphs().next().map(|(id, _)| id).unwrap();
        let via_para = baseline(&s, para, Track::Ascent, 0.0).unwrap();
        assert!(approx_eq(via_para.extent, 9.0, 1e-9));
    }
}
