//! JSON listing of an analyzed run.

use serde::Serialize;

use reassemble_core::RectId;
use reassemble_core::layout::{BoundingRect, Members, Session};

#[derive(Debug, Serialize)]
pub struct RunDump {
    pub escapement: f64,
    pub origin: [f64; 2],
    pub phase1: usize,
    pub lines: usize,
    pub paragraphs: usize,
    pub records: Vec<RecordDump>,
    pub complexes: Vec<ComplexDump>,
}

#[derive(Debug, Serialize)]
pub struct RecordDump {
    pub id: usize,
    pub text: String,
    pub font: String,
    pub size: f64,
    pub rect: RectDump,
    pub baseline: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vadvance: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ComplexDump {
    pub id: usize,
    pub kind: &'static str,
    pub rect: RectDump,
    /// Record ids for lines, phase-1 complex ids for paragraphs.
    pub members: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct RectDump {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl From<BoundingRect> for RectDump {
    fn from(r: BoundingRect) -> Self {
        Self {
            left: r.left,
            top: r.top,
            right: r.right,
            bottom: r.bottom,
        }
    }
}

impl RunDump {
    pub fn capture(session: &Session) -> Self {
        let origin = session.origin();
        let rect_of = |id: RectId| session.rects().get(id).copied().unwrap_or_default();

        let records = session
            .records()
            .iter()
            .map(|(id, record)| {
                let rect = rect_of(record.rect);
                RecordDump {
                    id: id.0,
                    text: record.text.clone(),
                    font: session
                        .fonts()
                        .get(record.font)
                        .map(|font| font.query().to_string())
                        .unwrap_or_default(),
                    size: record.font_size(),
                    rect: rect.into(),
                    baseline: rect.bottom - record.boff,
                    vadvance: record.vadvance,
                }
            })
            .collect();

        let complexes = session
            .complexes()
            .iter()
            .map(|(id, complex)| ComplexDump {
                id: id.0,
                kind: complex.kind.label(),
                rect: rect_of(complex.rect).into(),
                members: match &complex.members {
                    Members::Records(list) => list.iter().map(|r| r.0).collect(),
                    Members::Lines(list) => list.iter().map(|c| c.0).collect(),
                },
            })
            .collect();

        let cx = session.complexes();
        Self {
            escapement: origin.map_or(0.0, |o| o.escapement),
            origin: origin.map_or([0.0, 0.0], |o| [o.x, o.y]),
            phase1: cx.phase1_count(),
            lines: cx.line_count(),
            paragraphs: cx.paragraph_count(),
            records,
            complexes,
        }
    }
}
