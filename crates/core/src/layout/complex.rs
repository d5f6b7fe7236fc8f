//! Reconstructed groups of chunks.
//!
//! Phase 1 builds text/line complexes whose members are records; phase 2
//! builds paragraphs whose members are phase-1 complexes. Both live in one
//! store, phase-1 complexes first.

use std::ops::Index;

use crate::arena::{ChildList, ComplexId, RecordId, RectId, Store};
use crate::error::{ReassembleError, Result};
use crate::layout::geometry::Justification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplexKind {
    /// A single chunk.
    Text,
    /// Two or more chunks on one visual line.
    Line,
    Paragraph(Justification),
}

impl ComplexKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Line => "LINE",
            Self::Paragraph(Justification::Unknown) => "PARA_UJ",
            Self::Paragraph(Justification::Left) => "PARA_LJ",
            Self::Paragraph(Justification::Center) => "PARA_CJ",
            Self::Paragraph(Justification::Right) => "PARA_RJ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Members {
    Records(ChildList<RecordId>),
    Lines(ChildList<ComplexId>),
}

impl Members {
    pub fn len(&self) -> usize {
        match self {
            Self::Records(list) => list.len(),
            Self::Lines(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    pub kind: ComplexKind,
    pub members: Members,
    /// Union of every member's rectangle, owned by this complex.
    pub rect: RectId,
}

impl Complex {
    pub fn records(&self) -> Option<&ChildList<RecordId>> {
        match &self.members {
            Members::Records(list) => Some(list),
            Members::Lines(_) => None,
        }
    }

    pub fn lines(&self) -> Option<&ChildList<ComplexId>> {
        match &self.members {
            Members::Lines(list) => Some(list),
            Members::Records(_) => None,
        }
    }

    pub fn is_paragraph(&self) -> bool {
        matches!(self.kind, ComplexKind::Paragraph(_))
    }

    pub fn justification(&self) -> Option<Justification> {
        match self.kind {
            ComplexKind::Paragraph(j) => Some(j),
            _ => None,
        }
    }
}

/// Complexes of one run plus the counters of the last analysis.
#[derive(Debug, Clone)]
pub struct ComplexStore {
    items: Store<ComplexId, Complex>,
    phase1: usize,
    lines: usize,
    paragraphs: usize,
}

impl Default for ComplexStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplexStore {
    pub const fn new() -> Self {
        Self {
            items: Store::new("complex"),
            phase1: 0,
            lines: 0,
            paragraphs: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ComplexId) -> Option<&Complex> {
        self.items.get(id)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (ComplexId, &Complex)> {
        self.items.iter()
    }

    /// Number of complexes built by phase 1.
    pub fn phase1_count(&self) -> usize {
        self.phase1
    }

    /// Phase-1 complexes holding more than one chunk.
    pub fn line_count(&self) -> usize {
        self.lines
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs
    }

    /// Phase-1 complexes in creation order.
    pub fn phase1(&self) -> impl Iterator<Item = (ComplexId, &Complex)> {
        self.items.iter().take(self.phase1)
    }

    /// Paragraphs in creation order, empty until phase 2 has run.
    pub fn paragraphs(&self) -> impl Iterator<Item = (ComplexId, &Complex)> {
        self.items.iter().skip(self.phase1)
    }

    /// Opens a text complex around `record`, owning rectangle `rect`.
    pub fn open_text(&mut self, record: RecordId, rect: RectId) -> Result<ComplexId> {
        self.items.push(Complex {
            kind: ComplexKind::Text,
            members: Members::Records(ChildList::single(record)),
            rect,
        })
    }

    /// Opens an unjustified paragraph around phase-1 complex `line`.
    pub fn open_paragraph(&mut self, line: ComplexId, rect: RectId) -> Result<ComplexId> {
        let id = self.items.push(Complex {
            kind: ComplexKind::Paragraph(Justification::Unknown),
            members: Members::Lines(ChildList::single(line)),
            rect,
        })?;
        self.paragraphs += 1;
        Ok(id)
    }

    /// Adds `record` to a text or line complex, making it a line.
    pub fn append_record(&mut self, id: ComplexId, record: RecordId) -> Result<()> {
        let complex = self.complex_mut(id)?;
        let Members::Records(list) = &mut complex.members else {
            return Err(ReassembleError::Internal(format!(
                "complex {id} is a paragraph, cannot take record {record}"
            )));
        };
        list.push(record)?;
        if complex.kind == ComplexKind::Text {
            complex.kind = ComplexKind::Line;
            self.lines += 1;
        }
        Ok(())
    }

    /// Adds phase-1 complex `line` to a paragraph and commits its justification.
    pub fn append_line(&mut self, id: ComplexId, line: ComplexId, justification: Justification) -> Result<()> {
        let complex = self.complex_mut(id)?;
        let Members::Lines(list) = &mut complex.members else {
            return Err(ReassembleError::Internal(format!(
                "complex {id} is not a paragraph, cannot take line {line}"
            )));
        };
        list.push(line)?;
        complex.kind = ComplexKind::Paragraph(justification);
        Ok(())
    }

    pub(crate) fn finish_phase1(&mut self) {
        self.phase1 = self.items.len();
    }

    fn complex_mut(&mut self, id: ComplexId) -> Result<&mut Complex> {
        self.items
            .get_mut(id)
            .ok_or_else(|| ReassembleError::Internal(format!("complex {id} out of range")))
    }

    /// Drops every complex and resets the counters.
    pub fn clear(&mut self) {
        self.items.clear();
        self.phase1 = 0;
        self.lines = 0;
        self.paragraphs = 0;
    }

    pub fn release(&mut self) {
        self.clear();
        self.items.release();
    }
}

impl Index<ComplexId> for ComplexStore {
    type Output = Complex;

    fn index(&self, id: ComplexId) -> &Complex {
        &self.items[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_record_makes_a_line() {
        let mut store = ComplexStore::new();
        let c = store.open_text(RecordId(0), RectId(5)).unwrap();
        assert_eq!(store[c].kind, ComplexKind::Text);
        store.append_record(c, RecordId(1)).unwrap();
        store.append_record(c, RecordId(2)).unwrap();
        assert_eq!(store[c].kind, ComplexKind::Line);
        assert_eq!(store.line_count(), 1);
        assert_eq!(store[c].members.len(), 3);
    }

    #[test]
    fn paragraphs_follow_phase1() {
        let mut store = ComplexStore::new();
        let a = store.open_text(RecordId(0), RectId(2)).unwrap();
        let b = store.open_text(RecordId(1), RectId(3)).unwrap();
        store.finish_phase1();
        let p = store.open_paragraph(a, RectId(4)).unwrap();
        store.append_line(p, b, Justification::Left).unwrap();
        assert_eq!(store.phase1_count(), 2);
        assert_eq!(store.paragraph_count(), 1);
        let paras: Vec<_> = store.paragraphs().map(|(id, _)| id).collect();
        assert_eq!(paras, vec![p]);
        assert_eq!(store[p].kind.label(), "PARA_LJ");
        assert_eq!(store[p].lines().unwrap().as_slice(), &[a, b]);
    }

    #[test]
    fn mismatched_members_are_internal_errors() {
        let mut store = ComplexStore::new();
        let a = store.open_text(RecordId(0), RectId(0)).unwrap();
        assert!(matches!(
            store.append_line(a, a, Justification::Left),
            Err(ReassembleError::Internal(_))
        ));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.phase1_count(), 0);
    }
}
