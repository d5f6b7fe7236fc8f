//! Rectangles in the run's internal frame.
//!
//! Y grows downward: `bottom` is the larger Y value and `top` the smaller.
//! Every comparison below is written for that convention.

use crate::arena::{RectId, Store};
use crate::error::{ReassembleError, Result};

/// Axis-aligned box around a chunk, a line or a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingRect {
    pub left: f64,
    /// Lower edge on screen, the larger Y.
    pub bottom: f64,
    pub right: f64,
    /// Upper edge on screen, the smaller Y.
    pub top: f64,
    /// Left side bearing of the leftmost glyph.
    pub x_bearing: f64,
}

impl BoundingRect {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
            x_bearing: 0.0,
        }
    }

    pub fn with_x_bearing(mut self, x_bearing: f64) -> Self {
        self.x_bearing = x_bearing;
        self
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            bottom: self.bottom + dy,
            right: self.right + dx,
            top: self.top + dy,
            x_bearing: self.x_bearing,
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            left: self.left.min(other.left),
            bottom: self.bottom.max(other.bottom),
            right: self.right.max(other.right),
            top: self.top.min(other.top),
            x_bearing: if other.left < self.left {
                other.x_bearing
            } else {
                self.x_bearing
            },
        }
    }

    /// True when both edges of `self` lie strictly lower on screen than those of `above`.
    pub fn is_below(&self, above: &Self) -> bool {
        self.top > above.top && self.bottom > above.bottom
    }
}

/// Outward padding applied to a rectangle before an overlap test.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub up: f64,
    pub down: f64,
    pub left: f64,
    pub right: f64,
}

impl Padding {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(up: f64, down: f64, left: f64, right: f64) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }

    /// Padding of a growing line: nothing ahead of it, room for two missing
    /// spaces behind it.
    pub fn trailing(qe: f64, space_advance: f64) -> Self {
        Self::new(qe, qe, 0.0, qe + 2.0 * space_advance)
    }

    /// Padding of a candidate chunk: one space on either side so right-to-left
    /// runs are treated like left-to-right ones.
    pub fn candidate(qe: f64, space_advance: f64) -> Self {
        Self::new(qe, qe, space_advance, space_advance)
    }
}

/// Whether `src` can continue the line held in `dst`.
///
/// The padded rectangles must not be separated on any side. If they touch,
/// the raw rectangles must either leave a gap or be staggered with an
/// intrusion of at most half of the narrower rectangle; fragments stacked
/// on top of each other are not one line.
pub fn overlaps(dst: &BoundingRect, src: &BoundingRect, pad_dst: &Padding, pad_src: &Padding) -> bool {
    let separated = dst.right + pad_dst.right < src.left - pad_src.left
        || dst.left - pad_dst.left > src.right + pad_src.right
        || dst.top - pad_dst.up > src.bottom + pad_src.down
        || dst.bottom + pad_dst.down < src.top - pad_src.up;
    if separated {
        return false;
    }

    if src.left >= dst.right || src.right <= dst.left {
        return true;
    }
    let half = 0.5 * src.width().min(dst.width());
    let trailing = src.right > dst.right && dst.right - src.left <= half;
    let leading = src.left < dst.left && src.right - dst.left <= half;
    trailing || leading
}

/// Justification of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Justification {
    #[default]
    Unknown,
    Left,
    Center,
    Right,
}

impl Justification {
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    pub const fn text_anchor(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Unknown => None,
            Self::Left => Some(("start", "start")),
            Self::Center => Some(("center", "middle")),
            Self::Right => Some(("end", "end")),
        }
    }
}

/// Alignment of line `src` with the paragraph above it.
///
/// Edges are compared within `tolerance`, left first, then right, then
/// centers. Once `current` is known, any other outcome collapses to
/// [`Justification::Unknown`].
pub fn classify_alignment(
    para: &BoundingRect,
    src: &BoundingRect,
    tolerance: f64,
    current: Justification,
) -> Justification {
    let found = if !src.is_below(para) {
        Justification::Unknown
    } else if (para.left - src.left).abs() <= tolerance {
        Justification::Left
    } else if (para.right - src.right).abs() <= tolerance {
        Justification::Right
    } else if (para.center_x() - src.center_x()).abs() <= tolerance {
        Justification::Center
    } else {
        Justification::Unknown
    };

    if current.is_known() && found != current {
        Justification::Unknown
    } else {
        found
    }
}

/// Store of every rectangle a session creates.
pub type RectStore = Store<RectId, BoundingRect>;

impl Store<RectId, BoundingRect> {
    pub fn rect(&self, id: RectId) -> Result<BoundingRect> {
        self.get(id)
            .copied()
            .ok_or_else(|| ReassembleError::Internal(format!("rectangle {id} out of range")))
    }

    /// Copies rectangle `id` into a new slot.
    pub fn duplicate(&mut self, id: RectId) -> Result<RectId> {
        let copy = self.rect(id)?;
        self.push(copy)
    }

    /// Grows `dst` to cover `src`; `src` is unchanged.
    pub fn merge_into(&mut self, dst: RectId, src: RectId) -> Result<()> {
        let src_rect = self.rect(src)?;
        let merged = self.rect(dst)?.union(&src_rect);
        self[dst] = merged;
        Ok(())
    }

    pub fn overlaps(&self, dst: RectId, src: RectId, pad_dst: &Padding, pad_src: &Padding) -> Result<bool> {
        Ok(overlaps(&self.rect(dst)?, &self.rect(src)?, pad_dst, pad_src))
    }
}
