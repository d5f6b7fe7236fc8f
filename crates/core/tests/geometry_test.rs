//! Rectangle union, overlap and alignment classification.

use reassemble_core::layout::{BoundingRect, Justification, Padding, classify_alignment, overlaps};

fn rect(left: f64, right: f64, top: f64, bottom: f64) -> BoundingRect {
    BoundingRect::new(left, bottom, right, top)
}

#[test]
fn union_covers_both_and_is_idempotent() {
    let rects = [
        rect(0.0, 10.0, -5.0, 2.0),
        rect(-3.0, 4.0, 1.0, 9.0),
        rect(20.0, 21.0, -40.0, -30.0),
    ];
    for a in &rects {
        assert_eq!(a.union(a), *a);
        for b in &rects {
            let u = a.union(b);
            assert_eq!(u.left, a.left.min(b.left));
            assert_eq!(u.right, a.right.max(b.right));
            assert_eq!(u.bottom, a.bottom.max(b.bottom));
            assert_eq!(u.top, a.top.min(b.top));
        }
    }
}

#[test]
fn overlap_ignores_translation() {
    let pad = Padding::new(0.5, 0.5, 3.0, 3.0);
    let pairs = [
        (rect(0.0, 50.0, 0.0, 10.0), rect(49.0, 100.0, 0.0, 10.0)),
        (rect(0.0, 50.0, 0.0, 10.0), rect(55.0, 90.0, 0.0, 10.0)),
        (rect(0.0, 50.0, 0.0, 10.0), rect(2.0, 52.0, 0.0, 10.0)),
        (rect(0.0, 50.0, 0.0, 10.0), rect(0.0, 50.0, 30.0, 40.0)),
    ];
    for (dst, src) in pairs {
        let expected = overlaps(&dst, &src, &pad, &pad);
        for (dx, dy) in [(13.0, -7.0), (-250.0, 1000.0), (0.125, 0.0)] {
            let moved = overlaps(&dst.translated(dx, dy), &src.translated(dx, dy), &pad, &pad);
            assert_eq!(moved, expected);
        }
    }
}

#[test]
fn right_to_left_continuation_is_accepted() {
    let dst = rect(50.0, 100.0, 0.0, 10.0);
    let src = rect(0.0, 48.0, 0.0, 10.0);
    let pad = Padding::candidate(0.0, 3.0);
    assert!(overlaps(&dst, &src, &Padding::trailing(0.0, 3.0), &pad));
}

#[test]
fn established_justification_only_collapses() {
    let para = rect(0.0, 40.0, 0.0, 10.0);
    let left = rect(0.0, 20.0, 20.0, 30.0);
    let centered = rect(10.0, 30.0, 20.0, 30.0);
    for current in [Justification::Left, Justification::Center, Justification::Right] {
        for src in [&left, &centered] {
            let found = classify_alignment(&para, src, 1.0, current);
            assert!(found == current || found == Justification::Unknown);
        }
    }
    assert_eq!(classify_alignment(&para, &centered, 1.0, Justification::Unknown), Justification::Center);
}

#[test]
fn alignment_requires_lower_line() {
    let para = rect(0.0, 40.0, 0.0, 10.0);
    let beside = rect(0.0, 40.0, 0.0, 10.0);
    assert_eq!(classify_alignment(&para, &beside, 1.0, Justification::Unknown), Justification::Unknown);
}
