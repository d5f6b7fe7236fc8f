//! End-to-end grouping of chunks into lines and paragraphs.

use reassemble_core::font::{FixedFont, FixedMetrics, FontStyle};
use reassemble_core::layout::{ComplexKind, Justification, LoadFlags, Session, TextChunk};
use reassemble_core::{FontId, RecordId};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn font(s: &mut Session, size: f64) -> FontId {
    s.resolve_font("Test", &FontStyle::default().with_size(size)).unwrap()
}

fn load(s: &mut Session, font: FontId, text: &str, x: f64, y: f64, size: f64) -> RecordId {
    let chunk = TextChunk::builder(font, text, x, y).size(size).build();
    s.load_text_chunk(&chunk, 0.0, LoadFlags::default()).unwrap()
}

/// Font whose glyphs are 0.625 em wide, `k` is 0.0625 em and space is empty.
fn narrow_backend() -> FixedMetrics {
    FixedMetrics::new().with_fallback(
        FixedFont::new()
            .with_default_advance(0.625)
            .with_advance('k', 0.0625)
            .with_advance(' ', 0.0),
    )
}

// ============================================================================
// Phase 1
// ============================================================================

#[test]
fn touching_fragments_form_one_line() {
    let mut s = Session::new(narrow_backend());
    let f = font(&mut s, 16.0);
    let a = load(&mut s, f, "abcde", 0.0, 0.0, 16.0);
    let b = load(&mut s, f, "fghijk", 49.0, 0.0, 16.0);
    assert!(approx(s.record_rect(a).unwrap().right, 50.0));
    assert!(approx(s.record_rect(b).unwrap().right, 100.0));

    s.analyze().unwrap();
    let cx = s.complexes();
    assert_eq!(cx.phase1_count(), 1);
    assert_eq!(cx.line_count(), 1);
    let (_, line) = cx.phase1().next().unwrap();
    assert_eq!(line.kind, ComplexKind::Line);
    assert_eq!(line.records().unwrap().as_slice(), &[a, b]);
    let rect = s.rects()[line.rect];
    assert!(approx(rect.left, 0.0));
    assert!(approx(rect.right, 100.0));
}

#[test]
fn font_size_jump_splits_line() {
    let mut s = Session::new(narrow_backend());
    let small = font(&mut s, 16.0);
    let large = font(&mut s, 48.0);
    load(&mut s, small, "abcde", 0.0, 0.0, 16.0);
    load(&mut s, large, "f", 49.0, 0.0, 48.0);

    s.analyze().unwrap();
    let kinds: Vec<_> = s.complexes().phase1().map(|(_, c)| c.kind).collect();
    assert_eq!(kinds, vec![ComplexKind::Text, ComplexKind::Text]);
    assert_eq!(s.complexes().line_count(), 0);
}

#[test]
fn stacked_fragments_do_not_merge() {
    let mut s = Session::new(FixedMetrics::new());
    let f = font(&mut s, 12.0);
    load(&mut s, f, "abcdefgh", 0.0, 0.0, 12.0);
    load(&mut s, f, "abcdefgh", 2.0, 0.0, 12.0);
    s.analyze().unwrap();
    assert_eq!(s.complexes().phase1_count(), 2);
}

#[test]
fn wider_row_below_stays_a_separate_line() {
    for spacing in [12.0, 11.0] {
        let mut s = rows(&[("ab", 0.0, 0.0), ("abcdefgh", 0.0, spacing)]);
        s.analyze().unwrap();
        let cx = s.complexes();
        assert_eq!(cx.phase1_count(), 2);
        assert_eq!(cx.line_count(), 0);
        let (_, para) = cx.paragraphs().next().unwrap();
        assert_eq!(para.kind, ComplexKind::Paragraph(Justification::Left));
        assert_eq!(para.members.len(), 2);
    }
}

// ============================================================================
// Phase 2
// ============================================================================

fn rows(lines: &[(&str, f64, f64)]) -> Session {
    let mut s = Session::new(FixedMetrics::new());
    s.set_quantization_error(0.5).unwrap();
    let f = font(&mut s, 12.0);
    for &(text, x, y) in lines {
        load(&mut s, f, text, x, y, 12.0);
    }
    s
}

#[test]
fn left_aligned_rows_form_paragraph() {
    let mut s = rows(&[("abcd", 0.0, 0.0), ("ab", 0.0, 20.0), ("abcdef", 0.0, 40.0)]);
    let total = s.analyze().unwrap();
    assert_eq!(total, 4);

    let cx = s.complexes();
    assert_eq!(cx.paragraph_count(), 1);
    let (_, para) = cx.paragraphs().next().unwrap();
    assert_eq!(para.kind, ComplexKind::Paragraph(Justification::Left));
    assert_eq!(para.members.len(), 3);

    // ascent 9 plus descent 3 at 12pt
    let v = s.records()[RecordId(0)].vadvance.unwrap();
    assert!((v - 20.0 / 12.0).abs() < 1e-6);
    assert_eq!(s.records()[RecordId(1)].vadvance, None);
}

#[test]
fn misaligned_row_starts_new_paragraph() {
    let mut s = rows(&[("abcd", 0.0, 0.0), ("abcd", 0.0, 20.0), ("ab", 100.0, 40.0)]);
    s.analyze().unwrap();

    let paras: Vec<_> = s.complexes().paragraphs().map(|(_, p)| p.clone()).collect();
    assert_eq!(paras.len(), 2);
    assert_eq!(paras[0].justification(), Some(Justification::Left));
    assert_eq!(paras[0].members.len(), 2);
    assert_eq!(paras[1].justification(), Some(Justification::Unknown));
    assert_eq!(paras[1].members.len(), 1);
}

#[test]
fn justification_never_switches() {
    // row 3 shares the paragraph's center but not its left edge
    let mut s = rows(&[("abcd", 0.0, 0.0), ("abcd", 0.0, 20.0), ("ab", 6.0, 40.0)]);
    s.analyze().unwrap();
    let kinds: Vec<_> = s.complexes().paragraphs().map(|(_, p)| p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ComplexKind::Paragraph(Justification::Left),
            ComplexKind::Paragraph(Justification::Unknown)
        ]
    );
}

#[test]
fn centered_rows_form_centered_paragraph() {
    let mut s = rows(&[("abcdef", 0.0, 0.0), ("abcd", 6.0, 20.0), ("ab", 12.0, 40.0)]);
    s.analyze().unwrap();
    let (_, para) = s.complexes().paragraphs().next().unwrap();
    assert_eq!(para.justification(), Some(Justification::Center));
    assert_eq!(para.members.len(), 3);
}

#[test]
fn right_aligned_rows_form_right_paragraph() {
    let mut s = rows(&[("abcdef", 0.0, 0.0), ("abcd", 12.0, 20.0), ("ab", 24.0, 40.0)]);
    s.analyze().unwrap();
    let cx = s.complexes();
    assert_eq!(cx.paragraph_count(), 1);
    let (_, para) = cx.paragraphs().next().unwrap();
    assert_eq!(para.kind, ComplexKind::Paragraph(Justification::Right));
    assert_eq!(para.members.len(), 3);
    assert!(approx(s.rects()[para.rect].right, 36.0));
}

#[test]
fn line_spacing_is_averaged_over_small_drift() {
    let mut s = rows(&[("abcd", 0.0, 0.0), ("abcd", 0.0, 18.0), ("abcd", 0.0, 36.1)]);
    s.analyze().unwrap();
    assert_eq!(s.complexes().paragraph_count(), 1);

    // third line sits two lines past the first, so it carries half the weight
    let expected = 1.5 * 0.5 + (18.1 / 12.0) * 0.5;
    let v = s.records()[RecordId(0)].vadvance.unwrap();
    assert!((v - expected).abs() < 1e-9);
}

#[test]
fn line_spacing_drift_beyond_one_percent_splits() {
    let mut s = rows(&[("abcd", 0.0, 0.0), ("abcd", 0.0, 18.0), ("abcd", 0.0, 36.3)]);
    s.analyze().unwrap();

    let sizes: Vec<_> = s.complexes().paragraphs().map(|(_, p)| p.members.len()).collect();
    assert_eq!(sizes, vec![2, 1]);
    let v = s.records()[RecordId(0)].vadvance.unwrap();
    assert!(approx(v, 1.5));
}

#[test]
fn rows_out_of_order_never_join() {
    let mut s = rows(&[("abcd", 0.0, 40.0), ("abcd", 0.0, 20.0)]);
    s.analyze().unwrap();
    assert_eq!(s.complexes().paragraph_count(), 2);
}

// ============================================================================
// Re-analysis
// ============================================================================

#[test]
fn analysis_is_deterministic_and_repeatable() {
    let mut s = rows(&[("abcd", 0.0, 0.0), ("efgh", 30.0, 0.0), ("ab", 0.0, 20.0)]);
    let first = s.analyze().unwrap();
    let dump = s.dump();
    let rects = s.rects().len();

    let second = s.analyze().unwrap();
    assert_eq!(first, second);
    assert_eq!(s.dump(), dump);
    assert_eq!(s.rects().len(), rects);
}

#[test]
fn loading_after_analysis_discards_complexes() {
    let mut s = rows(&[("abcd", 0.0, 0.0)]);
    s.analyze().unwrap();
    assert_eq!(s.complexes().len(), 2);
    assert_eq!(s.rects().len(), 3);

    let f = font(&mut s, 12.0);
    load(&mut s, f, "ab", 0.0, 20.0, 12.0);
    assert!(s.complexes().is_empty());
    assert_eq!(s.rects().len(), 2);
}
