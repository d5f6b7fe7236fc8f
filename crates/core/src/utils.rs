//! Miscellaneous routines.
//!
//! Provides the small shared helpers used across the crate:
//! - Geometric types (Point, Matrix) and the run rotation
//! - Float comparison
//! - Markup escaping and font-name probing

use std::borrow::Cow;

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// A 6-element affine transformation matrix (a, b, c, d, e, f).
/// Transforms point (x, y) to (ax + cy + e, bx + dy + f).
pub type Matrix = (f64, f64, f64, f64, f64, f64);

/// Identity transformation matrix.
pub const MATRIX_IDENTITY: Matrix = (1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

/// Compares two floats for approximate equality.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Applies a matrix to a point.
pub fn apply_matrix_pt(m: Matrix, v: Point) -> Point {
    let (a, b, c, d, e, f) = m;
    let (x, y) = v;
    (a * x + c * y + e, b * x + d * y + f)
}

/// Rotation taking page coordinates into the internal frame of a run.
///
/// Y grows downward, so a positive escapement turns clockwise on screen.
pub fn escapement_matrix(degrees: f64) -> Matrix {
    if degrees == 0.0 {
        return MATRIX_IDENTITY;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    (cos, sin, -sin, cos, 0.0, 0.0)
}

/// Encodes a string for SGML/XML/HTML by escaping special characters.
///
/// Returns `Cow::Borrowed` if no escaping needed (zero allocation),
/// or `Cow::Owned` with escaped string (single allocation).
pub fn enc(x: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(x)
}

/// Case-insensitive substring search, returning the byte offset of the first match.
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

/// True when a family name advertises a narrow cut ("Arial Narrow").
///
/// Such names imply a condensed width even when the caller never set one.
pub fn is_narrow_family(name: &str) -> bool {
    find_case_insensitive(name, "narrow").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapement_zero_is_identity() {
        assert_eq!(escapement_matrix(0.0), MATRIX_IDENTITY);
        assert_eq!(apply_matrix_pt(MATRIX_IDENTITY, (3.0, 4.0)), (3.0, 4.0));
    }

    #[test]
    fn escapement_quarter_turn() {
        let (x, y) = apply_matrix_pt(escapement_matrix(90.0), (10.0, 0.0));
        assert!(approx_eq(x, 0.0, 1e-9));
        assert!(approx_eq(y, 10.0, 1e-9));
    }

    #[test]
    fn narrow_detection_ignores_case() {
        assert!(is_narrow_family("Arial Narrow"));
        assert!(is_narrow_family("arial NARROW bold"));
        assert!(!is_narrow_family("Arial"));
        assert_eq!(find_case_insensitive("Liberation Sans", "SANS"), Some(11));
    }

    #[test]
    fn enc_escapes_markup() {
        assert_eq!(enc("a<b&c"), "a&lt;b&amp;c");
        assert!(matches!(enc("plain"), Cow::Borrowed(_)));
    }
}
