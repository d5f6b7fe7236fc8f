//! Font resolution through the registry and the synthetic backend.

use reassemble_core::font::{FixedFont, FixedMetrics, FontRegistry, FontStyle, MetricsMode, weight_to_css};
use reassemble_core::utils::is_narrow_family;
use reassemble_core::{FontId, ReassembleError};

#[test]
fn strict_backend_resolves_registered_families_only() {
    let backend = FixedMetrics::strict().with_font("Mono", FixedFont::new().with_default_advance(0.6));
    let mut registry = FontRegistry::new(backend);
    let mono = registry.resolve("Mono", &FontStyle::default()).unwrap();
    assert_eq!(mono, FontId(0));
    assert_eq!(registry[mono].matched_family(), "Mono");
    assert_eq!(registry[mono].size_pt(), 12.0);

    let err = registry.resolve("Sans", &FontStyle::default()).unwrap_err();
    match err {
        ReassembleError::FontResolution { query, .. } => assert!(query.starts_with("Sans:")),
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(registry.len(), 1);
}

#[test]
fn handles_keep_insertion_order() {
    let mut registry = FontRegistry::new(FixedMetrics::new());
    let sizes = [8.0, 12.0, 9.5, 12.0];
    let ids: Vec<_> = sizes
        .iter()
        .map(|&size| registry.resolve("Serif", &FontStyle::default().with_size(size)).unwrap())
        .collect();
    assert_eq!(ids, vec![FontId(0), FontId(1), FontId(2), FontId(1)]);
    let listed: Vec<_> = registry.iter().map(|(_, h)| h.size_pt()).collect();
    assert_eq!(listed, vec![8.0, 12.0, 9.5]);
}

#[test]
fn face_metrics_ratios() {
    let mut registry = FontRegistry::new(FixedMetrics::new());
    let id = registry.resolve("Serif", &FontStyle::default()).unwrap();
    let handle = &registry[id];
    assert_eq!(handle.space_advance(), 0.0);
    let metrics = handle.metrics(MetricsMode::Unscaled);
    assert_eq!(metrics.ascender, 1792);
    assert_eq!(metrics.descender, -512);
    assert_eq!(metrics.ascent_ratio(), 0.75);
    assert_eq!(metrics.descent_ratio(), 0.25);
}

#[test]
fn style_helpers() {
    assert!(is_narrow_family("Arial Narrow"));
    assert!(!is_narrow_family("Arial"));
    assert_eq!(weight_to_css(50), 300);
    assert_eq!(weight_to_css(180), 600);
}
