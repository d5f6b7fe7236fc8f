//! Reassembly parameters.
//!
//! Contains ReassembleParams for controlling how text runs are measured and
//! grouped, plus the numeric constants the grouping heuristics are tuned with.

use crate::error::{ReassembleError, Result};
use crate::font::{KerningMode, MetricsMode};

/// Font-size ratio beyond which two neighbouring chunks are never one line.
pub const FONT_SIZE_RATIO_LIMIT: f64 = 2.0;

/// Paragraph alignment tolerance, in multiples of the quantization error.
pub const ALIGNMENT_TOLERANCE_FACTOR: f64 = 3.0;

/// Largest relative change of line spacing still accepted within a paragraph.
pub const VADVANCE_TOLERANCE: f64 = 0.01;

/// Nominal em of the rasterizer's unscaled metrics, in points.
pub const RASTERIZER_EM: f64 = 32.0;

/// Baseline offset of EMF-style bottom alignment, as a fraction of font size.
pub const EMF_BOTTOM_FACTOR: f64 = 0.35;

/// Output buffer growth step in bytes.
pub const OUTPUT_GROWTH: usize = 8192;

/// Kerning behaviour used while measuring chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KerningOptions {
    /// Adds pair kerning between adjacent characters.
    pub enabled: bool,
    pub metrics_mode: MetricsMode,
    pub kerning_mode: KerningMode,
}

impl Default for KerningOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            metrics_mode: MetricsMode::Unscaled,
            kerning_mode: KerningMode::Unscaled,
        }
    }
}

impl KerningOptions {
    /// Factor turning a 1/64 metric of a chunk at `font_size` into points.
    pub fn point_scale(&self, font_size: f64) -> f64 {
        match self.metrics_mode {
            MetricsMode::Unscaled => font_size / RASTERIZER_EM,
            MetricsMode::Scaled => 1.0,
        }
    }
}

/// Parameters for a reassembly session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReassembleParams {
    /// Coordinate rounding the source format may have introduced, in points.
    /// Pads overlap tests and sets the paragraph alignment tolerance.
    pub quantization_error: f64,

    pub kerning: KerningOptions,
}

impl Default for ReassembleParams {
    fn default() -> Self {
        Self {
            quantization_error: 0.0,
            kerning: KerningOptions::default(),
        }
    }
}

impl ReassembleParams {
    /// Creates parameters, rejecting a negative or non-finite quantization error.
    pub fn new(quantization_error: f64, kerning: KerningOptions) -> Result<Self> {
        validate_quantization_error(quantization_error)?;
        Ok(Self {
            quantization_error,
            kerning,
        })
    }

    /// Tolerance for edge alignment between lines of one paragraph.
    pub fn alignment_tolerance(&self) -> f64 {
        ALIGNMENT_TOLERANCE_FACTOR * self.quantization_error
    }
}

pub(crate) fn validate_quantization_error(qe: f64) -> Result<()> {
    if qe.is_finite() && qe >= 0.0 {
        Ok(())
    } else {
        Err(ReassembleError::InvalidParameter(format!(
            "quantization error must be finite and >= 0, got {qe}"
        )))
    }
}

/// Per-load compatibility switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadFlags {
    /// Bottom-aligned text sits `0.35 * size` below its baseline, as EMF
    /// renderers place it, instead of at the font's descender.
    pub emf_bottom: bool,
}

impl LoadFlags {
    pub const EMF_BOTTOM: u32 = 0x01;

    pub const fn from_bits(bits: u32) -> Self {
        Self {
            emf_bottom: bits & Self::EMF_BOTTOM != 0,
        }
    }

    pub const fn bits(self) -> u32 {
        if self.emf_bottom { Self::EMF_BOTTOM } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = ReassembleParams::default();
        assert_eq!(params.quantization_error, 0.0);
        assert!(params.kerning.enabled);
        assert_eq!(params.kerning.metrics_mode, MetricsMode::Unscaled);
        assert_eq!(params.alignment_tolerance(), 0.0);
    }

    #[test]
    fn rejects_bad_quantization_error() {
        assert!(ReassembleParams::new(-0.1, KerningOptions::default()).is_err());
        assert!(ReassembleParams::new(f64::NAN, KerningOptions::default()).is_err());
        let params = ReassembleParams::new(0.5, KerningOptions::default()).unwrap();
        assert_eq!(params.alignment_tolerance(), 1.5);
    }

    #[test]
    fn point_scale_by_mode() {
        let mut kerning = KerningOptions::default();
        assert_eq!(kerning.point_scale(16.0), 0.5);
        kerning.metrics_mode = MetricsMode::Scaled;
        assert_eq!(kerning.point_scale(16.0), 1.0);
    }

    #[test]
    fn flag_bits() {
        assert!(LoadFlags::from_bits(1).emf_bottom);
        assert!(!LoadFlags::from_bits(2).emf_bottom);
        assert_eq!(LoadFlags::from_bits(3).bits(), 1);
    }
}
