//! Axis contract consumed by the value translator.
//!
//! The engine never assumes linearity: every value delta is obtained by
//! round-tripping through `to_pixels` / `to_value`, so any scale that is
//! inverse-consistent works. Two reference scales are provided for hosts
//! that do not bring their own.

use serde::{Deserialize, Serialize};

/// Which chart coordinate a field maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    X,
    Y,
}

impl AxisKind {
    /// Upper-case suffix used by option keys (`draggableX`, `dragMinY`).
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
        }
    }
}

/// Pixel ↔ value conversion for one chart axis.
///
/// Implementations must be inverse-consistent:
/// `to_value(to_pixels(v, p), p) ≈ v`.
pub trait Axis {
    fn to_pixels(&self, value: f64, ignore_padding: bool) -> f64;
    fn to_value(&self, pixel: f64, ignore_padding: bool) -> f64;
    /// Values grow against the natural screen direction.
    fn is_reversed(&self) -> bool;
    /// Laid out along the screen's x direction. On inverted charts the
    /// x axis is vertical and this returns `false`.
    fn is_horizontal(&self) -> bool;
    /// Category axes snap dragged values to whole categories by default.
    fn has_categories(&self) -> bool {
        false
    }
}

/// Screen placement shared by the reference scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisPlacement {
    /// Pixel where the axis starts (left for horizontal, top for vertical).
    pub start_px: f64,
    /// Axis length in pixels.
    pub length_px: f64,
    pub horizontal: bool,
    #[serde(default)]
    pub reversed: bool,
    /// Extra pixels added at both ends unless the caller ignores padding.
    #[serde(default)]
    pub padding_px: f64,
}

impl AxisPlacement {
    /// Fraction along the axis (0 at `start_px`) for a normalized position.
    fn orient(&self, frac: f64) -> f64 {
        // Vertical axes grow upwards, i.e. against screen y.
        if self.horizontal == self.reversed { 1.0 - frac } else { frac }
    }

    fn usable(&self, ignore_padding: bool) -> (f64, f64) {
        let pad = if ignore_padding { 0.0 } else { self.padding_px };
        (self.start_px + pad, (self.length_px - 2.0 * pad).max(1e-9))
    }

    fn frac_to_px(&self, frac: f64, ignore_padding: bool) -> f64 {
        let (start, len) = self.usable(ignore_padding);
        start + self.orient(frac) * len
    }

    fn px_to_frac(&self, px: f64, ignore_padding: bool) -> f64 {
        let (start, len) = self.usable(ignore_padding);
        self.orient((px - start) / len)
    }
}

/// Linear value scale, optionally with categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearAxis {
    pub min: f64,
    pub max: f64,
    pub placement: AxisPlacement,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl LinearAxis {
    pub fn new(min: f64, max: f64, placement: AxisPlacement) -> Self {
        let max = if (max - min).abs() < 1e-12 { min + 1.0 } else { max };
        Self { min, max, placement, categories: Vec::new() }
    }

    pub fn horizontal(min: f64, max: f64, start_px: f64, length_px: f64) -> Self {
        Self::new(
            min,
            max,
            AxisPlacement { start_px, length_px, horizontal: true, reversed: false, padding_px: 0.0 },
        )
    }

    pub fn vertical(min: f64, max: f64, start_px: f64, length_px: f64) -> Self {
        Self::new(
            min,
            max,
            AxisPlacement { start_px, length_px, horizontal: false, reversed: false, padding_px: 0.0 },
        )
    }

    pub fn reversed(mut self) -> Self {
        self.placement.reversed = true;
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

impl Axis for LinearAxis {
    fn to_pixels(&self, value: f64, ignore_padding: bool) -> f64 {
        let frac = (value - self.min) / (self.max - self.min);
        self.placement.frac_to_px(frac, ignore_padding)
    }

    fn to_value(&self, pixel: f64, ignore_padding: bool) -> f64 {
        self.min + self.placement.px_to_frac(pixel, ignore_padding) * (self.max - self.min)
    }

    fn is_reversed(&self) -> bool {
        self.placement.reversed
    }

    fn is_horizontal(&self) -> bool {
        self.placement.horizontal
    }

    fn has_categories(&self) -> bool {
        !self.categories.is_empty()
    }
}

/// Base-10 logarithmic value scale.
#[derive(Debug, Clone, PartialEq)]
pub struct LogAxis {
    log_min: f64,
    log_max: f64,
    pub placement: AxisPlacement,
}

impl LogAxis {
    /// Non-positive bounds are clamped into a valid log range.
    pub fn new(min: f64, max: f64, placement: AxisPlacement) -> Self {
        let eps = 1e-12;
        let min = if min <= eps { eps } else { min };
        let max = if max <= min { min * 10.0 } else { max };
        Self { log_min: min.log10(), log_max: max.log10(), placement }
    }
}

impl Axis for LogAxis {
    fn to_pixels(&self, value: f64, ignore_padding: bool) -> f64 {
        let frac = (value.max(1e-12).log10() - self.log_min) / (self.log_max - self.log_min);
        self.placement.frac_to_px(frac, ignore_padding)
    }

    fn to_value(&self, pixel: f64, ignore_padding: bool) -> f64 {
        let frac = self.placement.px_to_frac(pixel, ignore_padding);
        10f64.powf(self.log_min + frac * (self.log_max - self.log_min))
    }

    fn is_reversed(&self) -> bool {
        self.placement.reversed
    }

    fn is_horizontal(&self) -> bool {
        self.placement.horizontal
    }
}
