//! # Unit Conversion
//!
//! Pixel lengths pass straight through. Any other unit (`em`, `rem`, `%`,
//! `vh`, ...) has no meaning without a rendering environment, so the engine
//! asks an injected [`MeasureLength`] collaborator. In a browser that is a
//! probe element; headless it is usually a fixed ratio table.

use std::collections::HashMap;

use crate::size::{SizeSpec, PX};

/// Measures a non-pixel length and reports it in pixels.
pub trait MeasureLength {
    /// Returns the rendered pixel size of `magnitude` `unit`, or 0 when the
    /// unit can't be measured.
    fn measure(&self, magnitude: f64, unit: &str) -> f64;
}

impl<F> MeasureLength for F
where
    F: Fn(f64, &str) -> f64,
{
    fn measure(&self, magnitude: f64, unit: &str) -> f64 {
        self(magnitude, unit)
    }
}

/// Resolve a parsed length to pixels.
pub fn to_pixels(size: &SizeSpec, measure: &dyn MeasureLength) -> f64 {
    resolve(size.magnitude, &size.unit, measure)
}

/// Resolve a magnitude/unit pair to pixels.
pub fn resolve(magnitude: f64, unit: &str, measure: &dyn MeasureLength) -> f64 {
    if unit.is_empty() || unit == PX {
        return if magnitude.is_finite() { magnitude } else { 0.0 };
    }
    let px = measure.measure(magnitude, unit);
    // A probe never reports a negative or non-finite height.
    if px.is_finite() && px > 0.0 {
        px
    } else {
        0.0
    }
}

/// Measures nothing. Every non-pixel unit resolves to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMeasure;

impl MeasureLength for NoMeasure {
    fn measure(&self, _magnitude: f64, _unit: &str) -> f64 {
        0.0
    }
}

/// A fixed px-per-unit table, for headless targets.
///
/// Defaults assume a 16px root font and 96 CSS pixels per inch. Relative
/// units with no fixed meaning (`%`, `vh`, `vw`) are absent unless added
/// with [`FixedRatioMeasure::with_ratio`].
#[derive(Debug, Clone)]
pub struct FixedRatioMeasure {
    ratios: HashMap<String, f64>,
}

impl FixedRatioMeasure {
    pub fn new() -> Self {
        let mut ratios = HashMap::new();
        ratios.insert("em".to_string(), 16.0);
        ratios.insert("rem".to_string(), 16.0);
        ratios.insert("ex".to_string(), 8.0);
        ratios.insert("ch".to_string(), 8.0);
        ratios.insert("in".to_string(), 96.0);
        ratios.insert("pt".to_string(), 96.0 / 72.0);
        ratios.insert("pc".to_string(), 16.0);
        ratios.insert("cm".to_string(), 96.0 / 2.54);
        ratios.insert("mm".to_string(), 96.0 / 25.4);
        ratios.insert("q".to_string(), 96.0 / 101.6);
        Self { ratios }
    }

    /// Set (or override) the pixel size of one `unit`.
    pub fn with_ratio(mut self, unit: &str, px_per_unit: f64) -> Self {
        self.ratios.insert(unit.to_ascii_lowercase(), px_per_unit);
        self
    }

    /// Derive `em`/`rem`/`ex`/`ch` from a root font size.
    pub fn with_font_size(self, px: f64) -> Self {
        self.with_ratio("em", px)
            .with_ratio("rem", px)
            .with_ratio("ex", px / 2.0)
            .with_ratio("ch", px / 2.0)
    }
}

impl Default for FixedRatioMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasureLength for FixedRatioMeasure {
    fn measure(&self, magnitude: f64, unit: &str) -> f64 {
        self.ratios
            .get(unit)
            .map(|ratio| magnitude * ratio)
            .unwrap_or(0.0)
    }
}
