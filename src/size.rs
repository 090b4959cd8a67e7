//! # Size Parsing
//!
//! Cell heights and gaps are configured as either a bare number (pixels) or
//! a CSS-like length string such as `"1.5em"`, `"20%"` or `"80"`. Parsing is
//! lenient: anything that doesn't look like a length becomes `0px` instead of
//! an error, so a typo in a dashboard config shrinks a gap rather than taking
//! the page down.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(-?[0-9]+(?:\.[0-9]+)?)([a-z%]*)$").expect("length pattern is valid")
});

/// The pixel unit tag. Everything else needs a measurement collaborator.
pub const PX: &str = "px";

/// A parsed length: magnitude plus a lowercase unit tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeSpec {
    pub magnitude: f64,
    pub unit: String,
}

impl SizeSpec {
    /// A pixel length.
    pub fn px(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: PX.to_string(),
        }
    }

    /// The degraded value for unparseable input.
    pub fn zero() -> Self {
        Self::px(0.0)
    }

    pub fn is_px(&self) -> bool {
        self.unit == PX
    }
}

impl Default for SizeSpec {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}

/// A size as it appears in configuration: a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeValue {
    Number(f64),
    Text(String),
}

impl SizeValue {
    pub fn parse(&self) -> SizeSpec {
        match self {
            SizeValue::Number(n) => parse_number(*n),
            SizeValue::Text(s) => parse_size(s),
        }
    }
}

impl Default for SizeValue {
    fn default() -> Self {
        SizeValue::Number(0.0)
    }
}

impl From<f64> for SizeValue {
    fn from(n: f64) -> Self {
        SizeValue::Number(n)
    }
}

impl From<&str> for SizeValue {
    fn from(s: &str) -> Self {
        SizeValue::Text(s.to_string())
    }
}

fn parse_number(n: f64) -> SizeSpec {
    if n.is_finite() {
        SizeSpec::px(n)
    } else {
        SizeSpec::zero()
    }
}

/// Parse a length string into magnitude and unit.
///
/// A missing unit means pixels. Empty, blank or malformed input yields `0px`.
pub fn parse_size(input: &str) -> SizeSpec {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return SizeSpec::zero();
    }
    let Some(caps) = LENGTH.captures(trimmed) else {
        return SizeSpec::zero();
    };
    let magnitude = match caps[1].parse::<f64>() {
        Ok(n) => n,
        Err(_) => return SizeSpec::zero(),
    };
    let unit = match caps.get(2).map(|m| m.as_str()) {
        Some(u) if !u.is_empty() => u.to_ascii_lowercase(),
        _ => PX.to_string(),
    };
    SizeSpec { magnitude, unit }
}
