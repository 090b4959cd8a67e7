//! # Grid Model Types
//!
//! The input representation for the engine: grid configuration, widget
//! placement requests, and the placed items themselves. Configuration is
//! plain JSON-friendly data so a dashboard can be described in a file, sent
//! from JavaScript, or built directly in Rust.

use serde::{Deserialize, Serialize};

use crate::geometry::GridRect;
use crate::size::{SizeSpec, SizeValue};

/// Opaque handle for a node in the widget tree. Items are nodes too, so a
/// placed widget is identified by the same handle it was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// A placed widget: grid coordinates plus span. `w` and `h` are never 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridItem {
    pub id: WidgetId,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl GridItem {
    pub fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.w, self.h)
    }
}

/// A placement or update request. Every field is optional.
///
/// Values are signed so out-of-range requests can be clamped rather than
/// rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetOptions {
    #[serde(default)]
    pub x: Option<i64>,
    #[serde(default)]
    pub y: Option<i64>,
    #[serde(default)]
    pub w: Option<i64>,
    #[serde(default)]
    pub h: Option<i64>,
}

impl WidgetOptions {
    /// Explicit position and size.
    pub fn at(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            w: Some(w),
            h: Some(h),
        }
    }

    /// Size only; the position is found by auto-placement.
    pub fn sized(w: i64, h: i64) -> Self {
        Self {
            w: Some(w),
            h: Some(h),
            ..Default::default()
        }
    }

    pub fn x(mut self, x: i64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn y(mut self, y: i64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn w(mut self, w: i64) -> Self {
        self.w = Some(w);
        self
    }

    pub fn h(mut self, h: i64) -> Self {
        self.h = Some(h);
        self
    }

    /// Fill fields missing here from `preset`.
    pub fn or(self, preset: WidgetOptions) -> Self {
        Self {
            x: self.x.or(preset.x),
            y: self.y.or(preset.y),
            w: self.w.or(preset.w),
            h: self.h.or(preset.h),
        }
    }
}

// ── Configuration ─────────────────────────────────────────────

/// Grid configuration as accepted at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    /// Column count. 0 means the default of 12.
    #[serde(default = "default_columns")]
    pub columns: u32,

    /// Row cap. `None` leaves the grid unbounded downwards.
    #[serde(default)]
    pub rows: Option<u32>,

    /// Gap between adjacent cells, not applied at the outer edge.
    #[serde(default, alias = "gap")]
    pub margin: SizeValue,

    /// Row height.
    #[serde(default = "default_cell_height")]
    pub cell_height: SizeValue,

    /// Optional trailing strip with its own nested grid.
    #[serde(default)]
    pub secondary_region: Option<SecondaryRegionSpec>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            rows: None,
            margin: SizeValue::default(),
            cell_height: default_cell_height(),
            secondary_region: None,
        }
    }
}

fn default_columns() -> u32 {
    12
}

fn default_cell_height() -> SizeValue {
    SizeValue::Number(80.0)
}

/// Column count with the "0 means default" rule applied.
pub(crate) fn normalize_columns(columns: u32) -> u32 {
    if columns == 0 {
        default_columns()
    } else {
        columns
    }
}

impl GridConfig {
    pub fn with_columns(mut self, columns: u32) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn with_margin(mut self, margin: impl Into<SizeValue>) -> Self {
        self.margin = margin.into();
        self
    }

    pub fn with_cell_height(mut self, cell_height: impl Into<SizeValue>) -> Self {
        self.cell_height = cell_height.into();
        self
    }

    pub fn with_secondary_region(mut self, spec: SecondaryRegionSpec) -> Self {
        self.secondary_region = Some(spec);
        self
    }

    /// Parsed sizes and normalized counts for a [`crate::grid::GridModel`].
    pub fn settings(&self) -> GridSettings {
        GridSettings {
            columns: normalize_columns(self.columns),
            rows: self.rows,
            cell_height: self.cell_height.parse(),
            margin: self.margin.parse(),
        }
    }

    /// The secondary region with defaults filled in, if one is enabled.
    pub fn secondary(&self) -> Option<SecondaryRegionConfig> {
        self.secondary_region.as_ref().and_then(SecondaryRegionSpec::normalize)
    }
}

/// The geometry parameters of one grid, sizes already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSettings {
    pub columns: u32,
    pub rows: Option<u32>,
    pub cell_height: SizeSpec,
    pub margin: SizeSpec,
}

/// `true` for a default region, or an object overriding some defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecondaryRegionSpec {
    Enabled(bool),
    Custom(SecondaryRegionOptions),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryRegionOptions {
    #[serde(default)]
    pub columns: Option<u32>,
    #[serde(default)]
    pub rows: Option<u32>,
    #[serde(default)]
    pub cell_height: Option<SizeValue>,
    #[serde(default)]
    pub margin: Option<SizeValue>,
    #[serde(default, alias = "lineHeight")]
    pub line_thickness: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

impl SecondaryRegionSpec {
    pub fn normalize(&self) -> Option<SecondaryRegionConfig> {
        match self {
            SecondaryRegionSpec::Enabled(false) => None,
            SecondaryRegionSpec::Enabled(true) => Some(SecondaryRegionConfig::default()),
            SecondaryRegionSpec::Custom(opts) => {
                let defaults = SecondaryRegionConfig::default();
                let cell_height = opts
                    .cell_height
                    .as_ref()
                    .map(SizeValue::parse)
                    .filter(|s| s.magnitude != 0.0)
                    .unwrap_or(defaults.cell_height);
                Some(SecondaryRegionConfig {
                    columns: opts.columns.filter(|&c| c > 0).unwrap_or(defaults.columns),
                    rows: opts.rows.filter(|&r| r > 0).unwrap_or(defaults.rows),
                    cell_height,
                    margin: opts
                        .margin
                        .as_ref()
                        .map(SizeValue::parse)
                        .unwrap_or(defaults.margin),
                    line_thickness: opts
                        .line_thickness
                        .filter(|&t| t.is_finite() && t > 0.0)
                        .unwrap_or(defaults.line_thickness),
                    color: opts
                        .color
                        .as_deref()
                        .filter(|c| !c.is_empty())
                        .map(Color::hex)
                        .unwrap_or(defaults.color),
                    css_color: opts
                        .color
                        .clone()
                        .filter(|c| !c.is_empty())
                        .unwrap_or(defaults.css_color),
                })
            }
        }
    }
}

/// A fully resolved secondary region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryRegionConfig {
    pub columns: u32,
    pub rows: u32,
    pub cell_height: SizeSpec,
    pub margin: SizeSpec,
    /// Height of the accent line drawn above the region's cells, in pixels.
    pub line_thickness: f64,
    /// The accent color as RGBA. Only hex input is understood here.
    pub color: Color,
    /// The accent color exactly as configured, for renderers that accept
    /// any CSS color (`"red"`, `"rgb(0 0 0 / 50%)"`).
    pub css_color: String,
}

impl Default for SecondaryRegionConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 1,
            cell_height: SizeSpec::px(80.0),
            margin: SizeSpec::zero(),
            line_thickness: 8.0,
            color: Color::BLACK,
            css_color: "#000".to_string(),
        }
    }
}

impl SecondaryRegionConfig {
    /// The nested grid is row-capped at the region's row count.
    pub fn settings(&self) -> GridSettings {
        GridSettings {
            columns: self.columns.max(1),
            rows: Some(self.rows.max(1)),
            cell_height: self.cell_height.clone(),
            margin: self.margin.clone(),
        }
    }
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rgb` or `#rrggbb`. Anything else is black.
    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Color::BLACK;
        }
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self::rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}
