//! # Layout Pass
//!
//! Turns grid coordinates into pixel boxes. Everything derives from three
//! numbers: the gap, the cell width, and the cell height.
//!
//! ```text
//! gap        = to_pixels(margin)
//! cellWidth  = floor((containerWidth - (columns - 1) * gap) / columns), >= 0
//! cellHeight = to_pixels(cellHeight)
//!
//! left   = x * (cellWidth + gap)        width  = w * cellWidth + (w - 1) * gap
//! top    = y * (cellHeight + gap)       height = h * cellHeight + (h - 1) * gap
//! ```
//!
//! The container's content height covers the row cap if there is one, the
//! lowest item otherwise. A secondary region adds its own reserved height
//! below that and is laid out as an independent grid of the same width.
//!
//! A pass only reads the model, so running it twice without a mutation in
//! between yields identical output.

use serde::Serialize;
use tracing::trace;

use crate::geometry::{GridRect, PixelBox};
use crate::grid::GridModel;
use crate::model::{Color, WidgetId};
use crate::secondary::SecondaryRegion;
use crate::units::{to_pixels, MeasureLength};

/// One item's grid slot and the pixel box it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBox {
    pub id: WidgetId,
    pub rect: GridRect,
    #[serde(rename = "box")]
    pub pixel: PixelBox,
}

/// The result of one layout pass over a grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    /// The container node the heights below apply to.
    pub container: WidgetId,
    pub container_width: f64,
    pub columns: u32,
    pub gap: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    /// Rows the content area spans: the row cap, or the lowest item edge.
    pub row_extent: u32,
    /// Height of the grid's own rows, gaps included.
    pub content_height: f64,
    pub items: Vec<ItemBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<SecondaryRegionLayout>,
    /// What the container's height should be set to.
    pub total_height: f64,
}

impl GridLayout {
    pub fn item(&self, id: WidgetId) -> Option<&ItemBox> {
        self.items.iter().find(|b| b.id == id)
    }
}

/// Geometry of the secondary region's chrome plus its nested grid.
///
/// `bar` is relative to the outer container. `line` and `content` are
/// relative to the bar: the accent line runs along the bar's top edge and
/// the nested grid sits directly beneath it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryRegionLayout {
    pub bar: PixelBox,
    pub line: PixelBox,
    pub content: PixelBox,
    pub line_thickness: f64,
    pub color: Color,
    /// The accent color as configured. Hand this to CSS renderers.
    pub css_color: String,
    /// `content height + line thickness`, added to the outer total height.
    pub reserved_height: f64,
    pub grid: Box<GridLayout>,
}

/// Pixel spacing between cells.
pub fn gap_px(model: &GridModel, measure: &dyn MeasureLength) -> f64 {
    to_pixels(model.margin(), measure)
}

/// Width of one column, floored to whole pixels and never negative.
pub fn cell_width(container_width: f64, columns: u32, gap: f64) -> f64 {
    let columns = columns.max(1);
    let total_gap = (columns - 1) as f64 * gap;
    let available = (container_width - total_gap).max(0.0);
    (available / columns as f64).floor()
}

pub fn cell_height_px(model: &GridModel, measure: &dyn MeasureLength) -> f64 {
    to_pixels(model.cell_height(), measure)
}

/// Length of `n` consecutive cells of size `cell` with `gap` between them.
pub fn span_length(n: u32, cell: f64, gap: f64) -> f64 {
    n as f64 * cell + n.saturating_sub(1) as f64 * gap
}

/// Pixel box of a grid rectangle.
pub fn pixel_box(rect: &GridRect, cell_width: f64, cell_height: f64, gap: f64) -> PixelBox {
    PixelBox {
        left: rect.x as f64 * (cell_width + gap),
        top: rect.y as f64 * (cell_height + gap),
        width: span_length(rect.w, cell_width, gap),
        height: span_length(rect.h, cell_height, gap),
    }
}

/// Lay out one grid, without any secondary region.
pub fn layout_grid(model: &GridModel, container_width: f64, measure: &dyn MeasureLength) -> GridLayout {
    let gap = gap_px(model, measure);
    let cw = cell_width(container_width, model.columns(), gap);
    let ch = cell_height_px(model, measure);

    let items: Vec<ItemBox> = model
        .items()
        .map(|item| {
            let rect = item.rect();
            ItemBox {
                id: item.id,
                rect,
                pixel: pixel_box(&rect, cw, ch, gap),
            }
        })
        .collect();

    let row_extent = model.rows().unwrap_or_else(|| model.row_extent());
    let content_height = span_length(row_extent, ch, gap);

    trace!(
        container = %model.container(),
        items = items.len(),
        cell_width = cw,
        cell_height = ch,
        gap,
        content_height,
        "grid laid out"
    );

    GridLayout {
        container: model.container(),
        container_width,
        columns: model.columns(),
        gap,
        cell_width: cw,
        cell_height: ch,
        row_extent,
        content_height,
        items,
        secondary: None,
        total_height: content_height,
    }
}

/// Lay out a grid and, if present, its secondary region.
pub fn compute_layout(
    model: &GridModel,
    secondary: Option<&SecondaryRegion>,
    container_width: f64,
    measure: &dyn MeasureLength,
) -> GridLayout {
    let mut layout = layout_grid(model, container_width, measure);
    if let Some(region) = secondary {
        let region_layout = region.layout(container_width, layout.content_height, measure);
        layout.total_height += region_layout.reserved_height;
        layout.secondary = Some(region_layout);
    }
    layout
}
