//! # GridStack
//!
//! A headless widget grid. Widgets are rectangles on a column grid inside a
//! container; the engine keeps them from overlapping, finds room for new
//! ones, and turns grid coordinates into pixel boxes whenever the container
//! width, the cell size, or the set of widgets changes.
//!
//! Nothing here draws. The engine consumes a container width, a way to
//! measure non-pixel lengths, and a sink for the boxes it computes, so the
//! same model drives a DOM, a canvas, or a test.
//!
//! ## Architecture
//!
//! ```text
//! config (JSON/API)
//!       ↓
//!   [size]       "1.5em" → magnitude + unit
//!   [units]      magnitude + unit → pixels (injected measurer)
//!       ↓
//!   [geometry]   intersection, first-fit free-space scan
//!   [grid]       items, placement / update / removal rules
//!       ↓
//!   [layout]     cell sizes, pixel boxes, container height
//!   [secondary]  nested grid in a trailing strip
//!       ↓
//!   [render]     sink receiving boxes and heights
//! ```
//!
//! [`GridStack`] ties these together and runs a layout pass after every
//! change.

pub mod error;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod model;
pub mod render;
pub mod scene;
pub mod secondary;
pub mod size;
pub mod stack;
pub mod tree;
pub mod units;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::GridError;
pub use geometry::{GridRect, PixelBox};
pub use grid::GridModel;
pub use layout::{GridLayout, ItemBox, SecondaryRegionLayout};
pub use model::{GridConfig, GridItem, SecondaryRegionSpec, WidgetId, WidgetOptions};
pub use render::{RecordingSink, RenderSink};
pub use scene::{layout_json, layout_scene, Scene, SceneLayout};
pub use size::{parse_size, SizeSpec, SizeValue};
pub use stack::{Collaborators, GridStack};
pub use tree::{Target, WidgetTree};
pub use units::{FixedRatioMeasure, MeasureLength, NoMeasure};
