//! Output side of a layout pass. The engine never paints anything; it hands
//! pixel boxes and container heights to a [`RenderSink`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::geometry::PixelBox;
use crate::layout::{GridLayout, SecondaryRegionLayout};
use crate::model::WidgetId;

pub trait RenderSink {
    /// Position one item inside its container.
    fn apply_box(&mut self, id: WidgetId, pixel: PixelBox);

    /// Set a container's height.
    fn apply_container_height(&mut self, container: WidgetId, height: f64);

    /// Size the secondary region's chrome. Called before its grid is applied.
    fn apply_secondary_region(&mut self, _region: &SecondaryRegionLayout) {}
}

impl<T: RenderSink> RenderSink for Rc<RefCell<T>> {
    fn apply_box(&mut self, id: WidgetId, pixel: PixelBox) {
        self.borrow_mut().apply_box(id, pixel);
    }

    fn apply_container_height(&mut self, container: WidgetId, height: f64) {
        self.borrow_mut().apply_container_height(container, height);
    }

    fn apply_secondary_region(&mut self, region: &SecondaryRegionLayout) {
        self.borrow_mut().apply_secondary_region(region);
    }
}

/// Push a whole layout, nested region included, into a sink.
pub fn apply_layout(sink: &mut dyn RenderSink, layout: &GridLayout) {
    for item in &layout.items {
        sink.apply_box(item.id, item.pixel);
    }
    if let Some(region) = &layout.secondary {
        sink.apply_secondary_region(region);
        apply_layout(sink, &region.grid);
    }
    sink.apply_container_height(layout.container, layout.total_height);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn apply_box(&mut self, _id: WidgetId, _pixel: PixelBox) {}

    fn apply_container_height(&mut self, _container: WidgetId, _height: f64) {}
}

/// Keeps the latest box per item and height per container.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub boxes: HashMap<WidgetId, PixelBox>,
    pub heights: HashMap<WidgetId, f64>,
    pub region: Option<SecondaryRegionLayout>,
    /// How many container heights were applied in total. Every pass ends
    /// with one per grid.
    pub height_updates: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn box_of(&self, id: WidgetId) -> Option<PixelBox> {
        self.boxes.get(&id).copied()
    }

    pub fn height_of(&self, container: WidgetId) -> Option<f64> {
        self.heights.get(&container).copied()
    }
}

impl RenderSink for RecordingSink {
    fn apply_box(&mut self, id: WidgetId, pixel: PixelBox) {
        self.boxes.insert(id, pixel);
    }

    fn apply_container_height(&mut self, container: WidgetId, height: f64) {
        self.heights.insert(container, height);
        self.height_updates += 1;
    }

    fn apply_secondary_region(&mut self, region: &SecondaryRegionLayout) {
        self.region = Some(region.clone());
    }
}
