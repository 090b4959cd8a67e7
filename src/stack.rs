//! # GridStack
//!
//! The public face of the engine: a grid mounted on a container node, its
//! optional secondary region, and the collaborators it needs from the
//! outside world. Every mutating call finishes with a full layout pass whose
//! result goes to the render sink, so the sink always reflects the model.

use tracing::{debug, warn};

use crate::error::GridError;
use crate::grid::GridModel;
use crate::layout::{compute_layout, GridLayout};
use crate::model::{GridConfig, WidgetId, WidgetOptions};
use crate::render::{apply_layout, NullSink, RenderSink};
use crate::secondary::SecondaryRegion;
use crate::size::SizeValue;
use crate::tree::{Target, WidgetTree};
use crate::units::{MeasureLength, NoMeasure};

/// What the engine needs from its environment.
pub struct Collaborators {
    /// Measures non-pixel lengths.
    pub measure: Box<dyn MeasureLength>,
    /// Receives pixel boxes and container heights.
    pub sink: Box<dyn RenderSink>,
    /// The container's measured width at mount time.
    pub container_width: f64,
}

impl Collaborators {
    pub fn new(container_width: f64) -> Self {
        Self {
            measure: Box::new(NoMeasure),
            sink: Box::new(NullSink),
            container_width,
        }
    }

    pub fn with_measure(mut self, measure: impl MeasureLength + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    pub fn with_sink(mut self, sink: impl RenderSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new(0.0)
    }
}

fn sanitize_width(width: f64) -> f64 {
    if width.is_finite() {
        width.max(0.0)
    } else {
        warn!(width, "non-finite container width, using 0");
        0.0
    }
}

pub struct GridStack {
    tree: WidgetTree,
    grid: GridModel,
    secondary: Option<SecondaryRegion>,
    measure: Box<dyn MeasureLength>,
    sink: Box<dyn RenderSink>,
    container_width: f64,
    last_layout: GridLayout,
}

impl GridStack {
    /// Mount a grid on `container`.
    ///
    /// Direct children of the container that are already marked as items
    /// are adopted at their preset coordinates. Fails only if the container
    /// can't be found.
    pub fn mount(
        mut tree: WidgetTree,
        container: impl Into<Target>,
        config: GridConfig,
        collaborators: Collaborators,
    ) -> Result<Self, GridError> {
        let target = container.into();
        let container = tree.lookup(&target).ok_or_else(|| {
            let name = match &target {
                Target::Id(id) => id.to_string(),
                Target::Key(key) => key.clone(),
            };
            GridError::ContainerMissing(name)
        })?;

        let mut grid = GridModel::new(container, config.settings());
        let existing: Vec<WidgetId> = tree
            .children(container)
            .iter()
            .copied()
            .filter(|child| tree.is_item(*child))
            .collect();
        for child in existing {
            grid.adopt(child, tree.preset(child));
        }

        let secondary = match config.secondary() {
            Some(region) => SecondaryRegion::create(&mut tree, container, region),
            None => None,
        };

        debug!(
            %container,
            columns = grid.columns(),
            adopted = grid.len(),
            secondary = secondary.is_some(),
            "grid mounted"
        );

        let Collaborators {
            measure,
            sink,
            container_width,
        } = collaborators;
        let container_width = sanitize_width(container_width);
        let last_layout = compute_layout(&grid, secondary.as_ref(), container_width, measure.as_ref());
        let mut stack = Self {
            tree,
            grid,
            secondary,
            measure,
            sink,
            container_width,
            last_layout,
        };
        apply_layout(stack.sink.as_mut(), &stack.last_layout);
        Ok(stack)
    }

    /// Run a layout pass and push it to the sink.
    pub fn layout(&mut self) -> &GridLayout {
        self.last_layout = compute_layout(
            &self.grid,
            self.secondary.as_ref(),
            self.container_width,
            self.measure.as_ref(),
        );
        apply_layout(self.sink.as_mut(), &self.last_layout);
        debug!(
            items = self.last_layout.items.len(),
            total_height = self.last_layout.total_height,
            "layout pass"
        );
        &self.last_layout
    }

    /// The container was resized. Re-lays out at the new width.
    pub fn notify_resized(&mut self, container_width: f64) -> &GridLayout {
        self.container_width = sanitize_width(container_width);
        self.layout()
    }

    pub fn last_layout(&self) -> &GridLayout {
        &self.last_layout
    }

    pub fn container(&self) -> WidgetId {
        self.grid.container()
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn secondary(&self) -> Option<&SecondaryRegion> {
        self.secondary.as_ref()
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// For building content inside widgets. Structural changes to grid
    /// containers made through here are not tracked.
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    // ── Widgets ─────────────────────────────────────────────────

    /// Create a widget and place it. `None` means the grid is full.
    pub fn add_widget(&mut self, options: WidgetOptions) -> Option<WidgetId> {
        let id = self.grid.add_widget(&mut self.tree, None, options);
        self.layout();
        id
    }

    /// [`GridStack::add_widget`] with a lookup key for later targeting.
    pub fn add_widget_keyed(&mut self, key: &str, options: WidgetOptions) -> Option<WidgetId> {
        let id = self.grid.add_widget(&mut self.tree, Some(key), options);
        self.layout();
        id
    }

    /// Place an existing node as a widget of this grid, or re-place one that
    /// already is. A widget of the secondary region moves over and is no
    /// longer tracked there. On failure it stays where it was.
    pub fn place(&mut self, target: impl Into<Target>, options: WidgetOptions) -> Option<WidgetId> {
        let id = self.grid.place_node(&mut self.tree, &target.into(), options);
        if let (Some(id), Some(region)) = (id, self.secondary.as_mut()) {
            if region.release(id) {
                debug!(%id, "moved from secondary region");
            }
        }
        self.layout();
        id
    }

    /// Change a widget's position or size. No overlap check is made.
    pub fn update_widget(&mut self, target: impl Into<Target>, options: WidgetOptions) -> bool {
        let ok = self.grid.update_widget(&self.tree, &target.into(), options);
        self.layout();
        ok
    }

    pub fn remove_widget(&mut self, target: impl Into<Target>) -> bool {
        let ok = self.grid.remove_widget(&mut self.tree, &target.into());
        self.layout();
        ok
    }

    /// The tracked widget a target refers to, if any.
    pub fn resolve(&self, target: impl Into<Target>) -> Option<WidgetId> {
        self.grid.resolve(&self.tree, &target.into())
    }

    // ── Secondary region widgets ────────────────────────────────

    pub fn add_secondary_widget(&mut self, options: WidgetOptions) -> Option<WidgetId> {
        let region = self.secondary.as_mut()?;
        let id = region.add_widget(&mut self.tree, None, options);
        self.layout();
        id
    }

    pub fn add_secondary_widget_keyed(&mut self, key: &str, options: WidgetOptions) -> Option<WidgetId> {
        let region = self.secondary.as_mut()?;
        let id = region.add_widget(&mut self.tree, Some(key), options);
        self.layout();
        id
    }

    /// [`GridStack::place`] for the secondary region. A widget of the main
    /// grid moves over and is no longer tracked there.
    pub fn place_secondary(&mut self, target: impl Into<Target>, options: WidgetOptions) -> Option<WidgetId> {
        let region = self.secondary.as_mut()?;
        let id = region.place_widget(&mut self.tree, &target.into(), options);
        if let Some(id) = id {
            if self.grid.remove(id) {
                debug!(%id, "moved into secondary region");
            }
        }
        self.layout();
        id
    }

    pub fn update_secondary_widget(&mut self, target: impl Into<Target>, options: WidgetOptions) -> bool {
        let Some(region) = self.secondary.as_mut() else {
            return false;
        };
        let ok = region.update_widget(&self.tree, &target.into(), options);
        self.layout();
        ok
    }

    pub fn remove_secondary_widget(&mut self, target: impl Into<Target>) -> bool {
        let Some(region) = self.secondary.as_mut() else {
            return false;
        };
        let ok = region.remove_widget(&mut self.tree, &target.into());
        self.layout();
        ok
    }

    pub fn resolve_secondary(&self, target: impl Into<Target>) -> Option<WidgetId> {
        self.secondary.as_ref()?.resolve(&self.tree, &target.into())
    }

    // ── Configuration ───────────────────────────────────────────

    /// 0 means the default of 12. Items keep their coordinates.
    pub fn set_columns(&mut self, columns: u32) {
        self.grid.set_columns(columns);
        self.layout();
    }

    pub fn set_rows(&mut self, rows: Option<u32>) {
        self.grid.set_rows(rows);
        self.layout();
    }

    pub fn set_cell_height(&mut self, cell_height: impl Into<SizeValue>) {
        self.grid.set_cell_height(cell_height.into().parse());
        self.layout();
    }

    pub fn set_margin(&mut self, margin: impl Into<SizeValue>) {
        self.grid.set_margin(margin.into().parse());
        self.layout();
    }

    /// Unmount: drop the secondary region's nodes and return the tree.
    pub fn destroy(mut self) -> WidgetTree {
        if let Some(region) = self.secondary.take() {
            region.teardown(&mut self.tree);
        }
        debug!(container = %self.grid.container(), "grid destroyed");
        self.tree
    }
}
