//! # Secondary Region
//!
//! A fixed-size strip along the bottom of the container, e.g. a toolbar,
//! with its own independent grid. The region adds three nodes under the
//! container: the bar, an accent line across its top, and the content node
//! the nested grid is mounted on.

use tracing::debug;

use crate::geometry::PixelBox;
use crate::grid::GridModel;
use crate::layout::{layout_grid, span_length, SecondaryRegionLayout};
use crate::model::{SecondaryRegionConfig, WidgetId, WidgetOptions};
use crate::tree::{Target, WidgetTree};
use crate::units::{to_pixels, MeasureLength};

#[derive(Debug, Clone)]
pub struct SecondaryRegion {
    config: SecondaryRegionConfig,
    bar: WidgetId,
    line: WidgetId,
    content: WidgetId,
    grid: GridModel,
}

impl SecondaryRegion {
    /// Build the region's nodes under `parent` and mount a grid on them.
    pub(crate) fn create(
        tree: &mut WidgetTree,
        parent: WidgetId,
        config: SecondaryRegionConfig,
    ) -> Option<Self> {
        let bar = tree.create_child(parent, None)?;
        let content = tree.create_child(bar, None)?;
        let line = tree.create_child(bar, None)?;
        let grid = GridModel::new(content, config.settings());
        debug!(
            columns = config.columns,
            rows = config.rows,
            line_thickness = config.line_thickness,
            "secondary region created"
        );
        Some(Self {
            config,
            bar,
            line,
            content,
            grid,
        })
    }

    pub fn config(&self) -> &SecondaryRegionConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn bar(&self) -> WidgetId {
        self.bar
    }

    pub fn line(&self) -> WidgetId {
        self.line
    }

    /// The node the nested grid's items live under.
    pub fn content(&self) -> WidgetId {
        self.content
    }

    /// Height of the nested grid's rows, gaps included.
    pub fn content_height(&self, measure: &dyn MeasureLength) -> f64 {
        let rows = self.config.rows.max(1);
        let gap = to_pixels(&self.config.margin, measure);
        let cell = to_pixels(&self.config.cell_height, measure);
        span_length(rows, cell, gap)
    }

    /// Height the region adds to the outer container.
    pub fn reserved_height(&self, measure: &dyn MeasureLength) -> f64 {
        self.content_height(measure) + self.config.line_thickness
    }

    /// Lay out the region's chrome and its grid. `top` is where the bar
    /// starts in the outer container.
    pub fn layout(&self, container_width: f64, top: f64, measure: &dyn MeasureLength) -> SecondaryRegionLayout {
        let content_height = self.content_height(measure);
        let line_thickness = self.config.line_thickness;
        let reserved_height = content_height + line_thickness;
        SecondaryRegionLayout {
            bar: PixelBox {
                left: 0.0,
                top,
                width: container_width,
                height: reserved_height,
            },
            line: PixelBox {
                left: 0.0,
                top: 0.0,
                width: container_width,
                height: line_thickness,
            },
            content: PixelBox {
                left: 0.0,
                top: line_thickness,
                width: container_width,
                height: content_height,
            },
            line_thickness,
            color: self.config.color,
            css_color: self.config.css_color.clone(),
            reserved_height,
            grid: Box::new(layout_grid(&self.grid, container_width, measure)),
        }
    }

    pub fn add_widget(
        &mut self,
        tree: &mut WidgetTree,
        key: Option<&str>,
        options: WidgetOptions,
    ) -> Option<WidgetId> {
        self.grid.add_widget(tree, key, options)
    }

    pub fn place_widget(
        &mut self,
        tree: &mut WidgetTree,
        target: &Target,
        options: WidgetOptions,
    ) -> Option<WidgetId> {
        self.grid.place_node(tree, target, options)
    }

    pub fn update_widget(&mut self, tree: &WidgetTree, target: &Target, options: WidgetOptions) -> bool {
        self.grid.update_widget(tree, target, options)
    }

    pub fn remove_widget(&mut self, tree: &mut WidgetTree, target: &Target) -> bool {
        self.grid.remove_widget(tree, target)
    }

    pub fn resolve(&self, tree: &WidgetTree, target: &Target) -> Option<WidgetId> {
        self.grid.resolve(tree, target)
    }

    /// Stop tracking `id` without touching the tree. Used when the node has
    /// already been moved into another grid.
    pub(crate) fn release(&mut self, id: WidgetId) -> bool {
        self.grid.remove(id)
    }

    /// Free the region's nodes. Widgets still placed in it go with them.
    pub(crate) fn teardown(self, tree: &mut WidgetTree) {
        tree.remove(self.bar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;
    use crate::size::SizeSpec;
    use crate::units::{FixedRatioMeasure, NoMeasure};

    fn region(config: SecondaryRegionConfig) -> (WidgetTree, WidgetId, SecondaryRegion) {
        let mut tree = WidgetTree::new();
        let root = tree.create_root(Some("grid"));
        let region = SecondaryRegion::create(&mut tree, root, config).unwrap();
        (tree, root, region)
    }

    #[test]
    fn default_region_reserves_88px() {
        let (_, _, region) = region(SecondaryRegionConfig::default());
        assert_eq!(region.reserved_height(&NoMeasure), 88.0);
    }

    #[test]
    fn reserved_height_includes_row_gaps() {
        let (_, _, region) = region(SecondaryRegionConfig {
            rows: 2,
            margin: SizeSpec::px(6.0),
            cell_height: SizeSpec::px(40.0),
            line_thickness: 2.0,
            ..Default::default()
        });
        assert_eq!(region.reserved_height(&NoMeasure), 40.0 * 2.0 + 6.0 + 2.0);
    }

    #[test]
    fn chrome_nodes_hang_off_the_container() {
        let (tree, root, region) = region(SecondaryRegionConfig::default());
        assert_eq!(tree.parent(region.bar()), Some(root));
        assert_eq!(tree.parent(region.content()), Some(region.bar()));
        assert_eq!(tree.parent(region.line()), Some(region.bar()));
        assert_eq!(region.grid().container(), region.content());
    }

    #[test]
    fn nested_grid_is_row_capped() {
        let (mut tree, _, mut region) = region(SecondaryRegionConfig::default());
        for _ in 0..4 {
            assert!(region.add_widget(&mut tree, None, WidgetOptions::default()).is_some());
        }
        assert!(region.add_widget(&mut tree, None, WidgetOptions::default()).is_none());
        assert_eq!(region.grid().len(), 4);
    }

    #[test]
    fn layout_places_bar_below_content() {
        let (mut tree, _, mut region) = region(SecondaryRegionConfig {
            color: Color::hex("#336699"),
            css_color: "#336699".to_string(),
            ..Default::default()
        });
        let id = region
            .add_widget(&mut tree, None, WidgetOptions::at(1, 0, 1, 1))
            .unwrap();
        let layout = region.layout(400.0, 160.0, &NoMeasure);

        assert_eq!(layout.bar.top, 160.0);
        assert_eq!(layout.bar.height, 88.0);
        assert_eq!(layout.line.height, 8.0);
        assert_eq!(layout.content.top, 8.0);
        assert_eq!(layout.content.height, 80.0);
        assert_eq!(layout.color.to_hex(), "#336699");
        assert_eq!(layout.css_color, "#336699");

        let item = layout.grid.item(id).unwrap().pixel;
        assert_eq!(item.left, 100.0);
        assert_eq!(item.width, 100.0);
    }

    #[test]
    fn em_cells_use_the_measurer() {
        let (_, _, region) = region(SecondaryRegionConfig {
            cell_height: SizeSpec {
                magnitude: 3.0,
                unit: "em".to_string(),
            },
            ..Default::default()
        });
        assert_eq!(region.reserved_height(&FixedRatioMeasure::new()), 48.0 + 8.0);
    }

    #[test]
    fn teardown_frees_the_chrome() {
        let (mut tree, root, mut region) = region(SecondaryRegionConfig::default());
        let id = region.add_widget(&mut tree, None, WidgetOptions::default()).unwrap();
        let bar = region.bar();
        region.teardown(&mut tree);
        assert!(!tree.is_alive(bar));
        assert!(!tree.is_alive(id));
        assert!(tree.children(root).is_empty());
    }
}
