//! # Grid Model
//!
//! Owns the items of one grid and keeps them consistent with the grid's
//! column count and row cap. Placement never produces an overlap: a
//! requested slot that is out of bounds or taken falls back to the first
//! free slot, and if there is none the placement fails. Updates are
//! deliberately looser and only keep items inside the columns.
//!
//! The model doesn't run layout itself. [`crate::GridStack`] runs a pass
//! after every mutating call.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::geometry::{self, GridRect};
use crate::model::{normalize_columns, GridItem, GridSettings, WidgetId, WidgetOptions};
use crate::size::SizeSpec;
use crate::tree::{Target, WidgetTree};

/// Where a node sat before `place_node` moved it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Container,
    Under(WidgetId, usize),
    Detached,
}

#[derive(Debug, Clone)]
pub struct GridModel {
    container: WidgetId,
    settings: GridSettings,
    items: IndexMap<WidgetId, GridItem>,
}

fn coord(v: i64) -> u32 {
    v.clamp(0, u32::MAX as i64) as u32
}

fn span(v: i64) -> u32 {
    v.clamp(1, u32::MAX as i64) as u32
}

impl GridModel {
    pub fn new(container: WidgetId, settings: GridSettings) -> Self {
        Self {
            container,
            settings: GridSettings {
                columns: normalize_columns(settings.columns),
                ..settings
            },
            items: IndexMap::new(),
        }
    }

    /// The tree node this grid is mounted on.
    pub fn container(&self) -> WidgetId {
        self.container
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn columns(&self) -> u32 {
        self.settings.columns
    }

    pub fn rows(&self) -> Option<u32> {
        self.settings.rows
    }

    pub fn cell_height(&self) -> &SizeSpec {
        &self.settings.cell_height
    }

    pub fn margin(&self) -> &SizeSpec {
        &self.settings.margin
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &GridItem> {
        self.items.values()
    }

    pub fn get(&self, id: WidgetId) -> Option<&GridItem> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.items.contains_key(&id)
    }

    fn rects_except(&self, skip: Option<WidgetId>) -> Vec<GridRect> {
        self.items
            .values()
            .filter(|item| Some(item.id) != skip)
            .map(GridItem::rect)
            .collect()
    }

    pub fn rects(&self) -> Vec<GridRect> {
        self.rects_except(None)
    }

    /// Whether the rectangle overlaps no tracked item.
    pub fn is_area_free(&self, x: u32, y: u32, w: u32, h: u32) -> bool {
        let candidate = GridRect::new(x, y, w, h);
        geometry::is_area_free(&self.rects(), &candidate)
    }

    /// First free `(x, y)` for a `w`×`h` item, scanning rows top-down.
    pub fn find_empty_position(&self, w: u32, h: u32) -> Option<(u32, u32)> {
        geometry::find_empty_position(&self.rects(), self.columns(), self.rows(), w, h)
    }

    /// `max(y + h)` over all items.
    pub fn row_extent(&self) -> u32 {
        geometry::row_extent(&self.rects())
    }

    /// Place `id`, or move it if it is already tracked.
    ///
    /// A missing `x` or `y` asks for auto-placement. Explicit coordinates are
    /// clamped into the columns, and a slot that breaks the row cap or
    /// overlaps another item falls back to auto-placement. Returns `None`
    /// when no slot fits; the model is left untouched in that case.
    pub fn place(&mut self, id: WidgetId, options: WidgetOptions) -> Option<GridItem> {
        let columns = self.columns();
        let rows = self.rows();
        let w = options.w.map(span).unwrap_or(1).min(columns);
        let h = options.h.map(span).unwrap_or(1);

        // A re-placed item doesn't collide with its own old slot.
        let occupied = self.rects_except(Some(id));
        let auto = |reason: &str| {
            let found = geometry::find_empty_position(&occupied, columns, rows, w, h);
            match found {
                Some((x, y)) => trace!(%id, reason, x, y, "auto-placed"),
                None => debug!(%id, reason, w, h, "no free slot"),
            }
            found
        };

        let (x, y) = match (options.x, options.y) {
            (Some(x), Some(y)) => {
                let mut x = coord(x);
                let y = coord(y);
                if x.saturating_add(w) > columns {
                    x = columns.saturating_sub(w);
                }
                let candidate = GridRect::new(x, y, w, h);
                if rows.is_some_and(|rows| candidate.bottom() > rows) {
                    auto("exceeds row cap")?
                } else if !geometry::is_area_free(&occupied, &candidate) {
                    auto("overlap")?
                } else {
                    (x, y)
                }
            }
            _ => auto("no position")?,
        };

        let item = GridItem { id, x, y, w, h };
        match self.items.get_mut(&id) {
            Some(existing) => *existing = item,
            None => {
                self.items.insert(id, item);
            }
        }
        debug!(%id, x, y, w, h, "placed");
        Some(item)
    }

    /// Track an item exactly where it says it is, without any checks beyond
    /// the minimums. Used when adopting pre-positioned children.
    pub fn adopt(&mut self, id: WidgetId, options: WidgetOptions) -> GridItem {
        let item = GridItem {
            id,
            x: options.x.map(coord).unwrap_or(0),
            y: options.y.map(coord).unwrap_or(0),
            w: options.w.map(span).unwrap_or(1),
            h: options.h.map(span).unwrap_or(1),
        };
        self.items.insert(id, item);
        item
    }

    /// Overwrite the given fields of a tracked item.
    ///
    /// The result is kept inside the columns but is NOT checked for overlap,
    /// so an update can leave two items on top of each other. Returns
    /// `false` if `id` isn't tracked.
    pub fn update(&mut self, id: WidgetId, options: WidgetOptions) -> bool {
        let columns = self.columns();
        let Some(item) = self.items.get_mut(&id) else {
            return false;
        };
        if let Some(x) = options.x {
            item.x = coord(x);
        }
        if let Some(y) = options.y {
            item.y = coord(y);
        }
        if let Some(w) = options.w {
            item.w = span(w);
        }
        if let Some(h) = options.h {
            item.h = span(h);
        }
        item.w = item.w.min(columns);
        if item.x.saturating_add(item.w) > columns {
            item.x = columns.saturating_sub(item.w);
        }
        debug!(%id, x = item.x, y = item.y, w = item.w, h = item.h, "updated");
        true
    }

    /// Stop tracking `id`. Returns `false` if it wasn't tracked.
    pub fn remove(&mut self, id: WidgetId) -> bool {
        let removed = self.items.shift_remove(&id).is_some();
        if removed {
            debug!(%id, "removed");
        }
        removed
    }

    /// 0 means the default of 12. Existing items are not reflowed.
    pub fn set_columns(&mut self, columns: u32) {
        self.settings.columns = normalize_columns(columns);
    }

    pub fn set_rows(&mut self, rows: Option<u32>) {
        self.settings.rows = rows;
    }

    pub fn set_cell_height(&mut self, cell_height: SizeSpec) {
        self.settings.cell_height = cell_height;
    }

    pub fn set_margin(&mut self, margin: SizeSpec) {
        self.settings.margin = margin;
    }

    /// Find the tracked item a target refers to.
    ///
    /// Keys are looked up inside this grid's container only. A node that
    /// isn't an item itself resolves to its nearest enclosing item, which
    /// must sit inside the container and be tracked here.
    pub fn resolve(&self, tree: &WidgetTree, target: &Target) -> Option<WidgetId> {
        let node = match target {
            Target::Id(id) => tree.is_alive(*id).then_some(*id)?,
            Target::Key(key) => tree.find_within(self.container, key)?,
        };
        let item = tree.closest_item(node)?;
        if !tree.contains(self.container, item) || !self.contains(item) {
            return None;
        }
        Some(item)
    }

    // ── Tree-aware operations ───────────────────────────────────

    /// Create a new item node under the container and place it. The node is
    /// freed again if nothing fits.
    pub fn add_widget(
        &mut self,
        tree: &mut WidgetTree,
        key: Option<&str>,
        options: WidgetOptions,
    ) -> Option<WidgetId> {
        let id = tree.create_item(self.container, key, options)?;
        match self.place(id, options) {
            Some(_) => Some(id),
            None => {
                tree.remove(id);
                None
            }
        }
    }

    /// Place an existing node as an item of this grid, moving it under the
    /// container first. Fields missing from `options` fall back to the
    /// node's preset coordinates. If nothing fits, the node goes back to
    /// its old parent and item state.
    pub fn place_node(
        &mut self,
        tree: &mut WidgetTree,
        target: &Target,
        options: WidgetOptions,
    ) -> Option<WidgetId> {
        let id = tree.lookup(target)?;
        if id == self.container || tree.contains(id, self.container) {
            return None;
        }
        let was_item = tree.is_item(id);
        let origin = match tree.parent(id) {
            Some(parent) if parent == self.container => Origin::Container,
            Some(parent) => Origin::Under(parent, tree.index_in_parent(id).unwrap_or(usize::MAX)),
            None => Origin::Detached,
        };

        tree.mark_item(id);
        if origin != Origin::Container {
            tree.append_child(self.container, id);
        }
        let options = options.or(tree.preset(id));
        if self.place(id, options).is_some() {
            return Some(id);
        }

        // Put the node back the way the caller handed it over.
        match origin {
            Origin::Under(parent, index) => {
                tree.insert_child(parent, index, id);
            }
            Origin::Detached => tree.detach(id),
            Origin::Container => {}
        }
        if !was_item {
            tree.unmark_item(id);
        }
        None
    }

    pub fn update_widget(&mut self, tree: &WidgetTree, target: &Target, options: WidgetOptions) -> bool {
        match self.resolve(tree, target) {
            Some(id) => self.update(id, options),
            None => false,
        }
    }

    /// Stop tracking the widget and unlink it from the container. The node
    /// itself stays alive so it can be placed again.
    pub fn remove_widget(&mut self, tree: &mut WidgetTree, target: &Target) -> bool {
        let Some(id) = self.resolve(tree, target) else {
            return false;
        };
        if !self.remove(id) {
            return false;
        }
        if tree.parent(id) == Some(self.container) {
            tree.detach(id);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GridConfig;

    fn grid(config: GridConfig) -> (WidgetTree, GridModel) {
        let mut tree = WidgetTree::new();
        let container = tree.create_root(Some("grid"));
        let model = GridModel::new(container, config.settings());
        (tree, model)
    }

    fn node(tree: &mut WidgetTree, model: &GridModel) -> WidgetId {
        tree.create_item(model.container(), None, WidgetOptions::default())
            .unwrap()
    }

    fn assert_no_overlaps(model: &GridModel) {
        let items: Vec<_> = model.items().copied().collect();
        for (i, a) in items.iter().enumerate() {
            for b in &items[i + 1..] {
                assert!(
                    !geometry::intersects(&a.rect(), &b.rect()),
                    "{:?} overlaps {:?}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn auto_place_on_empty_grid() {
        let (mut tree, mut model) = grid(GridConfig::default());
        let id = node(&mut tree, &model);
        let item = model.place(id, WidgetOptions::sized(4, 2)).unwrap();
        assert_eq!((item.x, item.y, item.w, item.h), (0, 0, 4, 2));
    }

    #[test]
    fn auto_place_fills_the_row_first() {
        let (mut tree, mut model) = grid(GridConfig::default());
        let a = node(&mut tree, &model);
        let b = node(&mut tree, &model);
        model.place(a, WidgetOptions::at(0, 0, 4, 2)).unwrap();
        let item = model.place(b, WidgetOptions::sized(4, 2)).unwrap();
        assert_eq!((item.x, item.y), (4, 0));
    }

    #[test]
    fn missing_size_defaults_to_one_cell() {
        let (mut tree, mut model) = grid(GridConfig::default());
        let id = node(&mut tree, &model);
        let item = model.place(id, WidgetOptions::default()).unwrap();
        assert_eq!((item.w, item.h), (1, 1));
    }

    #[test]
    fn width_is_clamped_to_columns() {
        let (mut tree, mut model) = grid(GridConfig::default().with_columns(4));
        let id = node(&mut tree, &model);
        let item = model.place(id, WidgetOptions::sized(6, 1)).unwrap();
        assert_eq!(item.w, 4);
    }

    #[test]
    fn explicit_coordinates_are_kept_exactly() {
        let (mut tree, mut model) = grid(GridConfig::default());
        let id = node(&mut tree, &model);
        let item = model.place(id, WidgetOptions::at(3, 5, 2, 4)).unwrap();
        assert_eq!((item.x, item.y, item.w, item.h), (3, 5, 2, 4));
        assert_eq!(model.get(id), Some(&item));
    }

    #[test]
    fn explicit_coordinates_are_clamped() {
        let (mut tree, mut model) = grid(GridConfig::default().with_columns(6));
        let id = node(&mut tree, &model);
        let item = model.place(id, WidgetOptions::at(-3, -1, 2, 1)).unwrap();
        assert_eq!((item.x, item.y), (0, 0));

        let id = node(&mut tree, &model);
        let item = model.place(id, WidgetOptions::at(5, 1, 3, 1)).unwrap();
        assert_eq!((item.x, item.y), (3, 1));
    }

    #[test]
    fn overlapping_request_falls_back_to_auto() {
        let (mut tree, mut model) = grid(GridConfig::default());
        let a = node(&mut tree, &model);
        let b = node(&mut tree, &model);
        model.place(a, WidgetOptions::at(0, 0, 4, 2)).unwrap();
        let item = model.place(b, WidgetOptions::at(2, 1, 2, 2)).unwrap();
        assert_eq!((item.x, item.y), (4, 0));
        assert_no_overlaps(&model);
    }

    #[test]
    fn row_cap_fallback_and_failure() {
        let (mut tree, mut model) = grid(GridConfig::default().with_rows(2));
        let full = node(&mut tree, &model);
        model.place(full, WidgetOptions::at(0, 0, 12, 2)).unwrap();

        let extra = node(&mut tree, &model);
        assert!(model.place(extra, WidgetOptions::at(0, 1, 1, 2)).is_none());
        assert!(!model.contains(extra));
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn row_cap_fallback_finds_room() {
        let (mut tree, mut model) = grid(GridConfig::default().with_columns(4).with_rows(2));
        let a = node(&mut tree, &model);
        model.place(a, WidgetOptions::at(0, 0, 2, 2)).unwrap();
        let b = node(&mut tree, &model);
        let item = model.place(b, WidgetOptions::at(0, 1, 2, 2)).unwrap();
        assert_eq!((item.x, item.y), (2, 0));
    }

    #[test]
    fn replacing_updates_in_place() {
        let (mut tree, mut model) = grid(GridConfig::default());
        let id = node(&mut tree, &model);
        model.place(id, WidgetOptions::at(0, 0, 2, 2)).unwrap();
        let moved = model.place(id, WidgetOptions::at(1, 1, 2, 2)).unwrap();
        assert_eq!(model.len(), 1);
        assert_eq!((moved.x, moved.y), (1, 1));
    }

    #[test]
    fn many_auto_placements_never_overlap() {
        let (mut tree, mut model) = grid(GridConfig::default().with_columns(5));
        let sizes = [(2, 1), (3, 2), (1, 3), (5, 1), (2, 2), (4, 1), (1, 1), (3, 3)];
        for (w, h) in sizes {
            let id = node(&mut tree, &model);
            model.place(id, WidgetOptions::sized(w, h)).unwrap();
        }
        assert_eq!(model.len(), sizes.len());
        assert_no_overlaps(&model);
    }

    #[test]
    fn update_merges_and_clamps() {
        let (mut tree, mut model) = grid(GridConfig::default().with_columns(6));
        let id = node(&mut tree, &model);
        model.place(id, WidgetOptions::at(1, 1, 2, 2)).unwrap();

        assert!(model.update(id, WidgetOptions::default().w(10)));
        let item = model.get(id).unwrap();
        assert_eq!((item.x, item.y, item.w, item.h), (0, 1, 6, 2));

        assert!(model.update(id, WidgetOptions::default().w(0).h(-2).x(5).y(-1)));
        let item = model.get(id).unwrap();
        assert_eq!((item.x, item.y, item.w, item.h), (5, 0, 1, 1));
    }

    #[test]
    fn update_does_not_check_overlap() {
        let (mut tree, mut model) = grid(GridConfig::default());
        let a = node(&mut tree, &model);
        let b = node(&mut tree, &model);
        model.place(a, WidgetOptions::at(0, 0, 2, 2)).unwrap();
        model.place(b, WidgetOptions::at(2, 0, 2, 2)).unwrap();

        assert!(model.update(b, WidgetOptions::default().x(1)));
        let (ra, rb) = (model.get(a).unwrap().rect(), model.get(b).unwrap().rect());
        assert!(geometry::intersects(&ra, &rb));
    }

    #[test]
    fn update_and_remove_unknown_ids() {
        let (mut tree, mut model) = grid(GridConfig::default());
        let id = node(&mut tree, &model);
        assert!(!model.update(id, WidgetOptions::default().x(1)));
        assert!(!model.remove(id));
    }

    #[test]
    fn remove_keeps_insertion_order() {
        let (mut tree, mut model) = grid(GridConfig::default());
        let ids: Vec<_> = (0..3).map(|_| node(&mut tree, &model)).collect();
        for id in &ids {
            model.place(*id, WidgetOptions::default()).unwrap();
        }
        assert!(model.remove(ids[1]));
        let order: Vec<_> = model.items().map(|i| i.id).collect();
        assert_eq!(order, vec![ids[0], ids[2]]);
    }

    #[test]
    fn set_columns_normalizes_zero() {
        let (_, mut model) = grid(GridConfig::default());
        model.set_columns(0);
        assert_eq!(model.columns(), 12);
        model.set_columns(3);
        assert_eq!(model.columns(), 3);
    }

    #[test]
    fn resolve_climbs_to_the_item() {
        let (mut tree, mut model) = grid(GridConfig::default());
        let item = model.add_widget(&mut tree, Some("chart"), WidgetOptions::default()).unwrap();
        let label = tree.create_child(item, Some("label")).unwrap();

        assert_eq!(model.resolve(&tree, &Target::Id(label)), Some(item));
        assert_eq!(model.resolve(&tree, &"label".into()), Some(item));
        assert_eq!(model.resolve(&tree, &"chart".into()), Some(item));
        assert_eq!(model.resolve(&tree, &"nope".into()), None);
    }

    #[test]
    fn resolve_rejects_foreign_and_untracked_nodes() {
        let (mut tree, model) = grid(GridConfig::default());
        let elsewhere = tree.create_root(Some("other"));
        let foreign = tree
            .create_item(elsewhere, Some("foreign"), WidgetOptions::default())
            .unwrap();
        assert_eq!(model.resolve(&tree, &Target::Id(foreign)), None);
        assert_eq!(model.resolve(&tree, &"foreign".into()), None);

        let untracked = node(&mut tree, &model);
        assert_eq!(model.resolve(&tree, &Target::Id(untracked)), None);
        assert_eq!(model.resolve(&tree, &Target::Id(model.container())), None);
    }

    #[test]
    fn add_widget_frees_the_node_when_full() {
        let (mut tree, mut model) = grid(GridConfig::default().with_columns(2).with_rows(1));
        model
            .add_widget(&mut tree, None, WidgetOptions::sized(2, 1))
            .unwrap();
        let before = tree.len();
        assert!(model.add_widget(&mut tree, Some("late"), WidgetOptions::default()).is_none());
        assert_eq!(tree.len(), before);
        assert_eq!(tree.find("late"), None);
    }

    #[test]
    fn place_node_moves_it_under_the_container() {
        let (mut tree, mut model) = grid(GridConfig::default());
        let stray = tree.create_root(Some("stray"));
        tree.set_item(stray, WidgetOptions::at(2, 3, 1, 1));
        let id = model.place_node(&mut tree, &"stray".into(), WidgetOptions::default()).unwrap();
        assert_eq!(id, stray);
        assert_eq!(tree.parent(id), Some(model.container()));
        let item = model.get(id).unwrap();
        assert_eq!((item.x, item.y), (2, 3));
    }

    #[test]
    fn failed_place_node_restores_the_node() {
        let (mut tree, mut model) = grid(GridConfig::default().with_columns(2).with_rows(1));
        model.add_widget(&mut tree, None, WidgetOptions::sized(2, 1)).unwrap();

        let holder = tree.create_root(Some("holder"));
        let first = tree.create_child(holder, None).unwrap();
        let stray = tree.create_child(holder, Some("stray")).unwrap();
        let last = tree.create_child(holder, None).unwrap();

        assert!(model.place_node(&mut tree, &"stray".into(), WidgetOptions::default()).is_none());
        assert_eq!(tree.children(holder), &[first, stray, last]);
        assert!(!tree.is_item(stray));
        assert!(!model.contains(stray));

        let loose = tree.create_root(Some("loose"));
        assert!(model.place_node(&mut tree, &"loose".into(), WidgetOptions::default()).is_none());
        assert_eq!(tree.parent(loose), None);
    }

    #[test]
    fn remove_widget_detaches_but_keeps_node() {
        let (mut tree, mut model) = grid(GridConfig::default());
        let id = model.add_widget(&mut tree, Some("w"), WidgetOptions::default()).unwrap();
        assert!(model.remove_widget(&mut tree, &Target::Id(id)));
        assert!(tree.is_alive(id));
        assert_eq!(tree.parent(id), None);
        assert!(!model.remove_widget(&mut tree, &Target::Id(id)));
    }
}
