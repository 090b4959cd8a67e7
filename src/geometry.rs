//! # Grid Geometry
//!
//! Pure functions over grid-unit rectangles: the collision test and the
//! first-fit free-space scan used by auto-placement.

use serde::{Deserialize, Serialize};

/// Extra rows scanned below the lowest occupied row when the grid has no
/// row cap. Keeps the scan finite while always leaving room underneath.
pub const AUTO_PLACE_ROW_SLACK: u32 = 200;

/// A rectangle in grid units, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl GridRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }
}

/// A box in pixels, relative to the container's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Whether two rectangles overlap. Shared edges don't count.
pub fn intersects(a: &GridRect, b: &GridRect) -> bool {
    !(a.y >= b.bottom() || a.bottom() <= b.y || a.right() <= b.x || a.x >= b.right())
}

/// Whether `candidate` overlaps none of `occupied`.
pub fn is_area_free<'a, I>(occupied: I, candidate: &GridRect) -> bool
where
    I: IntoIterator<Item = &'a GridRect>,
{
    occupied.into_iter().all(|r| !intersects(candidate, r))
}

/// Lowest occupied row boundary (`max(y + h)`), 0 for an empty grid.
pub fn row_extent(occupied: &[GridRect]) -> u32 {
    occupied.iter().map(GridRect::bottom).max().unwrap_or(0)
}

/// First-fit scan for a free `w`×`h` slot.
///
/// Rows are scanned top to bottom and columns left to right inside each
/// row, so the result is always the smallest free `(y, x)`. With a row cap
/// the scan stops at `rows - h` (or row 0 when `h > rows`); without one it
/// runs [`AUTO_PLACE_ROW_SLACK`] rows past the current content.
pub fn find_empty_position(
    occupied: &[GridRect],
    columns: u32,
    rows: Option<u32>,
    w: u32,
    h: u32,
) -> Option<(u32, u32)> {
    let columns = columns.max(1);
    if w > columns {
        return None;
    }
    // An item taller than the cap can still start on row 0.
    let max_y = match rows {
        Some(rows) => rows.saturating_sub(h),
        None => row_extent(occupied).saturating_add(AUTO_PLACE_ROW_SLACK),
    };

    for y in 0..=max_y {
        for x in 0..=(columns - w) {
            if is_area_free(occupied, &GridRect::new(x, y, w, h)) {
                return Some((x, y));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: u32, y: u32, w: u32, h: u32) -> GridRect {
        GridRect::new(x, y, w, h)
    }

    #[test]
    fn overlapping_rects_intersect() {
        assert!(intersects(&r(0, 0, 2, 2), &r(1, 1, 2, 2)));
        assert!(intersects(&r(0, 0, 4, 4), &r(1, 1, 1, 1)));
        assert!(intersects(&r(1, 1, 1, 1), &r(0, 0, 4, 4)));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        assert!(!intersects(&r(0, 0, 2, 2), &r(2, 0, 2, 2)));
        assert!(!intersects(&r(0, 0, 2, 2), &r(0, 2, 2, 2)));
        assert!(!intersects(&r(2, 2, 1, 1), &r(0, 0, 2, 2)));
    }

    #[test]
    fn area_free_checks_every_item() {
        let occupied = vec![r(0, 0, 4, 2), r(8, 0, 4, 2)];
        assert!(is_area_free(&occupied, &r(4, 0, 4, 2)));
        assert!(!is_area_free(&occupied, &r(3, 1, 2, 1)));
        assert!(is_area_free(&[], &r(0, 0, 12, 12)));
    }

    #[test]
    fn empty_grid_places_top_left() {
        assert_eq!(find_empty_position(&[], 12, None, 4, 2), Some((0, 0)));
    }

    #[test]
    fn first_free_column_on_the_row_wins() {
        let occupied = vec![r(0, 0, 4, 2)];
        assert_eq!(find_empty_position(&occupied, 12, None, 4, 2), Some((4, 0)));
    }

    #[test]
    fn scan_is_row_major() {
        // Row 0 has a 1-wide hole at x=11, row 1 is free from x=2.
        let occupied = vec![r(0, 0, 11, 1), r(0, 1, 2, 1)];
        assert_eq!(find_empty_position(&occupied, 12, None, 1, 1), Some((11, 0)));
        assert_eq!(find_empty_position(&occupied, 12, None, 2, 1), Some((2, 1)));
    }

    #[test]
    fn unbounded_grid_places_below_content() {
        let occupied = vec![r(0, 0, 12, 3)];
        assert_eq!(find_empty_position(&occupied, 12, None, 12, 1), Some((0, 3)));
    }

    #[test]
    fn row_cap_is_respected() {
        let occupied = vec![r(0, 0, 12, 2)];
        assert_eq!(find_empty_position(&occupied, 12, Some(2), 1, 1), None);
        assert_eq!(find_empty_position(&occupied, 12, Some(3), 1, 1), Some((0, 2)));
    }

    #[test]
    fn taller_than_cap_only_tries_row_zero() {
        assert_eq!(find_empty_position(&[], 12, Some(2), 1, 3), Some((0, 0)));
        let occupied = vec![r(0, 0, 12, 1)];
        assert_eq!(find_empty_position(&occupied, 12, Some(2), 1, 3), None);
    }

    #[test]
    fn too_wide_never_fits() {
        assert_eq!(find_empty_position(&[], 4, None, 5, 1), None);
    }

    #[test]
    fn row_extent_of_items() {
        assert_eq!(row_extent(&[]), 0);
        assert_eq!(row_extent(&[r(0, 0, 1, 2), r(3, 4, 1, 1)]), 5);
    }
}
