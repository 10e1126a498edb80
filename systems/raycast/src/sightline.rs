//! Discrete cell-to-cell line of sight.
//!
//! Answers adjacency-style "can an observer at cell A see cell B" queries by
//! walking a Bresenham traversal between the two cells and checking
//! passability between each consecutive pair. Independent of the continuous
//! raycaster.

use maze_scout_core::{CellCoord, WallGridView};

/// Reports whether an unobstructed Bresenham traversal connects `from` to
/// `to`.
///
/// Returns false as soon as any step of the traversal is blocked, true once
/// the traversal reaches the target cell. A cell always sees itself.
#[must_use]
pub fn cells_visible(grid: WallGridView<'_>, from: CellCoord, to: CellCoord) -> bool {
    if !grid.contains(from) || !grid.contains(to) {
        return false;
    }

    let dx = (to.column() - from.column()).abs();
    let dy = -(to.row() - from.row()).abs();
    let sx = (to.column() - from.column()).signum();
    let sy = (to.row() - from.row()).signum();
    let mut error = dx + dy;
    let mut current = from;

    while current != to {
        let doubled = 2 * error;
        let mut step_column = 0;
        let mut step_row = 0;
        if doubled >= dy {
            error += dy;
            step_column = sx;
        }
        if doubled <= dx {
            error += dx;
            step_row = sy;
        }

        if !grid.can_move(current, step_column, step_row) {
            return false;
        }
        current = CellCoord::new(current.column() + step_column, current.row() + step_row);
    }

    true
}

#[cfg(test)]
mod tests {
    use super::cells_visible;
    use maze_scout_core::{CellCoord, WallGridView};

    fn perimeter_only(columns: u32, rows: u32) -> (Vec<bool>, Vec<bool>) {
        let mut horizontal = vec![false; ((rows + 1) * columns) as usize];
        let mut vertical = vec![false; (rows * (columns + 1)) as usize];
        for column in 0..columns as usize {
            horizontal[column] = true;
            horizontal[(rows * columns) as usize + column] = true;
        }
        for row in 0..rows as usize {
            vertical[row * (columns as usize + 1)] = true;
            vertical[row * (columns as usize + 1) + columns as usize] = true;
        }
        (horizontal, vertical)
    }

    #[test]
    fn cell_sees_itself() {
        let (horizontal, vertical) = perimeter_only(3, 3);
        let view = WallGridView::new(&horizontal, &vertical, 3, 3);
        assert!(cells_visible(view, CellCoord::new(1, 1), CellCoord::new(1, 1)));
    }

    #[test]
    fn open_grid_is_fully_connected() {
        let (horizontal, vertical) = perimeter_only(4, 4);
        let view = WallGridView::new(&horizontal, &vertical, 4, 4);
        assert!(cells_visible(view, CellCoord::new(0, 0), CellCoord::new(3, 3)));
        assert!(cells_visible(view, CellCoord::new(3, 0), CellCoord::new(0, 3)));
        assert!(cells_visible(view, CellCoord::new(0, 2), CellCoord::new(3, 2)));
    }

    #[test]
    fn traversal_stops_at_the_first_blocked_step() {
        let (horizontal, mut vertical) = perimeter_only(4, 1);
        vertical[2] = true; // between (1,0) and (2,0)
        let view = WallGridView::new(&horizontal, &vertical, 4, 1);
        assert!(cells_visible(view, CellCoord::new(0, 0), CellCoord::new(1, 0)));
        assert!(!cells_visible(view, CellCoord::new(0, 0), CellCoord::new(3, 0)));
        assert!(!cells_visible(view, CellCoord::new(3, 0), CellCoord::new(0, 0)));
    }

    #[test]
    fn out_of_grid_endpoints_are_never_visible() {
        let (horizontal, vertical) = perimeter_only(3, 3);
        let view = WallGridView::new(&horizontal, &vertical, 3, 3);
        assert!(!cells_visible(view, CellCoord::new(-1, 0), CellCoord::new(1, 1)));
        assert!(!cells_visible(view, CellCoord::new(1, 1), CellCoord::new(3, 3)));
    }
}
