#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure collision system that validates proposed player movement.
//!
//! Admissibility is decided against the wall segments bounding the 3×3 cell
//! neighborhood of the candidate position. Each segment is tested
//! independently with a perpendicular-distance check, so the player's
//! circular body keeps a `radius`-wide margin from every wall line. The
//! system holds no state of its own; every function is a pure predicate over
//! a [`WallGridView`].

use maze_scout_core::{CellCoord, MoveInput, PlayerState, WallGridView, WallOrientation};

/// Reports whether a circle of `radius` centred at `(x, y)` fits at the
/// candidate position.
///
/// The position is rejected when the radius-inflated circle leaves the maze's
/// pixel bounds, or when any wall segment bounding a cell in the candidate's
/// 3×3 neighborhood passes closer than `radius` to the centre.
#[must_use]
pub fn can_move_to(
    x: f32,
    y: f32,
    radius: f32,
    grid: WallGridView<'_>,
    cell_size: f32,
    maze_pixel_width: f32,
    maze_pixel_height: f32,
) -> bool {
    if x - radius < 0.0
        || x + radius > maze_pixel_width
        || y - radius < 0.0
        || y + radius > maze_pixel_height
    {
        return false;
    }

    let candidate = CellCoord::from_pixel(x, y, cell_size);
    for d_row in -1..=1 {
        for d_column in -1..=1 {
            let cell = CellCoord::new(candidate.column() + d_column, candidate.row() + d_row);
            if cell_walls_collide(cell, x, y, radius, grid, cell_size) {
                return false;
            }
        }
    }

    true
}

/// Derives the candidate position for one frame of directional input and
/// validates it.
///
/// Unit contributions from the four booleans are summed, normalized to unit
/// length when nonzero and scaled by `move_speed`, so diagonal input covers
/// the same distance as cardinal input. The step is atomic: the returned
/// position is either the fully validated candidate or `None`.
#[must_use]
pub fn resolve_move(
    input: MoveInput,
    player: &PlayerState,
    move_speed: f32,
    grid: WallGridView<'_>,
    cell_size: f32,
    maze_pixel_width: f32,
    maze_pixel_height: f32,
) -> Option<(f32, f32)> {
    let mut dx = 0.0f32;
    let mut dy = 0.0f32;
    if input.up() {
        dy -= 1.0;
    }
    if input.down() {
        dy += 1.0;
    }
    if input.left() {
        dx -= 1.0;
    }
    if input.right() {
        dx += 1.0;
    }

    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return None;
    }

    let x = player.x() + dx / length * move_speed;
    let y = player.y() + dy / length * move_speed;

    if can_move_to(
        x,
        y,
        player.radius(),
        grid,
        cell_size,
        maze_pixel_width,
        maze_pixel_height,
    ) {
        Some((x, y))
    } else {
        None
    }
}

/// Tests the four wall segments bounding `cell` against the candidate centre.
fn cell_walls_collide(
    cell: CellCoord,
    x: f32,
    y: f32,
    radius: f32,
    grid: WallGridView<'_>,
    cell_size: f32,
) -> bool {
    let left = cell.column() as f32 * cell_size;
    let right = left + cell_size;
    let top = cell.row() as f32 * cell_size;
    let bottom = top + cell_size;

    // Top and bottom horizontal segments.
    if grid.wall(WallOrientation::Horizontal, cell.row(), cell.column())
        && horizontal_segment_collides(x, y, radius, top, left, right)
    {
        return true;
    }
    if grid.wall(WallOrientation::Horizontal, cell.row() + 1, cell.column())
        && horizontal_segment_collides(x, y, radius, bottom, left, right)
    {
        return true;
    }

    // Left and right vertical segments.
    if grid.wall(WallOrientation::Vertical, cell.row(), cell.column())
        && vertical_segment_collides(x, y, radius, left, top, bottom)
    {
        return true;
    }
    if grid.wall(WallOrientation::Vertical, cell.row(), cell.column() + 1)
        && vertical_segment_collides(x, y, radius, right, top, bottom)
    {
        return true;
    }

    false
}

fn horizontal_segment_collides(
    x: f32,
    y: f32,
    radius: f32,
    wall_y: f32,
    wall_x1: f32,
    wall_x2: f32,
) -> bool {
    (y - wall_y).abs() < radius && x >= wall_x1 && x <= wall_x2
}

fn vertical_segment_collides(
    x: f32,
    y: f32,
    radius: f32,
    wall_x: f32,
    wall_y1: f32,
    wall_y2: f32,
) -> bool {
    (x - wall_x).abs() < radius && y >= wall_y1 && y <= wall_y2
}
