#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Scout engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views such as [`WallGridView`], and respond through their own outputs.

use serde::{Deserialize, Serialize};

/// Smallest number of rays a sweep may use.
pub const RAY_COUNT_MIN: u32 = 36;
/// Largest number of rays a sweep may use.
pub const RAY_COUNT_MAX: u32 = 720;
/// Narrowest field of view in degrees.
pub const FOV_DEGREES_MIN: f32 = 45.0;
/// Widest field of view in degrees.
pub const FOV_DEGREES_MAX: f32 = 360.0;
/// Shortest maximum ray reach measured in cells.
pub const MAX_RAY_DISTANCE_MIN: f32 = 1.0;
/// Longest maximum ray reach measured in cells.
pub const MAX_RAY_DISTANCE_MAX: f32 = 20.0;
/// Smallest permissible march increment as a fraction of a cell.
pub const RAY_STEP_MIN: f32 = 0.01;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Configures the world's cell grid using the provided dimensions.
    ConfigureGrid {
        /// Number of cell columns laid out in the grid.
        columns: u32,
        /// Number of cell rows laid out in the grid.
        rows: u32,
        /// Length of each square cell measured in pixels.
        cell_size: f32,
    },
    /// Sets or removes a single wall segment within the grid.
    SetWall {
        /// Orientation of the wall segment being mutated.
        orientation: WallOrientation,
        /// Row index of the segment within its wall array.
        row: i32,
        /// Column index of the segment within its wall array.
        column: i32,
        /// Whether the segment should be present after the mutation.
        present: bool,
    },
    /// Updates the player's physical parameters.
    ConfigurePlayer {
        /// Collision radius of the player measured in pixels.
        radius: f32,
        /// Distance covered by one accepted step measured in pixels.
        move_speed: f32,
    },
    /// Requests that the player advance one step derived from raw input.
    MovePlayer {
        /// Directional input sampled for the current frame.
        input: MoveInput,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the grid was reconfigured and all derived state reseeded.
    GridConfigured {
        /// Number of cell columns in the new grid.
        columns: u32,
        /// Number of cell rows in the new grid.
        rows: u32,
        /// Length of each square cell measured in pixels.
        cell_size: f32,
    },
    /// Confirms that a wall segment changed state.
    WallChanged {
        /// Orientation of the mutated segment.
        orientation: WallOrientation,
        /// Row index of the segment within its wall array.
        row: i32,
        /// Column index of the segment within its wall array.
        column: i32,
        /// State of the segment after the mutation.
        present: bool,
    },
    /// Confirms that the player completed an admissible move.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after completing the move.
        to: CellCoord,
    },
}

/// Orientation of a wall segment within the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallOrientation {
    /// Segment running along a horizontal grid line.
    Horizontal,
    /// Segment running along a vertical grid line.
    Vertical,
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that probes just outside the grid remain
/// representable; every such cell is treated as wall by the views that
/// consume it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Derives the cell containing the provided pixel-space point.
    #[must_use]
    pub fn from_pixel(x: f32, y: f32, cell_size: f32) -> Self {
        Self {
            column: (x / cell_size).floor() as i32,
            row: (y / cell_size).floor() as i32,
        }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

/// Single sampled point along a ray expressed in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisPoint {
    x: f32,
    y: f32,
    distance: f32,
}

impl VisPoint {
    /// Creates a new sampled point with the provided cumulative path length.
    #[must_use]
    pub const fn new(x: f32, y: f32, distance: f32) -> Self {
        Self { x, y, distance }
    }

    /// Horizontal pixel coordinate of the point.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical pixel coordinate of the point.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Cumulative path length from the ray origin to this point.
    #[must_use]
    pub const fn distance(&self) -> f32 {
        self.distance
    }

    /// Cell containing the point for the provided cell size.
    #[must_use]
    pub fn cell(&self, cell_size: f32) -> CellCoord {
        CellCoord::from_pixel(self.x, self.y, cell_size)
    }
}

/// Immutable snapshot of the ray sweep configuration.
///
/// Every constructor clamps its arguments into the documented bounds, so a
/// config value held by a system is always valid. Mutation happens by
/// rebuilding the snapshot through the `with_*` constructors; consumers that
/// cache derived results must invalidate explicitly when swapping snapshots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityConfig {
    ray_count: u32,
    fov_degrees: f32,
    max_ray_distance: f32,
    ray_step: f32,
}

impl VisibilityConfig {
    /// Creates a configuration snapshot, clamping every argument into bounds.
    #[must_use]
    pub fn new(ray_count: u32, fov_degrees: f32, max_ray_distance: f32, ray_step: f32) -> Self {
        Self {
            ray_count: ray_count.clamp(RAY_COUNT_MIN, RAY_COUNT_MAX),
            fov_degrees: fov_degrees.clamp(FOV_DEGREES_MIN, FOV_DEGREES_MAX),
            max_ray_distance: max_ray_distance.clamp(MAX_RAY_DISTANCE_MIN, MAX_RAY_DISTANCE_MAX),
            ray_step: ray_step.max(RAY_STEP_MIN),
        }
    }

    /// Rebuilds the snapshot with a new ray count, clamped into bounds.
    #[must_use]
    pub fn with_ray_count(self, ray_count: u32) -> Self {
        Self::new(ray_count, self.fov_degrees, self.max_ray_distance, self.ray_step)
    }

    /// Rebuilds the snapshot with a new field of view, clamped into bounds.
    #[must_use]
    pub fn with_fov_degrees(self, fov_degrees: f32) -> Self {
        Self::new(self.ray_count, fov_degrees, self.max_ray_distance, self.ray_step)
    }

    /// Rebuilds the snapshot with a new maximum reach, clamped into bounds.
    #[must_use]
    pub fn with_max_ray_distance(self, max_ray_distance: f32) -> Self {
        Self::new(self.ray_count, self.fov_degrees, max_ray_distance, self.ray_step)
    }

    /// Rebuilds the snapshot with a new march increment, clamped into bounds.
    #[must_use]
    pub fn with_ray_step(self, ray_step: f32) -> Self {
        Self::new(self.ray_count, self.fov_degrees, self.max_ray_distance, ray_step)
    }

    /// Number of rays swept per update.
    #[must_use]
    pub const fn ray_count(&self) -> u32 {
        self.ray_count
    }

    /// Angular extent of the sweep in degrees, measured from 0°.
    #[must_use]
    pub const fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    /// Maximum path length of a single ray measured in cells.
    #[must_use]
    pub const fn max_ray_distance(&self) -> f32 {
        self.max_ray_distance
    }

    /// March increment expressed as a fraction of a cell.
    #[must_use]
    pub const fn ray_step(&self) -> f32 {
        self.ray_step
    }
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self::new(360, 360.0, 8.0, 0.1)
    }
}

/// Continuous player state expressed in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerState {
    x: f32,
    y: f32,
    prev_x: f32,
    prev_y: f32,
    radius: f32,
}

impl PlayerState {
    /// Creates a player resting at the provided position.
    #[must_use]
    pub const fn at(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            prev_x: x,
            prev_y: y,
            radius,
        }
    }

    /// Horizontal pixel coordinate of the player's centre.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical pixel coordinate of the player's centre.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Horizontal coordinate held before the last accepted move.
    #[must_use]
    pub const fn prev_x(&self) -> f32 {
        self.prev_x
    }

    /// Vertical coordinate held before the last accepted move.
    #[must_use]
    pub const fn prev_y(&self) -> f32 {
        self.prev_y
    }

    /// Collision radius of the player in pixels.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Replaces the collision radius.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    /// Commits an accepted move, recording the previous position.
    ///
    /// Only called once a step has been validated; a rejected step never
    /// touches `prev_x`/`prev_y`.
    pub fn commit_move(&mut self, x: f32, y: f32) {
        self.prev_x = self.x;
        self.prev_y = self.y;
        self.x = x;
        self.y = y;
    }

    /// Cell currently occupied by the player's centre.
    #[must_use]
    pub fn cell(&self, cell_size: f32) -> CellCoord {
        CellCoord::from_pixel(self.x, self.y, cell_size)
    }
}

/// Directional input sampled from the host for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveInput {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl MoveInput {
    /// Creates an input sample from four directional booleans.
    #[must_use]
    pub const fn new(up: bool, down: bool, left: bool, right: bool) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }

    /// Whether the upward direction is held.
    #[must_use]
    pub const fn up(&self) -> bool {
        self.up
    }

    /// Whether the downward direction is held.
    #[must_use]
    pub const fn down(&self) -> bool {
        self.down
    }

    /// Whether the leftward direction is held.
    #[must_use]
    pub const fn left(&self) -> bool {
        self.left
    }

    /// Whether the rightward direction is held.
    #[must_use]
    pub const fn right(&self) -> bool {
        self.right
    }

    /// Reports whether no direction is held.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

/// Read-only view into the dense wall arrays of a grid.
///
/// Horizontal segments are stored in a `(rows + 1) × columns` array and
/// vertical segments in a `rows × (columns + 1)` array, both row-major. Any
/// read past an array's extent reports a wall as present, so rays and
/// collision probes can never escape the grid.
#[derive(Clone, Copy, Debug)]
pub struct WallGridView<'a> {
    horizontal: &'a [bool],
    vertical: &'a [bool],
    columns: u32,
    rows: u32,
}

impl<'a> WallGridView<'a> {
    /// Captures a new view backed by the provided wall slices.
    #[must_use]
    pub fn new(horizontal: &'a [bool], vertical: &'a [bool], columns: u32, rows: u32) -> Self {
        debug_assert_eq!(
            horizontal.len(),
            (rows as usize + 1) * columns as usize,
            "horizontal wall array must span (rows + 1) x columns"
        );
        debug_assert_eq!(
            vertical.len(),
            rows as usize * (columns as usize + 1),
            "vertical wall array must span rows x (columns + 1)"
        );
        Self {
            horizontal,
            vertical,
            columns,
            rows,
        }
    }

    /// Number of cell columns covered by the view.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows covered by the view.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Provides the dimensions of the underlying grid in cells.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= 0
            && cell.row() >= 0
            && (cell.column() as u32) < self.columns
            && (cell.row() as u32) < self.rows
    }

    /// Reads the wall segment at the provided array coordinates.
    ///
    /// Coordinates outside the array's extent always read as present.
    #[must_use]
    pub fn wall(&self, orientation: WallOrientation, row: i32, column: i32) -> bool {
        match orientation {
            WallOrientation::Horizontal => self
                .index(row, column, self.rows + 1, self.columns)
                .map_or(true, |index| {
                    self.horizontal.get(index).copied().unwrap_or(true)
                }),
            WallOrientation::Vertical => self
                .index(row, column, self.rows, self.columns + 1)
                .map_or(true, |index| {
                    self.vertical.get(index).copied().unwrap_or(true)
                }),
        }
    }

    /// Reports whether a single step from `cell` by `(d_column, d_row)` is
    /// passable.
    ///
    /// Cardinal steps check the separating wall segment; diagonal steps are
    /// passable when at least one of the two orthogonal two-step detours is
    /// clear. Steps ending outside the grid are never passable.
    #[must_use]
    pub fn can_move(&self, cell: CellCoord, d_column: i32, d_row: i32) -> bool {
        let destination = CellCoord::new(cell.column() + d_column, cell.row() + d_row);
        if !self.contains(cell) || !self.contains(destination) {
            return false;
        }

        match (d_column, d_row) {
            (0, 0) => true,
            (1, 0) => !self.wall(WallOrientation::Vertical, cell.row(), cell.column() + 1),
            (-1, 0) => !self.wall(WallOrientation::Vertical, cell.row(), cell.column()),
            (0, 1) => !self.wall(WallOrientation::Horizontal, cell.row() + 1, cell.column()),
            (0, -1) => !self.wall(WallOrientation::Horizontal, cell.row(), cell.column()),
            (column_step, row_step)
                if column_step.abs() == 1 && row_step.abs() == 1 =>
            {
                let via_column = CellCoord::new(cell.column() + column_step, cell.row());
                let via_row = CellCoord::new(cell.column(), cell.row() + row_step);
                (self.can_move(cell, column_step, 0) && self.can_move(via_column, 0, row_step))
                    || (self.can_move(cell, 0, row_step) && self.can_move(via_row, column_step, 0))
            }
            _ => false,
        }
    }

    fn index(&self, row: i32, column: i32, row_extent: u32, column_extent: u32) -> Option<usize> {
        if row < 0 || column < 0 {
            return None;
        }
        let row = row as u32;
        let column = column as u32;
        if row >= row_extent || column >= column_extent {
            return None;
        }
        Some(row as usize * column_extent as usize + column as usize)
    }
}
