#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Continuous raycast visibility system.
//!
//! The engine sweeps a configurable number of rays around the player's
//! position, marches each ray outward in fixed increments and stops at the
//! first occluding wall band or grid boundary. The union of traversed points
//! and the cells they fall in forms a [`VisibleFrame`], cached per quantized
//! origin so a stationary player costs nothing after the first frame.

use std::collections::HashSet;

use maze_scout_core::{CellCoord, VisPoint, VisibilityConfig, WallGridView, WallOrientation};

mod cache;
pub mod sightline;

use cache::{CacheKey, FrameCache};

/// Fraction of a cell's extent near a wall line that reads as occluded.
///
/// A ray can pass arbitrarily close to, but never exactly along, a wall line
/// without being blocked.
const OCCLUSION_BAND: f32 = 0.1;

/// Points and cells rendered visible by one sweep at a fixed origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleFrame {
    points: Vec<VisPoint>,
    cells: HashSet<CellCoord>,
}

impl VisibleFrame {
    /// Sampled points recorded by every ray, in sweep order.
    #[must_use]
    pub fn points(&self) -> &[VisPoint] {
        &self.points
    }

    /// Set of cells containing at least one sampled point.
    #[must_use]
    pub const fn cells(&self) -> &HashSet<CellCoord> {
        &self.cells
    }

    /// Exact membership test against the frame's cell set.
    #[must_use]
    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }
}

/// Stateful visibility engine owning the sweep configuration and frame cache.
#[derive(Debug, Default)]
pub struct RaycastEngine {
    config: VisibilityConfig,
    cache: FrameCache,
    current: Option<CacheKey>,
}

impl RaycastEngine {
    /// Creates an engine with the provided sweep configuration.
    #[must_use]
    pub fn new(config: VisibilityConfig) -> Self {
        Self {
            config,
            cache: FrameCache::default(),
            current: None,
        }
    }

    /// Current sweep configuration snapshot.
    #[must_use]
    pub const fn config(&self) -> VisibilityConfig {
        self.config
    }

    /// Replaces the ray count, clamped into bounds, and clears the cache.
    pub fn set_ray_count(&mut self, ray_count: u32) {
        self.config = self.config.with_ray_count(ray_count);
        self.invalidate();
    }

    /// Replaces the field of view, clamped into bounds, and clears the cache.
    pub fn set_fov(&mut self, fov_degrees: f32) {
        self.config = self.config.with_fov_degrees(fov_degrees);
        self.invalidate();
    }

    /// Replaces the maximum reach, clamped into bounds, and clears the cache.
    pub fn set_max_ray_distance(&mut self, max_ray_distance: f32) {
        self.config = self.config.with_max_ray_distance(max_ray_distance);
        self.invalidate();
    }

    /// Replaces the march increment, clamped into bounds, and clears the
    /// cache.
    pub fn set_ray_step(&mut self, ray_step: f32) {
        self.config = self.config.with_ray_step(ray_step);
        self.invalidate();
    }

    /// Drops every cached frame. Stale entries are never partially kept.
    pub fn invalidate(&mut self) {
        self.cache.clear();
        self.current = None;
    }

    /// Computes (or retrieves) the visibility frame for the provided origin.
    ///
    /// The origin is quantized to one decimal pixel and the sweep runs from
    /// the quantized position, so the returned frame is a pure function of
    /// the key: an exact cache hit returns the stored frame unchanged with no
    /// recomputation.
    pub fn update(
        &mut self,
        origin_x: f32,
        origin_y: f32,
        grid: WallGridView<'_>,
        cell_size: f32,
    ) -> &VisibleFrame {
        let key = CacheKey::quantize(origin_x, origin_y);
        self.current = Some(key);
        let config = self.config;
        self.cache
            .get_or_insert_with(key, || compute_frame(config, key, grid, cell_size))
    }

    /// Frame produced by the most recent [`RaycastEngine::update`] call.
    #[must_use]
    pub fn current_frame(&self) -> Option<&VisibleFrame> {
        self.current.as_ref().and_then(|key| self.cache.get(key))
    }

    /// Proximity test: true iff some point of the current frame lies within
    /// half a cell of `(x, y)`.
    ///
    /// This is an approximation, not an exact membership test.
    #[must_use]
    pub fn is_point_visible(&self, x: f32, y: f32, cell_size: f32) -> bool {
        let limit = 0.5 * cell_size;
        let limit_squared = limit * limit;
        self.current_frame().map_or(false, |frame| {
            frame.points().iter().any(|point| {
                let dx = point.x() - x;
                let dy = point.y() - y;
                dx * dx + dy * dy <= limit_squared
            })
        })
    }

    /// Exact membership test against the current frame's cell set.
    #[must_use]
    pub fn is_cell_visible(&self, cell: CellCoord) -> bool {
        self.current_frame()
            .map_or(false, |frame| frame.contains_cell(cell))
    }

    /// Number of frames currently retained by the cache.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

/// Sweeps every ray for one origin and collects the resulting frame.
fn compute_frame(
    config: VisibilityConfig,
    key: CacheKey,
    grid: WallGridView<'_>,
    cell_size: f32,
) -> VisibleFrame {
    let (origin_x, origin_y) = key.origin();
    let mut points = Vec::new();
    let angle_step = config.fov_degrees() / config.ray_count() as f32;

    for ray in 0..config.ray_count() {
        let angle = (ray as f32 * angle_step).to_radians();
        cast_ray(
            origin_x, origin_y, angle, &config, grid, cell_size, &mut points,
        );
    }

    let mut cells = HashSet::new();
    for point in &points {
        let _ = cells.insert(point.cell(cell_size));
    }

    VisibleFrame { points, cells }
}

/// Marches a single ray, appending every traversed point.
///
/// The march advances while the next cumulative distance stays strictly below
/// the configured maximum path length. An occluded point terminates the ray
/// before being recorded; a point whose cell falls outside the grid
/// terminates the ray after being recorded.
fn cast_ray(
    origin_x: f32,
    origin_y: f32,
    angle: f32,
    config: &VisibilityConfig,
    grid: WallGridView<'_>,
    cell_size: f32,
    points: &mut Vec<VisPoint>,
) {
    let step_length = config.ray_step() * cell_size;
    let max_length = config.max_ray_distance() * cell_size;
    let (sin, cos) = angle.sin_cos();

    let mut distance = 0.0f32;
    loop {
        let next = distance + step_length;
        if next >= max_length {
            break;
        }

        let x = origin_x + cos * next;
        let y = origin_y + sin * next;
        if point_in_wall(x, y, grid, cell_size) {
            break;
        }
        points.push(VisPoint::new(x, y, next));
        distance = next;

        if !grid.contains(CellCoord::from_pixel(x, y, cell_size)) {
            break;
        }
    }
}

/// Occlusion test for a continuous point.
///
/// The point is blocked when its cell lies outside the grid, or when it falls
/// inside the occlusion band of a present wall segment bounding its cell.
fn point_in_wall(x: f32, y: f32, grid: WallGridView<'_>, cell_size: f32) -> bool {
    let cell = CellCoord::from_pixel(x, y, cell_size);
    if !grid.contains(cell) {
        return true;
    }

    let rel_x = x / cell_size - cell.column() as f32;
    let rel_y = y / cell_size - cell.row() as f32;

    (rel_y < OCCLUSION_BAND && grid.wall(WallOrientation::Horizontal, cell.row(), cell.column()))
        || (rel_y > 1.0 - OCCLUSION_BAND
            && grid.wall(WallOrientation::Horizontal, cell.row() + 1, cell.column()))
        || (rel_x < OCCLUSION_BAND
            && grid.wall(WallOrientation::Vertical, cell.row(), cell.column()))
        || (rel_x > 1.0 - OCCLUSION_BAND
            && grid.wall(WallOrientation::Vertical, cell.row(), cell.column() + 1))
}
