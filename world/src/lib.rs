#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Scout.
//!
//! The world owns the wall grid, the grid geometry and the player. Mutation
//! happens exclusively through [`apply`], which executes [`Command`] values
//! and broadcasts [`Event`] values for systems to react to
//! deterministically. The wall grid itself is only mutated by the
//! maze-generation collaborator through `SetWall` commands; every other
//! consumer reads it through the [`WallGridView`] exposed by [`query`].

use maze_scout_core::{
    CellCoord, Command, Event, PlayerState, WallGridView, WallOrientation,
};
use maze_scout_system_collision as collision;

const DEFAULT_GRID_COLUMNS: u32 = 10;
const DEFAULT_GRID_ROWS: u32 = 10;
const DEFAULT_CELL_SIZE: f32 = 40.0;
const DEFAULT_PLAYER_RADIUS: f32 = 10.0;
const DEFAULT_MOVE_SPEED: f32 = 3.0;

const MIN_PLAYER_RADIUS: f32 = 0.1;
const MIN_CELL_SIZE: f32 = 1.0;

/// Dense wall storage backing the grid.
///
/// Horizontal segments span `(rows + 1) × columns`, vertical segments span
/// `rows × (columns + 1)`, both row-major. A freshly configured grid starts
/// fully walled; the maze-generation collaborator carves passages by
/// removing segments.
#[derive(Clone, Debug)]
struct WallGrid {
    columns: u32,
    rows: u32,
    horizontal: Vec<bool>,
    vertical: Vec<bool>,
}

impl WallGrid {
    fn fully_walled(columns: u32, rows: u32) -> Self {
        let horizontal = vec![true; ((rows + 1) * columns) as usize];
        let vertical = vec![true; (rows * (columns + 1)) as usize];
        Self {
            columns,
            rows,
            horizontal,
            vertical,
        }
    }

    /// Writes one segment; returns whether the stored value changed.
    ///
    /// Writes past the array extents are ignored, matching the read-side
    /// invariant that such segments are always present.
    fn set(&mut self, orientation: WallOrientation, row: i32, column: i32, present: bool) -> bool {
        let slot = match orientation {
            WallOrientation::Horizontal => {
                index_of(row, column, self.rows + 1, self.columns)
                    .and_then(|index| self.horizontal.get_mut(index))
            }
            WallOrientation::Vertical => index_of(row, column, self.rows, self.columns + 1)
                .and_then(|index| self.vertical.get_mut(index)),
        };

        match slot {
            Some(stored) if *stored != present => {
                *stored = present;
                true
            }
            _ => false,
        }
    }

    fn view(&self) -> WallGridView<'_> {
        WallGridView::new(&self.horizontal, &self.vertical, self.columns, self.rows)
    }
}

fn index_of(row: i32, column: i32, row_extent: u32, column_extent: u32) -> Option<usize> {
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

/// Represents the authoritative Maze Scout world state.
#[derive(Debug)]
pub struct World {
    wall_grid: WallGrid,
    cell_size: f32,
    player: PlayerState,
    move_speed: f32,
    start: CellCoord,
    end: CellCoord,
}

impl World {
    /// Creates a new world with the default fully-walled grid.
    #[must_use]
    pub fn new() -> Self {
        let wall_grid = WallGrid::fully_walled(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS);
        let start = CellCoord::new(0, 0);
        let end = CellCoord::new(
            DEFAULT_GRID_COLUMNS as i32 - 1,
            DEFAULT_GRID_ROWS as i32 - 1,
        );
        Self {
            wall_grid,
            cell_size: DEFAULT_CELL_SIZE,
            player: player_at_cell(start, DEFAULT_CELL_SIZE, DEFAULT_PLAYER_RADIUS),
            move_speed: DEFAULT_MOVE_SPEED,
            start,
            end,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn player_at_cell(cell: CellCoord, cell_size: f32, radius: f32) -> PlayerState {
    let x = (cell.column() as f32 + 0.5) * cell_size;
    let y = (cell.row() as f32 + 0.5) * cell_size;
    PlayerState::at(x, y, radius)
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            columns,
            rows,
            cell_size,
        } => {
            let columns = columns.max(1);
            let rows = rows.max(1);
            let cell_size = cell_size.max(MIN_CELL_SIZE);

            world.wall_grid = WallGrid::fully_walled(columns, rows);
            world.cell_size = cell_size;
            world.start = CellCoord::new(0, 0);
            world.end = CellCoord::new(columns as i32 - 1, rows as i32 - 1);
            world.player = player_at_cell(world.start, cell_size, world.player.radius());

            out_events.push(Event::GridConfigured {
                columns,
                rows,
                cell_size,
            });
        }
        Command::SetWall {
            orientation,
            row,
            column,
            present,
        } => {
            if world.wall_grid.set(orientation, row, column, present) {
                out_events.push(Event::WallChanged {
                    orientation,
                    row,
                    column,
                    present,
                });
            }
        }
        Command::ConfigurePlayer { radius, move_speed } => {
            world.player.set_radius(radius.max(MIN_PLAYER_RADIUS));
            world.move_speed = move_speed.max(0.0);
        }
        Command::MovePlayer { input } => {
            let (pixel_width, pixel_height) = pixel_extent(world);
            let accepted = collision::resolve_move(
                input,
                &world.player,
                world.move_speed,
                world.wall_grid.view(),
                world.cell_size,
                pixel_width,
                pixel_height,
            );

            if let Some((x, y)) = accepted {
                let from = world.player.cell(world.cell_size);
                world.player.commit_move(x, y);
                let to = world.player.cell(world.cell_size);
                out_events.push(Event::PlayerMoved { from, to });
            }
        }
    }
}

fn pixel_extent(world: &World) -> (f32, f32) {
    (
        world.wall_grid.columns as f32 * world.cell_size,
        world.wall_grid.rows as f32 * world.cell_size,
    )
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{pixel_extent, World};
    use maze_scout_core::{CellCoord, PlayerState, WallGridView};

    /// Captures a read-only view of the wall grid.
    #[must_use]
    pub fn wall_grid_view(world: &World) -> WallGridView<'_> {
        world.wall_grid.view()
    }

    /// Grid dimensions measured in cells.
    #[must_use]
    pub fn grid_size(world: &World) -> (u32, u32) {
        (world.wall_grid.columns, world.wall_grid.rows)
    }

    /// Length of one square cell in pixels.
    #[must_use]
    pub fn cell_size(world: &World) -> f32 {
        world.cell_size
    }

    /// Total grid extent in pixels.
    #[must_use]
    pub fn pixel_size(world: &World) -> (f32, f32) {
        pixel_extent(world)
    }

    /// Continuous player state.
    #[must_use]
    pub fn player(world: &World) -> &PlayerState {
        &world.player
    }

    /// Cell currently occupied by the player's centre.
    #[must_use]
    pub fn player_cell(world: &World) -> CellCoord {
        world.player.cell(world.cell_size)
    }

    /// Starting cell of the maze.
    #[must_use]
    pub fn start_cell(world: &World) -> CellCoord {
        world.start
    }

    /// Goal cell of the maze.
    #[must_use]
    pub fn end_cell(world: &World) -> CellCoord {
        world.end
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, query, World};
    use maze_scout_core::{CellCoord, Command, Event, MoveInput, WallOrientation};

    fn configure(world: &mut World, columns: u32, rows: u32, cell_size: f32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::ConfigureGrid {
                columns,
                rows,
                cell_size,
            },
            &mut events,
        );
        events
    }

    #[test]
    fn configure_grid_recentres_the_player_on_start() {
        let mut world = World::new();
        let events = configure(&mut world, 5, 4, 40.0);

        assert_eq!(
            events,
            vec![Event::GridConfigured {
                columns: 5,
                rows: 4,
                cell_size: 40.0,
            }]
        );
        assert_eq!(query::grid_size(&world), (5, 4));
        assert_eq!(query::start_cell(&world), CellCoord::new(0, 0));
        assert_eq!(query::end_cell(&world), CellCoord::new(4, 3));
        assert_eq!(query::player(&world).x(), 20.0);
        assert_eq!(query::player(&world).y(), 20.0);
        assert_eq!(query::pixel_size(&world), (200.0, 160.0));
    }

    #[test]
    fn configure_grid_clamps_degenerate_dimensions() {
        let mut world = World::new();
        let events = configure(&mut world, 0, 0, 0.0);

        assert_eq!(query::grid_size(&world), (1, 1));
        assert!(query::cell_size(&world) >= 1.0);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn fresh_grid_is_fully_walled() {
        let mut world = World::new();
        let _ = configure(&mut world, 3, 3, 40.0);
        let view = query::wall_grid_view(&world);

        for row in 0..3 {
            for column in 0..3 {
                assert!(view.wall(WallOrientation::Horizontal, row, column));
                assert!(view.wall(WallOrientation::Vertical, row, column));
            }
        }
        assert!(!view.can_move(CellCoord::new(0, 0), 1, 0));
    }

    #[test]
    fn set_wall_emits_one_event_per_effective_change() {
        let mut world = World::new();
        let _ = configure(&mut world, 3, 3, 40.0);

        let command = Command::SetWall {
            orientation: WallOrientation::Vertical,
            row: 0,
            column: 1,
            present: false,
        };

        let mut events = Vec::new();
        apply(&mut world, command, &mut events);
        apply(&mut world, command, &mut events);

        assert_eq!(events.len(), 1);
        assert!(query::wall_grid_view(&world).can_move(CellCoord::new(0, 0), 1, 0));
    }

    #[test]
    fn set_wall_past_extent_is_ignored() {
        let mut world = World::new();
        let _ = configure(&mut world, 3, 3, 40.0);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetWall {
                orientation: WallOrientation::Horizontal,
                row: 7,
                column: 0,
                present: false,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetWall {
                orientation: WallOrientation::Vertical,
                row: 0,
                column: -1,
                present: false,
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert!(query::wall_grid_view(&world).wall(WallOrientation::Horizontal, 7, 0));
    }

    #[test]
    fn accepted_move_records_previous_position() {
        let mut world = World::new();
        let _ = configure(&mut world, 3, 1, 40.0);
        // Open the passage east of the start cell.
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetWall {
                orientation: WallOrientation::Vertical,
                row: 0,
                column: 1,
                present: false,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ConfigurePlayer {
                radius: 5.0,
                move_speed: 4.0,
            },
            &mut events,
        );

        events.clear();
        apply(
            &mut world,
            Command::MovePlayer {
                input: MoveInput::new(false, false, false, true),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::PlayerMoved {
                from: CellCoord::new(0, 0),
                to: CellCoord::new(0, 0),
            }]
        );
        let player = query::player(&world);
        assert_eq!(player.prev_x(), 20.0);
        assert_eq!(player.x(), 24.0);
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut world = World::new();
        let _ = configure(&mut world, 3, 1, 40.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigurePlayer {
                radius: 15.0,
                move_speed: 10.0,
            },
            &mut events,
        );

        events.clear();
        // Fully walled start cell: every step is inadmissible.
        apply(
            &mut world,
            Command::MovePlayer {
                input: MoveInput::new(false, false, false, true),
            },
            &mut events,
        );

        assert!(events.is_empty());
        let player = query::player(&world);
        assert_eq!(player.x(), 20.0);
        assert_eq!(player.prev_x(), 20.0);
    }

    #[test]
    fn idle_input_is_ignored() {
        let mut world = World::new();
        let _ = configure(&mut world, 3, 1, 40.0);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePlayer {
                input: MoveInput::default(),
            },
            &mut events,
        );

        assert!(events.is_empty());
    }
}
