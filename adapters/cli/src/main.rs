#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a headless Maze Scout session.
//!
//! The adapter owns everything the visibility core treats as external: it
//! carves a maze into the world's wall grid, polls (scripted) directional
//! input, and ticks the frame loop of move, sweep and accumulate. A carved
//! layout can be exported and re-imported as a single-line snapshot string.

mod layout_transfer;

use anyhow::Context;
use clap::Parser;
use maze_scout_core::{
    CellCoord, Command, Event, MoveInput, VisibilityConfig, WallOrientation,
};
use maze_scout_system_raycast::RaycastEngine;
use maze_scout_system_visibility::{DiscoveryObserver, ObserverError, VisibilityAccumulator};
use maze_scout_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use layout_transfer::{WallLayoutSnapshot, SNAPSHOT_HEADER};

/// Headless Maze Scout session driver.
#[derive(Debug, Parser)]
#[command(name = "maze-scout")]
struct Args {
    /// Number of cell columns in the carved grid.
    #[arg(long, default_value_t = 10)]
    columns: u32,

    /// Number of cell rows in the carved grid.
    #[arg(long, default_value_t = 10)]
    rows: u32,

    /// Length of one square cell in pixels.
    #[arg(long, default_value_t = 40.0)]
    cell_size: f32,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Seed for maze carving and the scripted wanderer.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of rays swept per visibility update.
    #[arg(long, default_value_t = 360)]
    ray_count: u32,

    /// Field of view of the sweep in degrees.
    #[arg(long, default_value_t = 360.0)]
    fov: f32,

    /// Maximum ray reach measured in cells.
    #[arg(long, default_value_t = 8.0)]
    max_ray_distance: f32,

    /// March increment as a fraction of a cell.
    #[arg(long, default_value_t = 0.1)]
    ray_step: f32,

    /// Wall-layout snapshot string to load instead of carving a maze.
    #[arg(long)]
    layout: Option<String>,

    /// Print the active wall layout as a snapshot string and exit.
    #[arg(long, default_value_t = false)]
    print_layout: bool,
}

/// Observer that reports discoveries through the tracing subscriber.
struct TracingObserver;

impl DiscoveryObserver for TracingObserver {
    fn cell_discovered(
        &mut self,
        cell: CellCoord,
        explored_count: usize,
    ) -> Result<(), ObserverError> {
        tracing::debug!(
            column = cell.column(),
            row = cell.row(),
            explored_count,
            "cell discovered"
        );
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut world = World::new();
    let mut events = Vec::new();

    if let Some(layout) = &args.layout {
        let snapshot = WallLayoutSnapshot::decode(layout)
            .with_context(|| format!("expected a '{SNAPSHOT_HEADER}' snapshot string"))?;
        snapshot.apply_to(&mut world, &mut events);
    } else {
        world::apply(
            &mut world,
            Command::ConfigureGrid {
                columns: args.columns,
                rows: args.rows,
                cell_size: args.cell_size,
            },
            &mut events,
        );
        carve_maze(&mut world, args.seed, &mut events);
    }

    if args.print_layout {
        println!("{}", WallLayoutSnapshot::capture(&world).encode());
        return Ok(());
    }

    world::apply(
        &mut world,
        Command::ConfigurePlayer {
            radius: 10.0,
            move_speed: 3.0,
        },
        &mut events,
    );

    let mut engine = RaycastEngine::new(VisibilityConfig::new(
        args.ray_count,
        args.fov,
        args.max_ray_distance,
        args.ray_step,
    ));
    let mut accumulator = VisibilityAccumulator::new();
    accumulator.add_observer(Box::new(TracingObserver));
    accumulator.reset(query::start_cell(&world));

    run_session(&mut world, &mut engine, &mut accumulator, &args);

    let (columns, rows) = query::grid_size(&world);
    let player_cell = query::player_cell(&world);
    println!(
        "explored {}/{} cells, visited {}, player at ({}, {}), goal at ({}, {})",
        accumulator.explored_count(),
        columns as usize * rows as usize,
        accumulator.visited_count(),
        player_cell.column(),
        player_cell.row(),
        query::end_cell(&world).column(),
        query::end_cell(&world).row(),
    );

    Ok(())
}

/// Ticks the frame loop: input, move, sweep, accumulate.
fn run_session(
    world: &mut World,
    engine: &mut RaycastEngine,
    accumulator: &mut VisibilityAccumulator,
    args: &Args,
) {
    let cell_size = query::cell_size(world);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed.wrapping_add(1));
    let mut direction = rng.gen_range(0..4u8);
    let mut events = Vec::new();

    // Initial sweep before any movement so the starting surroundings count
    // as explored.
    let player = query::player(world);
    let frame = engine.update(player.x(), player.y(), query::wall_grid_view(world), cell_size);
    accumulator.record_frame(frame.cells(), query::player_cell(world));

    for _ in 0..args.frames {
        events.clear();
        world::apply(
            world,
            Command::MovePlayer {
                input: direction_input(direction),
            },
            &mut events,
        );

        let moved = events
            .iter()
            .any(|event| matches!(event, Event::PlayerMoved { .. }));
        if moved {
            let player = query::player(world);
            let frame = engine.update(
                player.x(),
                player.y(),
                query::wall_grid_view(world),
                cell_size,
            );
            accumulator.record_frame(frame.cells(), query::player_cell(world));
        } else {
            // The wanderer walked into a wall; pick a new heading.
            direction = rng.gen_range(0..4);
        }
    }
}

fn direction_input(direction: u8) -> MoveInput {
    match direction {
        0 => MoveInput::new(true, false, false, false),
        1 => MoveInput::new(false, true, false, false),
        2 => MoveInput::new(false, false, true, false),
        _ => MoveInput::new(false, false, false, true),
    }
}

/// Carves a perfect maze into the world with a seeded recursive backtracker.
fn carve_maze(world: &mut World, seed: u64, out_events: &mut Vec<Event>) {
    let (columns, rows) = query::grid_size(world);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut visited = vec![false; columns as usize * rows as usize];
    let mut stack = vec![CellCoord::new(0, 0)];
    visited[0] = true;

    while let Some(cell) = stack.last().copied() {
        let mut candidates = Vec::new();
        for (d_column, d_row) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
            let neighbor = CellCoord::new(cell.column() + d_column, cell.row() + d_row);
            if neighbor.column() < 0
                || neighbor.row() < 0
                || neighbor.column() >= columns as i32
                || neighbor.row() >= rows as i32
            {
                continue;
            }
            let index = neighbor.row() as usize * columns as usize + neighbor.column() as usize;
            if !visited[index] {
                candidates.push((neighbor, index));
            }
        }

        if candidates.is_empty() {
            let _ = stack.pop();
            continue;
        }
        let (neighbor, index) = candidates[rng.gen_range(0..candidates.len())];

        let (orientation, row, column) = separating_wall(cell, neighbor);
        world::apply(
            world,
            Command::SetWall {
                orientation,
                row,
                column,
                present: false,
            },
            out_events,
        );
        visited[index] = true;
        stack.push(neighbor);
    }
}

/// Wall-array coordinates of the segment separating two adjacent cells.
fn separating_wall(cell: CellCoord, neighbor: CellCoord) -> (WallOrientation, i32, i32) {
    if neighbor.column() > cell.column() {
        (WallOrientation::Vertical, cell.row(), cell.column() + 1)
    } else if neighbor.column() < cell.column() {
        (WallOrientation::Vertical, cell.row(), cell.column())
    } else if neighbor.row() > cell.row() {
        (WallOrientation::Horizontal, cell.row() + 1, cell.column())
    } else {
        (WallOrientation::Horizontal, cell.row(), cell.column())
    }
}

#[cfg(test)]
mod tests {
    use super::{carve_maze, direction_input, separating_wall};
    use maze_scout_core::{CellCoord, Command, WallOrientation};
    use maze_scout_world::{self as world, query, World};
    use std::collections::VecDeque;

    #[test]
    fn carved_maze_connects_every_cell() {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureGrid {
                columns: 8,
                rows: 6,
                cell_size: 40.0,
            },
            &mut events,
        );
        carve_maze(&mut world, 7, &mut events);

        let view = query::wall_grid_view(&world);
        let mut reached = vec![false; 8 * 6];
        let mut frontier = VecDeque::from([CellCoord::new(0, 0)]);
        reached[0] = true;
        while let Some(cell) = frontier.pop_front() {
            for (d_column, d_row) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
                if !view.can_move(cell, d_column, d_row) {
                    continue;
                }
                let next = CellCoord::new(cell.column() + d_column, cell.row() + d_row);
                let index = next.row() as usize * 8 + next.column() as usize;
                if !reached[index] {
                    reached[index] = true;
                    frontier.push_back(next);
                }
            }
        }

        assert!(reached.iter().all(|&cell| cell));
    }

    #[test]
    fn carving_is_deterministic_per_seed() {
        let carve = |seed: u64| {
            let mut world = World::new();
            let mut events = Vec::new();
            world::apply(
                &mut world,
                Command::ConfigureGrid {
                    columns: 6,
                    rows: 6,
                    cell_size: 40.0,
                },
                &mut events,
            );
            events.clear();
            carve_maze(&mut world, seed, &mut events);
            events
        };

        assert_eq!(carve(11), carve(11));
        assert_ne!(carve(11), carve(12));
    }

    #[test]
    fn separating_wall_matches_cardinal_neighbors() {
        let cell = CellCoord::new(2, 3);
        assert_eq!(
            separating_wall(cell, CellCoord::new(3, 3)),
            (WallOrientation::Vertical, 3, 3)
        );
        assert_eq!(
            separating_wall(cell, CellCoord::new(1, 3)),
            (WallOrientation::Vertical, 3, 2)
        );
        assert_eq!(
            separating_wall(cell, CellCoord::new(2, 4)),
            (WallOrientation::Horizontal, 4, 2)
        );
        assert_eq!(
            separating_wall(cell, CellCoord::new(2, 2)),
            (WallOrientation::Horizontal, 3, 2)
        );
    }

    #[test]
    fn direction_inputs_cover_the_cardinals() {
        assert!(direction_input(0).up());
        assert!(direction_input(1).down());
        assert!(direction_input(2).left());
        assert!(direction_input(3).right());
    }
}
