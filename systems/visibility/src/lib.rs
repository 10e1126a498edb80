#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Accumulates per-frame visibility into monotonic explored and visited sets.
//!
//! Every frame the raycast system reports the cells currently in view; this
//! system folds them into an append-only explored set and notifies observers
//! on first discovery. Cells the player's own position has occupied form the
//! separately monotonic visited set. Both sets only shrink when the maze
//! itself is reinitialised.

use std::collections::HashSet;

use maze_scout_core::CellCoord;
use thiserror::Error;

/// Failure reported by a discovery observer.
///
/// Observer faults are isolated: the accumulator logs them and carries on
/// with the remaining notifications, and the explored-set state already
/// committed stays committed.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct ObserverError {
    reason: String,
}

impl ObserverError {
    /// Creates an observer error with the provided reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Receives a notification the first time each cell becomes visible.
pub trait DiscoveryObserver {
    /// Called once per newly discovered cell with the running explored count.
    fn cell_discovered(&mut self, cell: CellCoord, explored_count: usize)
        -> Result<(), ObserverError>;
}

/// Folds visible-cell sets into monotonically growing explored and visited
/// sets.
#[derive(Default)]
pub struct VisibilityAccumulator {
    explored: HashSet<CellCoord>,
    visited: HashSet<CellCoord>,
    observers: Vec<Box<dyn DiscoveryObserver>>,
}

impl VisibilityAccumulator {
    /// Creates an accumulator with empty sets and no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer for discovery notifications.
    ///
    /// Observers survive maze reinitialisation; only the sets are reseeded.
    pub fn add_observer(&mut self, observer: Box<dyn DiscoveryObserver>) {
        self.observers.push(observer);
    }

    /// Clears both sets and reseeds the visited set with the starting cell.
    pub fn reset(&mut self, start_cell: CellCoord) {
        self.explored.clear();
        self.visited.clear();
        let _ = self.visited.insert(start_cell);
    }

    /// Folds one frame's visible cells into the explored set and records the
    /// player's own cell as visited.
    ///
    /// Newly discovered cells are processed in sorted order so notification
    /// sequences are deterministic. Each discovery is committed before its
    /// observers run; a faulting observer is logged and skipped without
    /// aborting the remaining notifications.
    pub fn record_frame(&mut self, visible_cells: &HashSet<CellCoord>, player_cell: CellCoord) {
        let mut discovered: Vec<CellCoord> = visible_cells
            .iter()
            .copied()
            .filter(|cell| !self.explored.contains(cell))
            .collect();
        discovered.sort_unstable();

        for cell in discovered {
            let _ = self.explored.insert(cell);
            let explored_count = self.explored.len();
            for observer in &mut self.observers {
                if let Err(error) = observer.cell_discovered(cell, explored_count) {
                    tracing::warn!(
                        column = cell.column(),
                        row = cell.row(),
                        %error,
                        "discovery observer failed"
                    );
                }
            }
        }

        let _ = self.visited.insert(player_cell);
    }

    /// Exact membership test against the explored set.
    #[must_use]
    pub fn is_cell_explored(&self, cell: CellCoord) -> bool {
        self.explored.contains(&cell)
    }

    /// Exact membership test against the visited set.
    #[must_use]
    pub fn is_cell_visited(&self, cell: CellCoord) -> bool {
        self.visited.contains(&cell)
    }

    /// Number of cells ever rendered visible since the last reset.
    #[must_use]
    pub fn explored_count(&self) -> usize {
        self.explored.len()
    }

    /// Number of cells the player has occupied since the last reset.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

impl std::fmt::Debug for VisibilityAccumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityAccumulator")
            .field("explored", &self.explored.len())
            .field("visited", &self.visited.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{DiscoveryObserver, ObserverError, VisibilityAccumulator};
    use maze_scout_core::CellCoord;
    use std::collections::HashSet;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        notifications: Rc<RefCell<Vec<(CellCoord, usize)>>>,
    }

    impl DiscoveryObserver for Recorder {
        fn cell_discovered(
            &mut self,
            cell: CellCoord,
            explored_count: usize,
        ) -> Result<(), ObserverError> {
            self.notifications.borrow_mut().push((cell, explored_count));
            Ok(())
        }
    }

    struct AlwaysFails;

    impl DiscoveryObserver for AlwaysFails {
        fn cell_discovered(&mut self, _: CellCoord, _: usize) -> Result<(), ObserverError> {
            Err(ObserverError::new("observer rejected the notification"))
        }
    }

    fn cells(coords: &[(i32, i32)]) -> HashSet<CellCoord> {
        coords
            .iter()
            .map(|&(column, row)| CellCoord::new(column, row))
            .collect()
    }

    #[test]
    fn discoveries_carry_the_running_count_in_sorted_order() {
        let notifications = Rc::new(RefCell::new(Vec::new()));
        let mut accumulator = VisibilityAccumulator::new();
        accumulator.add_observer(Box::new(Recorder {
            notifications: Rc::clone(&notifications),
        }));

        accumulator.record_frame(&cells(&[(1, 0), (0, 0)]), CellCoord::new(0, 0));

        let recorded = notifications.borrow().clone();
        assert_eq!(
            recorded,
            vec![
                (CellCoord::new(0, 0), 1),
                (CellCoord::new(1, 0), 2),
            ]
        );
    }

    #[test]
    fn already_explored_cells_notify_only_once() {
        let notifications = Rc::new(RefCell::new(Vec::new()));
        let mut accumulator = VisibilityAccumulator::new();
        accumulator.add_observer(Box::new(Recorder {
            notifications: Rc::clone(&notifications),
        }));

        accumulator.record_frame(&cells(&[(0, 0), (1, 0)]), CellCoord::new(0, 0));
        accumulator.record_frame(&cells(&[(1, 0), (2, 0)]), CellCoord::new(1, 0));

        let recorded = notifications.borrow().clone();
        assert_eq!(recorded.len(), 3);
        assert_eq!(accumulator.explored_count(), 3);
    }

    #[test]
    fn explored_count_is_monotonic_across_frames() {
        let mut accumulator = VisibilityAccumulator::new();
        let frames = [
            cells(&[(0, 0), (1, 0)]),
            cells(&[(1, 0)]),
            cells(&[(2, 2), (0, 0)]),
            cells(&[]),
        ];

        let mut previous = 0;
        for frame in &frames {
            accumulator.record_frame(frame, CellCoord::new(0, 0));
            assert!(accumulator.explored_count() >= previous);
            previous = accumulator.explored_count();
        }
    }

    #[test]
    fn faulting_observer_does_not_abort_the_rest() {
        let notifications = Rc::new(RefCell::new(Vec::new()));
        let mut accumulator = VisibilityAccumulator::new();
        accumulator.add_observer(Box::new(AlwaysFails));
        accumulator.add_observer(Box::new(Recorder {
            notifications: Rc::clone(&notifications),
        }));

        accumulator.record_frame(&cells(&[(0, 0), (1, 1)]), CellCoord::new(0, 0));

        // The failing observer neither blocked the second observer nor the
        // explored-set commit.
        assert_eq!(notifications.borrow().len(), 2);
        assert_eq!(accumulator.explored_count(), 2);
        assert!(accumulator.is_cell_explored(CellCoord::new(1, 1)));
    }

    #[test]
    fn visited_tracks_player_cells_independently() {
        let mut accumulator = VisibilityAccumulator::new();
        accumulator.record_frame(&cells(&[(0, 0), (5, 5)]), CellCoord::new(0, 0));
        accumulator.record_frame(&cells(&[]), CellCoord::new(1, 0));

        assert!(accumulator.is_cell_visited(CellCoord::new(0, 0)));
        assert!(accumulator.is_cell_visited(CellCoord::new(1, 0)));
        assert!(!accumulator.is_cell_visited(CellCoord::new(5, 5)));
        assert_eq!(accumulator.visited_count(), 2);
    }

    #[test]
    fn reset_reseeds_the_visited_set() {
        let mut accumulator = VisibilityAccumulator::new();
        accumulator.record_frame(&cells(&[(0, 0), (1, 1), (2, 2)]), CellCoord::new(0, 0));
        assert_eq!(accumulator.explored_count(), 3);

        accumulator.reset(CellCoord::new(4, 4));

        assert_eq!(accumulator.explored_count(), 0);
        assert_eq!(accumulator.visited_count(), 1);
        assert!(accumulator.is_cell_visited(CellCoord::new(4, 4)));
    }
}
