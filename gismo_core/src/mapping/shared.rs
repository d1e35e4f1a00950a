// gismo_core/src/mapping/shared.rs

//! A lockable handle to an [`OccupancyGrid`] for when the control loop and a
//! renderer live on different threads.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nalgebra::Vector2;

use crate::mapping::occupancy_grid::{MapUpdate, OccupancyGrid, OccupancyStats};

/// Cloneable, thread-safe handle to one grid.
///
/// Every operation takes the lock exactly once, so a render never observes a
/// half-traced line.
#[derive(Debug, Clone)]
pub struct SharedOccupancyGrid {
    inner: Arc<Mutex<OccupancyGrid>>,
}

impl SharedOccupancyGrid {
    pub fn new(grid: OccupancyGrid) -> Self {
        Self {
            inner: Arc::new(Mutex::new(grid)),
        }
    }

    // A panic while holding the lock cannot leave a cell outside [0, 1]:
    // every write is a single clamped store. The data is still usable.
    fn lock(&self) -> MutexGuard<'_, OccupancyGrid> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn update_map(
        &self,
        position: Vector2<f64>,
        distance_cm: Option<f64>,
        heading: f64,
    ) -> MapUpdate {
        self.lock().update_map(position, distance_cm, heading)
    }

    pub fn display_map(&self, robot_position: Option<&Vector2<f64>>) -> String {
        self.lock().display_map(robot_position)
    }

    pub fn stats(&self) -> OccupancyStats {
        self.lock().stats()
    }

    /// Copies the grid out under the lock.
    pub fn snapshot(&self) -> OccupancyGrid {
        self.lock().clone()
    }

    /// Runs `f` with the lock held.
    pub fn with<R>(&self, f: impl FnOnce(&OccupancyGrid) -> R) -> R {
        f(&self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MapConfig, RangeConfig};
    use crate::types::GridIndex;
    use std::thread;

    #[test]
    fn writers_and_renderers_share_one_grid() {
        let grid = OccupancyGrid::new(MapConfig::default(), RangeConfig::default()).unwrap();
        let shared = SharedOccupancyGrid::new(grid);

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    shared.update_map(Vector2::zeros(), Some(100.0), 0.0);
                }
            })
        };
        let reader = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    let text = shared.display_map(Some(&Vector2::zeros()));
                    assert_eq!(text.lines().count(), 52);
                }
            })
        };
        writer.join().unwrap();
        reader.join().unwrap();

        assert_eq!(shared.with(|g| g.cell(GridIndex::new(35, 25))), Some(1.0));
        assert_eq!(shared.snapshot().cell(GridIndex::new(30, 25)), Some(0.0));
        assert_eq!(shared.stats().occupied, 1);
    }
}
