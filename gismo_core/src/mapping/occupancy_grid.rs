// gismo_core/src/mapping/occupancy_grid.rs

use log::trace;
use nalgebra::{DMatrix, Vector2};

use crate::config::{MapConfig, RangeConfig};
use crate::error::ConfigError;
use crate::mapping::raycast::Bresenham;
use crate::mapping::render;
use crate::types::GridIndex;

/// Probability every cell starts from.
pub const UNKNOWN: f64 = 0.5;

/// How a cell reads under the coupled obstacle / free thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Occupied,
    Free,
    Unknown,
}

/// Cell counts per [`CellState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OccupancyStats {
    pub occupied: usize,
    pub free: usize,
    pub unknown: usize,
}

/// Why a range reading left the map untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IgnoredReading {
    /// The sensor had no return this cycle.
    NoReading,
    /// Negative, NaN or infinite distance, or a non-finite pose component
    /// (carries the offending value).
    Invalid(f64),
    /// Farther than the trusted range; carries the reading in meters.
    OutOfRange(f64),
}

/// What a call to [`OccupancyGrid::update_map`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapUpdate {
    Ignored(IgnoredReading),
    Applied {
        robot: GridIndex,
        obstacle: GridIndex,
        /// Whether the obstacle cell was inside the grid and got its hit.
        obstacle_in_bounds: bool,
        /// Number of in-bounds cells the free-space trace lowered.
        cleared: usize,
    },
}

impl MapUpdate {
    pub fn is_applied(&self) -> bool {
        matches!(self, MapUpdate::Applied { .. })
    }
}

/// A fixed-size probabilistic occupancy map.
///
/// Cells are stored in a `grid_size_x × grid_size_y` matrix: the first index
/// follows world x, the second world y. The robot's starting position sits at
/// cell `(grid_size_x / 2, grid_size_y / 2)`. Every cell holds a probability
/// in `[0, 1]`, starting at [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    config: MapConfig,
    range: RangeConfig,
    cells: DMatrix<f64>,
}

impl OccupancyGrid {
    pub fn new(config: MapConfig, range: RangeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        range.validate()?;
        let cells = DMatrix::from_element(config.grid_size_x, config.grid_size_y, UNKNOWN);
        Ok(Self {
            config,
            range,
            cells,
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn range_config(&self) -> &RangeConfig {
        &self.range
    }

    /// (grid_size_x, grid_size_y)
    pub fn shape(&self) -> (usize, usize) {
        self.cells.shape()
    }

    pub fn cell_size(&self) -> f64 {
        self.config.cell_size
    }

    /// Maps a world position (meters) to its cell, centred on the grid.
    /// The result may lie outside the grid. Infinite coordinates land on the
    /// far edge of `i64`; NaN lands on the centre, so callers should reject
    /// non-finite positions first.
    pub fn world_to_grid(&self, position: &Vector2<f64>) -> GridIndex {
        let rounding = self.config.index_rounding;
        let (half_x, half_y) = (
            (self.config.grid_size_x / 2) as i64,
            (self.config.grid_size_y / 2) as i64,
        );
        // `as i64` saturates for huge or infinite inputs; keep the offset from
        // wrapping past it.
        GridIndex::new(
            rounding.apply(position.x / self.config.cell_size).saturating_add(half_x),
            rounding.apply(position.y / self.config.cell_size).saturating_add(half_y),
        )
    }

    /// Converts a signed cell to matrix indices when it lies inside the grid.
    pub fn in_bounds(&self, index: GridIndex) -> Option<(usize, usize)> {
        let (rows, cols) = self.cells.shape();
        let x = usize::try_from(index.x).ok().filter(|&x| x < rows)?;
        let y = usize::try_from(index.y).ok().filter(|&y| y < cols)?;
        Some((x, y))
    }

    pub fn cell(&self, index: GridIndex) -> Option<f64> {
        self.in_bounds(index).map(|ij| self.cells[ij])
    }

    /// Overwrites one cell, clamping to `[0, 1]`. Returns `false` when the
    /// index is outside the grid.
    pub fn set_cell(&mut self, index: GridIndex, probability: f64) -> bool {
        match self.in_bounds(index) {
            Some(ij) => {
                self.cells[ij] = probability.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    /// Read-only view of all cells.
    pub fn cells(&self) -> &DMatrix<f64> {
        &self.cells
    }

    /// Folds one range reading into the map.
    ///
    /// * `position`: robot position in meters, same frame as the estimator.
    /// * `distance_cm`: range reading in centimeters, `None` if the sensor
    ///   had nothing.
    /// * `heading`: degrees, counter-clockwise from world +x.
    ///
    /// Readings that are missing, invalid, taken at a non-finite pose or
    /// beyond the trusted range are dropped without touching any cell. Otherwise the obstacle cell gains
    /// `hit_increment` (if it lies on the grid) and every in-bounds cell on
    /// the line from the robot up to, but not including, the obstacle cell
    /// loses `miss_decrement`.
    pub fn update_map(
        &mut self,
        position: Vector2<f64>,
        distance_cm: Option<f64>,
        heading: f64,
    ) -> MapUpdate {
        let distance_cm = match distance_cm {
            None => return MapUpdate::Ignored(IgnoredReading::NoReading),
            Some(d) if !d.is_finite() || d < 0.0 => {
                return MapUpdate::Ignored(IgnoredReading::Invalid(d));
            }
            Some(d) => d,
        };

        if let Some(bad) = [position.x, position.y, heading]
            .into_iter()
            .find(|v| !v.is_finite())
        {
            trace!("Dropping range reading taken at a non-finite pose");
            return MapUpdate::Ignored(IgnoredReading::Invalid(bad));
        }

        let distance = distance_cm / 100.0;
        if distance > self.range.max_range_m {
            trace!("Dropping range reading of {:.2} m", distance);
            return MapUpdate::Ignored(IgnoredReading::OutOfRange(distance));
        }

        let robot = self.world_to_grid(&position);
        let heading_rad = heading.to_radians();
        let hit = position + Vector2::new(heading_rad.cos(), heading_rad.sin()) * distance;
        let obstacle = self.world_to_grid(&hit);

        let obstacle_in_bounds = match self.in_bounds(obstacle) {
            Some(ij) => {
                self.cells[ij] = (self.cells[ij] + self.config.hit_increment).min(1.0);
                true
            }
            None => false,
        };

        let mut cleared = 0;
        for cell in Bresenham::new(robot, obstacle).filter(|&c| c != obstacle) {
            if let Some(ij) = self.in_bounds(cell) {
                self.cells[ij] = (self.cells[ij] - self.config.miss_decrement).max(0.0);
                cleared += 1;
            }
        }

        MapUpdate::Applied {
            robot,
            obstacle,
            obstacle_in_bounds,
            cleared,
        }
    }

    /// Classifies a probability under the coupled thresholds.
    pub fn classify(&self, probability: f64) -> CellState {
        if probability >= self.config.obstacle_threshold {
            CellState::Occupied
        } else if probability <= self.config.free_threshold() {
            CellState::Free
        } else {
            CellState::Unknown
        }
    }

    pub fn stats(&self) -> OccupancyStats {
        self.cells
            .iter()
            .fold(OccupancyStats::default(), |mut acc, &p| {
                match self.classify(p) {
                    CellState::Occupied => acc.occupied += 1,
                    CellState::Free => acc.free += 1,
                    CellState::Unknown => acc.unknown += 1,
                }
                acc
            })
    }

    /// Renders the grid as bordered text, highest row first. See
    /// [`render::render_grid`] for the layout.
    pub fn display_map(&self, robot_position: Option<&Vector2<f64>>) -> String {
        render::render_grid(self, robot_position, &render::Glyphs::default())
    }
}
