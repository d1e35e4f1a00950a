// gismo_core/src/mapping/render.rs

//! Plain-text rendering of an [`OccupancyGrid`].
//!
//! Layout for a 2×3 grid with the robot in the bottom-left cell:
//!
//! ```text
//!  -------
//! | ? X ? |
//! | R     |
//!  -------
//! ```
//!
//! Each text row is one value of the grid's first index (world x), printed
//! from the highest index down; columns follow the second index (world y).

use nalgebra::Vector2;

use crate::mapping::occupancy_grid::{CellState, OccupancyGrid};

/// Characters used per cell state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub robot: char,
    pub occupied: char,
    pub free: char,
    pub unknown: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            robot: 'R',
            occupied: 'X',
            free: ' ',
            unknown: '?',
        }
    }
}

impl Glyphs {
    pub fn for_state(&self, state: CellState) -> char {
        match state {
            CellState::Occupied => self.occupied,
            CellState::Free => self.free,
            CellState::Unknown => self.unknown,
        }
    }
}

/// Renders `grid` into a bordered block of text, one line per grid row,
/// terminated by a newline. Never mutates the grid. A robot position that is
/// off the grid or not finite is not drawn.
pub fn render_grid(
    grid: &OccupancyGrid,
    robot_position: Option<&Vector2<f64>>,
    glyphs: &Glyphs,
) -> String {
    let (rows, cols) = grid.shape();
    let robot = robot_position
        .filter(|p| p.iter().all(|v| v.is_finite()))
        .map(|p| grid.world_to_grid(p))
        .and_then(|idx| grid.in_bounds(idx));

    let border = format!(" {} \n", "-".repeat(cols * 2 + 1));
    let mut out = String::with_capacity((rows + 2) * (cols * 2 + 4));
    out.push_str(&border);

    for i in (0..rows).rev() {
        out.push('|');
        for j in 0..cols {
            let glyph = if robot == Some((i, j)) {
                glyphs.robot
            } else {
                glyphs.for_state(grid.classify(grid.cells()[(i, j)]))
            };
            out.push(' ');
            out.push(glyph);
        }
        out.push_str(" |\n");
    }

    out.push_str(&border);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MapConfig, RangeConfig};
    use crate::types::GridIndex;

    fn small_grid() -> OccupancyGrid {
        let config = MapConfig {
            grid_size_x: 2,
            grid_size_y: 3,
            cell_size: 1.0,
            ..Default::default()
        };
        OccupancyGrid::new(config, RangeConfig::default()).unwrap()
    }

    #[test]
    fn renders_border_and_unknown_cells() {
        let grid = small_grid();
        let text = grid.display_map(None);
        assert_eq!(text, " ------- \n| ? ? ? |\n| ? ? ? |\n ------- \n");
    }

    #[test]
    fn highest_row_is_printed_first() {
        let mut grid = small_grid();
        grid.set_cell(GridIndex::new(1, 1), 0.9);
        grid.set_cell(GridIndex::new(0, 1), 0.05);
        grid.set_cell(GridIndex::new(0, 2), 0.9);
        // Robot at the origin maps to cell (1, 1) and hides the obstacle there.
        let with_robot = grid.display_map(Some(&Vector2::zeros()));
        assert_eq!(with_robot, " ------- \n| ? R ? |\n| ?   X |\n ------- \n");

        let without_robot = grid.display_map(None);
        assert_eq!(without_robot, " ------- \n| ? X ? |\n| ?   X |\n ------- \n");
    }

    #[test]
    fn threshold_edges_render_as_occupied_and_free() {
        let mut grid = small_grid();
        let t = grid.config().obstacle_threshold;
        grid.set_cell(GridIndex::new(1, 0), t);
        grid.set_cell(GridIndex::new(1, 2), 1.0 - t);
        let text = grid.display_map(None);
        assert_eq!(text.lines().nth(1), Some("| X ?   |"));
    }

    #[test]
    fn robot_off_grid_is_not_drawn() {
        let grid = small_grid();
        let text = grid.display_map(Some(&Vector2::new(10.0, 10.0)));
        assert!(!text.contains('R'));
    }

    #[test]
    fn non_finite_robot_position_is_not_drawn() {
        let grid = small_grid();
        for p in [
            Vector2::new(f64::INFINITY, 0.0),
            Vector2::new(0.0, f64::NEG_INFINITY),
            Vector2::new(f64::NAN, f64::NAN),
            Vector2::new(1e300, -1e300),
        ] {
            let text = grid.display_map(Some(&p));
            assert_eq!(text, grid.display_map(None));
        }
    }

    #[test]
    fn rendering_does_not_mutate() {
        let mut grid = small_grid();
        grid.update_map(Vector2::zeros(), Some(100.0), 90.0);
        let before = grid.clone();
        let _ = grid.display_map(Some(&Vector2::zeros()));
        assert_eq!(grid, before);
    }

    #[test]
    fn custom_glyphs() {
        let grid = small_grid();
        let glyphs = Glyphs {
            unknown: '.',
            ..Default::default()
        };
        let text = render_grid(&grid, None, &glyphs);
        assert!(text.contains("| . . . |"));
    }
}
