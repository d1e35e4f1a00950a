// gismo_core/src/mapping/raycast.rs

//! Integer line rasterization for tracing a range reading through the grid.
//!
//! ```text
//! From (0,0) to (5,2):
//!
//!     2 │          ● ●
//!     1 │    ● ●
//!     0 ● ●
//!       └────────────
//!        0 1 2 3 4 5
//! ```

use crate::types::GridIndex;

/// Bresenham's line algorithm as an iterator.
///
/// Yields an 8-connected path from `start` to `end`, both inclusive. When
/// `start == end` it yields exactly one cell.
#[derive(Debug, Clone)]
pub struct Bresenham {
    x: i64,
    y: i64,
    end_x: i64,
    end_y: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    done: bool,
}

impl Bresenham {
    pub fn new(start: GridIndex, end: GridIndex) -> Self {
        let dx = (end.x - start.x).abs();
        let dy = (end.y - start.y).abs();
        Self {
            x: start.x,
            y: start.y,
            end_x: end.x,
            end_y: end.y,
            dx,
            dy,
            sx: if start.x < end.x { 1 } else { -1 },
            sy: if start.y < end.y { 1 } else { -1 },
            err: dx - dy,
            done: false,
        }
    }
}

impl Iterator for Bresenham {
    type Item = GridIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = GridIndex::new(self.x, self.y);
        if self.x == self.end_x && self.y == self.end_y {
            self.done = true;
            return Some(current);
        }

        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        // Chebyshev distance to the end, plus the current cell.
        let remaining = (self.end_x - self.x).abs().max((self.end_y - self.y).abs()) as usize + 1;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Bresenham {}

/// Collects the full line between two cells.
pub fn bresenham_line(start: GridIndex, end: GridIndex) -> Vec<GridIndex> {
    Bresenham::new(start, end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: i64, y0: i64, x1: i64, y1: i64) -> Vec<(i64, i64)> {
        bresenham_line(GridIndex::new(x0, y0), GridIndex::new(x1, y1))
            .into_iter()
            .map(|c| (c.x, c.y))
            .collect()
    }

    #[test]
    fn degenerate_line_is_a_single_point() {
        assert_eq!(line(2, 2, 2, 2), vec![(2, 2)]);
    }

    #[test]
    fn horizontal_line_includes_both_endpoints() {
        assert_eq!(line(0, 0, 3, 0), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn vertical_and_reverse_lines() {
        assert_eq!(line(1, 3, 1, 0), vec![(1, 3), (1, 2), (1, 1), (1, 0)]);
        assert_eq!(line(3, 0, 0, 0), vec![(3, 0), (2, 0), (1, 0), (0, 0)]);
    }

    #[test]
    fn diagonal_steps_both_axes() {
        assert_eq!(line(0, 0, -3, 3), vec![(0, 0), (-1, 1), (-2, 2), (-3, 3)]);
    }

    #[test]
    fn shallow_line_is_eight_connected() {
        let cells = line(0, 0, 7, 3);
        assert_eq!(cells.first(), Some(&(0, 0)));
        assert_eq!(cells.last(), Some(&(7, 3)));
        assert_eq!(cells.len(), 8);
        for pair in cells.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!((a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn size_hint_matches_output() {
        let it = Bresenham::new(GridIndex::new(-4, 2), GridIndex::new(5, -1));
        let expected = it.len();
        assert_eq!(it.count(), expected);
    }
}
