// gismo_sim/src/simulation/world.rs

//! The static environment: a rectangular room with box obstacles and
//! drop-offs where the floor ends.

use nalgebra::Vector2;

use crate::simulation::config::{BoxObstacle, WorldConfig};

/// An axis-aligned rectangle given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

impl Aabb {
    pub fn from_center_size(center: Vector2<f64>, size: Vector2<f64>) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn contains(&self, point: &Vector2<f64>) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    /// Distance from `point` to the rectangle; zero inside it.
    pub fn distance_to(&self, point: &Vector2<f64>) -> f64 {
        let closest = Vector2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        );
        (point - closest).norm()
    }

    fn edges(&self) -> [(Vector2<f64>, Vector2<f64>); 4] {
        let (a, c) = (self.min, self.max);
        let b = Vector2::new(c.x, a.y);
        let d = Vector2::new(a.x, c.y);
        [(a, b), (b, c), (c, d), (d, a)]
    }
}

impl From<&BoxObstacle> for Aabb {
    fn from(obstacle: &BoxObstacle) -> Self {
        Aabb::from_center_size(obstacle.center.into(), obstacle.size.into())
    }
}

/// The room. Its walls run along `[0, width] × [0, height]`.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    bounds: Aabb,
    obstacles: Vec<Aabb>,
    /// Floor gaps. Invisible to the ranger and not solid, only the edge
    /// sensors notice them.
    drop_offs: Vec<Aabb>,
}

impl World {
    pub fn new(width: f64, height: f64, obstacles: Vec<Aabb>) -> Self {
        Self {
            bounds: Aabb {
                min: Vector2::zeros(),
                max: Vector2::new(width, height),
            },
            obstacles,
            drop_offs: Vec::new(),
        }
    }

    pub fn with_drop_offs(mut self, drop_offs: Vec<Aabb>) -> Self {
        self.drop_offs = drop_offs;
        self
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        let obstacles = config.obstacles.iter().map(Aabb::from).collect();
        let drop_offs = config.drop_offs.iter().map(Aabb::from).collect();
        Self::new(config.width_m, config.height_m, obstacles).with_drop_offs(drop_offs)
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn obstacles(&self) -> &[Aabb] {
        &self.obstacles
    }

    pub fn drop_offs(&self) -> &[Aabb] {
        &self.drop_offs
    }

    /// Whether there is no floor under `point`.
    pub fn is_drop_off(&self, point: &Vector2<f64>) -> bool {
        self.drop_offs.iter().any(|d| d.contains(point))
    }

    /// Whether a disc of `radius` centred on `point` fits without touching a
    /// wall or an obstacle.
    pub fn is_free(&self, point: &Vector2<f64>, radius: f64) -> bool {
        let b = &self.bounds;
        let inside = point.x - radius >= b.min.x
            && point.x + radius <= b.max.x
            && point.y - radius >= b.min.y
            && point.y + radius <= b.max.y;
        inside && self.obstacles.iter().all(|o| o.distance_to(point) > radius)
    }

    /// Casts a ray from `origin` along `heading` (radians) and returns the
    /// distance to the first surface, if it lies within `max_range`.
    pub fn raycast(&self, origin: &Vector2<f64>, heading: f64, max_range: f64) -> Option<f64> {
        let direction = Vector2::new(heading.cos(), heading.sin());
        std::iter::once(&self.bounds)
            .chain(self.obstacles.iter())
            .flat_map(|rect| rect.edges())
            .filter_map(|(a, b)| ray_segment(origin, &direction, &a, &b))
            .fold(None, |nearest: Option<f64>, t| {
                Some(nearest.map_or(t, |n| n.min(t)))
            })
            .filter(|&t| t <= max_range)
    }
}

fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Distance along the unit ray `origin + t * direction` to segment `a..b`.
fn ray_segment(
    origin: &Vector2<f64>,
    direction: &Vector2<f64>,
    a: &Vector2<f64>,
    b: &Vector2<f64>,
) -> Option<f64> {
    let segment = b - a;
    let denom = cross(direction, &segment);
    if denom.abs() < 1e-12 {
        return None; // parallel
    }
    let to_a = a - origin;
    let t = cross(&to_a, &segment) / denom;
    let u = cross(&to_a, direction) / denom;
    (t >= 0.0 && (0.0..=1.0).contains(&u)).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn room() -> World {
        World::new(
            4.0,
            4.0,
            vec![Aabb::from_center_size(
                Vector2::new(3.0, 2.0),
                Vector2::new(0.4, 0.4),
            )],
        )
    }

    #[test]
    fn ray_hits_nearest_surface() {
        let world = room();
        let origin = Vector2::new(2.0, 2.0);
        // Box face at x = 2.8.
        assert_abs_diff_eq!(world.raycast(&origin, 0.0, 5.0).unwrap(), 0.8, epsilon = 1e-9);
        // Walls.
        assert_abs_diff_eq!(world.raycast(&origin, PI, 5.0).unwrap(), 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(world.raycast(&origin, FRAC_PI_2, 5.0).unwrap(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn ray_beyond_max_range_reports_nothing() {
        let world = room();
        assert_eq!(world.raycast(&Vector2::new(2.0, 2.0), PI, 1.5), None);
    }

    #[test]
    fn free_space_respects_radius() {
        let world = room();
        assert!(world.is_free(&Vector2::new(2.0, 2.0), 0.1));
        assert!(!world.is_free(&Vector2::new(0.05, 2.0), 0.1));
        assert!(!world.is_free(&Vector2::new(2.75, 2.0), 0.1));
        assert!(world.is_free(&Vector2::new(2.65, 2.0), 0.1));
    }

    #[test]
    fn drop_offs_are_floor_gaps_not_walls() {
        let gap = Aabb::from_center_size(Vector2::new(1.0, 2.0), Vector2::new(0.4, 4.0));
        let world = room().with_drop_offs(vec![gap]);
        assert!(world.is_drop_off(&Vector2::new(1.1, 3.5)));
        assert!(!world.is_drop_off(&Vector2::new(1.5, 3.5)));
        // The ranger looks straight over it.
        assert_abs_diff_eq!(world.raycast(&Vector2::new(2.0, 2.0), PI, 5.0).unwrap(), 2.0, epsilon = 1e-9);
        assert!(world.is_free(&Vector2::new(1.0, 2.0), 0.1));
    }
}
