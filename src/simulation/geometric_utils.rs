//! Geometric utility functions for regions, distances and headings.

use geo::algorithm::Distance;
use geo::{Euclidean, Intersects, Point, Rect, coord};
use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in world space.
///
/// Used for the spawn area, the goal region, dam contact zones, drop-off
/// boxes and placement sites. Points on the boundary count as inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Lower-left corner.
    pub min: [f32; 2],
    /// Upper-right corner.
    pub max: [f32; 2],
}

impl Region {
    /// Creates a region from two opposite corners in any order.
    pub fn new(a: [f32; 2], b: [f32; 2]) -> Self {
        Self {
            min: [a[0].min(b[0]), a[1].min(b[1])],
            max: [a[0].max(b[0]), a[1].max(b[1])],
        }
    }

    fn rect(&self) -> Rect<f32> {
        Rect::new(
            coord! { x: self.min[0], y: self.min[1] },
            coord! { x: self.max[0], y: self.max[1] },
        )
    }

    /// Returns true if the position lies inside or on the edge of the region.
    pub fn contains(&self, pos: &Array1<f32>) -> bool {
        self.rect().intersects(&Point::new(pos[0], pos[1]))
    }

    /// Center point of the region.
    pub fn center(&self) -> Array1<f32> {
        let center = self.rect().center();
        Array1::from_vec(vec![center.x, center.y])
    }

    /// Width and height of the region.
    pub fn size(&self) -> [f32; 2] {
        [self.max[0] - self.min[0], self.max[1] - self.min[1]]
    }

    /// Draws a uniformly distributed point inside the region.
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> Array1<f32> {
        Array1::from_vec(vec![
            sample_span(self.min[0], self.max[0], rng),
            sample_span(self.min[1], self.max[1], rng),
        ])
    }

    /// Clamps a position into the region in place.
    pub fn clamp_mut(&self, pos: &mut Array1<f32>) {
        pos[0] = pos[0].clamp(self.min[0], self.max[0]);
        pos[1] = pos[1].clamp(self.min[1], self.max[1]);
    }
}

fn sample_span<R: Rng>(low: f32, high: f32, rng: &mut R) -> f32 {
    if high > low {
        rng.random_range(low..=high)
    } else {
        low
    }
}

/// Euclidean distance between two positions.
pub fn distance(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    Euclidean.distance(Point::new(a[0], a[1]), Point::new(b[0], b[1]))
}

/// Length of a 2D vector.
pub fn magnitude(v: &Array1<f32>) -> f32 {
    v.dot(v).sqrt()
}

/// Scales a 2D vector in place so its length does not exceed `max_length`.
pub fn clamp_magnitude_mut(v: &mut Array1<f32>, max_length: f32) {
    let length = magnitude(v);
    if length > max_length && length > 0.0 {
        *v *= max_length / length;
    }
}

/// Uniform sample from the unit disc.
pub fn random_in_unit_circle<R: Rng>(rng: &mut R) -> Array1<f32> {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let radius = rng.random::<f32>().sqrt();
    Array1::from_vec(vec![radius * angle.cos(), radius * angle.sin()])
}

/// Signed shortest rotation from `from` to `to`, in `(-PI, PI]`.
pub fn angle_difference(from: f32, to: f32) -> f32 {
    let diff = (to - from).rem_euclid(std::f32::consts::TAU);
    if diff > std::f32::consts::PI {
        diff - std::f32::consts::TAU
    } else {
        diff
    }
}
