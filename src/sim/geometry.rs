//! Geometry kernel for placement and drag collision
//!
//! Pure functions over points, segments, circles and axis-aligned rectangles.
//! Surface coordinates: origin top-left, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Denominators below this are treated as parallel/degenerate
const PARALLEL_EPSILON: f32 = 1e-6;

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive point containment
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Grow by `dx` on the left and right, `dy` on top and bottom
    pub fn inflate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(
            self.x - dx,
            self.y - dy,
            self.width + 2.0 * dx,
            self.height + 2.0 * dy,
        )
    }

    /// The four corners in winding order: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.right(), self.y),
            Vec2::new(self.right(), self.bottom()),
            Vec2::new(self.x, self.bottom()),
        ]
    }

    /// True if a circle overlaps the rectangle (touching counts as no overlap)
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = Vec2::new(
            center.x.clamp(self.x, self.right()),
            center.y.clamp(self.y, self.bottom()),
        );
        center.distance_squared(closest) < radius * radius
    }

    /// Translate the rectangle so it lies inside `bounds` (size is kept)
    pub fn clamp_into(&mut self, bounds: &Rect) {
        self.x = crate::clamp_lenient(self.x, bounds.x, bounds.right() - self.width);
        self.y = crate::clamp_lenient(self.y, bounds.y, bounds.bottom() - self.height);
    }

    /// Shrink by `inset` on every side
    pub fn inset(&self, inset: f32) -> Rect {
        self.inflate(-inset, -inset)
    }
}

/// Straight-line distance between two points
#[inline]
pub fn euclidean_distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Inclusive circle containment
#[inline]
pub fn circle_contains_point(center: Vec2, radius: f32, point: Vec2) -> bool {
    center.distance_squared(point) <= radius * radius
}

/// Check whether segment `a0-a1` crosses segment `b0-b1`
///
/// Parallel, collinear and zero-length segments report no intersection.
pub fn segment_intersects_segment(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> bool {
    let r = a1 - a0;
    let s = b1 - b0;
    let denom = r.perp_dot(s);
    if denom.abs() < PARALLEL_EPSILON {
        return false;
    }

    let qp = b0 - a0;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Check whether segment `from-to` hits a rectangle
///
/// True if the segment crosses any of the four edges, or if `from` is
/// already inside the rectangle.
pub fn segment_intersects_rect(from: Vec2, to: Vec2, rect: &Rect) -> bool {
    if rect.contains_point(from) {
        return true;
    }
    let c = rect.corners();
    (0..4).any(|i| segment_intersects_segment(from, to, c[i], c[(i + 1) % 4]))
}

/// Sampled line-of-sight check from `from` toward a ring around `to`
///
/// Samples `sample_count` points evenly around a ring of `ring_radius`
/// centered at `to`. Returns true if any ray from `from` to a ring point
/// avoids every rectangle. A sample count of zero checks the straight
/// segment to `to` itself.
pub fn has_ray_clearance(
    from: Vec2,
    to: Vec2,
    ring_radius: f32,
    obstacles: &[Rect],
    sample_count: usize,
) -> bool {
    let clear = |end: Vec2| {
        !obstacles
            .iter()
            .any(|rect| segment_intersects_rect(from, end, rect))
    };

    if sample_count == 0 {
        return clear(to);
    }

    (0..sample_count).any(|i| {
        let angle = i as f32 / sample_count as f32 * std::f32::consts::TAU;
        clear(to + Vec2::from_angle(angle) * ring_radius)
    })
}
