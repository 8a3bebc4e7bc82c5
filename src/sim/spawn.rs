//! Target placement solver
//!
//! Finds a spawn position for a new target that is reachable, away from the
//! collector, clear of obstacles and other targets, and has a line of sight
//! to the collector. The search runs in tiers of decreasing strictness and
//! always terminates with *some* position:
//!
//! 1. Interior: uniform random points anywhere on the surface
//! 2. Edge band: random x, y pinned to the top or bottom margin
//! 3. Corner: the four inset corners in fixed order
//! 4. Last resort: a deterministic spot beside the collector at the top margin
//!
//! Tiers 1-3 only return positions passing every rejection rule.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, has_ray_clearance};
use super::obstacle::Obstacle;
use super::state::{Collector, Target};
use crate::clamp_lenient;

/// Knobs for the placement search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverTuning {
    /// Random interior samples before falling back to the edge band
    pub interior_attempts: u32,
    /// Edge-band samples before falling back to corners
    pub edge_attempts: u32,
    /// Extra gap between a target's rim and the surface edge
    pub edge_margin: f32,
    /// Minimum rim-to-rim gap between targets
    pub target_padding: f32,
    /// Exclusion radius = collector radius + factor * target radius
    pub exclusion_margin_factor: f32,
    /// Obstacle inflation along the motion axis (x)
    pub motion_axis_padding: f32,
    /// Obstacle inflation across the motion axis (y)
    pub cross_axis_padding: f32,
    /// Rays sampled around the collector for the clearance check
    pub clearance_samples: usize,
}

impl Default for SolverTuning {
    fn default() -> Self {
        Self {
            interior_attempts: 300,
            edge_attempts: 50,
            edge_margin: 10.0,
            target_padding: 10.0,
            exclusion_margin_factor: 0.5,
            motion_axis_padding: 40.0,
            cross_axis_padding: 12.0,
            clearance_samples: 12,
        }
    }
}

/// Which tier produced a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementTier {
    Interior,
    EdgeBand,
    Corner,
    LastResort,
}

impl PlacementTier {
    /// True if the position passed every rejection rule
    pub fn is_validated(&self) -> bool {
        !matches!(self, PlacementTier::LastResort)
    }
}

/// Result of a placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    pub tier: PlacementTier,
}

/// Why a candidate position was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Inside the collector's exclusion zone
    Collector,
    /// Inside an inflated obstacle
    Obstacle,
    /// Too close to another undelivered target
    Crowded,
    /// Every sampled ray to the collector is blocked
    NoClearPath,
}

/// One placement problem: a target radius plus everything it must avoid
#[derive(Debug)]
pub struct PlacementRequest<'a> {
    radius: f32,
    existing: &'a [Target],
    collector: &'a Collector,
    bounds: Rect,
    tuning: &'a SolverTuning,
    /// Obstacles grown for the target radius and future motion
    inflated: Vec<Rect>,
    exclusion: f32,
}

impl<'a> PlacementRequest<'a> {
    pub fn new(
        radius: f32,
        existing: &'a [Target],
        obstacles: &[Obstacle],
        collector: &'a Collector,
        bounds: Rect,
        tuning: &'a SolverTuning,
    ) -> Self {
        let inflated = obstacles
            .iter()
            .map(|o| o.inflated(radius, tuning.motion_axis_padding, tuning.cross_axis_padding))
            .collect();
        let exclusion = collector.exclusion_radius(radius, tuning.exclusion_margin_factor);
        Self {
            radius,
            existing,
            collector,
            bounds,
            tuning,
            inflated,
            exclusion,
        }
    }

    /// Area the target center may occupy
    fn spawn_area(&self) -> Rect {
        self.bounds.inset(self.radius + self.tuning.edge_margin)
    }

    /// Apply the four rejection rules to a candidate center
    pub fn check(&self, candidate: Vec2) -> Result<(), Rejection> {
        if candidate.distance(self.collector.center) < self.exclusion + self.radius {
            return Err(Rejection::Collector);
        }

        if self.inflated.iter().any(|rect| rect.contains_point(candidate)) {
            return Err(Rejection::Obstacle);
        }

        if self.is_crowded(candidate) {
            return Err(Rejection::Crowded);
        }

        if !has_ray_clearance(
            candidate,
            self.collector.center,
            self.collector.capture_radius,
            &self.inflated,
            self.tuning.clearance_samples,
        ) {
            return Err(Rejection::NoClearPath);
        }

        Ok(())
    }

    /// Run the tiered search
    pub fn place<R: Rng + ?Sized>(&self, rng: &mut R) -> Placement {
        let area = self.spawn_area();

        for _ in 0..self.tuning.interior_attempts {
            let candidate = Vec2::new(
                sample_span(rng, area.x, area.right()),
                sample_span(rng, area.y, area.bottom()),
            );
            if self.check(candidate).is_ok() {
                return Placement {
                    position: candidate,
                    tier: PlacementTier::Interior,
                };
            }
        }
        log::debug!(
            "Interior search exhausted after {} attempts (radius {})",
            self.tuning.interior_attempts,
            self.radius
        );

        for _ in 0..self.tuning.edge_attempts {
            let y = if rng.random_bool(0.5) {
                area.y
            } else {
                area.bottom()
            };
            let candidate = Vec2::new(sample_span(rng, area.x, area.right()), y);
            if self.check(candidate).is_ok() {
                return Placement {
                    position: candidate,
                    tier: PlacementTier::EdgeBand,
                };
            }
        }
        log::debug!("Edge band exhausted, trying corners");

        let corners = [
            Vec2::new(area.x, area.y),
            Vec2::new(area.right(), area.y),
            Vec2::new(area.x, area.bottom()),
            Vec2::new(area.right(), area.bottom()),
        ];
        if let Some(corner) = corners.into_iter().find(|c| self.check(*c).is_ok()) {
            return Placement {
                position: corner,
                tier: PlacementTier::Corner,
            };
        }

        let position = self.last_resort();
        log::warn!(
            "No valid spawn found for radius {}, using fallback at ({:.1}, {:.1})",
            self.radius,
            position.x,
            position.y
        );
        Placement {
            position,
            tier: PlacementTier::LastResort,
        }
    }

    fn is_crowded(&self, candidate: Vec2) -> bool {
        self.existing.iter().filter(|t| !t.delivered).any(|t| {
            candidate.distance(t.position) < self.radius + t.radius + self.tuning.target_padding
        })
    }

    /// Deterministic fallback beside the collector at the top margin
    ///
    /// Steps outward along the top margin, alternating sides of the
    /// collector, then along the bottom margin, and takes the first slot no
    /// undelivered target crowds. With every slot taken the first one is used.
    pub fn last_resort(&self) -> Vec2 {
        let area = self.spawn_area();
        let center_x = self.collector.center.x;
        let base = self.exclusion + self.radius;
        let step = 2.0 * self.radius + self.tuning.target_padding;
        let slots = (area.width / step).ceil() as u32 + 1;
        let slot = |row: f32, k: u32, side: f32| {
            let x = center_x + side * (base + k as f32 * step);
            Vec2::new(clamp_lenient(x, area.x, area.right()), row)
        };

        for row in [area.y, area.bottom()] {
            for k in 0..slots {
                for side in [1.0, -1.0] {
                    let candidate = slot(row, k, side);
                    if !self.is_crowded(candidate) {
                        return candidate;
                    }
                }
            }
        }
        slot(area.y, 0, 1.0)
    }
}

/// Uniform sample in `[lo, hi]`, or `lo` when the span is empty
fn sample_span<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}

/// Find a spawn position for a target of `radius`
///
/// `existing` may include delivered targets; only undelivered ones count.
pub fn place_target<R: Rng + ?Sized>(
    radius: f32,
    existing: &[Target],
    obstacles: &[Obstacle],
    collector: &Collector,
    bounds: Rect,
    tuning: &SolverTuning,
    rng: &mut R,
) -> Placement {
    PlacementRequest::new(radius, existing, obstacles, collector, bounds, tuning).place(rng)
}
