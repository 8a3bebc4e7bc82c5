//! Session metrics
//!
//! Three clinical measurements come out of every level:
//! 1) Average speed: seconds from pick to delivery, per target
//! 2) Errors: missed drops, out-of-order drops and blocked moves
//! 3) Reach: distinct spawn zones the patient retrieved targets from
//!
//! Per-level stats reset at every level start; session stats accumulate
//! completed levels and feed the recovery indicator.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::quantize;

/// Mean of the samples, 0 when empty
pub fn average(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        0.0
    } else {
        samples.iter().sum::<f32>() / samples.len() as f32
    }
}

/// Statistics for the level in progress
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelStats {
    pub per_orb_times: Vec<f32>,
    pub error_count: u32,
    pub visited_zones: BTreeSet<(i32, i32)>,
}

impl LevelStats {
    pub fn reset(&mut self) {
        self.per_orb_times.clear();
        self.error_count = 0;
        self.visited_zones.clear();
    }

    /// Record a successful delivery
    pub fn record_delivery(&mut self, elapsed: f32, spawn_position: Vec2, cell_size: f32) {
        self.per_orb_times.push(elapsed.max(0.0));
        self.visited_zones.insert(quantize(spawn_position, cell_size));
    }

    pub fn record_error(&mut self) {
        self.error_count += 1;
    }

    pub fn average_speed(&self) -> f32 {
        average(&self.per_orb_times)
    }

    pub fn zone_count(&self) -> usize {
        self.visited_zones.len()
    }

    pub fn summary(&self, level: u32) -> LevelSummary {
        LevelSummary {
            level,
            average_speed: self.average_speed(),
            error_count: self.error_count,
            zone_count: self.zone_count(),
            deliveries: self.per_orb_times.len(),
        }
    }
}

/// Level-end values handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub level: u32,
    /// Average seconds per delivered target
    pub average_speed: f32,
    pub error_count: u32,
    pub zone_count: usize,
    pub deliveries: usize,
}

/// Statistics accumulated over completed levels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub orb_times: Vec<f32>,
    pub error_count: u32,
    pub visited_zones: BTreeSet<(i32, i32)>,
    /// One summary per completed level, in play order
    pub levels: Vec<LevelSummary>,
}

impl SessionStats {
    /// Fold a completed level into the session
    pub fn absorb(&mut self, stats: &LevelStats, summary: LevelSummary) {
        self.orb_times.extend_from_slice(&stats.per_orb_times);
        self.error_count += stats.error_count;
        self.visited_zones
            .extend(stats.visited_zones.iter().copied());
        self.levels.push(summary);
    }

    pub fn average_speed(&self) -> f32 {
        average(&self.orb_times)
    }

    pub fn zone_count(&self) -> usize {
        self.visited_zones.len()
    }

    /// Final summary for external persistence
    pub fn summary(&self, final_level: u32, weights: &RecoveryWeights, timestamp_ms: f64) -> SessionSummary {
        let average_speed = self.average_speed();
        let zone_count = self.zone_count();
        SessionSummary {
            timestamp_ms,
            final_level,
            average_speed,
            error_count: self.error_count,
            zone_count,
            recovery_indicator: weights.recovery_indicator(
                average_speed,
                self.error_count,
                zone_count,
            ),
        }
    }
}

/// Structured summary emitted when the session completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Unix timestamp (ms) when the session finished
    pub timestamp_ms: f64,
    pub final_level: u32,
    pub average_speed: f32,
    pub error_count: u32,
    pub zone_count: usize,
    /// 0 (no progress) to 1 (fast, accurate, full coverage)
    pub recovery_indicator: f32,
}

/// Weighting policy for the recovery indicator
///
/// Each input is normalized to [0, 1] against a reference value, then the
/// three scores are blended by weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryWeights {
    pub speed: f32,
    pub accuracy: f32,
    pub coverage: f32,
    /// Average seconds per target that scores 0 for speed
    pub reference_speed_secs: f32,
    /// Error count that scores 0 for accuracy
    pub reference_errors: f32,
    /// Zone count that scores 1 for coverage
    pub reference_zones: f32,
}

impl Default for RecoveryWeights {
    fn default() -> Self {
        Self {
            speed: 0.4,
            accuracy: 0.35,
            coverage: 0.25,
            reference_speed_secs: 10.0,
            reference_errors: 20.0,
            // One zone per target over a full 10-level session
            reference_zones: 55.0,
        }
    }
}

impl RecoveryWeights {
    /// Blend speed, error count and zone coverage into one score
    pub fn recovery_indicator(&self, average_speed: f32, error_count: u32, zone_count: usize) -> f32 {
        let total = self.speed + self.accuracy + self.coverage;
        if total <= 0.0 {
            return 0.0;
        }

        let speed_score = if average_speed > 0.0 {
            1.0 - ratio(average_speed, self.reference_speed_secs)
        } else {
            0.0
        };
        let accuracy_score = 1.0 - ratio(error_count as f32, self.reference_errors);
        let coverage_score = ratio(zone_count as f32, self.reference_zones);

        let blended = self.speed * speed_score
            + self.accuracy * accuracy_score
            + self.coverage * coverage_score;
        (blended / total).clamp(0.0, 1.0)
    }
}

/// `value / reference` clamped to [0, 1]
fn ratio(value: f32, reference: f32) -> f32 {
    if reference <= 0.0 {
        return if value > 0.0 { 1.0 } else { 0.0 };
    }
    (value / reference).clamp(0.0, 1.0)
}
