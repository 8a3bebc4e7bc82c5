//! Session history
//!
//! Keeps the most recent completed sessions for trend display.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::metrics::SessionSummary;

/// Maximum number of sessions to keep
pub const MAX_SESSIONS: usize = 50;

/// A numbered session entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// 1-based session number, never reused
    pub session: u32,
    pub summary: SessionSummary,
}

/// Bounded history of completed sessions, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionHistory {
    pub records: Vec<SessionRecord>,
    /// Number handed to the next recorded session minus one
    pub last_session: u32,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished session, dropping the oldest past the cap
    ///
    /// Returns the session number assigned.
    pub fn push(&mut self, summary: SessionSummary) -> u32 {
        self.last_session += 1;
        self.records.push(SessionRecord {
            session: self.last_session,
            summary,
        });
        if self.records.len() > MAX_SESSIONS {
            let excess = self.records.len() - MAX_SESSIONS;
            self.records.drain(..excess);
        }
        self.last_session
    }

    /// Up to `n` most recent records, oldest first
    pub fn recent(&self, n: usize) -> &[SessionRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    pub fn latest(&self) -> Option<&SessionRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pearson correlation between reach zones and errors across sessions
    ///
    /// `None` with fewer than two sessions or when either series is constant.
    pub fn zone_error_correlation(&self) -> Option<f32> {
        if self.records.len() < 2 {
            return None;
        }
        let n = self.records.len() as f64;
        let xs: Vec<f64> = self
            .records
            .iter()
            .map(|r| r.summary.zone_count as f64)
            .collect();
        let ys: Vec<f64> = self
            .records
            .iter()
            .map(|r| r.summary.error_count as f64)
            .collect();
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
        for (x, y) in xs.iter().zip(&ys) {
            let (dx, dy) = (x - mean_x, y - mean_y);
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }
        if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
            return None;
        }
        Some((cov / (var_x.sqrt() * var_y.sqrt())) as f32)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut history: SessionHistory = serde_json::from_str(json)?;
        if history.records.len() > MAX_SESSIONS {
            let excess = history.records.len() - MAX_SESSIONS;
            history.records.drain(..excess);
        }
        let highest = history.records.iter().map(|r| r.session).max().unwrap_or(0);
        history.last_session = history.last_session.max(highest);
        Ok(history)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}
