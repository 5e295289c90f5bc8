//! Fleet health parsing and the display/recompute audit.
//!
//! This module transforms raw health snapshots into processed data with a
//! cached worst-case severity per unit, accumulating integrity warnings
//! rather than failing on malformed input.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use super::status::{IndicatorReadings, IntegrityWarning, StatusLevel};
use crate::source::HealthSnapshot;

/// Parsed health state for a single unit.
#[derive(Debug, Clone)]
pub struct UnitHealth {
    /// Stable unit id (wire key).
    pub id: String,
    /// Display name; equals the id when the snapshot carries none.
    pub name: String,
    pub readings: IndicatorReadings,
    /// Cached aggregate severity. [`audit`] checks it against a fresh
    /// recomputation; a divergence is a data-integrity bug.
    pub status: StatusLevel,
}

/// Complete parsed fleet state ready for display.
#[derive(Debug, Clone)]
pub struct FleetHealth {
    pub units: Vec<UnitHealth>,
    /// Integrity warnings accumulated while interpreting the snapshot.
    pub warnings: Vec<IntegrityWarning>,
    pub last_updated: Instant,
}

impl FleetHealth {
    /// Load and parse fleet health from a JSON snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse fleet health from a JSON string.
    pub fn parse(content: &str) -> Result<Self> {
        let snapshot: HealthSnapshot = serde_json::from_str(content)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Convert a raw snapshot into processed fleet health.
    ///
    /// This is the primary conversion method used by all data sources.
    /// Units are sorted by severity (worst first), then by id.
    pub fn from_snapshot(snapshot: HealthSnapshot) -> Self {
        let mut warnings = Vec::new();
        let mut units: Vec<UnitHealth> = snapshot
            .into_iter()
            .map(|(id, state)| {
                let readings = IndicatorReadings::from_raw(&id, &state.indicators, &mut warnings);
                let status = readings.aggregate();
                let name = state.name.unwrap_or_else(|| id.clone());
                UnitHealth { id, name, readings, status }
            })
            .collect();

        units.sort_by(|a, b| b.status.cmp(&a.status).then_with(|| a.id.cmp(&b.id)));

        Self {
            units,
            warnings,
            last_updated: Instant::now(),
        }
    }

    /// Look up a unit by id.
    pub fn unit(&self, id: &str) -> Option<&UnitHealth> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Unit counts per severity, indexed `[ok, degraded, warning, critical]`.
    pub fn counts_by_status(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for unit in &self.units {
            counts[unit.status as usize] += 1;
        }
        counts
    }

    /// Worst severity across the whole fleet.
    pub fn worst_status(&self) -> StatusLevel {
        self.units.iter().map(|u| u.status).max().unwrap_or(StatusLevel::Ok)
    }
}

/// A unit whose displayed severity disagrees with a fresh recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrepancy {
    pub unit: String,
    pub displayed: StatusLevel,
    pub recomputed: StatusLevel,
}

/// Check every cached unit severity against a fresh aggregation.
///
/// Returns one entry per divergence; an empty list means the displayed
/// state is consistent. Callers decide whether to log or display the
/// result.
pub fn audit(fleet: &FleetHealth) -> Vec<Discrepancy> {
    fleet
        .units
        .iter()
        .filter_map(|unit| {
            let recomputed = unit.readings.aggregate();
            (recomputed != unit.status).then(|| Discrepancy {
                unit: unit.id.clone(),
                displayed: unit.status,
                recomputed,
            })
        })
        .collect()
}
