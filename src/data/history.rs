//! Status trend tracking for the units view.

use std::collections::{HashMap, VecDeque};

use super::health::FleetHealth;

/// Maximum number of historical snapshots to keep.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks recent aggregate severities per unit plus fleet-wide alarm
/// counts, feeding the trend column and header.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Recent aggregate severity per unit (0 = OK .. 3 = CRITICAL).
    unit_levels: HashMap<String, VecDeque<u8>>,
    /// Active alarm counts at each recorded snapshot.
    pub active_counts: VecDeque<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one snapshot's worth of state.
    pub fn record(&mut self, fleet: &FleetHealth, active_alarms: usize) {
        for unit in &fleet.units {
            let levels = self.unit_levels.entry(unit.id.clone()).or_default();
            levels.push_back(unit.status as u8);
            if levels.len() > MAX_HISTORY_SIZE {
                levels.pop_front();
            }
        }

        self.active_counts.push_back(active_alarms);
        if self.active_counts.len() > MAX_HISTORY_SIZE {
            self.active_counts.pop_front();
        }
    }

    /// Recent severity trend for a unit, scaled to 0-7 sparkline levels.
    ///
    /// Returns an empty Vec when there is no history yet.
    pub fn status_trend(&self, unit: &str) -> Vec<u8> {
        self.unit_levels
            .get(unit)
            .map(|levels| levels.iter().map(|&l| l * 7 / 3).collect())
            .unwrap_or_default()
    }
}
