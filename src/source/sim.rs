//! Simulated data source.
//!
//! Generates a random-walk health snapshot for a fleet of fictitious
//! units. Stands in for a live telemetry feed during development and
//! demos; a fixed seed makes a run reproducible.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{DataSource, HealthSnapshot, SerializedUnitState};
use crate::data::status::{Indicator, INDICATOR_COUNT};

/// Severity tokens emitted on the wire, indexed by walk level.
const LEVEL_TOKENS: [&str; 4] = ["ok", "degraded", "warning", "critical"];

/// A data source that fabricates snapshots for a simulated fleet.
///
/// Each emission nudges a few indicators: healthy ones occasionally
/// degrade, unhealthy ones tend to recover and sometimes escalate.
#[derive(Debug)]
pub struct SimSource {
    /// Current walk level (0-3) per unit, in indicator wire order.
    levels: Vec<[u8; INDICATOR_COUNT]>,
    unit_ids: Vec<String>,
    rng: StdRng,
    interval: Duration,
    last_emit: Option<Instant>,
    description: String,
}

impl SimSource {
    /// Create a simulator for `unit_count` units emitting at `interval`.
    pub fn new(unit_count: usize, seed: u64, interval: Duration) -> Self {
        let unit_ids: Vec<String> =
            (1..=unit_count).map(|i| format!("unit-{:02}", i)).collect();
        Self {
            levels: vec![[0u8; INDICATOR_COUNT]; unit_count],
            unit_ids,
            rng: StdRng::seed_from_u64(seed),
            interval,
            last_emit: None,
            description: format!("sim: {} units", unit_count),
        }
    }

    fn step(&mut self) {
        for unit in self.levels.iter_mut() {
            for level in unit.iter_mut() {
                if *level == 0 {
                    if self.rng.gen_bool(0.03) {
                        // Mostly mild onsets, occasionally straight to critical
                        *level = match self.rng.gen_range(0..100) {
                            0..=69 => 1,
                            70..=94 => 2,
                            _ => 3,
                        };
                    }
                } else if self.rng.gen_bool(0.25) {
                    *level = 0;
                } else if self.rng.gen_bool(0.10) {
                    *level = (*level + 1).min(3);
                }
            }
        }
    }

    fn emit(&self) -> HealthSnapshot {
        self.unit_ids
            .iter()
            .zip(&self.levels)
            .enumerate()
            .map(|(i, (id, levels))| {
                let indicators: BTreeMap<String, String> = Indicator::ALL
                    .iter()
                    .zip(levels)
                    .map(|(ind, &level)| {
                        (ind.name().to_string(), LEVEL_TOKENS[level as usize].to_string())
                    })
                    .collect();
                (
                    id.clone(),
                    SerializedUnitState {
                        name: Some(format!("Field Unit {}", i + 1)),
                        indicators,
                    },
                )
            })
            .collect()
    }
}

impl DataSource for SimSource {
    fn poll(&mut self) -> Option<HealthSnapshot> {
        if let Some(last) = self.last_emit {
            if last.elapsed() < self.interval {
                return None;
            }
            self.step();
        }
        self.last_emit = Some(Instant::now());
        Some(self.emit())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }
}
