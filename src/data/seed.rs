//! Demo alarm fixtures.
//!
//! Fabricates a plausible alarm history so the filter and export layers
//! have non-trivial data to exercise. This is demo tooling only: the
//! ledger itself never uses randomness, and seeding is an explicit,
//! separate step behind a CLI switch.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::Rng;

use super::alarm::AlarmRecord;
use super::health::FleetHealth;
use super::status::{Indicator, StatusLevel};

/// Tunables for fixture generation.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Hours before `now` in which a current alarm may have activated.
    pub lookback_hours: i64,
    /// Chance that a fabricated alarm has already been resolved.
    pub clear_probability: f64,
    /// Maximum hours between activation and clearing.
    pub clear_window_hours: i64,
    /// Bounds on the number of extra historical cleared records.
    pub extra_cleared_min: usize,
    pub extra_cleared_max: usize,
    /// Days of history the extra cleared records are spread across.
    pub history_days: i64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            lookback_hours: 6,
            clear_probability: 0.4,
            clear_window_hours: 4,
            extra_cleared_min: 20,
            extra_cleared_max: 30,
            history_days: 7,
        }
    }
}

/// Fabricate demo records for the given fleet state.
///
/// One record is created per non-OK (unit, indicator) pair, activated
/// within the look-back window and probabilistically resolved; a clearing
/// time that would land in the future leaves the record active instead.
/// Extra cleared records are spread across the history window. The output
/// is deterministic in (fleet, config, now, rng seed).
pub fn seed_demo_alarms(
    fleet: &FleetHealth,
    cfg: &SeedConfig,
    now: DateTime<Utc>,
    rng: &mut StdRng,
) -> Vec<AlarmRecord> {
    let mut records = Vec::new();

    for unit in &fleet.units {
        for (indicator, level) in unit.readings.iter() {
            if level == StatusLevel::Ok {
                continue;
            }
            let lookback = Duration::minutes(rng.gen_range(0..cfg.lookback_hours.max(1) * 60));
            let mut record =
                AlarmRecord::active(unit.id.clone(), indicator, level, now - lookback);
            if rng.gen_bool(cfg.clear_probability) {
                let span = Duration::minutes(rng.gen_range(1..=cfg.clear_window_hours.max(1) * 60));
                let cleared = record.activated_at + span;
                if cleared <= now {
                    record.clear(cleared);
                }
            }
            records.push(record);
        }
    }

    if fleet.units.is_empty() {
        return records;
    }

    let extra = rng.gen_range(cfg.extra_cleared_min..=cfg.extra_cleared_max.max(cfg.extra_cleared_min));
    let severities = [StatusLevel::Degraded, StatusLevel::Warning, StatusLevel::Critical];
    for _ in 0..extra {
        let unit = &fleet.units[rng.gen_range(0..fleet.units.len())];
        let indicator = Indicator::ALL[rng.gen_range(0..Indicator::ALL.len())];
        let severity = severities[rng.gen_range(0..severities.len())];
        let activated = now - Duration::minutes(rng.gen_range(0..cfg.history_days.max(1) * 24 * 60));
        let span = Duration::minutes(rng.gen_range(1..=cfg.clear_window_hours.max(1) * 60));
        let mut record = AlarmRecord::active(unit.id.clone(), indicator, severity, activated);
        record.clear((activated + span).min(now));
        records.push(record);
    }

    records
}
