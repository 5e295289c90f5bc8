//! Alarm records and the transition-driven alarm ledger.
//!
//! The ledger derives alarm lifecycle from observed indicator transitions:
//! a record activates when an indicator leaves `Ok`, and clears when it
//! returns. Time is always passed in by the caller, so the ledger is
//! deterministic in its inputs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::duration::elapsed_since;
use super::health::FleetHealth;
use super::status::{Indicator, StatusLevel};

/// One lifecycle-tracked occurrence of a non-OK indicator reading.
///
/// Active records have no `cleared_at`; clearing sets it along with a
/// duration string that is fixed from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmRecord {
    pub unit: String,
    pub indicator: Indicator,
    pub severity: StatusLevel,
    pub activated_at: DateTime<Utc>,
    pub cleared_at: Option<DateTime<Utc>>,
    /// Frozen at clearing time; `None` while active.
    pub duration: Option<String>,
}

impl AlarmRecord {
    /// Create a new active record.
    pub fn active(
        unit: String,
        indicator: Indicator,
        severity: StatusLevel,
        activated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            unit,
            indicator,
            severity,
            activated_at,
            cleared_at: None,
            duration: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.cleared_at.is_none()
    }

    /// Transition to cleared, freezing the duration.
    ///
    /// The clearing time never precedes the activation time; a skewed
    /// clock clamps to a zero-length window.
    pub fn clear(&mut self, now: DateTime<Utc>) {
        let cleared = now.max(self.activated_at);
        self.cleared_at = Some(cleared);
        self.duration = Some(elapsed_since(self.activated_at, cleared));
    }

    /// Operator-facing message for this alarm's indicator.
    pub fn message(&self) -> &'static str {
        self.indicator.message()
    }
}

/// Active and cleared alarm views for one generation cycle.
///
/// Produced by [`AlarmLedger::snapshot`]; the filter engine narrows it
/// without ever touching the ledger's canonical state.
#[derive(Debug, Clone, Default)]
pub struct AlarmSet {
    pub active: Vec<AlarmRecord>,
    pub cleared: Vec<AlarmRecord>,
}

impl AlarmSet {
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.cleared.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.cleared.len()
    }
}

/// Canonical alarm bookkeeping across snapshots.
///
/// Holds one active record per (unit, indicator) plus the cleared history.
/// Each [`observe`](Self::observe) call is an atomic generation cycle;
/// [`snapshot`](Self::snapshot) hands out an independent sorted view.
#[derive(Debug, Default)]
pub struct AlarmLedger {
    active: BTreeMap<(String, Indicator), AlarmRecord>,
    cleared: Vec<AlarmRecord>,
}

impl AlarmLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the ledger from a fresh fleet snapshot.
    ///
    /// An indicator going `Ok → non-Ok` activates a record; the reverse
    /// transition clears it. A severity change while active updates the
    /// record in place. Units absent from the snapshot keep their active
    /// alarms until they report again.
    pub fn observe(&mut self, fleet: &FleetHealth, now: DateTime<Utc>) {
        for unit in &fleet.units {
            for (indicator, level) in unit.readings.iter() {
                let key = (unit.id.clone(), indicator);
                if level == StatusLevel::Ok {
                    if let Some(mut record) = self.active.remove(&key) {
                        record.clear(now);
                        self.cleared.push(record);
                    }
                } else {
                    match self.active.get_mut(&key) {
                        Some(record) => record.severity = level,
                        None => {
                            self.active.insert(
                                key,
                                AlarmRecord::active(unit.id.clone(), indicator, level, now),
                            );
                        }
                    }
                }
            }
        }
    }

    /// Install fixture records, e.g. from the demo seeder.
    ///
    /// Cleared records join the history; active records become the current
    /// record for their (unit, indicator), so a subsequent [`observe`]
    /// keeps their backdated activation instead of re-activating.
    pub fn absorb(&mut self, records: Vec<AlarmRecord>) {
        for record in records {
            if record.is_active() {
                self.active.insert((record.unit.clone(), record.indicator), record);
            } else {
                self.cleared.push(record);
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Active alarms currently held for one unit.
    pub fn active_count_for(&self, unit: &str) -> usize {
        self.active.keys().filter(|(id, _)| id == unit).count()
    }

    /// Sorted view of the current active and cleared sets.
    ///
    /// Active records sort most severe first, most recent first within a
    /// severity; cleared records sort by clearing time, most recent first.
    pub fn snapshot(&self) -> AlarmSet {
        let mut active: Vec<AlarmRecord> = self.active.values().cloned().collect();
        active.sort_by(|a, b| {
            b.severity.cmp(&a.severity).then_with(|| b.activated_at.cmp(&a.activated_at))
        });

        let mut cleared = self.cleared.clone();
        cleared.sort_by(|a, b| b.cleared_at.cmp(&a.cleared_at));

        AlarmSet { active, cleared }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{HealthSnapshot, SerializedUnitState};
    use chrono::{Duration, TimeZone};
    use std::collections::BTreeMap;

    fn fleet_with(entries: &[(&str, &str, &str)]) -> FleetHealth {
        let mut snapshot: HealthSnapshot = BTreeMap::new();
        for (unit, indicator, level) in entries {
            let state = snapshot.entry(unit.to_string()).or_insert_with(|| SerializedUnitState {
                name: None,
                indicators: Indicator::ALL
                    .iter()
                    .map(|i| (i.name().to_string(), "ok".to_string()))
                    .collect(),
            });
            state.indicators.insert(indicator.to_string(), level.to_string());
        }
        FleetHealth::from_snapshot(snapshot)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_transition_activates_one_record() {
        let mut ledger = AlarmLedger::new();
        ledger.observe(&fleet_with(&[("unit-01", "temperature", "warning")]), t0());

        let set = ledger.snapshot();
        assert_eq!(set.active.len(), 1);
        assert!(set.cleared.is_empty());
        let record = &set.active[0];
        assert_eq!(record.unit, "unit-01");
        assert_eq!(record.indicator, Indicator::Temperature);
        assert_eq!(record.severity, StatusLevel::Warning);
        assert_eq!(record.activated_at, t0());
        assert!(record.is_active());
    }

    #[test]
    fn test_reverse_transition_clears_with_frozen_duration() {
        let mut ledger = AlarmLedger::new();
        ledger.observe(&fleet_with(&[("unit-01", "temperature", "warning")]), t0());
        ledger.observe(&fleet_with(&[("unit-01", "temperature", "ok")]), t0() + Duration::minutes(5));

        let set = ledger.snapshot();
        assert!(set.active.is_empty());
        assert_eq!(set.cleared.len(), 1);
        let record = &set.cleared[0];
        assert_eq!(record.cleared_at, Some(t0() + Duration::minutes(5)));
        assert!(record.cleared_at.unwrap() >= record.activated_at);
        assert_eq!(record.duration.as_deref(), Some("5m"));
    }

    #[test]
    fn test_still_active_does_not_duplicate() {
        let mut ledger = AlarmLedger::new();
        let fleet = fleet_with(&[("unit-01", "temperature", "warning")]);
        ledger.observe(&fleet, t0());
        ledger.observe(&fleet, t0() + Duration::minutes(1));

        let set = ledger.snapshot();
        assert_eq!(set.active.len(), 1);
        // Activation time is the original transition, not the latest poll
        assert_eq!(set.active[0].activated_at, t0());
    }

    #[test]
    fn test_severity_change_updates_in_place() {
        let mut ledger = AlarmLedger::new();
        ledger.observe(&fleet_with(&[("unit-01", "temperature", "warning")]), t0());
        ledger.observe(
            &fleet_with(&[("unit-01", "temperature", "critical")]),
            t0() + Duration::minutes(2),
        );

        let set = ledger.snapshot();
        assert_eq!(set.active.len(), 1);
        assert_eq!(set.active[0].severity, StatusLevel::Critical);
        assert_eq!(set.active[0].activated_at, t0());
    }

    #[test]
    fn test_reactivation_creates_fresh_record() {
        let mut ledger = AlarmLedger::new();
        ledger.observe(&fleet_with(&[("unit-01", "temperature", "warning")]), t0());
        ledger.observe(&fleet_with(&[("unit-01", "temperature", "ok")]), t0() + Duration::minutes(5));
        ledger.observe(
            &fleet_with(&[("unit-01", "temperature", "critical")]),
            t0() + Duration::minutes(10),
        );

        let set = ledger.snapshot();
        assert_eq!(set.active.len(), 1);
        assert_eq!(set.cleared.len(), 1);
        assert_eq!(set.active[0].activated_at, t0() + Duration::minutes(10));
    }

    #[test]
    fn test_absent_unit_keeps_active_alarm() {
        let mut ledger = AlarmLedger::new();
        ledger.observe(&fleet_with(&[("unit-01", "network", "critical")]), t0());
        // unit-01 disappears from the next snapshot entirely
        ledger.observe(&fleet_with(&[("unit-02", "voltage", "ok")]), t0() + Duration::minutes(1));

        assert_eq!(ledger.active_count(), 1);
        assert_eq!(ledger.active_count_for("unit-01"), 1);
    }

    #[test]
    fn test_active_sort_severity_then_recency() {
        let mut ledger = AlarmLedger::new();
        ledger.observe(&fleet_with(&[("unit-01", "memory", "warning")]), t0());
        ledger.observe(
            &fleet_with(&[
                ("unit-01", "memory", "warning"),
                ("unit-02", "voltage", "critical"),
                ("unit-03", "storage", "warning"),
            ]),
            t0() + Duration::minutes(3),
        );

        let set = ledger.snapshot();
        let order: Vec<(&str, StatusLevel)> =
            set.active.iter().map(|r| (r.unit.as_str(), r.severity)).collect();
        assert_eq!(
            order,
            vec![
                ("unit-02", StatusLevel::Critical),
                // Within WARNING: most recent activation first
                ("unit-03", StatusLevel::Warning),
                ("unit-01", StatusLevel::Warning),
            ]
        );
    }

    #[test]
    fn test_cleared_sort_most_recent_first() {
        let mut ledger = AlarmLedger::new();
        ledger.observe(
            &fleet_with(&[("unit-01", "memory", "warning"), ("unit-02", "voltage", "warning")]),
            t0(),
        );
        ledger.observe(
            &fleet_with(&[("unit-01", "memory", "ok"), ("unit-02", "voltage", "warning")]),
            t0() + Duration::minutes(1),
        );
        ledger.observe(
            &fleet_with(&[("unit-01", "memory", "ok"), ("unit-02", "voltage", "ok")]),
            t0() + Duration::minutes(2),
        );

        let set = ledger.snapshot();
        assert_eq!(set.cleared.len(), 2);
        assert_eq!(set.cleared[0].unit, "unit-02");
        assert_eq!(set.cleared[1].unit, "unit-01");
    }

    #[test]
    fn test_clear_clamps_skewed_clock() {
        let mut record =
            AlarmRecord::active("unit-01".to_string(), Indicator::Voltage, StatusLevel::Warning, t0());
        record.clear(t0() - Duration::minutes(10));
        assert_eq!(record.cleared_at, Some(t0()));
        assert_eq!(record.duration.as_deref(), Some("0s"));
    }

    #[test]
    fn test_absorb_keeps_backdated_activation() {
        let mut ledger = AlarmLedger::new();
        let backdated = t0() - Duration::hours(3);
        ledger.absorb(vec![AlarmRecord::active(
            "unit-01".to_string(),
            Indicator::Temperature,
            StatusLevel::Warning,
            backdated,
        )]);
        ledger.observe(&fleet_with(&[("unit-01", "temperature", "warning")]), t0());

        let set = ledger.snapshot();
        assert_eq!(set.active.len(), 1);
        assert_eq!(set.active[0].activated_at, backdated);
    }
}
