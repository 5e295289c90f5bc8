//! Narrowing of alarm views by severity, time range, and unit.
//!
//! Criteria are an explicit immutable value threaded into [`filter`], never
//! ambient state. Filtering is pure: the result is always a subset of the
//! input, in the input's order.

use chrono::{DateTime, Duration, Utc};

use super::alarm::{AlarmRecord, AlarmSet};
use super::status::StatusLevel;

/// Severity dimension of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityFilter {
    #[default]
    All,
    Degraded,
    Warning,
    Critical,
}

impl SeverityFilter {
    /// Cycle to the next severity option.
    pub fn next(self) -> Self {
        match self {
            SeverityFilter::All => SeverityFilter::Degraded,
            SeverityFilter::Degraded => SeverityFilter::Warning,
            SeverityFilter::Warning => SeverityFilter::Critical,
            SeverityFilter::Critical => SeverityFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeverityFilter::All => "ALL",
            SeverityFilter::Degraded => "DEGRADED",
            SeverityFilter::Warning => "WARNING",
            SeverityFilter::Critical => "CRITICAL",
        }
    }

    fn matches(&self, severity: StatusLevel) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::Degraded => severity == StatusLevel::Degraded,
            SeverityFilter::Warning => severity == StatusLevel::Warning,
            SeverityFilter::Critical => severity == StatusLevel::Critical,
        }
    }
}

/// Time-range dimension of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    LastHour,
    Last6Hours,
    LastDay,
    LastWeek,
    #[default]
    All,
}

impl TimeRange {
    /// Cycle to the next range option.
    pub fn next(self) -> Self {
        match self {
            TimeRange::LastHour => TimeRange::Last6Hours,
            TimeRange::Last6Hours => TimeRange::LastDay,
            TimeRange::LastDay => TimeRange::LastWeek,
            TimeRange::LastWeek => TimeRange::All,
            TimeRange::All => TimeRange::LastHour,
        }
    }

    /// Hour threshold for the cutoff; `None` means unbounded.
    pub fn hours(&self) -> Option<i64> {
        match self {
            TimeRange::LastHour => Some(1),
            TimeRange::Last6Hours => Some(6),
            TimeRange::LastDay => Some(24),
            TimeRange::LastWeek => Some(168),
            TimeRange::All => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::LastHour => "1h",
            TimeRange::Last6Hours => "6h",
            TimeRange::LastDay => "24h",
            TimeRange::LastWeek => "7d",
            TimeRange::All => "ALL",
        }
    }
}

/// Unit dimension of the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UnitFilter {
    #[default]
    All,
    Unit(String),
}

impl UnitFilter {
    pub fn label(&self) -> &str {
        match self {
            UnitFilter::All => "ALL",
            UnitFilter::Unit(id) => id,
        }
    }

    fn matches(&self, unit: &str) -> bool {
        match self {
            UnitFilter::All => true,
            UnitFilter::Unit(id) => id == unit,
        }
    }
}

/// Combined filter criteria; the three dimensions AND together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub severity: SeverityFilter,
    pub time_range: TimeRange,
    pub unit: UnitFilter,
}

impl FilterCriteria {
    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }
}

/// Produce a narrowed view of `set` under `criteria`.
///
/// Active records are tested on their activation time, cleared records on
/// their clearing time. Never mutates or reorders the input.
pub fn filter(set: &AlarmSet, criteria: &FilterCriteria, now: DateTime<Utc>) -> AlarmSet {
    let cutoff = criteria.time_range.hours().map(|h| now - Duration::hours(h));

    let keep = |record: &AlarmRecord, stamp: DateTime<Utc>| {
        criteria.severity.matches(record.severity)
            && criteria.unit.matches(&record.unit)
            && cutoff.map_or(true, |c| stamp >= c)
    };

    AlarmSet {
        active: set.active.iter().filter(|&r| keep(r, r.activated_at)).cloned().collect(),
        cleared: set
            .cleared
            .iter()
            .filter(|&r| keep(r, r.cleared_at.unwrap_or(r.activated_at)))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::status::Indicator;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn active_record(unit: &str, severity: StatusLevel, hours_ago: i64) -> AlarmRecord {
        AlarmRecord::active(
            unit.to_string(),
            Indicator::Temperature,
            severity,
            now() - Duration::hours(hours_ago),
        )
    }

    fn cleared_record(unit: &str, severity: StatusLevel, cleared_hours_ago: i64) -> AlarmRecord {
        let mut record = AlarmRecord::active(
            unit.to_string(),
            Indicator::Voltage,
            severity,
            now() - Duration::hours(cleared_hours_ago + 1),
        );
        record.clear(now() - Duration::hours(cleared_hours_ago));
        record
    }

    fn mixed_set() -> AlarmSet {
        AlarmSet {
            active: vec![
                active_record("unit-01", StatusLevel::Critical, 0),
                active_record("unit-02", StatusLevel::Critical, 2),
                active_record("unit-03", StatusLevel::Critical, 5),
                active_record("unit-01", StatusLevel::Warning, 1),
                active_record("unit-02", StatusLevel::Warning, 3),
                active_record("unit-03", StatusLevel::Warning, 8),
                active_record("unit-04", StatusLevel::Warning, 12),
                active_record("unit-05", StatusLevel::Warning, 30),
            ],
            cleared: vec![
                cleared_record("unit-01", StatusLevel::Degraded, 2),
                cleared_record("unit-02", StatusLevel::Warning, 26),
            ],
        }
    }

    #[test]
    fn test_unfiltered_passes_everything_through() {
        let set = mixed_set();
        let out = filter(&set, &FilterCriteria::default(), now());
        assert_eq!(out.active.len(), set.active.len());
        assert_eq!(out.cleared.len(), set.cleared.len());
    }

    #[test]
    fn test_result_is_subset_in_input_order() {
        let set = mixed_set();
        let criteria = FilterCriteria {
            severity: SeverityFilter::Warning,
            ..FilterCriteria::default()
        };
        let out = filter(&set, &criteria, now());
        let mut input_iter = set.active.iter();
        for record in &out.active {
            // Every output record occurs in the input, later than the previous one
            assert!(input_iter.any(|r| r == record));
        }
    }

    #[test]
    fn test_exact_severity_match() {
        // 3 CRITICAL + 5 WARNING active alarms
        let set = mixed_set();
        let criteria = FilterCriteria {
            severity: SeverityFilter::Critical,
            ..FilterCriteria::default()
        };
        let out = filter(&set, &criteria, now());
        assert_eq!(out.active.len(), 3);
        assert!(out.active.iter().all(|r| r.severity == StatusLevel::Critical));
    }

    #[test]
    fn test_time_range_excludes_old_activations() {
        // Activated 2 hours ago, filtered to the last hour
        let set = AlarmSet {
            active: vec![active_record("unit-01", StatusLevel::Critical, 2)],
            cleared: Vec::new(),
        };
        let criteria = FilterCriteria {
            time_range: TimeRange::LastHour,
            ..FilterCriteria::default()
        };
        let out = filter(&set, &criteria, now());
        assert!(out.active.is_empty());
    }

    #[test]
    fn test_cleared_records_filter_on_cleared_time() {
        let set = mixed_set();
        let criteria = FilterCriteria {
            time_range: TimeRange::LastDay,
            ..FilterCriteria::default()
        };
        let out = filter(&set, &criteria, now());
        // Cleared 26 hours ago falls outside the 24 hour window
        assert_eq!(out.cleared.len(), 1);
        assert_eq!(out.cleared[0].unit, "unit-01");
    }

    #[test]
    fn test_unit_filter_exact_match() {
        let set = mixed_set();
        let criteria = FilterCriteria {
            unit: UnitFilter::Unit("unit-02".to_string()),
            ..FilterCriteria::default()
        };
        let out = filter(&set, &criteria, now());
        assert!(out.active.iter().all(|r| r.unit == "unit-02"));
        assert_eq!(out.active.len(), 2);
    }

    #[test]
    fn test_criteria_and_together() {
        let set = mixed_set();
        let criteria = FilterCriteria {
            severity: SeverityFilter::Critical,
            time_range: TimeRange::LastHour,
            unit: UnitFilter::Unit("unit-01".to_string()),
        };
        let out = filter(&set, &criteria, now());
        assert_eq!(out.active.len(), 1);
        assert_eq!(out.active[0].unit, "unit-01");
        assert!(out.cleared.is_empty());
    }

    #[test]
    fn test_empty_result_is_valid() {
        let out = filter(&AlarmSet::default(), &FilterCriteria::default(), now());
        assert!(out.is_empty());
    }

    #[test]
    fn test_cycling_wraps_around() {
        let mut severity = SeverityFilter::All;
        for _ in 0..4 {
            severity = severity.next();
        }
        assert_eq!(severity, SeverityFilter::All);

        let mut range = TimeRange::All;
        for _ in 0..5 {
            range = range.next();
        }
        assert_eq!(range, TimeRange::All);
    }
}
