//! Status levels, the fixed indicator set, and worst-case aggregation.
//!
//! Every monitored unit reports the same 12 indicators. Aggregation is
//! worst-wins: a unit's severity is the maximum severity across its
//! readings, and this is the single ordering used for both tile coloring
//! and alarm derivation.

use std::collections::BTreeMap;
use std::fmt;

/// Ordered severity of a single health reading.
///
/// Ascending severity: `Ok < Degraded < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusLevel {
    Ok,
    Degraded,
    Warning,
    Critical,
}

impl StatusLevel {
    /// Canonical uppercase label, as rendered in exports.
    pub fn label(&self) -> &'static str {
        match self {
            StatusLevel::Ok => "OK",
            StatusLevel::Degraded => "DEGRADED",
            StatusLevel::Warning => "WARNING",
            StatusLevel::Critical => "CRITICAL",
        }
    }

    /// Returns a short symbol for table display.
    pub fn symbol(&self) -> &'static str {
        match self {
            StatusLevel::Ok => "OK",
            StatusLevel::Degraded => "DEGR",
            StatusLevel::Warning => "WARN",
            StatusLevel::Critical => "CRIT",
        }
    }

    /// Parse a wire token, case-insensitively.
    ///
    /// Accepts the legacy labels `caution` (= Degraded) and `failed`
    /// (= Critical) alongside the canonical set. Returns `None` for
    /// anything else; callers substitute `Ok` and record an
    /// [`IntegrityWarning`].
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "ok" => Some(StatusLevel::Ok),
            "degraded" | "caution" => Some(StatusLevel::Degraded),
            "warning" => Some(StatusLevel::Warning),
            "critical" | "failed" => Some(StatusLevel::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The fixed, closed set of health indicators every unit reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Indicator {
    Voltage,
    Current,
    Temperature,
    FanSpeed,
    PowerSupply,
    CpuLoad,
    Memory,
    Storage,
    Network,
    LinkQuality,
    Firmware,
    ClockSync,
}

/// Number of indicators per unit.
pub const INDICATOR_COUNT: usize = 12;

impl Indicator {
    /// All indicators, in wire order.
    pub const ALL: [Indicator; INDICATOR_COUNT] = [
        Indicator::Voltage,
        Indicator::Current,
        Indicator::Temperature,
        Indicator::FanSpeed,
        Indicator::PowerSupply,
        Indicator::CpuLoad,
        Indicator::Memory,
        Indicator::Storage,
        Indicator::Network,
        Indicator::LinkQuality,
        Indicator::Firmware,
        Indicator::ClockSync,
    ];

    /// Wire key used in snapshots.
    pub fn name(&self) -> &'static str {
        match self {
            Indicator::Voltage => "voltage",
            Indicator::Current => "current",
            Indicator::Temperature => "temperature",
            Indicator::FanSpeed => "fan_speed",
            Indicator::PowerSupply => "power_supply",
            Indicator::CpuLoad => "cpu_load",
            Indicator::Memory => "memory",
            Indicator::Storage => "storage",
            Indicator::Network => "network",
            Indicator::LinkQuality => "link_quality",
            Indicator::Firmware => "firmware",
            Indicator::ClockSync => "clock_sync",
        }
    }

    /// Human-readable label for table display.
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Voltage => "Voltage",
            Indicator::Current => "Current",
            Indicator::Temperature => "Temperature",
            Indicator::FanSpeed => "Fan Speed",
            Indicator::PowerSupply => "Power Supply",
            Indicator::CpuLoad => "CPU Load",
            Indicator::Memory => "Memory",
            Indicator::Storage => "Storage",
            Indicator::Network => "Network",
            Indicator::LinkQuality => "Link Quality",
            Indicator::Firmware => "Firmware",
            Indicator::ClockSync => "Clock Sync",
        }
    }

    /// Operator-facing message used in alarm exports.
    pub fn message(&self) -> &'static str {
        match self {
            Indicator::Voltage => "Supply voltage out of range",
            Indicator::Current => "Load current out of range",
            Indicator::Temperature => "Overtemperature condition",
            Indicator::FanSpeed => "Cooling fan below minimum speed",
            Indicator::PowerSupply => "Power supply fault",
            Indicator::CpuLoad => "Processor load above limit",
            Indicator::Memory => "Memory utilization above limit",
            Indicator::Storage => "Storage capacity low",
            Indicator::Network => "Network interface unreachable",
            Indicator::LinkQuality => "Uplink quality degraded",
            Indicator::Firmware => "Firmware integrity check failed",
            Indicator::ClockSync => "Clock synchronization lost",
        }
    }

    /// Look up an indicator by its wire key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|i| i.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A non-fatal data problem found while interpreting a snapshot.
///
/// Integrity warnings never abort processing: the affected reading is
/// substituted with `Ok` (or dropped, for unknown keys) and the warning is
/// surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// A unit's snapshot was missing one of the 12 fixed indicators.
    MissingIndicator { unit: String, indicator: Indicator },
    /// A unit's snapshot contained a key outside the fixed indicator set.
    UnknownIndicator { unit: String, key: String },
    /// A reading carried a severity token outside the known label set.
    UnknownStatus {
        unit: String,
        indicator: Indicator,
        token: String,
    },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::MissingIndicator { unit, indicator } => {
                write!(f, "{}: missing indicator '{}', assuming OK", unit, indicator.name())
            }
            IntegrityWarning::UnknownIndicator { unit, key } => {
                write!(f, "{}: unknown indicator '{}', ignored", unit, key)
            }
            IntegrityWarning::UnknownStatus { unit, indicator, token } => {
                write!(
                    f,
                    "{}: unknown status '{}' for '{}', assuming OK",
                    unit,
                    token,
                    indicator.name()
                )
            }
        }
    }
}

/// Dense readings for all 12 indicators of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorReadings([StatusLevel; INDICATOR_COUNT]);

impl Default for IndicatorReadings {
    fn default() -> Self {
        Self::all_ok()
    }
}

impl IndicatorReadings {
    /// Readings with every indicator at `Ok`.
    pub fn all_ok() -> Self {
        Self([StatusLevel::Ok; INDICATOR_COUNT])
    }

    /// Build readings from a raw string-keyed snapshot entry.
    ///
    /// Missing indicators are substituted with `Ok`, unknown keys are
    /// dropped, and unknown severity tokens become `Ok`; each case appends
    /// one [`IntegrityWarning`] instead of failing.
    pub fn from_raw(
        unit: &str,
        raw: &BTreeMap<String, String>,
        warnings: &mut Vec<IntegrityWarning>,
    ) -> Self {
        let mut readings = Self::all_ok();
        let mut present = [false; INDICATOR_COUNT];

        for (key, token) in raw {
            let Some(indicator) = Indicator::from_name(key) else {
                warnings.push(IntegrityWarning::UnknownIndicator {
                    unit: unit.to_string(),
                    key: key.clone(),
                });
                continue;
            };
            present[indicator.index()] = true;
            match StatusLevel::parse(token) {
                Some(level) => readings.set(indicator, level),
                None => {
                    warnings.push(IntegrityWarning::UnknownStatus {
                        unit: unit.to_string(),
                        indicator,
                        token: token.clone(),
                    });
                }
            }
        }

        for indicator in Indicator::ALL {
            if !present[indicator.index()] {
                warnings.push(IntegrityWarning::MissingIndicator {
                    unit: unit.to_string(),
                    indicator,
                });
            }
        }

        readings
    }

    /// Reading for a single indicator.
    pub fn get(&self, indicator: Indicator) -> StatusLevel {
        self.0[indicator.index()]
    }

    /// Overwrite the reading for a single indicator.
    pub fn set(&mut self, indicator: Indicator, level: StatusLevel) {
        self.0[indicator.index()] = level;
    }

    /// Iterate readings in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, StatusLevel)> + '_ {
        Indicator::ALL.iter().map(move |&i| (i, self.get(i)))
    }

    /// Worst-case severity across all readings.
    ///
    /// This is the one aggregation rule in the system; display coloring and
    /// alarm derivation both go through it.
    pub fn aggregate(&self) -> StatusLevel {
        self.0.iter().copied().max().unwrap_or(StatusLevel::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn full_ok_raw() -> BTreeMap<String, String> {
        Indicator::ALL.iter().map(|i| (i.name().to_string(), "ok".to_string())).collect()
    }

    #[test]
    fn test_aggregate_all_ok() {
        let readings = IndicatorReadings::all_ok();
        assert_eq!(readings.aggregate(), StatusLevel::Ok);
    }

    #[test]
    fn test_aggregate_worst_wins_regardless_of_position() {
        for indicator in Indicator::ALL {
            let mut readings = IndicatorReadings::all_ok();
            readings.set(indicator, StatusLevel::Critical);
            assert_eq!(readings.aggregate(), StatusLevel::Critical);
        }
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let mut readings = IndicatorReadings::all_ok();
        readings.set(Indicator::Memory, StatusLevel::Warning);
        let first = readings.aggregate();
        assert_eq!(first, readings.aggregate());
        assert_eq!(first, StatusLevel::Warning);
    }

    #[test]
    fn test_overtemp_scenario() {
        // 11 indicators OK, temperature CRITICAL
        let mut entries = full_ok_raw();
        entries.insert("temperature".to_string(), "critical".to_string());
        let mut warnings = Vec::new();
        let readings = IndicatorReadings::from_raw("unit-01", &entries, &mut warnings);
        assert!(warnings.is_empty());
        assert_eq!(readings.aggregate(), StatusLevel::Critical);
        assert_eq!(Indicator::Temperature.message(), "Overtemperature condition");
    }

    #[test]
    fn test_missing_indicator_is_ok_with_warning() {
        let mut entries = full_ok_raw();
        entries.remove("fan_speed");
        let mut warnings = Vec::new();
        let readings = IndicatorReadings::from_raw("unit-01", &entries, &mut warnings);
        assert_eq!(readings.get(Indicator::FanSpeed), StatusLevel::Ok);
        assert_eq!(
            warnings,
            vec![IntegrityWarning::MissingIndicator {
                unit: "unit-01".to_string(),
                indicator: Indicator::FanSpeed,
            }]
        );
    }

    #[test]
    fn test_unknown_status_token_is_ok_with_warning() {
        let mut entries = full_ok_raw();
        entries.insert("voltage".to_string(), "exploded".to_string());
        let mut warnings = Vec::new();
        let readings = IndicatorReadings::from_raw("unit-01", &entries, &mut warnings);
        assert_eq!(readings.get(Indicator::Voltage), StatusLevel::Ok);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            IntegrityWarning::UnknownStatus { token, .. } if token == "exploded"
        ));
    }

    #[test]
    fn test_unknown_indicator_key_is_dropped_with_warning() {
        let mut entries = full_ok_raw();
        entries.insert("flux_capacitor".to_string(), "critical".to_string());
        let mut warnings = Vec::new();
        let readings = IndicatorReadings::from_raw("unit-01", &entries, &mut warnings);
        // The unknown reading never reaches aggregation
        assert_eq!(readings.aggregate(), StatusLevel::Ok);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_parse_accepts_legacy_labels() {
        assert_eq!(StatusLevel::parse("caution"), Some(StatusLevel::Degraded));
        assert_eq!(StatusLevel::parse("FAILED"), Some(StatusLevel::Critical));
        assert_eq!(StatusLevel::parse("Warning"), Some(StatusLevel::Warning));
        assert_eq!(StatusLevel::parse("nonsense"), None);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(StatusLevel::Ok < StatusLevel::Degraded);
        assert!(StatusLevel::Degraded < StatusLevel::Warning);
        assert!(StatusLevel::Warning < StatusLevel::Critical);
    }

    #[test]
    fn test_indicator_wire_names_round_trip() {
        for indicator in Indicator::ALL {
            assert_eq!(Indicator::from_name(indicator.name()), Some(indicator));
        }
        assert_eq!(Indicator::from_name("bogus"), None);
    }

    #[test]
    fn test_partial_raw_map() {
        let entries = raw(&[("temperature", "warning")]);
        let mut warnings = Vec::new();
        let readings = IndicatorReadings::from_raw("unit-02", &entries, &mut warnings);
        assert_eq!(readings.aggregate(), StatusLevel::Warning);
        // 11 missing-indicator warnings
        assert_eq!(warnings.len(), 11);
    }
}
