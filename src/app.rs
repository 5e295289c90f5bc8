//! Application state and navigation logic.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Local, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::export::{export_filename, to_csv};
use crate::data::{
    audit, filter, AlarmLedger, AlarmSet, FilterCriteria, FleetHealth, History, SeedConfig,
    UnitFilter,
};
use crate::source::DataSource;
use crate::ui::units::{sort_units_by, SortColumn};
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Unit detail is shown as an overlay (controlled by
/// `App::show_detail_overlay`) rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Overview of all units with aggregate status.
    Units,
    /// Active and cleared alarms with filter criteria.
    Alarms,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Units => View::Alarms,
            View::Alarms => View::Units,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Units => View::Alarms,
            View::Alarms => View::Units,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Units => "Units",
            View::Alarms => "Alarms",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source and derived state
    source: Box<dyn DataSource>,
    pub fleet: Option<FleetHealth>,
    pub ledger: AlarmLedger,
    pub history: History,
    pub load_error: Option<String>,
    /// Integrity warnings carried by the last snapshot.
    pub warning_count: usize,

    /// Explicit criteria value threaded into the filter engine.
    pub criteria: FilterCriteria,
    /// System name used in export filenames.
    pub system_name: String,

    // Navigation state
    pub selected_unit_index: usize,
    pub selected_alarm_index: usize,

    // Sorting (Units view)
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    // Search/filter (Units view)
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,
}

impl App {
    /// Create a new App with the given data source.
    pub fn new(source: Box<dyn DataSource>, system_name: String) -> Self {
        Self {
            running: true,
            current_view: View::Units,
            show_help: false,
            show_detail_overlay: false,
            source,
            fleet: None,
            ledger: AlarmLedger::new(),
            history: History::new(),
            load_error: None,
            warning_count: 0,
            criteria: FilterCriteria::default(),
            system_name,
            selected_unit_index: 0,
            selected_alarm_index: 0,
            sort_column: SortColumn::default(),
            sort_ascending: true,
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for new data.
    ///
    /// On a fresh snapshot the fleet model is rebuilt, the aggregate audit
    /// runs, the ledger observes the transitions, and the trend history is
    /// updated. Returns Ok(true) if new data was received.
    pub fn reload_data(&mut self) -> Result<bool> {
        // Check for errors from the source
        if let Some(err) = self.source.error() {
            self.load_error = Some(err.to_string());
            return Ok(false);
        }

        // Poll for new data
        if let Some(snapshot) = self.source.poll() {
            let fleet = FleetHealth::from_snapshot(snapshot);

            for warning in &fleet.warnings {
                tracing::warn!("integrity: {}", warning);
            }
            // The cached aggregates must always match a fresh recomputation
            for discrepancy in audit(&fleet) {
                tracing::warn!(
                    "aggregate mismatch for {}: displayed {}, recomputed {}",
                    discrepancy.unit,
                    discrepancy.displayed,
                    discrepancy.recomputed
                );
            }
            self.warning_count = fleet.warnings.len();

            self.ledger.observe(&fleet, Utc::now());
            self.history.record(&fleet, self.ledger.active_count());
            self.fleet = Some(fleet);
            self.load_error = None;

            // Clamp selection indices
            if let Some(ref fleet) = self.fleet {
                if self.selected_unit_index >= fleet.units.len() {
                    self.selected_unit_index = fleet.units.len().saturating_sub(1);
                }
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Install fabricated demo history into the ledger.
    ///
    /// Requires a loaded fleet; an explicit, optional step - the ledger
    /// itself never synthesizes records.
    pub fn seed_demo(&mut self, cfg: &SeedConfig, seed: u64) {
        if let Some(ref fleet) = self.fleet {
            let mut rng = StdRng::seed_from_u64(seed);
            let records = crate::data::seed_demo_alarms(fleet, cfg, Utc::now(), &mut rng);
            let count = records.len();
            self.ledger.absorb(records);
            self.set_status_message(format!("Seeded {} demo alarms", count));
        }
    }

    /// The current alarm view under the active filter criteria.
    pub fn alarms(&self) -> AlarmSet {
        filter(&self.ledger.snapshot(), &self.criteria, Utc::now())
    }

    /// Cycle the severity filter dimension.
    pub fn cycle_severity_filter(&mut self) {
        self.criteria.severity = self.criteria.severity.next();
        self.selected_alarm_index = 0;
    }

    /// Cycle the time-range filter dimension.
    pub fn cycle_time_range(&mut self) {
        self.criteria.time_range = self.criteria.time_range.next();
        self.selected_alarm_index = 0;
    }

    /// Cycle the unit filter dimension through ALL and each unit in
    /// display order.
    pub fn cycle_unit_filter(&mut self) {
        let ids: Vec<String> = self
            .fleet
            .as_ref()
            .map(|f| f.units.iter().map(|u| u.id.clone()).collect())
            .unwrap_or_default();

        self.criteria.unit = match &self.criteria.unit {
            UnitFilter::All => match ids.first() {
                Some(id) => UnitFilter::Unit(id.clone()),
                None => UnitFilter::All,
            },
            UnitFilter::Unit(current) => match ids.iter().position(|id| id == current) {
                Some(pos) if pos + 1 < ids.len() => UnitFilter::Unit(ids[pos + 1].clone()),
                _ => UnitFilter::All,
            },
        };
        self.selected_alarm_index = 0;
    }

    /// Reset all filter criteria to their defaults.
    pub fn reset_criteria(&mut self) {
        self.criteria = FilterCriteria::default();
        self.selected_alarm_index = 0;
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
        self.selected_alarm_index = 0;
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
        self.selected_alarm_index = 0;
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.selected_alarm_index = 0;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        match self.current_view {
            View::Units => {
                if let Some(ref fleet) = self.fleet {
                    let filtered_count = self.filtered_unit_count(fleet);
                    let max = filtered_count.saturating_sub(1);
                    self.selected_unit_index = (self.selected_unit_index + n).min(max);
                }
            }
            View::Alarms => {
                let count = self.alarms().active.len();
                let max = count.saturating_sub(1);
                self.selected_alarm_index = (self.selected_alarm_index + n).min(max);
            }
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        match self.current_view {
            View::Units => {
                self.selected_unit_index = self.selected_unit_index.saturating_sub(n);
            }
            View::Alarms => {
                self.selected_alarm_index = self.selected_alarm_index.saturating_sub(n);
            }
        }
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        match self.current_view {
            View::Units => self.selected_unit_index = 0,
            View::Alarms => self.selected_alarm_index = 0,
        }
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        match self.current_view {
            View::Units => {
                if let Some(ref fleet) = self.fleet {
                    let filtered_count = self.filtered_unit_count(fleet);
                    self.selected_unit_index = filtered_count.saturating_sub(1);
                }
            }
            View::Alarms => {
                let count = self.alarms().active.len();
                self.selected_alarm_index = count.saturating_sub(1);
            }
        }
    }

    /// Get count of units after applying the text filter.
    pub fn filtered_unit_count(&self, fleet: &FleetHealth) -> usize {
        if self.filter_text.is_empty() {
            return fleet.units.len();
        }
        fleet.units.iter().filter(|u| self.matches_filter(u)).count()
    }

    /// Check if a unit matches the current text filter (id or name).
    pub fn matches_filter(&self, unit: &crate::data::UnitHealth) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let search = self.filter_text.to_lowercase();
        unit.id.to_lowercase().contains(&search) || unit.name.to_lowercase().contains(&search)
    }

    /// Get the actual unit index from the visual index (after
    /// sorting/filtering in the Units view).
    pub fn get_selected_unit_raw_index(&self) -> Option<usize> {
        let fleet = self.fleet.as_ref()?;

        let mut units: Vec<(usize, &crate::data::UnitHealth)> = fleet
            .units
            .iter()
            .enumerate()
            .filter(|(_, u)| self.matches_filter(u))
            .collect();
        sort_units_by(&mut units, &self.ledger, self.sort_column, self.sort_ascending);

        units.get(self.selected_unit_index).map(|(idx, _)| *idx)
    }

    /// Open the detail overlay for the currently selected unit.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Units {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close the overlay first, then return to Units.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if self.current_view != View::Units {
            self.current_view = View::Units;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle to the next sort column (Units view).
    pub fn cycle_sort(&mut self) {
        self.sort_column = self.sort_column.next();
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        self.sort_ascending = !self.sort_ascending;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current filtered alarm view as CSV into `dir`.
    ///
    /// An empty view still produces a well-formed header-only file.
    pub fn export_alarms(&self, dir: &Path) -> Result<PathBuf> {
        let now = Utc::now();
        let set = filter(&self.ledger.snapshot(), &self.criteria, now);
        let csv = to_csv(&set.active, &set.cleared, now);
        let path = dir.join(export_filename(&self.system_name, Local::now()));
        std::fs::write(&path, csv)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::status::Indicator;
    use crate::source::{ChannelSource, HealthSnapshot, SerializedUnitState};
    use crate::data::{SeverityFilter, TimeRange};
    use std::collections::BTreeMap;

    fn snapshot_with(units: &[(&str, &str, &str)]) -> HealthSnapshot {
        let mut snapshot: HealthSnapshot = BTreeMap::new();
        for (unit, indicator, level) in units {
            let state = snapshot.entry(unit.to_string()).or_insert_with(|| SerializedUnitState {
                name: None,
                indicators: Indicator::ALL
                    .iter()
                    .map(|i| (i.name().to_string(), "ok".to_string()))
                    .collect(),
            });
            state.indicators.insert(indicator.to_string(), level.to_string());
        }
        snapshot
    }

    fn app_with(units: &[(&str, &str, &str)]) -> App {
        let (tx, source) = ChannelSource::create("test");
        tx.send(snapshot_with(units)).unwrap();
        let mut app = App::new(Box::new(source), "Testbed".to_string());
        // First poll consumes the initial empty value
        let _ = app.reload_data();
        let _ = app.reload_data();
        app
    }

    #[test]
    fn test_reload_builds_fleet_and_ledger() {
        let mut app = app_with(&[("unit-01", "temperature", "critical")]);
        // Drain any pending channel state
        let _ = app.reload_data();

        let fleet = app.fleet.as_ref().unwrap();
        assert_eq!(fleet.units.len(), 1);
        assert_eq!(app.ledger.active_count(), 1);
        assert_eq!(app.alarms().active.len(), 1);
    }

    #[test]
    fn test_criteria_cycling() {
        let mut app = app_with(&[("unit-01", "temperature", "critical")]);
        assert_eq!(app.criteria.severity, SeverityFilter::All);
        app.cycle_severity_filter();
        assert_eq!(app.criteria.severity, SeverityFilter::Degraded);
        app.cycle_time_range();
        assert_eq!(app.criteria.time_range, TimeRange::LastHour);

        app.cycle_unit_filter();
        assert_eq!(app.criteria.unit, UnitFilter::Unit("unit-01".to_string()));
        app.cycle_unit_filter();
        assert_eq!(app.criteria.unit, UnitFilter::All);

        app.reset_criteria();
        assert!(app.criteria.is_unfiltered());
    }

    #[test]
    fn test_severity_filter_narrows_view() {
        let mut app = app_with(&[
            ("unit-01", "temperature", "critical"),
            ("unit-02", "memory", "warning"),
        ]);
        let _ = app.reload_data();

        assert_eq!(app.alarms().active.len(), 2);
        app.cycle_severity_filter(); // DEGRADED
        assert_eq!(app.alarms().active.len(), 0);
        app.cycle_severity_filter(); // WARNING
        assert_eq!(app.alarms().active.len(), 1);
        app.cycle_severity_filter(); // CRITICAL
        assert_eq!(app.alarms().active.len(), 1);
    }

    #[test]
    fn test_seed_demo_populates_ledger() {
        let mut app = app_with(&[("unit-01", "temperature", "critical")]);
        let _ = app.reload_data();
        let before = app.ledger.snapshot().len();
        app.seed_demo(&SeedConfig::default(), 7);
        assert!(app.ledger.snapshot().len() > before);
    }

    #[test]
    fn test_export_writes_header_only_when_empty() {
        let (_tx, source) = ChannelSource::create("test");
        let app = App::new(Box::new(source), "Testbed".to_string());
        let dir = tempfile::tempdir().unwrap();
        let path = app.export_alarms(dir.path()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("Testbed_Alarms_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_view_cycling() {
        let mut app = app_with(&[]);
        assert_eq!(app.current_view, View::Units);
        app.next_view();
        assert_eq!(app.current_view, View::Alarms);
        app.go_back();
        assert_eq!(app.current_view, View::Units);
    }
}
