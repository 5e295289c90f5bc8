//! Data models and processing for unit health snapshots.
//!
//! This module turns raw health snapshots into structured fleet state and
//! maintains the alarm ledger derived from it.
//!
//! ## Submodules
//!
//! - [`status`]: Severity ordering, the fixed indicator set, and worst-case
//!   aggregation
//! - [`health`]: Parsed fleet model ([`FleetHealth`], [`UnitHealth`]) and the
//!   display/recompute audit
//! - [`duration`]: Human-readable duration strings for alarm lifetimes
//! - [`alarm`]: Alarm records and the transition-driven [`AlarmLedger`]
//! - [`filter`]: Severity/time-range/unit narrowing of alarm views
//! - [`export`]: CSV rendering of alarm views
//! - [`seed`]: Demo alarm fixtures (explicitly separate from the ledger)
//! - [`history`]: Severity trend tracking for the UI
//!
//! ## Data Flow
//!
//! ```text
//! HealthSnapshot (raw JSON)
//!        │
//!        ▼
//! FleetHealth::from_snapshot()
//!        │
//!        ├──▶ AlarmLedger::observe()  ──▶ AlarmSet ──▶ filter() ──▶ to_csv()
//!        │
//!        └──▶ History::record()
//! ```

pub mod alarm;
pub mod duration;
pub mod export;
pub mod filter;
pub mod health;
pub mod history;
pub mod seed;
pub mod status;

pub use alarm::{AlarmLedger, AlarmRecord, AlarmSet};
pub use filter::{filter, FilterCriteria, SeverityFilter, TimeRange, UnitFilter};
pub use health::{audit, Discrepancy, FleetHealth, UnitHealth};
pub use history::History;
pub use seed::{seed_demo_alarms, SeedConfig};
pub use status::{Indicator, IndicatorReadings, IntegrityWarning, StatusLevel};
