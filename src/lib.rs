// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # unitwatch
//!
//! A diagnostic TUI and library for monitoring field unit health and
//! alarm activity.
//!
//! Each monitored unit reports a fixed set of 12 health indicators; this
//! crate aggregates them into a worst-case severity per unit, maintains a
//! transition-driven alarm ledger (activation/clearing lifecycle with
//! duration accounting), and serves filtered alarm views and CSV exports
//! to an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(processing)   │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | StreamSource | ChannelSource  │
//! │  │ (input) │              | SimSource                      │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with
//!   implementations for file polling, TCP streams, channel-based input,
//!   and a seeded fleet simulator
//! - **[`data`]**: Data models and processing - severity aggregation, the
//!   alarm ledger, filter engine, CSV export, and demo fixtures
//! - **[`ui`]**: Terminal rendering using ratatui - unit tables, alarm
//!   ledger views, detail overlays, and theme support
//! - **[`settings`]**: Layered configuration (file + environment)
//!
//! ## Features
//!
//! - **Units view**: Overview of all units with worst-case severity and trend
//! - **Alarms view**: Active/cleared alarm ledger with severity, time-range,
//!   and unit filtering
//! - **CSV export**: Deterministic, escaped export of the filtered view
//! - **Integrity auditing**: Displayed severities are checked against fresh
//!   recomputation every cycle
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a health snapshot file (written by a collector)
//! unitwatch --file health.json
//!
//! # Watch a live TCP feed of newline-delimited snapshots
//! unitwatch --connect localhost:9090
//!
//! # Run against the built-in simulator with demo alarm history
//! unitwatch --sim --demo-alarms
//! ```
//!
//! ### As a library with file source
//!
//! ```
//! use unitwatch::{App, FileSource};
//!
//! let source = Box::new(FileSource::new("health.json"));
//! let app = App::new(source, "Unitwatch".to_string());
//! ```
//!
//! ### As a library with channel source (for collector integration)
//!
//! ```
//! use unitwatch::{App, ChannelSource};
//!
//! // Create a channel for receiving snapshots
//! let (tx, source) = ChannelSource::create("collector");
//!
//! // Create the app
//! let app = App::new(Box::new(source), "Unitwatch".to_string());
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{
    AlarmLedger, AlarmRecord, AlarmSet, FilterCriteria, FleetHealth, Indicator, IndicatorReadings,
    IntegrityWarning, SeverityFilter, StatusLevel, TimeRange, UnitFilter, UnitHealth,
};
pub use settings::Settings;
pub use source::{
    ChannelSource, DataSource, FileSource, HealthSnapshot, SerializedUnitState, SimSource,
    StreamSource,
};
