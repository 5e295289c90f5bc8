//! Terminal rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`common`]: Header bar, tab bar, status bar, and help overlay
//! - [`units`]: Fleet summary table with sorting and text filtering
//! - [`alarms`]: Alarm ledger view with criteria bar and active/cleared tables
//! - [`detail`]: Per-unit indicator overlay
//! - [`theme`]: Light/dark themes and severity colors

pub mod alarms;
pub mod common;
pub mod detail;
pub mod theme;
pub mod units;

pub use theme::Theme;
pub use units::SortColumn;
