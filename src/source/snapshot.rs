//! Shared types for unit health snapshots.
//!
//! These types match the JSON format produced by the health-reporting
//! collaborator (a real telemetry feed in production, the simulator in
//! this repo). They stay string-keyed at the wire boundary; interpretation
//! into the closed indicator/severity types happens in [`crate::data`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A complete snapshot of fleet health.
///
/// Maps stable unit ids to their reported state.
pub type HealthSnapshot = BTreeMap<String, SerializedUnitState>;

/// Reported state for a single unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedUnitState {
    /// Display name; consumers fall back to the unit id when absent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,

    /// Raw indicator readings keyed by indicator name, with severity
    /// tokens as values (e.g. "ok", "warning").
    pub indicators: BTreeMap<String, String>,
}
