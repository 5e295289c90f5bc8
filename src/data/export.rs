//! CSV export of alarm views.
//!
//! Export never fails: an empty view yields a header-only document, and
//! the per-indicator message catalog is total.

use chrono::{DateTime, Local, Utc};

use super::alarm::AlarmRecord;
use super::duration::elapsed_since;

/// Fixed column header for alarm exports.
pub const CSV_HEADER: &str = "Severity,Module,Status,Triggered Time,Cleared Time,Duration,Message";

/// Render active and cleared alarms as CSV text.
///
/// Active rows carry an empty "Cleared Time" and a live duration computed
/// against `now`; cleared rows use their stored clearing time and frozen
/// duration.
pub fn to_csv(active: &[AlarmRecord], cleared: &[AlarmRecord], now: DateTime<Utc>) -> String {
    let mut out = String::with_capacity(64 * (1 + active.len() + cleared.len()));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for record in active {
        push_row(
            &mut out,
            record,
            "ACTIVE",
            String::new(),
            elapsed_since(record.activated_at, now),
        );
    }

    for record in cleared {
        let cleared_at = record.cleared_at.unwrap_or(record.activated_at);
        let duration = record
            .duration
            .clone()
            .unwrap_or_else(|| elapsed_since(record.activated_at, cleared_at));
        push_row(&mut out, record, "CLEARED", format_timestamp(cleared_at), duration);
    }

    out
}

fn push_row(
    out: &mut String,
    record: &AlarmRecord,
    status: &str,
    cleared_time: String,
    duration: String,
) {
    let fields = [
        record.severity.label().to_string(),
        record.unit.clone(),
        status.to_string(),
        format_timestamp(record.activated_at),
        cleared_time,
        duration,
        record.message().to_string(),
    ];
    let row: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

/// Quote a field containing a comma, double quote, or line break, doubling
/// internal quotes.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render a timestamp as zero-padded `YYYY-MM-DD HH:MM:SS` in local time.
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Filename for a downloadable export:
/// `<SystemName>_Alarms_<YYYY-MM-DD_HH-MM-SS>.csv`.
pub fn export_filename(system_name: &str, now: DateTime<Local>) -> String {
    format!("{}_Alarms_{}.csv", system_name, now.format("%Y-%m-%d_%H-%M-%S"))
}
