//! Human-readable duration formatting for alarm lifetimes.

use chrono::{DateTime, Utc};

/// Format a millisecond span, largest unit first.
///
/// `Nd Hh` at one day or more, `Hh Mm` at one hour or more, `Mm` at one
/// minute or more, `Ss` below that. Negative spans clamp to zero.
pub fn format_duration_ms(ms: i64) -> String {
    let secs = ms.max(0) / 1000;
    let mins = secs / 60;
    let hours = mins / 60;
    let days = hours / 24;

    if days >= 1 {
        format!("{}d {}h", days, hours % 24)
    } else if hours >= 1 {
        format!("{}h {}m", hours, mins % 60)
    } else if mins >= 1 {
        format!("{}m", mins)
    } else {
        format!("{}s", secs)
    }
}

/// Elapsed time from `t0` to `now` as a duration string.
///
/// An activation timestamp in the future never yields a negative span;
/// clock skew clamps to `"0s"`.
pub fn elapsed_since(t0: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_duration_ms((now - t0).num_milliseconds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_duration_ms(0), "0s");
        assert_eq!(format_duration_ms(45_000), "45s");
        assert_eq!(format_duration_ms(59_999), "59s");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_duration_ms(60_000), "1m");
        assert_eq!(format_duration_ms(5 * 60_000), "5m");
        assert_eq!(format_duration_ms(59 * 60_000 + 59_000), "59m");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_duration_ms(3_600_000), "1h 0m");
        assert_eq!(format_duration_ms(3_600_000 + 30 * 60_000), "1h 30m");
        assert_eq!(format_duration_ms(23 * 3_600_000 + 59 * 60_000), "23h 59m");
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_duration_ms(24 * 3_600_000), "1d 0h");
        assert_eq!(format_duration_ms(26 * 3_600_000), "1d 2h");
        assert_eq!(format_duration_ms(7 * 24 * 3_600_000 + 3 * 3_600_000), "7d 3h");
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(format_duration_ms(-5000), "0s");
    }

    #[test]
    fn test_five_minute_alarm_window() {
        let activated = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let cleared = Utc.with_ymd_and_hms(2024, 3, 1, 10, 5, 0).unwrap();
        assert_eq!(elapsed_since(activated, cleared), "5m");
    }

    #[test]
    fn test_elapsed_since_clock_skew() {
        let future = Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(elapsed_since(future, now), "0s");
    }
}
