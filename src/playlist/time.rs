use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, Utc};

/// Past this point a started event is reported as finished.
const FINISHED_AFTER_SECS: i64 = 3 * 60 * 60;

/// Parse a feed timestamp. RFC 3339 first; offset-less forms are read as UTC.
/// Years outside 0..=9999 are rejected so the display stays `MM/DD/YYYY`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let parsed = match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(_) => ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc()),
    };
    parsed.filter(|dt| (0..=9999).contains(&dt.year()))
}

/// Fixed-offset Eastern approximation: EDT for March through November, EST
/// otherwise. Deliberately not calendar-accurate around the switchover days.
fn eastern_offset_hours(utc: &DateTime<Utc>) -> i64 {
    if (3..=11).contains(&utc.month()) { -4 } else { -5 }
}

/// "6:00 PM ET - 06/15/2025", or empty when the timestamp is missing or bad.
pub fn localized_time(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .and_then(|utc| utc.checked_add_signed(TimeDelta::hours(eastern_offset_hours(&utc))))
        .map(|eastern| eastern.format("%-I:%M %p ET - %m/%d/%Y").to_string())
        .unwrap_or_default()
}

/// "Finished", "Started", "In 2h 5m" or "In 5m" relative to `now`; empty when
/// the timestamp is missing or bad.
pub fn status_label(raw: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(start) = raw.and_then(parse_timestamp) else {
        return String::new();
    };

    let delta_ms = (start - now).num_milliseconds();
    if delta_ms < -FINISHED_AFTER_SECS * 1000 {
        return "Finished".to_owned();
    }
    if delta_ms < 0 {
        return "Started".to_owned();
    }

    let secs = delta_ms / 1000;
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("In {hours}h {minutes}m")
    } else {
        format!("In {minutes}m")
    }
}
