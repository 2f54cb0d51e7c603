//! Compact relative-time labels ("now", "5m", "3h", "2d", "4w").

use chrono::{DateTime, NaiveDateTime, Utc};

/// Format the age of a server timestamp relative to `now`.
///
/// Accepts MySQL `YYYY-MM-DD HH:MM:SS` (taken as UTC) and RFC 3339.
/// Anything else is returned unchanged.
pub fn relative_label(created_at: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse(created_at) else {
        return created_at.to_string();
    };
    let secs = (now - then).num_seconds().max(0);
    match secs {
        0..60 => "now".into(),
        60..3_600 => format!("{}m", secs / 60),
        3_600..86_400 => format!("{}h", secs / 3_600),
        86_400..604_800 => format!("{}d", secs / 86_400),
        _ => format!("{}w", secs / 604_800),
    }
}

fn parse(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
