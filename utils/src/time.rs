//! Time formatting helpers.

use upgov_types::Timestamp;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Time left until `end` (inclusive deadline), or `"elapsed"`.
pub fn format_remaining(end: Timestamp, now: Timestamp) -> String {
    if end.has_passed(now) {
        "elapsed".to_string()
    } else {
        format!("{} left", format_duration(end.as_secs() - now.as_secs()))
    }
}
