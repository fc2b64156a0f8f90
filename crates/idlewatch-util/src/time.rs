//! Time helpers for idlewatch
//!
//! Scheduling never reads the wall clock; waits go through the injectable
//! clock in `idlewatch-host-api`. Wall-clock time is only used to stamp
//! cycle reports for logging.

use chrono::{DateTime, Local};
use std::time::Duration;

/// Current local wall-clock time
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Format a DateTime with full date and time
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a duration as a compact human-readable string
pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
