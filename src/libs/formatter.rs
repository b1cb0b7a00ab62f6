//! Formatting helpers for timesheet display.
//!
//! Durations are shown as `HH:MM`; negative durations clamp to `00:00`.
//!
//! ```rust
//! use timegit::libs::formatter::format_duration;
//! use chrono::Duration;
//!
//! let duration = Duration::hours(2) + Duration::minutes(30);
//! assert_eq!(format_duration(&duration), "02:30");
//! ```

use crate::api::Timesheet;
use chrono::{DateTime, Duration, FixedOffset, Local};
use serde::{Deserialize, Serialize};

/// Timestamp format used by Kimai in responses, e.g. `2024-05-02T09:15:00+0200`.
const KIMAI_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedTimesheet {
    pub id: u32,
    pub begin: String,
    pub elapsed: String,
    pub description: String,
}

impl FormattedTimesheet {
    pub fn new(timesheet: &Timesheet, now: DateTime<Local>) -> Self {
        let begin = timesheet.begin.as_deref().and_then(parse_datetime);
        Self {
            id: timesheet.id,
            begin: begin
                .map(|begin| begin.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            elapsed: begin
                .map(|begin| format_duration(&(now.fixed_offset() - begin)))
                .unwrap_or_else(|| "--:--".to_string()),
            description: timesheet.description.clone().unwrap_or_default(),
        }
    }
}

pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;

    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}

/// Parses the timestamps Kimai returns, with or without a colon in the offset.
pub fn parse_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, KIMAI_DATETIME_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
}
