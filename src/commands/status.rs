use crate::{
    libs::{formatter::FormattedTimesheet, messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::Local;

pub async fn cmd() -> Result<()> {
    let tracker = super::tracker()?;
    let active = tracker.active().await?;

    if active.is_empty() {
        msg_info!(Message::NoActiveTimesheets);
        return Ok(());
    }

    let now = Local::now();
    let rows: Vec<FormattedTimesheet> = active.iter().map(|timesheet| FormattedTimesheet::new(timesheet, now)).collect();
    msg_print!(Message::ActiveTimesheetsHeader, true);
    View::timesheets(&rows)
}
