use crate::{
    api::TimesheetApi,
    libs::{messages::Message, tracker::Tracker},
    msg_info, msg_success,
};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let tracker = super::tracker()?;
    stop_all(&tracker).await
}

/// Stops every active timesheet and reports each one.
pub async fn stop_all<A: TimesheetApi>(tracker: &Tracker<A>) -> Result<()> {
    let stopped = tracker.stop().await?;
    if stopped.is_empty() {
        msg_info!(Message::NoActiveTimesheets);
    }
    for timesheet in stopped {
        msg_success!(Message::TimesheetStopped(timesheet.id));
    }

    Ok(())
}
