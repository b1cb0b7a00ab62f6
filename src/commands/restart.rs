use super::stop::stop_all;
use crate::{libs::messages::Message, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct RestartArgs {
    /// Stop the active timesheets before restarting the last one
    #[arg(short, long)]
    stop: bool,
}

pub async fn cmd(restart_args: RestartArgs) -> Result<()> {
    let tracker = super::tracker()?;

    if restart_args.stop {
        stop_all(&tracker).await?;
    }

    let timesheet = tracker.restart().await?;
    msg_success!(Message::TimesheetRestarted(timesheet.id));

    Ok(())
}
