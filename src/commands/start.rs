use super::stop::stop_all;
use crate::{
    libs::{
        git::{ActivityContext, GitContext},
        messages::Message,
        tracker::Resolution,
    },
    msg_debug, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Stop the active timesheets before starting the new one
    #[arg(short, long)]
    stop: bool,
    /// Repository to read the project and branch from (defaults to the current directory)
    #[arg(short, long)]
    dir: Option<PathBuf>,
}

pub async fn cmd(start_args: StartArgs) -> Result<()> {
    let tracker = super::tracker()?;

    // Read git before stopping anything so a bad directory leaves the running timesheet alone.
    let git = GitContext::detect(start_args.dir.as_deref()).await?;
    let context = ActivityContext::from_git(&git, tracker.config().default_branches.as_slice());
    msg_debug!(Message::GitContextDetected {
        project: context.project.clone(),
        term: context.term.clone(),
    });

    if start_args.stop {
        stop_all(&tracker).await?;
    }

    let outcome = tracker.start(&context).await?;
    match outcome.resolution {
        Resolution::Branch => {}
        Resolution::ProjectDefault if !context.is_project_level() => {
            msg_info!(Message::ActivityFallbackToProject(context.project.clone()))
        }
        Resolution::ProjectDefault => {}
        Resolution::CreatedDefault => msg_info!(Message::ActivityDefaultCreated(context.project.clone())),
    }
    msg_success!(Message::TimesheetStarted {
        id: outcome.timesheet.id,
        activity: outcome.activity.name,
        project: context.project,
    });

    Ok(())
}
