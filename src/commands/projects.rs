use crate::{
    libs::{messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ProjectsArgs {
    /// Print a `{"name": id}` object to paste into the configuration
    #[arg(long)]
    json: bool,
}

pub async fn cmd(projects_args: ProjectsArgs) -> Result<()> {
    let tracker = super::tracker()?;
    let projects = tracker.projects().await?;

    if projects_args.json {
        return View::projects_json(&projects);
    }
    if projects.is_empty() {
        msg_info!(Message::NoProjectsFound);
        return Ok(());
    }

    msg_print!(Message::ProjectsHeader, true);
    View::projects(&projects)
}
