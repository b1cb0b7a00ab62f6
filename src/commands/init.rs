//! Configuration initialization command.
//!
//! Runs the interactive setup wizard. Inside a git repository the wizard also
//! offers to map that repository to a Kimai project.

use crate::{
    libs::{config::Config, git::GitContext, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Print an example configuration instead of running the wizard
    #[arg(short, long)]
    example: bool,
}

pub async fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.example {
        println!("{}", Config::example_json());
        return Ok(());
    }

    // Outside a repository there is simply nothing to map.
    let current_project = GitContext::detect(None).await.ok().map(|git| git.project);

    Config::init(current_project.as_deref())?.save()?;

    msg_success!(Message::ConfigSaved);
    Ok(())
}
