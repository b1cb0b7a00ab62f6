//! Command-line interface.
//!
//! Each subcommand lives in its own module with an `Args` struct and an async
//! `cmd` entry point. Commands that talk to Kimai build their [`Tracker`] with
//! [`tracker`], which loads and validates the configuration first.

pub mod init;
pub mod projects;
pub mod restart;
pub mod start;
pub mod status;
pub mod stop;

use crate::api::Kimai;
use crate::libs::{config::Config, tracker::Tracker};
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Start a timesheet for the current git project and branch")]
    Start(start::StartArgs),
    #[command(about = "Stop all active timesheets")]
    Stop,
    #[command(about = "Restart the most recent timesheet")]
    Restart(restart::RestartArgs),
    #[command(about = "Show active timesheets")]
    Status,
    #[command(about = "List the projects available in Kimai")]
    Projects(projects::ProjectsArgs),
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Start(args) => start::cmd(args).await,
            Commands::Stop => stop::cmd().await,
            Commands::Restart(args) => restart::cmd(args).await,
            Commands::Status => status::cmd().await,
            Commands::Projects(args) => projects::cmd(args).await,
            Commands::Init(args) => init::cmd(args).await,
        }
    }
}

/// Loads the configuration and connects it to a Kimai client.
pub fn tracker() -> Result<Tracker<Kimai>> {
    let config = Config::load()?;
    let kimai = Kimai::new(config.kimai()?)?;
    Ok(Tracker::new(kimai, config))
}
