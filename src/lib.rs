//! # timegit - git-aware time tracking for Kimai
//!
//! Starts, stops and restarts Kimai timesheets for the activity that matches
//! the git repository and branch you are working on.
//!
//! ## Features
//!
//! - **Context detection**: project from the repository directory, activity from the branch
//! - **Activity resolution**: falls back to a project-level activity, creating it when missing
//! - **Timesheets**: start, stop, restart and list active timesheets
//! - **Projects**: list Kimai projects to build the repository mapping
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timegit::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
