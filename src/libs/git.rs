//! Git context detection.
//!
//! The project name is the directory name of the repository toplevel and the
//! branch is the currently checked-out branch. [`ActivityContext`] turns both
//! into the term used to look up the remote activity.

use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::process::Command;

/// Branches that never get an activity of their own.
pub const DEFAULT_BRANCHES: [&str; 2] = ["master", "develop"];

/// Raw repository information read from git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitContext {
    pub project: String,
    /// Empty on a detached HEAD.
    pub branch: String,
}

impl GitContext {
    /// Reads project and branch of the repository containing `dir`
    /// (the current directory when `None`).
    pub async fn detect(dir: Option<&Path>) -> Result<Self> {
        let toplevel = run_git(dir, &["rev-parse", "--show-toplevel"]).await?;
        let project =
            project_name_from_toplevel(&toplevel).ok_or_else(|| msg_error_anyhow!(Message::GitProjectNameMissing(toplevel.clone())))?;
        let branch = run_git(dir, &["branch", "--show-current"]).await?;

        Ok(Self { project, branch })
    }
}

/// The context key: which project the work belongs to and which activity
/// name to search for inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityContext {
    pub project: String,
    pub term: String,
}

impl ActivityContext {
    /// Uses the branch as term, or the project name on default branches and
    /// detached HEADs.
    pub fn new<S: AsRef<str>>(project: &str, branch: &str, default_branches: &[S]) -> Self {
        let branch = branch.trim();
        let on_default_branch = branch.is_empty() || default_branches.iter().any(|default| default.as_ref() == branch);
        let term = if on_default_branch { project } else { branch };

        Self {
            project: project.to_string(),
            term: term.to_string(),
        }
    }

    pub fn from_git<S: AsRef<str>>(git: &GitContext, default_branches: &[S]) -> Self {
        Self::new(&git.project, &git.branch, default_branches)
    }

    /// `true` when the term already is the project-level default.
    pub fn is_project_level(&self) -> bool {
        self.term == self.project
    }
}

/// Last path component of a `git rev-parse --show-toplevel` output.
pub fn project_name_from_toplevel(toplevel: &str) -> Option<String> {
    Path::new(toplevel.trim())
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

async fn run_git(dir: Option<&Path>, args: &[&str]) -> Result<String> {
    let mut command = Command::new("git");
    if let Some(dir) = dir {
        command.arg("-C").arg(dir);
    }
    command.args(args);

    let rendered = format!("git {}", args.join(" "));
    let output = command.output().await.with_context(|| format!("failed to run '{}'", rendered))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(msg_error_anyhow!(Message::GitCommandFailed {
            command: rendered,
            output: stderr,
        }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
