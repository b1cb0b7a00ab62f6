//! Time-entry orchestration.
//!
//! [`Tracker`] resolves a git [`ActivityContext`] to a remote activity and
//! drives the start / stop / restart calls against a [`TimesheetApi`].
//!
//! ## Activity resolution
//!
//! ```text
//! term = branch ──lookup──▶ found ─────────────────────────────▶ Branch
//!                  │
//!                  └ not found ─▶ term = project ──lookup──▶ found ─▶ ProjectDefault
//!                                                   │
//!                                                   └ not found ─▶ create ─▶ CreatedDefault
//! ```
//!
//! Only a "not found" answer triggers the fallback. Ambiguous lookups, HTTP
//! failures and unmapped projects are returned as they are.

use crate::api::{Activity, NewActivity, NewTimesheet, Project, Timesheet, TimesheetApi, TimesheetError};
use crate::libs::config::Config;
use crate::libs::git::ActivityContext;
use crate::libs::messages::Message;
use crate::msg_debug;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};

/// Format of the `begin` field sent when starting a timesheet.
pub const BEGIN_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// How the activity for a context was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// An activity matching the branch term exists.
    Branch,
    /// The branch had no activity; the project-level one was used.
    ProjectDefault,
    /// No project-level activity existed; it was created.
    CreatedDefault,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    pub timesheet: Timesheet,
    pub activity: Activity,
    pub project_id: u32,
    pub resolution: Resolution,
}

pub fn begin_timestamp(now: NaiveDateTime) -> String {
    now.format(BEGIN_FORMAT).to_string()
}

fn is_not_found(error: &anyhow::Error) -> bool {
    matches!(error.downcast_ref::<TimesheetError>(), Some(TimesheetError::NoActivityFound { .. }))
}

#[derive(Debug)]
pub struct Tracker<A: TimesheetApi> {
    api: A,
    config: Config,
}

impl<A: TimesheetApi> Tracker<A> {
    pub fn new(api: A, config: Config) -> Self {
        Self { api, config }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Looks up the single activity named by `term` in a project.
    ///
    /// The service matches `term` as a substring, so when several activities
    /// come back the one named exactly `term` wins.
    ///
    /// # Errors
    ///
    /// - [`TimesheetError::InvalidLookup`] for an empty term or project id 0
    /// - [`TimesheetError::NoActivityFound`] when nothing (valid) matches
    /// - [`TimesheetError::MultipleActivities`] when the match is ambiguous
    pub async fn fetch_activity(&self, term: &str, project_id: u32) -> Result<Activity> {
        if term.is_empty() || project_id == 0 {
            return Err(TimesheetError::InvalidLookup.into());
        }

        let not_found = || TimesheetError::NoActivityFound {
            term: term.to_string(),
            project_id,
        };

        let mut activities = self.api.find_activities(term, project_id).await?;
        let activity = match activities.len() {
            0 => return Err(not_found().into()),
            1 => activities.remove(0),
            count => {
                let mut exact = activities.into_iter().filter(|activity| activity.name == term);
                match (exact.next(), exact.next()) {
                    (Some(activity), None) => activity,
                    _ => {
                        return Err(TimesheetError::MultipleActivities {
                            term: term.to_string(),
                            project_id,
                            count,
                        }
                        .into())
                    }
                }
            }
        };

        if activity.id == 0 {
            return Err(not_found().into());
        }

        Ok(activity)
    }

    /// Creates the project-level default activity.
    pub async fn create_default_activity(&self, project: &str, project_id: u32) -> Result<Activity> {
        let activity = self
            .api
            .create_activity(&NewActivity::project_default(project, project_id))
            .await
            .with_context(|| Message::ActivityCreateFailed(project.to_string()))?;

        if activity.id == 0 {
            return Err(TimesheetError::MissingId("activity created")).with_context(|| Message::ActivityCreateFailed(project.to_string()));
        }

        Ok(activity)
    }

    /// Maps a context to a remote activity, falling back to the project-level
    /// default and creating it when needed.
    pub async fn resolve_activity(&self, context: &ActivityContext) -> Result<(Activity, Resolution)> {
        let project_id = self.config.project_id(&context.project)?;

        let lookup_error = match self.fetch_activity(&context.term, project_id).await {
            Ok(activity) => {
                let resolution = if context.is_project_level() {
                    Resolution::ProjectDefault
                } else {
                    Resolution::Branch
                };
                return Ok((activity, resolution));
            }
            Err(error) if is_not_found(&error) => error,
            Err(error) => return Err(error),
        };

        if !context.is_project_level() {
            msg_debug!(Message::ActivityFallbackToProject(context.project.clone()));
            match self.fetch_activity(&context.project, project_id).await {
                Ok(activity) => return Ok((activity, Resolution::ProjectDefault)),
                Err(error) if is_not_found(&error) => {}
                Err(error) => return Err(error.context(lookup_error.to_string())),
            }
        }

        let activity = self
            .create_default_activity(&context.project, project_id)
            .await
            .map_err(|error| error.context(lookup_error.to_string()))?;
        msg_debug!(Message::ActivityDefaultCreated(context.project.clone()));

        Ok((activity, Resolution::CreatedDefault))
    }

    /// Starts a timesheet for the activity matching `context`, beginning now.
    pub async fn start(&self, context: &ActivityContext) -> Result<StartOutcome> {
        self.start_at(context, Local::now().naive_local()).await
    }

    pub async fn start_at(&self, context: &ActivityContext, begin: NaiveDateTime) -> Result<StartOutcome> {
        let kimai = self.config.kimai()?;
        let (activity, resolution) = self.resolve_activity(context).await?;
        let project_id = self.config.project_id(&context.project)?;

        let timesheet = self
            .api
            .start_timesheet(&NewTimesheet {
                begin: begin_timestamp(begin),
                project: project_id,
                activity: activity.id,
                hourly_rate: kimai.hourly_rate,
            })
            .await?;

        if !timesheet.is_valid() {
            return Err(TimesheetError::MissingId("timesheet started").into());
        }

        Ok(StartOutcome {
            timesheet,
            activity,
            project_id,
            resolution,
        })
    }

    /// Active timesheets with a valid id.
    pub async fn active(&self) -> Result<Vec<Timesheet>> {
        let timesheets = self.api.active_timesheets().await?;
        Ok(timesheets.into_iter().filter(Timesheet::is_valid).collect())
    }

    /// Stops every active timesheet, in the order the service lists them.
    ///
    /// Returns the stopped timesheets; an empty list means nothing was running.
    pub async fn stop(&self) -> Result<Vec<Timesheet>> {
        let mut stopped = Vec::new();
        for active in self.active().await? {
            let timesheet = self
                .api
                .stop_timesheet(active.id)
                .await
                .with_context(|| Message::TimesheetStopFailed(active.id))?;
            if !timesheet.is_valid() {
                return Err(TimesheetError::MissingId("timesheet stopped")).with_context(|| Message::TimesheetStopFailed(active.id));
            }
            stopped.push(timesheet);
        }
        Ok(stopped)
    }

    /// Restarts the most recent timesheet.
    pub async fn restart(&self) -> Result<Timesheet> {
        let last = self
            .api
            .recent_timesheets(1)
            .await?
            .into_iter()
            .find(Timesheet::is_valid)
            .ok_or(TimesheetError::NoRecentTimesheet)?;

        let timesheet = self
            .api
            .restart_timesheet(last.id)
            .await
            .with_context(|| Message::TimesheetRestartFailed(last.id))?;
        if !timesheet.is_valid() {
            return Err(TimesheetError::MissingId("timesheet restarted").into());
        }

        Ok(timesheet)
    }

    pub async fn projects(&self) -> Result<Vec<Project>> {
        self.api.projects().await
    }
}
