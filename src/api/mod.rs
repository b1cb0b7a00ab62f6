//! Timesheet service API.
//!
//! The orchestrator in [`crate::libs::tracker`] talks to the remote service only
//! through the [`TimesheetApi`] trait. [`kimai::Kimai`] is the HTTP
//! implementation; tests provide an in-memory one.
//!
//! ## Endpoints
//!
//! | Operation | Request |
//! |-----------|---------|
//! | find activities | `GET /activities?term=&project=` |
//! | create activity | `POST /activities` |
//! | start timesheet | `POST /timesheets` |
//! | active timesheets | `GET /timesheets/active` |
//! | stop timesheet | `PATCH /timesheets/{id}/stop` |
//! | recent timesheets | `GET /timesheets/recent?size=` |
//! | restart timesheet | `PATCH /timesheets/{id}/restart` |
//! | projects | `GET /projects` |

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod kimai;

pub use kimai::{Kimai, KimaiConfig};

/// A remote activity. Only the fields timegit reads are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

/// A remote project as listed by `GET /projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

/// A timesheet record.
///
/// The service embeds project and activity either as ids or as objects
/// depending on the endpoint, so they are not deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timesheet {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub begin: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Timesheet {
    pub fn is_valid(&self) -> bool {
        self.id > 0
    }
}

/// Body of `POST /activities`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewActivity {
    pub name: String,
    pub project: u32,
    pub visible: bool,
    pub billable: bool,
}

impl NewActivity {
    /// A visible, billable activity named after the project.
    pub fn project_default(project_name: &str, project_id: u32) -> Self {
        Self {
            name: project_name.to_string(),
            project: project_id,
            visible: true,
            billable: true,
        }
    }
}

/// Body of `POST /timesheets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTimesheet {
    pub begin: String,
    pub project: u32,
    pub activity: u32,
    #[serde(rename = "hourlyRate")]
    pub hourly_rate: u32,
}

/// Failures reported by the timesheet service or by the shape of its answers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimesheetError {
    #[error("[term: {term}, project: {project_id}] activity not found")]
    NoActivityFound { term: String, project_id: u32 },

    #[error("[term: {term}, project: {project_id}] {count} activities match and none is named exactly '{term}'")]
    MultipleActivities { term: String, project_id: u32, count: usize },

    #[error("empty term or invalid project id")]
    InvalidLookup,

    #[error("no {0}: the service returned no valid id")]
    MissingId(&'static str),

    #[error("no recent timesheet to restart")]
    NoRecentTimesheet,

    #[error("the service rejected the credentials, check the username and API token")]
    Unauthorized,

    #[error("request failed ({status}): {message}")]
    Api { status: u16, message: String },
}

/// The subset of the timesheet REST API timegit needs.
#[allow(async_fn_in_trait)]
pub trait TimesheetApi {
    /// Searches activities of a project whose name contains `term`.
    async fn find_activities(&self, term: &str, project_id: u32) -> Result<Vec<Activity>>;

    async fn create_activity(&self, activity: &NewActivity) -> Result<Activity>;

    async fn start_timesheet(&self, timesheet: &NewTimesheet) -> Result<Timesheet>;

    /// Timesheets of the current user that have no end yet.
    async fn active_timesheets(&self) -> Result<Vec<Timesheet>>;

    async fn stop_timesheet(&self, id: u32) -> Result<Timesheet>;

    /// The `size` most recent timesheets of the current user, newest first.
    async fn recent_timesheets(&self, size: u32) -> Result<Vec<Timesheet>>;

    /// Starts a new timesheet copying project and activity of `id`.
    async fn restart_timesheet(&self, id: u32) -> Result<Timesheet>;

    async fn projects(&self) -> Result<Vec<Project>>;
}
