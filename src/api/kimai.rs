//! Kimai REST client.
//!
//! Every request authenticates with the `X-AUTH-USER` / `X-AUTH-TOKEN` header
//! pair. The configured URL is the API root, e.g. `https://kimai.example.com/api`.
//!
//! ```rust,no_run
//! use timegit::api::{Kimai, KimaiConfig, TimesheetApi};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = KimaiConfig {
//!     api_url: "https://kimai.example.com/api".to_string(),
//!     username: "jane".to_string(),
//!     api_token: "secret".to_string(),
//!     hourly_rate: 100,
//! };
//! let kimai = Kimai::new(&config)?;
//! for timesheet in kimai.active_timesheets().await? {
//!     println!("{}", timesheet.id);
//! }
//! # Ok(())
//! # }
//! ```

use super::{Activity, NewActivity, NewTimesheet, Project, Timesheet, TimesheetApi, TimesheetError};
use crate::libs::config::ConfigModule;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client, RequestBuilder, StatusCode,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const AUTH_USER_HEADER: &str = "x-auth-user";
const AUTH_TOKEN_HEADER: &str = "x-auth-token";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const ACTIVITIES_URL: &str = "activities";
const TIMESHEETS_URL: &str = "timesheets";
const ACTIVE_URL: &str = "timesheets/active";
const RECENT_URL: &str = "timesheets/recent";
const PROJECTS_URL: &str = "projects";

/// Error body returned by Kimai on failed requests.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug)]
pub struct Kimai {
    client: Client,
    base_url: String,
}

impl Kimai {
    /// Builds a client with the authentication headers preset.
    ///
    /// # Errors
    ///
    /// Fails when the username or token cannot be sent as a header value, or when
    /// the TLS backend cannot be initialized.
    pub fn new(config: &KimaiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_USER_HEADER, HeaderValue::from_str(&config.username)?);
        let mut token = HeaderValue::from_str(&config.api_token)?;
        token.set_sensitive(true);
        headers.insert(AUTH_TOKEN_HEADER, token);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends the request and decodes a JSON answer, mapping non-2xx statuses
    /// to [`TimesheetError`].
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(url = %response.url(), status = status.as_u16(), "kimai response");

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(TimesheetError::Unauthorized.into());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body).map(|error| error.message).unwrap_or(body);
            return Err(TimesheetError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(response.json::<T>().await?)
    }
}

impl TimesheetApi for Kimai {
    async fn find_activities(&self, term: &str, project_id: u32) -> Result<Vec<Activity>> {
        let url = self.url(ACTIVITIES_URL);
        tracing::debug!(%url, term, project_id, "searching activities");
        let request = self.client.get(url).query(&[("term", term.to_string()), ("project", project_id.to_string())]);
        self.send(request).await
    }

    async fn create_activity(&self, activity: &NewActivity) -> Result<Activity> {
        let url = self.url(ACTIVITIES_URL);
        tracing::debug!(%url, name = %activity.name, project = activity.project, "creating activity");
        self.send(self.client.post(url).json(activity)).await
    }

    async fn start_timesheet(&self, timesheet: &NewTimesheet) -> Result<Timesheet> {
        let url = self.url(TIMESHEETS_URL);
        tracing::debug!(%url, project = timesheet.project, activity = timesheet.activity, "starting timesheet");
        self.send(self.client.post(url).json(timesheet)).await
    }

    async fn active_timesheets(&self) -> Result<Vec<Timesheet>> {
        self.send(self.client.get(self.url(ACTIVE_URL))).await
    }

    async fn stop_timesheet(&self, id: u32) -> Result<Timesheet> {
        let url = self.url(&format!("{}/{}/stop", TIMESHEETS_URL, id));
        tracing::debug!(%url, "stopping timesheet");
        self.send(self.client.patch(url)).await
    }

    async fn recent_timesheets(&self, size: u32) -> Result<Vec<Timesheet>> {
        let request = self.client.get(self.url(RECENT_URL)).query(&[("size", size)]);
        self.send(request).await
    }

    async fn restart_timesheet(&self, id: u32) -> Result<Timesheet> {
        let url = self.url(&format!("{}/{}/restart", TIMESHEETS_URL, id));
        tracing::debug!(%url, "restarting timesheet");
        self.send(self.client.patch(url)).await
    }

    async fn projects(&self) -> Result<Vec<Project>> {
        self.send(self.client.get(self.url(PROJECTS_URL))).await
    }
}

/// Connection settings for a Kimai instance.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct KimaiConfig {
    /// API root, e.g. `https://kimai.example.com/api`.
    pub api_url: String,
    pub username: String,
    /// API token (Kimai calls it "API password" in older versions).
    pub api_token: String,
    /// Sent as `hourlyRate` with every started timesheet.
    pub hourly_rate: u32,
}

impl KimaiConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "kimai".to_string(),
            name: "Kimai".to_string(),
        }
    }

    /// Prompts for every Kimai setting, offering the existing values as defaults.
    pub fn init(config: &Option<KimaiConfig>) -> Result<Self> {
        let config = config.clone().unwrap_or_default();

        msg_print!(Message::ConfigModuleKimai);

        Ok(Self {
            api_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptKimaiUrl.to_string())
                .default(config.api_url)
                .interact_text()?,
            username: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptKimaiUsername.to_string())
                .default(config.username)
                .interact_text()?,
            api_token: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptKimaiToken.to_string())
                .default(config.api_token)
                .interact_text()?,
            hourly_rate: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptHourlyRate.to_string())
                .default(config.hourly_rate)
                .interact_text()?,
        })
    }
}
