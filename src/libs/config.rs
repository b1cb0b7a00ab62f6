//! Configuration management for timegit.
//!
//! The configuration is a single JSON file in the per-user configuration
//! directory (see [`DataStorage`]):
//!
//! ```json
//! {
//!   "kimai": {
//!     "api_url": "https://kimai.example.com/api",
//!     "username": "username",
//!     "api_token": "token",
//!     "hourly_rate": 100
//!   },
//!   "projects": { "webshop": 1, "backoffice": 2 },
//!   "default_branches": ["master", "develop"]
//! }
//! ```
//!
//! `projects` maps repository directory names to Kimai project ids.
//! `default_branches` lists the branches that track time on the project-level
//! activity instead of an activity named after the branch.
//!
//! Credentials can be kept out of the file: `TIMEGIT_API_URL`,
//! `TIMEGIT_USERNAME`, `TIMEGIT_API_TOKEN` and `TIMEGIT_HOURLY_RATE` override
//! the corresponding `kimai` entries, and are also read from a `.env` file.

use super::data_storage::DataStorage;
use super::git::DEFAULT_BRANCHES;
use crate::api::kimai::KimaiConfig;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_error_anyhow, msg_print, msg_warning};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs::{self, File};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_API_URL: &str = "TIMEGIT_API_URL";
pub const ENV_USERNAME: &str = "TIMEGIT_USERNAME";
pub const ENV_API_TOKEN: &str = "TIMEGIT_API_TOKEN";
pub const ENV_HOURLY_RATE: &str = "TIMEGIT_HOURLY_RATE";

/// A section of the configuration offered by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kimai: Option<KimaiConfig>,

    /// Repository directory name to Kimai project id.
    #[serde(default)]
    pub projects: BTreeMap<String, u32>,

    #[serde(default = "default_branches")]
    pub default_branches: Vec<String>,
}

fn default_branches() -> Vec<String> {
    DEFAULT_BRANCHES.iter().map(|branch| branch.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            kimai: None,
            projects: BTreeMap::new(),
            default_branches: default_branches(),
        }
    }
}

impl Config {
    /// Reads the configuration file, falling back to the default configuration
    /// when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        serde_json::from_str(&config_str).map_err(|error| msg_error_anyhow!(Message::ConfigParseError(error.to_string())))
    }

    /// Reads the configuration for editing.
    ///
    /// An unreadable file is reported and `discard` decides whether to start
    /// over from the default configuration. Declining returns the read error
    /// and leaves the file alone.
    pub fn read_or_recover<F>(path: &Path, discard: F) -> Result<Config>
    where
        F: FnOnce() -> Result<bool>,
    {
        match Self::read_from(path) {
            Ok(config) => Ok(config),
            Err(error) => {
                msg_warning!(Message::ConfigUnreadable(format!("{:#}", error)));
                if discard()? {
                    Ok(Config::default())
                } else {
                    Err(error)
                }
            }
        }
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Reads the configuration, applies environment overrides and validates it.
    ///
    /// This is what every command talking to Kimai starts with.
    pub fn load() -> Result<Config> {
        let mut config = Self::read()?;
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides Kimai settings with values returned by `lookup`.
    ///
    /// `lookup` receives the environment variable names (`TIMEGIT_*`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(ENV_API_URL);
        let username = lookup(ENV_USERNAME);
        let api_token = lookup(ENV_API_TOKEN);
        let hourly_rate = lookup(ENV_HOURLY_RATE);

        if api_url.is_none() && username.is_none() && api_token.is_none() && hourly_rate.is_none() {
            return Ok(());
        }

        let kimai = self.kimai.get_or_insert_with(KimaiConfig::default);
        if let Some(api_url) = api_url {
            kimai.api_url = api_url;
        }
        if let Some(username) = username {
            kimai.username = username;
        }
        if let Some(api_token) = api_token {
            kimai.api_token = api_token;
        }
        if let Some(value) = hourly_rate {
            kimai.hourly_rate = value.trim().parse().map_err(|_| {
                msg_error_anyhow!(Message::ConfigInvalidEnvValue {
                    key: ENV_HOURLY_RATE.to_string(),
                    value: value.clone(),
                })
            })?;
        }

        Ok(())
    }

    /// Checks that everything needed to track time is present.
    ///
    /// A missing `kimai` section reports the example configuration.
    pub fn validate(&self) -> Result<()> {
        let kimai = self.kimai()?;

        if kimai.api_url.trim().is_empty() {
            msg_bail_anyhow!(Message::ConfigMissingUrl);
        }
        if kimai.username.trim().is_empty() {
            msg_bail_anyhow!(Message::ConfigMissingUsername);
        }
        if kimai.api_token.trim().is_empty() {
            msg_bail_anyhow!(Message::ConfigMissingToken);
        }
        if kimai.hourly_rate == 0 {
            msg_bail_anyhow!(Message::ConfigMissingHourlyRate);
        }
        if self.projects.is_empty() {
            msg_bail_anyhow!(Message::ConfigMissingProjects);
        }

        Ok(())
    }

    pub fn kimai(&self) -> Result<&KimaiConfig> {
        self.kimai
            .as_ref()
            .ok_or_else(|| msg_error_anyhow!(Message::ConfigNotFound(Self::example_json())))
    }

    /// Kimai project id mapped to a repository name.
    pub fn project_id(&self, project: &str) -> Result<u32> {
        self.projects
            .get(project)
            .copied()
            .ok_or_else(|| msg_error_anyhow!(Message::UnmappedProject(project.to_string())))
    }

    /// A complete configuration with placeholder values.
    pub fn example() -> Config {
        Config {
            kimai: Some(KimaiConfig {
                api_url: "https://timetracking.domain.com/api".to_string(),
                username: "username".to_string(),
                api_token: "token".to_string(),
                hourly_rate: 100,
            }),
            projects: BTreeMap::from([("project1".to_string(), 1), ("project2".to_string(), 2)]),
            default_branches: default_branches(),
        }
    }

    pub fn example_json() -> String {
        serde_json::to_string_pretty(&Self::example()).unwrap_or_default()
    }

    /// Runs the interactive setup wizard.
    ///
    /// `current_project` is the repository the wizard was started in, if any;
    /// the user is offered to map it to a Kimai project id.
    pub fn init(current_project: Option<&str>) -> Result<Self> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let mut config = Self::read_or_recover(&config_file_path, || {
            Ok(Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptDiscardConfig.to_string())
                .default(false)
                .interact()?)
        })?;

        let modules = vec![
            KimaiConfig::module(),
            ConfigModule {
                key: "projects".to_string(),
                name: "Projects".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .defaults(&[config.kimai.is_none(), config.projects.is_empty()])
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "kimai" => config.kimai = Some(KimaiConfig::init(&config.kimai)?),
                "projects" => {
                    msg_print!(Message::ConfigModuleProjects);
                    let Some(project) = current_project else {
                        continue;
                    };
                    let map_it = Confirm::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptMapRepository(project.to_string()).to_string())
                        .default(true)
                        .interact()?;
                    if !map_it {
                        continue;
                    }
                    let id: u32 = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptProjectId(project.to_string()).to_string())
                        .default(config.projects.get(project).copied().unwrap_or_default())
                        .interact_text()?;
                    config.projects.insert(project.to_string(), id);
                    msg_print!(Message::ConfigRepositoryMapped {
                        project: project.to_string(),
                        id,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
