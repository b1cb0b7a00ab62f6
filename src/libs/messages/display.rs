//! Display implementation for timegit messages.
//!
//! Every user-facing string lives here, so commands and library code only ever
//! deal with [`Message`] variants and their parameters.
//!
//! ```rust
//! use timegit::libs::messages::Message;
//!
//! let message = Message::TimesheetStopped(41);
//! assert_eq!(message.to_string(), "Stopped timesheet 41");
//! ```

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TIMESHEET MESSAGES ===
            Message::TimesheetStarted { id, activity, project } => {
                format!("Started timesheet {} for activity '{}' in project '{}'", id, activity, project)
            }
            Message::TimesheetStopped(id) => format!("Stopped timesheet {}", id),
            Message::TimesheetRestarted(id) => format!("Restarted timesheet {}", id),
            Message::NoActiveTimesheets => "No active timesheets".to_string(),
            Message::ActiveTimesheetsHeader => "Active timesheets".to_string(),
            Message::TimesheetStopFailed(id) => format!("Failed to stop active timesheet {}", id),
            Message::TimesheetRestartFailed(id) => format!("Failed to restart timesheet {}", id),

            // === ACTIVITY MESSAGES ===
            Message::ActivityCreateFailed(project) => format!("Error creating the default project activity for {}", project),
            Message::ActivityFallbackToProject(project) => format!("No activity for the branch, using the '{}' project activity", project),
            Message::ActivityDefaultCreated(project) => format!("Created the default '{}' project activity", project),
            Message::UnmappedProject(project) => {
                format!("No project id mapped to repository '{}'. Add it to \"projects\" in the configuration", project)
            }

            // === PROJECT MESSAGES ===
            Message::ProjectsHeader => "Available projects".to_string(),
            Message::NoProjectsFound => "No projects found".to_string(),

            // === GIT MESSAGES ===
            Message::GitCommandFailed { command, output } => format!("'{}' failed: {}", command, output),
            Message::GitProjectNameMissing(path) => format!("Cannot derive a project name from '{}'", path),
            Message::GitContextDetected { project, term } => format!("Git context: project '{}', activity term '{}'", project, term),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigNotFound(example) => {
                format!("No Kimai configuration found. Run 'timegit init' or create it by hand.\n\nExample configuration:\n\n{}", example)
            }
            Message::ConfigParseError(error) => format!("Failed to parse configuration: {}", error),
            Message::ConfigMissingUrl => "No Kimai URL specified in the config file".to_string(),
            Message::ConfigMissingUsername => "No Kimai username specified in the config file".to_string(),
            Message::ConfigMissingToken => "No Kimai API token specified in the config file".to_string(),
            Message::ConfigMissingHourlyRate => "No hourly rate specified in the config file".to_string(),
            Message::ConfigMissingProjects => "No project id map specified in the config file".to_string(),
            Message::ConfigInvalidEnvValue { key, value } => format!("Invalid value '{}' in {}", value, key),
            Message::ConfigModuleKimai => "Kimai settings".to_string(),
            Message::ConfigModuleProjects => "Project mapping".to_string(),
            Message::ConfigRepositoryMapped { project, id } => format!("Repository '{}' mapped to project {}", project, id),
            Message::ConfigUnreadable(error) => format!("The existing configuration cannot be read: {}", error),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select settings to configure".to_string(),
            Message::PromptKimaiUrl => "Enter the Kimai API URL (including /api)".to_string(),
            Message::PromptKimaiUsername => "Enter your Kimai username".to_string(),
            Message::PromptKimaiToken => "Enter your Kimai API token".to_string(),
            Message::PromptHourlyRate => "Enter your hourly rate".to_string(),
            Message::PromptMapRepository(project) => format!("Map repository '{}' to a Kimai project?", project),
            Message::PromptProjectId(project) => format!("Enter the Kimai project id for '{}'", project),
            Message::PromptDiscardConfig => "Start from an empty configuration and overwrite the file?".to_string(),
        };

        write!(f, "{}", text)
    }
}
