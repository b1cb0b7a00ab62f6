#[derive(Debug, Clone)]
pub enum Message {
    // === TIMESHEET MESSAGES ===
    TimesheetStarted {
        id: u32,
        activity: String,
        project: String,
    },
    TimesheetStopped(u32),
    TimesheetRestarted(u32),
    NoActiveTimesheets,
    ActiveTimesheetsHeader,
    TimesheetStopFailed(u32), // timesheet id
    TimesheetRestartFailed(u32),

    // === ACTIVITY MESSAGES ===
    ActivityCreateFailed(String), // project name
    ActivityFallbackToProject(String),
    ActivityDefaultCreated(String),
    UnmappedProject(String),

    // === PROJECT MESSAGES ===
    ProjectsHeader,
    NoProjectsFound,

    // === GIT MESSAGES ===
    GitCommandFailed { command: String, output: String },
    GitProjectNameMissing(String), // toplevel path
    GitContextDetected { project: String, term: String },

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigNotFound(String), // example configuration
    ConfigParseError(String),
    ConfigMissingUrl,
    ConfigMissingUsername,
    ConfigMissingToken,
    ConfigMissingHourlyRate,
    ConfigMissingProjects,
    ConfigInvalidEnvValue { key: String, value: String },
    ConfigModuleKimai,
    ConfigModuleProjects,
    ConfigRepositoryMapped { project: String, id: u32 },
    ConfigUnreadable(String), // read or parse error

    // === PROMPTS ===
    PromptSelectModules,
    PromptKimaiUrl,
    PromptKimaiUsername,
    PromptKimaiToken,
    PromptHourlyRate,
    PromptMapRepository(String), // project name
    PromptProjectId(String),
    PromptDiscardConfig,
}
