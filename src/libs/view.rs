use super::formatter::FormattedTimesheet;
use crate::api::Project;
use anyhow::Result;
use prettytable::{row, Table};
use std::collections::BTreeMap;

pub struct View {}

impl View {
    pub fn projects(projects: &[Project]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME"]);
        for project in projects {
            table.add_row(row![project.id, project.name]);
        }
        table.printstd();

        Ok(())
    }

    /// Prints `{name: id}` ready to paste into the `projects` configuration entry.
    pub fn projects_json(projects: &[Project]) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(&Self::project_map(projects))?);

        Ok(())
    }

    /// Project name to id. Names shared by several projects get the id
    /// appended (`"Website (12)"`) so every project is listed.
    pub fn project_map(projects: &[Project]) -> BTreeMap<String, u32> {
        let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
        for project in projects {
            *occurrences.entry(project.name.as_str()).or_default() += 1;
        }

        projects
            .iter()
            .map(|project| match occurrences.get(project.name.as_str()) {
                Some(&count) if count > 1 => (format!("{} ({})", project.name, project.id), project.id),
                _ => (project.name.clone(), project.id),
            })
            .collect()
    }

    pub fn timesheets(timesheets: &[FormattedTimesheet]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "BEGIN", "ELAPSED", "DESCRIPTION"]);
        for timesheet in timesheets {
            table.add_row(row![timesheet.id, timesheet.begin, timesheet.elapsed, timesheet.description]);
        }
        table.printstd();

        Ok(())
    }
}
