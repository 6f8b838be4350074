//! `wslip list` command

use super::Files;
use anyhow::{Context, Result};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use wslip_core::{Allocation, Assignment, Reconciler};

#[derive(Tabled)]
struct AssignmentRow {
    #[tabled(rename = "INSTANCE")]
    instance: String,
    #[tabled(rename = "MODE")]
    mode: String,
    #[tabled(rename = "ADDRESS/OFFSET")]
    allocation: String,
    #[tabled(rename = "HOSTNAME")]
    hostname: String,
    #[tabled(rename = "HOSTS ENTRY")]
    hosts_entry: String,
}

impl From<&Assignment> for AssignmentRow {
    fn from(assignment: &Assignment) -> Self {
        let mode = match assignment.allocation {
            Allocation::Static(_) => "static",
            Allocation::Dynamic(_) => "dynamic",
        };
        let hosts_entry = match (assignment.allocation, assignment.hosts_address) {
            (Allocation::Static(expected), Some(bound)) if bound == expected => bound.to_string().green().to_string(),
            (_, Some(bound)) => bound.to_string().yellow().to_string(),
            (Allocation::Static(_), None) => "missing".red().to_string(),
            (Allocation::Dynamic(_), None) => "-".to_string(),
        };
        Self {
            instance: assignment.instance.clone(),
            mode: mode.to_string(),
            allocation: assignment.allocation.to_string(),
            hostname: assignment.hostname.clone().unwrap_or_else(|| "-".to_string()),
            hosts_entry,
        }
    }
}

/// List every recorded assignment
pub fn list(files: &Files, json: bool) -> Result<()> {
    let assignments = load(files)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&assignments)?);
        return Ok(());
    }

    if assignments.is_empty() {
        println!("No instances assigned");
        return Ok(());
    }

    println!("{}", render(&assignments));
    Ok(())
}

pub(crate) fn load(files: &Files) -> Result<Vec<Assignment>> {
    let mut config = files.load_config()?;
    let mut hosts = files.load_hosts()?;
    Reconciler::new(&mut config, &mut hosts).assignments().context("Failed to read assignments")
}

fn render(assignments: &[Assignment]) -> String {
    let rows: Vec<AssignmentRow> = assignments.iter().map(AssignmentRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{files, NETWORK};

    #[test]
    fn test_list_static_and_dynamic() {
        let config = format!("{}\n[static_ips]\nUbuntu = 172.16.0.2\n\n[ip_offsets]\nAlpine = 1\n", NETWORK);
        let (_dir, files) = files(&config, "172.16.0.2 ubuntu\n");

        let assignments = load(&files).unwrap();
        assert_eq!(assignments.len(), 2);

        colored::control::set_override(false);
        let table = render(&assignments);
        assert!(table.contains("INSTANCE"));
        assert!(table.contains("Ubuntu"));
        assert!(table.contains("172.16.0.2"));
        assert!(table.contains("dynamic"));
    }

    #[test]
    fn test_json_shape() {
        let config = format!("{}\n[static_ips]\nUbuntu = 172.16.0.2\n", NETWORK);
        let (_dir, files) = files(&config, "");

        let value = serde_json::to_value(load(&files).unwrap()).unwrap();
        assert_eq!(value[0]["instance"], "Ubuntu");
        assert_eq!(value[0]["allocation"]["mode"], "static");
        assert_eq!(value[0]["allocation"]["value"], "172.16.0.2");
        assert_eq!(value[0]["hostname"], "ubuntu");
        assert!(value[0]["hosts_address"].is_null());
    }
}
