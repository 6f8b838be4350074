//! `wslip network` commands
//!
//! - wslip network show
//! - wslip network set
//! - wslip network clear

use super::Files;
use anyhow::{Context, Result};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use wslip_core::{NetworkSettings, NetworkUpdate, Reconciler};

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "SETTING")]
    name: &'static str,
    #[tabled(rename = "VALUE")]
    value: String,
}

/// Show the resolved network settings
pub fn show(files: &Files, json: bool) -> Result<()> {
    let config = files.load_config()?;
    let settings = NetworkSettings::from_config(&config).context("Failed to read network settings")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let mut table = Table::new(rows(&settings));
    table.with(Style::modern());
    println!("{}", table);
    Ok(())
}

fn rows(settings: &NetworkSettings) -> Vec<SettingRow> {
    let join = |items: Vec<String>| if items.is_empty() { "-".to_string() } else { items.join(", ") };
    let subnet = settings.subnet().map(|s| s.to_string()).unwrap_or_else(|_| "-".to_string());
    vec![
        SettingRow { name: "gateway", value: settings.gateway.map_or("-".to_string(), |g| g.to_string()) },
        SettingRow { name: "prefix length", value: settings.prefix_length.to_string() },
        SettingRow { name: "subnet", value: subnet },
        SettingRow {
            name: "dns servers",
            value: join(settings.dns_servers.iter().map(|s| s.to_string()).collect()),
        },
        SettingRow { name: "windows host name", value: settings.windows_host_name.clone() },
        SettingRow { name: "dynamic adapters", value: join(settings.dynamic_adapters.clone()) },
    ]
}

/// Store explicit network settings
pub fn set(files: &Files, update: &NetworkUpdate) -> Result<()> {
    if update.is_empty() {
        anyhow::bail!("Nothing to set, pass at least one option");
    }

    let changed = mutate(files, |reconciler| reconciler.update_network(update))?;
    if changed {
        println!("{} Network settings updated", "✓".green().bold());
    } else {
        println!("Network settings unchanged");
    }
    Ok(())
}

/// Drop the network settings once no instance has a static address
pub fn clear(files: &Files) -> Result<()> {
    let changed = mutate(files, |reconciler| reconciler.clear_network())?;
    if changed {
        println!("{} Network settings cleared", "✓".green().bold());
    } else {
        println!("No network settings stored");
    }
    Ok(())
}

fn mutate(
    files: &Files,
    op: impl FnOnce(&mut Reconciler<'_>) -> wslip_core::Result<bool>,
) -> Result<bool> {
    let mut config = files.load_config()?;
    let mut hosts = files.load_hosts()?;
    let mut reconciler = Reconciler::new(&mut config, &mut hosts);
    let changed = op(&mut reconciler).context("Failed to update network settings")?;
    reconciler.commit(files.backup).context("Failed to save changes")?;
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{files, NETWORK};
    use std::net::Ipv4Addr;

    #[test]
    fn test_set_and_clear() {
        let (_dir, files) = files("", "");
        let update = NetworkUpdate {
            gateway: Some(Ipv4Addr::new(172, 16, 0, 1)),
            dynamic_adapters: Some(vec!["Ethernet 2".to_string()]),
            ..Default::default()
        };
        assert!(mutate(&files, |r| r.update_network(&update)).unwrap());

        let config = files.load_config().unwrap();
        let settings = NetworkSettings::from_config(&config).unwrap();
        assert_eq!(settings.gateway, Some(Ipv4Addr::new(172, 16, 0, 1)));
        assert_eq!(settings.dynamic_adapters, vec!["Ethernet 2"]);

        assert!(mutate(&files, |r| r.clear_network()).unwrap());
        assert_eq!(std::fs::read_to_string(&files.config).unwrap(), "");
    }

    #[test]
    fn test_clear_refused_while_static_assigned() {
        let config = format!("{}\n[static_ips]\nUbuntu = 172.16.0.2\n", NETWORK);
        let (_dir, files) = files(&config, "");
        let err = mutate(&files, |r| r.clear_network()).unwrap_err();
        assert!(format!("{:#}", err).contains("Ubuntu"));
        assert_eq!(std::fs::read_to_string(&files.config).unwrap(), config);
    }

    #[test]
    fn test_empty_update_rejected() {
        let (_dir, files) = files(NETWORK, "");
        assert!(set(&files, &NetworkUpdate::default()).is_err());
    }

    #[test]
    fn test_rows_include_subnet() {
        let (_dir, files) = files(NETWORK, "");
        let settings = NetworkSettings::from_config(&files.load_config().unwrap()).unwrap();
        let rows = rows(&settings);
        assert!(rows.iter().any(|r| r.name == "subnet" && r.value == "172.16.0.0/24"));
        assert!(rows.iter().any(|r| r.name == "dns servers" && r.value == "172.16.0.1"));
    }
}
