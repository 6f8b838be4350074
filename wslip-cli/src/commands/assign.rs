//! `wslip assign` command

use super::Files;
use anyhow::{Context, Result};
use colored::Colorize;
use std::net::Ipv4Addr;
use wslip_core::{Assigned, AssignmentRequest, NetworkSettings, Reconciler};

/// Options of `wslip assign` besides the instance name.
#[derive(Debug, Clone, Default)]
pub struct AssignOptions {
    pub dynamic: bool,
    pub address: Option<Ipv4Addr>,
    pub gateway: Option<Ipv4Addr>,
    pub prefix_length: Option<u8>,
}

/// Assign an address or offset to an instance and print
/// `<address-or-offset> <hostname> <windows host name>`.
pub fn assign(files: &Files, instance: &str, options: &AssignOptions) -> Result<()> {
    let assigned = run(files, instance, options)?;

    if assigned.changed {
        eprintln!("{} Assigned {} to {}", "✓".green().bold(), assigned.allocation, instance.bold());
    } else {
        eprintln!("{} {} already has {}", "✓".green().bold(), instance.bold(), assigned.allocation);
    }
    println!("{}", output_line(&assigned));
    Ok(())
}

pub(crate) fn run(files: &Files, instance: &str, options: &AssignOptions) -> Result<Assigned> {
    let mut config = files.load_config()?;
    let mut hosts = files.load_hosts()?;

    // Explicit network parameters fill in around the stored ones
    let network = if !options.dynamic && (options.gateway.is_some() || options.prefix_length.is_some()) {
        let settings = NetworkSettings::from_config(&config)?;
        let gateway = options.gateway.or(settings.gateway).context("No gateway configured, pass --gateway")?;
        Some((gateway, options.prefix_length.unwrap_or(settings.prefix_length)))
    } else {
        None
    };

    let mut reconciler = Reconciler::new(&mut config, &mut hosts);
    let assigned = match network {
        _ if options.dynamic => reconciler.assign(instance, AssignmentRequest::Dynamic),
        Some((gateway, prefix_length)) => {
            reconciler.assign_static(instance, gateway, prefix_length, options.address)
        }
        None => reconciler.assign(instance, AssignmentRequest::Static { address: options.address }),
    }
    .with_context(|| format!("Failed to assign an address to '{}'", instance))?;

    reconciler.commit(files.backup).context("Failed to save changes")?;
    Ok(assigned)
}

/// Positional arguments for the instance-side installer.
pub(crate) fn output_line(assigned: &Assigned) -> String {
    format!("{} {} {}", assigned.allocation, assigned.hostname, assigned.windows_host_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{files, NETWORK};

    #[test]
    fn test_assign_static_from_stored_network() {
        let (_dir, files) = files(NETWORK, "127.0.0.1 localhost\n");
        let assigned = run(&files, "Ubuntu-22.04", &AssignOptions::default()).unwrap();
        assert_eq!(output_line(&assigned), "172.16.0.2 ubuntu-22.04 windows");

        let hosts = std::fs::read_to_string(&files.hosts).unwrap();
        assert_eq!(hosts, "127.0.0.1 localhost\n172.16.0.2  ubuntu-22.04\n");
    }

    #[test]
    fn test_assign_with_gateway_override() {
        let (_dir, files) = files("", "");
        let options = AssignOptions {
            gateway: Some(Ipv4Addr::new(192, 168, 50, 1)),
            address: Some(Ipv4Addr::new(192, 168, 50, 20)),
            ..Default::default()
        };
        let assigned = run(&files, "Debian", &options).unwrap();
        assert_eq!(output_line(&assigned), "192.168.50.20 debian windows");

        let config = std::fs::read_to_string(&files.config).unwrap();
        assert!(config.contains("gateway_ip = 192.168.50.1"));
        assert!(config.contains("prefix_length = 24"));
    }

    #[test]
    fn test_assign_dynamic() {
        let (_dir, files) = files("[network]\nwindows_host_name = hostpc\n", "");
        let options = AssignOptions { dynamic: true, ..Default::default() };
        let assigned = run(&files, "Alpine", &options).unwrap();
        assert_eq!(output_line(&assigned), "1 alpine hostpc");
    }

    #[test]
    fn test_assign_without_gateway_fails() {
        let (_dir, files) = files("", "");
        let err = run(&files, "Ubuntu", &AssignOptions::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("no gateway configured"));
        assert_eq!(std::fs::read_to_string(&files.config).unwrap(), "");
    }
}
