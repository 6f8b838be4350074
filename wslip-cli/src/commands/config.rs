//! `wslip config` commands: raw access to the config file

use super::Files;
use anyhow::{Context, Result};
use colored::Colorize;
use wslip_core::config::{SECTION_IP_OFFSETS, SECTION_STATIC_IPS};

/// Print a stored value, or `default` when the key is absent.
pub fn get(files: &Files, section: &str, key: &str, default: Option<&str>) -> Result<()> {
    let config = files.load_config()?;
    let value = config
        .get(section, key)
        .or(default)
        .with_context(|| format!("[{}] {} is not set", section, key))?;
    println!("{}", value);
    Ok(())
}

/// Store a value; with `unique`, refuse a value already held by another key.
///
/// Addresses and offsets are always unique.
pub fn set(files: &Files, section: &str, key: &str, value: &str, unique: bool) -> Result<()> {
    let unique = unique
        || [SECTION_STATIC_IPS, SECTION_IP_OFFSETS].iter().any(|s| s.eq_ignore_ascii_case(section));
    let mut config = files.load_config()?;
    let changed = config
        .set(section, key, value, unique)
        .with_context(|| format!("Failed to set [{}] {}", section, key))?;
    config.save(files.backup).context("Failed to save config file")?;

    if changed {
        println!("{} [{}] {} = {}", "✓".green().bold(), section, key, value.trim());
    } else {
        println!("[{}] {} unchanged", section, key);
    }
    Ok(())
}

/// Remove a key; its section goes once empty.
pub fn remove(files: &Files, section: &str, key: &str) -> Result<()> {
    let mut config = files.load_config()?;
    let changed = config.remove(section, key);
    config.save(files.backup).context("Failed to save config file")?;

    if changed {
        println!("{} Removed [{}] {}", "✓".green().bold(), section, key);
    } else {
        println!("[{}] {} was not set", section, key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::files;

    #[test]
    fn test_set_unique_and_remove() {
        let (_dir, files) = files("; keep me\n", "");
        set(&files, "aliases", "ubuntu", "dev", true).unwrap();
        assert!(set(&files, "aliases", "debian", "dev", true).is_err());
        set(&files, "aliases", "debian", "dev", false).unwrap();

        assert_eq!(
            std::fs::read_to_string(&files.config).unwrap(),
            "; keep me\n\n[aliases]\nubuntu = dev\ndebian = dev\n"
        );

        remove(&files, "aliases", "ubuntu").unwrap();
        remove(&files, "aliases", "debian").unwrap();
        assert_eq!(std::fs::read_to_string(&files.config).unwrap(), "; keep me\n");
    }

    #[test]
    fn test_addresses_and_offsets_stay_unique() {
        let (_dir, files) = files("[static_ips]\nUbuntu = 172.16.0.2\n\n[ip_offsets]\nAlpine = 3\n", "");
        assert!(set(&files, "static_ips", "Debian", "172.16.0.2", false).is_err());
        assert!(set(&files, "IP_Offsets", "Arch", "3", false).is_err());
        set(&files, "static_ips", "Debian", "172.16.0.3", false).unwrap();

        assert_eq!(
            std::fs::read_to_string(&files.config).unwrap(),
            "[static_ips]\nUbuntu = 172.16.0.2\nDebian = 172.16.0.3\n\n[ip_offsets]\nAlpine = 3\n"
        );
    }

    #[test]
    fn test_get_default() {
        let (_dir, files) = files("[network]\ngateway_ip = 172.16.0.1\n", "");
        assert!(get(&files, "network", "gateway_ip", None).is_ok());
        assert!(get(&files, "network", "prefix_length", Some("24")).is_ok());
        assert!(get(&files, "network", "prefix_length", None).is_err());
    }
}
