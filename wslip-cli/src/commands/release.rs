//! `wslip release` command

use super::Files;
use anyhow::{Context, Result};
use colored::Colorize;
use wslip_core::{Reconciler, ReleaseOutcome};

/// Forget an instance's address, optionally dropping the network settings
/// once no static address is left.
pub fn release(files: &Files, instance: &str, clear_network: bool) -> Result<()> {
    let (outcome, cleared) = run(files, instance, clear_network)?;

    if outcome.changed {
        println!("{} Released {}", "✓".green().bold(), instance.bold());
    } else {
        println!("Nothing recorded for {}", instance.bold());
    }
    if cleared {
        println!("{} Cleared network settings", "✓".green().bold());
    } else if clear_network && !outcome.network_clearable {
        println!("{} Network settings kept: other instances still use static addresses", "!".yellow().bold());
    }
    Ok(())
}

pub(crate) fn run(files: &Files, instance: &str, clear_network: bool) -> Result<(ReleaseOutcome, bool)> {
    let mut config = files.load_config()?;
    let mut hosts = files.load_hosts()?;
    let mut reconciler = Reconciler::new(&mut config, &mut hosts);

    let outcome = reconciler
        .release(instance)
        .with_context(|| format!("Failed to release '{}'", instance))?;
    let cleared = if clear_network && outcome.network_clearable {
        reconciler.clear_network().context("Failed to clear network settings")?
    } else {
        false
    };

    reconciler.commit(files.backup).context("Failed to save changes")?;
    Ok((outcome, cleared))
}
