//! CLI command implementations

pub mod assign;
pub mod config;
pub mod list;
pub mod network;
pub mod release;

pub use assign::assign;
pub use list::list;
pub use release::release;

use anyhow::{Context, Result};
use std::path::PathBuf;
use wslip_core::{ConfigStore, HostsStore};

/// Files a command operates on, resolved from flags and the environment.
#[derive(Debug, Clone)]
pub struct Files {
    pub config: PathBuf,
    pub hosts: PathBuf,
    /// Take timestamped backups before overwriting.
    pub backup: bool,
}

impl Files {
    pub fn load_config(&self) -> Result<ConfigStore> {
        ConfigStore::load(&self.config)
            .with_context(|| format!("Failed to load config file {}", self.config.display()))
    }

    pub fn load_hosts(&self) -> Result<HostsStore> {
        HostsStore::load(&self.hosts)
            .with_context(|| format!("Failed to load hosts file {}", self.hosts.display()))
    }
}
