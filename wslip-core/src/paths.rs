//! Default locations of the files the engine edits.
//!
//! Command-line flags override everything resolved here.

use std::path::PathBuf;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "WSLIP_CONFIG";
/// Environment variable overriding the hosts file location.
pub const HOSTS_ENV: &str = "WSLIP_HOSTS";

const CONFIG_FILE_NAME: &str = ".wsl-iphandler-config";

/// Get the config file path.
///
/// Resolution order:
/// 1. `WSLIP_CONFIG` environment variable
/// 2. `~/.wsl-iphandler-config`
/// 3. `.wsl-iphandler-config` in the working directory when no home is known
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME)).unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Get the hosts file path.
///
/// Resolution order:
/// 1. `WSLIP_HOSTS` environment variable
/// 2. `%SystemRoot%\System32\drivers\etc\hosts` on Windows, `/etc/hosts` elsewhere
pub fn hosts_path() -> PathBuf {
    if let Ok(path) = std::env::var(HOSTS_ENV) {
        return PathBuf::from(path);
    }
    system_hosts_path()
}

#[cfg(windows)]
fn system_hosts_path() -> PathBuf {
    let root = std::env::var("SystemRoot").unwrap_or_else(|_| r"C:\Windows".to_string());
    PathBuf::from(root).join("System32").join("drivers").join("etc").join("hosts")
}

#[cfg(not(windows))]
fn system_hosts_path() -> PathBuf {
    PathBuf::from("/etc/hosts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_from_env() {
        std::env::set_var(CONFIG_ENV, "/tmp/wslip-test/config");
        std::env::set_var(HOSTS_ENV, "/tmp/wslip-test/hosts");
        assert_eq!(config_path(), PathBuf::from("/tmp/wslip-test/config"));
        assert_eq!(hosts_path(), PathBuf::from("/tmp/wslip-test/hosts"));
        std::env::remove_var(CONFIG_ENV);
        std::env::remove_var(HOSTS_ENV);
    }

    #[test]
    fn test_default_names() {
        assert!(system_hosts_path().ends_with("hosts"));
    }
}
