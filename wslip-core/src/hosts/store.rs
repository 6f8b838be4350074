//! File-backed hosts store with a dirty flag.

use super::document::{Binding, HostsDocument};
use crate::error::{Result, WslIpError};
use crate::persist;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// The hosts file loaded into memory.
#[derive(Debug, Clone)]
pub struct HostsStore {
    path: PathBuf,
    document: HostsDocument,
    modified: bool,
}

impl HostsStore {
    /// Load the hosts file at `path`. A missing file yields an empty store.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let document = match persist::read_optional(&path)? {
            Some(bytes) => HostsDocument::from_bytes(&bytes, &path.display().to_string())?,
            None => {
                debug!("Hosts file does not exist yet, starting empty");
                HostsDocument::default()
            }
        };
        Ok(Self { path, document, modified: false })
    }

    /// Wrap an already parsed document that will be saved to `path`.
    pub fn from_document(path: impl Into<PathBuf>, document: HostsDocument) -> Self {
        Self { path: path.into(), document, modified: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &HostsDocument {
        &self.document
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn lookup(&self, hostname: &str) -> Option<IpAddr> {
        self.document.lookup(hostname)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.document.bindings()
    }

    /// Bind `hostname` to `address`. Returns whether the file content changed.
    ///
    /// # Errors
    ///
    /// Returns `WslIpError::InvalidConfig` for a hostname that cannot appear
    /// in a hosts file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn upsert(&mut self, address: IpAddr, hostname: &str) -> Result<bool> {
        validate_hostname(hostname)?;
        let changed = self.document.upsert(address, hostname);
        if changed {
            info!("Bound {} to {}", hostname, address);
            self.modified = true;
        } else {
            debug!("{} already bound to {}", hostname, address);
        }
        Ok(changed)
    }

    /// Unbind `hostname`. Returns whether the file content changed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn remove(&mut self, hostname: &str) -> bool {
        let changed = self.document.remove(hostname);
        if changed {
            info!("Removed binding for {}", hostname);
            self.modified = true;
        }
        changed
    }

    /// Write the file if it was modified. Returns whether a write happened.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn save(&mut self, backup: bool) -> Result<bool> {
        if !self.modified {
            debug!("Hosts file unchanged, not writing");
            return Ok(false);
        }
        persist::write_atomic(&self.path, &self.document.to_bytes(), backup)?;
        self.modified = false;
        info!("Saved hosts file");
        Ok(true)
    }
}

fn validate_hostname(hostname: &str) -> Result<()> {
    if hostname.is_empty() || hostname.contains(|c: char| c.is_whitespace() || c == '#') {
        return Err(WslIpError::invalid_config(format!("invalid hostname '{}'", hostname)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::net::Ipv4Addr;
    use tempfile::TempDir;

    #[test]
    fn test_upsert_and_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, "127.0.0.1 localhost\r\n").unwrap();

        let mut hosts = HostsStore::load(&path).unwrap();
        let address = IpAddr::V4(Ipv4Addr::new(172, 16, 0, 2));
        assert!(hosts.upsert(address, "ubuntu").unwrap());
        assert!(!hosts.upsert(address, "ubuntu").unwrap());
        assert!(hosts.save(true).unwrap());
        assert!(!hosts.save(true).unwrap());

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "127.0.0.1 localhost\r\n172.16.0.2  ubuntu\r\n");

        let backups = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".bak"))
            .count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn test_invalid_hostname() {
        let mut hosts = HostsStore::from_document("hosts", HostsDocument::default());
        let address = IpAddr::V4(Ipv4Addr::new(172, 16, 0, 2));
        assert!(hosts.upsert(address, "").is_err());
        assert!(hosts.upsert(address, "two words").is_err());
        assert!(hosts.upsert(address, "a#b").is_err());
        assert!(!hosts.is_modified());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let doc = HostsDocument::parse("172.16.0.2  ubuntu\n").unwrap();
        let mut hosts = HostsStore::from_document("hosts", doc);
        assert!(hosts.remove("ubuntu"));
        assert!(!hosts.remove("ubuntu"));
        assert!(hosts.is_modified());
    }
}
