//! File-backed config store with a dirty flag.

use super::document::ConfigDocument;
use crate::error::{Result, WslIpError};
use crate::persist;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// The config file loaded into memory.
///
/// Mutations only touch the in-memory document and mark the store as
/// modified; [`ConfigStore::save`] writes the file once, and only when
/// something changed. The store is `Clone` so callers can keep a snapshot to
/// roll back to.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    document: ConfigDocument,
    modified: bool,
}

impl ConfigStore {
    /// Load the config file at `path`. A missing file yields an empty store.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let document = match persist::read_optional(&path)? {
            Some(bytes) => ConfigDocument::from_bytes(&bytes, &path.display().to_string())?,
            None => {
                debug!("Config file does not exist yet, starting empty");
                ConfigDocument::default()
            }
        };
        Ok(Self { path, document, modified: false })
    }

    /// Wrap an already parsed document that will be saved to `path`.
    pub fn from_document(path: impl Into<PathBuf>, document: ConfigDocument) -> Self {
        Self { path: path.into(), document, modified: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// Whether the document differs from what is on disk.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.document.get(section, key)
    }

    /// Stored value, or `default` when the section or key is absent.
    pub fn get_or<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key).unwrap_or(default)
    }

    pub fn entries(&self, section: &str) -> Vec<(&str, &str)> {
        self.document.entries(section)
    }

    /// Number of keys in `section`, 0 when the section is absent.
    pub fn section_count(&self, section: &str) -> usize {
        self.document.entries(section).len()
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.document.section_names()
    }

    /// Store `value` under `section`/`key`. Returns whether the value changed.
    ///
    /// With `unique`, the value may not already be stored under a different
    /// key of the same section.
    ///
    /// # Errors
    ///
    /// Returns `WslIpError::DuplicateValue` when the unique constraint is
    /// violated and `WslIpError::InvalidConfig` for names or values that
    /// cannot be represented in the file format.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn set(&mut self, section: &str, key: &str, value: &str, unique: bool) -> Result<bool> {
        validate_section(section)?;
        validate_key(key)?;
        let value = value.trim();
        if value.contains(['\r', '\n']) {
            return Err(WslIpError::invalid_config(format!(
                "value for [{}] {} must be a single line",
                section, key
            )));
        }

        if unique {
            let owner = self
                .document
                .entries(section)
                .into_iter()
                .find(|(k, v)| *v == value && !k.eq_ignore_ascii_case(key))
                .map(|(k, _)| k.to_string());
            if let Some(existing_key) = owner {
                return Err(WslIpError::DuplicateValue {
                    section: section.to_string(),
                    key: key.to_string(),
                    value: value.to_string(),
                    existing_key,
                });
            }
        }

        let changed = self.document.set(section, key, value);
        if changed {
            info!("Set [{}] {} = {}", section, key, value);
            self.modified = true;
        } else {
            debug!("[{}] {} already set to {}", section, key, value);
        }
        Ok(changed)
    }

    /// Remove `section`/`key`. Returns whether anything was removed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn remove(&mut self, section: &str, key: &str) -> bool {
        let changed = self.document.remove(section, key);
        if changed {
            info!("Removed [{}] {}", section, key);
            self.modified = true;
        }
        changed
    }

    /// Remove a whole section. Returns whether anything was removed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn remove_section(&mut self, section: &str) -> bool {
        let changed = self.document.remove_section(section);
        if changed {
            info!("Removed section [{}]", section);
            self.modified = true;
        }
        changed
    }

    /// Write the document if it was modified. Returns whether a write happened.
    ///
    /// With `backup`, the previous file is copied to a timestamped sibling
    /// before being replaced.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn save(&mut self, backup: bool) -> Result<bool> {
        if !self.modified {
            debug!("Config unchanged, not writing");
            return Ok(false);
        }
        persist::write_atomic(&self.path, &self.document.to_bytes(), backup)?;
        self.modified = false;
        info!("Saved config file");
        Ok(true)
    }
}

fn validate_section(section: &str) -> Result<()> {
    if section.trim() != section || section.contains(['[', ']', '\r', '\n']) {
        return Err(WslIpError::invalid_config(format!("invalid section name '{}'", section)));
    }
    Ok(())
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key.trim() == key
        && !key.contains(['=', '\r', '\n'])
        && !key.starts_with(['[', ';', '#']);
    if !valid {
        return Err(WslIpError::invalid_config(format!("invalid key '{}'", key)));
    }
    Ok(())
}
