//! Error types for wslip.
//!
//! All errors use `thiserror` for ergonomic error handling and proper error chains.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for wslip operations.
pub type Result<T> = std::result::Result<T, WslIpError>;

/// Main error type for wslip.
#[derive(Error, Debug)]
pub enum WslIpError {
    // Allocation errors
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("{address} is already assigned to instance '{owner}'")]
    Conflict { address: String, owner: String },

    #[error("Address space exhausted: no free address left in {subnet}")]
    AddressSpaceExhausted { subnet: String },

    // Store errors
    #[error(
        "Duplicate value '{value}' for [{section}] {key}: already used by '{existing_key}'"
    )]
    DuplicateValue { section: String, key: String, value: String, existing_key: String },

    #[error("Parse error in {origin} at line {line}: {reason}")]
    Parse { origin: String, line: usize, reason: String },

    #[error("I/O error at {path:?}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl WslIpError {
    /// Shorthand for an [`WslIpError::InvalidAddress`] about an IPv4 address.
    pub(crate) fn invalid_address(address: Ipv4Addr, reason: impl Into<String>) -> Self {
        Self::InvalidAddress { address: address.to_string(), reason: reason.into() }
    }

    /// Shorthand for an [`WslIpError::InvalidConfig`].
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig { reason: reason.into() }
    }

    /// Wrap an I/O error with the path it happened at.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError { path: path.into(), source }
    }
}
