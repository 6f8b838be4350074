//! wslip core library
//!
//! Stable addressing for WSL instances: the INI config file, the system hosts
//! file, address allocation inside the adapter subnet, and the reconciler
//! that keeps all three consistent.

pub mod config;
pub mod error;
pub mod hosts;
pub mod network;
pub mod observability;
pub mod paths;
pub mod persist;
pub mod reconcile;
pub mod text;

// Re-export commonly used items
pub use config::{ConfigDocument, ConfigStore, NetworkSettings, NetworkUpdate};
pub use error::{Result, WslIpError};
pub use hosts::{HostsDocument, HostsStore};
pub use network::{is_within_subnet, AddressAllocator, Subnet};
pub use observability::init as init_observability;
pub use reconcile::{
    resolve_hostname, Allocation, Assigned, Assignment, AssignmentRequest, CommitOutcome,
    Reconciler, ReleaseOutcome,
};
