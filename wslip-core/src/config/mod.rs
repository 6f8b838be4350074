//! Persistent configuration: the INI-style key/value file.
//!
//! ```text
//! ~/.wsl-iphandler-config
//!     → ConfigDocument (every line kept, edits are local)
//!     → ConfigStore (dirty flag, unique values, atomic save)
//!     → NetworkSettings (typed view of [network])
//! ```

pub mod document;
pub mod network;
pub mod store;

pub use document::ConfigDocument;
pub use network::{NetworkSettings, NetworkUpdate};
pub use store::ConfigStore;

/// Adapter-wide settings shared by all instances.
pub const SECTION_NETWORK: &str = "network";
/// Instance name → static IPv4 address.
pub const SECTION_STATIC_IPS: &str = "static_ips";
/// Instance name → dynamic offset.
pub const SECTION_IP_OFFSETS: &str = "ip_offsets";

pub const KEY_GATEWAY_IP: &str = "gateway_ip";
pub const KEY_PREFIX_LENGTH: &str = "prefix_length";
pub const KEY_DNS_SERVERS: &str = "dns_servers";
pub const KEY_WINDOWS_HOST_NAME: &str = "windows_host_name";
pub const KEY_DYNAMIC_ADAPTERS: &str = "dynamic_adapters";
