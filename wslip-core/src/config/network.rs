//! Typed view of the `[network]` section.
//!
//! Every setting has exactly one resolution function turning the stored
//! string (or its absence) into a value:
//!
//! | Setting           | Key                 | Default                      |
//! |-------------------|---------------------|------------------------------|
//! | gateway           | `gateway_ip`        | none                         |
//! | prefix length     | `prefix_length`     | 24                           |
//! | DNS servers       | `dns_servers`       | the gateway, if set          |
//! | Windows host name | `windows_host_name` | `windows`                    |
//! | dynamic adapters  | `dynamic_adapters`  | `Ethernet`, `Wi-Fi`          |

use super::store::ConfigStore;
use super::{
    KEY_DNS_SERVERS, KEY_DYNAMIC_ADAPTERS, KEY_GATEWAY_IP, KEY_PREFIX_LENGTH,
    KEY_WINDOWS_HOST_NAME, SECTION_NETWORK,
};
use crate::error::{Result, WslIpError};
use crate::network::Subnet;
use serde::Serialize;
use std::net::Ipv4Addr;

/// Prefix length used when none is configured.
pub const DEFAULT_PREFIX_LENGTH: u8 = 24;
/// Name under which WSL instances reach the Windows host.
pub const DEFAULT_WINDOWS_HOST_NAME: &str = "windows";
/// Adapters whose DNS settings follow the WSL adapter in dynamic mode.
pub const DEFAULT_DYNAMIC_ADAPTERS: &[&str] = &["Ethernet", "Wi-Fi"];

/// Resolved network settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSettings {
    pub gateway: Option<Ipv4Addr>,
    pub prefix_length: u8,
    pub dns_servers: Vec<Ipv4Addr>,
    pub windows_host_name: String,
    pub dynamic_adapters: Vec<String>,
}

impl NetworkSettings {
    /// Read the `[network]` section, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns `WslIpError::InvalidConfig` naming the key of a malformed value.
    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let get = |key: &str| config.get(SECTION_NETWORK, key);

        let gateway = resolve_gateway(get(KEY_GATEWAY_IP))?;
        Ok(Self {
            gateway,
            prefix_length: resolve_prefix_length(get(KEY_PREFIX_LENGTH))?,
            dns_servers: resolve_dns_servers(get(KEY_DNS_SERVERS), gateway)?,
            windows_host_name: resolve_windows_host_name(get(KEY_WINDOWS_HOST_NAME)),
            dynamic_adapters: resolve_dynamic_adapters(get(KEY_DYNAMIC_ADAPTERS)),
        })
    }

    /// The adapter subnet.
    ///
    /// # Errors
    ///
    /// `WslIpError::InvalidConfig` when no gateway is configured, or
    /// `WslIpError::InvalidAddress` when gateway and prefix do not form a
    /// usable subnet.
    pub fn subnet(&self) -> Result<Subnet> {
        let gateway = self.gateway.ok_or_else(|| {
            WslIpError::invalid_config(format!(
                "no gateway configured: set [{}] {} first",
                SECTION_NETWORK, KEY_GATEWAY_IP
            ))
        })?;
        Subnet::new(gateway, self.prefix_length)
    }
}

/// Explicit changes to the `[network]` section; `None` leaves a key alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkUpdate {
    pub gateway: Option<Ipv4Addr>,
    pub prefix_length: Option<u8>,
    pub dns_servers: Option<Vec<Ipv4Addr>>,
    pub windows_host_name: Option<String>,
    pub dynamic_adapters: Option<Vec<String>>,
}

impl NetworkUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the given values. Returns whether anything changed.
    pub fn apply(&self, config: &mut ConfigStore) -> Result<bool> {
        let mut changed = false;
        if let Some(gateway) = self.gateway {
            changed |= config.set(SECTION_NETWORK, KEY_GATEWAY_IP, &gateway.to_string(), false)?;
        }
        if let Some(prefix_length) = self.prefix_length {
            resolve_prefix_length(Some(&prefix_length.to_string()))?;
            changed |=
                config.set(SECTION_NETWORK, KEY_PREFIX_LENGTH, &prefix_length.to_string(), false)?;
        }
        if let Some(servers) = &self.dns_servers {
            let joined = servers.iter().map(Ipv4Addr::to_string).collect::<Vec<_>>().join(", ");
            changed |= config.set(SECTION_NETWORK, KEY_DNS_SERVERS, &joined, false)?;
        }
        if let Some(name) = &self.windows_host_name {
            changed |= config.set(SECTION_NETWORK, KEY_WINDOWS_HOST_NAME, name, false)?;
        }
        if let Some(adapters) = &self.dynamic_adapters {
            changed |= config.set(SECTION_NETWORK, KEY_DYNAMIC_ADAPTERS, &adapters.join(", "), false)?;
        }
        Ok(changed)
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> WslIpError {
    WslIpError::invalid_config(format!("[{}] {} = '{}': {}", SECTION_NETWORK, key, value, reason))
}

/// Gateway address, if configured.
pub fn resolve_gateway(raw: Option<&str>) -> Result<Option<Ipv4Addr>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| invalid(KEY_GATEWAY_IP, value, "not an IPv4 address")),
    }
}

/// Prefix length, defaulting to [`DEFAULT_PREFIX_LENGTH`].
pub fn resolve_prefix_length(raw: Option<&str>) -> Result<u8> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_PREFIX_LENGTH);
    };
    let prefix: u8 = value.parse().map_err(|_| invalid(KEY_PREFIX_LENGTH, value, "not a number"))?;
    if !(crate::network::subnet::MIN_PREFIX_LENGTH..=crate::network::subnet::MAX_PREFIX_LENGTH)
        .contains(&prefix)
    {
        return Err(invalid(KEY_PREFIX_LENGTH, value, "must be between 1 and 30"));
    }
    Ok(prefix)
}

/// DNS servers from a comma or whitespace separated list, defaulting to the
/// gateway.
pub fn resolve_dns_servers(raw: Option<&str>, gateway: Option<Ipv4Addr>) -> Result<Vec<Ipv4Addr>> {
    let items = split_list(raw);
    if items.is_empty() {
        return Ok(gateway.into_iter().collect());
    }
    items
        .iter()
        .map(|item| item.parse().map_err(|_| invalid(KEY_DNS_SERVERS, item, "not an IPv4 address")))
        .collect()
}

/// Host name of Windows as seen from WSL instances.
pub fn resolve_windows_host_name(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_WINDOWS_HOST_NAME)
        .to_string()
}

/// Names of the Windows adapters used in dynamic mode.
pub fn resolve_dynamic_adapters(raw: Option<&str>) -> Vec<String> {
    let items = split_list(raw);
    if items.is_empty() {
        return DEFAULT_DYNAMIC_ADAPTERS.iter().map(|s| s.to_string()).collect();
    }
    items
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(|c: char| c == ',' || c == ';')
        .flat_map(|part| {
            // Adapter names may contain spaces, addresses may not
            let part = part.trim();
            if part.contains('.') && part.contains(char::is_whitespace) {
                part.split_whitespace().map(str::to_string).collect::<Vec<_>>()
            } else {
                vec![part.to_string()]
            }
        })
        .filter(|part| !part.is_empty())
        .collect()
}
