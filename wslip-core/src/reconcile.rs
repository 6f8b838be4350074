//! Assign and release addresses across the config and hosts files.
//!
//! A [`Reconciler`] borrows both stores for one top-level operation. Every
//! mutating call runs as an in-memory transaction: when it fails, both
//! documents are restored to the state they had before the call. Nothing
//! touches disk until [`Reconciler::commit`].

use crate::config::{
    ConfigStore, NetworkSettings, NetworkUpdate, SECTION_IP_OFFSETS, SECTION_NETWORK,
    SECTION_STATIC_IPS,
};
use crate::error::{Result, WslIpError};
use crate::hosts::HostsStore;
use crate::network::{AddressAllocator, Subnet};
use serde::Serialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use tracing::{debug, info, instrument, warn};

/// How an instance should be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentRequest {
    /// Fixed address; allocated from the subnet when `address` is `None`.
    Static { address: Option<Ipv4Addr> },
    /// Offset from the adapter's base address, applied when the instance starts.
    Dynamic,
}

/// What an instance ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum Allocation {
    Static(Ipv4Addr),
    Dynamic(u32),
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Allocation::Static(address) => write!(f, "{}", address),
            Allocation::Dynamic(offset) => write!(f, "{}", offset),
        }
    }
}

/// Result of an assign operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assigned {
    pub instance: String,
    pub allocation: Allocation,
    pub hostname: String,
    pub windows_host_name: String,
    pub changed: bool,
}

/// A recorded assignment as listed by [`Reconciler::assignments`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub instance: String,
    pub allocation: Allocation,
    pub hostname: Option<String>,
    /// Address the hosts file currently binds `hostname` to.
    pub hosts_address: Option<IpAddr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReleaseOutcome {
    pub changed: bool,
    /// No static assignment is left, so the network settings could go.
    pub network_clearable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CommitOutcome {
    pub config_written: bool,
    pub hosts_written: bool,
}

/// Hostname under which an instance is published in the hosts file.
///
/// The name is lower-cased, characters outside `[a-z0-9.-]` become `-`, and
/// leading or trailing `-` and `.` are trimmed.
///
/// # Errors
///
/// Returns `WslIpError::InvalidConfig` when nothing usable is left.
pub fn resolve_hostname(instance: &str) -> Result<String> {
    let mapped: String = instance
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '-' })
        .collect();
    let hostname = mapped.trim_matches(|c| c == '-' || c == '.');
    if hostname.is_empty() {
        return Err(WslIpError::invalid_config(format!(
            "instance name '{}' does not yield a usable hostname",
            instance
        )));
    }
    Ok(hostname.to_string())
}

pub struct Reconciler<'a> {
    config: &'a mut ConfigStore,
    hosts: &'a mut HostsStore,
}

impl<'a> Reconciler<'a> {
    pub fn new(config: &'a mut ConfigStore, hosts: &'a mut HostsStore) -> Self {
        Self { config, hosts }
    }

    /// Assign an address or offset to `instance`.
    ///
    /// Static requests take the subnet from the stored network settings.
    pub fn assign(&mut self, instance: &str, request: AssignmentRequest) -> Result<Assigned> {
        match request {
            AssignmentRequest::Static { address } => {
                let subnet = NetworkSettings::from_config(self.config)?.subnet()?;
                self.assign_static(instance, subnet.gateway(), subnet.prefix_length(), address)
            }
            AssignmentRequest::Dynamic => self.assign_dynamic(instance),
        }
    }

    /// Give `instance` a fixed address inside `gateway`/`prefix_length`.
    ///
    /// Records the subnet in the network settings, stores the address, drops
    /// any offset the instance had, and binds its hostname in the hosts file.
    ///
    /// # Errors
    ///
    /// - `WslIpError::InvalidAddress` for an unusable subnet or requested
    ///   address, or when another instance's address would fall outside the
    ///   new subnet
    /// - `WslIpError::Conflict` when the requested address belongs to another
    ///   instance
    /// - `WslIpError::AddressSpaceExhausted` when no free address is left
    #[instrument(skip(self))]
    pub fn assign_static(
        &mut self,
        instance: &str,
        gateway: Ipv4Addr,
        prefix_length: u8,
        requested: Option<Ipv4Addr>,
    ) -> Result<Assigned> {
        self.transaction(|this| {
            let hostname = resolve_hostname(instance)?;
            check_hostname_free(this.config, &hostname, instance)?;
            let subnet = Subnet::new(gateway, prefix_length)?;
            let existing = static_assignments(this.config)?;
            check_stranded(&subnet, &existing, Some(instance))?;

            let address = AddressAllocator::new(subnet).resolve_static(instance, requested, &existing)?;

            let update = NetworkUpdate {
                gateway: Some(gateway),
                prefix_length: Some(prefix_length),
                ..Default::default()
            };
            let mut changed = update.apply(this.config)?;
            changed |= this.config.set(SECTION_STATIC_IPS, instance, &address.to_string(), true)?;
            changed |= this.config.remove(SECTION_IP_OFFSETS, instance);
            changed |= this.hosts.upsert(IpAddr::V4(address), &hostname)?;

            let windows_host_name = NetworkSettings::from_config(this.config)?.windows_host_name;
            info!(changed, "Assigned static address {} to {}", address, instance);
            Ok(Assigned {
                instance: instance.to_string(),
                allocation: Allocation::Static(address),
                hostname,
                windows_host_name,
                changed,
            })
        })
    }

    /// Give `instance` an offset for dynamic addressing.
    ///
    /// The hosts file is left to the instance's own startup script. Only when
    /// this call drops a static address is the binding for that address
    /// removed as well.
    #[instrument(skip(self))]
    pub fn assign_dynamic(&mut self, instance: &str) -> Result<Assigned> {
        self.transaction(|this| {
            let hostname = resolve_hostname(instance)?;
            check_hostname_free(this.config, &hostname, instance)?;
            let existing = offset_assignments(this.config)?;
            let offset = AddressAllocator::resolve_offset(instance, &existing);

            let mut changed = this.config.set(SECTION_IP_OFFSETS, instance, &offset.to_string(), true)?;
            if this.config.remove(SECTION_STATIC_IPS, instance) {
                changed = true;
                this.hosts.remove(&hostname);
            }

            let windows_host_name = NetworkSettings::from_config(this.config)?.windows_host_name;
            info!(changed, "Assigned offset {} to {}", offset, instance);
            Ok(Assigned {
                instance: instance.to_string(),
                allocation: Allocation::Dynamic(offset),
                hostname,
                windows_host_name,
                changed,
            })
        })
    }

    /// Forget everything recorded for `instance`.
    ///
    /// The hosts binding stays when another recorded instance publishes the
    /// same hostname.
    #[instrument(skip(self))]
    pub fn release(&mut self, instance: &str) -> Result<ReleaseOutcome> {
        self.transaction(|this| {
            let hostname = resolve_hostname(instance)?;
            let mut changed = this.config.remove(SECTION_STATIC_IPS, instance);
            changed |= this.config.remove(SECTION_IP_OFFSETS, instance);
            match hostname_owner(this.config, &hostname, instance) {
                Some(owner) => debug!("Keeping {} in the hosts file, it belongs to {}", hostname, owner),
                None => changed |= this.hosts.remove(&hostname),
            }

            let network_clearable = this.config.section_count(SECTION_STATIC_IPS) == 0;
            if changed {
                info!(network_clearable, "Released {}", instance);
            } else {
                debug!("Nothing recorded for {}", instance);
            }
            Ok(ReleaseOutcome { changed, network_clearable })
        })
    }

    /// Drop the network settings.
    ///
    /// # Errors
    ///
    /// Returns `WslIpError::Conflict` while any instance still has a static
    /// address.
    #[instrument(skip(self))]
    pub fn clear_network(&mut self) -> Result<bool> {
        self.transaction(|this| {
            if let Some((owner, address)) = this.config.entries(SECTION_STATIC_IPS).first() {
                return Err(WslIpError::Conflict {
                    address: address.to_string(),
                    owner: owner.to_string(),
                });
            }
            let changed = this.config.remove_section(SECTION_NETWORK);
            if changed {
                info!("Cleared network settings");
            }
            Ok(changed)
        })
    }

    /// Apply explicit network settings.
    ///
    /// # Errors
    ///
    /// Returns `WslIpError::InvalidAddress` when the resulting subnet is
    /// unusable or would leave a static address outside of it.
    #[instrument(skip(self))]
    pub fn update_network(&mut self, update: &NetworkUpdate) -> Result<bool> {
        self.transaction(|this| {
            let changed = update.apply(this.config)?;
            let settings = NetworkSettings::from_config(this.config)?;
            let existing = static_assignments(this.config)?;
            if let Some(gateway) = settings.gateway {
                let subnet = Subnet::new(gateway, settings.prefix_length)?;
                check_stranded(&subnet, &existing, None)?;
            } else if !existing.is_empty() {
                return Err(WslIpError::invalid_config("static addresses exist but no gateway is set"));
            }
            Ok(changed)
        })
    }

    /// Every recorded assignment, static ones first, in file order.
    pub fn assignments(&self) -> Result<Vec<Assignment>> {
        let statics = static_assignments(self.config)?
            .into_iter()
            .map(|(instance, address)| (instance, Allocation::Static(address)));
        let offsets = offset_assignments(self.config)?
            .into_iter()
            .map(|(instance, offset)| (instance, Allocation::Dynamic(offset)));

        Ok(statics
            .chain(offsets)
            .map(|(instance, allocation)| {
                let hostname = resolve_hostname(&instance).ok();
                let hosts_address = hostname.as_deref().and_then(|h| self.hosts.lookup(h));
                Assignment { instance, allocation, hostname, hosts_address }
            })
            .collect())
    }

    /// Write whichever stores were modified.
    #[instrument(skip(self))]
    pub fn commit(&mut self, backup: bool) -> Result<CommitOutcome> {
        let config_written = self.config.save(backup)?;
        let hosts_written = self.hosts.save(backup)?;
        Ok(CommitOutcome { config_written, hosts_written })
    }

    fn transaction<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let config = self.config.clone();
        let hosts = self.hosts.clone();
        op(self).inspect_err(|err| {
            warn!("Rolling back: {}", err);
            *self.config = config;
            *self.hosts = hosts;
        })
    }
}

fn static_assignments(config: &ConfigStore) -> Result<Vec<(String, Ipv4Addr)>> {
    config
        .entries(SECTION_STATIC_IPS)
        .into_iter()
        .map(|(instance, value)| {
            let address = value.parse().map_err(|_| {
                WslIpError::invalid_config(format!(
                    "[{}] {} = '{}': not an IPv4 address",
                    SECTION_STATIC_IPS, instance, value
                ))
            })?;
            Ok((instance.to_string(), address))
        })
        .collect()
}

fn offset_assignments(config: &ConfigStore) -> Result<Vec<(String, u32)>> {
    config
        .entries(SECTION_IP_OFFSETS)
        .into_iter()
        .map(|(instance, value)| match value.parse::<u32>() {
            Ok(offset) if offset > 0 => Ok((instance.to_string(), offset)),
            _ => Err(WslIpError::invalid_config(format!(
                "[{}] {} = '{}': not a positive offset",
                SECTION_IP_OFFSETS, instance, value
            ))),
        })
        .collect()
}

/// Another recorded instance whose hostname is `hostname`.
fn hostname_owner(config: &ConfigStore, hostname: &str, instance: &str) -> Option<String> {
    [SECTION_STATIC_IPS, SECTION_IP_OFFSETS]
        .iter()
        .flat_map(|section| config.entries(section))
        .map(|(name, _)| name)
        .filter(|name| !name.eq_ignore_ascii_case(instance))
        .find(|name| resolve_hostname(name).is_ok_and(|h| h == hostname))
        .map(str::to_string)
}

fn check_hostname_free(config: &ConfigStore, hostname: &str, instance: &str) -> Result<()> {
    match hostname_owner(config, hostname, instance) {
        Some(owner) => Err(WslIpError::Conflict { address: format!("hostname '{}'", hostname), owner }),
        None => Ok(()),
    }
}

/// Every static address other than `except`'s must remain a host of `subnet`.
fn check_stranded(subnet: &Subnet, existing: &[(String, Ipv4Addr)], except: Option<&str>) -> Result<()> {
    let allocator = AddressAllocator::new(*subnet);
    for (instance, address) in existing {
        if except.is_some_and(|name| name.eq_ignore_ascii_case(instance)) {
            continue;
        }
        if let Err(err) = allocator.validate_host(*address) {
            debug!("{} would be stranded: {}", instance, err);
            return Err(WslIpError::invalid_address(
                *address,
                format!("assigned to instance '{}' but not a usable host of {}", instance, subnet),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigDocument;
    use crate::hosts::HostsDocument;

    fn stores(config: &str, hosts: &str) -> (ConfigStore, HostsStore) {
        (
            ConfigStore::from_document("config", ConfigDocument::parse(config).unwrap()),
            HostsStore::from_document("hosts", HostsDocument::parse(hosts).unwrap()),
        )
    }

    const NETWORK: &str = "[network]\ngateway_ip = 172.16.0.1\nprefix_length = 24\n";

    #[test]
    fn test_resolve_hostname() {
        assert_eq!(resolve_hostname("Ubuntu-22.04").unwrap(), "ubuntu-22.04");
        assert_eq!(resolve_hostname("My Distro_1").unwrap(), "my-distro-1");
        assert_eq!(resolve_hostname("-.Debian.-").unwrap(), "debian");
        assert!(resolve_hostname("__").is_err());
        assert!(resolve_hostname("").is_err());
    }

    #[test]
    fn test_static_assign_is_idempotent() {
        let (mut config, mut hosts) = stores(NETWORK, "127.0.0.1 localhost\n");
        let mut reconciler = Reconciler::new(&mut config, &mut hosts);

        let first = reconciler.assign("Ubuntu", AssignmentRequest::Static { address: None }).unwrap();
        assert_eq!(first.allocation, Allocation::Static(Ipv4Addr::new(172, 16, 0, 2)));
        assert_eq!(first.hostname, "ubuntu");
        assert_eq!(first.windows_host_name, "windows");
        assert!(first.changed);

        let second = reconciler.assign("Ubuntu", AssignmentRequest::Static { address: None }).unwrap();
        assert_eq!(second.allocation, first.allocation);
        assert!(!second.changed);

        assert_eq!(config.get("static_ips", "Ubuntu"), Some("172.16.0.2"));
        assert_eq!(hosts.lookup("ubuntu"), Some(IpAddr::V4(Ipv4Addr::new(172, 16, 0, 2))));
    }

    #[test]
    fn test_static_without_gateway_is_rejected() {
        let (mut config, mut hosts) = stores("", "");
        let mut reconciler = Reconciler::new(&mut config, &mut hosts);
        let err = reconciler.assign("Ubuntu", AssignmentRequest::Static { address: None }).unwrap_err();
        assert!(matches!(err, WslIpError::InvalidConfig { .. }));
    }

    #[test]
    fn test_conflict_rolls_back() {
        let config_text = format!("{}\n[static_ips]\nDebian = 172.16.0.5\n", NETWORK);
        let (mut config, mut hosts) = stores(&config_text, "");
        let before = config.document().clone();
        let mut reconciler = Reconciler::new(&mut config, &mut hosts);

        let err = reconciler
            .assign_static("Ubuntu", Ipv4Addr::new(172, 16, 0, 1), 24, Some(Ipv4Addr::new(172, 16, 0, 5)))
            .unwrap_err();
        assert!(matches!(err, WslIpError::Conflict { ref owner, .. } if owner == "Debian"));

        assert_eq!(config.document(), &before);
        assert!(!config.is_modified());
        assert!(!hosts.is_modified());
    }

    #[test]
    fn test_subnet_change_must_not_strand_others() {
        let config_text = format!("{}\n[static_ips]\nDebian = 172.16.0.5\n", NETWORK);
        let (mut config, mut hosts) = stores(&config_text, "");
        let mut reconciler = Reconciler::new(&mut config, &mut hosts);

        let err = reconciler.assign_static("Ubuntu", Ipv4Addr::new(10, 0, 0, 1), 24, None).unwrap_err();
        assert!(matches!(err, WslIpError::InvalidAddress { ref reason, .. } if reason.contains("Debian")));

        // Moving the only static instance is fine
        let moved = reconciler.assign_static("Debian", Ipv4Addr::new(10, 0, 0, 1), 24, None).unwrap();
        assert_eq!(moved.allocation, Allocation::Static(Ipv4Addr::new(10, 0, 0, 2)));
        assert_eq!(config.get("network", "gateway_ip"), Some("10.0.0.1"));
    }

    #[test]
    fn test_mode_switch() {
        let (mut config, mut hosts) = stores(NETWORK, "");
        let mut reconciler = Reconciler::new(&mut config, &mut hosts);

        reconciler.assign("Ubuntu", AssignmentRequest::Static { address: None }).unwrap();
        let dynamic = reconciler.assign("Ubuntu", AssignmentRequest::Dynamic).unwrap();
        assert_eq!(dynamic.allocation, Allocation::Dynamic(1));
        assert!(dynamic.changed);
        assert_eq!(config.get("static_ips", "Ubuntu"), None);
        assert_eq!(config.get("ip_offsets", "Ubuntu"), Some("1"));
        assert_eq!(hosts.lookup("ubuntu"), None);

        let mut reconciler = Reconciler::new(&mut config, &mut hosts);
        reconciler.assign("Ubuntu", AssignmentRequest::Static { address: None }).unwrap();
        assert_eq!(config.get("ip_offsets", "Ubuntu"), None);
        assert_eq!(config.get("static_ips", "Ubuntu"), Some("172.16.0.2"));
    }

    #[test]
    fn test_dynamic_reassign_leaves_hosts_alone() {
        let (mut config, mut hosts) = stores("[ip_offsets]\nUbuntu = 1\n", "172.16.0.1  ubuntu\n");
        let mut reconciler = Reconciler::new(&mut config, &mut hosts);

        let assigned = reconciler.assign("Ubuntu", AssignmentRequest::Dynamic).unwrap();
        assert_eq!(assigned.allocation, Allocation::Dynamic(1));
        assert!(!assigned.changed);

        assert!(!config.is_modified());
        assert!(!hosts.is_modified());
        assert_eq!(hosts.lookup("ubuntu"), Some(IpAddr::V4(Ipv4Addr::new(172, 16, 0, 1))));
    }

    #[test]
    fn test_colliding_hostnames_are_rejected() {
        let (mut config, mut hosts) = stores(NETWORK, "");
        let mut reconciler = Reconciler::new(&mut config, &mut hosts);
        reconciler.assign("My Distro", AssignmentRequest::Static { address: None }).unwrap();

        let err = reconciler.assign("My_Distro", AssignmentRequest::Static { address: None }).unwrap_err();
        assert!(matches!(err, WslIpError::Conflict { ref owner, .. } if owner == "My Distro"));
        let err = reconciler.assign("my-distro", AssignmentRequest::Dynamic).unwrap_err();
        assert!(matches!(err, WslIpError::Conflict { .. }));

        // Same instance under a different case is not a collision
        let again = reconciler.assign("MY DISTRO", AssignmentRequest::Static { address: None }).unwrap();
        assert!(!again.changed);

        assert_eq!(config.get("static_ips", "My_Distro"), None);
        assert_eq!(config.get("ip_offsets", "My_Distro"), None);
        assert_eq!(config.entries("static_ips"), vec![("My Distro", "172.16.0.2")]);
        assert_eq!(hosts.lookup("my-distro"), Some(IpAddr::V4(Ipv4Addr::new(172, 16, 0, 2))));
    }

    #[test]
    fn test_release_keeps_binding_of_colliding_instance() {
        let config_text = format!("{}\n[static_ips]\nMy Distro = 172.16.0.2\n\n[ip_offsets]\nMy_Distro = 1\n", NETWORK);
        let (mut config, mut hosts) = stores(&config_text, "172.16.0.2  my-distro\n");
        let mut reconciler = Reconciler::new(&mut config, &mut hosts);

        let outcome = reconciler.release("My_Distro").unwrap();
        assert!(outcome.changed);
        assert_eq!(config.get("ip_offsets", "My_Distro"), None);
        assert!(!hosts.is_modified());
        assert_eq!(hosts.lookup("my-distro"), Some(IpAddr::V4(Ipv4Addr::new(172, 16, 0, 2))));

        let mut reconciler = Reconciler::new(&mut config, &mut hosts);
        reconciler.release("My Distro").unwrap();
        assert_eq!(hosts.lookup("my-distro"), None);
    }

    #[test]
    fn test_release_signals_network_clearable() {
        let (mut config, mut hosts) = stores(NETWORK, "");
        let mut reconciler = Reconciler::new(&mut config, &mut hosts);
        reconciler.assign("A", AssignmentRequest::Static { address: None }).unwrap();
        reconciler.assign("B", AssignmentRequest::Static { address: None }).unwrap();

        let outcome = reconciler.release("A").unwrap();
        assert_eq!(outcome, ReleaseOutcome { changed: true, network_clearable: false });

        assert!(matches!(reconciler.clear_network(), Err(WslIpError::Conflict { .. })));

        let outcome = reconciler.release("B").unwrap();
        assert_eq!(outcome, ReleaseOutcome { changed: true, network_clearable: true });
        assert!(!reconciler.release("B").unwrap().changed);

        assert!(reconciler.clear_network().unwrap());
        assert!(!reconciler.clear_network().unwrap());
        assert_eq!(config.section_count("network"), 0);
    }

    #[test]
    fn test_update_network_validates_static_addresses() {
        let config_text = format!("{}\n[static_ips]\nDebian = 172.16.0.200\n", NETWORK);
        let (mut config, mut hosts) = stores(&config_text, "");
        let mut reconciler = Reconciler::new(&mut config, &mut hosts);

        let shrink = NetworkUpdate { prefix_length: Some(25), ..Default::default() };
        assert!(matches!(reconciler.update_network(&shrink), Err(WslIpError::InvalidAddress { .. })));

        let names = NetworkUpdate { windows_host_name: Some("hostpc".into()), ..Default::default() };
        assert!(reconciler.update_network(&names).unwrap());
        assert_eq!(config.get("network", "prefix_length"), Some("24"));
        assert_eq!(config.get("network", "windows_host_name"), Some("hostpc"));
    }

    #[test]
    fn test_assignments_listing() {
        let config_text = format!(
            "{}\n[ip_offsets]\nAlpine = 3\n\n[static_ips]\nDebian = 172.16.0.5\n",
            NETWORK
        );
        let (mut config, mut hosts) = stores(&config_text, "172.16.0.5  debian\n");
        let reconciler = Reconciler::new(&mut config, &mut hosts);

        let listed = reconciler.assignments().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].instance, "Debian");
        assert_eq!(listed[0].hosts_address, Some(IpAddr::V4(Ipv4Addr::new(172, 16, 0, 5))));
        assert_eq!(listed[1].allocation, Allocation::Dynamic(3));
        assert_eq!(listed[1].hosts_address, None);
    }

    #[test]
    fn test_allocation_serialization() {
        let value = serde_json::to_value(Allocation::Static(Ipv4Addr::new(172, 16, 0, 2))).unwrap();
        assert_eq!(value, serde_json::json!({ "mode": "static", "value": "172.16.0.2" }));
        let value = serde_json::to_value(Allocation::Dynamic(4)).unwrap();
        assert_eq!(value, serde_json::json!({ "mode": "dynamic", "value": 4 }));
        assert_eq!(Allocation::Dynamic(4).to_string(), "4");
    }

    #[test]
    fn test_malformed_stored_values() {
        let (mut config, mut hosts) = stores("[static_ips]\nDebian = nope\n", "");
        let reconciler = Reconciler::new(&mut config, &mut hosts);
        assert!(matches!(reconciler.assignments(), Err(WslIpError::InvalidConfig { .. })));

        let (mut config, mut hosts) = stores("[ip_offsets]\nDebian = 0\n", "");
        let mut reconciler = Reconciler::new(&mut config, &mut hosts);
        assert!(matches!(reconciler.assign_dynamic("Ubuntu"), Err(WslIpError::InvalidConfig { .. })));
    }
}
