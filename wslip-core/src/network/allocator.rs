//! IP Address Management (IPAM) for WSL instances.
//!
//! Two modes are supported:
//! - **Static**: the instance gets a fixed address inside the adapter subnet.
//! - **Dynamic**: the instance gets a small integer offset that the runtime
//!   script adds to the active subnet's network address at start time.

use super::subnet::Subnet;
use crate::error::{Result, WslIpError};
use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use tracing::{debug, info, instrument};

/// Address allocator for WSL instances.
///
/// Stateless apart from the subnet: existing assignments are passed in by
/// the caller, who owns the config file they come from.
#[derive(Debug, Clone, Copy)]
pub struct AddressAllocator {
    subnet: Subnet,
}

impl AddressAllocator {
    /// Create an allocator for static addresses in `subnet`.
    pub fn new(subnet: Subnet) -> Self {
        Self { subnet }
    }

    pub fn subnet(&self) -> &Subnet {
        &self.subnet
    }

    /// Resolve the static address for an instance.
    ///
    /// # Arguments
    ///
    /// * `instance` - WSL instance name (compared case-insensitively)
    /// * `requested` - address asked for explicitly, if any
    /// * `existing` - current `(instance, address)` assignments
    ///
    /// An explicit request wins as long as it is a host address of the
    /// subnet, is not the gateway and is not owned by another instance.
    /// Without a request the instance keeps a still-valid address it already
    /// owns, otherwise it gets the first free address from `network + 2`.
    ///
    /// # Errors
    ///
    /// - `WslIpError::InvalidAddress` if the requested address is unusable
    /// - `WslIpError::Conflict` if it belongs to another instance
    /// - `WslIpError::AddressSpaceExhausted` if no address is free
    #[instrument(skip(self, existing), fields(subnet = %self.subnet))]
    pub fn resolve_static(
        &self,
        instance: &str,
        requested: Option<Ipv4Addr>,
        existing: &[(String, Ipv4Addr)],
    ) -> Result<Ipv4Addr> {
        let owner_of = |address: Ipv4Addr| {
            existing
                .iter()
                .find(|(name, addr)| *addr == address && !name.eq_ignore_ascii_case(instance))
                .map(|(name, _)| name.clone())
        };

        if let Some(address) = requested {
            self.validate_host(address)?;
            if let Some(owner) = owner_of(address) {
                return Err(WslIpError::Conflict { address: address.to_string(), owner });
            }
            info!("Using requested address {} for {}", address, instance);
            return Ok(address);
        }

        let own = existing.iter().find(|(name, _)| name.eq_ignore_ascii_case(instance)).map(|(_, a)| *a);
        if let Some(address) = own {
            if self.validate_host(address).is_ok() && owner_of(address).is_none() {
                debug!("Instance {} keeps its address {}", instance, address);
                return Ok(address);
            }
        }

        let taken: BTreeSet<Ipv4Addr> = existing
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(instance))
            .map(|(_, addr)| *addr)
            .collect();

        let address = self
            .subnet
            .assignable()
            .find(|addr| !taken.contains(addr))
            .ok_or_else(|| WslIpError::AddressSpaceExhausted { subnet: self.subnet.to_string() })?;

        info!("Allocated address {} to {}", address, instance);
        Ok(address)
    }

    /// Resolve the dynamic offset for an instance.
    ///
    /// An instance keeps the offset it already has. A new instance gets the
    /// smallest positive offset not in use, so released offsets are reused.
    #[instrument(skip(existing))]
    pub fn resolve_offset(instance: &str, existing: &[(String, u32)]) -> u32 {
        if let Some((_, offset)) = existing.iter().find(|(name, _)| name.eq_ignore_ascii_case(instance)) {
            debug!("Instance {} keeps offset {}", instance, offset);
            return *offset;
        }

        let used: BTreeSet<u32> = existing.iter().map(|(_, offset)| *offset).collect();
        let offset = (1..).find(|candidate| !used.contains(candidate)).unwrap_or(u32::MAX);

        info!("Allocated offset {} to {}", offset, instance);
        offset
    }

    /// Check that `address` may be assigned to an instance.
    pub fn validate_host(&self, address: Ipv4Addr) -> Result<()> {
        if !self.subnet.contains_host(address) {
            return Err(WslIpError::invalid_address(
                address,
                format!("not a host address of {}", self.subnet),
            ));
        }
        if address == self.subnet.gateway() {
            return Err(WslIpError::invalid_address(address, "address is the gateway"));
        }
        Ok(())
    }
}
