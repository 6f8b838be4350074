//! Subnet arithmetic for the WSL adapter network.
//!
//! The subnet is never stored; it is derived from the configured gateway and
//! prefix length whenever it is needed.

use crate::error::{Result, WslIpError};
use ipnet::Ipv4Net;
use std::fmt;
use std::net::Ipv4Addr;

/// Smallest prefix length accepted for the adapter network.
pub const MIN_PREFIX_LENGTH: u8 = 1;
/// Largest prefix length that still leaves room for the gateway and one host.
pub const MAX_PREFIX_LENGTH: u8 = 30;

/// IPv4 subnet with the gateway that lives in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subnet {
    net: Ipv4Net,
    gateway: Ipv4Addr,
}

impl Subnet {
    /// Derive the subnet from the gateway address and prefix length.
    ///
    /// # Errors
    ///
    /// Returns `WslIpError::InvalidAddress` if the prefix length is outside
    /// `1..=30` or the gateway is the network or broadcast address.
    pub fn new(gateway: Ipv4Addr, prefix_length: u8) -> Result<Self> {
        if !(MIN_PREFIX_LENGTH..=MAX_PREFIX_LENGTH).contains(&prefix_length) {
            return Err(WslIpError::invalid_address(
                gateway,
                format!(
                    "prefix length {} is outside {}..={}",
                    prefix_length, MIN_PREFIX_LENGTH, MAX_PREFIX_LENGTH
                ),
            ));
        }

        let net = Ipv4Net::new(gateway, prefix_length)
            .map_err(|e| WslIpError::invalid_address(gateway, e.to_string()))?
            .trunc();
        let subnet = Self { net, gateway };

        if !subnet.contains_host(gateway) {
            return Err(WslIpError::invalid_address(
                gateway,
                format!("gateway cannot be the network or broadcast address of {}", subnet),
            ));
        }
        Ok(subnet)
    }

    pub fn network(&self) -> Ipv4Addr {
        self.net.network()
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        self.net.broadcast()
    }

    pub fn gateway(&self) -> Ipv4Addr {
        self.gateway
    }

    pub fn prefix_length(&self) -> u8 {
        self.net.prefix_len()
    }

    /// Dotted netmask, e.g. `255.255.255.0`.
    pub fn netmask(&self) -> Ipv4Addr {
        self.net.netmask()
    }

    /// Whether `address` is a host address of this subnet, i.e. strictly
    /// between the network and broadcast addresses.
    pub fn contains_host(&self, address: Ipv4Addr) -> bool {
        address > self.network() && address < self.broadcast()
    }

    /// Addresses handed out automatically: `network + 2` up to
    /// `broadcast - 1`, gateway excluded.
    pub fn assignable(&self) -> impl Iterator<Item = Ipv4Addr> {
        let first = u32::from(self.network()) + 2;
        let last = u32::from(self.broadcast()) - 1;
        let gateway = self.gateway;
        (first..=last).map(Ipv4Addr::from).filter(move |addr| *addr != gateway)
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}

/// Whether `address` is a usable host address of the subnet described by
/// `gateway`/`prefix_length`. Always false for an invalid subnet.
pub fn is_within_subnet(address: Ipv4Addr, gateway: Ipv4Addr, prefix_length: u8) -> bool {
    Subnet::new(gateway, prefix_length).map(|subnet| subnet.contains_host(address)).unwrap_or(false)
}
