//! IPv4 and IPv6 address objects.
//!
//! Addresses are reported exclusively by the netlink source, so they carry
//! a single public aspect. Their existence in the cache *is* their
//! aliveness: an address the kernel no longer reports is removed, never
//! ghosted.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use super::object::ConfigSource;

/// Lifetime value meaning "forever" (static addresses).
pub const LIFETIME_PERMANENT: u32 = u32::MAX;

/// Identity of an IPv4 address: interface, address and prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ip4AddressId {
    /// Interface index the address is configured on.
    pub ifindex: i32,
    /// The address itself.
    pub address: Ipv4Addr,
    /// Prefix length (0-32).
    pub plen: u8,
}

impl Ip4AddressId {
    /// Identity for `address/plen` on the given interface.
    pub fn new(ifindex: i32, address: Ipv4Addr, plen: u8) -> Self {
        Self {
            ifindex,
            address,
            plen,
        }
    }
}

/// Identity of an IPv6 address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ip6AddressId {
    /// Interface index the address is configured on.
    pub ifindex: i32,
    /// The address itself.
    pub address: Ipv6Addr,
    /// Prefix length (0-128).
    pub plen: u8,
}

impl Ip6AddressId {
    /// Identity for `address/plen` on the given interface.
    pub fn new(ifindex: i32, address: Ipv6Addr, plen: u8) -> Self {
        Self {
            ifindex,
            address,
            plen,
        }
    }
}

/// Mutable attributes of an IPv4 address.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ip4AddressState {
    /// Who configured the address.
    pub source: ConfigSource,
    /// Seconds since boot when the kernel last reported the address.
    pub timestamp: u32,
    /// Valid lifetime in seconds; [`LIFETIME_PERMANENT`] for static.
    pub lifetime: u32,
    /// Preferred lifetime in seconds.
    pub preferred: u32,
    /// Peer address for point-to-point links.
    pub peer: Option<Ipv4Addr>,
    /// Address label, when set.
    pub label: Option<String>,
}

/// Mutable attributes of an IPv6 address.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ip6AddressState {
    /// Who configured the address.
    pub source: ConfigSource,
    /// Seconds since boot when the kernel last reported the address.
    pub timestamp: u32,
    /// Valid lifetime in seconds; [`LIFETIME_PERMANENT`] for static.
    pub lifetime: u32,
    /// Preferred lifetime in seconds.
    pub preferred: u32,
    /// Address flags (IFA_F_*).
    pub flags: u32,
}

/// An IPv4 address object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ip4Address {
    /// Immutable identity.
    pub id: Ip4AddressId,
    /// Public aspect.
    pub state: Ip4AddressState,
}

impl Ip4Address {
    /// An address with default attributes.
    pub fn new(ifindex: i32, address: Ipv4Addr, plen: u8) -> Self {
        Self {
            id: Ip4AddressId::new(ifindex, address, plen),
            state: Ip4AddressState::default(),
        }
    }

    /// Set the configuration source.
    pub fn source(mut self, source: ConfigSource) -> Self {
        self.state.source = source;
        self
    }

    /// Set valid and preferred lifetimes.
    pub fn lifetime(mut self, lifetime: u32, preferred: u32) -> Self {
        self.state.lifetime = lifetime;
        self.state.preferred = preferred;
        self
    }

    /// Set the point-to-point peer.
    pub fn peer(mut self, peer: Ipv4Addr) -> Self {
        self.state.peer = Some(peer);
        self
    }

    /// Set the address label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.state.label = Some(label.into());
        self
    }
}

/// An IPv6 address object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ip6Address {
    /// Immutable identity.
    pub id: Ip6AddressId,
    /// Public aspect.
    pub state: Ip6AddressState,
}

impl Ip6Address {
    /// An address with default attributes.
    pub fn new(ifindex: i32, address: Ipv6Addr, plen: u8) -> Self {
        Self {
            id: Ip6AddressId::new(ifindex, address, plen),
            state: Ip6AddressState::default(),
        }
    }

    /// Set the configuration source.
    pub fn source(mut self, source: ConfigSource) -> Self {
        self.state.source = source;
        self
    }

    /// Set valid and preferred lifetimes.
    pub fn lifetime(mut self, lifetime: u32, preferred: u32) -> Self {
        self.state.lifetime = lifetime;
        self.state.preferred = preferred;
        self
    }

    /// Set the address flags.
    pub fn flags(mut self, flags: u32) -> Self {
        self.state.flags = flags;
        self
    }
}

impl fmt::Display for Ip4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} dev {} {}",
            self.id.address, self.id.plen, self.id.ifindex, self.state.source,
        )?;
        if let Some(label) = &self.state.label {
            write!(f, " label {label}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Ip6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} dev {} {}",
            self.id.address, self.id.plen, self.id.ifindex, self.state.source,
        )
    }
}
