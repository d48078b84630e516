//! IPv4 and IPv6 route objects.
//!
//! Routes are reported by the netlink source only, but not every route in
//! the model has the same standing. Routes the daemon synthesizes for its
//! own bookkeeping ([`ConfigSource::Internal`]) have no kernel lifecycle
//! at all and are never alive; routes the kernel manages on its own
//! ([`ConfigSource::Kernel`]) are alive but kept out of the visible route
//! views, so consumers are not flooded with kernel-managed noise.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use super::object::ConfigSource;

/// Identity of an IPv4 route: interface, destination network, prefix
/// length and metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ip4RouteId {
    /// Output interface index.
    pub ifindex: i32,
    /// Destination network.
    pub network: Ipv4Addr,
    /// Prefix length (0-32); 0 is the default route.
    pub plen: u8,
    /// Route metric (priority).
    pub metric: u32,
}

impl Ip4RouteId {
    /// Identity for `network/plen` with the given metric on an interface.
    pub fn new(ifindex: i32, network: Ipv4Addr, plen: u8, metric: u32) -> Self {
        Self {
            ifindex,
            network,
            plen,
            metric,
        }
    }

    /// Whether this is a default route.
    pub fn is_default(&self) -> bool {
        self.plen == 0
    }
}

/// Identity of an IPv6 route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ip6RouteId {
    /// Output interface index.
    pub ifindex: i32,
    /// Destination network.
    pub network: Ipv6Addr,
    /// Prefix length (0-128); 0 is the default route.
    pub plen: u8,
    /// Route metric (priority).
    pub metric: u32,
}

impl Ip6RouteId {
    /// Identity for `network/plen` with the given metric on an interface.
    pub fn new(ifindex: i32, network: Ipv6Addr, plen: u8, metric: u32) -> Self {
        Self {
            ifindex,
            network,
            plen,
            metric,
        }
    }

    /// Whether this is a default route.
    pub fn is_default(&self) -> bool {
        self.plen == 0
    }
}

/// Mutable attributes of an IPv4 route.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ip4RouteState {
    /// Who installed the route.
    pub source: ConfigSource,
    /// Gateway, if the route is not directly connected.
    pub gateway: Option<Ipv4Addr>,
    /// Preferred source address.
    pub pref_src: Option<Ipv4Addr>,
    /// Maximum segment size, 0 if unset.
    pub mss: u32,
}

/// Mutable attributes of an IPv6 route.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ip6RouteState {
    /// Who installed the route.
    pub source: ConfigSource,
    /// Gateway, if the route is not directly connected.
    pub gateway: Option<Ipv6Addr>,
    /// Maximum segment size, 0 if unset.
    pub mss: u32,
}

/// An IPv4 route object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ip4Route {
    /// Immutable identity.
    pub id: Ip4RouteId,
    /// Public aspect.
    pub state: Ip4RouteState,
}

impl Ip4Route {
    /// A route with default attributes.
    pub fn new(ifindex: i32, network: Ipv4Addr, plen: u8, metric: u32) -> Self {
        Self {
            id: Ip4RouteId::new(ifindex, network, plen, metric),
            state: Ip4RouteState::default(),
        }
    }

    /// Set who installed the route.
    pub fn source(mut self, source: ConfigSource) -> Self {
        self.state.source = source;
        self
    }

    /// Set the gateway.
    pub fn gateway(mut self, gateway: Ipv4Addr) -> Self {
        self.state.gateway = Some(gateway);
        self
    }

    /// Set the preferred source address.
    pub fn pref_src(mut self, pref_src: Ipv4Addr) -> Self {
        self.state.pref_src = Some(pref_src);
        self
    }

    /// Set the maximum segment size.
    pub fn mss(mut self, mss: u32) -> Self {
        self.state.mss = mss;
        self
    }

    /// Whether this is a default route.
    pub fn is_default(&self) -> bool {
        self.id.is_default()
    }

    /// Routes synthesized by the daemon itself have no kernel lifecycle to
    /// track and are never alive.
    pub fn is_alive(&self) -> bool {
        self.state.source != ConfigSource::Internal
    }

    /// Kernel-managed routes are alive but not surfaced to consumers.
    pub fn is_visible(&self) -> bool {
        !matches!(
            self.state.source,
            ConfigSource::Internal | ConfigSource::Kernel
        )
    }
}

/// An IPv6 route object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ip6Route {
    /// Immutable identity.
    pub id: Ip6RouteId,
    /// Public aspect.
    pub state: Ip6RouteState,
}

impl Ip6Route {
    /// A route with default attributes.
    pub fn new(ifindex: i32, network: Ipv6Addr, plen: u8, metric: u32) -> Self {
        Self {
            id: Ip6RouteId::new(ifindex, network, plen, metric),
            state: Ip6RouteState::default(),
        }
    }

    /// Set who installed the route.
    pub fn source(mut self, source: ConfigSource) -> Self {
        self.state.source = source;
        self
    }

    /// Set the gateway.
    pub fn gateway(mut self, gateway: Ipv6Addr) -> Self {
        self.state.gateway = Some(gateway);
        self
    }

    /// Set the maximum segment size.
    pub fn mss(mut self, mss: u32) -> Self {
        self.state.mss = mss;
        self
    }

    /// Whether this is a default route.
    pub fn is_default(&self) -> bool {
        self.id.is_default()
    }

    /// Routes synthesized by the daemon itself have no kernel lifecycle to
    /// track and are never alive.
    pub fn is_alive(&self) -> bool {
        self.state.source != ConfigSource::Internal
    }

    /// Kernel-managed routes are alive but not surfaced to consumers.
    pub fn is_visible(&self) -> bool {
        !matches!(
            self.state.source,
            ConfigSource::Internal | ConfigSource::Kernel
        )
    }
}

impl fmt::Display for Ip4Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            f.write_str("default")?;
        } else {
            write!(f, "{}/{}", self.id.network, self.id.plen)?;
        }
        if let Some(gateway) = self.state.gateway {
            write!(f, " via {gateway}")?;
        }
        write!(
            f,
            " dev {} metric {} {}",
            self.id.ifindex, self.id.metric, self.state.source,
        )
    }
}

impl fmt::Display for Ip6Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            f.write_str("default")?;
        } else {
            write!(f, "{}/{}", self.id.network, self.id.plen)?;
        }
        if let Some(gateway) = self.state.gateway {
            write!(f, " via {gateway}")?;
        }
        write!(
            f,
            " dev {} metric {} {}",
            self.id.ifindex, self.id.metric, self.state.source,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_routes_are_dead() {
        let route = Ip4Route::new(1, Ipv4Addr::new(10, 0, 0, 0), 8, 100)
            .source(ConfigSource::Internal);
        assert!(!route.is_alive());
        assert!(!route.is_visible());
    }

    #[test]
    fn kernel_routes_are_alive_but_hidden() {
        let route = Ip4Route::new(1, Ipv4Addr::new(10, 0, 0, 0), 8, 100)
            .source(ConfigSource::Kernel);
        assert!(route.is_alive());
        assert!(!route.is_visible());
    }

    #[test]
    fn default_route_is_plen_zero() {
        assert!(Ip4Route::new(1, Ipv4Addr::UNSPECIFIED, 0, 100).is_default());
        assert!(!Ip4Route::new(1, Ipv4Addr::new(10, 0, 0, 0), 8, 100).is_default());
    }

    #[test]
    fn display_route() {
        let route = Ip4Route::new(2, Ipv4Addr::new(192, 168, 2, 0), 24, 100)
            .gateway(Ipv4Addr::new(192, 168, 1, 1))
            .source(ConfigSource::Static);
        assert_eq!(
            route.to_string(),
            "192.168.2.0/24 via 192.168.1.1 dev 2 metric 100 static"
        );
    }
}
