//! Link objects: the one kind fed by two independent sources.
//!
//! A link is reported both by the kernel event stream (the netlink aspect)
//! and by device discovery (the udev aspect), and the two race freely. The
//! cache therefore keeps a link alive as long as *either* source still
//! knows it: a link that netlink already dropped but that still has a
//! device record is a ghost, alive but not visible.

use std::fmt;
use std::rc::Rc;

use super::device::DeviceRecord;

/// Identity of a link: the kernel interface index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkId {
    /// Interface index.
    pub ifindex: i32,
}

impl LinkId {
    /// Identity of the link with the given interface index.
    pub fn new(ifindex: i32) -> Self {
        Self { ifindex }
    }
}

/// Kind of a network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkType {
    /// Not (yet) detected.
    #[default]
    Unknown,
    Ethernet,
    Infiniband,
    Loopback,
    Bridge,
    Bond,
    Vlan,
    Veth,
    Dummy,
    Tun,
    Macvlan,
    Vxlan,
}

impl LinkType {
    /// Map an rtnetlink kind string (IFLA_INFO_KIND) to a link type.
    pub fn from_kind_str(kind: &str) -> Self {
        match kind {
            "bridge" => LinkType::Bridge,
            "bond" => LinkType::Bond,
            "vlan" => LinkType::Vlan,
            "veth" => LinkType::Veth,
            "dummy" => LinkType::Dummy,
            "tun" => LinkType::Tun,
            "macvlan" | "macvtap" => LinkType::Macvlan,
            "vxlan" => LinkType::Vxlan,
            _ => LinkType::Unknown,
        }
    }

    /// Lower-case name, matching the rtnetlink kind vocabulary.
    pub fn as_str(self) -> &'static str {
        match self {
            LinkType::Unknown => "unknown",
            LinkType::Ethernet => "ethernet",
            LinkType::Infiniband => "infiniband",
            LinkType::Loopback => "loopback",
            LinkType::Bridge => "bridge",
            LinkType::Bond => "bond",
            LinkType::Vlan => "vlan",
            LinkType::Veth => "veth",
            LinkType::Dummy => "dummy",
            LinkType::Tun => "tun",
            LinkType::Macvlan => "macvlan",
            LinkType::Vxlan => "vxlan",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public link attributes: what consumers of the cache observe.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkState {
    /// Interface name.
    pub name: String,
    /// Device kind.
    pub link_type: LinkType,
    /// Administratively up (IFF_UP).
    pub up: bool,
    /// Carrier present. For device kinds without a meaningful lower layer
    /// (bridges and bonds without ports) the source adapter coerces the
    /// kernel's native flag before storing it here.
    pub connected: bool,
    /// Participates in ARP (IFF_NOARP not set).
    pub arp: bool,
    /// Maximum transmission unit.
    pub mtu: u32,
    /// Controller interface index, 0 if none.
    pub master: i32,
    /// Parent interface index for stacked devices, 0 if none.
    pub parent: i32,
    /// Kernel driver name, when known.
    pub driver: Option<String>,
}

/// Link data owned by the netlink source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkNetlink {
    /// Whether the kernel currently reports this link. A link no longer in
    /// netlink that still has a device record is a ghost: alive, not
    /// visible.
    pub in_netlink: bool,
    /// The carrier flag exactly as netlink reports it, before any coercion
    /// into [`LinkState::connected`].
    pub carrier_native: bool,
    /// ARP hardware type (ARPHRD_*).
    pub arptype: u16,
    /// rtnetlink kind string (e.g. "veth", "bridge"), when reported.
    pub kind: Option<String>,
}

/// A link object: identity plus the public, netlink and udev aspects.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    /// Immutable identity.
    pub id: LinkId,
    /// Public aspect.
    pub state: LinkState,
    /// Netlink aspect.
    pub netlink: LinkNetlink,
    /// Udev aspect: the device-discovery record, compared by handle
    /// identity (see [`DeviceRecord`]).
    pub udev: Option<Rc<DeviceRecord>>,
}

impl Link {
    /// A link with the given interface index and everything else unset.
    pub fn new(ifindex: i32) -> Self {
        Self {
            id: LinkId::new(ifindex),
            state: LinkState::default(),
            netlink: LinkNetlink::default(),
            udev: None,
        }
    }

    /// Set the interface name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.state.name = name.into();
        self
    }

    /// Set the device kind.
    pub fn link_type(mut self, link_type: LinkType) -> Self {
        self.state.link_type = link_type;
        self
    }

    /// Set the administrative up flag.
    pub fn up(mut self, up: bool) -> Self {
        self.state.up = up;
        self
    }

    /// Set the (coerced) carrier flag.
    pub fn connected(mut self, connected: bool) -> Self {
        self.state.connected = connected;
        self
    }

    /// Set the MTU.
    pub fn mtu(mut self, mtu: u32) -> Self {
        self.state.mtu = mtu;
        self
    }

    /// Set the controller interface index.
    pub fn master(mut self, master: i32) -> Self {
        self.state.master = master;
        self
    }

    /// Set the driver name.
    pub fn driver(mut self, driver: impl Into<String>) -> Self {
        self.state.driver = Some(driver.into());
        self
    }

    /// Mark the link as (not) reported by the netlink source.
    pub fn in_netlink(mut self, in_netlink: bool) -> Self {
        self.netlink.in_netlink = in_netlink;
        self
    }

    /// Set the native carrier flag of the netlink aspect.
    pub fn carrier_native(mut self, carrier: bool) -> Self {
        self.netlink.carrier_native = carrier;
        self
    }

    /// Set the ARP hardware type of the netlink aspect.
    pub fn arptype(mut self, arptype: u16) -> Self {
        self.netlink.arptype = arptype;
        self
    }

    /// Set the rtnetlink kind string of the netlink aspect.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.netlink.kind = Some(kind.into());
        self
    }

    /// Attach a device-discovery record as the udev aspect.
    pub fn udev(mut self, record: Rc<DeviceRecord>) -> Self {
        self.udev = Some(record);
        self
    }

    /// Alive while either source still knows the link.
    pub fn is_alive(&self) -> bool {
        self.netlink.in_netlink || self.udev.is_some()
    }

    /// Visible only while the kernel reports it.
    pub fn is_visible(&self) -> bool {
        self.netlink.in_netlink
    }

    /// Whether this link is a ghost: alive through its device record only.
    pub fn is_ghost(&self) -> bool {
        self.is_alive() && !self.is_visible()
    }

    pub(crate) fn udev_aspect_eq(&self, other: &Link) -> bool {
        match (&self.udev, &other.udev) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.state.up {
            flags.push("up");
        }
        if self.state.connected {
            flags.push("carrier");
        }
        if self.is_ghost() {
            flags.push("ghost");
        }
        write!(
            f,
            "{}: {} <{}> mtu {} type {}",
            self.id.ifindex,
            if self.state.name.is_empty() {
                "?"
            } else {
                self.state.name.as_str()
            },
            flags.join(","),
            self.state.mtu,
            self.state.link_type,
        )?;
        if self.state.master != 0 {
            write!(f, " master {}", self.state.master)?;
        }
        if let Some(driver) = &self.state.driver {
            write!(f, " driver {driver}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliveness_follows_both_sources() {
        let mut link = Link::new(3).name("eth0").in_netlink(true);
        assert!(link.is_alive());
        assert!(link.is_visible());
        assert!(!link.is_ghost());

        link.netlink.in_netlink = false;
        assert!(!link.is_alive());

        link.udev = Some(Rc::new(DeviceRecord::synthetic(
            "/devices/pci0000:00/net/eth0",
            "net",
        )));
        assert!(link.is_alive());
        assert!(!link.is_visible());
        assert!(link.is_ghost());
    }

    #[test]
    fn link_type_from_kind_str() {
        assert_eq!(LinkType::from_kind_str("veth"), LinkType::Veth);
        assert_eq!(LinkType::from_kind_str("macvtap"), LinkType::Macvlan);
        assert_eq!(LinkType::from_kind_str("wireguard"), LinkType::Unknown);
    }

    #[test]
    fn display_is_one_line() {
        let link = Link::new(2)
            .name("eth0")
            .link_type(LinkType::Ethernet)
            .up(true)
            .connected(true)
            .mtu(1500)
            .in_netlink(true);
        assert_eq!(link.to_string(), "2: eth0 <up,carrier> mtu 1500 type ethernet");
    }
}
