//! The polymorphic network-object model.
//!
//! Five kinds of objects share one representation: links, IPv4/IPv6
//! addresses and IPv4/IPv6 routes. Every object splits into an immutable
//! identity ([`ObjectId`]) and mutable aspect data; the cache keys its
//! primary index on the identity and only ever rewrites aspect data in
//! place, so a cached object can never change identity under the index.
//!
//! Identity values are small `Copy` probes: looking up "does ifindex 5
//! exist?" builds an [`ObjectId`] on the stack and touches no heap. Since
//! a probe is a different type from an owned [`Object`], it cannot be
//! inserted into a cache or reference-counted by mistake.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::Ipv6Addr;

use super::address::{Ip4Address, Ip4AddressId, Ip6Address, Ip6AddressId};
use super::link::{Link, LinkId};
use super::route::{Ip4Route, Ip4RouteId, Ip6Route, Ip6RouteId};

/// The closed set of object kinds held by the platform cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    Link,
    Ip4Address,
    Ip6Address,
    Ip4Route,
    Ip6Route,
}

impl ObjectKind {
    /// All kinds, in a stable order.
    pub const ALL: [ObjectKind; 5] = [
        ObjectKind::Link,
        ObjectKind::Ip4Address,
        ObjectKind::Ip6Address,
        ObjectKind::Ip4Route,
        ObjectKind::Ip6Route,
    ];

    /// Whether this kind splits its data into independently-owned source
    /// aspects. Only links are fed by two racing sources (netlink and
    /// device discovery); every other kind has a single public aspect.
    pub fn has_source_aspects(self) -> bool {
        matches!(self, ObjectKind::Link)
    }

    /// Whether this kind is a route kind.
    pub fn is_route(self) -> bool {
        matches!(self, ObjectKind::Ip4Route | ObjectKind::Ip6Route)
    }

    /// Whether this kind is an address kind.
    pub fn is_address(self) -> bool {
        matches!(self, ObjectKind::Ip4Address | ObjectKind::Ip6Address)
    }
}

/// Internet protocol family of an address or route kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressFamily {
    V4,
    V6,
}

/// Who configured an address or installed a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigSource {
    /// Origin not known.
    #[default]
    Unknown,
    /// Synthesized by the daemon for its own bookkeeping; such entries
    /// have no kernel lifecycle at all.
    Internal,
    /// Managed by the kernel's own networking logic (RTPROT_KERNEL).
    Kernel,
    /// Installed during boot.
    Boot,
    /// Statically configured.
    Static,
    /// Learned via DHCP.
    Dhcp,
    /// Learned via IPv6 router advertisement.
    Ra,
    /// Added by an administrator.
    User,
}

impl ConfigSource {
    /// Lower-case name, in `ip route` "proto" vocabulary.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigSource::Unknown => "unknown",
            ConfigSource::Internal => "internal",
            ConfigSource::Kernel => "kernel",
            ConfigSource::Boot => "boot",
            ConfigSource::Static => "static",
            ConfigSource::Dhcp => "dhcp",
            ConfigSource::Ra => "ra",
            ConfigSource::User => "user",
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bitmask selecting independently-owned subsets of an object's data.
///
/// Source adapters pass the aspects they actually observed: the netlink
/// translator updates links with [`Aspects::NETLINK`] (usually together
/// with [`Aspects::PUBLIC`]), device discovery with [`Aspects::UDEV`].
/// Kinds without source aspects treat `PUBLIC | NETLINK` as "the whole
/// object" and anything else as identity-only.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aspects(u8);

impl Aspects {
    /// No aspect: identity only.
    pub const NONE: Aspects = Aspects(0);
    /// The public aspect: everything consumers observe.
    pub const PUBLIC: Aspects = Aspects(1 << 0);
    /// Link data owned by the netlink source.
    pub const NETLINK: Aspects = Aspects(1 << 1);
    /// Link data owned by the device-discovery source.
    pub const UDEV: Aspects = Aspects(1 << 2);
    /// Every aspect.
    pub const ALL: Aspects = Aspects(0b111);

    /// Whether every aspect in `other` is selected.
    pub fn contains(self, other: Aspects) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any aspect in `other` is selected.
    pub fn intersects(self, other: Aspects) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for Aspects {
    type Output = Aspects;

    fn bitor(self, rhs: Aspects) -> Aspects {
        Aspects(self.0 | rhs.0)
    }
}

impl fmt::Debug for Aspects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("none");
        }
        let mut names = Vec::new();
        if self.intersects(Aspects::PUBLIC) {
            names.push("public");
        }
        if self.intersects(Aspects::NETLINK) {
            names.push("netlink");
        }
        if self.intersects(Aspects::UDEV) {
            names.push("udev");
        }
        f.write_str(&names.join("|"))
    }
}

/// Identity of a network object: the immutable fields that uniquely
/// determine it within its kind.
///
/// `ObjectId` doubles as the lookup probe of the cache. Equality is
/// structural over the identity fields; the hash is an order-sensitive
/// multiplicative hash with a distinct seed per kind, so identities of
/// different kinds do not collide even though they are never compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectId {
    Link(LinkId),
    Ip4Address(Ip4AddressId),
    Ip6Address(Ip6AddressId),
    Ip4Route(Ip4RouteId),
    Ip6Route(Ip6RouteId),
}

impl ObjectId {
    /// Probe for a link identity.
    pub fn link(ifindex: i32) -> Self {
        ObjectId::Link(LinkId::new(ifindex))
    }

    /// The kind this identity belongs to.
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectId::Link(_) => ObjectKind::Link,
            ObjectId::Ip4Address(_) => ObjectKind::Ip4Address,
            ObjectId::Ip6Address(_) => ObjectKind::Ip6Address,
            ObjectId::Ip4Route(_) => ObjectKind::Ip4Route,
            ObjectId::Ip6Route(_) => ObjectKind::Ip6Route,
        }
    }

    /// The interface index; every kind carries one.
    pub fn ifindex(&self) -> i32 {
        match self {
            ObjectId::Link(id) => id.ifindex,
            ObjectId::Ip4Address(id) => id.ifindex,
            ObjectId::Ip6Address(id) => id.ifindex,
            ObjectId::Ip4Route(id) => id.ifindex,
            ObjectId::Ip6Route(id) => id.ifindex,
        }
    }

    /// The raw identity hash. Order-sensitive multiplicative hash over the
    /// identity fields, seeded per kind.
    fn raw_hash(&self) -> u32 {
        match self {
            ObjectId::Link(id) => 3_982_791_431u32.wrapping_add(id.ifindex as u32),
            ObjectId::Ip4Address(id) => {
                let mut hash = 3_591_309_853u32.wrapping_add(id.ifindex as u32);
                hash = hash.wrapping_mul(33).wrapping_add(u32::from(id.plen));
                hash.wrapping_mul(33).wrapping_add(u32::from(id.address))
            }
            ObjectId::Ip6Address(id) => {
                let mut hash = 2_907_861_637u32.wrapping_add(id.ifindex as u32);
                hash = hash.wrapping_mul(33).wrapping_add(u32::from(id.plen));
                hash.wrapping_mul(33).wrapping_add(fold_ip6(&id.address))
            }
            ObjectId::Ip4Route(id) => {
                let mut hash = 2_569_857_221u32.wrapping_add(id.ifindex as u32);
                hash = hash.wrapping_mul(33).wrapping_add(u32::from(id.plen));
                hash = hash.wrapping_mul(33).wrapping_add(id.metric);
                hash.wrapping_mul(33).wrapping_add(u32::from(id.network))
            }
            ObjectId::Ip6Route(id) => {
                let mut hash = 3_999_787_007u32.wrapping_add(id.ifindex as u32);
                hash = hash.wrapping_mul(33).wrapping_add(u32::from(id.plen));
                hash = hash.wrapping_mul(33).wrapping_add(id.metric);
                hash.wrapping_mul(33).wrapping_add(fold_ip6(&id.network))
            }
        }
    }
}

impl Hash for ObjectId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.raw_hash());
    }
}

/// Fold a 128-bit address into 32 bits: a running multiply-accumulate over
/// the bytes, then XOR in the four 32-bit words to keep the full entropy.
fn fold_ip6(addr: &Ipv6Addr) -> u32 {
    let octets = addr.octets();
    let mut hash: u32 = 5381;
    for byte in octets {
        hash = hash.wrapping_mul(33).wrapping_add(u32::from(byte));
    }
    for i in 0..4 {
        hash ^= u32::from_be_bytes([
            octets[4 * i],
            octets[4 * i + 1],
            octets[4 * i + 2],
            octets[4 * i + 3],
        ]);
    }
    hash
}

impl From<LinkId> for ObjectId {
    fn from(id: LinkId) -> Self {
        ObjectId::Link(id)
    }
}

impl From<Ip4AddressId> for ObjectId {
    fn from(id: Ip4AddressId) -> Self {
        ObjectId::Ip4Address(id)
    }
}

impl From<Ip6AddressId> for ObjectId {
    fn from(id: Ip6AddressId) -> Self {
        ObjectId::Ip6Address(id)
    }
}

impl From<Ip4RouteId> for ObjectId {
    fn from(id: Ip4RouteId) -> Self {
        ObjectId::Ip4Route(id)
    }
}

impl From<Ip6RouteId> for ObjectId {
    fn from(id: Ip6RouteId) -> Self {
        ObjectId::Ip6Route(id)
    }
}

/// A network object: one of the five kinds, identity plus aspect data.
///
/// Candidates built by source adapters, merge scratch values and snapshot
/// copies are all plain `Object` values; only the cache holds them behind
/// shared ownership.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Object {
    Link(Link),
    Ip4Address(Ip4Address),
    Ip6Address(Ip6Address),
    Ip4Route(Ip4Route),
    Ip6Route(Ip6Route),
}

impl Object {
    /// The kind of this object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Link(_) => ObjectKind::Link,
            Object::Ip4Address(_) => ObjectKind::Ip4Address,
            Object::Ip6Address(_) => ObjectKind::Ip6Address,
            Object::Ip4Route(_) => ObjectKind::Ip4Route,
            Object::Ip6Route(_) => ObjectKind::Ip6Route,
        }
    }

    /// The identity of this object, as a probe value.
    pub fn id(&self) -> ObjectId {
        match self {
            Object::Link(link) => ObjectId::Link(link.id),
            Object::Ip4Address(addr) => ObjectId::Ip4Address(addr.id),
            Object::Ip6Address(addr) => ObjectId::Ip6Address(addr.id),
            Object::Ip4Route(route) => ObjectId::Ip4Route(route.id),
            Object::Ip6Route(route) => ObjectId::Ip6Route(route.id),
        }
    }

    /// The interface index of this object.
    pub fn ifindex(&self) -> i32 {
        self.id().ifindex()
    }

    /// The link payload, if this is a link.
    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Object::Link(link) => Some(link),
            _ => None,
        }
    }

    /// The IPv4 address payload, if this is an IPv4 address.
    pub fn as_ip4_address(&self) -> Option<&Ip4Address> {
        match self {
            Object::Ip4Address(addr) => Some(addr),
            _ => None,
        }
    }

    /// The IPv6 address payload, if this is an IPv6 address.
    pub fn as_ip6_address(&self) -> Option<&Ip6Address> {
        match self {
            Object::Ip6Address(addr) => Some(addr),
            _ => None,
        }
    }

    /// The IPv4 route payload, if this is an IPv4 route.
    pub fn as_ip4_route(&self) -> Option<&Ip4Route> {
        match self {
            Object::Ip4Route(route) => Some(route),
            _ => None,
        }
    }

    /// The IPv6 route payload, if this is an IPv6 route.
    pub fn as_ip6_route(&self) -> Option<&Ip6Route> {
        match self {
            Object::Ip6Route(route) => Some(route),
            _ => None,
        }
    }

    /// Whether the object still represents something that exists in the
    /// modeled system. Addresses exist exactly as long as they are cached;
    /// links survive on either source; internal routes are never alive.
    pub fn is_alive(&self) -> bool {
        match self {
            Object::Link(link) => link.is_alive(),
            Object::Ip4Address(_) | Object::Ip6Address(_) => true,
            Object::Ip4Route(route) => route.is_alive(),
            Object::Ip6Route(route) => route.is_alive(),
        }
    }

    /// Whether the object should be surfaced to consumers as present.
    pub fn is_visible(&self) -> bool {
        match self {
            Object::Link(link) => link.is_visible(),
            Object::Ip4Address(_) | Object::Ip6Address(_) => true,
            Object::Ip4Route(route) => route.is_visible(),
            Object::Ip6Route(route) => route.is_visible(),
        }
    }

    /// Aspect-scoped equality.
    ///
    /// Identity is always compared. Links additionally compare each aspect
    /// named in `aspects` on its own; other kinds compare their whole
    /// public data when `aspects` touches `PUBLIC | NETLINK` and nothing
    /// beyond identity otherwise. Objects of different kinds are never
    /// equal.
    pub fn eq_aspects(&self, other: &Object, aspects: Aspects) -> bool {
        match (self, other) {
            (Object::Link(a), Object::Link(b)) => {
                a.id == b.id
                    && (!aspects.intersects(Aspects::PUBLIC) || a.state == b.state)
                    && (!aspects.intersects(Aspects::NETLINK) || a.netlink == b.netlink)
                    && (!aspects.intersects(Aspects::UDEV) || a.udev_aspect_eq(b))
            }
            (Object::Ip4Address(a), Object::Ip4Address(b)) => {
                plain_eq(&a.id, &b.id, &a.state, &b.state, aspects)
            }
            (Object::Ip6Address(a), Object::Ip6Address(b)) => {
                plain_eq(&a.id, &b.id, &a.state, &b.state, aspects)
            }
            (Object::Ip4Route(a), Object::Ip4Route(b)) => {
                plain_eq(&a.id, &b.id, &a.state, &b.state, aspects)
            }
            (Object::Ip6Route(a), Object::Ip6Route(b)) => {
                plain_eq(&a.id, &b.id, &a.state, &b.state, aspects)
            }
            _ => false,
        }
    }

    /// Copy the aspects named in `aspects` from `src` onto `self`.
    ///
    /// Identity fields are never copied; both objects must already share
    /// kind and identity. A kind mismatch is a bug in the caller and
    /// panics.
    pub fn copy_from(&mut self, src: &Object, aspects: Aspects) {
        if self.kind() != src.kind() {
            panic!(
                "aspect copy across kinds: {:?} onto {:?}",
                src.kind(),
                self.kind()
            );
        }
        debug_assert_eq!(self.id(), src.id(), "aspect copy across identities");
        match (self, src) {
            (Object::Link(dst), Object::Link(src)) => {
                if aspects.intersects(Aspects::PUBLIC) {
                    dst.state = src.state.clone();
                }
                if aspects.intersects(Aspects::NETLINK) {
                    dst.netlink = src.netlink.clone();
                }
                if aspects.intersects(Aspects::UDEV) {
                    dst.udev = src.udev.clone();
                }
            }
            (Object::Ip4Address(dst), Object::Ip4Address(src)) => {
                if aspects.intersects(Aspects::PUBLIC | Aspects::NETLINK) {
                    dst.state = src.state.clone();
                }
            }
            (Object::Ip6Address(dst), Object::Ip6Address(src)) => {
                if aspects.intersects(Aspects::PUBLIC | Aspects::NETLINK) {
                    dst.state = src.state.clone();
                }
            }
            (Object::Ip4Route(dst), Object::Ip4Route(src)) => {
                if aspects.intersects(Aspects::PUBLIC | Aspects::NETLINK) {
                    dst.state = src.state.clone();
                }
            }
            (Object::Ip6Route(dst), Object::Ip6Route(src)) => {
                if aspects.intersects(Aspects::PUBLIC | Aspects::NETLINK) {
                    dst.state = src.state.clone();
                }
            }
            _ => unreachable!(),
        }
    }

    /// Deterministic full ordering over kind, identity and public fields.
    ///
    /// Used for deduplication and stable diagnostics output, never for
    /// index ordering.
    pub fn cmp_full(&self, other: &Object) -> Ordering {
        fn rank(obj: &Object) -> u8 {
            match obj {
                Object::Link(_) => 0,
                Object::Ip4Address(_) => 1,
                Object::Ip6Address(_) => 2,
                Object::Ip4Route(_) => 3,
                Object::Ip6Route(_) => 4,
            }
        }

        rank(self).cmp(&rank(other)).then_with(|| match (self, other) {
            (Object::Link(a), Object::Link(b)) => {
                (&a.id, &a.state).cmp(&(&b.id, &b.state))
            }
            (Object::Ip4Address(a), Object::Ip4Address(b)) => {
                (&a.id, &a.state).cmp(&(&b.id, &b.state))
            }
            (Object::Ip6Address(a), Object::Ip6Address(b)) => {
                (&a.id, &a.state).cmp(&(&b.id, &b.state))
            }
            (Object::Ip4Route(a), Object::Ip4Route(b)) => {
                (&a.id, &a.state).cmp(&(&b.id, &b.state))
            }
            (Object::Ip6Route(a), Object::Ip6Route(b)) => {
                (&a.id, &a.state).cmp(&(&b.id, &b.state))
            }
            _ => Ordering::Equal,
        })
    }
}

/// Equality for kinds with a single public aspect: `PUBLIC | NETLINK`
/// selects the whole object, anything else only the identity.
fn plain_eq<I: PartialEq, S: PartialEq>(
    id_a: &I,
    id_b: &I,
    state_a: &S,
    state_b: &S,
    aspects: Aspects,
) -> bool {
    if id_a != id_b {
        return false;
    }
    if aspects.intersects(Aspects::PUBLIC | Aspects::NETLINK) {
        state_a == state_b
    } else {
        true
    }
}

impl From<Link> for Object {
    fn from(link: Link) -> Self {
        Object::Link(link)
    }
}

impl From<Ip4Address> for Object {
    fn from(addr: Ip4Address) -> Self {
        Object::Ip4Address(addr)
    }
}

impl From<Ip6Address> for Object {
    fn from(addr: Ip6Address) -> Self {
        Object::Ip6Address(addr)
    }
}

impl From<Ip4Route> for Object {
    fn from(route: Ip4Route) -> Self {
        Object::Ip4Route(route)
    }
}

impl From<Ip6Route> for Object {
    fn from(route: Ip6Route) -> Self {
        Object::Ip6Route(route)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Link(link) => fmt::Display::fmt(link, f),
            Object::Ip4Address(addr) => fmt::Display::fmt(addr, f),
            Object::Ip6Address(addr) => fmt::Display::fmt(addr, f),
            Object::Ip4Route(route) => fmt::Display::fmt(route, f),
            Object::Ip6Route(route) => fmt::Display::fmt(route, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::net::Ipv4Addr;
    use std::rc::Rc;

    use super::super::device::DeviceRecord;
    use super::*;

    fn hash_of(id: &ObjectId) -> u64 {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn identity_equality_is_structural() {
        let a = ObjectId::Ip4Route(Ip4RouteId::new(1, Ipv4Addr::new(10, 0, 0, 0), 8, 100));
        let b = ObjectId::Ip4Route(Ip4RouteId::new(1, Ipv4Addr::new(10, 0, 0, 0), 8, 100));
        let c = ObjectId::Ip4Route(Ip4RouteId::new(1, Ipv4Addr::new(10, 0, 0, 0), 8, 101));

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
    }

    #[test]
    fn kinds_never_compare_equal() {
        // same raw fields, different kinds
        let addr = ObjectId::Ip4Address(Ip4AddressId::new(1, Ipv4Addr::new(10, 0, 0, 1), 24));
        let route = ObjectId::Ip4Route(Ip4RouteId::new(1, Ipv4Addr::new(10, 0, 0, 1), 24, 0));

        assert_ne!(addr, route);
        // distinct per-kind seeds keep the hashes apart too
        assert_ne!(hash_of(&addr), hash_of(&route));
    }

    #[test]
    fn ip6_fold_uses_whole_address() {
        let low: Ipv6Addr = "2001:db8::1".parse().unwrap();
        let high: Ipv6Addr = "2001:db9::1".parse().unwrap();

        let a = ObjectId::Ip6Address(Ip6AddressId::new(1, low, 64));
        let b = ObjectId::Ip6Address(Ip6AddressId::new(1, high, 64));
        assert_ne!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn aspect_scoped_equality_on_links() {
        let record = Rc::new(DeviceRecord::synthetic("/devices/virtual/net/a", "net"));
        let a = Link::new(3).name("eth0").in_netlink(true).udev(Rc::clone(&record));
        let mut b = a.clone();
        b.netlink.carrier_native = true;

        let a = Object::from(a);
        let b = Object::from(b);

        // the netlink aspect differs, the others do not
        assert!(!a.eq_aspects(&b, Aspects::NETLINK));
        assert!(a.eq_aspects(&b, Aspects::PUBLIC));
        assert!(a.eq_aspects(&b, Aspects::UDEV));
        assert!(a.eq_aspects(&b, Aspects::NONE));
    }

    #[test]
    fn plain_kinds_alias_netlink_to_public() {
        let a = Object::from(Ip4Address::new(1, Ipv4Addr::new(10, 0, 0, 1), 24));
        let b = Object::from(
            Ip4Address::new(1, Ipv4Addr::new(10, 0, 0, 1), 24).source(ConfigSource::Dhcp),
        );

        assert!(!a.eq_aspects(&b, Aspects::PUBLIC));
        assert!(!a.eq_aspects(&b, Aspects::NETLINK));
        // identity-only comparison ignores the state difference
        assert!(a.eq_aspects(&b, Aspects::UDEV));
    }

    #[test]
    fn copy_never_touches_identity() {
        let mut dst = Object::from(
            Ip4Route::new(1, Ipv4Addr::new(10, 0, 0, 0), 8, 100).source(ConfigSource::Static),
        );
        let src = Object::from(
            Ip4Route::new(1, Ipv4Addr::new(10, 0, 0, 0), 8, 100)
                .source(ConfigSource::Dhcp)
                .gateway(Ipv4Addr::new(10, 0, 0, 1)),
        );

        let id_before = dst.id();
        dst.copy_from(&src, Aspects::PUBLIC);
        assert_eq!(dst.id(), id_before);
        assert!(dst.eq_aspects(&src, Aspects::ALL));
    }

    #[test]
    #[should_panic(expected = "aspect copy across kinds")]
    fn copy_across_kinds_panics() {
        let mut dst = Object::from(Link::new(1));
        let src = Object::from(Ip4Address::new(1, Ipv4Addr::new(10, 0, 0, 1), 24));
        dst.copy_from(&src, Aspects::ALL);
    }

    #[test]
    fn full_ordering_is_deterministic() {
        let mut objects = vec![
            Object::from(Ip4Route::new(2, Ipv4Addr::new(10, 0, 0, 0), 8, 100)),
            Object::from(Link::new(9)),
            Object::from(Link::new(1)),
            Object::from(Ip4Address::new(1, Ipv4Addr::new(10, 0, 0, 1), 24)),
        ];
        objects.sort_by(Object::cmp_full);

        let kinds: Vec<ObjectKind> = objects.iter().map(Object::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ObjectKind::Link,
                ObjectKind::Link,
                ObjectKind::Ip4Address,
                ObjectKind::Ip4Route,
            ]
        );
        assert_eq!(objects[0].ifindex(), 1);
        assert_eq!(objects[1].ifindex(), 9);
    }
}
