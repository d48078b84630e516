//! In-memory model of kernel networking state.
//!
//! `netstate` is the runtime core of a network-configuration daemon: a
//! deduplicated, multi-indexed cache of links, IPv4/IPv6 addresses and
//! IPv4/IPv6 routes, kept in step with two independent, racing sources —
//! a netlink-style kernel event stream and a udev-style device-discovery
//! stream. Higher layers (device state machines, routing policy, DHCP
//! clients) query the model constantly and always see one consistent,
//! efficiently-indexable view.
//!
//! The crate has no wire format of its own; source adapters translate
//! kernel and discovery events into [`platform::Object`] candidates and
//! feed them in, consumers look objects up by identity or by group and
//! subscribe to change notifications.
//!
//! # Example
//!
//! ```
//! use netstate::platform::{Aspects, CacheId, ConfigSource, Ip4Route, Link, Platform, AddressFamily};
//!
//! let mut platform = Platform::new();
//! let mut changes = platform.subscribe();
//!
//! // the netlink adapter reports a link and a default route
//! platform.update(
//!     Link::new(2).name("eth0").in_netlink(true).into(),
//!     Aspects::PUBLIC | Aspects::NETLINK,
//! );
//! platform.update(
//!     Ip4Route::new(2, "0.0.0.0".parse().unwrap(), 0, 100)
//!         .gateway("192.168.1.1".parse().unwrap())
//!         .source(ConfigSource::Dhcp)
//!         .into(),
//!     Aspects::PUBLIC,
//! );
//!
//! let defaults = platform.cache().lookup_group(&CacheId::RoutesVisibleOnlyDefault {
//!     family: AddressFamily::V4,
//! });
//! assert_eq!(defaults.len(), 1);
//! assert_eq!(changes.try_recv().unwrap().ifindex(), 2);
//! ```
//!
//! # Concurrency
//!
//! The model is single-threaded and event-driven: all mutation happens
//! synchronously in the thread that owns the cache, nothing blocks, and
//! there is no internal locking. Notifications are delivered over channels
//! after each mutation completes.

pub mod multi_index;
pub mod platform;
pub mod util;

// Re-export common types at crate root for convenience
pub use multi_index::MultiIndex;
pub use platform::{
    Aspects, Cache, CacheChange, CacheId, CacheOutcome, Object, ObjectHandle, ObjectId,
    ObjectKind, Platform,
};
