//! The platform object model and cache.
//!
//! This module models runtime kernel networking state: links, IPv4/IPv6
//! addresses and IPv4/IPv6 routes, each as a tagged [`Object`] with an
//! immutable identity and mutable aspect data, held in a [`Cache`] with
//! one primary identity index and several secondary group views.
//!
//! Two racing sources feed the model. The netlink source owns the public
//! and netlink aspects; device discovery owns the udev aspect of links.
//! Each source updates only the aspects it observed, and the cache merges,
//! deduplicates and classifies every observation — which is what lets a
//! link outlive its kernel entry as a "ghost" while udev still knows it.
//!
//! # Quick Start
//!
//! ```
//! use netstate::platform::{Aspects, Cache, CacheId, ConfigSource, Ip4Route, Link};
//!
//! let mut cache = Cache::new();
//!
//! cache.update(
//!     Link::new(2).name("eth0").in_netlink(true).into(),
//!     Aspects::PUBLIC | Aspects::NETLINK,
//! );
//! cache.update(
//!     Ip4Route::new(2, "10.0.0.0".parse().unwrap(), 8, 100)
//!         .source(ConfigSource::Dhcp)
//!         .into(),
//!     Aspects::PUBLIC,
//! );
//!
//! assert_eq!(cache.lookup_group(&CacheId::LinksVisible).len(), 1);
//! ```

pub mod address;
pub mod cache;
pub mod device;
pub mod error;
pub mod events;
pub mod link;
pub mod object;
pub mod route;

pub use address::{
    Ip4Address, Ip4AddressId, Ip4AddressState, Ip6Address, Ip6AddressId, Ip6AddressState,
    LIFETIME_PERMANENT,
};
pub use cache::{Cache, CacheId, CacheIdKind, CacheOutcome, ObjectHandle};
pub use device::DeviceRecord;
pub use error::{Error, Result};
pub use events::{CacheChange, Platform, SourceEvent};
pub use link::{Link, LinkId, LinkNetlink, LinkState, LinkType};
pub use object::{AddressFamily, Aspects, ConfigSource, Object, ObjectId, ObjectKind};
pub use route::{Ip4Route, Ip4RouteId, Ip4RouteState, Ip6Route, Ip6RouteId, Ip6RouteState};
