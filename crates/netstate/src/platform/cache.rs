//! The platform object cache.
//!
//! One primary identity index owns every cached object; a set of secondary
//! group views, built on [`MultiIndex`], answers the queries higher layers
//! ask constantly ("all visible links", "routes on ifindex 3", "the IPv4
//! default routes"). All mutation funnels through [`Cache::update`] and
//! [`Cache::remove`], which classify every incoming observation as
//! added/updated/removed/unchanged and keep the secondary views exactly in
//! step with the object state.
//!
//! # Example
//!
//! ```
//! use netstate::platform::{Aspects, Cache, CacheOutcome, Link, ObjectId};
//!
//! let mut cache = Cache::new();
//!
//! let eth0 = Link::new(2).name("eth0").in_netlink(true);
//! let outcome = cache.update(eth0.into(), Aspects::PUBLIC | Aspects::NETLINK);
//! assert!(matches!(outcome, CacheOutcome::Added { .. }));
//!
//! // probe lookups build a stack-only identity value
//! let handle = cache.lookup(ObjectId::link(2)).unwrap();
//! assert!(handle.is_visible());
//! ```

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::multi_index::MultiIndex;

use super::link::LinkId;
use super::object::{AddressFamily, Aspects, Object, ObjectId, ObjectKind};

/// Selector for one secondary view of the cache.
///
/// Group keys are small structural values: equality and hashing derive
/// from the named fields, and a key can live on the stack and be reused
/// across lookups (the index clones it only when a group is created).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheId {
    /// Every cached link.
    LinksAll,
    /// Links currently reported by the kernel.
    LinksVisible,
    /// Addresses or routes of one kind on one interface.
    ByIfindex {
        /// The address or route kind.
        kind: ObjectKind,
        /// The interface index.
        ifindex: i32,
    },
    /// Visible routes of one family.
    RoutesVisibleAll {
        /// The address family.
        family: AddressFamily,
    },
    /// Visible routes of one family, excluding default routes.
    RoutesVisibleNoDefault {
        /// The address family.
        family: AddressFamily,
    },
    /// Visible default routes of one family.
    RoutesVisibleOnlyDefault {
        /// The address family.
        family: AddressFamily,
    },
}

/// The kinds of secondary views, used to enumerate every possible group
/// membership of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheIdKind {
    LinksAll,
    LinksVisible,
    ByIfindex,
    RoutesVisibleAll,
    RoutesVisibleNoDefault,
    RoutesVisibleOnlyDefault,
}

impl CacheIdKind {
    /// All view kinds, in a stable order.
    pub const ALL: [CacheIdKind; 6] = [
        CacheIdKind::LinksAll,
        CacheIdKind::LinksVisible,
        CacheIdKind::ByIfindex,
        CacheIdKind::RoutesVisibleAll,
        CacheIdKind::RoutesVisibleNoDefault,
        CacheIdKind::RoutesVisibleOnlyDefault,
    ];
}

impl CacheId {
    /// The group `obj` belongs to for one view kind, or `None` when it is
    /// not a member — either because the view does not apply to its kind
    /// at all, or because the object's current state excludes it (not
    /// visible, not a default route, ...).
    pub fn for_object(obj: &Object, id_kind: CacheIdKind) -> Option<CacheId> {
        match (obj, id_kind) {
            (Object::Link(_), CacheIdKind::LinksAll) => Some(CacheId::LinksAll),
            (Object::Link(link), CacheIdKind::LinksVisible) => {
                link.is_visible().then_some(CacheId::LinksVisible)
            }
            (Object::Link(_), _) => None,

            (Object::Ip4Address(addr), CacheIdKind::ByIfindex) => Some(CacheId::ByIfindex {
                kind: ObjectKind::Ip4Address,
                ifindex: addr.id.ifindex,
            }),
            (Object::Ip6Address(addr), CacheIdKind::ByIfindex) => Some(CacheId::ByIfindex {
                kind: ObjectKind::Ip6Address,
                ifindex: addr.id.ifindex,
            }),
            (Object::Ip4Address(_) | Object::Ip6Address(_), _) => None,

            (Object::Ip4Route(route), CacheIdKind::ByIfindex) => {
                route.is_visible().then_some(CacheId::ByIfindex {
                    kind: ObjectKind::Ip4Route,
                    ifindex: route.id.ifindex,
                })
            }
            (Object::Ip4Route(route), CacheIdKind::RoutesVisibleAll) => {
                route.is_visible().then_some(CacheId::RoutesVisibleAll {
                    family: AddressFamily::V4,
                })
            }
            (Object::Ip4Route(route), CacheIdKind::RoutesVisibleNoDefault) => {
                (route.is_visible() && !route.is_default()).then_some(
                    CacheId::RoutesVisibleNoDefault {
                        family: AddressFamily::V4,
                    },
                )
            }
            (Object::Ip4Route(route), CacheIdKind::RoutesVisibleOnlyDefault) => {
                (route.is_visible() && route.is_default()).then_some(
                    CacheId::RoutesVisibleOnlyDefault {
                        family: AddressFamily::V4,
                    },
                )
            }
            (Object::Ip4Route(_), _) => None,

            (Object::Ip6Route(route), CacheIdKind::ByIfindex) => {
                route.is_visible().then_some(CacheId::ByIfindex {
                    kind: ObjectKind::Ip6Route,
                    ifindex: route.id.ifindex,
                })
            }
            (Object::Ip6Route(route), CacheIdKind::RoutesVisibleAll) => {
                route.is_visible().then_some(CacheId::RoutesVisibleAll {
                    family: AddressFamily::V6,
                })
            }
            (Object::Ip6Route(route), CacheIdKind::RoutesVisibleNoDefault) => {
                (route.is_visible() && !route.is_default()).then_some(
                    CacheId::RoutesVisibleNoDefault {
                        family: AddressFamily::V6,
                    },
                )
            }
            (Object::Ip6Route(route), CacheIdKind::RoutesVisibleOnlyDefault) => {
                (route.is_visible() && route.is_default()).then_some(
                    CacheId::RoutesVisibleOnlyDefault {
                        family: AddressFamily::V6,
                    },
                )
            }
            (Object::Ip6Route(_), _) => None,
        }
    }
}

/// Cache-owned storage of one object: the mutable aspect data behind
/// shared ownership, plus the flag telling whether a primary index
/// currently owns this instance.
#[derive(Debug)]
struct ObjectCell {
    data: RefCell<Object>,
    cached: Cell<bool>,
}

/// Shared handle to a cache-owned object.
///
/// Handles are cheap to clone, observe in-place updates, and stay readable
/// after the object is removed from the cache (they then hold its final
/// state).
#[derive(Clone)]
pub struct ObjectHandle {
    cell: Rc<ObjectCell>,
}

impl ObjectHandle {
    /// The object's identity.
    pub fn id(&self) -> ObjectId {
        self.cell.data.borrow().id()
    }

    /// The object's kind.
    pub fn kind(&self) -> ObjectKind {
        self.cell.data.borrow().kind()
    }

    /// A snapshot copy of the current object state.
    pub fn snapshot(&self) -> Object {
        self.cell.data.borrow().clone()
    }

    /// Read the object without copying it.
    pub fn read<R>(&self, f: impl FnOnce(&Object) -> R) -> R {
        f(&self.cell.data.borrow())
    }

    /// Whether the object is alive in its current state.
    pub fn is_alive(&self) -> bool {
        self.cell.data.borrow().is_alive()
    }

    /// Whether the object is visible in its current state.
    pub fn is_visible(&self) -> bool {
        self.cell.data.borrow().is_visible()
    }

    /// Whether a cache's primary index currently owns this instance.
    pub fn is_cached(&self) -> bool {
        self.cell.cached.get()
    }

    /// Whether two handles refer to the same cached instance.
    pub fn ptr_eq(&self, other: &ObjectHandle) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectHandle")
            .field(&self.cell.data.borrow())
            .finish()
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.cell.data.borrow(), f)
    }
}

/// Secondary-index member: a shared entry ordered by allocation address.
///
/// The address is stable for the life of the allocation and totally
/// ordered across members; it carries no domain meaning, and none is
/// needed — groups only promise membership, not ordering.
#[derive(Clone)]
struct EntryRef(Rc<ObjectCell>);

impl PartialEq for EntryRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for EntryRef {}

impl PartialOrd for EntryRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EntryRef {
    fn cmp(&self, other: &Self) -> Ordering {
        (Rc::as_ptr(&self.0) as usize).cmp(&(Rc::as_ptr(&other.0) as usize))
    }
}

impl fmt::Debug for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryRef({:p})", Rc::as_ptr(&self.0))
    }
}

/// Result of a cache mutation.
#[derive(Debug, Clone)]
pub enum CacheOutcome {
    /// Nothing changed. No notification is due.
    Unchanged,
    /// The object was not cached before and is now.
    Added {
        /// Handle to the newly cached object.
        object: ObjectHandle,
    },
    /// An existing object was updated in place.
    Updated {
        /// Handle to the cached object, already carrying the new state.
        object: ObjectHandle,
        /// Snapshot of the state before the update.
        before: Object,
        /// Whether the object was visible before the update.
        was_visible: bool,
    },
    /// The object was dropped from the cache. The handle keeps its final
    /// state readable.
    Removed {
        /// Handle to the removed object.
        object: ObjectHandle,
        /// Whether the object was visible before the removal.
        was_visible: bool,
    },
}

impl CacheOutcome {
    /// Whether the mutation changed anything.
    pub fn changed(&self) -> bool {
        !matches!(self, CacheOutcome::Unchanged)
    }
}

/// The authoritative mapping from identity to live network object, plus
/// the derived secondary views.
pub struct Cache {
    idx_main: HashMap<ObjectId, Rc<ObjectCell>>,
    idx_multi: MultiIndex<CacheId, EntryRef>,
}

impl Cache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            idx_main: HashMap::new(),
            idx_multi: MultiIndex::new(),
        }
    }

    /// Number of cached objects.
    pub fn len(&self) -> usize {
        self.idx_main.len()
    }

    /// Whether the cache holds no objects.
    pub fn is_empty(&self) -> bool {
        self.idx_main.is_empty()
    }

    /// Iterate over every cached object, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = ObjectHandle> + '_ {
        self.idx_main.values().map(|cell| ObjectHandle {
            cell: Rc::clone(cell),
        })
    }

    /// The keys of all currently non-empty secondary groups.
    pub fn groups(&self) -> Vec<CacheId> {
        self.idx_multi.iter().map(|(key, _)| *key).collect()
    }

    /// Primary-index lookup by identity. The probe is a plain `Copy`
    /// value; no allocation happens on this path.
    pub fn lookup(&self, id: ObjectId) -> Option<ObjectHandle> {
        self.idx_main.get(&id).map(|cell| ObjectHandle {
            cell: Rc::clone(cell),
        })
    }

    /// Convenience lookup of a link by interface index.
    pub fn lookup_link(&self, ifindex: i32) -> Option<ObjectHandle> {
        self.lookup(ObjectId::Link(LinkId::new(ifindex)))
    }

    /// All members of one secondary group.
    pub fn lookup_group(&self, id: &CacheId) -> Vec<ObjectHandle> {
        self.idx_multi
            .lookup(id)
            .iter()
            .map(|entry| ObjectHandle {
                cell: Rc::clone(&entry.0),
            })
            .collect()
    }

    /// Apply one observation from a source.
    ///
    /// `candidate` supplies only the aspects named in `aspects`; it is
    /// never itself installed as the live object. The cache decides what
    /// the observation means:
    ///
    /// - unknown identity, not alive: [`CacheOutcome::Unchanged`] (there
    ///   is nothing to add),
    /// - unknown identity, alive: the candidate's data is installed,
    ///   [`CacheOutcome::Added`],
    /// - known identity, aspect-equal: [`CacheOutcome::Unchanged`]
    ///   (duplicate notification, no index churn),
    /// - known identity, merge result not alive:
    ///   [`CacheOutcome::Removed`],
    /// - otherwise the named aspects are copied onto the cached object in
    ///   place, secondary memberships migrate to match, and the result is
    ///   [`CacheOutcome::Updated`].
    ///
    /// Identity fields are never written: an identity change is by
    /// construction a removal plus an addition.
    pub fn update(&mut self, candidate: Object, aspects: Aspects) -> CacheOutcome {
        let id = candidate.id();

        let Some(old) = self.idx_main.get(&id).cloned() else {
            if !candidate.is_alive() {
                trace!(?id, "update for dead object ignored");
                return CacheOutcome::Unchanged;
            }
            let cell = Rc::new(ObjectCell {
                data: RefCell::new(candidate),
                cached: Cell::new(true),
            });
            self.idx_main.insert(id, Rc::clone(&cell));
            self.index_groups_add(&cell);
            debug!(?id, "object added");
            return CacheOutcome::Added {
                object: ObjectHandle { cell },
            };
        };

        debug_assert!(old.cached.get());

        let (before, was_visible, merged) = {
            let current = old.data.borrow();
            if current.eq_aspects(&candidate, aspects) {
                trace!(?id, ?aspects, "duplicate update ignored");
                return CacheOutcome::Unchanged;
            }
            let was_visible = current.is_visible();
            let before = current.clone();
            // A candidate for a multi-aspect kind describes only the
            // aspects in the mask; aliveness must be judged on the merged
            // result, not on the partial candidate.
            let merged = if current.kind().has_source_aspects() {
                let mut merged = current.clone();
                merged.copy_from(&candidate, aspects);
                merged
            } else {
                candidate.clone()
            };
            (before, was_visible, merged)
        };

        if !merged.is_alive() {
            self.detach(id, &old);
            debug!(?id, "object removed by update");
            return CacheOutcome::Removed {
                object: ObjectHandle { cell: old },
                was_visible,
            };
        }

        // Migrate secondary memberships from the current state's groups to
        // the merged state's groups, then rewrite the aspect data.
        let entry = EntryRef(Rc::clone(&old));
        {
            let current = old.data.borrow();
            for id_kind in CacheIdKind::ALL {
                let from = CacheId::for_object(&current, id_kind);
                let to = CacheId::for_object(&merged, id_kind);
                let moved = self.idx_multi.transfer(from.as_ref(), to.as_ref(), &entry);
                assert!(
                    moved,
                    "secondary index out of sync for {id:?} ({id_kind:?})"
                );
            }
        }
        old.data.borrow_mut().copy_from(&candidate, aspects);
        debug!(?id, ?aspects, "object updated");
        CacheOutcome::Updated {
            object: ObjectHandle { cell: old },
            before,
            was_visible,
        }
    }

    /// Drop the object with the given identity, if cached.
    pub fn remove(&mut self, id: ObjectId) -> CacheOutcome {
        let Some(cell) = self.idx_main.get(&id).cloned() else {
            return CacheOutcome::Unchanged;
        };
        let was_visible = cell.data.borrow().is_visible();
        self.detach(id, &cell);
        debug!(?id, "object removed");
        CacheOutcome::Removed {
            object: ObjectHandle { cell },
            was_visible,
        }
    }

    /// Drop every cached object, releasing secondary memberships first.
    pub fn clear(&mut self) {
        let ids: Vec<ObjectId> = self.idx_main.keys().copied().collect();
        for id in ids {
            if let Some(cell) = self.idx_main.get(&id).cloned() {
                self.detach(id, &cell);
            }
        }
        debug_assert!(self.idx_multi.is_empty());
    }

    /// Insert a freshly cached object into every applicable group.
    fn index_groups_add(&mut self, cell: &Rc<ObjectCell>) {
        let entry = EntryRef(Rc::clone(cell));
        debug_assert!(self.idx_multi.first_key_containing(&entry).is_none());
        let current = cell.data.borrow();
        for id_kind in CacheIdKind::ALL {
            if let Some(group) = CacheId::for_object(&current, id_kind) {
                let added = self.idx_multi.add(&group, entry.clone());
                assert!(added, "duplicate secondary membership in {group:?}");
            }
        }
    }

    /// Remove a cached object from every group and from the primary index.
    fn detach(&mut self, id: ObjectId, cell: &Rc<ObjectCell>) {
        debug_assert!(cell.cached.get());
        let entry = EntryRef(Rc::clone(cell));
        {
            let current = cell.data.borrow();
            for id_kind in CacheIdKind::ALL {
                if let Some(group) = CacheId::for_object(&current, id_kind) {
                    let removed = self.idx_multi.remove(&group, &entry);
                    assert!(
                        removed,
                        "secondary index out of sync for {id:?} ({id_kind:?})"
                    );
                }
            }
        }
        cell.cached.set(false);
        let owned = self.idx_main.remove(&id);
        debug_assert!(owned.is_some());
        debug_assert!(self.idx_multi.first_key_containing(&entry).is_none());
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("objects", &self.idx_main.len())
            .field("groups", &self.idx_multi.group_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::rc::Rc;

    use super::super::device::DeviceRecord;
    use super::super::link::Link;
    use super::super::object::ConfigSource;
    use super::super::route::Ip4Route;
    use super::*;

    #[test]
    fn add_then_lookup_by_probe() {
        let mut cache = Cache::new();
        let outcome = cache.update(
            Link::new(2).name("eth0").in_netlink(true).into(),
            Aspects::PUBLIC | Aspects::NETLINK,
        );
        assert!(matches!(outcome, CacheOutcome::Added { .. }));

        let handle = cache.lookup(ObjectId::link(2)).unwrap();
        assert!(handle.is_cached());
        assert_eq!(handle.kind(), ObjectKind::Link);
        assert!(cache.lookup(ObjectId::link(3)).is_none());
    }

    #[test]
    fn dead_candidate_is_not_added() {
        let mut cache = Cache::new();
        // a link known to neither source is not alive
        let outcome = cache.update(Link::new(2).into(), Aspects::ALL);
        assert!(matches!(outcome, CacheOutcome::Unchanged));
        assert!(cache.is_empty());
    }

    #[test]
    fn update_rewrites_in_place() {
        let mut cache = Cache::new();
        cache.update(
            Link::new(2).name("eth0").in_netlink(true).into(),
            Aspects::PUBLIC | Aspects::NETLINK,
        );
        let handle = cache.lookup_link(2).unwrap();

        let outcome = cache.update(
            Link::new(2).name("eth0").mtu(9000).in_netlink(true).into(),
            Aspects::PUBLIC | Aspects::NETLINK,
        );
        let CacheOutcome::Updated { object, before, .. } = outcome else {
            panic!("expected update");
        };
        // the pre-existing handle observes the new state
        assert!(handle.ptr_eq(&object));
        assert_eq!(handle.read(|obj| obj.as_link().unwrap().state.mtu), 9000);
        assert_eq!(before.as_link().unwrap().state.mtu, 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remove_releases_groups() {
        let mut cache = Cache::new();
        cache.update(
            Link::new(2).name("eth0").in_netlink(true).into(),
            Aspects::PUBLIC | Aspects::NETLINK,
        );
        assert_eq!(cache.lookup_group(&CacheId::LinksAll).len(), 1);

        let outcome = cache.remove(ObjectId::link(2));
        let CacheOutcome::Removed {
            object,
            was_visible,
        } = outcome
        else {
            panic!("expected removal");
        };
        assert!(was_visible);
        assert!(!object.is_cached());
        assert!(cache.lookup_group(&CacheId::LinksAll).is_empty());
        assert!(cache.groups().is_empty());

        // removing again is a no-op
        assert!(matches!(
            cache.remove(ObjectId::link(2)),
            CacheOutcome::Unchanged
        ));
    }

    #[test]
    fn removed_handle_keeps_final_state() {
        let mut cache = Cache::new();
        cache.update(
            Link::new(2).name("eth0").in_netlink(true).into(),
            Aspects::PUBLIC | Aspects::NETLINK,
        );
        let CacheOutcome::Removed { object, .. } = cache.remove(ObjectId::link(2)) else {
            panic!("expected removal");
        };
        assert_eq!(object.read(|obj| obj.as_link().unwrap().state.name.clone()), "eth0");
    }

    #[test]
    fn route_group_membership_follows_state() {
        let mut cache = Cache::new();
        let route = Ip4Route::new(3, Ipv4Addr::new(10, 0, 0, 0), 8, 100)
            .source(ConfigSource::Static);
        cache.update(route.into(), Aspects::PUBLIC);

        let visible = CacheId::RoutesVisibleAll {
            family: AddressFamily::V4,
        };
        assert_eq!(cache.lookup_group(&visible).len(), 1);

        // demote the route to kernel-managed: it leaves the visible groups
        // but stays cached
        let demoted = Ip4Route::new(3, Ipv4Addr::new(10, 0, 0, 0), 8, 100)
            .source(ConfigSource::Kernel);
        let outcome = cache.update(demoted.into(), Aspects::PUBLIC);
        assert!(matches!(outcome, CacheOutcome::Updated { .. }));
        assert!(cache.lookup_group(&visible).is_empty());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_detaches_everything() {
        let mut cache = Cache::new();
        cache.update(
            Link::new(1).name("lo").in_netlink(true).into(),
            Aspects::PUBLIC | Aspects::NETLINK,
        );
        cache.update(
            Ip4Route::new(1, Ipv4Addr::new(10, 0, 0, 0), 8, 0)
                .source(ConfigSource::Boot)
                .into(),
            Aspects::PUBLIC,
        );
        let handle = cache.lookup_link(1).unwrap();

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.groups().is_empty());
        assert!(!handle.is_cached());
    }

    #[test]
    fn ghost_link_handle_identity() {
        let mut cache = Cache::new();
        cache.update(
            Link::new(5).name("eth1").in_netlink(true).into(),
            Aspects::PUBLIC | Aspects::NETLINK,
        );

        // attach a device record, then drop the netlink aspect: the link
        // ghosts instead of disappearing
        let record = Rc::new(DeviceRecord::synthetic("/devices/virtual/net/eth1", "net"));
        cache.update(
            Link::new(5).udev(Rc::clone(&record)).into(),
            Aspects::UDEV,
        );
        let outcome = cache.update(Link::new(5).name("eth1").into(), Aspects::NETLINK);
        let CacheOutcome::Updated {
            object,
            was_visible,
            ..
        } = outcome
        else {
            panic!("expected ghosting update");
        };
        assert!(was_visible);
        assert!(object.is_alive());
        assert!(!object.is_visible());
        assert!(cache.lookup_group(&CacheId::LinksVisible).is_empty());
        assert_eq!(cache.lookup_group(&CacheId::LinksAll).len(), 1);
    }
}
