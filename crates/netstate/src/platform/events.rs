//! Change notifications and event-driven ingestion.
//!
//! [`Platform`] is the facade a daemon embeds: it owns the [`Cache`],
//! applies observations coming from the source adapters, and fans out one
//! [`CacheChange`] per successful mutation to every subscriber. `Unchanged`
//! outcomes never notify, so duplicate kernel messages cost nothing
//! downstream.
//!
//! Notifications are dispatched after the cache mutation has fully
//! completed, and subscribers receive them over channels: a consumer can
//! react by reading the cache freely, and there is no window in which a
//! handler could reenter an in-flight update.
//!
//! # Example
//!
//! ```
//! use netstate::platform::{Aspects, Link, Platform, SourceEvent};
//!
//! let mut platform = Platform::new();
//! let mut changes = platform.subscribe();
//!
//! platform.apply(SourceEvent::Update {
//!     object: Link::new(2).name("eth0").in_netlink(true).into(),
//!     aspects: Aspects::PUBLIC | Aspects::NETLINK,
//! });
//!
//! let change = changes.try_recv().unwrap();
//! assert_eq!(change.object().ifindex(), 2);
//! ```

use tokio::sync::mpsc;
use tokio_stream::{Stream, StreamExt};
use tracing::trace;

use super::cache::{Cache, CacheOutcome};
use super::object::{Aspects, Object, ObjectId};

/// A change applied to the cache.
///
/// Carries snapshots, never handles: subscribers own their copy of the
/// state and cannot retain cache internals.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CacheChange {
    /// An object appeared.
    Added {
        /// The new object state.
        new: Object,
    },
    /// An object changed in place.
    Updated {
        /// State before the update.
        old: Object,
        /// State after the update.
        new: Object,
        /// Whether the object was visible before the update.
        was_visible: bool,
    },
    /// An object disappeared.
    Removed {
        /// The final state of the removed object.
        old: Object,
        /// Whether the object was visible before the removal.
        was_visible: bool,
    },
}

impl CacheChange {
    /// The snapshot that best describes the object now: the new state for
    /// additions and updates, the final state for removals.
    pub fn object(&self) -> &Object {
        match self {
            CacheChange::Added { new } => new,
            CacheChange::Updated { new, .. } => new,
            CacheChange::Removed { old, .. } => old,
        }
    }

    /// The interface index the change concerns.
    pub fn ifindex(&self) -> i32 {
        self.object().ifindex()
    }

    /// Whether this is a removal.
    pub fn is_removed(&self) -> bool {
        matches!(self, CacheChange::Removed { .. })
    }

    /// Returns "added", "updated" or "removed", for display purposes.
    pub fn action(&self) -> &'static str {
        match self {
            CacheChange::Added { .. } => "added",
            CacheChange::Updated { .. } => "updated",
            CacheChange::Removed { .. } => "removed",
        }
    }
}

/// One observation produced by a source adapter.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceEvent {
    /// The source saw the object; `aspects` names what it actually
    /// observed.
    Update {
        /// The candidate object, populated for the named aspects.
        object: Object,
        /// The aspects the source owns in this observation.
        aspects: Aspects,
    },
    /// The source saw the object disappear.
    Remove {
        /// Identity of the vanished object.
        id: ObjectId,
    },
}

/// The platform facade: a cache plus its notification fan-out.
///
/// All mutation is synchronous and single-threaded; callers in another
/// execution context must route their events through one owner of the
/// `Platform`.
pub struct Platform {
    cache: Cache,
    subscribers: Vec<mpsc::UnboundedSender<CacheChange>>,
}

impl Platform {
    /// Create a platform with an empty cache.
    pub fn new() -> Self {
        Self {
            cache: Cache::new(),
            subscribers: Vec::new(),
        }
    }

    /// Read access to the cache.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Register a subscriber. Every future successful mutation delivers
    /// exactly one [`CacheChange`] to the returned receiver; dropping the
    /// receiver unsubscribes.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<CacheChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Apply an update observation. See [`Cache::update`].
    pub fn update(&mut self, object: Object, aspects: Aspects) -> CacheOutcome {
        let outcome = self.cache.update(object, aspects);
        self.notify(&outcome);
        outcome
    }

    /// Apply a removal observation. See [`Cache::remove`].
    pub fn remove(&mut self, id: ObjectId) -> CacheOutcome {
        let outcome = self.cache.remove(id);
        self.notify(&outcome);
        outcome
    }

    /// Apply one source event.
    pub fn apply(&mut self, event: SourceEvent) -> CacheOutcome {
        match event {
            SourceEvent::Update { object, aspects } => self.update(object, aspects),
            SourceEvent::Remove { id } => self.remove(id),
        }
    }

    /// Drive the platform from a stream of source events until the stream
    /// ends.
    pub async fn run<S>(&mut self, mut events: S)
    where
        S: Stream<Item = SourceEvent> + Unpin,
    {
        while let Some(event) = events.next().await {
            self.apply(event);
        }
    }

    fn notify(&mut self, outcome: &CacheOutcome) {
        let change = match outcome {
            CacheOutcome::Unchanged => return,
            CacheOutcome::Added { object } => CacheChange::Added {
                new: object.snapshot(),
            },
            CacheOutcome::Updated {
                object,
                before,
                was_visible,
            } => CacheChange::Updated {
                old: before.clone(),
                new: object.snapshot(),
                was_visible: *was_visible,
            },
            CacheOutcome::Removed {
                object,
                was_visible,
            } => CacheChange::Removed {
                old: object.snapshot(),
                was_visible: *was_visible,
            },
        };
        trace!(action = change.action(), ifindex = change.ifindex(), "notify");
        self.subscribers
            .retain(|tx| tx.send(change.clone()).is_ok());
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}
