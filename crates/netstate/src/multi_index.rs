//! Generic multi-membership index.
//!
//! A [`MultiIndex`] maps opaque group keys to sorted, deduplicated
//! collections of members. It knows nothing about what the keys or members
//! mean; the platform cache builds all of its secondary views on top of it.
//!
//! Each group is kept as a sorted vector, so membership tests are binary
//! searches and iteration over a group is a contiguous scan. The ordering
//! of members within a group is whatever total order `V` provides; callers
//! only get a membership guarantee, never a semantic ordering.
//!
//! # Example
//!
//! ```
//! use netstate::multi_index::MultiIndex;
//!
//! let mut index: MultiIndex<&str, u32> = MultiIndex::new();
//! index.add(&"even", 2);
//! index.add(&"even", 4);
//! index.add(&"small", 2);
//!
//! assert!(index.contains(&"even", &2));
//! assert_eq!(index.lookup(&"even"), &[2, 4]);
//! assert_eq!(index.group_count(), 2);
//! ```

use std::collections::HashMap;
use std::hash::Hash;

/// Maps group keys to sorted, deduplicated member collections.
///
/// A member may belong to any number of groups. Groups exist only while
/// they have at least one member: the first [`add`](MultiIndex::add) for a
/// key creates the group (cloning the caller-supplied key, so the caller
/// may keep reusing a stack-allocated one), and removing the last member
/// drops the group again.
#[derive(Debug)]
pub struct MultiIndex<K, V> {
    groups: HashMap<K, Vec<V>>,
}

impl<K, V> MultiIndex<K, V>
where
    K: Hash + Eq + Clone,
    V: Ord + Clone,
{
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    /// Members of `key` in ascending order; empty if the group does not
    /// exist.
    pub fn lookup(&self, key: &K) -> &[V] {
        self.groups.get(key).map_or(&[], Vec::as_slice)
    }

    /// Whether `member` belongs to the group `key`.
    pub fn contains(&self, key: &K, member: &V) -> bool {
        self.groups
            .get(key)
            .is_some_and(|group| group.binary_search(member).is_ok())
    }

    /// Add `member` to the group `key`.
    ///
    /// Returns `false` if the member was already present. The key is only
    /// cloned when this insertion creates the group.
    pub fn add(&mut self, key: &K, member: V) -> bool {
        if let Some(group) = self.groups.get_mut(key) {
            match group.binary_search(&member) {
                Ok(_) => false,
                Err(pos) => {
                    group.insert(pos, member);
                    true
                }
            }
        } else {
            self.groups.insert(key.clone(), vec![member]);
            true
        }
    }

    /// Remove `member` from the group `key`.
    ///
    /// Returns `false` if the member was not present. Removing the last
    /// member drops the group entirely.
    pub fn remove(&mut self, key: &K, member: &V) -> bool {
        let Some(group) = self.groups.get_mut(key) else {
            return false;
        };
        match group.binary_search(member) {
            Ok(pos) => {
                group.remove(pos);
                if group.is_empty() {
                    self.groups.remove(key);
                }
                true
            }
            Err(_) => false,
        }
    }

    /// Remove `member` from `old` and add it to `new` in one step.
    ///
    /// Both keys are optional: `None` for `old` means the member was not
    /// indexed before, `None` for `new` means it must not be indexed
    /// afterwards. When both keys are equal the call degenerates to a
    /// check that the member is already present.
    ///
    /// Returns `true` only if the removal and the insertion both behaved
    /// as expected: `false` means the member was missing from `old`, or
    /// already present under `new`.
    pub fn transfer(&mut self, old: Option<&K>, new: Option<&K>, member: &V) -> bool {
        match (old, new) {
            (None, None) => true,
            (None, Some(new)) => self.add(new, member.clone()),
            (Some(old), None) => self.remove(old, member),
            (Some(old), Some(new)) if old == new => {
                // Membership check: the add must find the member already
                // there.
                !self.add(new, member.clone())
            }
            (Some(old), Some(new)) => {
                let removed = self.remove(old, member);
                self.add(new, member.clone()) && removed
            }
        }
    }

    /// Iterate over all groups as `(key, sorted members)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.groups.iter().map(|(key, group)| (key, group.as_slice()))
    }

    /// Iterate only over the groups that contain `member`.
    pub fn iter_containing<'a>(
        &'a self,
        member: &'a V,
    ) -> impl Iterator<Item = (&'a K, &'a [V])> + 'a {
        self.groups
            .iter()
            .filter(move |(_, group)| group.binary_search(member).is_ok())
            .map(|(key, group)| (key, group.as_slice()))
    }

    /// The key of some group containing `member`, if any.
    ///
    /// This scans every group and binary-searches each: O(number of
    /// groups). The index is meant for callers that always know the key of
    /// a member; reverse lookup is not an optimized access path.
    pub fn first_key_containing<'a>(&'a self, member: &'a V) -> Option<&'a K> {
        self.iter_containing(member).next().map(|(key, _)| key)
    }

    /// Number of non-empty groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Whether the index has no groups at all.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<K, V> Default for MultiIndex<K, V>
where
    K: Hash + Eq + Clone,
    V: Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_contains_remove_round_trip() {
        let mut index: MultiIndex<u8, u32> = MultiIndex::new();

        assert!(index.add(&1, 10));
        assert!(index.contains(&1, &10));
        assert!(index.remove(&1, &10));
        assert!(!index.contains(&1, &10));
        // group dropped with its last member
        assert_eq!(index.group_count(), 0);
    }

    #[test]
    fn add_deduplicates() {
        let mut index: MultiIndex<u8, u32> = MultiIndex::new();

        assert!(index.add(&1, 10));
        assert!(!index.add(&1, 10));
        assert_eq!(index.lookup(&1), &[10]);
    }

    #[test]
    fn members_stay_sorted() {
        let mut index: MultiIndex<u8, u32> = MultiIndex::new();

        index.add(&1, 30);
        index.add(&1, 10);
        index.add(&1, 20);
        assert_eq!(index.lookup(&1), &[10, 20, 30]);
    }

    #[test]
    fn remove_absent_member() {
        let mut index: MultiIndex<u8, u32> = MultiIndex::new();

        assert!(!index.remove(&1, &10));
        index.add(&1, 10);
        assert!(!index.remove(&1, &20));
        assert!(!index.remove(&2, &10));
    }

    #[test]
    fn lookup_missing_group_is_empty() {
        let index: MultiIndex<u8, u32> = MultiIndex::new();
        assert!(index.lookup(&7).is_empty());
    }

    #[test]
    fn transfer_moves_between_groups() {
        let mut index: MultiIndex<u8, u32> = MultiIndex::new();

        index.add(&1, 10);
        assert!(index.transfer(Some(&1), Some(&2), &10));
        assert!(!index.contains(&1, &10));
        assert!(index.contains(&2, &10));
    }

    #[test]
    fn transfer_with_optional_keys() {
        let mut index: MultiIndex<u8, u32> = MultiIndex::new();

        // not indexed before, not indexed after: trivially fine
        assert!(index.transfer(None, None, &10));
        // pure add
        assert!(index.transfer(None, Some(&1), &10));
        assert!(index.contains(&1, &10));
        // pure remove
        assert!(index.transfer(Some(&1), None, &10));
        assert!(index.is_empty());
    }

    #[test]
    fn transfer_equal_keys_checks_membership() {
        let mut index: MultiIndex<u8, u32> = MultiIndex::new();

        index.add(&1, 10);
        assert!(index.transfer(Some(&1), Some(&1), &10));
        // member missing: the degenerate check fails (and leaves the
        // member added, like the remove+add it stands for)
        assert!(!index.transfer(Some(&1), Some(&1), &20));
        assert!(index.contains(&1, &20));
    }

    #[test]
    fn transfer_reports_unexpected_state() {
        let mut index: MultiIndex<u8, u32> = MultiIndex::new();

        // missing from the old group
        index.add(&2, 99);
        assert!(!index.transfer(Some(&1), Some(&2), &10));
        // present in the new group already
        index.add(&3, 10);
        index.add(&4, 10);
        assert!(!index.transfer(Some(&3), Some(&4), &10));
    }

    #[test]
    fn reverse_lookup_scans_groups() {
        let mut index: MultiIndex<u8, u32> = MultiIndex::new();

        assert_eq!(index.first_key_containing(&10), None);
        index.add(&1, 10);
        index.add(&2, 20);
        assert_eq!(index.first_key_containing(&20), Some(&2));

        let containing: Vec<&u8> = index.iter_containing(&10).map(|(k, _)| k).collect();
        assert_eq!(containing, vec![&1]);
    }

    #[test]
    fn iter_visits_all_groups() {
        let mut index: MultiIndex<u8, u32> = MultiIndex::new();

        index.add(&1, 10);
        index.add(&2, 20);
        index.add(&2, 21);

        let mut total = 0;
        for (_, members) in index.iter() {
            total += members.len();
        }
        assert_eq!(total, 3);
        assert_eq!(index.group_count(), 2);
    }
}
