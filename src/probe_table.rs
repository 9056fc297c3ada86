//! ProbeTable: open-addressing hash table with linear probing and tombstones.
//!
//! All entries live in one slot array. A key's home slot is
//! `hash(key) mod capacity`; collisions walk forward one slot at a time,
//! wrapping at the end.
//!
//! Invariants
//! - A slot is `Empty`, `Tombstone` or `Live`. Removal turns a `Live` slot
//!   into a `Tombstone` so keys inserted after it along the same chain stay
//!   reachable. Lookups skip tombstones and stop only at `Empty`.
//! - At most one `Live` slot holds a given key.
//! - `live + tombstones <= max_load * capacity` after every insert, so at
//!   least one `Empty` slot always exists and every probe terminates.
//! - Each entry keeps the hash computed at insertion; rebuilding never calls
//!   `K: Hash` again.

use crate::reentrancy::ReentrancyCheck;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Slot count of a table created with [`ProbeTable::new`].
pub const DEFAULT_CAPACITY: usize = 16;
/// Default ceiling for `(live + tombstones) / capacity`.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

const MIN_LOAD_FACTOR: f64 = 0.1;
const MAX_LOAD_FACTOR: f64 = 0.95;

struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

enum Slot<K, V> {
    Empty,
    Tombstone,
    Live(Entry<K, V>),
}

/// Outcome of walking a probe chain for a key.
enum Probe {
    Found(usize),
    /// Key absent; `usize` is where a new entry should go (first tombstone
    /// passed, else the terminating empty slot).
    Vacant(usize),
}

pub struct ProbeTable<K, V, S = DefaultHashBuilder> {
    hasher: S,
    slots: Vec<Slot<K, V>>,
    live: usize,
    tombstones: usize,
    max_load: f64,
    reentrancy: ReentrancyCheck,
}

impl<K, V> ProbeTable<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V> Default for ProbeTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || Slot::Empty);
    slots
}

impl<K, V, S> ProbeTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hasher)
    }

    /// Creates a table with `capacity` slots (at least one).
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            slots: empty_slots(capacity.max(1)),
            live: 0,
            tombstones: 0,
            max_load: DEFAULT_MAX_LOAD_FACTOR,
            reentrancy: ReentrancyCheck::new(),
        }
    }

    /// Sets the load ceiling that triggers a rebuild, clamped to `[0.1, 0.95]`.
    pub fn with_max_load_factor(mut self, factor: f64) -> Self {
        self.max_load = if factor.is_nan() {
            DEFAULT_MAX_LOAD_FACTOR
        } else {
            factor.clamp(MIN_LOAD_FACTOR, MAX_LOAD_FACTOR)
        };
        self
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots holding a removed entry.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    #[inline]
    fn home(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    fn probe<Q>(&self, hash: u64, q: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let cap = self.slots.len();
        let mut idx = self.home(hash);
        let mut first_tombstone = None;
        for _ in 0..cap {
            match &self.slots[idx] {
                Slot::Empty => return Probe::Vacant(first_tombstone.unwrap_or(idx)),
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(idx);
                }
                Slot::Live(e) => {
                    if e.hash == hash && e.key.borrow() == q {
                        return Probe::Found(idx);
                    }
                }
            }
            idx = (idx + 1) % cap;
        }
        // Only reachable when no slot is Empty, which the load ceiling rules
        // out; a tombstone is then the sole candidate.
        Probe::Vacant(first_tombstone.unwrap_or(cap))
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get");
        let hash = self.make_hash(q);
        match self.probe(hash, q) {
            Probe::Found(i) => match &self.slots[i] {
                Slot::Live(e) => Some(&e.value),
                _ => None,
            },
            Probe::Vacant(_) => None,
        }
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let found = {
            let _g = self.reentrancy.enter("get_mut");
            let hash = self.make_hash(q);
            self.probe(hash, q)
        };
        match found {
            Probe::Found(i) => match &mut self.slots[i] {
                Slot::Live(e) => Some(&mut e.value),
                _ => None,
            },
            Probe::Vacant(_) => None,
        }
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).is_some()
    }

    /// Inserts or overwrites. Returns the previous value when `key` was present.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let (hash, probe) = {
            let _g = self.reentrancy.enter("put");
            let hash = self.make_hash(&key);
            (hash, self.probe(hash, &key))
        };

        let slot = match probe {
            Probe::Found(i) => {
                if let Slot::Live(e) = &mut self.slots[i] {
                    return Some(core::mem::replace(&mut e.value, value));
                }
                unreachable!("probe reported a live slot")
            }
            Probe::Vacant(i) => {
                if self.needs_rebuild() {
                    self.rebuild();
                    self.vacant_after_rebuild(hash)
                } else {
                    i
                }
            }
        };

        if matches!(self.slots[slot], Slot::Tombstone) {
            self.tombstones -= 1;
        }
        self.slots[slot] = Slot::Live(Entry { key, value, hash });
        self.live += 1;
        None
    }

    /// Marks the key's slot as a tombstone and returns its value.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let found = {
            let _g = self.reentrancy.enter("remove");
            let hash = self.make_hash(q);
            self.probe(hash, q)
        };
        let Probe::Found(i) = found else {
            return None;
        };
        match core::mem::replace(&mut self.slots[i], Slot::Tombstone) {
            Slot::Live(e) => {
                self.live -= 1;
                self.tombstones += 1;
                Some(e.value)
            }
            other => {
                self.slots[i] = other;
                None
            }
        }
    }

    /// Raw slot access for full-table scans. Returns `None` for empty or
    /// tombstoned slots and for indices outside `[0, capacity)`.
    pub fn get_from_index(&self, index: usize) -> Option<&V> {
        match self.slots.get(index)? {
            Slot::Live(e) => Some(&e.value),
            _ => None,
        }
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
        }
    }

    fn needs_rebuild(&self) -> bool {
        let occupied = (self.live + self.tombstones + 1) as f64;
        occupied > self.max_load * self.slots.len() as f64
    }

    /// Rehashes live entries into a fresh slot array, dropping tombstones.
    fn rebuild(&mut self) {
        let old_capacity = self.slots.len();
        let half_threshold = self.max_load / 2.0;
        let mut new_capacity = old_capacity;
        while (self.live + 1) as f64 > half_threshold * new_capacity as f64 {
            new_capacity *= 2;
        }
        tracing::trace!(
            old_capacity,
            new_capacity,
            live = self.live,
            tombstones = self.tombstones,
            "rebuilding probe table"
        );

        let old = core::mem::replace(&mut self.slots, empty_slots(new_capacity));
        self.tombstones = 0;
        for slot in old {
            if let Slot::Live(e) = slot {
                let i = self.vacant_after_rebuild(e.hash);
                self.slots[i] = Slot::Live(e);
            }
        }
    }

    /// First empty slot on `hash`'s chain; valid only while there are no
    /// tombstones and the key is known to be absent.
    fn vacant_after_rebuild(&self, hash: u64) -> usize {
        let cap = self.slots.len();
        let mut idx = self.home(hash);
        while !matches!(self.slots[idx], Slot::Empty) {
            idx = (idx + 1) % cap;
        }
        idx
    }
}

/// Iterator over live `(key, value)` pairs in slot order.
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Live(e) = slot {
                return Some((&e.key, &e.value));
            }
        }
        None
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ProbeTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut m = f.debug_map();
        for slot in &self.slots {
            if let Slot::Live(e) = slot {
                m.entry(&e.key, &e.value);
            }
        }
        m.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::Hasher;

    #[derive(Clone, Default)]
    struct ConstBuildHasher;
    struct ConstHasher;
    impl BuildHasher for ConstBuildHasher {
        type Hasher = ConstHasher;
        fn build_hasher(&self) -> Self::Hasher {
            ConstHasher
        }
    }
    impl Hasher for ConstHasher {
        fn write(&mut self, _bytes: &[u8]) {}
        fn finish(&self) -> u64 {
            0
        } // force all keys into the same home slot
    }

    /// Invariant: absent -> put -> present -> remove -> absent -> put again.
    #[test]
    fn tombstoned_key_can_be_reinserted() {
        let mut t: ProbeTable<String, i32> = ProbeTable::with_capacity(8);
        assert_eq!(t.get("k"), None);
        assert_eq!(t.put("k".to_string(), 1), None);
        assert_eq!(t.get("k"), Some(&1));
        assert_eq!(t.remove("k"), Some(1));
        assert_eq!(t.get("k"), None);
        assert_eq!(t.tombstones(), 1);
        assert_eq!(t.put("k".to_string(), 2), None);
        assert_eq!(t.get("k"), Some(&2));
        assert_eq!(t.len(), 1);
    }

    /// Invariant: `put` on an existing key overwrites and reports the old value.
    #[test]
    fn put_overwrites_existing_key() {
        let mut t: ProbeTable<&'static str, i32> = ProbeTable::new();
        assert_eq!(t.put("a", 1), None);
        assert_eq!(t.put("a", 5), Some(1));
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(&"a"), Some(&5));
    }

    /// Invariant: with every key in one bucket, linear probing still finds
    /// each key's own value.
    #[test]
    fn single_bucket_keys_all_resolve() {
        let mut t: ProbeTable<String, usize, ConstBuildHasher> =
            ProbeTable::with_capacity_and_hasher(64, ConstBuildHasher);
        for i in 0..40 {
            t.put(format!("key{i}"), i);
        }
        for i in 0..40 {
            assert_eq!(t.get(format!("key{i}").as_str()), Some(&i));
        }
        assert_eq!(t.len(), 40);
    }

    /// Invariant: removing an early chain member leaves later members reachable.
    #[test]
    fn tombstone_keeps_later_chain_members_reachable() {
        let mut t: ProbeTable<&'static str, i32, ConstBuildHasher> =
            ProbeTable::with_capacity_and_hasher(8, ConstBuildHasher);
        t.put("a", 1);
        t.put("b", 2);
        t.put("c", 3);
        assert_eq!(t.remove(&"a"), Some(1));
        assert_eq!(t.get(&"b"), Some(&2));
        assert_eq!(t.get(&"c"), Some(&3));
        // Overwriting a key behind the tombstone must not duplicate it.
        assert_eq!(t.put("c", 30), Some(3));
        assert_eq!(t.len(), 2);
        assert_eq!(t.iter().filter(|(k, _)| **k == "c").count(), 1);
    }

    /// Invariant: a new key reuses the first tombstone on its chain.
    #[test]
    fn new_key_reuses_tombstone() {
        let mut t: ProbeTable<&'static str, i32, ConstBuildHasher> =
            ProbeTable::with_capacity_and_hasher(8, ConstBuildHasher);
        t.put("a", 1);
        t.put("b", 2);
        t.remove(&"a");
        t.put("z", 26);
        assert_eq!(t.tombstones(), 0);
        assert_eq!(t.get_from_index(0), Some(&26));
        assert_eq!(t.get_from_index(1), Some(&2));
    }

    /// Invariant: the table grows instead of filling up.
    #[test]
    fn inserting_past_capacity_grows_the_table() {
        let mut t: ProbeTable<u32, u32> = ProbeTable::with_capacity(4);
        for i in 0..1000 {
            t.put(i, i * 2);
        }
        assert_eq!(t.len(), 1000);
        assert!(t.capacity() >= 1000);
        assert!((t.len() + t.tombstones()) as f64 <= t.max_load_factor() * t.capacity() as f64);
        for i in 0..1000 {
            assert_eq!(t.get(&i), Some(&(i * 2)));
        }
    }

    /// Invariant: churn through insert/remove cycles never exhausts the slots;
    /// tombstones are purged by an in-place rebuild.
    #[test]
    fn churn_purges_tombstones_without_growing() {
        let mut t: ProbeTable<u32, u32> = ProbeTable::with_capacity(32);
        for round in 0..200u32 {
            t.put(round, round);
            assert_eq!(t.remove(&round), Some(round));
        }
        assert!(t.is_empty());
        assert_eq!(t.capacity(), 32);
        assert!(t.tombstones() < 32);
    }

    #[test]
    fn get_from_index_out_of_range_is_none() {
        let mut t: ProbeTable<u8, u8> = ProbeTable::with_capacity(4);
        t.put(1, 1);
        assert_eq!(t.get_from_index(4), None);
        assert_eq!(t.get_from_index(usize::MAX), None);
        let live: Vec<_> = (0..t.capacity()).filter_map(|i| t.get_from_index(i)).collect();
        assert_eq!(live, vec![&1]);
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut t: ProbeTable<String, Vec<i32>> = ProbeTable::new();
        t.put("v".to_string(), vec![1]);
        t.get_mut("v").expect("present").push(2);
        assert_eq!(t.get("v"), Some(&vec![1, 2]));
        assert!(t.get_mut("w").is_none());
    }

    #[test]
    fn load_factor_is_clamped() {
        let t: ProbeTable<u8, u8> = ProbeTable::new().with_max_load_factor(2.0);
        assert_eq!(t.max_load_factor(), 0.95);
        let t: ProbeTable<u8, u8> = ProbeTable::new().with_max_load_factor(0.0);
        assert_eq!(t.max_load_factor(), 0.1);
        let t: ProbeTable<u8, u8> = ProbeTable::new().with_max_load_factor(f64::NAN);
        assert_eq!(t.max_load_factor(), DEFAULT_MAX_LOAD_FACTOR);
    }

    /// Invariant (debug-only): re-entering the table from `K: Eq` during a
    /// probe panics.
    #[cfg(debug_assertions)]
    #[test]
    fn reentrancy_from_eq_during_get_panics() {
        struct ReentryKey {
            id: &'static str,
            table: *const ProbeTable<ReentryKey, i32, ConstBuildHasher>,
        }
        impl PartialEq for ReentryKey {
            fn eq(&self, other: &Self) -> bool {
                if !other.table.is_null() {
                    // Probe the same table while it is mid-lookup.
                    unsafe {
                        let t = &*other.table;
                        let _ = t.get(self);
                    }
                }
                self.id == other.id
            }
        }
        impl Eq for ReentryKey {}
        impl Hash for ReentryKey {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }

        let mut t: ProbeTable<ReentryKey, i32, ConstBuildHasher> =
            ProbeTable::with_capacity_and_hasher(8, ConstBuildHasher);
        t.put(
            ReentryKey {
                id: "a",
                table: core::ptr::null(),
            },
            1,
        );
        let query = ReentryKey {
            id: "b",
            table: &t as *const _,
        };
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = t.get(&query);
        }));
        assert!(res.is_err(), "expected reentrancy to panic in debug builds");
    }
}
