use std::collections::BTreeMap;
use std::hash::Hash;

use rustc_hash::FxHashMap;

#[derive(Clone, Debug)]
struct Slot<V> {
    seq: u64,
    value: V,
}

/// Keyed records that remember insertion order.
///
/// Lookups go through a hash map; a sequence-ordered side table gives
/// iteration in insertion order with `O(log n)` removal.
#[derive(Clone, Debug)]
pub(crate) struct OrderedStore<K, V> {
    slots: FxHashMap<K, Slot<V>>,
    order: BTreeMap<u64, K>,
    next_seq: u64,
}

impl<K, V> Default for OrderedStore<K, V> {
    fn default() -> Self {
        Self {
            slots: FxHashMap::default(),
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

impl<K: Copy + Eq + Hash, V> OrderedStore<K, V> {
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.slots.get_mut(key).map(|slot| &mut slot.value)
    }

    /// Appends `value`. The caller has already rejected duplicate keys.
    pub(crate) fn push(&mut self, key: K, value: V) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, key);
        self.slots.insert(key, Slot { seq, value });
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let slot = self.slots.remove(key)?;
        self.order.remove(&slot.seq);
        Some(slot.value)
    }

    /// Values in insertion order.
    pub(crate) fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.order
            .values()
            .filter_map(move |key| self.slots.get(key).map(|slot| &slot.value))
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.values()
    }

    pub(crate) fn order_len(&self) -> usize {
        self.order.len()
    }
}
