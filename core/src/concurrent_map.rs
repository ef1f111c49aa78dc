//! Sharded map for accumulating values from many threads at once.
//!
//! The key space is split into a fixed number of shards, each behind its own
//! mutex. Threads touching keys in different shards never contend; threads
//! touching the same key serialize on that key's shard.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

/// Integer keys that can be assigned to a shard.
pub trait ShardKey: Copy + Ord {
    fn shard(&self, shard_count: usize) -> usize;
}

macro_rules! impl_shard_key {
    ($($t:ty),*) => {
        $(impl ShardKey for $t {
            #[inline]
            fn shard(&self, shard_count: usize) -> usize {
                // Negative keys wrap to large values, same as a u64 cast.
                ((*self as u64) % shard_count as u64) as usize
            }
        })*
    };
}

impl_shard_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Exclusive handle to one slot. The shard stays locked until it is dropped.
pub type Access<'a, V> = MappedMutexGuard<'a, V>;

#[derive(Debug)]
pub struct ConcurrentMap<K, V> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: ShardKey, V: Default> ConcurrentMap<K, V> {
    /// A shard count of zero is bumped to one.
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1)).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { shards }
    }

    pub fn shard_count(&self) -> usize { self.shards.len() }

    fn shard_of(&self, key: &K) -> &Mutex<BTreeMap<K, V>> {
        &self.shards[key.shard(self.shards.len())]
    }

    /// Lock the key's shard and return its slot, inserting `V::default()` if absent.
    pub fn access(&self, key: K) -> Access<'_, V> {
        MutexGuard::map(self.shard_of(&key).lock(), |shard| shard.entry(key).or_default())
    }

    pub fn erase(&self, key: &K) -> Option<V> {
        self.shard_of(key).lock().remove(key)
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Merge all shards into one ordered map, locking them one at a time.
    pub fn build_ordinary_map(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        let mut result = BTreeMap::new();
        for shard in &self.shards {
            let guard = shard.lock();
            result.extend(guard.iter().map(|(k, v)| (*k, v.clone())));
        }
        result
    }

    /// Like [`build_ordinary_map`](Self::build_ordinary_map) without the clones.
    pub fn into_ordinary_map(self) -> BTreeMap<K, V> {
        let mut result = BTreeMap::new();
        for shard in self.shards {
            result.extend(shard.into_inner());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn access_inserts_default() {
        let map: ConcurrentMap<i32, f64> = ConcurrentMap::new(4);
        *map.access(7) += 1.5;
        *map.access(7) += 1.0;
        assert_eq!(map.len(), 1);
        assert_eq!(map.build_ordinary_map()[&7], 2.5);
    }

    #[test]
    fn erase_only_touches_key() {
        let map: ConcurrentMap<i32, u32> = ConcurrentMap::new(3);
        for key in 0..9 {
            *map.access(key) += 1;
        }
        assert_eq!(map.erase(&4), Some(1));
        assert_eq!(map.erase(&4), None);
        let keys: Vec<i32> = map.into_ordinary_map().into_keys().collect();
        assert_eq!(keys, vec![0, 1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn zero_shards_means_one() {
        let map: ConcurrentMap<u64, u32> = ConcurrentMap::new(0);
        assert_eq!(map.shard_count(), 1);
        *map.access(u64::MAX) += 1;
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn negative_keys_are_sharded() {
        let map: ConcurrentMap<i32, u32> = ConcurrentMap::new(5);
        *map.access(-3) += 2;
        assert_eq!(map.build_ordinary_map()[&-3], 2);
    }

    #[test]
    fn parallel_increments_are_not_lost() {
        let map: ConcurrentMap<u32, u64> = ConcurrentMap::new(8);
        (0..10_000u32).into_par_iter().for_each(|i| {
            *map.access(i % 100) += 1;
        });
        let ordinary = map.build_ordinary_map();
        assert_eq!(ordinary.len(), 100);
        assert!(ordinary.values().all(|&count| count == 100));
    }
}
