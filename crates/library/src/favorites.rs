use std::collections::hash_map::RandomState;
use std::collections::HashSet;
use std::hash::BuildHasher;

use parking_lot::RwLock;

const SHARD_COUNT: usize = 32;

/// Favorite track ids, split across independently locked shards so that
/// updates to different ids rarely meet on the same lock.
pub(crate) struct FavoriteSet {
    hasher: RandomState,
    shards: Vec<RwLock<HashSet<String>>>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self {
            hasher: RandomState::new(),
            shards: (0..SHARD_COUNT).map(|_| RwLock::new(HashSet::new())).collect(),
        }
    }

    fn shard(&self, id: &str) -> &RwLock<HashSet<String>> {
        let index = (self.hasher.hash_one(id) as usize) % self.shards.len();
        &self.shards[index]
    }

    pub fn set(&self, id: &str, favorite: bool) {
        let mut shard = self.shard(id).write();
        if favorite {
            shard.insert(id.to_string());
        } else {
            shard.remove(id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shard(id).read().contains(id)
    }

    /// Sorted snapshot. Shards are read one at a time.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .shards
            .iter()
            .flat_map(|shard| shard.read().iter().cloned().collect::<Vec<_>>())
            .collect();
        ids.sort();
        ids
    }
}
