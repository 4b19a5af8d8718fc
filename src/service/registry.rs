//! Concurrent map of shared pools.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::info;

use super::shared_pool::SharedPool;
use crate::config::AmmConfig;
use crate::domain::{AssetId, PoolId};
use crate::error::{AmmError, Result};
use crate::factory::DefaultPoolFactory;
use crate::pools::Pool;

/// Pools keyed by [`PoolId`].
///
/// Lookups hand out [`SharedPool`] clones, so a caller never holds a map
/// shard lock while working on a pool.  Ids assigned by
/// [`create`](Self::create) start at 1 and never repeat.
#[derive(Debug)]
pub struct PoolRegistry {
    pools: DashMap<PoolId, SharedPool>,
    next_id: AtomicU64,
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pools: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Builds a pool from `config` under a fresh id and registers it.
    ///
    /// # Errors
    ///
    /// As [`DefaultPoolFactory::create_with_id`].
    pub fn create(&self, config: &AmmConfig) -> Result<SharedPool> {
        let id = self.allocate_id()?;
        self.insert(DefaultPoolFactory::create_with_id(id, config)?)
    }

    /// Registers an existing pool under its own id.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidConfiguration`] if the id is already taken.
    pub fn insert(&self, pool: Pool) -> Result<SharedPool> {
        let id = pool.id();
        match self.pools.entry(id) {
            Entry::Occupied(_) => {
                Err(AmmError::InvalidConfiguration("pool id already registered"))
            }
            Entry::Vacant(slot) => {
                let shared = SharedPool::new(pool);
                slot.insert(shared.clone());
                self.next_id.fetch_max(id.get().saturating_add(1), Ordering::Relaxed);
                info!(pool = %id, "pool registered");
                Ok(shared)
            }
        }
    }

    /// Handle to the pool under `id`.
    #[must_use]
    pub fn get(&self, id: PoolId) -> Option<SharedPool> {
        self.pools.get(&id).map(|entry| entry.value().clone())
    }

    /// Unregisters the pool under `id`.  Outstanding handles stay usable.
    pub fn remove(&self, id: PoolId) -> Option<SharedPool> {
        let removed = self.pools.remove(&id).map(|(_, pool)| pool);
        if removed.is_some() {
            info!(pool = %id, "pool removed");
        }
        removed
    }

    /// Number of registered pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// `true` when no pool is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Registered ids, ascending.
    #[must_use]
    pub fn ids(&self) -> Vec<PoolId> {
        let mut ids: Vec<PoolId> = self.pools.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of the pools holding both assets, ascending.
    #[must_use]
    pub fn pools_for_pair(&self, a: &AssetId, b: &AssetId) -> Vec<PoolId> {
        let mut ids: Vec<PoolId> = self
            .pools
            .iter()
            .filter(|entry| {
                entry
                    .value()
                    .with_read(|pool| pool.assets().contains(a) && pool.assets().contains(b))
            })
            .map(|entry| *entry.key())
            .collect();
        ids.sort_unstable();
        ids
    }

    fn allocate_id(&self) -> Result<PoolId> {
        let raw = self.next_id.fetch_add(1, Ordering::Relaxed);
        if raw == u64::MAX {
            return Err(AmmError::Overflow("pool id space exhausted"));
        }
        Ok(PoolId::new(raw))
    }
}
