//! Per-chain pool store
//!
//! Holds the latest snapshot of one chain behind a single pointer. `replace`
//! builds the address index before taking the write lock and then swaps the
//! pointer, so readers see either the old snapshot or the new one in full.

use alloy::primitives::Address;
use chrono::Duration as ChronoDuration;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::debug;
use crate::{
    errors::CacheResult,
    types::{Pool, Snapshot},
    utils::normalize_address,
};

struct IndexedSnapshot {
    snapshot: Arc<Snapshot>,
    by_address: HashMap<Address, usize>,
}

pub struct PoolStore {
    chain_id: String,
    state: RwLock<Option<Arc<IndexedSnapshot>>>,
    refresh: Mutex<()>,
    consecutive_failures: AtomicU32,
}

impl PoolStore {
    pub fn new(chain_id: &str) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            state: RwLock::new(None),
            refresh: Mutex::new(()),
            consecutive_failures: AtomicU32::new(0),
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Publishes `snapshot` as the current one and returns it.
    ///
    /// `fetched_at` is forced strictly past the previous snapshot's stamp.
    pub async fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let mut by_address = HashMap::with_capacity(snapshot.pools.len());
        for (i, pool) in snapshot.pools.iter().enumerate() {
            match pool.address.trim().parse::<Address>() {
                Ok(address) => {
                    by_address.entry(address).or_insert(i);
                }
                Err(_) => debug!("Pool {} on chain {} is not indexable", pool.address, self.chain_id),
            }
        }

        let mut state = self.state.write().await;
        let snapshot = match state.as_ref() {
            Some(prev) if snapshot.fetched_at <= prev.snapshot.fetched_at => {
                let bumped = prev.snapshot.fetched_at + ChronoDuration::microseconds(1);
                snapshot.restamped(bumped)
            }
            _ => snapshot,
        };
        let snapshot = Arc::new(snapshot);
        *state = Some(Arc::new(IndexedSnapshot {
            snapshot: snapshot.clone(),
            by_address,
        }));
        self.consecutive_failures.store(0, Ordering::Relaxed);
        snapshot
    }

    /// `None` until the first successful population.
    pub async fn current(&self) -> Option<Arc<Snapshot>> {
        self.state.read().await.as_ref().map(|s| s.snapshot.clone())
    }

    /// Point lookup by address in any letter case. A malformed address is an
    /// error; an unknown one is `None`.
    pub async fn lookup(&self, address: &str) -> CacheResult<Option<Pool>> {
        let address = normalize_address(address)?;
        Ok(self.lookup_address(&address).await)
    }

    pub async fn lookup_address(&self, address: &Address) -> Option<Pool> {
        let indexed = self.state.read().await.clone()?;
        indexed
            .by_address
            .get(address)
            .map(|&i| indexed.snapshot.pools[i].clone())
    }

    pub fn record_failure(&self) -> u32 {
        self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Relaxed)
    }

    /// Serializes refreshes and lazy warm-up so one chain is fetched once at
    /// a time.
    pub(crate) async fn refresh_guard(&self) -> MutexGuard<'_, ()> {
        self.refresh.lock().await
    }
}
