//! Cache gateway
//!
//! The only entry point to the pool stores. Each chain listed in
//! `CacheConfig::enabled_chain_ids` gets exactly one `PoolStore` at
//! construction; any other chain is served live.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};
use crate::{
    config::{validate_cache_parameter, CacheConfig, TransportMode},
    errors::{CacheError, CacheResult},
    network::{retry_with_backoff, with_timeout, ChainClient, ChainConnector, RetryConfig},
    pools::{sanitize_pools, PoolStore},
    types::{ChainCacheStatus, Pool, Snapshot},
    utils::normalize_address,
};

pub struct CacheGateway<C: ChainConnector> {
    connector: Arc<C>,
    config: Arc<CacheConfig>,
    stores: HashMap<String, Arc<PoolStore>>,
    retry: RetryConfig,
    refresh_started: AtomicBool,
}

impl<C: ChainConnector> CacheGateway<C> {
    pub fn new(connector: Arc<C>, config: Arc<CacheConfig>) -> Self {
        let stores = config
            .enabled_chain_ids
            .iter()
            .map(|chain_id| (chain_id.clone(), Arc::new(PoolStore::new(chain_id))))
            .collect();
        Self {
            connector,
            config,
            stores,
            retry: RetryConfig::default(),
            refresh_started: AtomicBool::new(false),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn transport(&self) -> TransportMode {
        self.config.transport
    }

    pub fn validate_cache_parameter(&self, use_cache: bool, operation_name: &str) -> CacheResult<()> {
        validate_cache_parameter(self.config.transport, use_cache, operation_name)
    }

    pub fn store(&self, chain_id: &str) -> Option<&Arc<PoolStore>> {
        self.stores.get(chain_id)
    }

    pub fn enabled_chains(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }

    /// Sets the process-wide "refresh started" marker. Returns `true` only
    /// for the first caller.
    pub(crate) fn mark_refresh_started(&self) -> bool {
        self.refresh_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn clear_refresh_started(&self) {
        self.refresh_started.store(false, Ordering::Release);
    }

    pub fn refresh_started(&self) -> bool {
        self.refresh_started.load(Ordering::Acquire)
    }

    /// Runs one chain-client call under the configured timeout.
    pub async fn call<T, Fut>(&self, chain_id: &str, operation: &str, call: Fut) -> CacheResult<T>
    where
        Fut: Future<Output = CacheResult<T>>,
    {
        with_timeout(self.config.call_timeout, chain_id, operation, call).await
    }

    /// Acquires a client handle scoped to one operation.
    pub async fn client(&self, chain_id: &str) -> CacheResult<C::Client> {
        self.call(chain_id, "connect", self.connector.connect(chain_id)).await
    }

    /// Fetches and sanitizes a fresh snapshot without publishing it.
    pub async fn fetch_snapshot(&self, chain_id: &str) -> CacheResult<Snapshot> {
        let pools = retry_with_backoff(
            || async {
                let client = self.client(chain_id).await?;
                self.call(chain_id, "get_all_pools", client.get_all_pools()).await
            },
            &self.retry,
            &format!("fetch pools for chain {}", chain_id),
        )
        .await?;

        let fetched = pools.len();
        let sanitized = sanitize_pools(chain_id, pools, self.config.filter_invalid_pools)?;
        let snapshot = Snapshot::new(chain_id, sanitized.pools);
        info!(
            chain_id,
            fetched,
            dropped = sanitized.dropped,
            duplicates = fetched - sanitized.dropped - snapshot.len(),
            "Fetched pool snapshot"
        );
        Ok(snapshot)
    }

    /// Fetches and publishes a snapshot for an enabled chain. On failure the
    /// previous snapshot stays current. Refreshes of one chain never overlap,
    /// so a slower fetch cannot commit over a newer one.
    pub async fn refresh_chain(&self, chain_id: &str) -> CacheResult<Arc<Snapshot>> {
        let store = self.stores.get(chain_id).ok_or_else(|| {
            CacheError::invalid(format!("Chain {} is not enabled for caching", chain_id))
        })?;
        let _guard = store.refresh_guard().await;
        self.refresh_locked(store).await
    }

    /// Caller holds the store's refresh guard.
    async fn refresh_locked(&self, store: &PoolStore) -> CacheResult<Arc<Snapshot>> {
        match self.fetch_snapshot(store.chain_id()).await {
            Ok(snapshot) => Ok(store.replace(snapshot).await),
            Err(e) => {
                let failures = store.record_failure();
                debug!("Refresh of chain {} failed ({} in a row)", store.chain_id(), failures);
                Err(e)
            }
        }
    }

    async fn warm_up(&self, store: &PoolStore) -> CacheResult<Arc<Snapshot>> {
        let _guard = store.refresh_guard().await;
        if let Some(snapshot) = store.current().await {
            return Ok(snapshot);
        }
        info!("Cache for chain {} is empty, populating on demand", store.chain_id());
        self.refresh_locked(store).await
    }

    async fn current_or_warm(&self, store: &PoolStore) -> CacheResult<Arc<Snapshot>> {
        match store.current().await {
            Some(snapshot) => Ok(snapshot),
            None => self.warm_up(store).await,
        }
    }

    /// Cached pools of a chain. An enabled chain that was never populated is
    /// fetched synchronously; a chain without a store is served live.
    pub async fn get_cached_pools(&self, chain_id: &str) -> CacheResult<Arc<Snapshot>> {
        match self.stores.get(chain_id) {
            Some(store) => self.current_or_warm(store).await,
            None => {
                debug!("Chain {} is not cached, serving live pools", chain_id);
                let pools = self.get_pools_from_chain(chain_id).await?;
                Ok(Arc::new(Snapshot::new(chain_id, pools)))
            }
        }
    }

    /// Like `get_cached_pools` but never falls back to a live fetch for
    /// chains without a store.
    pub async fn cached_snapshot(&self, chain_id: &str) -> CacheResult<Option<Arc<Snapshot>>> {
        match self.stores.get(chain_id) {
            Some(store) => self.current_or_warm(store).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn get_pool_from_cache(&self, chain_id: &str, address: &str) -> CacheResult<Option<Pool>> {
        let address = normalize_address(address)?;
        match self.stores.get(chain_id) {
            Some(store) => {
                self.current_or_warm(store).await?;
                Ok(store.lookup_address(&address).await)
            }
            None => self.get_pool_from_chain(chain_id, &address.to_string()).await,
        }
    }

    pub async fn get_pools_from_chain(&self, chain_id: &str) -> CacheResult<Vec<Pool>> {
        let client = self.client(chain_id).await?;
        self.call(chain_id, "get_all_pools", client.get_all_pools()).await
    }

    pub async fn get_pool_from_chain(&self, chain_id: &str, address: &str) -> CacheResult<Option<Pool>> {
        let address = normalize_address(address)?;
        let client = self.client(chain_id).await?;
        self.call(chain_id, "get_pool", client.get_pool(&address)).await
    }

    /// Pools from the cache or straight from the chain.
    pub async fn select_pools(&self, chain_id: &str, use_cache: bool) -> CacheResult<Arc<Snapshot>> {
        if use_cache {
            self.get_cached_pools(chain_id).await
        } else {
            let pools = self.get_pools_from_chain(chain_id).await?;
            Ok(Arc::new(Snapshot::new(chain_id, pools)))
        }
    }

    pub async fn select_pool(&self, chain_id: &str, address: &str, use_cache: bool) -> CacheResult<Option<Pool>> {
        if use_cache {
            self.get_pool_from_cache(chain_id, address).await
        } else {
            self.get_pool_from_chain(chain_id, address).await
        }
    }

    pub async fn status(&self) -> Vec<ChainCacheStatus> {
        let stale_after = self.config.refresh_interval().as_secs() * 2;
        let mut report = Vec::with_capacity(self.stores.len());
        for (chain_id, store) in &self.stores {
            let current = store.current().await;
            let age_seconds = current.as_ref().map(|s| s.age_secs());
            report.push(ChainCacheStatus {
                chain_id: chain_id.clone(),
                populated: current.is_some(),
                pool_count: current.as_ref().map(|s| s.len()).unwrap_or(0),
                fetched_at: current.as_ref().map(|s| s.fetched_at),
                age_seconds,
                stale: age_seconds.map(|age| age > stale_after).unwrap_or(true),
                consecutive_failures: store.consecutive_failures(),
            });
        }
        report.sort_by(|a, b| a.chain_id.cmp(&b.chain_id));
        report
    }
}
