//! Background pool refresh
//!
//! One task per cache-enabled chain. A chain's loop never waits on another
//! chain, and a failed tick leaves the previous snapshot in place.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use crate::{
    cache::CacheGateway,
    errors::{CacheError, CacheResult},
    network::ChainConnector,
};

/// Consecutive failures after which a chain is reported at error level.
const FAILURE_ESCALATION: u32 = 5;

pub struct RefreshScheduler<C: ChainConnector> {
    gateway: Arc<CacheGateway<C>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<C: ChainConnector> RefreshScheduler<C> {
    pub fn new(gateway: Arc<CacheGateway<C>>) -> Self {
        Self {
            gateway,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawns the refresh loops. Returns `Ok(false)` when the loops are
    /// already running for this gateway, by this or any other scheduler.
    /// After `stop` the loops can be started again.
    pub async fn start(&self) -> CacheResult<bool> {
        if !self.gateway.transport().supports_cache() {
            return Err(CacheError::invalid(
                "Background pool refresh is not available in stdio transport mode",
            ));
        }
        if !self.gateway.mark_refresh_started() {
            return Ok(false);
        }

        let mut handles = self.handles.lock().await;
        for chain_id in self.gateway.enabled_chains() {
            info!("🔄 Starting pool refresh for chain {} every {} min",
                chain_id, self.gateway.config().duration_minutes);
            handles.push(tokio::spawn(refresh_loop(self.gateway.clone(), chain_id.to_string())));
        }
        Ok(true)
    }

    pub async fn running_loops(&self) -> usize {
        self.handles
            .lock()
            .await
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }

    pub async fn stop(&self) {
        let mut handles = self.handles.lock().await;
        // Only the scheduler that owns the loops releases the marker.
        if handles.is_empty() {
            return;
        }
        for handle in handles.drain(..) {
            handle.abort();
        }
        self.gateway.clear_refresh_started();
        info!("Pool refresh stopped");
    }
}

async fn refresh_loop<C: ChainConnector>(gateway: Arc<CacheGateway<C>>, chain_id: String) {
    let interval = gateway.config().refresh_interval();
    loop {
        match gateway.refresh_chain(&chain_id).await {
            Ok(snapshot) => {
                info!("✅ Chain {} cache refreshed: {} pools", chain_id, snapshot.len());
            }
            Err(e) => {
                let failures = gateway
                    .store(&chain_id)
                    .map(|s| s.consecutive_failures())
                    .unwrap_or(0);
                if failures >= FAILURE_ESCALATION {
                    error!("❌ Chain {} refresh failed {} times in a row: {}", chain_id, failures, e);
                } else {
                    warn!("⚠️ Chain {} refresh failed, keeping previous snapshot: {}", chain_id, e);
                }
            }
        }
        tokio::time::sleep(interval).await;
    }
}
