//! Sugar Pool Cache - Main Entry Point
//!
//! Runs the background refresh for every cache-enabled chain and reports
//! cache status until interrupted.

use sugar_pool_cache::*;
use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time;
use tracing::{error, info, warn};

const STATUS_INTERVAL_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::load();
    let _logging_guard = utils::setup_logging(&config.log_dir, config.transport)?;

    info!("🍬 Sugar Pool Cache v{}", env!("CARGO_PKG_VERSION"));
    info!("📋 Configuration:");
    info!("   Transport: {:?}", config.transport);
    info!("   Refresh Interval: {} min", config.cache_duration_minutes);
    info!("   Cached Chains: {:?}", config.cache_enabled_chains);
    info!("   Filter Invalid Pools: {}", config.cache_filter_invalid_pools);
    info!("   Call Timeout: {}s", config.call_timeout_secs);

    config.validate()?;

    let connector = Arc::new(network::HttpConnector::new(
        config.chain_endpoints.clone(),
        Duration::from_secs(config.call_timeout_secs),
    )?);
    let gateway = Arc::new(CacheGateway::new(connector, Arc::new(config.cache_config())));
    let scheduler = RefreshScheduler::new(gateway.clone());

    if config.skip_cache_init {
        info!("SKIP_CACHE_INIT set, pools will be fetched on first request");
    } else if !config.transport.supports_cache() {
        info!("Single-shot transport, background refresh disabled");
    } else {
        match scheduler.start().await {
            Ok(true) => info!("✅ Background refresh running for {} chain(s)", scheduler.running_loops().await),
            Ok(false) => warn!("Background refresh was already running"),
            Err(e) => error!("Failed to start background refresh: {}", e),
        }
    }

    let start_time = Instant::now();
    let mut interval = time::interval(Duration::from_secs(STATUS_INTERVAL_SECS));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                report_status(&gateway, start_time).await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("\n📛 Received shutdown signal (Ctrl+C)...");
                break;
            }
        }
    }

    scheduler.stop().await;
    info!("🛑 Shut down after {:?}", start_time.elapsed());

    Ok(())
}

async fn report_status<C: network::ChainConnector>(gateway: &CacheGateway<C>, start_time: Instant) {
    for status in gateway.status().await {
        if !status.populated {
            info!("🏥 Chain {}: not populated yet (uptime {}s, failures {})",
                status.chain_id, start_time.elapsed().as_secs(), status.consecutive_failures);
        } else if status.stale {
            warn!("🏥 Chain {}: {} pools, STALE ({}s old, failures {})",
                status.chain_id, status.pool_count,
                status.age_seconds.unwrap_or_default(), status.consecutive_failures);
        } else {
            info!("🏥 Chain {}: {} pools, {}s old",
                status.chain_id, status.pool_count, status.age_seconds.unwrap_or_default());
        }
    }
}
