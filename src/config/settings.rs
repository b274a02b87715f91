//! Cache configuration and environment variable handling

use anyhow::Result;
use std::collections::{BTreeSet, HashMap};
use std::env;
use std::time::Duration;

// Configuration constants
pub const DEFAULT_CACHE_DURATION_MINUTES: u64 = 30;
pub const MIN_CACHE_DURATION_MINUTES: u64 = 1;
pub const DEFAULT_CACHE_CHAIN: &str = "8453";
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 20;
pub const MAX_CALL_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LOG_DIR: &str = "output/logs";

/// Chains the Sugar deployment knows about, used to discover endpoint URLs.
pub const KNOWN_CHAIN_IDS: &[&str] = &["10", "130", "1135", "8453"];

/// Whether the process keeps state alive between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Long-lived server (SSE); background caching is useful.
    Persistent,
    /// Fresh process per session (stdio); nothing survives one request.
    SingleShot,
}

impl TransportMode {
    pub fn from_transport_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("stdio") {
            TransportMode::SingleShot
        } else {
            TransportMode::Persistent
        }
    }

    pub fn supports_cache(&self) -> bool {
        matches!(self, TransportMode::Persistent)
    }
}

/// Immutable cache policy, built once at startup and shared by `Arc`.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub duration_minutes: u64,
    pub enabled_chain_ids: BTreeSet<String>,
    pub filter_invalid_pools: bool,
    pub call_timeout: Duration,
    pub transport: TransportMode,
}

impl CacheConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.duration_minutes * 60)
    }

    pub fn is_enabled(&self, chain_id: &str) -> bool {
        self.enabled_chain_ids.contains(chain_id)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            duration_minutes: DEFAULT_CACHE_DURATION_MINUTES,
            enabled_chain_ids: BTreeSet::from([DEFAULT_CACHE_CHAIN.to_string()]),
            filter_invalid_pools: true,
            call_timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS),
            transport: TransportMode::Persistent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub transport: TransportMode,
    // Cache Configuration
    pub cache_duration_minutes: u64,
    pub cache_enabled_chains: BTreeSet<String>,
    pub cache_filter_invalid_pools: bool,
    pub skip_cache_init: bool,
    // Chain client Configuration
    pub call_timeout_secs: u64,
    pub chain_endpoints: HashMap<String, String>,
    // Logging
    pub log_dir: String,
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `load` uses the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let cache_enabled_chains = lookup("SUGAR_CACHE_ENABLED_CHAINS")
            .map(|s| parse_chain_list(&s))
            .unwrap_or_else(|| BTreeSet::from([DEFAULT_CACHE_CHAIN.to_string()]));

        let mut chain_endpoints = HashMap::new();
        let endpoint_chains = KNOWN_CHAIN_IDS
            .iter()
            .map(|c| c.to_string())
            .chain(cache_enabled_chains.iter().cloned());
        for chain_id in endpoint_chains {
            if let Some(url) = lookup(&format!("SUGAR_API_URL_{}", chain_id)) {
                let url = url.trim().to_string();
                if !url.is_empty() {
                    chain_endpoints.insert(chain_id, url);
                }
            }
        }

        Self {
            transport: TransportMode::from_transport_name(
                &lookup("MCP_TRANSPORT").unwrap_or_else(|| "sse".to_string()),
            ),
            cache_duration_minutes: lookup("SUGAR_CACHE_DURATION_MINUTES")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_CACHE_DURATION_MINUTES)
                .max(MIN_CACHE_DURATION_MINUTES),
            cache_enabled_chains,
            cache_filter_invalid_pools: parse_flag(lookup("SUGAR_CACHE_FILTER_INVALID_POOLS"), true),
            skip_cache_init: parse_flag(lookup("SKIP_CACHE_INIT"), false),
            call_timeout_secs: lookup("SUGAR_CALL_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_CALL_TIMEOUT_SECS)
                .clamp(1, MAX_CALL_TIMEOUT_SECS),
            chain_endpoints,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string()),
        }
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            duration_minutes: self.cache_duration_minutes,
            enabled_chain_ids: self.cache_enabled_chains.clone(),
            filter_invalid_pools: self.cache_filter_invalid_pools,
            call_timeout: Duration::from_secs(self.call_timeout_secs),
            transport: self.transport,
        }
    }

    /// Every cache-enabled chain needs an endpoint, otherwise its refresh
    /// loop could never succeed.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = self
            .cache_enabled_chains
            .iter()
            .filter(|c| !self.chain_endpoints.contains_key(c.as_str()))
            .map(|c| c.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(anyhow::anyhow!(
                "SUGAR_API_URL_<chain> is not set for cache-enabled chain(s): {}",
                missing.join(", ")
            ));
        }
        Ok(())
    }
}

fn parse_chain_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: Option<String>, default: bool) -> bool {
    raw.map(|s| s.trim().to_ascii_lowercase())
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
