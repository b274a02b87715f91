//! In-memory chain connector shared by the integration tests

#![allow(dead_code)]

use alloy::primitives::Address;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sugar_pool_cache::{
    errors::{CacheError, CacheResult},
    network::{ChainClient, ChainConnector, RetryConfig},
    pools::to_swap_format,
    utils::address_key,
    CacheConfig, CacheGateway, Pool, PoolForSwap, Quote, QuoteInput, Token, TransportMode,
};

pub const WETH: &str = "0x4200000000000000000000000000000000000006";
pub const USDC: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";
pub const AERO: &str = "0x940181a94A35A4569E4529A3CDfB74e38FD98631";

pub fn token(chain_id: &str, address: &str, symbol: &str) -> Token {
    Token {
        chain_id: chain_id.to_string(),
        chain_name: "Base".to_string(),
        token_address: address.to_string(),
        symbol: symbol.to_string(),
        decimals: 18,
        listed: true,
        wrapped_token_address: None,
    }
}

pub fn pool(chain_id: &str, address: &str, t0: &str, t1: &str, tvl: f64) -> Pool {
    serde_json::from_value(serde_json::json!({
        "chain_id": chain_id, "chain_name": "Base", "address": address,
        "type": 0, "is_cl": false,
        "token0": token(chain_id, t0, "T0"), "token1": token(chain_id, t1, "T1"),
        "tvl": tvl, "apr": 1.0
    }))
    .unwrap()
}

pub fn swap_pool(chain_id: &str, address: &str, t0: &str, t1: &str) -> PoolForSwap {
    to_swap_format(&pool(chain_id, address, t0, t1, 0.0)).unwrap()
}

/// Scripted upstream. Every knob is per chain.
#[derive(Default)]
pub struct MockState {
    pub pools: Mutex<HashMap<String, Vec<Pool>>>,
    pub swap_pools: Mutex<HashMap<String, Vec<PoolForSwap>>>,
    pub failing: Mutex<HashSet<String>>,
    pub hanging: Mutex<HashSet<String>>,
    pub quote_delay: Mutex<Duration>,
    pub fail_quotes_over: Mutex<Option<String>>,
    pub fetches: Mutex<HashMap<String, usize>>,
    pub quoted_over: Mutex<Vec<Vec<String>>>,
    pub connects: AtomicUsize,
}

impl MockState {
    pub fn set_pools(&self, chain_id: &str, pools: Vec<Pool>) {
        self.pools.lock().unwrap().insert(chain_id.to_string(), pools);
    }

    pub fn set_swap_pools(&self, chain_id: &str, pools: Vec<PoolForSwap>) {
        self.swap_pools.lock().unwrap().insert(chain_id.to_string(), pools);
    }

    pub fn set_failing(&self, chain_id: &str, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(chain_id.to_string());
        } else {
            set.remove(chain_id);
        }
    }

    pub fn set_hanging(&self, chain_id: &str) {
        self.hanging.lock().unwrap().insert(chain_id.to_string());
    }

    pub fn fetches(&self, chain_id: &str) -> usize {
        self.fetches.lock().unwrap().get(chain_id).copied().unwrap_or(0)
    }

    pub fn quoted_over(&self) -> Vec<Vec<String>> {
        self.quoted_over.lock().unwrap().clone()
    }
}

#[derive(Clone, Default)]
pub struct MockConnector {
    pub state: Arc<MockState>,
}

#[async_trait]
impl ChainConnector for MockConnector {
    type Client = MockClient;

    async fn connect(&self, chain_id: &str) -> CacheResult<MockClient> {
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        Ok(MockClient {
            chain_id: chain_id.to_string(),
            state: self.state.clone(),
        })
    }
}

pub struct MockClient {
    chain_id: String,
    state: Arc<MockState>,
}

impl MockClient {
    fn unreachable(&self, operation: &str) -> CacheError {
        CacheError::upstream(&self.chain_id, operation, "connection refused", None)
    }
}

#[async_trait]
impl ChainClient for MockClient {
    fn chain_id(&self) -> &str {
        &self.chain_id
    }

    async fn get_all_pools(&self) -> CacheResult<Vec<Pool>> {
        *self
            .state
            .fetches
            .lock()
            .unwrap()
            .entry(self.chain_id.clone())
            .or_insert(0) += 1;
        let hanging = self.state.hanging.lock().unwrap().contains(&self.chain_id);
        if hanging {
            std::future::pending::<()>().await;
        }
        if self.state.failing.lock().unwrap().contains(&self.chain_id) {
            return Err(self.unreachable("get_all_pools"));
        }
        Ok(self
            .state
            .pools
            .lock()
            .unwrap()
            .get(&self.chain_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_pool(&self, address: &Address) -> CacheResult<Option<Pool>> {
        let wanted = address_key(&address.to_string());
        Ok(self
            .state
            .pools
            .lock()
            .unwrap()
            .get(&self.chain_id)
            .and_then(|pools| pools.iter().find(|p| address_key(&p.address) == wanted).cloned()))
    }

    async fn get_pools_for_swaps(&self) -> CacheResult<Vec<PoolForSwap>> {
        Ok(self
            .state
            .swap_pools
            .lock()
            .unwrap()
            .get(&self.chain_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_token(&self, symbol: &str) -> CacheResult<Option<Token>> {
        let address = match symbol {
            "usdc" => USDC,
            "aero" => AERO,
            "eth" => WETH,
            _ => return Ok(None),
        };
        Ok(Some(token(&self.chain_id, address, symbol)))
    }

    /// Routes over the first pool in `pools` that trades the pair directly.
    async fn get_quote(
        &self,
        from_token: &Token,
        to_token: &Token,
        amount: u128,
        pools: &[PoolForSwap],
    ) -> CacheResult<Option<Quote>> {
        let seen: Vec<String> = pools.iter().map(|p| p.address.clone()).collect();
        let delay = *self.state.quote_delay.lock().unwrap();
        let poisoned = self.state.fail_quotes_over.lock().unwrap().clone();
        self.state.quoted_over.lock().unwrap().push(seen.clone());

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(address) = poisoned {
            if seen.contains(&address) {
                return Err(self.unreachable("get_quote"));
            }
        }

        let from = address_key(&from_token.token_address);
        let to = address_key(&to_token.token_address);
        let hop = pools.iter().find(|p| {
            let (t0, t1) = (address_key(&p.token0_address), address_key(&p.token1_address));
            (t0 == from && t1 == to) || (t0 == to && t1 == from)
        });
        Ok(hop.map(|p| Quote {
            input: QuoteInput {
                from_token: from_token.clone(),
                to_token: to_token.clone(),
                path: vec![(p.clone(), address_key(&p.token0_address) != from)],
                amount_in: amount,
            },
            amount_out: amount * 2,
        }))
    }
}

pub fn cache_config(chains: &[&str], transport: TransportMode) -> CacheConfig {
    CacheConfig {
        enabled_chain_ids: chains.iter().map(|c| c.to_string()).collect(),
        call_timeout: Duration::from_secs(5),
        transport,
        ..CacheConfig::default()
    }
}

pub fn no_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 1,
        ..RetryConfig::default()
    }
}

pub fn gateway(connector: &MockConnector, chains: &[&str]) -> Arc<CacheGateway<MockConnector>> {
    gateway_in_mode(connector, chains, TransportMode::Persistent)
}

pub fn gateway_in_mode(
    connector: &MockConnector,
    chains: &[&str],
    transport: TransportMode,
) -> Arc<CacheGateway<MockConnector>> {
    Arc::new(
        CacheGateway::new(
            Arc::new(connector.clone()),
            Arc::new(cache_config(chains, transport)),
        )
        .with_retry(no_retry()),
    )
}
