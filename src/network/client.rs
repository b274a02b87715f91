//! The chain client seen by the cache
//!
//! A `ChainConnector` hands out a `ChainClient` scoped to one chain. Handles
//! are acquired per operation and dropped afterwards; nothing holds one across
//! a refresh loop.

use alloy::primitives::Address;
use async_trait::async_trait;
use crate::{
    errors::CacheResult,
    types::{Pool, PoolForSwap, Quote, Token},
};

#[async_trait]
pub trait ChainClient: Send + Sync {
    fn chain_id(&self) -> &str;

    async fn get_all_pools(&self) -> CacheResult<Vec<Pool>>;

    async fn get_pool(&self, address: &Address) -> CacheResult<Option<Pool>>;

    /// Live pool enumeration used for routing.
    async fn get_pools_for_swaps(&self) -> CacheResult<Vec<PoolForSwap>>;

    /// Resolves a symbolic token name (`usdc`, `aero`, ...) on this chain.
    async fn get_token(&self, symbol: &str) -> CacheResult<Option<Token>>;

    /// Best quote routed over exactly `pools`. `Ok(None)` means no path.
    async fn get_quote(
        &self,
        from_token: &Token,
        to_token: &Token,
        amount: u128,
        pools: &[PoolForSwap],
    ) -> CacheResult<Option<Quote>>;
}

#[async_trait]
pub trait ChainConnector: Send + Sync + 'static {
    type Client: ChainClient + 'static;

    async fn connect(&self, chain_id: &str) -> CacheResult<Self::Client>;
}
