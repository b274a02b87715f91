//! Quote resolution over cached or live pool topology
//!
//! The pool list a quote is routed over is chosen per call and handed to the
//! chain client as an argument. Nothing on a shared handle is swapped in and
//! out, so concurrent quotes for one chain cannot see each other's pools.

use std::sync::Arc;
use tracing::{debug, warn};
use crate::{
    cache::CacheGateway,
    errors::{CacheError, CacheResult},
    network::{ChainClient, ChainConnector},
    pools::to_swap_format_all,
    quotes::check_supported_tokens,
    types::{PoolForSwap, Quote, Snapshot, Token},
};

/// Where the routing topology for one quote comes from.
#[derive(Debug, Clone)]
pub enum PoolSource {
    /// The chain client's own live enumeration.
    Live,
    /// A cached snapshot, projected to `PoolForSwap`.
    Cached(Arc<Snapshot>),
}

#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub chain_id: String,
    pub from_token: String,
    pub to_token: String,
    /// Input amount in the smallest unit of `from_token`.
    pub amount: u128,
    pub use_cache: bool,
}

pub struct QuoteResolver<C: ChainConnector> {
    gateway: Arc<CacheGateway<C>>,
}

impl<C: ChainConnector> QuoteResolver<C> {
    pub fn new(gateway: Arc<CacheGateway<C>>) -> Self {
        Self { gateway }
    }

    /// Best quote for the request. `Ok(None)` means the client found no
    /// path, which is not a failure.
    pub async fn get_quote(&self, request: &QuoteRequest) -> CacheResult<Option<Quote>> {
        self.gateway.validate_cache_parameter(request.use_cache, "get_quote")?;
        let chain_id = request.chain_id.as_str();
        check_supported_tokens(chain_id, &request.from_token, &request.to_token)?;

        let client = self.gateway.client(chain_id).await?;
        let from_token = self.resolve_token(&client, chain_id, &request.from_token).await?;
        let to_token = self.resolve_token(&client, chain_id, &request.to_token).await?;

        if request.use_cache {
            match self.gateway.cached_snapshot(chain_id).await {
                Ok(Some(snapshot)) if !snapshot.is_empty() => {
                    let source = PoolSource::Cached(snapshot);
                    match self
                        .quote_with_source(&client, &from_token, &to_token, request.amount, &source)
                        .await
                    {
                        Ok(quote) => return Ok(quote),
                        Err(e) => warn!(
                            "⚠️ Failed to use cached pools on chain {}, falling back to chain query: {}",
                            chain_id, e
                        ),
                    }
                }
                Ok(_) => debug!("No cached pools for chain {}, quoting live", chain_id),
                Err(e) => warn!(
                    "⚠️ Cache unavailable for chain {}, falling back to chain query: {}",
                    chain_id, e
                ),
            }
        }

        self.quote_with_source(&client, &from_token, &to_token, request.amount, &PoolSource::Live)
            .await
    }

    async fn resolve_token(&self, client: &C::Client, chain_id: &str, symbol: &str) -> CacheResult<Token> {
        self.gateway
            .call(chain_id, "get_token", client.get_token(symbol))
            .await?
            .ok_or_else(|| {
                CacheError::invalid(format!(
                    "Invalid token specified: '{}' is not recognized on chain {}",
                    symbol, chain_id
                ))
            })
    }

    async fn swap_pools(&self, client: &C::Client, source: &PoolSource) -> CacheResult<Vec<PoolForSwap>> {
        match source {
            PoolSource::Live => {
                self.gateway
                    .call(client.chain_id(), "get_pools_for_swaps", client.get_pools_for_swaps())
                    .await
            }
            PoolSource::Cached(snapshot) => to_swap_format_all(&snapshot.pools),
        }
    }

    /// One quote computation routed over `source`.
    pub async fn quote_with_source(
        &self,
        client: &C::Client,
        from_token: &Token,
        to_token: &Token,
        amount: u128,
        source: &PoolSource,
    ) -> CacheResult<Option<Quote>> {
        let pools = self.swap_pools(client, source).await?;
        debug!("Quoting on chain {} over {} pools", client.chain_id(), pools.len());
        self.gateway
            .call(
                client.chain_id(),
                "get_quote",
                client.get_quote(from_token, to_token, amount, &pools),
            )
            .await
    }
}
