//! Pool listing operations served through the cache gateway
//!
//! Every operation runs the transport-mode guard under its own name, picks
//! the cached or live pool collection, then runs the shared `PoolQuery`
//! pipeline. Empty results are valid outcomes.

use crate::{
    cache::CacheGateway,
    errors::CacheResult,
    network::ChainConnector,
    pools::{PoolKind, PoolQuery, SortKey, TokenFilter},
    types::{Pool, PoolForSwap},
};

/// Upper bound on `get_pool_list` page size.
pub const MAX_POOL_LIST_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct PoolListRequest {
    /// Exact pool address; when set every other filter is ignored.
    pub lp: Option<String>,
    pub token_address_list: Option<Vec<String>>,
    pub pool_type: String,
    pub sort_by: String,
    pub limit: usize,
    pub offset: usize,
}

impl Default for PoolListRequest {
    fn default() -> Self {
        Self {
            lp: None,
            token_address_list: None,
            pool_type: "all".to_string(),
            sort_by: "tvl".to_string(),
            limit: MAX_POOL_LIST_LIMIT,
            offset: 0,
        }
    }
}

impl<C: ChainConnector> CacheGateway<C> {
    async fn run_query(&self, chain_id: &str, use_cache: bool, query: &PoolQuery) -> CacheResult<Vec<Pool>> {
        let snapshot = self.select_pools(chain_id, use_cache).await?;
        Ok(query.apply(&snapshot.pools))
    }

    pub async fn get_pools(
        &self,
        chain_id: &str,
        limit: usize,
        offset: usize,
        use_cache: bool,
    ) -> CacheResult<Vec<Pool>> {
        self.validate_cache_parameter(use_cache, "get_pools")?;
        self.run_query(chain_id, use_cache, &PoolQuery::page(offset, limit)).await
    }

    pub async fn get_pool_by_address(
        &self,
        chain_id: &str,
        address: &str,
        use_cache: bool,
    ) -> CacheResult<Option<Pool>> {
        self.validate_cache_parameter(use_cache, "get_pool_by_address")?;
        self.select_pool(chain_id, address, use_cache).await
    }

    /// Pools holding `token`, highest TVL first.
    pub async fn get_pools_by_token(
        &self,
        chain_id: &str,
        token: &str,
        limit: usize,
        offset: usize,
        use_cache: bool,
    ) -> CacheResult<Vec<Pool>> {
        self.validate_cache_parameter(use_cache, "get_pools_by_token")?;
        let query = PoolQuery {
            tokens: TokenFilter::from_addresses(Some(&[token][..]))?,
            sort_by: Some(SortKey::Tvl),
            offset,
            limit,
            ..PoolQuery::default()
        };
        self.run_query(chain_id, use_cache, &query).await
    }

    /// Pools trading `token_a`/`token_b` in either order, highest TVL first.
    pub async fn get_pools_by_pair(
        &self,
        chain_id: &str,
        token_a: &str,
        token_b: &str,
        limit: usize,
        offset: usize,
        use_cache: bool,
    ) -> CacheResult<Vec<Pool>> {
        self.validate_cache_parameter(use_cache, "get_pools_by_pair")?;
        let query = PoolQuery {
            tokens: TokenFilter::from_addresses(Some(&[token_a, token_b][..]))?,
            sort_by: Some(SortKey::Tvl),
            offset,
            limit,
            ..PoolQuery::default()
        };
        self.run_query(chain_id, use_cache, &query).await
    }

    pub async fn get_pool_list(
        &self,
        chain_id: &str,
        request: &PoolListRequest,
        use_cache: bool,
    ) -> CacheResult<Vec<Pool>> {
        self.validate_cache_parameter(use_cache, "get_pool_list")?;

        if let Some(lp) = &request.lp {
            let pool = self.select_pool(chain_id, lp, use_cache).await?;
            return Ok(pool.into_iter().collect());
        }

        // Parse everything before touching the network.
        let query = PoolQuery {
            tokens: TokenFilter::from_addresses(request.token_address_list.as_deref())?,
            kind: request.pool_type.parse::<PoolKind>()?,
            sort_by: Some(request.sort_by.parse::<SortKey>()?),
            offset: request.offset,
            limit: request.limit.min(MAX_POOL_LIST_LIMIT),
        };
        self.run_query(chain_id, use_cache, &query).await
    }

    /// Swap projection of the pool set, in upstream order.
    pub async fn get_pools_for_swaps(
        &self,
        chain_id: &str,
        limit: usize,
        offset: usize,
        use_cache: bool,
    ) -> CacheResult<Vec<PoolForSwap>> {
        self.validate_cache_parameter(use_cache, "get_pools_for_swaps")?;
        let snapshot = self.select_pools(chain_id, use_cache).await?;
        PoolQuery::page(offset, limit).apply_as_swaps(&snapshot.pools)
    }
}
