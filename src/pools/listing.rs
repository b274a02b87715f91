//! Filtering, sorting and pagination over a pool collection
//!
//! One pipeline serves every listing; the caller picks the collection (cached
//! or live) and the output projection.

use alloy::primitives::Address;
use std::cmp::Ordering;
use std::str::FromStr;
use crate::{
    errors::{CacheError, CacheResult},
    pools::to_swap_format,
    types::{Pool, PoolForSwap},
    utils::normalize_address,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenFilter {
    #[default]
    Any,
    /// Pools holding this token on either side.
    Single(Address),
    /// Pools trading exactly this pair, in either order.
    Pair(Address, Address),
}

impl TokenFilter {
    pub fn from_addresses<S: AsRef<str>>(addresses: Option<&[S]>) -> CacheResult<Self> {
        match addresses {
            None => Ok(TokenFilter::Any),
            Some([one]) => Ok(TokenFilter::Single(normalize_address(one.as_ref())?)),
            Some([a, b]) => Ok(TokenFilter::Pair(
                normalize_address(a.as_ref())?,
                normalize_address(b.as_ref())?,
            )),
            Some(_) => Err(CacheError::invalid("Only one or two tokens are supported for filtering.")),
        }
    }

    pub fn matches(&self, pool: &Pool) -> bool {
        match self {
            TokenFilter::Any => true,
            TokenFilter::Single(token) => pool.contains_token(token),
            TokenFilter::Pair(a, b) => pool.is_pair(a, b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoolKind {
    /// Classic AMM pools.
    V2,
    /// Concentrated-liquidity pools.
    V3,
    #[default]
    All,
}

impl PoolKind {
    pub fn matches(&self, pool: &Pool) -> bool {
        match self {
            PoolKind::All => true,
            PoolKind::V3 => pool.is_concentrated_liquidity,
            PoolKind::V2 => !pool.is_concentrated_liquidity,
        }
    }
}

impl FromStr for PoolKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v2" => Ok(PoolKind::V2),
            "v3" => Ok(PoolKind::V3),
            "all" => Ok(PoolKind::All),
            _ => Err(CacheError::invalid("Unsupported pool_type. Use 'v2', 'v3', or 'all'.")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Tvl,
    Volume,
    Apr,
}

impl SortKey {
    pub fn value(&self, pool: &Pool) -> f64 {
        match self {
            SortKey::Tvl => pool.tvl,
            SortKey::Volume => pool.volume(),
            SortKey::Apr => pool.apr,
        }
    }
}

impl FromStr for SortKey {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tvl" => Ok(SortKey::Tvl),
            "volume" => Ok(SortKey::Volume),
            "apr" => Ok(SortKey::Apr),
            _ => Err(CacheError::invalid(
                "Unsupported sort_by criteria. Use 'tvl', 'volume', or 'apr'.",
            )),
        }
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    let key = |v: f64| if v.is_nan() { f64::NEG_INFINITY } else { v };
    key(b).total_cmp(&key(a))
}

#[derive(Debug, Clone)]
pub struct PoolQuery {
    pub tokens: TokenFilter,
    pub kind: PoolKind,
    /// `None` keeps upstream order.
    pub sort_by: Option<SortKey>,
    pub offset: usize,
    pub limit: usize,
}

impl Default for PoolQuery {
    fn default() -> Self {
        Self {
            tokens: TokenFilter::Any,
            kind: PoolKind::All,
            sort_by: None,
            offset: 0,
            limit: usize::MAX,
        }
    }
}

impl PoolQuery {
    pub fn page(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            ..Self::default()
        }
    }

    /// Filter, then sort (stable, descending), then paginate.
    pub fn apply(&self, pools: &[Pool]) -> Vec<Pool> {
        let mut selected: Vec<&Pool> = pools
            .iter()
            .filter(|p| self.tokens.matches(p) && self.kind.matches(p))
            .collect();
        if let Some(key) = self.sort_by {
            selected.sort_by(|a, b| descending(key.value(a), key.value(b)));
        }
        selected
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .cloned()
            .collect()
    }

    pub fn apply_as_swaps(&self, pools: &[Pool]) -> CacheResult<Vec<PoolForSwap>> {
        self.apply(pools).iter().map(to_swap_format).collect()
    }
}
