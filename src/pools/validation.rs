//! Structural pool validation applied to every fetched batch

use alloy::primitives::Address;
use thiserror::Error;
use crate::{
    errors::CacheResult,
    pools::coerce_pool_type,
    types::Pool,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoolDefect {
    #[error("missing {0}")]
    MissingToken(&'static str),

    #[error("{field} address '{value}' is malformed")]
    MalformedAddress { field: &'static str, value: String },

    #[error("{0} is the zero address")]
    ZeroAddress(&'static str),

    #[error("{0} is not a finite number")]
    NonFinite(&'static str),

    #[error("{0}")]
    PoolType(String),
}

fn check_address(field: &'static str, raw: &str) -> Result<(), PoolDefect> {
    let parsed = raw
        .trim()
        .parse::<Address>()
        .map_err(|_| PoolDefect::MalformedAddress {
            field,
            value: raw.to_string(),
        })?;
    if parsed == Address::ZERO {
        return Err(PoolDefect::ZeroAddress(field));
    }
    Ok(())
}

/// Returns the first structural defect of `pool`, if any.
pub fn check_pool(pool: &Pool) -> Result<(), PoolDefect> {
    let token0 = pool.token0_address().ok_or(PoolDefect::MissingToken("token0"))?;
    let token1 = pool.token1_address().ok_or(PoolDefect::MissingToken("token1"))?;

    check_address("pool", &pool.address)?;
    check_address("token0", token0)?;
    check_address("token1", token1)?;

    let numeric = [
        ("tvl", pool.tvl),
        ("apr", pool.apr),
        ("volume_pct", pool.volume_pct),
        ("pool_fee", pool.pool_fee),
        ("total_supply", pool.total_supply),
        ("gauge_total_supply", pool.gauge_total_supply),
    ];
    if let Some((field, _)) = numeric.iter().find(|(_, v)| !v.is_finite()) {
        return Err(PoolDefect::NonFinite(*field));
    }
    let amounts = [
        ("reserve0", &pool.reserve0),
        ("reserve1", &pool.reserve1),
        ("token0_fees", &pool.token0_fees),
        ("token1_fees", &pool.token1_fees),
    ];
    for (field, amount) in amounts {
        if amount.as_ref().is_some_and(|a| !a.amount_in_stable.is_finite()) {
            return Err(PoolDefect::NonFinite(field));
        }
    }

    coerce_pool_type(&pool.address, pool.pool_type.as_ref())
        .map_err(|e| PoolDefect::PoolType(e.to_string()))?;
    Ok(())
}

#[derive(Debug)]
pub struct Sanitized {
    pub pools: Vec<Pool>,
    pub dropped: usize,
}

/// Prepares a fetched batch for a snapshot.
///
/// With `filter_invalid` every defective pool is dropped. Without it pools are
/// kept as fetched, but a pool type that cannot be coerced still fails the
/// whole batch.
pub fn sanitize_pools(chain_id: &str, pools: Vec<Pool>, filter_invalid: bool) -> CacheResult<Sanitized> {
    if !filter_invalid {
        for pool in &pools {
            coerce_pool_type(&pool.address, pool.pool_type.as_ref())
                .map_err(|e| e.into_cycle_failure(chain_id, "sanitize_pools"))?;
        }
        return Ok(Sanitized { pools, dropped: 0 });
    }

    let total = pools.len();
    let pools: Vec<Pool> = pools
        .into_iter()
        .filter(|pool| match check_pool(pool) {
            Ok(()) => true,
            Err(defect) => {
                tracing::debug!("Dropping pool {} on chain {}: {}", pool.address, chain_id, defect);
                false
            }
        })
        .collect();
    let dropped = total - pools.len();
    Ok(Sanitized { pools, dropped })
}
