//! Pool type coercion and the `PoolForSwap` projection

use crate::{
    errors::{CacheError, CacheResult},
    types::{Pool, PoolForSwap, PoolTypeRepr},
};

/// Normalizes the upstream pool type to an integer.
///
/// `null` is 0, integers pass through, numeric strings are parsed (surrounding
/// whitespace allowed) and finite floats are truncated. Anything else is a
/// `DataShape` error naming `pool`.
pub fn coerce_pool_type(pool: &str, raw: Option<&PoolTypeRepr>) -> CacheResult<i64> {
    match raw {
        None => Ok(0),
        Some(PoolTypeRepr::Int(value)) => Ok(*value),
        Some(PoolTypeRepr::Float(value)) if value.is_finite() => Ok(value.trunc() as i64),
        Some(PoolTypeRepr::Float(value)) => Err(CacheError::data_shape(
            pool,
            format!("pool type {} is not a finite number", value),
        )),
        Some(PoolTypeRepr::Text(text)) => text.trim().parse::<i64>().map_err(|_| {
            CacheError::data_shape(pool, format!("pool type '{}' is not an integer", text))
        }),
    }
}

pub fn to_swap_format(pool: &Pool) -> CacheResult<PoolForSwap> {
    let pool_type = coerce_pool_type(&pool.address, pool.pool_type.as_ref())?;
    let token0_address = pool
        .token0_address()
        .ok_or_else(|| CacheError::data_shape(&pool.address, "missing token0"))?;
    let token1_address = pool
        .token1_address()
        .ok_or_else(|| CacheError::data_shape(&pool.address, "missing token1"))?;

    Ok(PoolForSwap {
        chain_id: pool.chain_id.clone(),
        chain_name: pool.chain_name.clone(),
        address: pool.address.clone(),
        pool_type,
        token0_address: token0_address.to_string(),
        token1_address: token1_address.to_string(),
    })
}

/// Projects every pool, failing on the first one that does not normalize.
pub fn to_swap_format_all(pools: &[Pool]) -> CacheResult<Vec<PoolForSwap>> {
    pools.iter().map(to_swap_format).collect()
}
