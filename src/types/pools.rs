//! Pool-related types and structures
//!
//! `Pool` mirrors what the Sugar contracts report for one liquidity pool.
//! Values are never mutated after a fetch; a refresh produces new ones.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use crate::utils::address_key;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: String,
    pub chain_name: String,
    pub token_address: String,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default)]
    pub listed: bool,
    #[serde(default)]
    pub wrapped_token_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub token: Token,
    /// Raw amount in the token's smallest unit.
    pub amount: u128,
    #[serde(default)]
    pub price: f64,
    pub amount_in_stable: f64,
}

/// Pool type exactly as the upstream encoded it.
///
/// Depending on the deployment the field arrives as a number, a numeric
/// string or null. `crate::pools::coerce_pool_type` turns it into an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PoolTypeRepr {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub chain_id: String,
    pub chain_name: String,
    #[serde(alias = "lp")]
    pub address: String,
    #[serde(default)]
    pub factory: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(rename = "type", alias = "pool_type", default)]
    pub pool_type: Option<PoolTypeRepr>,
    #[serde(default)]
    pub is_stable: bool,
    #[serde(alias = "is_cl", default)]
    pub is_concentrated_liquidity: bool,
    pub token0: Option<Token>,
    pub token1: Option<Token>,
    #[serde(default)]
    pub reserve0: Option<Amount>,
    #[serde(default)]
    pub reserve1: Option<Amount>,
    #[serde(default)]
    pub token0_fees: Option<Amount>,
    #[serde(default)]
    pub token1_fees: Option<Amount>,
    #[serde(default)]
    pub pool_fee: f64,
    #[serde(default)]
    pub total_supply: f64,
    #[serde(default)]
    pub gauge_total_supply: f64,
    #[serde(default)]
    pub tvl: f64,
    #[serde(default)]
    pub apr: f64,
    #[serde(default)]
    pub volume_pct: f64,
}

impl Pool {
    pub fn token0_address(&self) -> Option<&str> {
        self.token0.as_ref().map(|t| t.token_address.as_str())
    }

    pub fn token1_address(&self) -> Option<&str> {
        self.token1.as_ref().map(|t| t.token_address.as_str())
    }

    /// Case-insensitive identity of the pool within its chain.
    pub fn key(&self) -> (String, String) {
        (self.chain_id.clone(), address_key(&self.address))
    }

    pub fn token_addresses(&self) -> (Option<Address>, Option<Address>) {
        let parse = |raw: Option<&str>| raw.and_then(|a| a.trim().parse::<Address>().ok());
        (parse(self.token0_address()), parse(self.token1_address()))
    }

    pub fn contains_token(&self, token: &Address) -> bool {
        let (t0, t1) = self.token_addresses();
        t0.as_ref() == Some(token) || t1.as_ref() == Some(token)
    }

    /// True when the pool trades exactly `a`/`b`, in either order.
    pub fn is_pair(&self, a: &Address, b: &Address) -> bool {
        match self.token_addresses() {
            (Some(t0), Some(t1)) => (&t0 == a && &t1 == b) || (&t0 == b && &t1 == a),
            _ => false,
        }
    }

    /// Trading volume in the stable token, derived from collected fees.
    pub fn volume(&self) -> f64 {
        match (&self.token0_fees, &self.token1_fees) {
            (Some(f0), Some(f1)) => self.volume_pct * (f0.amount_in_stable + f1.amount_in_stable),
            _ => 0.0,
        }
    }

    pub fn gauge_staked_pct(&self) -> f64 {
        if self.total_supply > 0.0 {
            self.gauge_total_supply / self.total_supply * 100.0
        } else {
            0.0
        }
    }
}

/// Reduced projection of a pool, enough to route a swap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolForSwap {
    pub chain_id: String,
    pub chain_name: String,
    #[serde(alias = "lp")]
    pub address: String,
    #[serde(rename = "type", alias = "pool_type")]
    pub pool_type: i64,
    pub token0_address: String,
    pub token1_address: String,
}
