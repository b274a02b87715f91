//! Swap quote types

use serde::{Deserialize, Serialize};
use super::{PoolForSwap, Token};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteInput {
    pub from_token: Token,
    pub to_token: Token,
    /// Hops as `(pool, reversed)`.
    pub path: Vec<(PoolForSwap, bool)>,
    pub amount_in: u128,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub input: QuoteInput,
    pub amount_out: u128,
}

impl Quote {
    pub fn pool_addresses(&self) -> Vec<&str> {
        self.input.path.iter().map(|(p, _)| p.address.as_str()).collect()
    }
}
