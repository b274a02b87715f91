//! Symbolic token names accepted per chain

use lazy_static::lazy_static;
use std::collections::HashMap;
use crate::errors::{CacheError, CacheResult};

lazy_static! {
    pub static ref SUPPORTED_TOKENS: HashMap<&'static str, &'static [&'static str]> = HashMap::from([
        ("10", &["usdc", "velo", "eth", "o_usdt"][..]),
        ("130", &["o_usdt", "usdc"][..]),
        ("1135", &["o_usdt", "lsk", "eth", "usdt"][..]),
        ("8453", &["usdc", "aero", "eth"][..]),
    ]);
}

/// Fails when either token is outside the chain's whitelist. Chains without
/// a whitelist accept any name and leave resolution to the chain client.
pub fn check_supported_tokens(chain_id: &str, from_token: &str, to_token: &str) -> CacheResult<()> {
    let Some(supported) = SUPPORTED_TOKENS.get(chain_id) else {
        return Ok(());
    };
    if supported.contains(&from_token) && supported.contains(&to_token) {
        return Ok(());
    }
    let names: Vec<String> = supported.iter().map(|t| format!("'{}'", t)).collect();
    Err(CacheError::invalid(format!(
        "Only {} are supported on chain {}.",
        names.join(", "),
        chain_id
    )))
}
