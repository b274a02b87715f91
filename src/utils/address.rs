//! Address parsing and normalization

use alloy::primitives::Address;
use crate::errors::{CacheError, CacheResult};

/// Parses a hex address regardless of letter case. Display of the result is
/// the EIP-55 checksummed form.
pub fn normalize_address(raw: &str) -> CacheResult<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| CacheError::invalid(format!("Malformed address '{}': {}", raw, e)))
}

/// Lowercase key used for de-duplication when an address may not parse.
pub fn address_key(raw: &str) -> String {
    let trimmed = raw.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex.to_ascii_lowercase()
}
