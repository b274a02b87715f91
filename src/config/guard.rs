//! Transport-mode guard for cache-aware operations

use super::TransportMode;
use crate::errors::{CacheError, CacheResult};

/// Rejects `use_cache = true` when the process cannot keep a cache alive.
///
/// The message names the operation so the caller knows which call to retry
/// with `use_cache = false`.
pub fn validate_cache_parameter(
    mode: TransportMode,
    use_cache: bool,
    operation_name: &str,
) -> CacheResult<()> {
    if use_cache && !mode.supports_cache() {
        return Err(CacheError::invalid(format!(
            "Cache is not available in stdio transport mode. Please set use_cache=false for {}, \
             or use SSE transport mode to enable cache.",
            operation_name
        )));
    }
    Ok(())
}
