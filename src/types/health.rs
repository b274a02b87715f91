//! Cache health reporting types

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ChainCacheStatus {
    pub chain_id: String,
    pub populated: bool,
    pub pool_count: usize,
    pub fetched_at: Option<DateTime<Utc>>,
    pub age_seconds: Option<u64>,
    /// Older than two refresh intervals.
    pub stale: bool,
    pub consecutive_failures: u32,
}
