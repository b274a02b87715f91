//! Per-chain pool snapshot

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use super::Pool;

/// The full pool set of one chain as of one fetch.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub chain_id: String,
    pub pools: Vec<Pool>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Builds a snapshot stamped now. Later duplicates of a
    /// `(chain_id, address)` pair are dropped.
    pub fn new(chain_id: &str, pools: Vec<Pool>) -> Self {
        Self::at(chain_id, pools, Utc::now())
    }

    pub fn at(chain_id: &str, pools: Vec<Pool>, fetched_at: DateTime<Utc>) -> Self {
        let mut seen = HashSet::with_capacity(pools.len());
        let pools = pools.into_iter().filter(|p| seen.insert(p.key())).collect();
        Self {
            chain_id: chain_id.to_string(),
            pools,
            fetched_at,
        }
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn age_secs(&self) -> u64 {
        (Utc::now() - self.fetched_at).num_seconds().max(0) as u64
    }

    pub(crate) fn restamped(self, fetched_at: DateTime<Utc>) -> Self {
        Self { fetched_at, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(address: &str) -> Pool {
        serde_json::from_value(serde_json::json!({
            "chain_id": "8453", "chain_name": "Base", "address": address,
            "token0": null, "token1": null
        }))
        .unwrap()
    }

    #[test]
    fn duplicates_differing_only_in_case_are_dropped() {
        let snapshot = Snapshot::new(
            "8453",
            vec![
                pool("0xcDAC0d6c6C59727a65F871236188350531885C43"),
                pool("0xcdac0d6c6c59727a65f871236188350531885c43"),
                pool("0xB4885Bc63399BF5518b994c1d0C153334Ee579D0"),
            ],
        );
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.pools[0].address, "0xcDAC0d6c6C59727a65F871236188350531885C43");
    }

    #[test]
    fn empty_snapshot_is_valid() {
        let snapshot = Snapshot::new("10", Vec::new());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.chain_id, "10");
    }
}
