//! Sugar Pool Cache - per-chain liquidity pool cache for Aerodrome/Velodrome
//!
//! Keeps a periodically refreshed snapshot of every pool on each
//! cache-enabled chain, answers listing and lookup queries from it, and
//! resolves swap quotes over either the cached or the live pool topology.

pub mod config;
pub mod types;
pub mod errors;
pub mod network;
pub mod pools;
pub mod cache;
pub mod quotes;
pub mod utils;

// Re-export commonly used items
pub use config::{CacheConfig, Config, TransportMode};
pub use errors::{CacheError, CacheResult};
pub use cache::{CacheGateway, RefreshScheduler};
pub use quotes::{QuoteRequest, QuoteResolver};
pub use types::*;
