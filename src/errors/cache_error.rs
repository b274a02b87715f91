//! Custom error types for the pool cache

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Upstream fetch failed on chain {chain_id} during {operation}: {message}")]
    UpstreamFetch {
        chain_id: String,
        operation: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("Malformed pool data for {pool}: {reason}")]
    DataShape { pool: String, reason: String },
}

pub type CacheResult<T> = Result<T, CacheError>;

impl CacheError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CacheError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn upstream(
        chain_id: &str,
        operation: &str,
        message: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        CacheError::UpstreamFetch {
            chain_id: chain_id.to_string(),
            operation: operation.to_string(),
            message: message.into(),
            source,
        }
    }

    pub fn data_shape(pool: impl Into<String>, reason: impl Into<String>) -> Self {
        CacheError::DataShape {
            pool: pool.into(),
            reason: reason.into(),
        }
    }

    /// Only upstream failures are worth another attempt; bad input and bad
    /// data stay bad.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CacheError::UpstreamFetch { .. })
    }

    /// Re-labels a data-shape failure as the failure of one fetch cycle.
    pub fn into_cycle_failure(self, chain_id: &str, operation: &str) -> Self {
        match self {
            CacheError::DataShape { pool, reason } => CacheError::upstream(
                chain_id,
                operation,
                format!("pool {} failed normalization", pool),
                Some(anyhow::anyhow!("{}", reason)),
            ),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_upstream_failures_are_retryable() {
        assert!(CacheError::upstream("8453", "get_all_pools", "timeout", None).is_retryable());
        assert!(!CacheError::invalid("bad token").is_retryable());
        assert!(!CacheError::data_shape("0xabc", "type").is_retryable());
    }

    #[test]
    fn data_shape_becomes_cycle_failure_with_context() {
        let err = CacheError::data_shape("0xpool", "pool type 'x' is not an integer")
            .into_cycle_failure("10", "refresh");
        match err {
            CacheError::UpstreamFetch { chain_id, operation, message, source } => {
                assert_eq!(chain_id, "10");
                assert_eq!(operation, "refresh");
                assert!(message.contains("0xpool"));
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn messages_name_chain_and_operation() {
        let err = CacheError::upstream("130", "get_pool", "HTTP 502", None);
        let text = err.to_string();
        assert!(text.contains("130"));
        assert!(text.contains("get_pool"));
    }
}
