//! HTTP chain client for a Sugar data endpoint
//!
//! Each chain is served under its own base URL:
//!
//! | Call                    | Route                          |
//! |-------------------------|--------------------------------|
//! | `get_all_pools`         | `GET  {base}/pools`            |
//! | `get_pool`              | `GET  {base}/pools/{address}`  |
//! | `get_pools_for_swaps`   | `GET  {base}/pools/swaps`      |
//! | `get_token`             | `GET  {base}/tokens/{symbol}`  |
//! | `get_quote`             | `POST {base}/quote`            |
//!
//! A 404 on a point lookup is "not found", not a failure. The collection
//! routes must always return a list; a 404 or `null` there is an upstream
//! failure so an empty answer never replaces a good snapshot.

use alloy::primitives::Address;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use crate::{
    errors::{CacheError, CacheResult},
    network::{ChainClient, ChainConnector},
    types::{Pool, PoolForSwap, Quote, Token},
};

pub struct HttpConnector {
    client: reqwest::Client,
    endpoints: HashMap<String, String>,
}

impl HttpConnector {
    pub fn new(endpoints: HashMap<String, String>, timeout: Duration) -> CacheResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                warn!("⚠️ Failed to initialize HTTP client: {}", e);
                CacheError::upstream("*", "connect", "Failed to build HTTP client", Some(e.into()))
            })?;

        let endpoints = endpoints
            .into_iter()
            .map(|(chain, url)| (chain, url.trim_end_matches('/').to_string()))
            .collect();

        Ok(Self { client, endpoints })
    }

    pub fn chains(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }
}

#[async_trait]
impl ChainConnector for HttpConnector {
    type Client = HttpChainClient;

    async fn connect(&self, chain_id: &str) -> CacheResult<HttpChainClient> {
        let base_url = self.endpoints.get(chain_id).ok_or_else(|| {
            CacheError::invalid(format!("No endpoint configured for chain {}", chain_id))
        })?;
        Ok(HttpChainClient {
            chain_id: chain_id.to_string(),
            base_url: base_url.clone(),
            http: self.client.clone(),
        })
    }
}

pub struct HttpChainClient {
    chain_id: String,
    base_url: String,
    http: reqwest::Client,
}

impl HttpChainClient {
    fn failure(&self, operation: &str, message: impl Into<String>, source: reqwest::Error) -> CacheError {
        CacheError::upstream(&self.chain_id, operation, message, Some(source.into()))
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        operation: &str,
        response: reqwest::Response,
    ) -> CacheResult<Option<T>> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("⚠️ Chain {} endpoint returned {} for {}: {}", self.chain_id, status, operation, body);
            return Err(CacheError::upstream(
                &self.chain_id,
                operation,
                format!("HTTP {} - {}", status, body),
                None,
            ));
        }

        response
            .json::<Option<T>>()
            .await
            .map_err(|e| self.failure(operation, "Failed to parse JSON response", e))
    }

    fn url(&self, operation: &str, segments: &[&str]) -> CacheResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            CacheError::upstream(
                &self.chain_id,
                operation,
                format!("Invalid endpoint URL '{}'", self.base_url),
                Some(e.into()),
            )
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                CacheError::upstream(
                    &self.chain_id,
                    operation,
                    format!("Endpoint URL '{}' cannot take a path", self.base_url),
                    None,
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, operation: &str, segments: &[&str]) -> CacheResult<Option<T>> {
        let url = self.url(operation, segments)?;
        debug!("GET {} ({})", url, operation);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.failure(operation, "HTTP request failed", e))?;
        self.decode(operation, response).await
    }

    /// Like `get_json` but an absent body is a failure.
    async fn get_required_json<T: DeserializeOwned>(&self, operation: &str, segments: &[&str]) -> CacheResult<T> {
        self.get_json(operation, segments).await?.ok_or_else(|| {
            CacheError::upstream(&self.chain_id, operation, "endpoint returned no data", None)
        })
    }
}

#[async_trait]
impl ChainClient for HttpChainClient {
    fn chain_id(&self) -> &str {
        &self.chain_id
    }

    async fn get_all_pools(&self) -> CacheResult<Vec<Pool>> {
        self.get_required_json("get_all_pools", &["pools"]).await
    }

    async fn get_pool(&self, address: &Address) -> CacheResult<Option<Pool>> {
        self.get_json("get_pool", &["pools", &address.to_string()]).await
    }

    async fn get_pools_for_swaps(&self) -> CacheResult<Vec<PoolForSwap>> {
        self.get_required_json("get_pools_for_swaps", &["pools", "swaps"]).await
    }

    async fn get_token(&self, symbol: &str) -> CacheResult<Option<Token>> {
        self.get_json("get_token", &["tokens", symbol]).await
    }

    async fn get_quote(
        &self,
        from_token: &Token,
        to_token: &Token,
        amount: u128,
        pools: &[PoolForSwap],
    ) -> CacheResult<Option<Quote>> {
        let body = serde_json::json!({
            "from_token": from_token,
            "to_token": to_token,
            "amount": amount,
            "pools": pools,
        });
        let response = self
            .http
            .post(self.url("get_quote", &["quote"])?)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.failure("get_quote", "HTTP request failed", e))?;
        self.decode("get_quote", response).await
    }
}
