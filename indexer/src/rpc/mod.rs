//! Chain RPC Client (C1): fetches block headers, operations, rights and
//! constants from a remote node. Spec §1 scopes this component's *contract*
//! only ("the chain node RPC client (only its contract is specified)"), so
//! the wire shapes here are a pragmatic, minimal JSON mapping rather than a
//! full protocol-accurate RPC schema.

mod types;

pub use types::{ConstantsRpc, HeaderRpc, RightRpc};

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tzindex_common::block::Level;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("node returned 404 for {0}")]
    NotFound(String),
}

impl RpcError {
    /// The controller treats every RPC error as transient (spec §4.1).
    pub fn is_retryable(&self) -> bool {
        true
    }
}

#[async_trait]
pub trait RpcClient: Send + Sync {
    async fn header_at(&self, level: Level) -> Result<Option<HeaderRpc>, RpcError>;
    async fn head_header(&self) -> Result<HeaderRpc, RpcError>;
    async fn block_operations(&self, level: Level) -> Result<serde_json::Value, RpcError>;
    async fn constants_at(&self, level: Level) -> Result<ConstantsRpc, RpcError>;
    async fn baking_rights(&self, cycle: i32) -> Result<Vec<RightRpc>, RpcError>;
    async fn endorsing_rights(&self, cycle: i32) -> Result<Vec<RightRpc>, RpcError>;
}

/// `reqwest`-backed client with retry/backoff, in the style of the
/// upstream daemon's `rpc/callback.rs` HTTP callback dispatcher.
pub struct HttpRpcClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl HttpRpcClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client builds with a valid default TLS backend");
        HttpRpcClient {
            http,
            base_url: base_url.into(),
            max_retries: 3,
        }
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value, RpcError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.http.get(&url).send().await {
                Ok(resp) if resp.status().as_u16() == 404 => {
                    return Err(RpcError::NotFound(path.to_string()));
                }
                Ok(resp) => match resp.error_for_status() {
                    Ok(resp) => return Ok(resp.json().await?),
                    Err(err) if attempt >= self.max_retries => return Err(err.into()),
                    Err(err) => {
                        if log::log_enabled!(log::Level::Warn) {
                            warn!("rpc request {url} failed (attempt {attempt}): {err}");
                        }
                    }
                },
                Err(err) if attempt >= self.max_retries => return Err(err.into()),
                Err(err) => {
                    if log::log_enabled!(log::Level::Warn) {
                        warn!("rpc request {url} failed (attempt {attempt}): {err}");
                    }
                }
            }
            tokio::time::sleep(Duration::from_millis(200 * attempt as u64)).await;
        }
    }
}

#[async_trait]
impl RpcClient for HttpRpcClient {
    async fn header_at(&self, level: Level) -> Result<Option<HeaderRpc>, RpcError> {
        match self
            .get_json(&format!("/chains/main/blocks/{level}/header"))
            .await
        {
            Ok(value) => Ok(Some(serde_json::from_value(value)?)),
            Err(RpcError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn head_header(&self) -> Result<HeaderRpc, RpcError> {
        let value = self.get_json("/chains/main/blocks/head/header").await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn block_operations(&self, level: Level) -> Result<serde_json::Value, RpcError> {
        self.get_json(&format!("/chains/main/blocks/{level}/operations"))
            .await
    }

    async fn constants_at(&self, level: Level) -> Result<ConstantsRpc, RpcError> {
        let value = self
            .get_json(&format!("/chains/main/blocks/{level}/context/constants"))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn baking_rights(&self, cycle: i32) -> Result<Vec<RightRpc>, RpcError> {
        let value = self
            .get_json(&format!("/chains/main/blocks/head/helpers/baking_rights?cycle={cycle}"))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn endorsing_rights(&self, cycle: i32) -> Result<Vec<RightRpc>, RpcError> {
        let value = self
            .get_json(&format!(
                "/chains/main/blocks/head/helpers/endorsing_rights?cycle={cycle}"
            ))
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_errors_are_always_retryable() {
        let err = RpcError::Timeout(Duration::from_secs(1));
        assert!(err.is_retryable());
    }
}
