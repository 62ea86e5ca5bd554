//! Chain minting gateway client.
//!
//! Character passports and campaign badges can be minted as on-chain
//! keepsakes through an external HTTP gateway. When no gateway is
//! configured, mint calls return a simulated outcome that callers must
//! treat as non-authoritative.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;

use crate::config::ChainConfig;

/// Errors that can occur when talking to the chain gateway.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Gateway request failed: {0}")]
    Request(String),

    #[error("Gateway returned error status {0}")]
    GatewayStatus(u16),

    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),
}

/// Result of a mint request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintOutcome {
    /// The gateway accepted the transaction.
    Submitted { tx_hash: String, token_id: String },
    /// No gateway configured; a deterministic placeholder was produced.
    Simulated { token_id: String },
}

#[derive(Debug, Serialize)]
struct MintRequest<'a> {
    to: &'a str,
    token_uri: &'a str,
}

#[derive(Debug, Deserialize)]
struct MintResponse {
    tx_hash: String,
    token_id: String,
}

/// Client for the external chain minting gateway.
pub struct ChainService {
    config: ChainConfig,
    client: reqwest::Client,
}

impl ChainService {
    /// Creates a new chain service from configuration.
    pub fn new(config: ChainConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_default();

        Self { config, client }
    }

    /// Builds a token URI embedding a digest of the minted metadata.
    ///
    /// The digest pins the metadata content at mint time, so later edits to
    /// the underlying record do not change what was minted.
    pub fn token_uri(kind: &str, metadata: &serde_json::Value) -> String {
        let digest = Sha256::digest(metadata.to_string().as_bytes());
        format!("tavern://{}/{}", kind, hex::encode(digest))
    }

    /// Mint a keepsake for the given recipient and token URI.
    pub async fn mint(&self, to: &str, token_uri: &str) -> Result<MintOutcome, ChainError> {
        if !self.config.enabled || self.config.rpc_url.is_empty() {
            return Ok(MintOutcome::Simulated {
                token_id: Self::simulated_token_id(to, token_uri),
            });
        }

        let url = format!("{}/mint", self.config.rpc_url.trim_end_matches('/'));
        let mut request = self
            .client
            .post(&url)
            .json(&MintRequest { to, token_uri });

        if let Some(ref api_key) = self.config.api_key {
            request = request.header("X-Api-Key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ChainError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ChainError::GatewayStatus(response.status().as_u16()));
        }

        let body: MintResponse = response
            .json()
            .await
            .map_err(|e| ChainError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            tx_hash = %body.tx_hash,
            token_id = %body.token_id,
            "Mint transaction submitted"
        );

        Ok(MintOutcome::Submitted {
            tx_hash: body.tx_hash,
            token_id: body.token_id,
        })
    }

    /// Deterministic placeholder token ID for simulated mints.
    fn simulated_token_id(to: &str, token_uri: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(to.as_bytes());
        hasher.update(token_uri.as_bytes());
        let digest = hasher.finalize();
        format!("sim-{}", &hex::encode(digest)[..16])
    }
}
