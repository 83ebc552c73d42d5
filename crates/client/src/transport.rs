//! HTTP transport to the authoritative world server.
//!
//! One [`Transport`] per client, built at startup and shared by the
//! reconciler and the intent submitter. It hides verbs, paths, and body
//! layout; callers see model types and [`TransportError`]. Every request
//! carries the configured timeout, so a hung server costs one bounded call,
//! never the poll loop.

use sandbox_world::{BlockPos, BlockType, OwnerKey};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::wire::{BlockState, RemoveBlockRequest, SetBlockRequest, TickUpdate};

/// A failed exchange with the world server.
///
/// `Request` and `Status` are transport-level (retry or skip, per caller
/// policy); `Malformed` means the server answered but the body did not parse,
/// and the whole response has been discarded.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: reqwest::StatusCode },
    #[error("malformed response from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct Transport {
    client: reqwest::Client,
    base_url: String,
}

impl Transport {
    /// Build the HTTP client. `base_url` is scheme + host + port, no trailing
    /// slash (e.g. `http://127.0.0.1:1416`).
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client, base_url: base_url.into() })
    }

    /// GET `/pubkey`: the server's identity key as a bare JSON byte array.
    pub async fn fetch_public_key(&self) -> Result<OwnerKey, TransportError> {
        let bytes: Vec<u8> = self.get_json("/pubkey").await?;
        Ok(OwnerKey::new(bytes))
    }

    /// GET `/known_world_state`: the complete authoritative snapshot.
    pub async fn fetch_world_state(&self) -> Result<Vec<BlockState>, TransportError> {
        self.get_json("/known_world_state").await
    }

    /// GET `/tick_update_vec`: changes since the last poll. An empty array is
    /// the common case and comes back as `Ok(vec![])`.
    pub async fn fetch_tick_updates(&self) -> Result<Vec<TickUpdate>, TransportError> {
        self.get_json("/tick_update_vec").await
    }

    /// POST `/set_block`: declare a block at a coordinate. The ack body is
    /// ignored beyond its HTTP status.
    pub async fn declare_block(
        &self,
        pos: BlockPos,
        kind: &BlockType,
        duration: u32,
    ) -> Result<(), TransportError> {
        self.post_json("/set_block", &SetBlockRequest::new(pos, kind, duration))
            .await
    }

    /// POST `/remove_block`: clear a coordinate.
    pub async fn remove_block(&self, pos: BlockPos) -> Result<(), TransportError> {
        self.post_json("/remove_block", &RemoveBlockRequest::from(pos)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| TransportError::Request { url: url.clone(), source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { url, status });
        }
        let body = response
            .text()
            .await
            .map_err(|source| TransportError::Request { url: url.clone(), source })?;
        serde_json::from_str(&body).map_err(|source| TransportError::Malformed { url, source })
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<(), TransportError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| TransportError::Request { url: url.clone(), source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { url, status });
        }
        tracing::trace!("POST {} acknowledged ({})", url, status);
        Ok(())
    }
}
