//! HTTP-backed `LedgerService` implementation.
//!
//! Talks to the ledger platform's REST surface. The digest endpoint returns
//! the Merkle root hash as hex bytes plus the tip address as an opaque text
//! expression; the client re-encodes the hash as base64 and passes the
//! address through verbatim.

use crate::client::{Digest, LedgerError, LedgerService, TransactionId};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Digest endpoint response shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DigestResponse {
    /// Hex-encoded root hash bytes.
    digest: Option<String>,
    digest_tip_address: Option<TipAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TipAddress {
    ion_text: Option<String>,
}

/// Insert endpoint response shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitResponse {
    transaction_id: String,
}

/// Remote ledger client.
pub struct RemoteLedger {
    client: Client,
    base_url: String,
}

impl RemoteLedger {
    /// Create a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: build_client(Duration::from_secs(15)),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Replace the default 15s request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }
}

fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent("ledgertap/0.2 (https://github.com/ledgertap/ledgertap)")
        .build()
        .expect("failed to build HTTP client")
}

/// Convert a digest response into the [`Digest`] value, enforcing that both
/// halves are present.
fn digest_from_response(response: DigestResponse) -> Result<Digest, LedgerError> {
    let hash_hex = response.digest.ok_or(LedgerError::MissingDigest)?;
    let hash = hex::decode(hash_hex.trim())?;
    if hash.is_empty() {
        return Err(LedgerError::MissingDigest);
    }

    let tip_address = response
        .digest_tip_address
        .and_then(|tip| tip.ion_text)
        .ok_or(LedgerError::MissingTipAddress)?;

    Ok(Digest {
        digest: STANDARD.encode(hash),
        tip_address,
    })
}

#[async_trait]
impl LedgerService for RemoteLedger {
    async fn get_digest(&self, ledger: &str) -> Result<Digest, LedgerError> {
        let url = format!("{}/v1/ledgers/{ledger}/digest", self.base_url);
        debug!(%url, "Requesting ledger digest");

        let resp = self.client.post(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LedgerError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        digest_from_response(resp.json().await?)
    }

    async fn insert_document(
        &self,
        table: &str,
        document: &Value,
    ) -> Result<TransactionId, LedgerError> {
        let url = format!("{}/v1/tables/{table}/documents", self.base_url);
        debug!(%url, "Committing document");

        let resp = self.client.post(&url).json(document).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let reason = resp.text().await.unwrap_or_else(|_| status.to_string());
            return Err(LedgerError::CommitRejected { reason });
        }

        let commit: CommitResponse = resp.json().await?;
        let tx_id = TransactionId(commit.transaction_id);
        info!(transaction_id = %tx_id, table, "Wrote document to ledger");
        Ok(tx_id)
    }
}
