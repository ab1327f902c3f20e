//! The `LedgerService` trait and its value types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Identifier returned on commit. Correlates a write with later audit or
/// stream events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A ledger digest: the Merkle root hash plus the address of the block it
/// was computed over. Created on demand, never persisted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Digest {
    /// Base64-encoded root hash of the ledger's Merkle tree.
    pub digest: String,
    /// Opaque address of the block the hash covers. Ledger-defined format,
    /// propagated verbatim and never parsed.
    pub tip_address: String,
}

/// Errors from the ledger service.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The digest received was blank")]
    MissingDigest,

    #[error("The tip address was not present")]
    MissingTipAddress,

    #[error("Digest hash was not valid hex: {0}")]
    InvalidDigest(#[from] hex::FromHexError),

    #[error("Ledger commit rejected: {reason}")]
    CommitRejected { reason: String },

    #[error("Unexpected response from ledger service: status {status}")]
    UnexpectedStatus { status: u16 },
}

/// The managed ledger platform, as this system uses it.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn LedgerService>` across request handlers.
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Retrieve the current digest of the named ledger.
    ///
    /// Fails with [`LedgerError::MissingDigest`] or
    /// [`LedgerError::MissingTipAddress`] if either half is absent from the
    /// response; no partial digest is ever returned.
    async fn get_digest(&self, ledger: &str) -> Result<Digest, LedgerError>;

    /// Commit one document to the named table inside a transaction.
    /// All-or-nothing per invocation.
    async fn insert_document(
        &self,
        table: &str,
        document: &Value,
    ) -> Result<TransactionId, LedgerError>;
}
