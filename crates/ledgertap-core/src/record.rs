//! The `LedgerRecord` discriminated union and its component types.
//!
//! Every decoded stream payload carries a `recordType` string discriminant.
//! The known kinds are modelled as a closed sum type so that adding a new
//! kind is a compile-time-visible decision at every dispatch site.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Discriminant value for [`RevisionDetails`].
pub const RECORD_TYPE_REVISION_DETAILS: &str = "REVISION_DETAILS";
/// Discriminant value for [`BlockSummary`].
pub const RECORD_TYPE_BLOCK_SUMMARY: &str = "BLOCK_SUMMARY";

/// The known record kinds. Used in errors, logs, and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    RevisionDetails,
    BlockSummary,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::RevisionDetails => write!(f, "{RECORD_TYPE_REVISION_DETAILS}"),
            RecordKind::BlockSummary => write!(f, "{RECORD_TYPE_BLOCK_SUMMARY}"),
        }
    }
}

/// Table identity carried on revision records and block summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub table_name: String,
    pub table_id: String,
}

/// Position of a revision within the ledger's hash chain.
/// The strand id is opaque; the sequence number locates the block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockAddress {
    pub strand_id: String,
    pub sequence_no: u64,
}

/// Metadata attached to one committed document revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionMetadata {
    /// Document id.
    pub id: String,
    /// Revision version number, starting at 0 for the insert.
    pub version: u64,
    /// Commit timestamp, ledger-formatted (`YYYY-MM-DDTHH:mm:ss.msZ`).
    pub tx_time: String,
    /// Owning transaction id.
    pub tx_id: String,
}

/// One committed document revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub block_address: BlockAddress,
    /// Content hash of the revision.
    pub hash: String,
    /// The committed document data, verbatim.
    pub data: Value,
    pub metadata: RevisionMetadata,
}

/// A document revision committed to the ledger, as carried on the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionDetails {
    pub table_info: TableInfo,
    pub revision: Revision,
}

/// One statement executed inside a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub statement: String,
    pub start_time: String,
    /// Per-statement content hash.
    pub statement_digest: String,
}

/// Table identity for a document touched by a transaction, plus the indices
/// of the statements (into [`TransactionInfo::statements`]) that touched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub table_name: String,
    pub table_id: String,
    #[serde(default)]
    pub statements: Vec<usize>,
}

/// What a transaction executed and which documents it touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub statements: Vec<Statement>,
    /// Keyed by document id.
    pub documents: HashMap<String, DocumentInfo>,
}

/// (hash, document id) pair covering one revision folded into a block hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionSummary {
    pub hash: String,
    pub document_id: String,
}

/// One committed block, as carried on the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSummary {
    pub transaction_id: String,
    pub block_hash: String,
    pub transaction_info: TransactionInfo,
    pub revision_summaries: Vec<RevisionSummary>,
}

/// A classified stream record.
///
/// `Unrecognized` carries the raw decoded value so the dispatcher can log it;
/// it is a mandatory arm at every match site.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerRecord {
    RevisionDetails(RevisionDetails),
    BlockSummary(BlockSummary),
    Unrecognized(Value),
}

impl LedgerRecord {
    /// The kind of a recognized record, `None` for `Unrecognized`.
    pub fn kind(&self) -> Option<RecordKind> {
        match self {
            LedgerRecord::RevisionDetails(_) => Some(RecordKind::RevisionDetails),
            LedgerRecord::BlockSummary(_) => Some(RecordKind::BlockSummary),
            LedgerRecord::Unrecognized(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_kind_display_matches_wire_discriminant() {
        assert_eq!(RecordKind::RevisionDetails.to_string(), "REVISION_DETAILS");
        assert_eq!(RecordKind::BlockSummary.to_string(), "BLOCK_SUMMARY");
    }

    #[test]
    fn revision_details_serde_uses_camel_case() {
        let json = serde_json::json!({
            "tableInfo": {"tableName": "Orders", "tableId": "t1"},
            "revision": {
                "blockAddress": {"strandId": "s1", "sequenceNo": 5},
                "hash": "ab12",
                "data": {"sku": "X"},
                "metadata": {"id": "doc1", "version": 1, "txTime": "2024-01-01T00:00:00.000Z", "txId": "tx1"}
            }
        });
        let details: RevisionDetails = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(details.table_info.table_name, "Orders");
        assert_eq!(details.revision.block_address.sequence_no, 5);
        assert_eq!(serde_json::to_value(&details).unwrap(), json);
    }
}
