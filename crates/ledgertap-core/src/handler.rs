//! The `RecordHandler` dispatch seam.
//!
//! Handlers are the business side of the pipeline: one callback per record
//! kind. The transport redelivers whole batches at-least-once, so handlers
//! must be idempotent against duplicate delivery — the pipeline performs no
//! deduplication.

use crate::error::HandlerError;
use crate::record::{BlockSummary, RevisionDetails};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

/// Kind-specific callbacks invoked by the stream dispatcher.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`: logical records from one batch are
/// dispatched concurrently, and handlers must not assume serialized access
/// to any shared resource.
#[async_trait]
pub trait RecordHandler: Send + Sync {
    /// Invoked for every revision committed to the ledger.
    async fn on_revision_details(&self, details: &RevisionDetails) -> Result<(), HandlerError>;

    /// Invoked for every committed block summary.
    async fn on_block_summary(&self, summary: &BlockSummary) -> Result<(), HandlerError>;

    /// Invoked for records with an unknown or missing discriminant.
    /// Log-and-drop by default; never fails the batch.
    async fn on_unrecognized(&self, raw: &Value) {
        warn!(record = %raw, "Stream record did not match any known record type");
    }
}

/// The reference handler: logs what arrived and how to verify it.
///
/// Useful as a starting point and for replaying captured batches during
/// development. Real deployments substitute their own `RecordHandler` that
/// projects revisions into downstream stores.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHandler;

#[async_trait]
impl RecordHandler for LogHandler {
    async fn on_revision_details(&self, details: &RevisionDetails) -> Result<(), HandlerError> {
        let revision = &details.revision;
        info!(
            id = %revision.metadata.id,
            version = revision.metadata.version,
            table = %details.table_info.table_name,
            data = %revision.data,
            "A revision was committed"
        );
        info!(
            strand_id = %revision.block_address.strand_id,
            sequence_no = revision.block_address.sequence_no,
            "You can verify this revision using its block address"
        );
        Ok(())
    }

    async fn on_block_summary(&self, summary: &BlockSummary) -> Result<(), HandlerError> {
        for statement in &summary.transaction_info.statements {
            info!(
                transaction_id = %summary.transaction_id,
                statement = %statement.statement,
                "Statement ran in committed block"
            );
        }
        for (document_id, doc) in &summary.transaction_info.documents {
            info!(
                transaction_id = %summary.transaction_id,
                document_id = %document_id,
                table = %doc.table_name,
                "Document modified in committed block"
            );
        }
        Ok(())
    }
}
