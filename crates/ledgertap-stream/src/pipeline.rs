//! `StreamPipeline` — the stream entry point and dispatcher.

use crate::deagg::deaggregate;
use crate::decode::decode_payload;
use futures::future::join_all;
use ledgertap_core::{
    classify, BatchError, LedgerRecord, LogicalRecord, PipelineError, RecordHandler, RecordKind,
    TransportRecord,
};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

/// Counters accumulated across batches. Snapshot via
/// [`StreamPipeline::metrics`].
#[derive(Debug, Clone, Default)]
pub struct PipelineMetrics {
    /// Records classified and handed to a kind-specific handler.
    pub records_dispatched: u64,
    /// Records whose payload did not decode.
    pub decode_misses: u64,
    /// Records with an unknown or missing discriminant.
    pub records_unrecognized: u64,
    /// Recognized records with missing required fields.
    pub records_malformed: u64,
    /// Transport records whose aggregate framing was rejected.
    pub deaggregate_failures: u64,
    /// Handler invocations that returned an error.
    pub handler_failures: u64,
}

/// The change-stream processing pipeline.
///
/// One instance serves every batch the transport delivers. The pipeline
/// itself holds no per-record state; the only shared mutable state is the
/// metrics snapshot.
pub struct StreamPipeline {
    handler: Arc<dyn RecordHandler>,
    metrics: Arc<Mutex<PipelineMetrics>>,
}

impl StreamPipeline {
    pub fn new(handler: Arc<dyn RecordHandler>) -> Self {
        Self {
            handler,
            metrics: Arc::new(Mutex::new(PipelineMetrics::default())),
        }
    }

    /// Returns a snapshot of current metrics.
    pub fn metrics(&self) -> PipelineMetrics {
        self.metrics.lock().unwrap().clone()
    }

    /// Process one transport batch to completion.
    ///
    /// All logical records across all transport records run concurrently.
    /// The call returns only when every record has been processed or has
    /// failed; a sibling failure never cancels records already in flight.
    /// Any deaggregation or handler failure fails the batch as a whole so
    /// the transport redelivers it — recoverable conditions (decode misses,
    /// unrecognized kinds, malformed recognized records) are logged,
    /// counted, and skipped.
    pub async fn process_batch(&self, batch: &[TransportRecord]) -> Result<(), BatchError> {
        let results = join_all(batch.iter().map(|record| self.process_transport(record))).await;

        let failures: Vec<PipelineError> = results.into_iter().flatten().collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(BatchError {
                failures,
                total: batch.len(),
            })
        }
    }

    /// Process one transport record; returns the failures it produced.
    async fn process_transport(&self, record: &TransportRecord) -> Vec<PipelineError> {
        info!(sequence_number = %record.sequence_number, "Processing transport record");

        let logical = match deaggregate(record).await {
            Ok(records) => records,
            Err(source) => {
                error!(
                    sequence_number = %record.sequence_number,
                    error = %source,
                    "Deaggregation failed"
                );
                self.metrics.lock().unwrap().deaggregate_failures += 1;
                return vec![PipelineError::Deaggregate {
                    sequence_number: record.sequence_number.clone(),
                    source,
                }];
            }
        };

        let results = join_all(
            logical
                .iter()
                .enumerate()
                .map(|(index, rec)| self.process_logical(&record.sequence_number, index, rec)),
        )
        .await;

        results.into_iter().filter_map(Result::err).collect()
    }

    /// Decode, classify, and dispatch one logical record.
    async fn process_logical(
        &self,
        sequence_number: &str,
        index: usize,
        record: &LogicalRecord,
    ) -> Result<(), PipelineError> {
        let value = match decode_payload(&record.data) {
            Some(v) => v,
            None => {
                warn!(
                    sequence_number,
                    index, "Logical record payload did not decode; skipping"
                );
                self.metrics.lock().unwrap().decode_misses += 1;
                return Ok(());
            }
        };

        let record = match classify(value) {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    sequence_number,
                    index,
                    error = %e,
                    "Recognized record was malformed; skipping"
                );
                self.metrics.lock().unwrap().records_malformed += 1;
                return Ok(());
            }
        };

        self.dispatch(sequence_number, index, record).await
    }

    /// Route one classified record to its handler. The `Unrecognized` arm is
    /// mandatory: adding a record kind forces a decision here.
    async fn dispatch(
        &self,
        sequence_number: &str,
        index: usize,
        record: LedgerRecord,
    ) -> Result<(), PipelineError> {
        let outcome = match record {
            LedgerRecord::RevisionDetails(details) => (
                RecordKind::RevisionDetails,
                self.handler.on_revision_details(&details).await,
            ),
            LedgerRecord::BlockSummary(summary) => (
                RecordKind::BlockSummary,
                self.handler.on_block_summary(&summary).await,
            ),
            LedgerRecord::Unrecognized(raw) => {
                self.handler.on_unrecognized(&raw).await;
                self.metrics.lock().unwrap().records_unrecognized += 1;
                return Ok(());
            }
        };

        match outcome {
            (_, Ok(())) => {
                self.metrics.lock().unwrap().records_dispatched += 1;
                Ok(())
            }
            (kind, Err(e)) => {
                error!(
                    sequence_number,
                    index,
                    %kind,
                    error = %e,
                    "Record handler failed"
                );
                self.metrics.lock().unwrap().handler_failures += 1;
                Err(PipelineError::Handler {
                    kind,
                    sequence_number: sequence_number.to_owned(),
                    index,
                    reason: e.to_string(),
                })
            }
        }
    }
}
