//! Error types for the LedgerTap stream pipeline.

use crate::record::RecordKind;
use thiserror::Error;

/// Errors handlers may return. Handlers are application code, so the type is
/// deliberately opaque to the pipeline.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from reversing producer-side aggregation of one transport record.
///
/// Deaggregation is all-or-nothing: any of these fails the whole transport
/// record without returning a partial sequence.
#[derive(Debug, Error)]
pub enum DeaggregateError {
    #[error("Aggregate frame truncated at byte {offset}")]
    Truncated { offset: usize },

    #[error("Record length {len} exceeds remaining payload ({remaining} bytes)")]
    LengthOverrun { len: usize, remaining: usize },

    #[error("Aggregate declares {declared} records but payload carries {found}")]
    CountMismatch { declared: u32, found: u32 },

    #[error("Deaggregation task failed: {reason}")]
    TaskFailed { reason: String },
}

/// A record whose discriminant matched a known kind but whose required
/// fields were absent or mistyped. Recoverable: logged and skipped, never
/// surfaced to handlers.
#[derive(Debug, Error)]
#[error("Malformed {kind} record: {source}")]
pub struct MalformedRecord {
    pub kind: RecordKind,
    #[source]
    pub source: serde_json::Error,
}

/// A failure that counts against the whole batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Deaggregation failed for transport record {sequence_number}: {source}")]
    Deaggregate {
        sequence_number: String,
        #[source]
        source: DeaggregateError,
    },

    #[error("Handler failed for {kind} record (transport {sequence_number}, index {index}): {reason}")]
    Handler {
        kind: RecordKind,
        sequence_number: String,
        index: usize,
        reason: String,
    },
}

/// The aggregate failure reported by the stream entry point.
///
/// Recoverable conditions (decode misses, unrecognized kinds, malformed
/// recognized records) never appear here; only transport framing and handler
/// failures do. A non-empty `failures` list means the transport should
/// redeliver the batch.
#[derive(Debug, Error)]
#[error("Batch failed: {} error(s) across {total} transport record(s)", .failures.len())]
pub struct BatchError {
    pub failures: Vec<PipelineError>,
    /// Number of transport records in the batch.
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_record_display_names_the_kind() {
        let source = serde_json::from_value::<crate::record::TableInfo>(serde_json::json!({}))
            .unwrap_err();
        let err = MalformedRecord {
            kind: RecordKind::RevisionDetails,
            source,
        };
        assert!(err.to_string().starts_with("Malformed REVISION_DETAILS record"));
    }
}
