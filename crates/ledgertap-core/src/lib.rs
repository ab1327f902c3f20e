//! # ledgertap-core
//!
//! Core types and traits shared across all LedgerTap crates: the transport
//! and logical record model, the `LedgerRecord` discriminated union, the
//! record classifier, and the `RecordHandler` dispatch seam.

pub mod classify;
pub mod error;
pub mod handler;
pub mod record;
pub mod types;

pub use classify::classify;
pub use error::{BatchError, DeaggregateError, HandlerError, MalformedRecord, PipelineError};
pub use handler::{LogHandler, RecordHandler};
pub use record::{BlockSummary, LedgerRecord, RecordKind, RevisionDetails};
pub use types::{LogicalRecord, TransportRecord};
