//! # ledgertap-stream
//!
//! The change-stream decoding and dispatch pipeline.
//!
//! Receives batches of transport records from the ledger's change stream,
//! reverses producer-side aggregation, decodes each logical record's binary
//! payload, classifies it, and routes it to the registered `RecordHandler`.
//!
//! ## Architecture
//! ```text
//! transport batch
//!       │  (per transport record)
//!       ▼
//! deaggregate ── DeaggregateError fails the batch
//!       │  (per logical record, concurrently)
//!       ▼
//! decode_payload ── miss: logged, skipped
//!       │
//!       ▼
//! classify ── Unrecognized / MalformedRecord: logged, skipped
//!       │
//!       ▼
//! RecordHandler callback ── failure fails the batch
//! ```
//!
//! A failed batch is reported to the transport as a whole, triggering
//! at-least-once redelivery; already-dispatched records are not rolled back.

pub mod deagg;
pub mod decode;
pub mod pipeline;

pub use deagg::deaggregate;
pub use decode::decode_payload;
pub use pipeline::{PipelineMetrics, StreamPipeline};
