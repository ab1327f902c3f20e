//! `ledgertap replay` — run a captured batch file through the pipeline.
//!
//! The batch file is a JSON array of transport records:
//! `[{"sequenceNumber": "...", "data": "<base64>"}, ...]` — the shape
//! emitted when capturing stream invocations for local debugging.

use anyhow::{Context, Result};
use async_trait::async_trait;
use ledgertap_core::{
    BlockSummary, HandlerError, LogHandler, RecordHandler, RevisionDetails, TransportRecord,
};
use ledgertap_stream::StreamPipeline;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Pretty-prints every classified record as JSON.
struct PrintHandler;

#[async_trait]
impl RecordHandler for PrintHandler {
    async fn on_revision_details(&self, details: &RevisionDetails) -> Result<(), HandlerError> {
        println!("{}", serde_json::to_string_pretty(details)?);
        Ok(())
    }

    async fn on_block_summary(&self, summary: &BlockSummary) -> Result<(), HandlerError> {
        println!("{}", serde_json::to_string_pretty(summary)?);
        Ok(())
    }

    async fn on_unrecognized(&self, raw: &Value) {
        println!("unrecognized: {raw}");
    }
}

pub async fn run(file: &Path, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let batch: Vec<TransportRecord> =
        serde_json::from_str(&content).context("batch file is not an array of transport records")?;

    let handler: Arc<dyn RecordHandler> = if json {
        Arc::new(PrintHandler)
    } else {
        Arc::new(LogHandler)
    };

    let pipeline = StreamPipeline::new(handler);
    let outcome = pipeline.process_batch(&batch).await;

    let metrics = pipeline.metrics();
    eprintln!(
        "replayed {} transport record(s): {} dispatched, {} decode misses, {} unrecognized, {} malformed",
        batch.len(),
        metrics.records_dispatched,
        metrics.decode_misses,
        metrics.records_unrecognized,
        metrics.records_malformed,
    );

    if let Err(e) = outcome {
        for failure in &e.failures {
            eprintln!("  failure: {failure}");
        }
        anyhow::bail!("{e}");
    }
    Ok(())
}
