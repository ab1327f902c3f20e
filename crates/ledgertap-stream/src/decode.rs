//! Payload decoding: base64 text → CBOR → plain structural value.
//!
//! Stream payloads are CBOR documents (self-describing binary trees, a
//! superset of the JSON data model). The decoded `ciborium::Value` carries
//! encoding-specific wrappers (tags, non-JSON scalars), so it is normalized
//! into `serde_json::Value` before the classifier inspects the discriminant.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use tracing::debug;

/// Decode one logical record payload.
///
/// Returns `None` for anything that does not yield a usable structural
/// value: bad base64, an empty payload, an unparsable CBOR document, or a
/// tree that does not map onto plain JSON (e.g. non-text map keys). All of
/// these are recoverable conditions — the caller logs and skips the record.
pub fn decode_payload(data: &str) -> Option<Value> {
    let bytes = match STANDARD.decode(data) {
        Ok(b) => b,
        Err(e) => {
            debug!(error = %e, "Payload was not valid base64");
            return None;
        }
    };
    if bytes.is_empty() {
        return None;
    }

    let raw: ciborium::Value = match ciborium::de::from_reader(bytes.as_slice()) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "Payload was not a valid CBOR document");
            return None;
        }
    };

    // Round-trip through serde to shed CBOR-specific value wrappers.
    match serde_json::to_value(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(error = %e, "CBOR value did not normalize to plain JSON");
            None
        }
    }
}
