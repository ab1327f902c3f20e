//! Record classification: decoded value → `LedgerRecord`.
//!
//! Classification is a pure structural tag check on the `recordType` string.
//! There is no schema sniffing: the discriminant is the sole basis for
//! dispatch. A matching discriminant whose required fields are absent is the
//! explicit, recoverable [`MalformedRecord`] error rather than a field-access
//! fault at handler time.

use crate::error::MalformedRecord;
use crate::record::{
    BlockSummary, LedgerRecord, RecordKind, RevisionDetails, RECORD_TYPE_BLOCK_SUMMARY,
    RECORD_TYPE_REVISION_DETAILS,
};
use serde_json::{Map, Value};

/// Discriminant field present on every stream record.
pub const RECORD_TYPE_FIELD: &str = "recordType";

/// Classify one decoded stream value.
///
/// A missing or non-string discriminant, or an unknown discriminant value,
/// yields `Ok(LedgerRecord::Unrecognized)` with the raw value retained for
/// logging. `Err(MalformedRecord)` is returned only when the discriminant
/// named a known kind but the required fields could not be extracted.
pub fn classify(value: Value) -> Result<LedgerRecord, MalformedRecord> {
    let record_type = match value.get(RECORD_TYPE_FIELD).and_then(Value::as_str) {
        Some(s) => s.to_owned(),
        None => return Ok(LedgerRecord::Unrecognized(value)),
    };

    match record_type.as_str() {
        RECORD_TYPE_REVISION_DETAILS => {
            extract::<RevisionDetails>(value, RecordKind::RevisionDetails)
                .map(LedgerRecord::RevisionDetails)
        }
        RECORD_TYPE_BLOCK_SUMMARY => extract::<BlockSummary>(value, RecordKind::BlockSummary)
            .map(LedgerRecord::BlockSummary),
        _ => Ok(LedgerRecord::Unrecognized(value)),
    }
}

/// Deserialize the record body into a typed variant.
///
/// The upstream stream writer nests the record body under a `payload` object
/// next to the discriminant; older writers inline the fields at the top
/// level. Both shapes are accepted: payload fields win over top-level ones.
fn extract<T: serde::de::DeserializeOwned>(
    value: Value,
    kind: RecordKind,
) -> Result<T, MalformedRecord> {
    let body = Value::Object(flatten_payload(value));
    serde_json::from_value(body).map_err(|source| MalformedRecord { kind, source })
}

fn flatten_payload(value: Value) -> Map<String, Value> {
    // A recognized discriminant implies the value was an object.
    let mut fields = match value {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    if let Some(Value::Object(payload)) = fields.remove("payload") {
        fields.extend(payload);
    }
    fields
}
