//! Batch deaggregation: one transport record → N logical records.
//!
//! Producers may pack several logical records into one transport record to
//! amortize per-record transport cost. The aggregate framing is:
//!
//! ```text
//! magic (4 bytes) │ count: u32 BE │ count × ( len: u32 BE │ body )
//! ```
//!
//! A payload that does not start with the magic header was not aggregated
//! and is passed through as a single logical record. Malformed framing fails
//! the whole transport record; there is no partial result.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ledgertap_core::{DeaggregateError, LogicalRecord, TransportRecord};

/// Marks an aggregated payload. Chosen to be invalid as a leading byte of
/// every supported logical payload encoding, so passthrough detection is
/// unambiguous.
pub const AGGREGATE_MAGIC: [u8; 4] = [0xF3, 0x89, 0x9A, 0xC2];

/// Reverse producer-side aggregation of one transport record.
///
/// The framing parser is synchronous and CPU-bound; it runs on the blocking
/// pool so large aggregates never stall the async executor. Returns the
/// logical records in producer order.
pub async fn deaggregate(
    record: &TransportRecord,
) -> Result<Vec<LogicalRecord>, DeaggregateError> {
    let payload = record.data.clone();
    tokio::task::spawn_blocking(move || split_aggregate(&payload))
        .await
        .map_err(|e| DeaggregateError::TaskFailed {
            reason: e.to_string(),
        })?
}

/// Parse the aggregate framing. Synchronous primitive behind [`deaggregate`].
pub fn split_aggregate(payload: &[u8]) -> Result<Vec<LogicalRecord>, DeaggregateError> {
    if payload.len() < AGGREGATE_MAGIC.len() || payload[..4] != AGGREGATE_MAGIC {
        // Not aggregated: the payload is one logical record.
        return Ok(vec![LogicalRecord::new(STANDARD.encode(payload))]);
    }

    let mut offset = AGGREGATE_MAGIC.len();
    let declared = read_u32(payload, &mut offset)?;

    // The count is untrusted input: cap the capacity hint by the most
    // records the remaining bytes could frame (4-byte length prefix each),
    // so a hostile count cannot force a huge allocation before the count
    // check rejects the frame.
    let most_possible = (payload.len() - offset) / 4;
    let mut records = Vec::with_capacity((declared as usize).min(most_possible));
    while offset < payload.len() {
        let len = read_u32(payload, &mut offset)? as usize;
        let remaining = payload.len() - offset;
        if len > remaining {
            return Err(DeaggregateError::LengthOverrun { len, remaining });
        }
        records.push(LogicalRecord::new(
            STANDARD.encode(&payload[offset..offset + len]),
        ));
        offset += len;
    }

    if records.len() != declared as usize {
        return Err(DeaggregateError::CountMismatch {
            declared,
            found: records.len() as u32,
        });
    }

    Ok(records)
}

fn read_u32(payload: &[u8], offset: &mut usize) -> Result<u32, DeaggregateError> {
    let end = *offset + 4;
    let bytes: [u8; 4] = payload
        .get(*offset..end)
        .and_then(|s| s.try_into().ok())
        .ok_or(DeaggregateError::Truncated { offset: *offset })?;
    *offset = end;
    Ok(u32::from_be_bytes(bytes))
}

/// Build an aggregate payload from logical record bodies. Producer-side
/// counterpart of [`split_aggregate`], used to frame test fixtures.
pub fn build_aggregate<B: AsRef<[u8]>>(bodies: &[B]) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        AGGREGATE_MAGIC.len() + 4 + bodies.iter().map(|b| 4 + b.as_ref().len()).sum::<usize>(),
    );
    out.extend_from_slice(&AGGREGATE_MAGIC);
    out.extend_from_slice(&(bodies.len() as u32).to_be_bytes());
    for body in bodies {
        let body = body.as_ref();
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend_from_slice(body);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_b64(record: &LogicalRecord) -> Vec<u8> {
        STANDARD.decode(&record.data).unwrap()
    }

    #[test]
    fn aggregate_roundtrips_in_producer_order() {
        let payload = build_aggregate(&[b"first".as_ref(), b"second", b"third"]);
        let records = split_aggregate(&payload).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(decode_b64(&records[0]), b"first");
        assert_eq!(decode_b64(&records[1]), b"second");
        assert_eq!(decode_b64(&records[2]), b"third");
    }

    #[test]
    fn non_aggregated_payload_passes_through() {
        let records = split_aggregate(b"\xa1ax\x01").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(decode_b64(&records[0]), b"\xa1ax\x01");
    }

    #[test]
    fn empty_aggregate_yields_no_records() {
        let payload = build_aggregate::<&[u8]>(&[]);
        assert!(split_aggregate(&payload).unwrap().is_empty());
    }

    #[test]
    fn truncated_header_is_rejected() {
        let mut payload = AGGREGATE_MAGIC.to_vec();
        payload.extend_from_slice(&[0, 0]); // half a count
        assert!(matches!(
            split_aggregate(&payload),
            Err(DeaggregateError::Truncated { .. })
        ));
    }

    #[test]
    fn overlong_record_length_is_rejected() {
        let mut payload = build_aggregate(&[b"abc"]);
        let len_at = AGGREGATE_MAGIC.len() + 4;
        payload[len_at..len_at + 4].copy_from_slice(&100u32.to_be_bytes());
        assert!(matches!(
            split_aggregate(&payload),
            Err(DeaggregateError::LengthOverrun { len: 100, .. })
        ));
    }

    #[test]
    fn huge_declared_count_is_rejected_without_reserving_for_it() {
        // 12 bytes claiming u32::MAX records must fail cleanly, not abort
        // the process trying to reserve capacity for the declared count.
        let mut payload = AGGREGATE_MAGIC.to_vec();
        payload.extend_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(
            split_aggregate(&payload),
            Err(DeaggregateError::CountMismatch {
                declared: u32::MAX,
                found: 0
            })
        ));
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let mut payload = build_aggregate(&[b"abc", b"def"]);
        let count_at = AGGREGATE_MAGIC.len();
        payload[count_at..count_at + 4].copy_from_slice(&3u32.to_be_bytes());
        assert!(matches!(
            split_aggregate(&payload),
            Err(DeaggregateError::CountMismatch {
                declared: 3,
                found: 2
            })
        ));
    }

    #[tokio::test]
    async fn awaitable_adapter_matches_sync_primitive() {
        let payload = build_aggregate(&[b"only".as_ref()]);
        let record = TransportRecord::new("seq-1", payload.clone());
        assert_eq!(
            deaggregate(&record).await.unwrap(),
            split_aggregate(&payload).unwrap()
        );
    }
}
