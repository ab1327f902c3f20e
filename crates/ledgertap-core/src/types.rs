//! Transport-level and logical record types.

use serde::{Deserialize, Serialize};

/// One unit delivered by the stream transport.
///
/// The payload is opaque at this level: it may be a single logical record or
/// a producer-side aggregate of several. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportRecord {
    /// Sequence number assigned by the transport. Monotonic per shard and
    /// used only for observability — never for ordering across records.
    pub sequence_number: String,
    /// Raw transport payload (base64 on the wire).
    #[serde(with = "b64_bytes")]
    pub data: Vec<u8>,
}

impl TransportRecord {
    pub fn new(sequence_number: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            sequence_number: sequence_number.into(),
            data,
        }
    }
}

/// The unit of business meaning after deaggregation.
///
/// Ephemeral: exists only for the duration of one decode attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalRecord {
    /// Base64-encoded opaque payload.
    pub data: String,
}

impl LogicalRecord {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Serde helper: byte payloads travel as standard base64 strings.
mod b64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_record_data_roundtrips_as_base64() {
        let rec = TransportRecord::new("49590338271490256608559692538361571095921575989136588898", vec![1, 2, 3]);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["data"], "AQID");

        let back: TransportRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.data, vec![1, 2, 3]);
        assert_eq!(back.sequence_number, rec.sequence_number);
    }
}
