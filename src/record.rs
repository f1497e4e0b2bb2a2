//! Payload types carried in block bodies
//!
//! Bodies are JSON-encoded and decoded into a tagged union, so ownership
//! queries match on a variant instead of probing for fields.

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed sentinel value the genesis block decodes to.
pub const GENESIS_SENTINEL: &str = "Genesis Block";

/// One admitted ownership record: an address and the opaque star payload
/// it proved ownership for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnershipRecord {
    pub owner: String,
    pub star: Value,
}

/// Decoded form of a block body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// The genesis block's fixed sentinel; carries no owner.
    GenesisSentinel,
    OwnershipRecord(OwnershipRecord),
}

impl Payload {
    /// Owner address, when this payload has one.
    pub fn owner(&self) -> Option<&str> {
        match self {
            Payload::GenesisSentinel => None,
            Payload::OwnershipRecord(record) => Some(record.owner.as_str()),
        }
    }
}

/// Encode an ownership record into body bytes.
pub fn encode_record(record: &OwnershipRecord) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| LedgerError::Decode(e.to_string()))
}

/// Body bytes for the genesis block. Well-formed JSON so the genesis digest
/// input is unambiguous, even though decode never parses it.
pub fn genesis_body() -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({ "data": GENESIS_SENTINEL }))
        .unwrap_or_else(|_| Vec::new())
}

/// Decode non-genesis body bytes into an ownership record.
///
/// Bytes that are not JSON, or JSON of the wrong shape, are a
/// [`LedgerError::Decode`]; a JSON `null` body is [`LedgerError::EmptyPayload`].
pub fn decode_record(body: &[u8]) -> Result<OwnershipRecord> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| LedgerError::Decode(e.to_string()))?;
    if value.is_null() {
        return Err(LedgerError::EmptyPayload);
    }
    serde_json::from_value(value).map_err(|e| LedgerError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_round_trip() {
        let record = OwnershipRecord {
            owner: "abc123".to_string(),
            star: json!({ "dec": "68d 52' 56.9", "ra": "16h 29m 1.0s", "story": "Antares" }),
        };
        let body = encode_record(&record).unwrap();
        assert_eq!(decode_record(&body).unwrap(), record);
    }

    #[test]
    fn test_null_body_is_empty_payload() {
        assert_eq!(decode_record(b"null"), Err(LedgerError::EmptyPayload));
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        assert!(matches!(
            decode_record(b"not json"),
            Err(LedgerError::Decode(_))
        ));
        // Valid JSON, wrong shape
        assert!(matches!(
            decode_record(b"{\"stars\": 3}"),
            Err(LedgerError::Decode(_))
        ));
    }

    #[test]
    fn test_genesis_body_is_json() {
        let value: Value = serde_json::from_slice(&genesis_body()).unwrap();
        assert_eq!(value["data"], GENESIS_SENTINEL);
    }
}
