//! Block structure, digest computation and self-validation

use crate::crypto::Sha256Hash;
use crate::error::Result;
use crate::record::{self, OwnershipRecord, Payload};
use sha2::{Digest, Sha256};

/// One immutable record in the ledger.
///
/// `hash`, `height`, `time` and `previous_hash` are placeholders until the
/// chain admits the block; after admission no field is ever written again.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Block {
    /// Digest of the other fields. `None` until admission.
    pub hash: Option<Sha256Hash>,
    /// Position in the ledger; 0 is reserved for genesis.
    pub height: u64,
    /// JSON-encoded payload bytes.
    #[serde(with = "serde_bytes")]
    pub body: Vec<u8>,
    /// Unix timestamp (seconds) of admission.
    pub time: u64,
    /// Hash of the block at `height - 1`; `None` only for genesis.
    pub previous_hash: Option<Sha256Hash>,
}

impl Block {
    /// Build an unadmitted block around an ownership record.
    pub fn new(record: &OwnershipRecord) -> Result<Self> {
        Ok(Block {
            hash: None,
            height: 0,
            body: record::encode_record(record)?,
            time: 0,
            previous_hash: None,
        })
    }

    /// Build the unadmitted genesis block.
    pub fn genesis() -> Self {
        Block {
            hash: None,
            height: 0,
            body: record::genesis_body(),
            time: 0,
            previous_hash: None,
        }
    }

    /// Digest over the block's fields with `hash` excluded.
    ///
    /// The input order is part of the hash contract:
    /// `height (LE) || time (LE) || previous_hash || body`, where an absent
    /// previous hash contributes 32 zero bytes.
    pub fn compute_hash(&self) -> Sha256Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.height.to_le_bytes());
        hasher.update(self.time.to_le_bytes());
        hasher.update(self.previous_hash.unwrap_or([0u8; 32]));
        hasher.update(&self.body);
        hasher.finalize().into()
    }

    /// Recompute the digest and compare against the stored hash.
    /// Pure; an unadmitted block (no hash yet) is simply not valid.
    pub fn validate(&self) -> bool {
        match self.hash {
            Some(stored) => stored == self.compute_hash(),
            None => false,
        }
    }

    /// Decode the body back into its structured payload.
    ///
    /// The genesis block short-circuits to the sentinel without reading its
    /// bytes; every other block must carry a well-formed ownership record.
    pub fn decode_payload(&self) -> Result<Payload> {
        if self.height == 0 {
            return Ok(Payload::GenesisSentinel);
        }
        Ok(Payload::OwnershipRecord(record::decode_record(&self.body)?))
    }
}
