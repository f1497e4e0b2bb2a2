use crate::block::Block;
use crate::crypto::{hash_to_hex, Sha256Hash};
use crate::error::{LedgerError, Result};
use crate::ledger::validation::{validate_chain, Anomaly};
use crate::record::{OwnershipRecord, Payload};
use tracing::debug;

/// The ordered, append-only block sequence.
///
/// `admit` is the only mutator. Everything else is a read over `blocks`,
/// whose index always equals the block height.
pub struct Chain {
    pub blocks: Vec<Block>,
    /// Cached tip height; -1 only transiently, before genesis is admitted.
    pub height: i64,
}

impl Chain {
    /// Create a chain and immediately admit its genesis block.
    pub fn new() -> Result<Self> {
        let mut chain = Chain {
            blocks: vec![],
            height: -1,
        };
        chain.admit(Block::genesis())?;
        Ok(chain)
    }

    /// Admit a block: assign height, time and back-link, compute the digest,
    /// and append.
    ///
    /// Callers must hold exclusive access for the whole call; the read of
    /// `height` and the append are one critical section.
    pub fn admit(&mut self, mut block: Block) -> Result<Block> {
        block.height = (self.height + 1) as u64;
        block.time = chrono::Utc::now().timestamp() as u64;
        if let Some(last) = self.blocks.last() {
            block.previous_hash = last.hash;
        }
        block.hash = Some(block.compute_hash());

        self.blocks.push(block.clone());
        self.height += 1;

        // Postcondition: the new tail is the block we just built. Failure
        // here means internal corruption, not a rejectable submission.
        match self.blocks.get(self.height as usize) {
            Some(tail) if *tail == block => {
                debug!(
                    height = block.height,
                    hash = %block.hash.map(|h| hash_to_hex(&h)).unwrap_or_default(),
                    "block admitted"
                );
                Ok(block)
            }
            _ => Err(LedgerError::Admission(format!(
                "appended block at height {} does not match the admitted block",
                block.height
            ))),
        }
    }

    /// First block with the given hash, if any.
    pub fn block_by_hash(&self, hash: &Sha256Hash) -> Option<&Block> {
        self.blocks.iter().find(|b| b.hash.as_ref() == Some(hash))
    }

    /// Block at the given height, if any.
    pub fn block_by_height(&self, height: u64) -> Option<&Block> {
        self.blocks.iter().find(|b| b.height == height)
    }

    /// Every ownership record admitted for `address`, in admission order.
    /// Genesis decodes to the sentinel and is naturally excluded; blocks
    /// whose bodies fail to decode are skipped.
    pub fn stars_by_owner(&self, address: &str) -> Vec<OwnershipRecord> {
        self.blocks
            .iter()
            .filter_map(|block| match block.decode_payload() {
                Ok(Payload::OwnershipRecord(record)) if record.owner == address => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Scan the whole chain for hash and linkage anomalies.
    pub fn validate(&self) -> Vec<Anomaly> {
        validate_chain(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::GENESIS_SENTINEL;
    use serde_json::json;

    fn record_for(owner: &str, name: &str) -> OwnershipRecord {
        OwnershipRecord {
            owner: owner.to_string(),
            star: json!({ "name": name }),
        }
    }

    fn admit_record(chain: &mut Chain, owner: &str, name: &str) -> Block {
        let block = Block::new(&record_for(owner, name)).unwrap();
        chain.admit(block).unwrap()
    }

    #[test]
    fn test_new_chain_has_genesis() {
        let chain = Chain::new().unwrap();
        assert_eq!(chain.height, 0);
        assert_eq!(chain.blocks.len(), 1);

        let genesis = &chain.blocks[0];
        assert_eq!(genesis.height, 0);
        assert_eq!(genesis.previous_hash, None);
        assert!(genesis.validate());
        assert_eq!(
            genesis.decode_payload().unwrap(),
            Payload::GenesisSentinel,
            "genesis decodes to the {GENESIS_SENTINEL:?} sentinel"
        );
    }

    #[test]
    fn test_admission_assigns_consecutive_heights_and_links() {
        let mut chain = Chain::new().unwrap();
        let first = admit_record(&mut chain, "alice", "Vega");
        let second = admit_record(&mut chain, "bob", "Deneb");

        assert_eq!(chain.height, 2);
        assert_eq!(first.height, 1);
        assert_eq!(second.height, 2);
        assert_eq!(first.previous_hash, chain.blocks[0].hash);
        assert_eq!(second.previous_hash, first.hash);
        assert!(first.validate());
        assert!(second.validate());
    }

    #[test]
    fn test_block_by_hash_and_height() {
        let mut chain = Chain::new().unwrap();
        let admitted = admit_record(&mut chain, "alice", "Altair");
        let hash = admitted.hash.unwrap();

        assert_eq!(chain.block_by_hash(&hash), Some(&admitted));
        assert_eq!(chain.block_by_height(1), Some(&admitted));

        // Absence is a value, not an error.
        assert_eq!(chain.block_by_hash(&[0u8; 32]), None);
        assert_eq!(chain.block_by_height(99), None);
    }

    #[test]
    fn test_stars_by_owner_ordered_and_exclusive() {
        let mut chain = Chain::new().unwrap();
        admit_record(&mut chain, "alice", "Vega");
        admit_record(&mut chain, "bob", "Deneb");
        admit_record(&mut chain, "alice", "Altair");

        let stars = chain.stars_by_owner("alice");
        assert_eq!(
            stars,
            vec![record_for("alice", "Vega"), record_for("alice", "Altair")]
        );
        assert!(chain.stars_by_owner("nobody").is_empty());
    }
}
