use crate::ledger::chain::Chain;
use serde::Serialize;
use tracing::warn;

/// Kind of inconsistency found by the chain scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnomalyKind {
    /// A block's stored hash no longer matches its recomputed digest.
    HashMismatch,
    /// A block's back-link does not reference its predecessor's hash.
    LinkMismatch,
}

/// One detected inconsistency. Anomalies are reported as data, never raised
/// as errors, and the chain is never auto-repaired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    pub height: u64,
    pub kind: AnomalyKind,
}

/// Walk every block above genesis and collect hash and linkage anomalies.
///
/// An empty log means the chain is valid; a chain holding only genesis is
/// vacuously valid. Idempotent over an unmodified chain.
pub fn validate_chain(chain: &Chain) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    for index in 1..chain.blocks.len() {
        let block = &chain.blocks[index];
        let height = block.height;

        if !block.validate() {
            warn!(height, "block hash does not match its recomputed digest");
            anomalies.push(Anomaly {
                height,
                kind: AnomalyKind::HashMismatch,
            });
        }

        if block.previous_hash != chain.blocks[index - 1].hash {
            warn!(height, "block back-link does not match its predecessor");
            anomalies.push(Anomaly {
                height,
                kind: AnomalyKind::LinkMismatch,
            });
        }
    }

    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::record::OwnershipRecord;
    use serde_json::json;

    fn chain_with_blocks(count: usize) -> Chain {
        let mut chain = Chain::new().unwrap();
        for i in 0..count {
            let record = OwnershipRecord {
                owner: format!("owner-{i}"),
                star: json!({ "seq": i }),
            };
            chain.admit(Block::new(&record).unwrap()).unwrap();
        }
        chain
    }

    #[test]
    fn test_untouched_chain_is_valid_and_idempotent() {
        let chain = chain_with_blocks(3);
        assert!(validate_chain(&chain).is_empty());
        assert_eq!(validate_chain(&chain), validate_chain(&chain));
    }

    #[test]
    fn test_genesis_only_chain_is_vacuously_valid() {
        let chain = chain_with_blocks(0);
        assert!(validate_chain(&chain).is_empty());
    }

    #[test]
    fn test_body_tamper_on_last_block_is_hash_mismatch_only() {
        let mut chain = chain_with_blocks(2);
        chain.blocks[2].body = b"{\"owner\":\"mallory\",\"star\":{}}".to_vec();

        assert_eq!(
            validate_chain(&chain),
            vec![Anomaly {
                height: 2,
                kind: AnomalyKind::HashMismatch,
            }]
        );
    }

    #[test]
    fn test_body_tamper_mid_chain_is_hash_mismatch_only() {
        // The stored hash field is unchanged, and that is what the next
        // block's back-link references, so no LinkMismatch appears.
        let mut chain = chain_with_blocks(3);
        chain.blocks[1].body.push(b' ');

        assert_eq!(
            validate_chain(&chain),
            vec![Anomaly {
                height: 1,
                kind: AnomalyKind::HashMismatch,
            }]
        );
    }

    #[test]
    fn test_hash_tamper_mid_chain_breaks_the_downstream_link() {
        let mut chain = chain_with_blocks(3);
        chain.blocks[1].hash = Some([7u8; 32]);

        assert_eq!(
            validate_chain(&chain),
            vec![
                Anomaly {
                    height: 1,
                    kind: AnomalyKind::HashMismatch,
                },
                Anomaly {
                    height: 2,
                    kind: AnomalyKind::LinkMismatch,
                },
            ]
        );
    }
}
