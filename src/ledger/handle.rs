use crate::block::Block;
use crate::config::LedgerConfig;
use crate::crypto::{OwnershipVerifier, Sha256Hash};
use crate::error::{LedgerError, Result};
use crate::ledger::chain::Chain;
use crate::ledger::validation::Anomaly;
use crate::record::OwnershipRecord;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

/// Async facade over a [`Chain`] plus the ownership-proof workflow.
///
/// The write lock serializes admissions (the only mutation path); read
/// queries share the read lock and see the chain as of some admission
/// boundary. Signature verification runs before any lock is taken, so a
/// slow or failing verifier never holds up or half-mutates the chain.
pub struct Ledger {
    chain: RwLock<Chain>,
    verifier: Box<dyn OwnershipVerifier>,
    config: LedgerConfig,
}

impl Ledger {
    /// Create a ledger with default configuration. Genesis is admitted
    /// before the value is returned; the chain is never observably empty.
    pub fn new(verifier: Box<dyn OwnershipVerifier>) -> Result<Self> {
        Self::with_config(verifier, LedgerConfig::default())
    }

    pub fn with_config(verifier: Box<dyn OwnershipVerifier>, config: LedgerConfig) -> Result<Self> {
        let chain = Chain::new()?;
        info!("ledger initialized, genesis admitted");
        Ok(Self {
            chain: RwLock::new(chain),
            verifier,
            config,
        })
    }

    /// Current tip height.
    pub async fn height(&self) -> i64 {
        self.chain.read().await.height
    }

    pub async fn block_by_hash(&self, hash: &Sha256Hash) -> Option<Block> {
        self.chain.read().await.block_by_hash(hash).cloned()
    }

    pub async fn block_by_height(&self, height: u64) -> Option<Block> {
        self.chain.read().await.block_by_height(height).cloned()
    }

    /// Ownership records admitted for `address`, in admission order.
    pub async fn stars_by_owner(&self, address: &str) -> Vec<OwnershipRecord> {
        self.chain.read().await.stars_by_owner(address)
    }

    /// Scan the chain for anomalies. An empty log means the chain is valid.
    pub async fn validate(&self) -> Vec<Anomaly> {
        self.chain.read().await.validate()
    }

    /// Produce the challenge an identity must sign to prove ownership of
    /// `address`. Stateless: the timestamp is re-derived from the signed
    /// message at submission time, so nothing is reserved or recorded here.
    pub async fn request_ownership_challenge(&self, address: &str) -> String {
        format!(
            "{}:{}:{}",
            address,
            Utc::now().timestamp(),
            self.config.registry_tag
        )
    }

    /// Verify an ownership proof and admit a record for it.
    ///
    /// Rejections (expired challenge, bad signature, malformed message)
    /// happen before any mutation; the chain height is untouched on every
    /// failure path.
    pub async fn submit_record(
        &self,
        address: &str,
        message: &str,
        signature: &str,
        star: Value,
    ) -> Result<Block> {
        let issued_at = parse_challenge_timestamp(message)?;
        let elapsed = (Utc::now().timestamp() as u64).saturating_sub(issued_at);
        if elapsed > self.config.challenge_window_secs {
            return Err(LedgerError::ExpiredChallenge {
                elapsed_secs: elapsed,
                window_secs: self.config.challenge_window_secs,
            });
        }

        if !self.verifier.verify(message, address, signature) {
            return Err(LedgerError::InvalidSignature);
        }

        let record = OwnershipRecord {
            owner: address.to_string(),
            star,
        };
        let block = Block::new(&record)?;

        let mut chain = self.chain.write().await;
        let admitted = chain.admit(block)?;
        info!(height = admitted.height, owner = address, "record admitted");
        Ok(admitted)
    }
}

/// Second colon-delimited field of a challenge message, as Unix seconds.
fn parse_challenge_timestamp(message: &str) -> Result<u64> {
    let field = message
        .split(':')
        .nth(1)
        .ok_or_else(|| LedgerError::MalformedChallenge("missing timestamp field".to_string()))?;
    field.parse::<u64>().map_err(|_| {
        LedgerError::MalformedChallenge(format!("timestamp field {:?} is not numeric", field))
    })
}
