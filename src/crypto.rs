//! Cryptographic primitives for starledger
//!
//! The ledger core only ever consumes the [`OwnershipVerifier`] boolean
//! oracle; everything else here exists to provide a concrete secp256k1
//! implementation of it and the signing side used by callers and tests.

use crate::error::LedgerError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use secp256k1::{
    constants::SECRET_KEY_SIZE,
    ecdsa::{RecoverableSignature, RecoveryId},
    All, Message, PublicKey, Secp256k1, SecretKey,
};
use sha2::{Digest, Sha256};

/// A thread-safe, lazily initialized Secp256k1 context.
/// This prevents repeated, unnecessary context creation.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Type alias for a SHA-256 digest.
/// We use a fixed-size array for internal type safety and performance.
pub type Sha256Hash = [u8; 32];

/// SHA-256 over a byte slice.
pub fn sha256(bytes: &[u8]) -> Sha256Hash {
    Sha256::digest(bytes).into()
}

/// Convert a digest to a hex string for display.
pub fn hash_to_hex(hash: &Sha256Hash) -> String {
    hex::encode(hash)
}

/// Convert a hex string to a digest.
pub fn hash_from_hex(hex_str: &str) -> Result<Sha256Hash, LedgerError> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| LedgerError::Crypto(format!("Invalid hex digest: {}", e)))?;
    if bytes.len() != 32 {
        return Err(LedgerError::Crypto(format!(
            "Digest must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    bytes
        .try_into()
        .map_err(|_| LedgerError::Crypto("Failed to convert bytes into digest".to_string()))
}

/// Derive the ledger address for a public key: lowercase hex of the
/// SHA-256 hash of the compressed key bytes.
pub fn address_for_public_key(public_key: &PublicKey) -> String {
    hex::encode(Sha256::digest(public_key.serialize()))
}

/// Proof that the signer of `message` controls the private key for `address`.
///
/// The ledger treats this as an opaque boolean oracle: any failure mode
/// (malformed signature, recovery failure, address mismatch) is simply
/// "not verified".
pub trait OwnershipVerifier: Send + Sync {
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool;
}

/// secp256k1 recoverable-signature verifier.
///
/// Signature transport format: base64 of 65 bytes, a recovery id byte
/// followed by the 64-byte compact ECDSA signature over `SHA-256(message)`.
/// The public key is recovered from the signature and its derived address
/// compared against the claim.
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1Verifier;

impl Secp256k1Verifier {
    fn recover_address(message: &str, signature: &str) -> Result<String, LedgerError> {
        let raw = BASE64
            .decode(signature)
            .map_err(|e| LedgerError::Crypto(format!("Invalid base64 signature: {}", e)))?;
        if raw.len() != 65 {
            return Err(LedgerError::Crypto(format!(
                "Signature must be 65 bytes (recovery id + compact), got {}",
                raw.len()
            )));
        }

        let recovery_id = RecoveryId::from_i32(raw[0] as i32)
            .map_err(|e| LedgerError::Crypto(format!("Invalid recovery id: {}", e)))?;
        let signature = RecoverableSignature::from_compact(&raw[1..], recovery_id)
            .map_err(|e| LedgerError::Crypto(format!("Invalid signature: {}", e)))?;

        let digest = Sha256::digest(message.as_bytes());
        let message = Message::from_digest_slice(&digest)
            .map_err(|e| LedgerError::Crypto(format!("Failed to create message: {}", e)))?;

        let public_key = SECP256K1_CONTEXT
            .recover_ecdsa(&message, &signature)
            .map_err(|_| LedgerError::Crypto("Public key recovery failed".to_string()))?;

        Ok(address_for_public_key(&public_key))
    }
}

impl OwnershipVerifier for Secp256k1Verifier {
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool {
        match Self::recover_address(message, signature) {
            Ok(recovered) => recovered == address,
            Err(_) => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random KeyPair using the OS random number generator.
    pub fn generate() -> Self {
        let secret_key = SecretKey::new(&mut OsRng);
        // Using the context from the static Lazy
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);

        KeyPair {
            secret_key,
            public_key,
        }
    }

    /// Creates a KeyPair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|e| {
            if bytes.len() != SECRET_KEY_SIZE {
                LedgerError::Crypto(format!(
                    "Secret key must be {} bytes, got {}",
                    SECRET_KEY_SIZE,
                    bytes.len()
                ))
            } else {
                LedgerError::Crypto(format!("Invalid secret key bytes: {}", e))
            }
        })?;
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);

        Ok(KeyPair {
            secret_key,
            public_key,
        })
    }

    /// The ledger address for this key pair.
    pub fn address(&self) -> String {
        address_for_public_key(&self.public_key)
    }

    /// Signs a challenge message, producing the base64 recoverable-signature
    /// format that [`Secp256k1Verifier`] accepts.
    pub fn sign_message(&self, message: &str) -> Result<String, LedgerError> {
        let digest = Sha256::digest(message.as_bytes());

        let message = Message::from_digest_slice(&digest)
            .map_err(|e| LedgerError::Crypto(format!("Failed to create message: {}", e)))?;

        // Using the context from the static Lazy
        let signature = SECP256K1_CONTEXT.sign_ecdsa_recoverable(&message, &self.secret_key);
        let (recovery_id, compact) = signature.serialize_compact();

        let mut raw = Vec::with_capacity(65);
        raw.push(recovery_id.to_i32() as u8);
        raw.extend_from_slice(&compact);
        Ok(BASE64.encode(raw))
    }
}
