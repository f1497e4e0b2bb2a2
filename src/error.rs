//! Error types for starledger

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Block body bytes did not decode to a known payload shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Block body decoded to an empty value.
    #[error("Empty block payload")]
    EmptyPayload,

    /// Challenge message is not of the form `<address>:<timestamp>:<tag>`.
    #[error("Malformed challenge message: {0}")]
    MalformedChallenge(String),

    /// Submission arrived after the challenge window closed.
    #[error("Challenge expired {elapsed_secs}s after issuance (window is {window_secs}s)")]
    ExpiredChallenge {
        elapsed_secs: u64,
        window_secs: u64,
    },

    /// Signature does not verify for the claimed address.
    #[error("Signature is not valid for the claimed address")]
    InvalidSignature,

    /// Internal invariant violation during admission. Not retryable.
    #[error("Admission error: {0}")]
    Admission(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
