//! starledger - A minimal private append-only ledger
//!
//! A linked sequence of immutable, hash-verified blocks, each bound to its
//! predecessor, plus the proof-of-ownership workflow an external identity
//! goes through before a record is admitted. The process wrapper (HTTP,
//! CLI) is an external caller and lives outside this crate.
//!
//! # Architecture
//!
//! ## Core Ledger
//! - [`block`] - Block structure, digest computation, self-validation
//! - [`ledger`] - Chain sequence, admission, queries, anomaly scan,
//!   async facade with the ownership-proof workflow
//! - [`record`] - Payload tagged union carried in block bodies
//!
//! ## Cryptography
//! - [`crypto`] - SHA-256 digests, secp256k1 recoverable-signature
//!   ownership verification, key pairs
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod block;
pub mod ledger;
pub mod record;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
