//! Cryptographic primitives for pvault.
//!
//! This module provides:
//! - Passphrase to AES-128 key derivation (`kdf`)
//! - AES-128-CBC encryption and decryption (`encryption`)

pub mod encryption;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt, generate_iv, IV_LEN};
pub use kdf::{derive_key, VaultKey, KEY_LEN};
