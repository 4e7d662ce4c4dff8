//! Vault module: encrypted key/value storage.
//!
//! This module provides:
//! - The decrypted `RecordSet` payload (`record`)
//! - The `<hex iv>:<hex ciphertext>` file format (`format`)
//! - `VaultStore` and `Vault` for opening and updating vaults (`store`)

pub mod format;
pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use record::RecordSet;
pub use store::{OpenOptions, Vault, VaultStore};
