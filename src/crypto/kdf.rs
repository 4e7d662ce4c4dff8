//! Passphrase-based key derivation.
//!
//! The vault key is the first 16 bytes of `SHA-256(passphrase)`.  There is
//! no salt and no iteration count, so derivation is fast and fully
//! deterministic: the same passphrase always yields the same key.  This is
//! weak against offline guessing, but every existing `.pv` file depends on
//! it, so changing it would be a format break.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the derived key in bytes (128 bits, for AES-128).
pub const KEY_LEN: usize = 16;

/// A 16-byte vault key that zeroes its memory when dropped.
///
/// Each open vault owns exactly one of these; it is never persisted and
/// never shared between handles.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VaultKey(..)")
    }
}

/// Derive the vault key for `passphrase`.
pub fn derive_key(passphrase: &[u8]) -> VaultKey {
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&Sha256::digest(passphrase));

    let mut bytes = [0u8; KEY_LEN];
    bytes.copy_from_slice(&digest[..KEY_LEN]);
    digest.zeroize();

    VaultKey::new(bytes)
}
