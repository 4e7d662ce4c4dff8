//! AES-128-CBC encryption with PKCS#7 padding.
//!
//! The IV is not embedded in the returned ciphertext; the vault format
//! stores it separately (see `vault::format`).  Callers must use a fresh
//! IV from `generate_iv` for every encryption.

use aes::Aes128;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::generic_array::GenericArray;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;

use crate::errors::{Result, VaultError};

use super::kdf::VaultKey;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Size of the AES block, and therefore of the IV, in bytes.
pub const IV_LEN: usize = 16;

/// Generate a cryptographically random 16-byte IV.
pub fn generate_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut iv);
    iv
}

/// Encrypt `plaintext` under `key` and `iv`.
///
/// The output is always a non-empty multiple of the block size.
pub fn encrypt(key: &VaultKey, iv: &[u8; IV_LEN], plaintext: &[u8]) -> Vec<u8> {
    Aes128CbcEnc::new(GenericArray::from_slice(key.as_bytes()), GenericArray::from_slice(iv))
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypt `ciphertext` produced by `encrypt`.
///
/// A wrong key almost always surfaces here as a padding error.  Every
/// failure maps to `InvalidVault`.
pub fn decrypt(key: &VaultKey, iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
    Aes128CbcDec::new(GenericArray::from_slice(key.as_bytes()), GenericArray::from_slice(iv))
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| VaultError::InvalidVault)
}
