//! Text vault file format.
//!
//! A `.pv` file is a single line of UTF-8 text:
//!
//! ```text
//! <hex(iv)>:<hex(ciphertext)>
//! ```
//!
//! - **IV**: 16 random bytes, regenerated on every save.
//! - **Ciphertext**: AES-128-CBC/PKCS#7 encryption of the record set JSON
//!   under the vault key.
//!
//! Nothing here authenticates the ciphertext.  Integrity rests on the
//! padding check and the structural validation of the decrypted JSON, and
//! every failure along that path is reported as `InvalidVault`.

use std::fs;
use std::path::Path;

use crate::crypto::encryption::{decrypt, encrypt, generate_iv, IV_LEN};
use crate::crypto::kdf::VaultKey;
use crate::errors::{Result, VaultError};

use super::record::RecordSet;

/// Separator between the hex IV and the hex ciphertext.
pub const SEPARATOR: char = ':';

/// File extension of vault files (without the dot).
pub const EXTENSION: &str = "pv";

/// Encrypt `records` under a fresh IV and encode the result as vault text.
pub fn seal(key: &VaultKey, records: &RecordSet) -> Result<String> {
    let json = records.to_json()?;
    let iv = generate_iv();
    let ciphertext = encrypt(key, &iv, json.as_bytes());

    Ok(format!(
        "{}{SEPARATOR}{}",
        hex::encode(iv),
        hex::encode(ciphertext)
    ))
}

/// Decode vault text, decrypt it, and validate the record set.
pub fn unseal(key: &VaultKey, contents: &str) -> Result<RecordSet> {
    let (iv_hex, ciphertext_hex) = contents
        .trim()
        .split_once(SEPARATOR)
        .ok_or(VaultError::InvalidVault)?;

    let iv: [u8; IV_LEN] = hex::decode(iv_hex)
        .ok()
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(VaultError::InvalidVault)?;
    let ciphertext = hex::decode(ciphertext_hex).map_err(|_| VaultError::InvalidVault)?;

    let plaintext = decrypt(key, &iv, &ciphertext)?;
    RecordSet::from_json(&plaintext)
}

/// Read the raw text of a vault file.
///
/// Filesystem errors (missing file, permissions) propagate unchanged.
pub fn read_vault(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| VaultError::InvalidVault)
}

/// Overwrite the vault file at `path` with `contents`.
///
/// The write happens in place.  A crash part-way through can leave a
/// truncated file behind, which will then fail to open as `InvalidVault`.
pub fn write_vault(path: &Path, contents: &str) -> Result<()> {
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
    }

    #[cfg(not(unix))]
    fs::write(path, contents)?;

    Ok(())
}
