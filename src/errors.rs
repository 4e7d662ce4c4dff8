use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in pvault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Vault errors ---
    /// The file could not be read back to a well-formed record set under
    /// the derived key.  Wrong passphrase and corrupted data are
    /// deliberately reported the same way.
    #[error("Invalid vault file")]
    InvalidVault,

    #[error("A vault with the same name already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("No vaults found in {0}")]
    NoVaultsFound(PathBuf),

    #[error("Invalid vault name: {0}")]
    InvalidVaultName(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Passwords don't match")]
    PasswordMismatch,
}

/// Convenience type alias for pvault results.
pub type Result<T> = std::result::Result<T, VaultError>;
