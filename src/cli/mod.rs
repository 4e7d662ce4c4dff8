//! CLI module: Clap argument parser, prompts, output helpers, the
//! interactive shell, and command implementations.

pub mod commands;
pub mod output;
pub mod repl;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::VaultStore;

/// Environment variable consulted for the passphrase before prompting.
pub const PASSWORD_ENV: &str = "PVAULT_PASSWORD";

/// Longest accepted vault name.
const MAX_NAME_LEN: usize = 128;

/// pvault CLI: encrypted password vault.
#[derive(Parser)]
#[command(name = "pvault", about = "Encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: `vault_dir` from .pvault.toml, else the current directory)
    #[arg(long, global = true)]
    pub dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault
    Create {
        /// Vault name (stored as <name>.pv)
        name: String,
    },

    /// View and update vaults
    Shell {
        /// Open this vault instead of showing the selection menu
        #[arg(long)]
        vault: Option<String>,
    },

    /// List the vaults in the vault directory
    List,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings and open the vault directory for the current invocation.
pub fn open_store(cli: &Cli) -> Result<(Settings, VaultStore)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let store = VaultStore::new(settings.vault_root(&cwd, cli.dir.as_deref()))?;
    Ok((settings, store))
}

/// Get the passphrase for an existing vault, trying in order:
/// 1. `PVAULT_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Please enter password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase with confirmation (used by `create`).
///
/// Also respects `PVAULT_PASSWORD` for scripted usage.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let password = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt("Please create a password")
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
    );
    let confirmation = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt("Please confirm password")
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
    );

    if *password != *confirmation {
        return Err(VaultError::PasswordMismatch);
    }

    Ok(password)
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Validate that a vault name is safe to use as a file name.
///
/// Allowed: ASCII letters, digits, underscores, hyphens, periods.
/// Must be non-empty, must not start with a period, and is at most
/// 128 characters.
pub fn validate_vault_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(VaultError::InvalidVaultName(
            "vault name cannot be empty".into(),
        ));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(VaultError::InvalidVaultName(format!(
            "vault name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err(VaultError::InvalidVaultName(format!(
            "'{name}' contains invalid characters, only ASCII letters, digits, underscores, hyphens, and periods are allowed"
        )));
    }

    if name.starts_with('.') {
        return Err(VaultError::InvalidVaultName(format!(
            "'{name}' cannot start with a period"
        )));
    }

    Ok(())
}
