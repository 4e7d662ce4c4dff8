//! `pvault create`: create a new vault and open the shell on it.

use tracing::debug;

use crate::cli::{open_store, output, prompt_new_password, validate_vault_name, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::OpenOptions;

/// Execute the `create` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    validate_vault_name(name)?;
    let (_, store) = open_store(cli)?;

    // The store opens an existing file on create, so refuse here instead.
    if store.exists(name) {
        return Err(VaultError::VaultAlreadyExists(store.vault_path(name)));
    }

    let password = prompt_new_password()?;
    let mut vault = store.open(name, password.as_bytes(), OpenOptions::create())?;
    debug!(name, "vault created from cli");

    output::success(&format!(
        "Vault '{name}' created at {}",
        vault.path().display()
    ));
    output::tip("Commands: set <key> <value>, unset <key>, get <key>, dump, exit");

    super::shell::run_shell(&mut vault)
}
