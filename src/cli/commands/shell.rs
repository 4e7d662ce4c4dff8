//! `pvault shell`: pick a vault, unlock it, and run the interactive shell.

use std::io;

use dialoguer::Select;

use crate::cli::{open_store, output, prompt_password, repl, validate_vault_name, Cli};
use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::{OpenOptions, Vault};

/// Execute the `shell` command.
pub fn execute(cli: &Cli, vault_name: Option<&str>) -> Result<()> {
    let (settings, store) = open_store(cli)?;

    let vaults = store.list_vaults()?;
    if vaults.is_empty() {
        output::tip("Run `pvault create <name>` to create a vault.");
        return Err(VaultError::NoVaultsFound(store.root().to_path_buf()));
    }

    let name = choose_vault(&settings, &vaults, vault_name)?;
    validate_vault_name(&name)?;

    let password = prompt_password()?;
    let mut vault = match store.open(&name, password.as_bytes(), OpenOptions::existing()) {
        Ok(vault) => vault,
        Err(VaultError::InvalidVault) => {
            return Err(VaultError::CommandFailed(
                "Opening vault failed. Please verify password".into(),
            ));
        }
        Err(e) => return Err(e),
    };

    output::success(&format!("Opened '{name}' ({} record(s))", vault.len()));
    run_shell(&mut vault)
}

/// Run the read-evaluate loop on stdin/stdout until `exit` or end of input.
pub fn run_shell(vault: &mut Vault) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    repl::run(vault, stdin.lock(), &mut stdout, &mut stderr)
}

/// Decide which vault to open.
///
/// An explicit name wins, then a configured `default_vault` that exists,
/// then the interactive selection menu.
fn choose_vault(settings: &Settings, vaults: &[String], explicit: Option<&str>) -> Result<String> {
    if let Some(name) = explicit {
        return Ok(name.to_string());
    }

    if let Some(default) = settings.default_vault.as_deref() {
        if vaults.iter().any(|v| v == default) {
            return Ok(default.to_string());
        }
        output::warning(&format!("Default vault '{default}' not found."));
    }

    let index = Select::new()
        .with_prompt("Select vault")
        .items(vaults)
        .default(0)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("vault selection: {e}")))?;

    Ok(vaults[index].clone())
}
