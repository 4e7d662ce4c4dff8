//! `pvault list`: list the vaults in the vault directory.

use chrono::{DateTime, Utc};

use crate::cli::{open_store, output, Cli};
use crate::errors::Result;
use crate::vault::VaultStore;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_, store) = open_store(cli)?;
    let vaults = vault_infos(&store)?;

    if vaults.is_empty() {
        output::info(&format!("No vaults found in {}", store.root().display()));
        output::tip("Run `pvault create <name>` to create your first vault.");
        return Ok(());
    }

    output::info(&format!("{} vault(s) found:", vaults.len()));
    output::print_vaults_table(&vaults);

    Ok(())
}

/// File-level information about one vault.  Reading it needs no passphrase.
pub struct VaultInfo {
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Collect name, size and modification time for every vault in `store`.
pub fn vault_infos(store: &VaultStore) -> Result<Vec<VaultInfo>> {
    let mut infos = Vec::new();

    for name in store.list_vaults()? {
        let meta = std::fs::metadata(store.vault_path(&name))?;
        infos.push(VaultInfo {
            size: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
            name,
        });
    }

    Ok(infos)
}
