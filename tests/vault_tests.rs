//! Integration tests for the pvault vault module.

use std::fs;
use std::sync::mpsc;
use std::time::Duration;

use pvault::errors::VaultError;
use pvault::vault::{OpenOptions, VaultStore};
use tempfile::TempDir;

/// Helper: a store rooted in a fresh temp dir.
fn store() -> (TempDir, VaultStore) {
    let dir = TempDir::new().expect("create temp dir");
    let store = VaultStore::new(dir.path().join("vaults")).expect("create store");
    (dir, store)
}

// ---------------------------------------------------------------------------
// Opening and creating
// ---------------------------------------------------------------------------

#[test]
fn opening_missing_vault_fails() {
    let (_dir, store) = store();

    let result = store.open("nope", b"password", OpenOptions::existing());
    match result {
        Err(VaultError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected not-found error, got {other:?}"),
    }
}

#[test]
fn create_writes_file_at_expected_path() {
    let (dir, store) = store();

    store
        .open("work", b"password", OpenOptions::create())
        .expect("create vault");

    assert!(dir.path().join("vaults").join("work.pv").is_file());
    assert!(store.exists("work"));
}

#[test]
fn reopen_created_vault_is_empty() {
    let (_dir, store) = store();
    store.open("work", b"password", OpenOptions::create()).unwrap();

    let vault = store.open("work", b"password", OpenOptions::existing()).unwrap();
    assert!(vault.keys().is_empty());
    assert!(vault.is_empty());
}

#[test]
fn wrong_password_fails_right_password_succeeds() {
    let (_dir, store) = store();
    store.open("work", b"password", OpenOptions::create()).unwrap();

    let result = store.open("work", b"bad_password", OpenOptions::existing());
    assert!(matches!(result, Err(VaultError::InvalidVault)));

    assert!(store.open("work", b"password", OpenOptions::existing()).is_ok());
}

#[test]
fn create_on_existing_vault_keeps_records() {
    let (_dir, store) = store();
    let mut vault = store.open("work", b"password", OpenOptions::create()).unwrap();
    vault.set("apikey", "foo").unwrap();

    let again = store.open("work", b"password", OpenOptions::create()).unwrap();
    assert_eq!(again.get("apikey"), Some("foo"));
}

#[test]
fn create_on_existing_vault_with_wrong_password_fails() {
    let (_dir, store) = store();
    store.open("work", b"password", OpenOptions::create()).unwrap();

    let result = store.open("work", b"other", OpenOptions::create());
    assert!(matches!(result, Err(VaultError::InvalidVault)));
}

// ---------------------------------------------------------------------------
// Record operations
// ---------------------------------------------------------------------------

#[test]
fn get_missing_key_returns_none() {
    let (_dir, store) = store();
    let vault = store.open("work", b"password", OpenOptions::create()).unwrap();

    assert_eq!(vault.get("i.dont.exist"), None);
}

#[test]
fn set_then_get_same_handle_and_fresh_handle() {
    let (_dir, store) = store();
    let mut vault = store.open("work", b"password", OpenOptions::create()).unwrap();

    vault.set("apikey", "foo").unwrap();
    assert_eq!(vault.get("apikey"), Some("foo"));

    let clone = store.open("work", b"password", OpenOptions::existing()).unwrap();
    assert_eq!(clone.get("apikey"), Some("foo"));
}

#[test]
fn unset_removes_value() {
    let (_dir, store) = store();
    let mut vault = store.open("work", b"password", OpenOptions::create()).unwrap();

    vault.set("foo", "bar").unwrap();
    assert_eq!(vault.get("foo"), Some("bar"));

    vault.unset("foo").unwrap();
    assert_eq!(vault.get("foo"), None);

    let reopened = store.open("work", b"password", OpenOptions::existing()).unwrap();
    assert_eq!(reopened.get("foo"), None);
}

#[test]
fn keys_are_listed_in_insertion_order() {
    let (_dir, store) = store();
    let mut vault = store.open("work", b"password", OpenOptions::create()).unwrap();

    vault.set("foo", "a").unwrap();
    vault.set("bar", "b").unwrap();
    assert_eq!(vault.keys(), ["foo", "bar"]);

    // Order survives a round-trip through the file.
    let reopened = store.open("work", b"password", OpenOptions::existing()).unwrap();
    assert_eq!(reopened.keys(), ["foo", "bar"]);
}

#[test]
fn created_at_survives_reopen() {
    let (_dir, store) = store();
    let mut vault = store.open("work", b"password", OpenOptions::create()).unwrap();
    let created = vault.created_at();
    vault.set("k", "v").unwrap();

    let reopened = store.open("work", b"password", OpenOptions::existing()).unwrap();
    assert_eq!(reopened.created_at(), created);
    assert!(reopened.updated_at() >= created);
}

// ---------------------------------------------------------------------------
// Non-blocking saves
// ---------------------------------------------------------------------------

#[test]
fn set_then_reports_completion() {
    let (_dir, store) = store();
    let mut vault = store.open("work", b"password", OpenOptions::create()).unwrap();

    let (tx, rx) = mpsc::channel();
    vault.set_then("apikey", "foo", move |result| {
        tx.send(result).unwrap();
    });

    let result = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("callback should run");
    assert!(result.is_ok());
    assert_eq!(vault.get("apikey"), Some("foo"));

    let clone = store.open("work", b"password", OpenOptions::existing()).unwrap();
    assert_eq!(clone.get("apikey"), Some("foo"));
}

#[test]
fn unset_then_reports_completion() {
    let (_dir, store) = store();
    let mut vault = store.open("work", b"password", OpenOptions::create()).unwrap();
    vault.set("foo", "bar").unwrap();

    let (tx, rx) = mpsc::channel();
    vault.unset_then("foo", move |result| {
        tx.send(result).unwrap();
    });

    assert!(rx.recv_timeout(Duration::from_secs(10)).unwrap().is_ok());
    let clone = store.open("work", b"password", OpenOptions::existing()).unwrap();
    assert_eq!(clone.get("foo"), None);
}

#[test]
fn save_then_reports_write_errors() {
    let (dir, store) = store();
    let mut vault = store.open("work", b"password", OpenOptions::create()).unwrap();

    // Replace the vault directory so the write target no longer exists.
    fs::remove_dir_all(dir.path().join("vaults")).unwrap();

    let (tx, rx) = mpsc::channel();
    vault.set_then("k", "v", move |result| {
        tx.send(result).unwrap();
    });

    let result = rx.recv_timeout(Duration::from_secs(10)).unwrap();
    assert!(matches!(result, Err(VaultError::Io(_))));
}

// ---------------------------------------------------------------------------
// File format and corruption
// ---------------------------------------------------------------------------

#[test]
fn every_save_uses_a_new_iv() {
    let (_dir, store) = store();
    let mut vault = store.open("work", b"password", OpenOptions::create()).unwrap();
    let path = vault.path().to_path_buf();

    vault.set("k", "v").unwrap();
    let first = fs::read_to_string(&path).unwrap();
    vault.set("k", "v").unwrap();
    let second = fs::read_to_string(&path).unwrap();

    let iv1 = first.split(':').next().unwrap();
    let iv2 = second.split(':').next().unwrap();
    assert_eq!(iv1.len(), 32);
    assert_ne!(iv1, iv2);
}

#[test]
fn corrupted_ciphertext_fails_to_open() {
    let (_dir, store) = store();
    let mut vault = store.open("work", b"password", OpenOptions::create()).unwrap();
    vault.set("apikey", "foo").unwrap();
    let path = vault.path().to_path_buf();
    drop(vault);

    // Flip one hex digit in the first ciphertext block.
    let contents = fs::read_to_string(&path).unwrap();
    let sep = contents.find(':').unwrap();
    let mut bytes = contents.into_bytes();
    let target = sep + 1;
    bytes[target] = if bytes[target] == b'0' { b'1' } else { b'0' };
    fs::write(&path, bytes).unwrap();

    let result = store.open("work", b"password", OpenOptions::existing());
    assert!(matches!(result, Err(VaultError::InvalidVault)));
}

#[test]
fn truncated_iv_fails_to_open() {
    let (_dir, store) = store();
    let vault = store.open("work", b"password", OpenOptions::create()).unwrap();
    let path = vault.path().to_path_buf();

    let contents = fs::read_to_string(&path).unwrap();
    fs::write(&path, &contents[4..]).unwrap();

    let result = store.open("work", b"password", OpenOptions::existing());
    assert!(matches!(result, Err(VaultError::InvalidVault)));
}

#[test]
fn garbage_file_fails_to_open() {
    let (_dir, store) = store();
    fs::write(store.vault_path("junk"), "this is not a vault").unwrap();

    let result = store.open("junk", b"password", OpenOptions::existing());
    assert!(matches!(result, Err(VaultError::InvalidVault)));
}

#[test]
fn list_vaults_sees_created_vaults() {
    let (_dir, store) = store();
    store.open("work", b"pw", OpenOptions::create()).unwrap();
    store.open("home", b"pw", OpenOptions::create()).unwrap();

    assert_eq!(store.list_vaults().unwrap(), ["home", "work"]);
}
