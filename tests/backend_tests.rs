//! Integration tests for the two storage backends.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::sync::Arc;

use chrono::Utc;
use credkeep::credential::{
    file_name_for, Credential, CredentialManager, CredentialType, FileBackend, MemorySecretStore,
    SecretStore, SecureStoreBackend, StorageBackend,
};
use credkeep::crypto::CredentialCipher;
use credkeep::errors::CredentialError;
use tempfile::TempDir;

fn sample(value: &str) -> Credential {
    Credential::new(
        CredentialType::Api,
        "sample",
        value,
        BTreeMap::new(),
        Utc::now(),
    )
}

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

#[test]
fn fresh_directory_lists_empty() {
    let tmp = TempDir::new().unwrap();
    let backend = FileBackend::new(tmp.path().join("new-dir"), None).unwrap();
    assert!(backend.list().unwrap().is_empty());
}

#[test]
fn directory_is_created_on_open() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("a").join("b");
    FileBackend::new(&dir, None).unwrap();
    assert!(dir.is_dir());
}

#[test]
fn filenames_never_contain_separators() {
    let keys = [
        "plain",
        "github/api_key",
        "C:\\creds\\token",
        "https://api.example.com",
        "mcp:server/one",
        "a/b",
        "a\\c",
        "a:d",
    ];

    let mut seen = HashSet::new();
    for key in keys {
        let name = file_name_for(key);
        assert!(!name.contains(['/', '\\', ':']), "{name} contains a separator");
        assert!(name.ends_with(".cred"));
        assert!(seen.insert(name), "collision for {key}");
    }
}

#[test]
fn key_with_separators_stays_inside_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("creds");
    let backend = FileBackend::new(&dir, None).unwrap();

    backend.store("../escape/attempt", &sample("v")).unwrap();

    assert!(dir.join(".._escape_attempt.cred").exists());
    assert!(!tmp.path().join("escape").exists());
    assert_eq!(backend.retrieve("../escape/attempt").unwrap().value, "v");

    // Listing recovers the sanitized key, not the original.
    assert_eq!(backend.list().unwrap(), vec![".._escape_attempt".to_string()]);
}

#[test]
fn list_ignores_foreign_and_hidden_files() {
    let tmp = TempDir::new().unwrap();
    let backend = FileBackend::new(tmp.path(), None).unwrap();
    backend.store("svc.token", &sample("v")).unwrap();

    fs::write(tmp.path().join("README.txt"), "hello").unwrap();
    fs::write(tmp.path().join(".svc.token.cred.tmp"), "partial").unwrap();
    fs::write(tmp.path().join(".master.key"), [0u8; 32]).unwrap();
    fs::create_dir(tmp.path().join("sub.cred")).unwrap();

    assert_eq!(backend.list().unwrap(), vec!["svc.token".to_string()]);
}

#[test]
fn store_overwrites_atomically() {
    let tmp = TempDir::new().unwrap();
    let backend = FileBackend::new(tmp.path(), None).unwrap();

    backend.store("k", &sample("first")).unwrap();
    backend.store("k", &sample("second")).unwrap();

    assert_eq!(backend.retrieve("k").unwrap().value, "second");
    let leftovers: Vec<_> = fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn concurrent_stores_to_one_key_leave_a_whole_record() {
    let tmp = TempDir::new().unwrap();
    let backend = FileBackend::new(tmp.path(), Some(CredentialCipher::name_derived("cli"))).unwrap();
    let values: Vec<String> = (0..4).map(|i| format!("writer-{i}-{}", "x".repeat(4096))).collect();

    for _ in 0..20 {
        std::thread::scope(|scope| {
            for value in &values {
                let backend = &backend;
                scope.spawn(move || {
                    for _ in 0..10 {
                        backend.store("k", &sample(value)).unwrap();
                    }
                });
            }
        });

        // Last writer wins; the record always decrypts to one writer's value.
        let stored = backend.retrieve("k").unwrap();
        assert!(values.contains(&stored.value));
    }

    assert_eq!(backend.list().unwrap(), vec!["k".to_string()]);
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
}

#[test]
fn plaintext_file_has_documented_fields() {
    let tmp = TempDir::new().unwrap();
    let backend = FileBackend::new(tmp.path(), None).unwrap();
    backend.store("k", &sample("v")).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("k.cred")).unwrap()).unwrap();
    for field in [
        "type",
        "value",
        "metadata",
        "created_at",
        "updated_at",
        "expires_at",
        "encrypted",
        "description",
    ] {
        assert!(json.get(field).is_some(), "missing field {field}");
    }
}

#[cfg(unix)]
#[test]
fn credential_files_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("creds");
    let backend = FileBackend::new(&dir, None).unwrap();
    backend.store("k", &sample("v")).unwrap();

    let mode = fs::metadata(dir.join("k.cred")).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    let dir_mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
    assert_eq!(dir_mode, 0o700);
}

// ---------------------------------------------------------------------------
// Secure-store backend
// ---------------------------------------------------------------------------

fn secure_manager() -> (Arc<MemorySecretStore>, CredentialManager) {
    let store = Arc::new(MemorySecretStore::new());
    let backend = SecureStoreBackend::new("cli", store.clone());
    (store, CredentialManager::new("cli", Box::new(backend)))
}

#[test]
fn secure_store_round_trip_through_manager() {
    let (store, m) = secure_manager();

    m.store(CredentialType::Github, "github.token", "ghp_x", BTreeMap::new())
        .unwrap();

    let raw = store.get("cli", "github.token").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["type"], "github");

    let cred = m.retrieve("github.token").unwrap();
    assert_eq!(cred.value, "ghp_x");
    assert!(!cred.encrypted);
}

#[test]
fn secure_store_list_and_clear_are_unsupported() {
    let (_store, m) = secure_manager();
    m.store(CredentialType::Api, "k", "v", BTreeMap::new()).unwrap();

    for result in [m.list().map(|_| ()), m.clear()] {
        let err = result.unwrap_err();
        assert!(matches!(
            err.root(),
            CredentialError::UnsupportedOperation { backend: "keyring", .. }
        ));
    }

    // Maintenance needs enumeration too.
    assert!(m.cleanup_expired_credentials().is_err());
    assert!(m.validate_credentials().is_err());
    assert!(m.status().is_err());
}

#[test]
fn secure_store_delete_reports_missing_entry() {
    let (_store, m) = secure_manager();
    assert!(matches!(
        m.delete("missing"),
        Err(CredentialError::NotFound(_))
    ));

    m.store(CredentialType::Api, "k", "v", BTreeMap::new()).unwrap();
    m.delete("k").unwrap();
    assert!(matches!(m.retrieve("k"), Err(CredentialError::NotFound(_))));
}

#[test]
fn secure_store_corrupt_entry_is_a_serialization_error() {
    let (store, m) = secure_manager();
    store.set("cli", "k", "not json").unwrap();

    let err = m.retrieve("k").unwrap_err();
    assert!(matches!(err.root(), CredentialError::Serialization(_)));
}

#[cfg(feature = "keyring-store")]
#[test]
#[ignore] // Requires an unlocked OS keyring
fn os_keyring_round_trip() {
    use credkeep::credential::OsKeyring;

    let m = CredentialManager::new(
        "credkeep-test",
        Box::new(SecureStoreBackend::new("credkeep-test", OsKeyring)),
    );
    m.store(CredentialType::Api, "roundtrip", "v", BTreeMap::new())
        .unwrap();
    assert_eq!(m.retrieve_value("roundtrip").unwrap(), "v");
    m.delete("roundtrip").unwrap();
}
