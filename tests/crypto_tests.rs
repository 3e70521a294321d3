//! Integration tests for the credkeep crypto module.

use credkeep::crypto::keys::{derive_credential_key, derive_name_key};
use credkeep::crypto::{decrypt, encrypt, open, seal, CredentialCipher};
use credkeep::errors::CredentialError;

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = [0xABu8; 32];
    let plaintext = b"{\"type\":\"api\",\"value\":\"ghp_abc123\"}";

    let ciphertext = encrypt(&key, plaintext).expect("encrypt should succeed");

    // 12-byte nonce + 16-byte tag on top of the plaintext.
    assert_eq!(ciphertext.len(), plaintext.len() + 12 + 16);

    let recovered = decrypt(&key, &ciphertext).expect("decrypt should succeed");
    assert_eq!(recovered, plaintext);
}

#[test]
fn arbitrary_payloads_roundtrip_under_same_service_and_key() {
    let cipher = CredentialCipher::name_derived("cli");
    let payloads: [&[u8]; 4] = [b"", b"x", &[0u8, 255, 1, 254], &[0x42u8; 4096]];

    for payload in payloads {
        let sealed = cipher.seal("svc.token", payload).expect("seal");
        assert_eq!(cipher.open("svc.token", &sealed).expect("open"), payload);
    }
}

#[test]
fn encrypt_produces_different_ciphertext_each_time() {
    let key = [0xCDu8; 32];
    let ct1 = seal(&key, b"SECRET=hello").expect("seal 1");
    let ct2 = seal(&key, b"SECRET=hello").expect("seal 2");

    // Each call generates a new random nonce.
    assert_ne!(ct1, ct2);
}

#[test]
fn different_key_string_fails_with_decryption_failure() {
    let sealed = CredentialCipher::name_derived("cli")
        .seal("github.api_key", b"ghp_abc123")
        .expect("seal");

    let result = CredentialCipher::name_derived("cli").open("openai.api_key", &sealed);
    assert!(matches!(result, Err(CredentialError::DecryptionFailed)));
}

#[test]
fn different_service_fails_with_decryption_failure() {
    let sealed = CredentialCipher::name_derived("cli-a")
        .seal("k", b"v")
        .expect("seal");

    let result = CredentialCipher::name_derived("cli-b").open("k", &sealed);
    assert!(matches!(result, Err(CredentialError::DecryptionFailed)));
}

#[test]
fn corrupted_ciphertext_fails_auth_check() {
    let key = [0xBBu8; 32];
    let mut blob = encrypt(&key, b"VALUE=abc").expect("encrypt");
    if let Some(byte) = blob.get_mut(15) {
        *byte ^= 0xFF;
    }

    assert!(matches!(
        decrypt(&key, &blob),
        Err(CredentialError::DecryptionFailed)
    ));
}

#[test]
fn truncated_blob_fails() {
    let key = [0xAAu8; 32];
    assert!(matches!(
        open(&key, "AAAA"),
        Err(CredentialError::DecryptionFailed)
    ));
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn name_key_is_deterministic() {
    assert_eq!(*derive_name_key("cli", "k"), *derive_name_key("cli", "k"));
    assert_ne!(*derive_name_key("cli", "k1"), *derive_name_key("cli", "k2"));
}

#[test]
fn hkdf_binds_service_and_key() {
    let master = [0x11u8; 32];
    let a = derive_credential_key(&master, "cli", "k").unwrap();
    let b = derive_credential_key(&master, "cli", "k").unwrap();
    let c = derive_credential_key(&master, "other", "k").unwrap();
    let d = derive_credential_key(&master, "cli", "k2").unwrap();

    assert_eq!(*a, *b);
    assert_ne!(*a, *c);
    assert_ne!(*a, *d);
}

#[test]
fn hkdf_differs_per_master_key() {
    let a = derive_credential_key(&[1u8; 32], "cli", "k").unwrap();
    let b = derive_credential_key(&[2u8; 32], "cli", "k").unwrap();
    assert_ne!(*a, *b);
}
