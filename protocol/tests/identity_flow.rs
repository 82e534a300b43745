//! End-to-end tests for the identity and signing stack.
//!
//! These exercise the full client flow: load a credential pair from disk,
//! store it in a wallet, retrieve it, build a signer, and produce a
//! canonical signature the ledger network would accept. Each test creates
//! its own temporary files and stores — no shared state, no ordering
//! dependencies.

use ecdsa::signature::hazmat::PrehashVerifier;
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::elliptic_curve::scalar::IsHigh;
use pkcs8::{EncodePrivateKey, LineEnding};
use rand::rngs::OsRng;
use std::path::PathBuf;
use tempfile::TempDir;

use aerotrust_protocol::config::USER_IDENTITY_LABEL;
use aerotrust_protocol::identity::{EnrollmentRequest, Identity, X509Identity};
use aerotrust_protocol::wallet::{FileStore, InMemoryStore, Wallet};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Writes a certificate/key file pair into a temp directory and returns
/// the paths plus the verifying key for the generated P-256 key.
fn write_credential_pair(dir: &TempDir) -> (PathBuf, PathBuf, VerifyingKey) {
    let key = SigningKey::random(&mut OsRng);
    let verifying_key = *key.verifying_key();
    let key_pem = key.to_pkcs8_pem(LineEnding::LF).unwrap().to_string();

    // The certificate is never cryptographically inspected by this stack,
    // so a placeholder PEM body is enough for the load path.
    let cert_pem = "-----BEGIN CERTIFICATE-----\nMIIBplaceholder\n-----END CERTIFICATE-----\n";

    let cert_path = dir.path().join("User1@org1-cert.pem");
    let key_path = dir.path().join("priv_sk");
    std::fs::write(&cert_path, cert_pem).unwrap();
    std::fs::write(&key_path, key_pem).unwrap();
    (cert_path, key_path, verifying_key)
}

// ---------------------------------------------------------------------------
// 1. The Full Client Flow
// ---------------------------------------------------------------------------

#[test]
fn load_store_retrieve_sign() {
    let dir = tempfile::tempdir().unwrap();
    let (cert_path, key_path, verifying_key) = write_credential_pair(&dir);

    // Load from disk for Org1MSP.
    let identity = X509Identity::from_files("Org1MSP", &cert_path, &key_path).unwrap();
    assert_eq!(identity.msp_id(), "Org1MSP");
    let identity = Identity::from(identity);

    // Wallet construction persists under the well-known label.
    let wallet = Wallet::new(&identity, InMemoryStore::new()).unwrap();
    assert!(wallet.exists(USER_IDENTITY_LABEL));

    // Retrieve and build the signer.
    let retrieved = wallet.get(USER_IDENTITY_LABEL).unwrap();
    assert_eq!(retrieved, identity);
    let signer = retrieved.signer().unwrap();

    // Sign the digest 0x00..01 (31 zero bytes, then 0x01).
    let mut digest = [0u8; 32];
    digest[31] = 0x01;
    let der = signer.sign(&digest).unwrap();

    // DER SEQUENCE, low-S, and verifiable against the paired public key.
    assert_eq!(der[0], 0x30);
    let signature = Signature::from_der(&der).unwrap();
    assert!(!bool::from(signature.s().is_high()));
    assert!(verifying_key.verify_prehash(&digest, &signature).is_ok());
}

// ---------------------------------------------------------------------------
// 2. Sign-in Payload to Wallet
// ---------------------------------------------------------------------------

#[test]
fn enrollment_payload_through_wallet() {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

    let key_pem = SigningKey::random(&mut OsRng)
        .to_pkcs8_pem(LineEnding::LF)
        .unwrap()
        .to_string();

    let request = EnrollmentRequest {
        certificate: BASE64.encode("CERT PEM"),
        private_key: BASE64.encode(&key_pem),
        msp_content: " Org2MSP ".to_string(),
    };

    let identity = Identity::from(request.into_identity().unwrap());
    assert_eq!(identity.msp_id(), "Org2MSP");

    let wallet = Wallet::new(&identity, InMemoryStore::new()).unwrap();
    let retrieved = wallet.get(USER_IDENTITY_LABEL).unwrap();
    assert!(retrieved.signer().is_ok());
}

#[test]
fn rejected_payload_leaves_no_trace() {
    // A payload with a non-base64 certificate must be rejected before
    // anything is stored.
    let request = EnrollmentRequest {
        certificate: "*** not base64 ***".to_string(),
        private_key: "also irrelevant".to_string(),
        msp_content: "Org1MSP".to_string(),
    };

    assert!(request.into_identity().is_err());
    // The decode failure happens before any wallet exists; an untouched
    // store stays empty.
    let store = InMemoryStore::new();
    let wallet = Wallet::open(store);
    assert!(wallet.list().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// 3. Durable Store Round-trip
// ---------------------------------------------------------------------------

#[test]
fn identity_survives_file_store_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let (cert_path, key_path, _) = write_credential_pair(&dir);
    let identity = Identity::from(
        X509Identity::from_files("Org1MSP", &cert_path, &key_path).unwrap(),
    );

    let store_dir = dir.path().join("wallet");
    {
        let wallet = Wallet::new(&identity, FileStore::open(&store_dir).unwrap()).unwrap();
        assert!(wallet.exists(USER_IDENTITY_LABEL));
    }

    // Reopen over the same directory; the credential is still there and
    // still usable for signing.
    let wallet = Wallet::open(FileStore::open(&store_dir).unwrap());
    let retrieved = wallet.get(USER_IDENTITY_LABEL).unwrap();
    assert_eq!(retrieved, identity);
    let signer = retrieved.signer().unwrap();
    assert!(signer.sign(&[0x42; 32]).is_ok());
}
