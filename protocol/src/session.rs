//! # Session Re-binding
//!
//! One process, one signed-in identity. The [`Session`] owns that single
//! binding — identity, wallet, parsed signer, and the ledger transport —
//! and swaps it wholesale on re-sign-in.
//!
//! ## Replace order
//!
//! Re-binding always releases the old transport *before* constructing the
//! new chain. A failure mid-rebind therefore leaves the session unbound —
//! with no dangling handle to a half-dead channel — rather than bound to
//! something stale. Unbound-after-failure is a documented state, surfaced
//! as an error and repaired by the next successful sign-in.
//!
//! ## Locking
//!
//! Replace-vs-use is serialized by an explicit mutex. An in-flight sign
//! racing a re-sign-in either completes against the old binding or observes
//! the new (or unbound) state; it never sees a torn one.

use parking_lot::Mutex;
use thiserror::Error;

use crate::config::USER_IDENTITY_LABEL;
use crate::crypto::signing::{KeyParseError, SignError, Signer};
use crate::identity::Identity;
use crate::ledger::{LedgerTransport, TransportConnector, TransportError};
use crate::wallet::{InMemoryStore, Wallet, WalletError};

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No identity is currently bound; the caller must sign in first.
    #[error("no active identity bound to this session")]
    NoActiveIdentity,

    /// Persisting or re-reading the identity through the wallet failed.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// The identity's private key is unusable.
    #[error(transparent)]
    Key(#[from] KeyParseError),

    /// The ledger transport could not be established.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Signing a digest failed.
    #[error(transparent)]
    Sign(#[from] SignError),
}

/// Everything bound to the currently signed-in identity.
struct Binding<T> {
    wallet: Wallet<InMemoryStore>,
    identity: Identity,
    signer: Signer,
    transport: T,
}

/// The process-wide identity/transport binding.
///
/// Shared across request handlers; all state lives behind one mutex.
pub struct Session<C: TransportConnector> {
    connector: C,
    active: Mutex<Option<Binding<C::Transport>>>,
}

impl<C: TransportConnector> Session<C> {
    /// Creates an unbound session. Nothing can sign until the first
    /// [`rebind`](Self::rebind).
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            active: Mutex::new(None),
        }
    }

    /// Replaces the active binding with one built from `identity`.
    ///
    /// Sequence: release the old transport, persist the identity in a fresh
    /// wallet under [`USER_IDENTITY_LABEL`], read it back, parse its key
    /// into a signer, and connect a new transport. Any failure after the
    /// release step leaves the session unbound and returns the error.
    pub fn rebind(&self, identity: Identity) -> Result<(), SessionError> {
        let mut active = self.active.lock();

        if let Some(mut old) = active.take() {
            tracing::info!(msp_id = %old.identity.msp_id(), "releasing previous ledger binding");
            old.transport.close();
        }

        let result = self.build_binding(identity);
        match result {
            Ok(binding) => {
                tracing::info!(msp_id = %binding.identity.msp_id(), "session bound to new identity");
                *active = Some(binding);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "re-bind failed; session is now unbound");
                Err(e)
            }
        }
    }

    fn build_binding(&self, identity: Identity) -> Result<Binding<C::Transport>, SessionError> {
        let wallet = Wallet::new(&identity, InMemoryStore::new())?;
        let stored = wallet.get(USER_IDENTITY_LABEL)?;
        let signer = stored.signer()?;
        let transport = self.connector.connect(&stored, &signer)?;
        Ok(Binding {
            wallet,
            identity: stored,
            signer,
            transport,
        })
    }

    /// Signs `digest` with the active identity's key.
    pub fn sign(&self, digest: &[u8]) -> Result<Vec<u8>, SessionError> {
        let active = self.active.lock();
        let binding = active.as_ref().ok_or(SessionError::NoActiveIdentity)?;
        tracing::debug!(
            msp_id = %binding.identity.msp_id(),
            digest = %hex::encode(digest),
            "signing digest"
        );
        Ok(binding.signer.sign(digest)?)
    }

    /// The active identity's MSP ID, if bound.
    pub fn msp_id(&self) -> Option<String> {
        self.active
            .lock()
            .as_ref()
            .map(|b| b.identity.msp_id().to_string())
    }

    /// The active identity's raw credential blob, if bound.
    pub fn credential_bytes(&self) -> Option<Vec<u8>> {
        self.active
            .lock()
            .as_ref()
            .map(|b| b.identity.credential_bytes())
    }

    /// Labels present in the active binding's wallet, if bound.
    pub fn wallet_labels(&self) -> Result<Vec<String>, SessionError> {
        let active = self.active.lock();
        let binding = active.as_ref().ok_or(SessionError::NoActiveIdentity)?;
        Ok(binding.wallet.list()?)
    }

    /// Whether an identity is currently bound.
    pub fn is_bound(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Releases the active binding, if any. Used at shutdown.
    pub fn unbind(&self) {
        let mut active = self.active.lock();
        if let Some(mut old) = active.take() {
            tracing::info!(msp_id = %old.identity.msp_id(), "session unbound");
            old.transport.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::X509Identity;
    use p256::ecdsa::SigningKey;
    use pkcs8::{EncodePrivateKey, LineEnding};
    use rand::rngs::OsRng;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};

    type EventLog = Arc<StdMutex<Vec<String>>>;

    struct FakeTransport {
        log: EventLog,
        msp_id: String,
    }

    impl LedgerTransport for FakeTransport {
        fn close(&mut self) {
            self.log.lock().unwrap().push(format!("close:{}", self.msp_id));
        }
    }

    struct FakeConnector {
        log: EventLog,
        fail: AtomicBool,
    }

    impl FakeConnector {
        fn new(log: EventLog) -> Self {
            Self {
                log,
                fail: AtomicBool::new(false),
            }
        }
    }

    impl TransportConnector for FakeConnector {
        type Transport = FakeTransport;

        fn connect(
            &self,
            identity: &Identity,
            _signer: &Signer,
        ) -> Result<FakeTransport, TransportError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(TransportError::Connect("peer unreachable".into()));
            }
            self.log
                .lock()
                .unwrap()
                .push(format!("connect:{}", identity.msp_id()));
            Ok(FakeTransport {
                log: Arc::clone(&self.log),
                msp_id: identity.msp_id().to_string(),
            })
        }
    }

    fn test_identity(msp: &str) -> Identity {
        let key = SigningKey::random(&mut OsRng);
        let pem = key.to_pkcs8_pem(LineEnding::LF).unwrap().to_string();
        Identity::from(X509Identity::new(msp, "CERT PEM", pem))
    }

    fn new_session() -> (Session<FakeConnector>, EventLog) {
        let log: EventLog = Arc::default();
        let session = Session::new(FakeConnector::new(Arc::clone(&log)));
        (session, log)
    }

    #[test]
    fn unbound_session_cannot_sign() {
        let (session, _) = new_session();
        assert!(!session.is_bound());
        assert!(matches!(
            session.sign(&[0u8; 32]).unwrap_err(),
            SessionError::NoActiveIdentity
        ));
        assert_eq!(session.msp_id(), None);
    }

    #[test]
    fn rebind_installs_binding() {
        let (session, _) = new_session();
        session.rebind(test_identity("Org1MSP")).unwrap();

        assert!(session.is_bound());
        assert_eq!(session.msp_id().as_deref(), Some("Org1MSP"));
        assert!(session.sign(&[1u8; 32]).is_ok());
        assert_eq!(
            session.wallet_labels().unwrap(),
            vec![USER_IDENTITY_LABEL.to_string()]
        );
    }

    #[test]
    fn rebind_releases_old_transport_before_connecting_new() {
        let (session, log) = new_session();
        session.rebind(test_identity("Org1MSP")).unwrap();
        session.rebind(test_identity("Org2MSP")).unwrap();

        let events = log.lock().unwrap().clone();
        assert_eq!(
            events,
            vec!["connect:Org1MSP", "close:Org1MSP", "connect:Org2MSP"]
        );
    }

    #[test]
    fn failed_rebind_leaves_session_unbound() {
        let (session, log) = new_session();
        session.rebind(test_identity("Org1MSP")).unwrap();

        session.connector.fail.store(true, Ordering::SeqCst);
        let err = session.rebind(test_identity("Org2MSP")).unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));

        // Old transport was released, nothing new was installed.
        assert!(!session.is_bound());
        let events = log.lock().unwrap().clone();
        assert_eq!(events, vec!["connect:Org1MSP", "close:Org1MSP"]);

        // The next successful sign-in repairs the session.
        session.connector.fail.store(false, Ordering::SeqCst);
        session.rebind(test_identity("Org2MSP")).unwrap();
        assert_eq!(session.msp_id().as_deref(), Some("Org2MSP"));
    }

    #[test]
    fn unusable_key_fails_rebind_without_binding() {
        let (session, _) = new_session();
        let identity = Identity::from(X509Identity::new("Org1MSP", "CERT", "not a key"));
        assert!(matches!(
            session.rebind(identity).unwrap_err(),
            SessionError::Key(_)
        ));
        assert!(!session.is_bound());
    }

    #[test]
    fn unbind_releases_transport() {
        let (session, log) = new_session();
        session.rebind(test_identity("Org1MSP")).unwrap();
        session.unbind();
        assert!(!session.is_bound());
        assert!(log.lock().unwrap().contains(&"close:Org1MSP".to_string()));
    }

    #[test]
    fn credential_bytes_exports_active_identity() {
        let (session, _) = new_session();
        session.rebind(test_identity("Org1MSP")).unwrap();
        let blob = session.credential_bytes().unwrap();
        assert!(blob.starts_with(b"CERT PEM"));
    }
}
