//! The wallet: typed identities over an untyped credential store.

use thiserror::Error;

use super::store::{CredentialStore, StoreError};
use crate::config::USER_IDENTITY_LABEL;
use crate::identity::{Identity, IdentityError};

/// Errors from wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The underlying store failed ([`StoreError::NotFound`] included).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An entry exists under the label but its bytes do not decode as an
    /// identity. Distinct from `NotFound`: the store has *something*, and
    /// that something is damaged.
    #[error("credential entry {label:?} is corrupt: {source}")]
    CorruptEntry {
        /// The label whose entry failed to decode.
        label: String,
        /// The decode failure.
        source: IdentityError,
    },

    /// Serializing an identity for storage failed.
    #[error("failed to serialize identity for storage: {0}")]
    Serialize(#[source] IdentityError),
}

/// A wallet of membership identities, keyed by label.
///
/// Wraps exactly one [`CredentialStore`]; all (de)serialization happens
/// here so stores only ever see opaque bytes.
///
/// # Construction is not pure
///
/// [`Wallet::new`] persists the given identity under the well-known
/// `user_identity` label *before* returning. Callers get a wallet that
/// already contains the signed-in credential — or an error and no wallet.
#[derive(Debug)]
pub struct Wallet<S: CredentialStore> {
    store: S,
}

impl<S: CredentialStore> Wallet<S> {
    /// Creates a wallet and immediately persists `identity` under
    /// [`USER_IDENTITY_LABEL`].
    pub fn new(identity: &Identity, store: S) -> Result<Self, WalletError> {
        let wallet = Self { store };
        wallet.put(USER_IDENTITY_LABEL, identity)?;
        Ok(wallet)
    }

    /// Wraps an existing store without writing anything — for resuming over
    /// a durable backend that already holds credentials.
    pub fn open(store: S) -> Self {
        Self { store }
    }

    /// Serializes `identity` and stores it under `label`, silently
    /// overwriting any previous entry.
    pub fn put(&self, label: &str, identity: &Identity) -> Result<(), WalletError> {
        let bytes = identity.serialize().map_err(WalletError::Serialize)?;
        self.store.put(label, &bytes)?;
        Ok(())
    }

    /// Fetches and decodes the identity under `label`.
    ///
    /// An absent label is `Store(NotFound)`; an entry that will not decode
    /// is [`WalletError::CorruptEntry`].
    pub fn get(&self, label: &str) -> Result<Identity, WalletError> {
        let bytes = self.store.get(label)?;
        Identity::deserialize(&bytes).map_err(|source| WalletError::CorruptEntry {
            label: label.to_string(),
            source,
        })
    }

    /// Removes the entry under `label`. Absent labels are a no-op.
    pub fn remove(&self, label: &str) -> Result<(), WalletError> {
        self.store.remove(label)?;
        Ok(())
    }

    /// Whether an entry exists under `label`.
    pub fn exists(&self, label: &str) -> bool {
        self.store.exists(label)
    }

    /// All labels currently stored.
    pub fn list(&self) -> Result<Vec<String>, WalletError> {
        Ok(self.store.list()?)
    }
}
