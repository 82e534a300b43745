//! # Wallet Module — Credential Storage
//!
//! A [`Wallet`] binds a label-keyed byte store to identity serialization.
//! The store itself is a trait, [`CredentialStore`], with two shipped
//! backends:
//!
//! ```text
//! store.rs   — CredentialStore trait, InMemoryStore, FileStore
//! wallet.rs  — Wallet: put/get/remove/exists/list over typed identities
//! ```
//!
//! The seam matters more than the backends. A secret-manager or
//! database-backed store is a drop-in `CredentialStore` implementation;
//! no wallet caller changes.

pub mod store;
pub mod wallet;

pub use store::{CredentialStore, FileStore, InMemoryStore, StoreError};
pub use wallet::{Wallet, WalletError};
