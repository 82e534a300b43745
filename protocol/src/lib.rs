// Copyright (c) 2026 AeroTrust Maintainers. MIT License.
// See LICENSE for details.

//! # AeroTrust Protocol — Core Library
//!
//! Client-side identity and signing for a permissioned compliance ledger.
//! A gateway process authenticates to the ledger network with an X.509
//! membership credential and signs transaction digests with the matching
//! ECDSA P-256 key. This crate is everything that has to be *right* for
//! that to work: the wallet, the identity encoding, and the signature
//! pipeline that validators will reject if we get a single bit wrong.
//!
//! ## Architecture
//!
//! - **identity** — X.509 membership credentials: construction, JSON wire
//!   encoding, raw credential export, and the inbound sign-in payload.
//! - **wallet** — Label-keyed credential storage behind a pluggable store
//!   trait. In-memory by default, file-backed when durability matters.
//! - **crypto** — The signing pipeline: PKCS#8 parsing, randomized ECDSA
//!   over caller-supplied digests, low-S canonicalization, DER output.
//! - **session** — The single process-wide identity binding and the
//!   replace-it-wholesale re-sign-in flow.
//! - **ledger** — The seam behind which the actual network client lives.
//! - **config** — Protocol constants and well-known labels.
//!
//! ## Design Philosophy
//!
//! 1. Malformed input fails loudly, early, and with a distinguishable error.
//! 2. Private key material is parsed once, held privately, and never logged.
//! 3. Every signature leaving this crate is canonical low-S DER — the
//!    network's malleability rules are not optional.
//! 4. No hashing here. Callers bring digests; we sign exactly what we get.

pub mod config;
pub mod crypto;
pub mod identity;
pub mod ledger;
pub mod session;
pub mod wallet;

pub use crypto::signing::{KeyParseError, SignError, Signer};
pub use identity::{EnrollmentError, EnrollmentRequest, Identity, IdentityError, X509Identity};
pub use ledger::{LedgerTransport, TransportConnector, TransportError};
pub use session::{Session, SessionError};
pub use wallet::{CredentialStore, FileStore, InMemoryStore, StoreError, Wallet, WalletError};
