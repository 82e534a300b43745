//! # Ledger Transport Seam
//!
//! The network client that actually submits and evaluates transactions is
//! not this crate's business. What is this crate's business: the session
//! layer must be able to tear a transport down and build a fresh one bound
//! to a new identity, without knowing what a transport *is*. These two
//! traits are that seam.
//!
//! A production connector dials the peer for the signed-in organization and
//! hands the network client the identity's credential blob plus the signing
//! closure. Tests plug in recording fakes.

use thiserror::Error;

use crate::crypto::signing::Signer;
use crate::identity::Identity;

/// Errors establishing a ledger transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connector's configuration is unusable (unknown peer, unreadable
    /// TLS material, malformed endpoint).
    #[error("transport configuration error: {0}")]
    Configuration(String),

    /// The connection attempt itself failed.
    #[error("failed to establish ledger channel: {0}")]
    Connect(String),
}

/// A live channel to the ledger network, bound to one identity.
///
/// The only operation the session layer needs is release. Everything else
/// a transport can do (submit, evaluate, event streams) belongs to the
/// network client built on top of it.
pub trait LedgerTransport: Send {
    /// Closes the channel and releases its resources. Must be safe to call
    /// exactly once; the session layer drops the transport afterwards.
    fn close(&mut self);
}

/// Builds [`LedgerTransport`] values bound to an identity and its signer.
pub trait TransportConnector: Send + Sync {
    /// The transport type this connector produces.
    type Transport: LedgerTransport;

    /// Establishes a new channel authenticated as `identity`, signing with
    /// `signer`.
    fn connect(
        &self,
        identity: &Identity,
        signer: &Signer,
    ) -> Result<Self::Transport, TransportError>;
}
