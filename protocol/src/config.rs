//! # Protocol Configuration & Constants
//!
//! Shared constants for the AeroTrust ledger client. Anything two modules
//! (or the gateway binary) need to agree on lives here, not inline at the
//! call sites.

// ---------------------------------------------------------------------------
// Wallet
// ---------------------------------------------------------------------------

/// Well-known wallet label for the active user identity.
///
/// The gateway runs with a single signed-in credential at a time, stored
/// under this label. Re-sign-in overwrites the entry wholesale.
pub const USER_IDENTITY_LABEL: &str = "user_identity";

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// The signature scheme the ledger network's validators accept.
/// PKCS#8 keys carrying any other algorithm are rejected at parse time.
pub const SIGNING_ALGORITHM: &str = "ECDSA-P256";

/// Digest length callers are expected to supply, in bytes. The signing
/// pipeline does not hash — a SHA-256 digest is the dominant input.
pub const DIGEST_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Ledger Addressing Defaults
// ---------------------------------------------------------------------------

/// Default channel the gateway submits transactions on.
pub const DEFAULT_CHANNEL_ID: &str = "channel1";

/// Default chaincode (smart contract) name on that channel.
pub const DEFAULT_CHAINCODE_ID: &str = "basic";

// ---------------------------------------------------------------------------
// Gateway Defaults
// ---------------------------------------------------------------------------

/// Default HTTP API port for the gateway binary.
pub const DEFAULT_API_PORT: u16 = 8080;

/// Default Prometheus metrics port for the gateway binary.
pub const DEFAULT_METRICS_PORT: u16 = 8081;

/// Default endpoint of the org1 peer.
pub const DEFAULT_ORG1_PEER: &str = "localhost:7051";

/// Default endpoint of the org2 peer.
pub const DEFAULT_ORG2_PEER: &str = "localhost:9051";
