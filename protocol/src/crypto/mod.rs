//! # Cryptographic Signing for AeroTrust
//!
//! Everything that touches private key material flows through this module.
//! The ledger network authenticates transactions with ECDSA over NIST P-256,
//! and its validators enforce two rules that make naive signing useless:
//!
//! - The `s` component must be in the lower half of the curve order
//!   (low-S canonical form). High-S signatures are semantically valid and
//!   syntactically rejected.
//! - The wire format is an ASN.1 DER SEQUENCE of the two integers, not a
//!   fixed-width concatenation.
//!
//! We use the RustCrypto stack (`p256`, `ecdsa`, `pkcs8`) — boring, audited,
//! and already speaking PKCS#8 PEM, which is how the membership service
//! hands out keys. No hand-rolled field arithmetic here, ever.

pub mod signing;

pub use signing::{parse_private_key, KeyParseError, PrivateKey, SignError, Signer};
