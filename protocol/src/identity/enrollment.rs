//! The inbound sign-in payload.
//!
//! A client signs in by POSTing base64-encoded credential material. This
//! module owns the decode step: both base64 fields must decode to UTF-8
//! text and the MSP string is whitespace-trimmed. Decoding happens *before*
//! any wallet or session mutation — a payload that fails here leaves the
//! process exactly as it was.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::x509::X509Identity;

/// Errors decoding a sign-in payload.
///
/// All of these are client errors: the request is rejected and nothing
/// process-wide changes.
#[derive(Debug, Error)]
pub enum EnrollmentError {
    /// The `certificate` field is not valid base64.
    #[error("certificate field is not valid base64: {0}")]
    CertificateEncoding(#[source] base64::DecodeError),

    /// The `privateKey` field is not valid base64.
    #[error("privateKey field is not valid base64: {0}")]
    PrivateKeyEncoding(#[source] base64::DecodeError),

    /// A decoded field is not UTF-8 text. PEM is text; binary here means
    /// the client encoded the wrong thing.
    #[error("decoded {field} is not UTF-8 text")]
    NotText {
        /// Which payload field decoded to non-text bytes.
        field: &'static str,
    },

    /// The MSP field is empty after trimming.
    #[error("mspContent must not be empty")]
    EmptyMsp,
}

/// The sign-in request body.
///
/// Field names match the HTTP wire format the frontend sends; serde
/// enforces presence of all three.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    /// Base64-encoded PEM certificate.
    pub certificate: String,

    /// Base64-encoded PEM private key.
    #[serde(rename = "privateKey")]
    pub private_key: String,

    /// Membership service provider ID. Surrounding whitespace is ignored.
    #[serde(rename = "mspContent")]
    pub msp_content: String,
}

impl EnrollmentRequest {
    /// Decodes the payload into an [`X509Identity`].
    ///
    /// Either base64 field failing to decode rejects the whole payload;
    /// partial decoding never escapes this function. The key itself is not
    /// parsed here — that happens at signer construction.
    pub fn into_identity(self) -> Result<X509Identity, EnrollmentError> {
        let msp_id = self.msp_content.trim();
        if msp_id.is_empty() {
            return Err(EnrollmentError::EmptyMsp);
        }

        let certificate = BASE64
            .decode(self.certificate.as_bytes())
            .map_err(EnrollmentError::CertificateEncoding)?;
        let private_key = BASE64
            .decode(self.private_key.as_bytes())
            .map_err(EnrollmentError::PrivateKeyEncoding)?;

        let certificate = String::from_utf8(certificate)
            .map_err(|_| EnrollmentError::NotText { field: "certificate" })?;
        let private_key = String::from_utf8(private_key)
            .map_err(|_| EnrollmentError::NotText { field: "privateKey" })?;

        Ok(X509Identity::new(msp_id, certificate, private_key))
    }
}
