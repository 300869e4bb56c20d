//! Ed25519 verification of incoming interaction requests.
//!
//! Discord signs `timestamp ‖ body` with the application's key and sends
//! the hex signature in `X-Signature-Ed25519` and the timestamp in
//! `X-Signature-Timestamp`. Requests that fail verification must be
//! rejected with `401`.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Header carrying the hex-encoded signature.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// Header carrying the signed timestamp.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("public key is not valid hex")]
    KeyEncoding(#[source] hex::FromHexError),

    #[error("public key must be 32 bytes")]
    KeyLength,

    #[error("public key is not a valid ed25519 point")]
    InvalidKey(#[source] ed25519_dalek::SignatureError),

    #[error("signature is not valid hex")]
    SignatureEncoding(#[source] hex::FromHexError),

    #[error("signature must be 64 bytes")]
    SignatureLength,

    #[error("signature does not match")]
    Mismatch,
}

/// Verifies request signatures against the application's public key.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    #[must_use]
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Build a verifier from the hex public key shown in the developer portal.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the key is not 32 bytes of valid hex
    /// or not a valid curve point.
    pub fn from_hex(public_key: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(public_key.trim()).map_err(SignatureError::KeyEncoding)?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SignatureError::KeyLength)?;
        let key = VerifyingKey::from_bytes(&bytes).map_err(SignatureError::InvalidKey)?;
        Ok(Self::new(key))
    }

    /// Check `signature_hex` over `timestamp ‖ body`.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the signature is malformed or does
    /// not match.
    pub fn verify(
        &self,
        signature_hex: &str,
        timestamp: &str,
        body: &[u8],
    ) -> Result<(), SignatureError> {
        let bytes = hex::decode(signature_hex).map_err(SignatureError::SignatureEncoding)?;
        let bytes: [u8; 64] = bytes
            .try_into()
            .map_err(|_| SignatureError::SignatureLength)?;
        let signature = Signature::from_bytes(&bytes);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key
            .verify(&message, &signature)
            .map_err(|_| SignatureError::Mismatch)
    }
}
