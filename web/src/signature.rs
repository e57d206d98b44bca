//! Dispatcher callback signature verification.
//!
//! The delay-queue provider signs every callback with an HS256 JWT carried
//! in the `Upstash-Signature` header. The token's `body` claim holds the
//! URL-safe base64 of the SHA-256 of the raw request body. Verification
//! tries the current signing key first and falls back to the next key, so
//! key rotation never drops deliveries.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use constant_time_eq::constant_time_eq;
use dripsend_core::{Result, SendError};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Claims the provider embeds in a callback signature.
#[derive(Debug, Deserialize)]
struct SignatureClaims {
    /// URL-safe base64 of the SHA-256 of the raw request body.
    body: String,

    /// Expiry, validated by the JWT library.
    #[allow(dead_code)]
    exp: usize,
}

/// Verifies dispatcher callback signatures.
///
/// # Examples
///
/// ```
/// use dripsend_web::SignatureVerifier;
///
/// let verifier = SignatureVerifier::new(
///     "current-signing-key".to_string(),
///     Some("next-signing-key".to_string()),
/// );
/// assert!(verifier.verify("not-a-jwt", b"{}").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    keys: Vec<String>,
}

impl SignatureVerifier {
    /// Create a verifier over the current and (optional) next signing key.
    #[must_use]
    pub fn new(current_key: String, next_key: Option<String>) -> Self {
        let mut keys = vec![current_key];
        keys.extend(next_key);

        Self { keys }
    }

    /// Verify a callback signature against the raw request body.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::InvalidSignature`] when the token does not
    /// verify under any signing key or its body claim does not match the
    /// delivered body.
    pub fn verify(&self, signature: &str, body: &[u8]) -> Result<()> {
        let expected_hash = URL_SAFE_NO_PAD.encode(Sha256::digest(body));
        let validation = Validation::new(Algorithm::HS256);

        for key in &self.keys {
            let Ok(token) = decode::<SignatureClaims>(
                signature,
                &DecodingKey::from_secret(key.as_bytes()),
                &validation,
            ) else {
                continue;
            };

            // The signature is authentic under this key; the body claim must
            // still match what was actually delivered.
            if constant_time_eq(token.claims.body.as_bytes(), expected_hash.as_bytes()) {
                return Ok(());
            }

            return Err(SendError::InvalidSignature(
                "body hash mismatch".to_string(),
            ));
        }

        Err(SendError::InvalidSignature(
            "no signing key verified the token".to_string(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        body: String,
        exp: usize,
    }

    fn sign(key: &str, body: &[u8]) -> String {
        let claims = TestClaims {
            body: URL_SAFE_NO_PAD.encode(Sha256::digest(body)),
            exp: usize::try_from(chrono::Utc::now().timestamp()).unwrap() + 300,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_signature_with_current_key() {
        let verifier = SignatureVerifier::new("current".to_string(), Some("next".to_string()));
        let body = br#"{"to":"dev@example.com"}"#;

        assert!(verifier.verify(&sign("current", body), body).is_ok());
    }

    #[test]
    fn test_valid_signature_with_next_key() {
        let verifier = SignatureVerifier::new("current".to_string(), Some("next".to_string()));
        let body = br#"{"to":"dev@example.com"}"#;

        assert!(verifier.verify(&sign("next", body), body).is_ok());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let verifier = SignatureVerifier::new("current".to_string(), None);
        let body = b"{}";

        let err = verifier.verify(&sign("rogue", body), body).unwrap_err();
        assert!(matches!(err, SendError::InvalidSignature(_)));
    }

    #[test]
    fn test_tampered_body_is_rejected() {
        let verifier = SignatureVerifier::new("current".to_string(), None);
        let signature = sign("current", b"original body");

        let err = verifier.verify(&signature, b"tampered body").unwrap_err();
        assert_eq!(
            err,
            SendError::InvalidSignature("body hash mismatch".to_string())
        );
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let verifier = SignatureVerifier::new("current".to_string(), None);
        assert!(verifier.verify("not-a-jwt", b"{}").is_err());
    }
}
