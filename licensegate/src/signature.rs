//! Signed challenge verification (SHA-256 with RSA PKCS#1 v1.5).
//!
//! This is the only trust boundary in the client: a passing check proves the
//! party that answered the request holds the private key matching the
//! configured public key.

use crate::error::{LicenseError, LicenseResult};
use crate::key::PublicKey;
use base64::{engine::general_purpose::STANDARD, Engine};
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use sha2::Sha256;

/// Verifies `signed_challenge_b64` over the exact bytes of `challenge`.
///
/// # Errors
///
/// Returns [`LicenseError::Signature`] if the signature is not valid Base64,
/// has the wrong length for the key, or does not verify.
pub fn verify_signature(
    public_key: &PublicKey,
    challenge: &str,
    signed_challenge_b64: &str,
) -> LicenseResult<()> {
    let sig_bytes = STANDARD
        .decode(signed_challenge_b64.trim())
        .map_err(|e| LicenseError::Signature(format!("invalid signature base64: {e}")))?;

    if sig_bytes.len() != public_key.size() {
        return Err(LicenseError::Signature(format!(
            "signature is {} bytes, key expects {}",
            sig_bytes.len(),
            public_key.size()
        )));
    }

    let signature = Signature::try_from(sig_bytes.as_slice())
        .map_err(|e| LicenseError::Signature(format!("malformed signature: {e}")))?;

    VerifyingKey::<Sha256>::new(public_key.rsa().clone())
        .verify(challenge.as_bytes(), &signature)
        .map_err(|_| LicenseError::Signature("signature does not match challenge".to_string()))
}

/// Boolean form of [`verify_signature`]. Every failure is `false`.
#[must_use]
pub fn verify_challenge(public_key: &PublicKey, challenge: &str, signed_challenge_b64: &str) -> bool {
    verify_signature(public_key, challenge, signed_challenge_b64).is_ok()
}
