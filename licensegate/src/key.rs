//! Public key decoding.
//!
//! The LicenseGate dashboard hands out the account's RSA public key as PEM
//! text, but users paste it in every shape: with or without the
//! `BEGIN`/`END` lines, on one line, wrapped at 64 columns. Decoding strips
//! the delimiters and all whitespace, Base64-decodes the rest and parses the
//! bytes as an X.509 `SubjectPublicKeyInfo`. A bare PKCS#1 `RSAPublicKey`
//! body is accepted as a fallback.

use crate::error::{LicenseError, LicenseResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;

const PEM_DELIMITERS: [&str; 4] = [
    "-----BEGIN PUBLIC KEY-----",
    "-----END PUBLIC KEY-----",
    "-----BEGIN RSA PUBLIC KEY-----",
    "-----END RSA PUBLIC KEY-----",
];

/// An RSA public key used to check signed challenges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: RsaPublicKey,
}

impl PublicKey {
    /// Decodes a PEM or bare Base64 public key.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::KeyDecode`] if the text is not valid Base64 or
    /// the decoded bytes are not an RSA public key.
    pub fn from_pem(text: &str) -> LicenseResult<Self> {
        let der = decode_key_body(text)?;
        Self::from_der(&der)
    }

    /// Parses DER bytes, trying `SubjectPublicKeyInfo` first and PKCS#1 second.
    pub fn from_der(der: &[u8]) -> LicenseResult<Self> {
        let inner = RsaPublicKey::from_public_key_der(der)
            .or_else(|spki_err| {
                RsaPublicKey::from_pkcs1_der(der).map_err(|_| spki_err)
            })
            .map_err(|e| LicenseError::KeyDecode(format!("not an RSA public key: {e}")))?;
        Ok(Self { inner })
    }

    /// Returns the modulus size in bytes, which is also the signature length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.inner.size()
    }

    pub(crate) fn rsa(&self) -> &RsaPublicKey {
        &self.inner
    }
}

/// Strips PEM delimiters and whitespace, then Base64-decodes the remainder.
pub(crate) fn decode_key_body(text: &str) -> LicenseResult<Vec<u8>> {
    let mut body = text.to_string();
    for delimiter in PEM_DELIMITERS {
        body = body.replace(delimiter, "");
    }
    body.retain(|c| !c.is_whitespace());

    if body.is_empty() {
        return Err(LicenseError::KeyDecode("key text is empty".to_string()));
    }

    STANDARD
        .decode(body.as_bytes())
        .map_err(|e| LicenseError::KeyDecode(format!("invalid base64: {e}")))
}
