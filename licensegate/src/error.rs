//! Error types for the verification client.

use crate::outcome::VerificationOutcome;
use thiserror::Error;

/// Verification client errors.
///
/// None of these escape a `verify` call: the client folds each one into a
/// [`VerificationOutcome`] via [`LicenseError::outcome`].
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The configured public key is not valid Base64 or not an RSA public key.
    #[error("invalid public key: {0}")]
    KeyDecode(String),

    /// The signed challenge could not be decoded or did not verify.
    #[error("challenge signature invalid: {0}")]
    Signature(String),

    /// Challenge mode is enabled but the server sent no signed challenge.
    #[error("response carries no signed challenge")]
    MissingSignature,

    /// Network-level failure (unreachable host, timeout, broken body).
    #[error("network error: {0}")]
    Transport(String),

    /// Non-success HTTP status with a body that is not a verification response.
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    /// Reachable server, but the body does not match the response schema.
    #[error("malformed server response: {0}")]
    MalformedResponse(String),

    /// The `result` field names no known outcome.
    #[error("unknown verification result: {0}")]
    UnknownResult(String),

    /// The verification request itself is unusable.
    #[error("invalid verification request: {0}")]
    InvalidRequest(String),

    /// Client configuration rejected at build time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LicenseError {
    /// Returns the verification outcome this error collapses to.
    #[must_use]
    pub fn outcome(&self) -> VerificationOutcome {
        match self {
            Self::KeyDecode(_) | Self::Signature(_) | Self::MissingSignature => {
                VerificationOutcome::FailedChallenge
            }
            Self::Transport(_) | Self::HttpStatus(_) => VerificationOutcome::ConnectionError,
            Self::InvalidRequest(_) => VerificationOutcome::NotFound,
            Self::MalformedResponse(_) | Self::UnknownResult(_) | Self::InvalidConfig(_) => {
                VerificationOutcome::ServerError
            }
        }
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
