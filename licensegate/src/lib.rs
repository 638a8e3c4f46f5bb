//! Client for the LicenseGate license verification service.
//!
//! This crate handles:
//! - Building verify requests for cloud or self-hosted LicenseGate servers
//! - Interpreting the server's answer into a closed set of outcomes
//! - Challenge-response: proving the answer came from the holder of the
//!   account's RSA private key
//!
//! # Challenge-response
//!
//! With a public key configured, each request carries a fresh challenge. The
//! server signs it (SHA-256 with RSA, PKCS#1 v1.5) and returns the Base64
//! signature as `signedChallenge`. A positive answer without a signature that
//! verifies against the configured key is reported as `FAILED_CHALLENGE`, so
//! a proxy that rewrites `EXPIRED` into `VALID` is caught. Denials are
//! accepted unsigned.
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> licensegate::LicenseResult<()> {
//! use licensegate::{LicenseGate, VerificationOutcome};
//!
//! let gate = LicenseGate::builder("a1b2c3")
//!     .public_key("-----BEGIN PUBLIC KEY----- ... -----END PUBLIC KEY-----")
//!     .build()?;
//!
//! match gate.verify_with_scope("LICENSE-KEY", "pro").await {
//!     VerificationOutcome::Valid => println!("licensed"),
//!     other => println!("not licensed: {other}"),
//! }
//! # Ok(())
//! # }
//! ```

mod challenge;
mod client;
mod error;
mod key;
mod outcome;
mod request;
mod response;
mod signature;
mod transport;

pub use challenge::{Challenge, ChallengeStrategy, RANDOM_CHALLENGE_BYTES};
pub use client::{
    LicenseGate, LicenseGateBuilder, LicenseGateConfig, DEFAULT_SERVER, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
pub use error::{LicenseError, LicenseResult};
pub use key::PublicKey;
pub use outcome::VerificationOutcome;
pub use request::VerificationRequest;
pub use response::{interpret, ServerResponse};
pub use signature::{verify_challenge, verify_signature};
pub use transport::{HttpReply, Transport};

#[cfg(feature = "online")]
pub use transport::ReqwestTransport;
