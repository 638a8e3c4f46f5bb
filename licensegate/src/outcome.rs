//! The closed set of verification results.

use crate::error::LicenseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The result of a license verification.
///
/// Most variants mirror the `result` names the LicenseGate server returns.
/// Three are produced by the client itself:
/// - `ConnectionError`: the request to the server failed.
/// - `ServerError`: the server returned an invalid or inconsistent response.
/// - `FailedChallenge`: the challenge signature was missing or did not verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationOutcome {
    Valid,
    NotFound,
    NotActive,
    Expired,
    LicenseScopeFailed,
    IpLimitExceeded,
    RateLimitExceeded,
    FailedChallenge,
    ServerError,
    ConnectionError,
}

impl VerificationOutcome {
    /// Every outcome, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Valid,
        Self::NotFound,
        Self::NotActive,
        Self::Expired,
        Self::LicenseScopeFailed,
        Self::IpLimitExceeded,
        Self::RateLimitExceeded,
        Self::FailedChallenge,
        Self::ServerError,
        Self::ConnectionError,
    ];

    /// Returns true only for `Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the wire name (`VALID`, `NOT_FOUND`, ...).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::NotFound => "NOT_FOUND",
            Self::NotActive => "NOT_ACTIVE",
            Self::Expired => "EXPIRED",
            Self::LicenseScopeFailed => "LICENSE_SCOPE_FAILED",
            Self::IpLimitExceeded => "IP_LIMIT_EXCEEDED",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::FailedChallenge => "FAILED_CHALLENGE",
            Self::ServerError => "SERVER_ERROR",
            Self::ConnectionError => "CONNECTION_ERROR",
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationOutcome {
    type Err = LicenseError;

    /// Parses a wire name. Matching is exact; unknown names are an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|outcome| outcome.as_str() == s)
            .ok_or_else(|| LicenseError::UnknownResult(s.to_string()))
    }
}
