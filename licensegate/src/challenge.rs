//! Challenge generation.
//!
//! A challenge is a single-use token the client sends with each verification
//! request. The server signs it with the account's private key and echoes the
//! signature back as `signedChallenge`.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Number of random bytes in a [`ChallengeStrategy::Random`] challenge.
pub const RANDOM_CHALLENGE_BYTES: usize = 16;

static LAST_TIMESTAMP_MS: AtomicI64 = AtomicI64::new(0);

/// How challenge tokens are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStrategy {
    /// Decimal Unix milliseconds. This is the format the LicenseGate server
    /// and the other official clients use, but it is guessable: anyone who
    /// can replay an old signed response only needs to hit the same
    /// millisecond.
    #[default]
    Timestamp,
    /// 128 bits from the OS random generator, hex encoded.
    Random,
}

/// A single-use challenge token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge(String);

impl Challenge {
    /// Generates a fresh challenge with the given strategy.
    #[must_use]
    pub fn generate(strategy: ChallengeStrategy) -> Self {
        match strategy {
            ChallengeStrategy::Timestamp => Self(next_timestamp_ms().to_string()),
            ChallengeStrategy::Random => {
                let mut bytes = [0u8; RANDOM_CHALLENGE_BYTES];
                OsRng.fill_bytes(&mut bytes);
                Self(hex::encode(bytes))
            }
        }
    }

    /// Wraps an existing token, e.g. one recorded in a test fixture.
    pub fn from_string(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token exactly as it is sent and signed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current Unix milliseconds, bumped past the last value handed out so that
/// two calls within the same millisecond still differ.
fn next_timestamp_ms() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let mut last = LAST_TIMESTAMP_MS.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_TIMESTAMP_MS.compare_exchange_weak(
            last,
            next,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}
