//! Verification request and endpoint URL construction.

use crate::challenge::Challenge;
use crate::error::{LicenseError, LicenseResult};

/// One verification attempt. Built per call and dropped afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationRequest {
    /// The license key to check.
    pub license_key: String,
    /// Scope the license must cover.
    pub scope: Option<String>,
    /// Free-form metadata the server records with the request.
    pub metadata: Option<String>,
    /// Challenge token, set only in challenge mode.
    pub challenge: Option<Challenge>,
}

impl VerificationRequest {
    /// Creates a bare request for `license_key`.
    pub fn new(license_key: impl Into<String>) -> Self {
        Self {
            license_key: license_key.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    #[must_use]
    pub fn with_challenge(mut self, challenge: Challenge) -> Self {
        self.challenge = Some(challenge);
        self
    }

    /// Builds the verify endpoint URL:
    ///
    /// `{server}/license/{user_id}/{license_key}/verify[?metadata=..][&scope=..][&challenge=..]`
    ///
    /// Parameter order is fixed. Absent values are skipped; empty strings are
    /// still sent.
    ///
    /// Values are encoded per RFC 3986: a space becomes `%20` and `~` is left
    /// as is. Form encoders write `+` and `%7E` instead; both decode the same,
    /// but a server that compares raw query strings will see the difference.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidRequest`] if the license key is empty.
    pub fn build_url(&self, validation_server: &str, user_id: &str) -> LicenseResult<String> {
        if self.license_key.is_empty() {
            return Err(LicenseError::InvalidRequest(
                "license key must not be empty".to_string(),
            ));
        }

        let params = [
            ("metadata", self.metadata.as_deref()),
            ("scope", self.scope.as_deref()),
            ("challenge", self.challenge.as_ref().map(Challenge::as_str)),
        ];

        let mut query = String::new();
        for (name, value) in params {
            let Some(value) = value else { continue };
            query.push(if query.is_empty() { '?' } else { '&' });
            query.push_str(name);
            query.push('=');
            query.push_str(&urlencoding::encode(value));
        }

        Ok(format!(
            "{}/license/{}/{}/verify{}",
            validation_server.trim_end_matches('/'),
            urlencoding::encode(user_id),
            urlencoding::encode(&self.license_key),
            query
        ))
    }
}
