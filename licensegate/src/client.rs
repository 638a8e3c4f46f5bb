//! The verification client.
//!
//! A [`LicenseGate`] is configured once through [`LicenseGateBuilder`] and is
//! immutable afterwards, so one instance can be shared across tasks.

use crate::challenge::{Challenge, ChallengeStrategy};
use crate::error::{LicenseError, LicenseResult};
use crate::key::PublicKey;
use crate::outcome::VerificationOutcome;
use crate::request::VerificationRequest;
use crate::response::{interpret, ServerResponse};
use crate::signature::verify_signature;
use crate::transport::Transport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// LicenseGate cloud endpoint.
pub const DEFAULT_SERVER: &str = "https://licensegate.com";

/// Default network timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("licensegate-rust/", env!("CARGO_PKG_VERSION"));

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseGateConfig {
    /// User ID of the license owner's LicenseGate account.
    pub user_id: String,
    /// The account's RSA public key (PEM or bare Base64).
    pub public_key: Option<String>,
    /// Base URL of the validation server, e.g. `https://license.example.com`.
    pub validation_server: String,
    /// Send a challenge with each request and require a valid signature back.
    pub use_challenges: bool,
    pub challenge_strategy: ChallengeStrategy,
    /// Log request URLs, raw responses and failure reasons.
    pub debug: bool,
    /// Per-request network timeout in milliseconds.
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for LicenseGateConfig {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            public_key: None,
            validation_server: DEFAULT_SERVER.to_string(),
            use_challenges: false,
            challenge_strategy: ChallengeStrategy::default(),
            debug: false,
            timeout_ms: DEFAULT_TIMEOUT_SECS * 1000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Builder for [`LicenseGate`].
pub struct LicenseGateBuilder {
    config: LicenseGateConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl LicenseGateBuilder {
    /// Starts a builder for the given account user ID.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self::from_config(LicenseGateConfig {
            user_id: user_id.into(),
            ..Default::default()
        })
    }

    /// Starts a builder from a full configuration value.
    pub fn from_config(config: LicenseGateConfig) -> Self {
        Self {
            config,
            transport: None,
        }
    }

    /// Sets the account's public key and enables challenges.
    #[must_use]
    pub fn public_key(mut self, pem: impl Into<String>) -> Self {
        self.config.public_key = Some(pem.into());
        self.config.use_challenges = true;
        self
    }

    /// Points the client at a self-hosted server.
    #[must_use]
    pub fn validation_server(mut self, url: impl Into<String>) -> Self {
        self.config.validation_server = url.into();
        self
    }

    #[must_use]
    pub fn use_challenges(mut self, enabled: bool) -> Self {
        self.config.use_challenges = enabled;
        self
    }

    #[must_use]
    pub fn challenge_strategy(mut self, strategy: ChallengeStrategy) -> Self {
        self.config.challenge_strategy = strategy;
        self
    }

    #[must_use]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// Sets the per-request timeout, at millisecond precision (minimum 1 ms).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX).max(1);
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Replaces the default HTTP transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validates the configuration and builds the client.
    ///
    /// A public key that fails to decode is not a build error: it is logged,
    /// and every challenge-mode verification then returns
    /// `FAILED_CHALLENGE`.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidConfig`] if the user ID or server URL is
    /// empty, if challenges are enabled without a public key, or if no
    /// transport is available.
    pub fn build(self) -> LicenseResult<LicenseGate> {
        let mut config = self.config;

        if config.user_id.trim().is_empty() {
            return Err(LicenseError::InvalidConfig("user ID must not be empty".to_string()));
        }
        if config.validation_server.trim().is_empty() {
            return Err(LicenseError::InvalidConfig(
                "validation server must not be empty".to_string(),
            ));
        }
        if config.use_challenges && config.public_key.is_none() {
            return Err(LicenseError::InvalidConfig(
                "challenges require a public key".to_string(),
            ));
        }
        config.validation_server = config.validation_server.trim_end_matches('/').to_string();

        let public_key = match config.public_key.as_deref().map(PublicKey::from_pem) {
            Some(Ok(key)) => Some(key),
            Some(Err(e)) => {
                warn!(error = %e, "configured public key is unusable; challenges will fail");
                None
            }
            None => None,
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport(&config)?,
        };

        Ok(LicenseGate {
            config,
            public_key,
            transport,
        })
    }
}

#[cfg(feature = "online")]
fn default_transport(config: &LicenseGateConfig) -> LicenseResult<Arc<dyn Transport>> {
    let transport = crate::transport::ReqwestTransport::new(
        Duration::from_millis(config.timeout_ms),
        &config.user_agent,
    )?;
    Ok(Arc::new(transport))
}

#[cfg(not(feature = "online"))]
fn default_transport(_config: &LicenseGateConfig) -> LicenseResult<Arc<dyn Transport>> {
    Err(LicenseError::InvalidConfig(
        "no transport configured (enable the `online` feature or supply one)".to_string(),
    ))
}

/// LicenseGate verification client. Supports cloud and self-hosted servers.
pub struct LicenseGate {
    config: LicenseGateConfig,
    public_key: Option<PublicKey>,
    transport: Arc<dyn Transport>,
}

impl LicenseGate {
    /// Starts a builder for the given account user ID.
    pub fn builder(user_id: impl Into<String>) -> LicenseGateBuilder {
        LicenseGateBuilder::new(user_id)
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &LicenseGateConfig {
        &self.config
    }

    /// Returns true when requests carry a challenge.
    #[must_use]
    pub fn uses_challenges(&self) -> bool {
        self.config.use_challenges
    }

    /// Verifies a license key.
    ///
    /// An empty key returns `NOT_FOUND` without contacting the server.
    pub async fn verify(&self, license_key: &str) -> VerificationOutcome {
        self.verify_request(VerificationRequest::new(license_key)).await
    }

    /// Verifies a license key against a scope.
    pub async fn verify_with_scope(&self, license_key: &str, scope: &str) -> VerificationOutcome {
        self.verify_request(VerificationRequest::new(license_key).with_scope(scope))
            .await
    }

    /// Verifies a license key against a scope, attaching metadata the server
    /// records with the request.
    pub async fn verify_with_metadata(
        &self,
        license_key: &str,
        scope: Option<&str>,
        metadata: &str,
    ) -> VerificationOutcome {
        let mut request = VerificationRequest::new(license_key).with_metadata(metadata);
        request.scope = scope.map(str::to_string);
        self.verify_request(request).await
    }

    /// Returns true only if the license key verifies as `VALID`.
    pub async fn verify_simple(&self, license_key: &str) -> bool {
        self.verify(license_key).await.is_valid()
    }

    pub async fn verify_simple_with_scope(&self, license_key: &str, scope: &str) -> bool {
        self.verify_with_scope(license_key, scope).await.is_valid()
    }

    pub async fn verify_simple_with_metadata(
        &self,
        license_key: &str,
        scope: Option<&str>,
        metadata: &str,
    ) -> bool {
        self.verify_with_metadata(license_key, scope, metadata)
            .await
            .is_valid()
    }

    /// Runs one verification. Never fails: every error becomes an outcome.
    ///
    /// Any challenge already on `request` is replaced by a fresh one in
    /// challenge mode and dropped otherwise. A request with an empty license
    /// key is answered `NOT_FOUND` locally; that outcome never reached the
    /// server.
    pub async fn verify_request(&self, mut request: VerificationRequest) -> VerificationOutcome {
        request.challenge = self
            .config
            .use_challenges
            .then(|| Challenge::generate(self.config.challenge_strategy));

        match self.run(&request).await {
            Ok(outcome) => {
                if self.config.debug {
                    debug!(%outcome, "verification finished");
                }
                outcome
            }
            Err(e) => {
                let outcome = e.outcome();
                if matches!(e, LicenseError::Transport(_) | LicenseError::HttpStatus(_)) {
                    warn!(error = %e, "license server unreachable");
                }
                if self.config.debug {
                    debug!(error = %e, %outcome, "verification failed");
                }
                outcome
            }
        }
    }

    async fn run(&self, request: &VerificationRequest) -> LicenseResult<VerificationOutcome> {
        let url = request.build_url(&self.config.validation_server, &self.config.user_id)?;
        let response = self.request_server(&url).await?;

        if self.config.debug {
            if let Some(error) = &response.error {
                debug!(%error, "server reported an error");
            }
        }

        let check = request
            .challenge
            .as_ref()
            .map(|challenge| move |signed: &str| self.check_signature(challenge, signed));

        interpret(&response, check)
    }

    async fn request_server(&self, url: &str) -> LicenseResult<ServerResponse> {
        if self.config.debug {
            debug!(url, "sending verification request");
        }

        let reply = self.transport.get(url).await?;

        if self.config.debug {
            debug!(status = reply.status, body = %reply.body, "verification response");
        }

        match ServerResponse::from_json(&reply.body) {
            Ok(response) => Ok(response),
            Err(_) if !reply.is_success() => Err(LicenseError::HttpStatus(reply.status)),
            Err(e) => Err(e),
        }
    }

    fn check_signature(&self, challenge: &Challenge, signed: &str) -> LicenseResult<()> {
        let key = self.public_key.as_ref().ok_or_else(|| {
            LicenseError::KeyDecode("configured public key could not be decoded".to_string())
        })?;
        verify_signature(key, challenge.as_str(), signed)
    }
}

impl fmt::Debug for LicenseGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LicenseGate")
            .field("user_id", &self.config.user_id)
            .field("validation_server", &self.config.validation_server)
            .field("use_challenges", &self.config.use_challenges)
            .field("public_key_loaded", &self.public_key.is_some())
            .finish()
    }
}
