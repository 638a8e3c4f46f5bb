//! Server response schema and interpretation.
//!
//! The precedence below is part of the protocol, not presentation:
//!
//! 1. `error` present or `result` missing: `SERVER_ERROR`.
//! 2. `valid` present and not `true`: the parsed `result`, except that `VALID` contradicts
//!    the flag and becomes `SERVER_ERROR`. Denials skip the challenge check.
//! 3. Challenge mode: a missing or bad `signedChallenge` is
//!    `FAILED_CHALLENGE`.
//! 4. Otherwise the parsed `result`.

use crate::error::{LicenseError, LicenseResult};
use crate::outcome::VerificationOutcome;
use serde::{Deserialize, Deserializer, Serialize};

/// The JSON body returned by the verify endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerResponse {
    /// Outcome name, e.g. `VALID` or `EXPIRED`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// `None` only when the field is absent. An explicit `null` reads as
    /// `Some(false)`.
    #[serde(
        default,
        deserialize_with = "null_as_false",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid: Option<bool>,
    /// Any error payload, `null` included. Its content is only logged.
    #[serde(
        default,
        deserialize_with = "keep_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<serde_json::Value>,
    /// Base64 RSA signature over the challenge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_challenge: Option<String>,
}

impl ServerResponse {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::MalformedResponse`] if the body is not a JSON
    /// object matching the schema.
    pub fn from_json(body: &str) -> LicenseResult<Self> {
        serde_json::from_str(body).map_err(|e| LicenseError::MalformedResponse(e.to_string()))
    }
}

fn keep_null<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

fn null_as_false<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|valid| Some(valid.unwrap_or(false)))
}

/// Classifies `response`.
///
/// `check_challenge` is `None` when challenge mode is off. Otherwise it is
/// called at most once, with the `signedChallenge` value, and only for
/// positive-leaning responses.
///
/// # Errors
///
/// - [`LicenseError::MissingSignature`] or the checker's error when the
///   challenge check fails.
/// - [`LicenseError::UnknownResult`] when `result` names no known outcome.
pub fn interpret<F>(
    response: &ServerResponse,
    check_challenge: Option<F>,
) -> LicenseResult<VerificationOutcome>
where
    F: FnOnce(&str) -> LicenseResult<()>,
{
    let result = match (&response.error, &response.result) {
        (None, Some(result)) => result,
        _ => return Ok(VerificationOutcome::ServerError),
    };

    if response.valid == Some(false) {
        return match result.parse::<VerificationOutcome>()? {
            VerificationOutcome::Valid => Ok(VerificationOutcome::ServerError),
            denied => Ok(denied),
        };
    }

    if let Some(check) = check_challenge {
        let signed = response
            .signed_challenge
            .as_deref()
            .ok_or(LicenseError::MissingSignature)?;
        check(signed)?;
    }

    result.parse()
}
