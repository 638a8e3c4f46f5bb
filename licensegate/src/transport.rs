//! HTTP transport seam.
//!
//! The client only needs one operation: GET a URL and hand back the status
//! and body. Tests and embedders with their own HTTP stack implement
//! [`Transport`]; [`ReqwestTransport`] is the default.

use crate::error::LicenseResult;
use async_trait::async_trait;

/// Raw HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the verification GET.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url`.
    ///
    /// Implementations return [`LicenseError::Transport`](crate::LicenseError::Transport)
    /// for anything that prevents a complete reply: connection failures,
    /// timeouts, unreadable bodies. Non-2xx statuses are still replies.
    async fn get(&self, url: &str) -> LicenseResult<HttpReply>;
}

#[cfg(feature = "online")]
pub use online::ReqwestTransport;

#[cfg(feature = "online")]
mod online {
    use super::{HttpReply, Transport};
    use crate::error::{LicenseError, LicenseResult};
    use async_trait::async_trait;
    use std::time::Duration;

    /// [`Transport`] backed by a `reqwest` client.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        /// Creates a transport with a per-request timeout and User-Agent.
        ///
        /// # Errors
        ///
        /// Returns [`LicenseError::InvalidConfig`] if the TLS backend cannot
        /// be initialized.
        pub fn new(timeout: Duration, user_agent: &str) -> LicenseResult<Self> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(user_agent)
                .build()
                .map_err(|e| LicenseError::InvalidConfig(format!("http client: {e}")))?;
            Ok(Self { client })
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn get(&self, url: &str) -> LicenseResult<HttpReply> {
            let resp = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| LicenseError::Transport(format!("request failed: {e}")))?;

            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .map_err(|e| LicenseError::Transport(format!("read body: {e}")))?;

            Ok(HttpReply { status, body })
        }
    }
}
