//! Shared test helpers for verification tests.

#![allow(dead_code)]

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use licensegate::{HttpReply, LicenseError, LicenseGate, LicenseResult, Transport};
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const PUBLIC_KEY_PEM: &str = include_str!("../fixtures/public_key.pem");
pub const PUBLIC_KEY_PKCS1_PEM: &str = include_str!("../fixtures/public_key_pkcs1.pem");
pub const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/private_key.pem");
pub const OTHER_PUBLIC_KEY_PEM: &str = include_str!("../fixtures/other_public_key.pem");
pub const OTHER_PRIVATE_KEY_PEM: &str = include_str!("../fixtures/other_private_key.pem");

/// Signature over `OPENSSL_CHALLENGE` made with `openssl dgst -sha256 -sign`.
pub const OPENSSL_SIGNATURE: &str = include_str!("../fixtures/openssl_signature_1700000000000.b64");
pub const OPENSSL_CHALLENGE: &str = "1700000000000";

pub const USER_ID: &str = "d32af1";

/// Signs `challenge` with the fixture private key and Base64-encodes it,
/// the way the server fills `signedChallenge`.
pub fn sign_challenge(challenge: &str) -> String {
    sign_with(PRIVATE_KEY_PEM, challenge)
}

pub fn sign_with(private_pem: &str, challenge: &str) -> String {
    let private_key = RsaPrivateKey::from_pkcs8_pem(private_pem).unwrap();
    let signing_key = SigningKey::<Sha256>::new(private_key);
    let signature = signing_key.sign(challenge.as_bytes());
    STANDARD.encode(signature.to_bytes())
}

/// Extracts the decoded `challenge` query parameter from a verify URL.
pub fn challenge_from_url(url: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("challenge="))
        .map(|raw| urlencoding::decode(raw).unwrap().into_owned())
}

type Responder = Box<dyn Fn(&str) -> LicenseResult<HttpReply> + Send + Sync>;

/// In-memory transport that records every URL it is asked for.
pub struct MockTransport {
    responder: Responder,
    urls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new(responder: impl Fn(&str) -> LicenseResult<HttpReply> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            urls: Mutex::new(Vec::new()),
        })
    }

    /// Always answers with `status` and `body`.
    pub fn fixed(status: u16, body: serde_json::Value) -> Arc<Self> {
        let body = body.to_string();
        Self::new(move |_| Ok(HttpReply::new(status, body.clone())))
    }

    /// Always answers with a raw, possibly non-JSON body.
    pub fn raw(status: u16, body: &str) -> Arc<Self> {
        let body = body.to_string();
        Self::new(move |_| Ok(HttpReply::new(status, body.clone())))
    }

    /// Fails every request at the network level.
    pub fn unreachable() -> Arc<Self> {
        Self::new(|_| Err(LicenseError::Transport("connection refused".to_string())))
    }

    /// Answers `result` with a signature over the challenge found in the URL.
    pub fn signing(result: &'static str) -> Arc<Self> {
        Self::new(move |url| {
            let challenge = challenge_from_url(url).unwrap_or_default();
            let body = serde_json::json!({
                "valid": result == "VALID",
                "result": result,
                "signedChallenge": sign_challenge(&challenge),
            });
            Ok(HttpReply::new(200, body.to_string()))
        })
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub fn last_url(&self) -> String {
        self.urls().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> LicenseResult<HttpReply> {
        self.urls.lock().unwrap().push(url.to_string());
        (self.responder)(url)
    }
}

/// Counts calls so tests can assert a code path was or was not taken.
#[derive(Default)]
pub struct CallCounter(AtomicUsize);

impl CallCounter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Client without challenges, talking to `transport`.
pub fn plain_client(transport: Arc<MockTransport>) -> LicenseGate {
    LicenseGate::builder(USER_ID)
        .validation_server("http://localhost:8080")
        .transport(transport)
        .build()
        .unwrap()
}

/// Client in challenge mode with the fixture public key.
pub fn challenge_client(transport: Arc<MockTransport>) -> LicenseGate {
    LicenseGate::builder(USER_ID)
        .validation_server("http://localhost:8080")
        .public_key(PUBLIC_KEY_PEM)
        .transport(transport)
        .build()
        .unwrap()
}
