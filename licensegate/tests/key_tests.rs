mod common;

use common::{OTHER_PUBLIC_KEY_PEM, PUBLIC_KEY_PEM, PUBLIC_KEY_PKCS1_PEM};
use licensegate::{LicenseError, PublicKey};

fn body_of(pem: &str) -> String {
    pem.lines().filter(|l| !l.starts_with("-----")).collect()
}

// ── Accepted shapes ──────────────────────────────────────────────

#[test]
fn decode_standard_pem() {
    let key = PublicKey::from_pem(PUBLIC_KEY_PEM).unwrap();
    assert_eq!(key.size(), 256);
}

#[test]
fn decode_single_line_pem_with_spaces() {
    // Dashboard copy-paste: delimiters and body on one line, space separated.
    let one_line = PUBLIC_KEY_PEM.lines().collect::<Vec<_>>().join(" ");
    let key = PublicKey::from_pem(&one_line).unwrap();
    assert_eq!(key, PublicKey::from_pem(PUBLIC_KEY_PEM).unwrap());
}

#[test]
fn decode_bare_base64_body() {
    let key = PublicKey::from_pem(&body_of(PUBLIC_KEY_PEM)).unwrap();
    assert_eq!(key, PublicKey::from_pem(PUBLIC_KEY_PEM).unwrap());
}

#[test]
fn decode_body_with_tabs_and_crlf() {
    let messy = PUBLIC_KEY_PEM.replace('\n', "\r\n\t");
    assert!(PublicKey::from_pem(&messy).is_ok());
}

#[test]
fn decode_pkcs1_pem_matches_spki() {
    let pkcs1 = PublicKey::from_pem(PUBLIC_KEY_PKCS1_PEM).unwrap();
    let spki = PublicKey::from_pem(PUBLIC_KEY_PEM).unwrap();
    assert_eq!(pkcs1, spki);
}

#[test]
fn different_keys_are_not_equal() {
    let a = PublicKey::from_pem(PUBLIC_KEY_PEM).unwrap();
    let b = PublicKey::from_pem(OTHER_PUBLIC_KEY_PEM).unwrap();
    assert_ne!(a, b);
}

#[test]
fn decode_is_repeatable() {
    let a = PublicKey::from_pem(PUBLIC_KEY_PEM).unwrap();
    let b = PublicKey::from_pem(PUBLIC_KEY_PEM).unwrap();
    assert_eq!(a, b);
}

// ── Rejected input ───────────────────────────────────────────────

#[test]
fn reject_invalid_base64() {
    let err = PublicKey::from_pem("-----BEGIN PUBLIC KEY-----\n!!!not base64!!!\n-----END PUBLIC KEY-----")
        .unwrap_err();
    assert!(matches!(err, LicenseError::KeyDecode(_)));
    assert!(format!("{err}").contains("base64"));
}

#[test]
fn reject_base64_that_is_not_a_key() {
    let err = PublicKey::from_pem("aGVsbG8gd29ybGQ=").unwrap_err();
    assert!(matches!(err, LicenseError::KeyDecode(_)));
}

#[test]
fn reject_truncated_key() {
    let body = body_of(PUBLIC_KEY_PEM);
    // Keep the length a multiple of four so only the DER is broken.
    let truncated = &body[..body.len() / 8 * 4];
    let err = PublicKey::from_pem(truncated).unwrap_err();
    assert!(matches!(err, LicenseError::KeyDecode(_)));
}

#[test]
fn reject_empty_text() {
    assert!(matches!(PublicKey::from_pem(""), Err(LicenseError::KeyDecode(_))));
    assert!(matches!(
        PublicKey::from_pem("-----BEGIN PUBLIC KEY-----\n-----END PUBLIC KEY-----"),
        Err(LicenseError::KeyDecode(_))
    ));
}

#[test]
fn reject_private_key_pem() {
    let err = PublicKey::from_pem(common::PRIVATE_KEY_PEM).unwrap_err();
    assert!(matches!(err, LicenseError::KeyDecode(_)));
}
