//! Slack request signing (HMAC-SHA256, signature version `v0`).
//!
//! Slack signs `v0:{X-Slack-Request-Timestamp}:{raw body}` with the app's
//! signing secret and sends `v0={hex digest}` in `X-Slack-Signature`.

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

const SIGNATURE_VERSION: &str = "v0";

/// Verifies that a request body was signed with the shared signing secret.
pub struct SignatureVerifier<'a> {
    secret: &'a [u8],
    max_age_secs: i64,
}

impl<'a> SignatureVerifier<'a> {
    pub fn new(secret: &'a [u8], max_age_secs: i64) -> Self {
        Self {
            secret,
            max_age_secs,
        }
    }

    pub fn from_config(config: &'a Config) -> Self {
        Self::new(config.signing_secret_bytes(), config.signature_max_age_secs)
    }

    /// Verify against the current wall clock.
    pub fn verify(&self, body: &[u8], headers: &HeaderMap) -> AppResult<()> {
        self.verify_at(body, headers, chrono::Utc::now().timestamp())
    }

    /// Verify as if the current unix time were `now`.
    pub fn verify_at(&self, body: &[u8], headers: &HeaderMap, now: i64) -> AppResult<()> {
        let timestamp = header_str(headers, TIMESTAMP_HEADER)
            .ok_or_else(|| AppError::Signature("missing X-Slack-Request-Timestamp".to_string()))?;

        let sent_at: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| AppError::Signature(format!("invalid timestamp '{timestamp}'")))?;

        if now.abs_diff(sent_at) > self.max_age_secs.unsigned_abs() {
            return Err(AppError::Signature(format!(
                "stale request: timestamp {sent_at} is more than {}s from now",
                self.max_age_secs
            )));
        }

        let signature = header_str(headers, SIGNATURE_HEADER)
            .ok_or_else(|| AppError::Signature("missing X-Slack-Signature".to_string()))?;

        let digest_hex = signature
            .strip_prefix(SIGNATURE_VERSION)
            .and_then(|s| s.strip_prefix('='))
            .ok_or_else(|| AppError::Signature("unsupported signature version".to_string()))?;

        let digest = hex::decode(digest_hex)
            .map_err(|_| AppError::Signature("signature is not valid hex".to_string()))?;

        let mut mac = self.mac()?;
        feed(&mut mac, timestamp, body);

        // verify_slice compares in constant time
        mac.verify_slice(&digest)
            .map_err(|_| AppError::Signature("signature mismatch".to_string()))
    }

    /// `v0=` signature for a timestamp/body pair.
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> AppResult<String> {
        let mut mac = self.mac()?;
        feed(&mut mac, timestamp, body);
        Ok(format!(
            "{SIGNATURE_VERSION}={}",
            hex::encode(mac.finalize().into_bytes())
        ))
    }

    fn mac(&self) -> AppResult<HmacSha256> {
        HmacSha256::new_from_slice(self.secret)
            .map_err(|e| AppError::Configuration(format!("invalid signing secret: {e}")))
    }
}

fn feed(mac: &mut HmacSha256, timestamp: &str, body: &[u8]) {
    mac.update(SIGNATURE_VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &[u8] = b"8f742231b10e8888abcd99yyyzzz85a5";
    const NOW: i64 = 1_531_420_618;

    fn signed_headers(verifier: &SignatureVerifier<'_>, timestamp: &str, body: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_str(timestamp).unwrap());
        let signature = verifier.sign(timestamp, body).unwrap();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(&signature).unwrap());
        headers
    }

    #[test]
    fn test_known_slack_example_signature() {
        // Example request from Slack's request-signing documentation
        let body = b"token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";
        let verifier = SignatureVerifier::new(SECRET, 300);
        let signature = verifier.sign("1531420618", body).unwrap();
        assert_eq!(
            signature,
            "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503"
        );
    }

    #[test]
    fn test_valid_signature_passes() {
        let verifier = SignatureVerifier::new(SECRET, 300);
        let body = br#"{"type":"url_verification"}"#;
        let headers = signed_headers(&verifier, &NOW.to_string(), body);
        assert!(verifier.verify_at(body, &headers, NOW).is_ok());
    }

    #[test]
    fn test_tampered_body_fails() {
        let verifier = SignatureVerifier::new(SECRET, 300);
        let headers = signed_headers(&verifier, &NOW.to_string(), b"original");
        let err = verifier.verify_at(b"tampered", &headers, NOW).unwrap_err();
        assert!(err.to_string().contains("mismatch"));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let signer = SignatureVerifier::new(b"other-secret", 300);
        let headers = signed_headers(&signer, &NOW.to_string(), b"body");
        let verifier = SignatureVerifier::new(SECRET, 300);
        assert!(verifier.verify_at(b"body", &headers, NOW).is_err());
    }

    #[test]
    fn test_stale_timestamp_fails() {
        let verifier = SignatureVerifier::new(SECRET, 300);
        let sent = NOW - 301;
        let headers = signed_headers(&verifier, &sent.to_string(), b"body");
        let err = verifier.verify_at(b"body", &headers, NOW).unwrap_err();
        assert!(err.to_string().contains("stale"));
    }

    #[test]
    fn test_future_timestamp_outside_window_fails() {
        let verifier = SignatureVerifier::new(SECRET, 300);
        let sent = NOW + 301;
        let headers = signed_headers(&verifier, &sent.to_string(), b"body");
        assert!(verifier.verify_at(b"body", &headers, NOW).is_err());
    }

    #[test]
    fn test_timestamp_at_window_edge_passes() {
        let verifier = SignatureVerifier::new(SECRET, 300);
        let sent = NOW - 300;
        let headers = signed_headers(&verifier, &sent.to_string(), b"body");
        assert!(verifier.verify_at(b"body", &headers, NOW).is_ok());
    }

    #[test]
    fn test_missing_headers_fail() {
        let verifier = SignatureVerifier::new(SECRET, 300);
        let err = verifier.verify_at(b"body", &HeaderMap::new(), NOW).unwrap_err();
        assert_eq!(err.kind(), "signature");

        let mut headers = HeaderMap::new();
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_static("1531420618"));
        let err = verifier.verify_at(b"body", &headers, NOW).unwrap_err();
        assert!(err.to_string().contains("X-Slack-Signature"));
    }

    #[test]
    fn test_non_numeric_timestamp_fails() {
        let verifier = SignatureVerifier::new(SECRET, 300);
        let mut headers = HeaderMap::new();
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_static("yesterday"));
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_static("v0=00"));
        assert!(verifier.verify_at(b"body", &headers, NOW).is_err());
    }

    #[test]
    fn test_unknown_version_and_bad_hex_fail() {
        let verifier = SignatureVerifier::new(SECRET, 300);
        let mut headers = HeaderMap::new();
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_static("1531420618"));

        headers.insert(SIGNATURE_HEADER, HeaderValue::from_static("v1=abcd"));
        let err = verifier.verify_at(b"body", &headers, NOW).unwrap_err();
        assert!(err.to_string().contains("version"));

        headers.insert(SIGNATURE_HEADER, HeaderValue::from_static("v0=not-hex"));
        let err = verifier.verify_at(b"body", &headers, NOW).unwrap_err();
        assert!(err.to_string().contains("hex"));
    }
}
