//! OAuth 1.0a request signing (HMAC-SHA1) for the store API.
//!
//! The store API only accepts requests carrying an access token that was
//! issued up front, so there is no token negotiation here: each request is
//! signed with the consumer secret and token secret and sent with an
//! `Authorization: OAuth ...` header.

use crate::credentials::StoreCredentials;
use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::Rng;
use ring::hmac;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const VERSION: &str = "1.0";

#[derive(Debug, Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    consumer_secret: String,
    token: String,
    token_secret: String,
}

impl OAuthSigner {
    pub fn new(credentials: &StoreCredentials) -> Self {
        Self {
            consumer_key: credentials.consumer_key.clone(),
            consumer_secret: credentials.consumer_secret.clone(),
            token: credentials.token.clone(),
            token_secret: credentials.token_secret.clone(),
        }
    }

    /// Header value for a request, with a fresh nonce and the current time.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
    ) -> String {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp();
        self.authorization_header_with(method, url, params, &nonce, timestamp)
    }

    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: i64,
    ) -> String {
        let mut oauth = self.oauth_params(nonce, timestamp);
        let signature = self.signature(method, url, params, &oauth);
        oauth.push(("oauth_signature".to_string(), signature));
        oauth.sort();

        let fields: Vec<String> = oauth
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();
        format!("OAuth {}", fields.join(", "))
    }

    fn oauth_params(&self, nonce: &str, timestamp: i64) -> Vec<(String, String)> {
        vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                SIGNATURE_METHOD.to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), self.token.clone()),
            ("oauth_version".to_string(), VERSION.to_string()),
        ]
    }

    fn signature(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        oauth: &[(String, String)],
    ) -> String {
        let base = signature_base_string(method, url, params.iter().chain(oauth));
        let signing_key = format!(
            "{}&{}",
            encode(&self.consumer_secret),
            encode(&self.token_secret)
        );
        let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, signing_key.as_bytes());
        let tag = hmac::sign(&key, base.as_bytes());
        base64::engine::general_purpose::STANDARD.encode(tag.as_ref())
    }
}

fn signature_base_string<'a>(
    method: &str,
    url: &str,
    params: impl Iterator<Item = &'a (String, String)>,
) -> String {
    let mut encoded: Vec<(String, String)> =
        params.map(|(k, v)| (encode(k), encode(v))).collect();
    encoded.sort();
    let normalized: Vec<String> = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&normalized.join("&"))
    )
}

// RFC 3986 percent-encoding: everything except unreserved characters
pub fn encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
