use crate::core::config::ClientCredentials;
use crate::core::errors::TwitterError;
use base64::engine::general_purpose;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::RngCore;
use sha1::Sha1;
use std::collections::HashMap;

type HmacSha1 = Hmac<Sha1>;

/// Result type for signing operations: headers to attach to the request
pub type SignatureResult = Result<HashMap<String, String>, TwitterError>;

/// RFC 3986 unreserved characters stay as-is, everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Signer trait for request authentication
///
/// A signer runs at send time, once the final URL is known, and returns the
/// headers that authenticate the request.
pub trait Signer: Send + Sync {
    /// Sign a request and return headers to include
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `url` - Absolute URL without the query string
    /// * `query_params` - Decoded query parameters
    /// * `timestamp` - Request timestamp in seconds
    fn sign_request(
        &self,
        method: &str,
        url: &str,
        query_params: &[(String, String)],
        timestamp: u64,
    ) -> SignatureResult;
}

/// OAuth 1.0a HMAC-SHA1 signer for user-context requests
pub struct OAuth1Signer {
    credentials: ClientCredentials,
}

impl std::fmt::Debug for OAuth1Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth1Signer").finish_non_exhaustive()
    }
}

impl OAuth1Signer {
    pub fn new(credentials: ClientCredentials) -> Self {
        Self { credentials }
    }

    /// Build the `Authorization` header value with an explicit nonce.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        query_params: &[(String, String)],
        timestamp: u64,
        nonce: &str,
    ) -> Result<String, TwitterError> {
        let mut oauth_params = vec![
            (
                "oauth_consumer_key".to_string(),
                self.credentials.consumer_key().to_string(),
            ),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                "HMAC-SHA1".to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            (
                "oauth_token".to_string(),
                self.credentials.access_token().to_string(),
            ),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];

        let base_string = signature_base_string(method, url, &oauth_params, query_params);
        let signature = self.generate_signature(&base_string)?;
        oauth_params.push(("oauth_signature".to_string(), signature));

        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", header))
    }

    fn generate_signature(&self, base_string: &str) -> Result<String, TwitterError> {
        let signing_key = format!(
            "{}&{}",
            encode(self.credentials.consumer_secret()),
            encode(self.credentials.access_token_secret())
        );

        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
            .map_err(|e| TwitterError::AuthError(format!("Invalid signing key: {}", e)))?;
        mac.update(base_string.as_bytes());

        Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl Signer for OAuth1Signer {
    fn sign_request(
        &self,
        method: &str,
        url: &str,
        query_params: &[(String, String)],
        timestamp: u64,
    ) -> SignatureResult {
        let header =
            self.authorization_header(method, url, query_params, timestamp, &generate_nonce())?;

        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), header);
        Ok(headers)
    }
}

/// `METHOD&url&params` with params sorted by encoded key, then encoded value.
fn signature_base_string(
    method: &str,
    url: &str,
    oauth_params: &[(String, String)],
    query_params: &[(String, String)],
) -> String {
    let mut encoded: Vec<(String, String)> = oauth_params
        .iter()
        .chain(query_params)
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&param_string)
    )
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
