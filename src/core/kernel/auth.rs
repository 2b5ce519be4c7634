use crate::core::config::ClientCredentials;
use crate::core::errors::TwitterError;
use crate::core::kernel::signer::{OAuth1Signer, Signer};
use reqwest::header::HeaderValue;
use reqwest::Method;
use secrecy::{ExposeSecret, Secret};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// How a request proves who it is. Exactly one applies per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// App-only bearer token header, used for reads
    Bearer,
    /// OAuth 1.0a user-context signature, used for writes
    OAuth1,
}

impl AuthStrategy {
    /// GET reads with the bearer token; every other method is signed.
    pub fn for_method(method: &Method) -> Self {
        if *method == Method::GET {
            Self::Bearer
        } else {
            Self::OAuth1
        }
    }
}

impl fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer => write!(f, "bearer"),
            Self::OAuth1 => write!(f, "oauth"),
        }
    }
}

/// Headers and optional signer resolved for one request
pub struct AuthContext {
    pub strategy: AuthStrategy,
    pub headers: HashMap<String, String>,
    pub signer: Option<Arc<dyn Signer>>,
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header_names: Vec<&String> = self.headers.keys().collect();
        header_names.sort();
        f.debug_struct("AuthContext")
            .field("strategy", &self.strategy)
            .field("headers", &header_names)
            .field("has_signer", &self.signer.is_some())
            .finish()
    }
}

/// Picks bearer or OAuth1 authentication and builds the request headers
pub struct AuthSelector {
    oauth_signer: Arc<dyn Signer>,
    bearer_token: Option<Secret<String>>,
}

impl fmt::Debug for AuthSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSelector")
            .field("has_bearer_token", &self.has_bearer_token())
            .finish_non_exhaustive()
    }
}

impl AuthSelector {
    pub fn new(credentials: ClientCredentials, bearer_token: Option<Secret<String>>) -> Self {
        Self {
            oauth_signer: Arc::new(OAuth1Signer::new(credentials)),
            bearer_token,
        }
    }

    /// Swap in a custom signer for OAuth1 requests
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.oauth_signer = signer;
        self
    }

    pub fn set_bearer_token(&mut self, token: String) {
        self.bearer_token = Some(Secret::new(token));
    }

    pub fn has_bearer_token(&self) -> bool {
        self.bearer_token.is_some()
    }

    pub fn select(&self, strategy: AuthStrategy) -> Result<AuthContext, TwitterError> {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());

        match strategy {
            AuthStrategy::Bearer => {
                let token = self.bearer_token.as_ref().ok_or_else(|| {
                    TwitterError::AuthError(
                        "Bearer token required for read requests but none was set".to_string(),
                    )
                })?;
                let value = format!("Bearer {}", token.expose_secret());
                // Invalid header bytes are a credential error, not a transport one
                HeaderValue::from_str(&value).map_err(|_| {
                    TwitterError::AuthError(
                        "Bearer token contains characters not allowed in a header".to_string(),
                    )
                })?;
                headers.insert("Authorization".to_string(), value);

                Ok(AuthContext {
                    strategy,
                    headers,
                    signer: None,
                })
            }
            AuthStrategy::OAuth1 => Ok(AuthContext {
                strategy,
                headers,
                signer: Some(Arc::clone(&self.oauth_signer)),
            }),
        }
    }
}
