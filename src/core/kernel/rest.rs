use crate::core::config::{API_BASE_URI, DEFAULT_TIMEOUT_SECONDS};
use crate::core::errors::TwitterError;
use crate::core::kernel::auth::{AuthSelector, AuthStrategy};
use crate::core::kernel::classifier::classify_response;
use crate::core::types::ApiRequest;
use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, instrument, trace};

/// REST client trait for executing API requests
///
/// Each call is a fresh pipeline: authenticate, send, decode, classify.
/// Nothing about one request survives into the next.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Execute a request and return the decoded JSON body untouched
    async fn execute(&self, request: ApiRequest) -> Result<Value, TwitterError>;

    /// Execute a request and deserialize the body into `T`
    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, TwitterError>;

    /// Replace the bearer token used for read requests
    fn set_bearer_token(&mut self, token: String);
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL every endpoint is appended to
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self::new(API_BASE_URI.to_string())
    }
}

impl RestClientConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: format!("twitterx/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    auth: AuthSelector,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig, auth: AuthSelector) -> Self {
        Self { config, auth }
    }

    pub fn build(self) -> Result<ReqwestRest, TwitterError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                TwitterError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            auth: self.auth,
        })
    }
}

/// Implementation of `RestClient` using reqwest
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    auth: AuthSelector,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn new(base_url: String, auth: AuthSelector) -> Result<Self, TwitterError> {
        RestClientBuilder::new(RestClientConfig::new(base_url), auth).build()
    }

    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Current timestamp in seconds, as OAuth1 wants it
    fn get_timestamp() -> Result<u64, TwitterError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| TwitterError::AuthError(format!("Failed to get timestamp: {}", e)))
    }

    fn build_url(&self, endpoint: &str) -> Result<Url, TwitterError> {
        let raw = format!("{}{}", self.config.base_url, endpoint);
        Url::parse(&raw)
            .map_err(|e| TwitterError::InvalidParameters(format!("Invalid URL '{}': {}", raw, e)))
    }

    #[instrument(skip(self, response), fields(status = %response.status()))]
    async fn handle_response(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<Value, TwitterError> {
        let status = response.status();
        let headers = response.headers().clone();
        let response_text = response.text().await?;

        trace!("Response body: {}", response_text);

        classify_response(status, &headers, &response_text, endpoint)
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, request), fields(method = %request.method, endpoint = %request.endpoint, auth = %request.auth))]
    async fn execute(&self, request: ApiRequest) -> Result<Value, TwitterError> {
        let ApiRequest {
            method,
            mut endpoint,
            auth,
            mut body,
        } = request;

        let required = AuthStrategy::for_method(&method);
        if auth != required {
            return Err(TwitterError::InvalidParameters(format!(
                "{} requests must use {} auth, but {} was declared",
                method, required, auth
            )));
        }

        let context = self.auth.select(auth)?;

        if method == Method::GET {
            if let Some(id) = take_numeric_id(&mut body) {
                endpoint.push_segment(&id);
            }
        }

        let endpoint = endpoint.to_string();
        let url = self.build_url(&endpoint)?;
        let mut builder = self.client.request(method.clone(), url.clone());

        for (key, value) in &context.headers {
            builder = builder.header(key, value);
        }

        if let Some(signer) = &context.signer {
            let query: Vec<(String, String)> = url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            let mut signing_url = url.clone();
            signing_url.set_query(None);
            signing_url.set_fragment(None);

            let headers = signer.sign_request(
                method.as_str(),
                signing_url.as_str(),
                &query,
                Self::get_timestamp()?,
            )?;
            for (key, value) in headers {
                builder = builder.header(&key, &value);
            }
        }

        // An empty body is not sent at all; the API rejects `{}` on some routes
        if !body.is_empty() {
            let bytes = serde_json::to_vec(&body).map_err(|e| {
                TwitterError::SerializationError(format!("Failed to serialize request body: {}", e))
            })?;
            builder = builder.body(bytes);
        }

        debug!(url = %url, has_body = !body.is_empty(), "Sending request");

        let response = builder.send().await?;
        self.handle_response(response, &endpoint).await
    }

    #[instrument(skip(self, request), fields(method = %request.method, endpoint = %request.endpoint))]
    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, TwitterError> {
        self.execute(request).await.and_then(|value| {
            serde_json::from_value(value).map_err(|e| {
                TwitterError::DeserializationError(format!("Failed to deserialize JSON: {}", e))
            })
        })
    }

    fn set_bearer_token(&mut self, token: String) {
        self.auth.set_bearer_token(token);
    }
}

/// Pull a numeric `id` out of a GET body so it can become a path segment.
///
/// Accepts JSON numbers and strings that read as a plain decimal number.
pub(crate) fn take_numeric_id(body: &mut Map<String, Value>) -> Option<String> {
    let id = match body.get("id")? {
        Value::Number(n) => n.to_string(),
        Value::String(s) if is_numeric_str(s) => s.trim().to_string(),
        _ => return None,
    };
    body.remove("id");
    Some(id)
}

fn is_numeric_str(s: &str) -> bool {
    let t = s.trim();
    !t.is_empty()
        && t
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
        && t.parse::<f64>().is_ok_and(f64::is_finite)
}
