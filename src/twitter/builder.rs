use crate::core::config::TwitterConfig;
use crate::core::errors::TwitterError;
use crate::core::kernel::{
    AuthSelector, ReqwestRest, RestClientBuilder, RestClientConfig, Signer,
};
use crate::twitter::client::TwitterClient;
use std::sync::Arc;
use tracing::warn;

/// Builder for [`TwitterClient`]
///
/// Fluent interface over credentials, bearer token, base URL and transport
/// settings. Read-only use with just a bearer token is allowed; write
/// operations then fail at the API.
pub struct TwitterBuilder {
    config: TwitterConfig,
    user_agent: Option<String>,
    signer: Option<Arc<dyn Signer>>,
}

impl Default for TwitterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TwitterBuilder {
    /// Create a new `TwitterBuilder` with empty credentials
    pub fn new() -> Self {
        Self {
            config: TwitterConfig::new(String::new(), String::new(), String::new(), String::new()),
            user_agent: None,
            signer: None,
        }
    }

    /// Set the whole configuration at once
    pub fn with_config(mut self, config: TwitterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set OAuth 1.0a credentials, keeping the other settings
    pub fn with_credentials(
        mut self,
        consumer_key: String,
        consumer_secret: String,
        access_token: String,
        access_token_secret: String,
    ) -> Self {
        let fresh = TwitterConfig::new(
            consumer_key,
            consumer_secret,
            access_token,
            access_token_secret,
        );
        self.config.credentials = fresh.credentials;
        self
    }

    pub fn with_bearer_token(mut self, token: String) -> Self {
        self.config = self.config.bearer_token(token);
        self
    }

    /// Point the client somewhere other than the public API
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.base_url = Some(base_url);
        self
    }

    /// Set REST client timeout in seconds
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = Some(user_agent);
        self
    }

    /// Replace the OAuth1 signer used for write requests
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn build(self) -> Result<TwitterClient<ReqwestRest>, TwitterError> {
        if !self.config.credentials.is_complete() && self.signer.is_none() {
            warn!("OAuth1 credentials incomplete; write requests will be rejected by the API");
        }

        let mut rest_config = RestClientConfig::new(self.config.resolved_base_url())
            .with_timeout(self.config.timeout_seconds);
        if let Some(user_agent) = self.user_agent {
            rest_config = rest_config.with_user_agent(user_agent);
        }

        let mut auth = AuthSelector::new(
            self.config.credentials.clone(),
            self.config.bearer_token.clone(),
        );
        if let Some(signer) = self.signer {
            auth = auth.with_signer(signer);
        }

        let rest = RestClientBuilder::new(rest_config, auth).build()?;
        Ok(TwitterClient::new(rest))
    }
}

/// Create a client straight from configuration
pub fn build_client(config: TwitterConfig) -> Result<TwitterClient<ReqwestRest>, TwitterError> {
    TwitterBuilder::new().with_config(config).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::API_BASE_URI;

    fn config() -> TwitterConfig {
        TwitterConfig::new(
            "ck".to_string(),
            "cs".to_string(),
            "at".to_string(),
            "ats".to_string(),
        )
    }

    #[test]
    fn test_build_client_defaults_to_public_api() {
        let client = build_client(config()).unwrap();
        assert_eq!(client.rest().config().base_url, API_BASE_URI);
    }

    #[test]
    fn test_builder_without_credentials_still_builds() {
        let client = TwitterBuilder::new()
            .with_bearer_token("token".to_string())
            .build();
        assert!(client.is_ok());
    }

    #[test]
    fn test_builder_settings_reach_transport() {
        let client = TwitterBuilder::new()
            .with_config(config())
            .with_base_url("http://localhost:9000/2".to_string())
            .with_timeout(5)
            .with_user_agent("tests/1.0".to_string())
            .build()
            .unwrap();

        let rest_config = client.rest().config();
        assert_eq!(rest_config.base_url, "http://localhost:9000/2/");
        assert_eq!(rest_config.timeout_seconds, 5);
        assert_eq!(rest_config.user_agent, "tests/1.0");
    }

    #[test]
    fn test_with_credentials_keeps_bearer_token() {
        let builder = TwitterBuilder::new()
            .with_bearer_token("token".to_string())
            .with_credentials(
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
            );

        assert!(builder.config.has_bearer_token());
        assert!(builder.config.credentials.is_complete());
    }
}
