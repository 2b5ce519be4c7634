use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// Versioned REST root every endpoint is resolved against.
pub const API_BASE_URI: &str = "https://api.twitter.com/2/";

/// Default request timeout when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// OAuth 1.0a user-context credentials. Immutable once built.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    consumer_key: Secret<String>,
    consumer_secret: Secret<String>,
    access_token: Secret<String>,
    access_token_secret: Secret<String>,
}

impl ClientCredentials {
    pub fn new(
        consumer_key: String,
        consumer_secret: String,
        access_token: String,
        access_token_secret: String,
    ) -> Self {
        Self {
            consumer_key: Secret::new(consumer_key),
            consumer_secret: Secret::new(consumer_secret),
            access_token: Secret::new(access_token),
            access_token_secret: Secret::new(access_token_secret),
        }
    }

    /// True when all four fields are non-empty
    pub fn is_complete(&self) -> bool {
        [
            &self.consumer_key,
            &self.consumer_secret,
            &self.access_token,
            &self.access_token_secret,
        ]
        .iter()
        .all(|s| !s.expose_secret().is_empty())
    }

    pub fn consumer_key(&self) -> &str {
        self.consumer_key.expose_secret()
    }

    pub fn consumer_secret(&self) -> &str {
        self.consumer_secret.expose_secret()
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn access_token_secret(&self) -> &str {
        self.access_token_secret.expose_secret()
    }
}

#[derive(Debug, Clone)]
pub struct TwitterConfig {
    pub credentials: ClientCredentials,
    pub bearer_token: Option<Secret<String>>,
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for TwitterConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("TwitterConfig", 7)?;
        state.serialize_field("consumer_key", "[REDACTED]")?;
        state.serialize_field("consumer_secret", "[REDACTED]")?;
        state.serialize_field("access_token", "[REDACTED]")?;
        state.serialize_field("access_token_secret", "[REDACTED]")?;
        state.serialize_field(
            "bearer_token",
            &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
        )?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for TwitterConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct TwitterConfigHelper {
            consumer_key: String,
            consumer_secret: String,
            access_token: String,
            access_token_secret: String,
            #[serde(default)]
            bearer_token: Option<String>,
            #[serde(default)]
            base_url: Option<String>,
            #[serde(default = "default_timeout_seconds")]
            timeout_seconds: u64,
        }

        let helper = TwitterConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            credentials: ClientCredentials::new(
                helper.consumer_key,
                helper.consumer_secret,
                helper.access_token,
                helper.access_token_secret,
            ),
            bearer_token: helper.bearer_token.map(Secret::new),
            base_url: helper.base_url,
            timeout_seconds: helper.timeout_seconds,
        })
    }
}

const fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl TwitterConfig {
    /// Create a new configuration with OAuth 1.0a credentials
    #[must_use]
    pub fn new(
        consumer_key: String,
        consumer_secret: String,
        access_token: String,
        access_token_secret: String,
    ) -> Self {
        Self {
            credentials: ClientCredentials::new(
                consumer_key,
                consumer_secret,
                access_token,
                access_token_secret,
            ),
            bearer_token: None,
            base_url: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `TWITTER_CONSUMER_KEY`
    /// - `TWITTER_CONSUMER_SECRET`
    /// - `TWITTER_ACCESS_TOKEN`
    /// - `TWITTER_ACCESS_TOKEN_SECRET`
    /// - `TWITTER_BEARER_TOKEN` (optional, needed for read endpoints)
    /// - `TWITTER_BASE_URL` (optional)
    /// - `TWITTER_TIMEOUT_SECONDS` (optional, defaults to 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let consumer_key = required_var("TWITTER_CONSUMER_KEY")?;
        let consumer_secret = required_var("TWITTER_CONSUMER_SECRET")?;
        let access_token = required_var("TWITTER_ACCESS_TOKEN")?;
        let access_token_secret = required_var("TWITTER_ACCESS_TOKEN_SECRET")?;

        let timeout_seconds = match env::var("TWITTER_TIMEOUT_SECONDS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidConfiguration(format!(
                    "TWITTER_TIMEOUT_SECONDS must be a whole number of seconds: {}",
                    e
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECONDS,
        };

        Ok(Self {
            credentials: ClientCredentials::new(
                consumer_key,
                consumer_secret,
                access_token,
                access_token_secret,
            ),
            bearer_token: env::var("TWITTER_BEARER_TOKEN")
                .ok()
                .filter(|t| !t.is_empty())
                .map(Secret::new),
            base_url: env::var("TWITTER_BASE_URL").ok().filter(|u| !u.is_empty()),
            timeout_seconds,
        })
    }

    /// Create configuration from a .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file() -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(".env")
    }

    /// Create configuration from a specific .env file path
    ///
    /// A missing file is not an error; system environment variables still apply.
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(_) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env()
    }

    /// Set the bearer token used for read endpoints
    #[must_use]
    pub fn bearer_token(mut self, token: String) -> Self {
        self.bearer_token = Some(Secret::new(token));
        self
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set request timeout in seconds
    #[must_use]
    pub const fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn has_bearer_token(&self) -> bool {
        self.bearer_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
    }

    /// Base URL to resolve endpoints against, always ending in `/`
    pub fn resolved_base_url(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or(API_BASE_URI);
        if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        }
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingEnvironmentVariable(name.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> TwitterConfig {
        TwitterConfig::new(
            "ck".to_string(),
            "cs".to_string(),
            "at".to_string(),
            "token-secret-xyz".to_string(),
        )
    }

    #[test]
    fn test_serialize_redacts_secrets() {
        let config = sample_config().bearer_token("bearer-secret".to_string());
        let json = serde_json::to_string(&config).unwrap();

        assert!(json.contains("[REDACTED]"));
        assert!(!json.contains("\"ck\""));
        assert!(!json.contains("bearer-secret"));
    }

    #[test]
    fn test_debug_does_not_leak_secrets() {
        let config = sample_config().bearer_token("bearer-secret".to_string());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("bearer-secret"));
        assert!(!debug.contains("token-secret-xyz"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: TwitterConfig = serde_json::from_str(
            r#"{"consumer_key":"a","consumer_secret":"b","access_token":"c","access_token_secret":"d"}"#,
        )
        .unwrap();

        assert_eq!(config.credentials.consumer_key(), "a");
        assert_eq!(config.credentials.access_token_secret(), "d");
        assert!(!config.has_bearer_token());
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.resolved_base_url(), API_BASE_URI);
    }

    #[test]
    fn test_resolved_base_url_adds_trailing_slash() {
        let config = sample_config().base_url("http://127.0.0.1:8080/2".to_string());
        assert_eq!(config.resolved_base_url(), "http://127.0.0.1:8080/2/");
    }

    #[test]
    fn test_credentials_completeness() {
        assert!(sample_config().credentials.is_complete());

        let partial = ClientCredentials::new(
            "ck".to_string(),
            String::new(),
            "at".to_string(),
            "ats".to_string(),
        );
        assert!(!partial.is_complete());
    }
}
