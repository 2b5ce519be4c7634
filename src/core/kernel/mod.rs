//! Transport kernel: authentication, request execution, response classification.
//!
//! The kernel knows nothing about individual API operations. It takes an
//! [`ApiRequest`](crate::core::types::ApiRequest), resolves the declared
//! authentication, sends it and turns the response into either the decoded
//! JSON body or a [`TwitterError`](crate::core::errors::TwitterError).
//!
//! ## Authentication
//! - `AuthSelector`: bearer header for reads, OAuth 1.0a signer for writes
//! - `Signer`: pluggable signing interface, `OAuth1Signer` by default
//!
//! ## Transport
//! - `RestClient`: executor interface, mockable in tests
//! - `ReqwestRest`: reqwest implementation
//!
//! ## Classification
//! - `classify_response`: success, generic failure or rate limit
//!
//! ```rust,no_run
//! use twitterx::core::config::ClientCredentials;
//! use twitterx::core::kernel::*;
//! use twitterx::core::types::ApiRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = ClientCredentials::new(
//!     "consumer_key".to_string(),
//!     "consumer_secret".to_string(),
//!     "access_token".to_string(),
//!     "access_token_secret".to_string(),
//! );
//! let mut rest = RestClientBuilder::new(
//!     RestClientConfig::default(),
//!     AuthSelector::new(credentials, None),
//! )
//! .build()?;
//! rest.set_bearer_token("bearer".to_string());
//!
//! let me = rest.execute(ApiRequest::get("users/me")).await?;
//! println!("{}", me);
//! # Ok(())
//! # }
//! ```
pub mod auth;
pub mod classifier;
pub mod rest;
pub mod signer;

// Re-export key types for convenience
pub use auth::{AuthContext, AuthSelector, AuthStrategy};
pub use classifier::{classify_response, ResponseClass};
pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{OAuth1Signer, SignatureResult, Signer};
