use crate::core::kernel::auth::AuthStrategy;
use reqwest::Method;
use serde_json::{Map, Value};
use std::fmt;

/// Relative API path plus ordered query parameters.
///
/// Rendering is verbatim: values are written exactly as given, so
/// `ids=1,2,3` stays readable. Percent-encoding happens in the transport.
/// A key parsed without `=` has no value and renders back without one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Endpoint {
    path: String,
    query: Vec<(String, Option<String>)>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Parse a raw `path?k=v&k=v` string
    pub fn parse(raw: &str) -> Self {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, query),
            None => (raw, ""),
        };

        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (k.to_string(), Some(v.to_string())),
                None => (pair.to_string(), None),
            })
            .collect();

        Self {
            path: path.to_string(),
            query,
        }
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), Some(value.into())));
        self
    }

    /// Append `/{segment}` to the path, leaving the query alone
    pub fn push_segment(&mut self, segment: &str) {
        let trimmed = self.path.trim_end_matches('/').len();
        self.path.truncate(trimmed);
        self.path.push('/');
        self.path.push_str(segment);
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, Option<String>)] {
        &self.query
    }

    /// Value of the first `key` parameter; a bare key reads as `""`
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}", sep, k)?;
            if let Some(v) = v {
                write!(f, "={}", v)?;
            }
        }
        Ok(())
    }
}

impl From<&str> for Endpoint {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for Endpoint {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// One call through the request pipeline.
///
/// The auth strategy is declared up front; the executor refuses a request
/// whose declaration contradicts its method.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: Endpoint,
    pub auth: AuthStrategy,
    pub body: Map<String, Value>,
}

impl ApiRequest {
    /// Request whose auth strategy follows from its method
    pub fn new(method: Method, endpoint: impl Into<Endpoint>) -> Self {
        let auth = AuthStrategy::for_method(&method);
        Self {
            method,
            endpoint: endpoint.into(),
            auth,
            body: Map::new(),
        }
    }

    pub fn get(endpoint: impl Into<Endpoint>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn delete(endpoint: impl Into<Endpoint>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    #[must_use]
    pub fn with_auth(mut self, auth: AuthStrategy) -> Self {
        self.auth = auth;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = body;
        self
    }
}
