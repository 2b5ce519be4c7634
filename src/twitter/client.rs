use crate::core::errors::TwitterError;
use crate::core::kernel::{ReqwestRest, RestClient};
use crate::core::types::{ApiRequest, Endpoint};
use crate::twitter::endpoints;
use crate::twitter::types::{ApiResponse, Post};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt::Display;
use tracing::instrument;

/// Client for the supported Twitter v2 operations.
///
/// Every call builds its endpoint fresh and hands it to the executor, so a
/// shared `&TwitterClient` is safe to use from several tasks at once.
#[derive(Debug)]
pub struct TwitterClient<R: RestClient = ReqwestRest> {
    rest: R,
}

impl<R: RestClient> TwitterClient<R> {
    pub fn new(rest: R) -> Self {
        Self { rest }
    }

    pub fn rest(&self) -> &R {
        &self.rest
    }

    /// Set or replace the bearer token used by read operations
    pub fn set_bearer_token(&mut self, token: impl Into<String>) {
        self.rest.set_bearer_token(token.into());
    }

    /// The authenticated user
    #[instrument(skip(self))]
    pub async fn get_me(&self) -> Result<Value, TwitterError> {
        self.rest.execute(ApiRequest::get(endpoints::me())).await
    }

    /// Remove `user_id`'s like from `post_id`. Signed with OAuth1.
    #[instrument(skip_all, fields(user_id = %user_id, post_id = %post_id))]
    pub async fn delete_like(
        &self,
        user_id: impl Display + Send,
        post_id: impl Display + Send,
    ) -> Result<Value, TwitterError> {
        let endpoint = endpoints::delete_like(user_id, post_id);
        self.rest.execute(ApiRequest::delete(endpoint)).await
    }

    /// One page of posts liked by `user_id`
    #[instrument(skip_all, fields(user_id = %user_id, paginated = next_token.is_some()))]
    pub async fn get_liked_posts(
        &self,
        user_id: impl Display + Send,
        next_token: Option<&str>,
    ) -> Result<Value, TwitterError> {
        let endpoint = endpoints::liked_posts(user_id, next_token);
        self.rest.execute(ApiRequest::get(endpoint)).await
    }

    /// Same as [`get_liked_posts`](Self::get_liked_posts) but typed, so the
    /// caller can follow `next_token()` to the next page.
    pub async fn get_liked_posts_page(
        &self,
        user_id: impl Display + Send,
        next_token: Option<&str>,
    ) -> Result<ApiResponse<Vec<Post>>, TwitterError> {
        let endpoint = endpoints::liked_posts(user_id, next_token);
        self.rest.execute_json(ApiRequest::get(endpoint)).await
    }

    /// Posts by id with author, referenced posts and media expanded
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn get_expanded_posts<I: Display + Sync>(
        &self,
        ids: &[I],
    ) -> Result<Value, TwitterError> {
        let endpoint = endpoints::expanded_posts(ids)?;
        self.rest.execute(ApiRequest::get(endpoint)).await
    }

    /// Generic call surface.
    ///
    /// The auth strategy follows the method: GET uses the bearer token,
    /// anything else is OAuth1 signed. For GET, a numeric `id` in `body` is
    /// moved onto the path (`users/me` + `{"id": 42}` → `users/me/42`).
    /// A non-empty body is sent as JSON; an empty one is not sent.
    pub async fn perform_request(
        &self,
        method: Method,
        endpoint: impl Into<Endpoint> + Send,
        body: Map<String, Value>,
    ) -> Result<Value, TwitterError> {
        self.rest
            .execute(ApiRequest::new(method, endpoint).with_body(body))
            .await
    }

    /// [`perform_request`](Self::perform_request) with a typed response
    pub async fn perform_request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: impl Into<Endpoint> + Send,
        body: Map<String, Value>,
    ) -> Result<T, TwitterError> {
        self.rest
            .execute_json(ApiRequest::new(method, endpoint).with_body(body))
            .await
    }

    /// Run a fully described request, declared auth strategy included
    pub async fn execute(&self, request: ApiRequest) -> Result<Value, TwitterError> {
        self.rest.execute(request).await
    }
}
