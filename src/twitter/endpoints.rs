//! Endpoint builders for the supported operations.
//!
//! Pure functions: no I/O, no client state. Each returns the relative
//! endpoint the executor resolves against the API base URI.

use crate::core::errors::TwitterError;
use crate::core::types::Endpoint;
use std::fmt::Display;

/// Fields requested on liked posts
pub const LIKED_POST_FIELDS: &str = "author_id";
/// Expansions for expanded post lookups
pub const POST_EXPANSIONS: &str = "referenced_tweets.id,author_id,attachments.media_keys";
pub const POST_FIELDS: &str = "created_at";
pub const USER_FIELDS: &str = "id,name,username,profile_image_url";
pub const MEDIA_FIELDS: &str = "url,type,width,height,preview_image_url,variants";

pub fn me() -> Endpoint {
    Endpoint::new("users/me")
}

/// `users/{user_id}/likes/{post_id}`, sent as DELETE
pub fn delete_like(user_id: impl Display, post_id: impl Display) -> Endpoint {
    Endpoint::new(format!("users/{}/likes/{}", user_id, post_id))
}

/// A page of the posts `user_id` liked. An empty token counts as no token.
pub fn liked_posts(user_id: impl Display, next_token: Option<&str>) -> Endpoint {
    let endpoint = Endpoint::new(format!("users/{}/liked_tweets", user_id))
        .with_query("tweet.fields", LIKED_POST_FIELDS);

    match next_token {
        Some(token) if !token.is_empty() => endpoint.with_query("pagination_token", token),
        _ => endpoint,
    }
}

/// Post lookup with author, referenced posts and media expanded.
///
/// Ids keep their input order. An empty list is rejected: the API would
/// answer a bare `ids=` with a 400 anyway.
pub fn expanded_posts<I: Display>(ids: &[I]) -> Result<Endpoint, TwitterError> {
    if ids.is_empty() {
        return Err(TwitterError::InvalidParameters(
            "expanded post lookup needs at least one id".to_string(),
        ));
    }

    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");

    Ok(Endpoint::new("tweets")
        .with_query("ids", joined)
        .with_query("expansions", POST_EXPANSIONS)
        .with_query("tweet.fields", POST_FIELDS)
        .with_query("user.fields", USER_FIELDS)
        .with_query("media.fields", MEDIA_FIELDS))
}
