use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard v2 response envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub includes: Includes,
    #[serde(default)]
    pub meta: Option<Meta>,
    /// Partial errors, e.g. one of several requested ids was deleted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Value>,
}

impl<T> ApiResponse<T> {
    /// Cursor for the next page, if there is one
    pub fn next_token(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.next_token.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub tweets: Vec<Post>,
    #[serde(default)]
    pub media: Vec<Media>,
}

impl Includes {
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn post(&self, id: &str) -> Option<&Post> {
        self.tweets.iter().find(|p| p.id == id)
    }

    pub fn media(&self, media_key: &str) -> Option<&Media> {
        self.media.iter().find(|m| m.media_key == media_key)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Meta {
    pub result_count: Option<u32>,
    pub next_token: Option<String>,
    pub previous_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub author_id: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub referenced_tweets: Vec<ReferencedPost>,
    pub attachments: Option<Attachments>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReferencedPost {
    /// `retweeted`, `quoted` or `replied_to`
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Attachments {
    #[serde(default)]
    pub media_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Media {
    pub media_key: String,
    /// `photo`, `video` or `animated_gif`
    #[serde(rename = "type")]
    pub kind: String,
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub preview_image_url: Option<String>,
    #[serde(default)]
    pub variants: Vec<MediaVariant>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaVariant {
    pub bit_rate: Option<u64>,
    pub content_type: String,
    pub url: String,
}

/// Body of a like/unlike response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LikeStatus {
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_expanded_posts_response() {
        let raw = json!({
            "data": [{
                "id": "1",
                "text": "hello",
                "author_id": "100",
                "created_at": "2023-11-14T22:13:20.000Z",
                "referenced_tweets": [{"type": "quoted", "id": "2"}],
                "attachments": {"media_keys": ["3_1"]}
            }],
            "includes": {
                "users": [{
                    "id": "100",
                    "name": "Someone",
                    "username": "someone",
                    "profile_image_url": "https://pbs.twimg.com/a.jpg"
                }],
                "tweets": [{"id": "2", "text": "quoted post"}],
                "media": [{
                    "media_key": "3_1",
                    "type": "video",
                    "width": 1280,
                    "height": 720,
                    "preview_image_url": "https://pbs.twimg.com/p.jpg",
                    "variants": [
                        {"content_type": "application/x-mpegURL", "url": "https://video.twimg.com/a.m3u8"},
                        {"bit_rate": 2_176_000, "content_type": "video/mp4", "url": "https://video.twimg.com/a.mp4"}
                    ]
                }]
            }
        });

        let response: ApiResponse<Vec<Post>> = serde_json::from_value(raw).unwrap();
        let posts = response.data.as_ref().unwrap();
        assert_eq!(posts.len(), 1);

        let post = &posts[0];
        assert_eq!(post.referenced_tweets[0].kind, "quoted");
        assert_eq!(
            response.includes.user(post.author_id.as_deref().unwrap()).unwrap().username,
            "someone"
        );
        assert_eq!(response.includes.post("2").unwrap().text, "quoted post");

        let media = response
            .includes
            .media(&post.attachments.as_ref().unwrap().media_keys[0])
            .unwrap();
        assert_eq!(media.kind, "video");
        assert_eq!(media.variants.len(), 2);
        assert_eq!(media.variants[1].bit_rate, Some(2_176_000));
        assert!(response.next_token().is_none());
    }

    #[test]
    fn test_parse_liked_posts_page_with_cursor() {
        let raw = json!({
            "data": [{"id": "9", "text": "liked", "author_id": "5"}],
            "meta": {"result_count": 1, "next_token": "7140dibdnow9c7btw3w29grvxfcgvpb9n9coehpk7xz5i"}
        });

        let response: ApiResponse<Vec<Post>> = serde_json::from_value(raw).unwrap();
        assert_eq!(
            response.next_token(),
            Some("7140dibdnow9c7btw3w29grvxfcgvpb9n9coehpk7xz5i")
        );
        assert!(response.includes.users.is_empty());
    }

    #[test]
    fn test_parse_partial_errors() {
        let raw = json!({
            "errors": [{"value": "404", "detail": "Could not find tweet with ids: [404]."}]
        });

        let response: ApiResponse<Vec<Post>> = serde_json::from_value(raw).unwrap();
        assert!(response.data.is_none());
        assert_eq!(response.errors.len(), 1);
    }

    #[test]
    fn test_parse_like_status() {
        let response: ApiResponse<LikeStatus> =
            serde_json::from_value(json!({"data": {"liked": false}})).unwrap();
        assert_eq!(response.data, Some(LikeStatus { liked: false }));
    }
}
