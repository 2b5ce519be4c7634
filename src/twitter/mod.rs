pub mod builder;
pub mod client;
pub mod endpoints;
pub mod types;

// Re-export main components
pub use builder::{build_client, TwitterBuilder};
pub use client::TwitterClient;
pub use types::{
    ApiResponse, Attachments, Includes, LikeStatus, Media, MediaVariant, Meta, Post,
    ReferencedPost, User,
};
