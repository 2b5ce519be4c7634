pub mod core;
pub mod twitter;

pub use core::{
    config::{ClientCredentials, TwitterConfig},
    errors::TwitterError,
    kernel::AuthStrategy,
    types::{ApiRequest, Endpoint},
};
pub use twitter::{TwitterBuilder, TwitterClient};
