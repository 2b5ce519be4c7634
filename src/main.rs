use anyhow::Context;
use twitterx::core::config::TwitterConfig;
use twitterx::twitter::build_client;
use twitterx::TwitterError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Reads TWITTER_* variables, from a .env file if one is present
    #[cfg(feature = "env-file")]
    let config = TwitterConfig::from_env_file().context("loading Twitter credentials")?;
    #[cfg(not(feature = "env-file"))]
    let config = TwitterConfig::from_env().context("loading Twitter credentials")?;
    let client = build_client(config)?;

    println!("Fetching authenticated user...");
    let me = match client.get_me().await {
        Ok(me) => me,
        Err(TwitterError::RateLimited {
            reset_timestamp, ..
        }) => {
            println!(
                "Rate limited, try again after {}",
                reset_timestamp.as_deref().unwrap_or("an unknown time")
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let user_id = me["data"]["id"]
        .as_str()
        .context("response had no data.id")?
        .to_string();
    println!(
        "Signed in as @{} ({})",
        me["data"]["username"].as_str().unwrap_or("?"),
        user_id
    );

    let page = client.get_liked_posts_page(&user_id, None).await?;
    let posts = page.data.unwrap_or_default();
    println!("First page has {} liked posts", posts.len());
    for post in posts.iter().take(5) {
        println!("  {}: {}", post.id, post.text);
    }
    if let Some(token) = page.meta.and_then(|m| m.next_token) {
        println!("More available, next token: {}", token);
    }

    Ok(())
}
