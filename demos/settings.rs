//! Logs in through the JWT plugin, checks the token and reads site settings.
//!
//! Expects `WP_API_ROOT` (e.g. `https://example.com/wp-json`), `WP_USER` and
//! `WP_PASSWORD` in the environment.
//!
//! Run with: `cargo run --example settings`

use wpclient::{AuthMethod, Client, Error, PageQuery};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("wpclient=debug,settings=info")
        .init();

    let api_root = std::env::var("WP_API_ROOT").unwrap_or_default();
    let username = std::env::var("WP_USER").unwrap_or_default();
    let password = std::env::var("WP_PASSWORD").unwrap_or_default();

    // Fails fast if WP_API_ROOT is unset
    let client = Client::new(&api_root)?;
    println!("API root: {}", client.api_root());

    println!("=== Authentication ===");
    let user = client.authenticate(&username, &password).await?;
    println!("Logged in as {:?}", user.user_display_name);
    client.set_auth_method(AuthMethod::Jwt);
    println!("Token valid: {}", client.validate_token().await?);
    println!();

    println!("=== Settings ===");
    let settings = client.get_settings().await?;
    println!("Title: {:?}", settings.title);
    println!("Timezone: {:?}", settings.timezone);
    println!("Posts per page: {:?}", settings.posts_per_page);
    println!();

    println!("=== Categories ===");
    let categories = client
        .get_all::<serde_json::Value>("wp/v2/categories", PageQuery::new().per_page(50))
        .await?;
    for category in &categories {
        println!("- {}", category["name"]);
    }

    Ok(())
}
