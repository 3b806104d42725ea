//! Barrage server entry point

mod config;

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use barrage_core::AuthToken;
use barrage_engine::Engine;
use barrage_service::router;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,barrage_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let engine = Arc::new(Engine::new());
    // The admin token exists only in memory; without this line there is
    // no way to administer the server.
    tracing::info!(token = %engine.admin_token(), "admin token");

    if let Some(seed) = &config.seed {
        let admin = engine.admin_token().as_str().to_string();
        let desc = engine.new_activity_with_tokens(
            &admin,
            &seed.name,
            AuthToken::from_raw(seed.comment_token.clone()),
            AuthToken::from_raw(seed.review_token.clone()),
            AuthToken::from_raw(seed.display_token.clone()),
        )?;
        tracing::info!(activity = %desc.id, name = %desc.name, "seed activity created");
    }

    let app = router(Arc::clone(&engine));

    tracing::info!(addr = %config.listen_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
