use std::sync::Arc;

use ideabox::{AppState, Assist, Config, HttpImproveService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ideabox=debug,info")),
        )
        .init();

    let database_url =
        dotenv::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://ideabox.db?mode=rwc".to_owned());
    let db_pool = ideabox::db::connect(&database_url).await?;

    let state = AppState {
        db_pool,
        assist: Assist(Arc::new(HttpImproveService::from_env()?)),
        config: Config::from_env(),
    };

    let bind_addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "ideabox listening");
    axum::serve(listener, ideabox::app(state)).await?;

    Ok(())
}
