use activity_recommender::{
    api::{create_router, AppState},
    config::Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("activity_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // The catalog must load before any request is served
    let state = AppState::from_config(&config)?;

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
