use anyhow::Context as _;
use music_recommendation_service::{
    AppState, Dependencies, ServiceConfig, build_router, create_flow_runner, logging::init_tracing,
    steps::RecommendationState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use turn_flow::{InMemorySessionStorage, SessionStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env()?;
    init_tracing(
        config.log_format,
        "music_recommendation_service=debug,turn_flow=debug,tower_http=debug",
    );

    let deps = Dependencies::from_config(&config)?;
    let session_storage: Arc<dyn SessionStorage<RecommendationState>> =
        Arc::new(InMemorySessionStorage::new());
    let flow_runner = create_flow_runner(&deps, session_storage.clone());

    let app = build_router(AppState {
        flow_runner,
        session_storage,
    });

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Server running on http://{}", listener.local_addr()?);
    info!("  POST /execute        - Send a message, e.g. {{\"content\": \"I feel upbeat today\"}}");
    info!("  GET  /session/{{id}}   - Inspect a conversation");

    axum::serve(listener, app).await?;
    Ok(())
}
