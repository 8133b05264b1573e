use std::env;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use ragchat_backend::core;
use ragchat_backend::core::config::AppPaths;
use ragchat_backend::server;
use ragchat_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let command = env::args().nth(1).unwrap_or_else(|| "serve".to_string());

    let paths = Arc::new(AppPaths::new());
    core::logging::init(&paths);

    let state = AppState::initialize(paths).await?;

    match command.as_str() {
        "serve" => serve(state).await,
        "ingest" => {
            let corpus_path = &state.settings.rag.corpus_path;
            let records = state
                .ingestor
                .ingest_file(corpus_path)
                .await
                .with_context(|| format!("Failed to ingest {}", corpus_path.display()))?;
            tracing::info!("Embeddings saved ({} records)", records.len());
            Ok(())
        }
        other => anyhow::bail!("Unknown command '{}' (expected 'serve' or 'ingest')", other),
    }
}

async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let bind_addr = state.settings.bind_addr();

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    tracing::info!("Listening on {}", addr);
    if !state.chat.store().exists().await {
        tracing::warn!("Vector store not found; call GET /embed or run `ingest` first");
    }

    let app: Router = server::router(state.clone());

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
