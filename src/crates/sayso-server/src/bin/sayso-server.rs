//! sayso server binary.
//!
//! Wires the in-memory store, the OpenAI client, the action registry, and
//! the whisper pipeline into one HTTP service.

use std::sync::Arc;

use llm::OpenAiClient;
use sayso_core::{ChatModel, Dispatcher};
use sayso_server::api::routes::{create_router, AppState};
use sayso_server::{build_registry, ServerConfig};
use store::{MemoryStore, PostStore, TodoStore};
use transcribe::Whisper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    let config = match ServerConfig::load() {
        Ok(cfg) => {
            tracing::info!("configuration loaded");
            cfg
        }
        Err(e) => {
            tracing::warn!("failed to load configuration: {e}. Using defaults.");
            ServerConfig::default()
        }
    };

    tracing::info!("model: {}", config.llm.model);
    tracing::info!("whisper dir: {}", config.whisper.dir.display());

    let llm_config = config.llm.to_llm_config()?;
    let client = OpenAiClient::new(llm_config)?;

    let store = MemoryStore::new();
    let todos: Arc<dyn TodoStore> = Arc::new(store.clone());
    let posts: Arc<dyn PostStore> = Arc::new(store);

    let registry = Arc::new(build_registry(todos.clone(), posts.clone()));
    tracing::info!("registered actions: {}", registry.len());

    let model: Arc<dyn ChatModel> = Arc::new(client);
    let dispatcher = Dispatcher::new(registry, model.clone());
    let whisper = Arc::new(Whisper::new(config.whisper.to_whisper_config()));

    let state = AppState {
        dispatcher,
        model,
        todos,
        posts,
        whisper,
    };
    let app = create_router(state);

    let addr = config.bind_addr();
    tracing::info!("starting sayso server on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("sayso server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL-C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM signal, shutting down");
        }
    }
}
