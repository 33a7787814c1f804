use std::net::SocketAddr;
use std::sync::Arc;

use mirage_api::config::ServerConfig;
use mirage_api::orchestrator::JobOrchestrator;
use mirage_api::state::AppState;
use mirage_api::{bootstrap, router};
use mirage_engines::{EngineRegistry, EngineSettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mirage_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Data directories ---
    bootstrap::ensure_data_dirs(&config)
        .await
        .expect("Failed to create data directories");

    // --- Database ---
    let pool = mirage_db::create_pool(&config.database_url)
        .await
        .expect("Failed to open database");
    tracing::info!(url = %config.database_url, "Database connection pool created");

    mirage_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    mirage_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // --- Offline models (background, non-blocking) ---
    let download_handle = bootstrap::spawn_model_download(config.models_dir());

    // --- Engines ---
    let settings = EngineSettings::new(&config.data_dir);
    let registry = Arc::new(EngineRegistry::with_settings(&settings));
    tracing::info!(default_engine = %registry.default_kind(), "Engine registry constructed");

    // --- Orchestrator ---
    let orchestrator = Arc::new(JobOrchestrator::new(pool.clone(), Arc::clone(&registry)));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        registry,
        orchestrator,
    };

    // --- Router ---
    let app = router::build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped accepting connections, cleaning up");
    download_handle.abort();
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
