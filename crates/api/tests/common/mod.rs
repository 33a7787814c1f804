use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mirage_api::config::ServerConfig;
use mirage_api::orchestrator::JobOrchestrator;
use mirage_api::router::build_app_router;
use mirage_api::state::AppState;
use mirage_engines::{EngineRegistry, EngineSettings};
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Build a test `ServerConfig` rooted at a temporary data directory.
pub fn test_config(data_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: "sqlite::memory:".to_string(),
        data_dir: data_dir.to_path_buf(),
        static_dir: data_dir.join("static"),
    }
}

/// Engine settings that render instantly; `failure_rate` pins InfiniteTalk
/// to deterministic success (0.0) or failure (1.0).
pub fn test_settings(data_dir: &Path, failure_rate: f64) -> EngineSettings {
    EngineSettings {
        outputs_dir: data_dir.join("outputs"),
        models_dir: data_dir.join("models"),
        render_delay: Duration::ZERO,
        failure_rate,
    }
}

/// Place InfiniteTalk's surrogate model file so its model check passes.
pub fn place_infinitetalk_model(data_dir: &Path) {
    let models_dir = data_dir.join("models");
    std::fs::create_dir_all(&models_dir).unwrap();
    std::fs::write(
        models_dir.join(mirage_engines::download::INFINITETALK_MODEL_FILE),
        b"{}",
    )
    .unwrap();
}

/// Build the full application router with all middleware layers, using the
/// given database pool and a fast progress cadence.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(pool: SqlitePool, data_dir: &Path, failure_rate: f64) -> Router {
    let config = test_config(data_dir);
    let settings = test_settings(data_dir, failure_rate);
    let registry = Arc::new(EngineRegistry::with_settings(&settings));
    let orchestrator = Arc::new(
        JobOrchestrator::new(pool.clone(), Arc::clone(&registry))
            .with_progress_interval(Duration::from_millis(5)),
    );

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        registry,
        orchestrator,
    };

    build_app_router(state, &config)
}

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body to the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll a job's status endpoint until it reaches a terminal state.
///
/// Engines in tests render instantly, so a short deadline is plenty; a job
/// that never terminates fails the test here rather than hanging it.
pub async fn poll_until_terminal(app: &Router, job_id: &str) -> serde_json::Value {
    for _ in 0..200 {
        let response = get(app.clone(), &format!("/api/jobs/{job_id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;

        match json["status"].as_str() {
            Some("completed") | Some("failed") => return json,
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("job {job_id} never reached a terminal state");
}
