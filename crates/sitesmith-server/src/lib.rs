//! SiteSmith Server
//!
//! Streams website generations over HTTP as Server-Sent Events.
//! This is a library crate. The server is started via `start_server()`.

use std::net::SocketAddr;

use axum::{
    http::{Method, Uri},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use sitesmith_core::{GenerationDeps, GeneratorConfig};

pub mod error;
pub mod routes;
pub mod types;

use error::AppError;
use types::HealthResponse;

pub const DEFAULT_PORT: u16 = 3000;

/// Configuration for starting the server.
pub struct ServerConfig {
    /// Port to listen on (default: 3000).
    pub port: u16,
    /// Generator settings shared by every request.
    pub config: GeneratorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            config: GeneratorConfig::default(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cloned into every generation session
    pub deps: GenerationDeps,
}

impl AppState {
    pub fn new(deps: GenerationDeps) -> Self {
        Self { deps }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", routes::api_router())
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the SiteSmith server and block until shutdown.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    if config.config.api_key.is_none() {
        tracing::warn!("No API key configured; generations will fail until one is set");
    }
    let app = build_router(AppState::new(GenerationDeps::new(config.config)));

    tracing::info!("SiteSmith server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn root() -> &'static str {
    "SiteSmith Server"
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use sitesmith_core::agent::{ScriptStep, ScriptedAgent};
    use tower::ServiceExt;

    const PAGE: &str = "<!DOCTYPE html>\n<html>\n<head>\n\
        <script src=\"https://cdn.tailwindcss.com\"></script>\n\
        <script defer src=\"https://cdn.jsdelivr.net/npm/alpinejs@3.x.x/dist/cdn.min.js\"></script>\n\
        </head>\n<body><h1>Hello</h1></body>\n</html>\n";

    fn app(steps: Vec<ScriptStep>) -> Router {
        let deps = GenerationDeps::new(GeneratorConfig::default())
            .with_agent_factory(ScriptedAgent::factory(steps))
            .with_system_prompt("test prompt");
        build_router(AppState::new(deps))
    }

    fn post_generate(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(body: Body) -> Value {
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn sse_events(text: &str) -> Vec<Value> {
        text.lines()
            .filter_map(|line| line.strip_prefix("data: "))
            .map(|data| serde_json::from_str(data).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Vec::new())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app(Vec::new())
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response.into_body()).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_empty_prompt_is_bad_request() {
        let response = app(Vec::new())
            .oneshot(post_generate(r#"{"prompt": ""}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["error"], "prompt must not be empty");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let response = app(Vec::new())
            .oneshot(post_generate("not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_streams_events_until_complete() {
        let steps = vec![ScriptStep::call(
            "write_page",
            json!({"filename": "index.html", "html": PAGE}),
        )];
        let response = app(steps)
            .oneshot(post_generate(r#"{"prompt": "A landing page"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/event-stream"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let events = sse_events(&String::from_utf8(bytes.to_vec()).unwrap());

        let page = events.iter().position(|e| e["type"] == "page").unwrap();
        assert_eq!(events[page]["filename"], "index.html");

        let last = events.last().unwrap();
        assert_eq!(last["type"], "complete");
        assert_eq!(last["spec"]["name"], "Untitled Site");
        assert!(page < events.len() - 1);
    }

    #[tokio::test]
    async fn test_generate_without_pages_ends_with_error() {
        let response = app(vec![ScriptStep::Say("Nothing to do".into())])
            .oneshot(post_generate(r#"{"prompt": "Anything"}"#))
            .await
            .unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let events = sse_events(&String::from_utf8(bytes.to_vec()).unwrap());

        let last = events.last().unwrap();
        assert_eq!(last["type"], "error");
        assert_eq!(last["message"], "No pages were generated");
    }
}
