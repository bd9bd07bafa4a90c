//! Router assembly and shared application state.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::proxy;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}

/// Build the gateway router: proxy routes, health probe, and the dashboard
/// bundle with an SPA index fallback for everything else.
pub fn router(state: AppState) -> Router {
    let static_dir = &state.config.static_files.dir;
    let static_files = ServeDir::new(static_dir)
        .fallback(ServeFile::new(static_dir.join(&state.config.static_files.index)));

    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(proxy::login))
        .route("/api/task", post(proxy::create_task))
        .route("/api/task/byfilter", post(proxy::filter_tasks))
        .route(
            "/api/task/{id}",
            put(proxy::update_task).delete(proxy::delete_task),
        )
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &GatewayConfig) -> CorsLayer {
    let cors = &config.server.cors;
    if cors.allow_any_origin {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn health() -> &'static str {
    "OK"
}
