use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::server::handlers::{chat, embed, health};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// This function sets up:
/// - CORS middleware
/// - Health check endpoint
/// - Chat and ingestion endpoints
/// - Static file serving from the configured public directory
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = build_cors_layer(&state);
    let public_dir = state
        .settings
        .server
        .public_dir
        .clone()
        .filter(|dir| dir.is_dir());

    let mut app = Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/chat",
            post(chat::chat).fallback(chat::method_not_allowed),
        )
        .route(
            "/embed",
            get(embed::embed).fallback(embed::method_not_allowed),
        );

    if let Some(dir) = public_dir {
        tracing::info!("Serving static files from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.with_state(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}

/// An empty `server.cors_allowed_origins` list allows every origin so the
/// chat widget can be embedded on third-party pages.
fn build_cors_layer(state: &Arc<AppState>) -> CorsLayer {
    let configured = &state.settings.server.cors_allowed_origins;
    let allow_origin = if configured.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            configured
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect::<Vec<_>>(),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
}
