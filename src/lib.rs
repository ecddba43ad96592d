pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use store::{ContactStore, CredentialStore};

/// Shared service dependencies, injected into handlers and the auth
/// middleware through axum state. Both stores are trait objects so the
/// postgres and in-memory backends are interchangeable.
#[derive(Clone)]
pub struct AppState {
    pub contacts: Arc<dyn ContactStore>,
    pub users: Arc<dyn CredentialStore>,
}

/// Assemble the full application router. Lives in the library so
/// integration tests can run the app in-process.
pub fn app(state: AppState) -> Router {
    // Everything under /contact/ and /search/ sits behind basic auth
    let protected = Router::new()
        .route(
            "/contact/",
            get(handlers::contact::contact_list).post(handlers::contact::contact_post),
        )
        .route(
            "/contact/:id/",
            get(handlers::contact::contact_get)
                .put(handlers::contact::contact_put)
                .delete(handlers::contact::contact_delete),
        )
        .route("/search/", get(handlers::search::get))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::basic_auth_middleware,
        ));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Contact API",
        "version": version,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "contacts": "/contact/[:id/] (basic auth)",
            "search": "/search/?name=X | ?email_address=X (basic auth)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.contacts.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
