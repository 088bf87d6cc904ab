//! Tollgate application composition root
//!
//! Mounts the token routes and the demonstration endpoints behind the
//! authentication middleware.

use axum::{
    extract::FromRef,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tollgate_auth::{authenticate, AuthBackend, CurrentUser};

/// Shared state for all routes
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthBackend,
}

impl FromRef<AppState> for AuthBackend {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Create the main application router with all routes and middleware
pub fn create_app(auth: AuthBackend) -> Router {
    let whoami_path = format!("{}/whoami", auth.config().api_prefix.trim_end_matches('/'));
    let state = AppState { auth };

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/",
            get(|| async { "Tollgate API v0.0.1-SNAPSHOT" }),
        )
        .route(&whoami_path, get(whoami).post(whoami))
        .merge(tollgate_auth::routes(state.auth.config()))
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            authenticate,
        ))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Echo the caller established for this request
async fn whoami(user: Option<CurrentUser>) -> Json<Value> {
    Json(json!({
        "authenticated": user.is_some(),
        "user_id": user.map(|CurrentUser(id)| id),
    }))
}
