//! Token endpoint routes
//!
//! - `POST {api_prefix}/token` issues a token for `username` + `password`
//!   (query string, JSON body, or form body)
//! - `OPTIONS {api_prefix}/token` describes the response schema

use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tollgate_common::Params;
use validator::Validate;

use crate::backend::AuthBackend;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::issuer::TokenResponse;
use crate::schema::token_schema;

/// Parameters of a token request
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

/// Build the token routes for any state that exposes an [`AuthBackend`]
pub fn routes<S>(config: &AuthConfig) -> Router<S>
where
    AuthBackend: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        &config.token_path(),
        post(generate_token).options(describe_token),
    )
}

async fn generate_token(
    State(backend): State<AuthBackend>,
    Params(request): Params<TokenRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    request.validate().map_err(|e| {
        let mut fields: Vec<String> = e.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort_unstable();
        AuthError::MissingParam(fields.join(", "))
    })?;

    let response = backend
        .issuer()
        .issue(&request.username, &request.password)
        .await?;

    Ok(Json(response))
}

async fn describe_token() -> Json<Value> {
    Json(json!({ "schema": token_schema() }))
}
