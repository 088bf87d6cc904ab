//! Issuance and gate hooks wired through the backend

use axum::http::{Method, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tollgate_auth::{
    codec, Account, AuthConfig, AuthError, Claims, GatePolicy, IssuerHooks, RequestContext,
    TokenResponse, UserCandidate,
};

use crate::common::{TestApp, LOGIN, PASSWORD, SECRET};

/// Adds an api key to the payload and a refresh token to the response
struct ExtraFields;

impl IssuerHooks for ExtraFields {
    fn private_claims(&self, mut claims: Claims, account: &Account) -> Claims {
        claims
            .private_claims
            .insert("api_key".to_string(), json!(12345));
        claims
            .data
            .user
            .extra
            .insert("role".to_string(), json!(account.role));
        claims
    }

    fn token_response(&self, mut response: TokenResponse, _account: &Account) -> TokenResponse {
        response
            .extensions
            .insert("refresh_token".to_string(), json!(54321));
        response
    }
}

/// Refuses to issue tokens to anyone
struct Lockdown;

impl IssuerHooks for Lockdown {
    fn resolve_user(&self, _account: &Account) -> Result<UserCandidate, AuthError> {
        Err(AuthError::custom(
            "issuance-disabled",
            "Token issuance is disabled.",
            StatusCode::SERVICE_UNAVAILABLE,
        ))
    }
}

/// Replaces the email with an empty one
struct NoEmail;

impl IssuerHooks for NoEmail {
    fn resolve_user(&self, account: &Account) -> Result<UserCandidate, AuthError> {
        Ok(UserCandidate {
            email: None,
            ..UserCandidate::from(account)
        })
    }
}

#[tokio::test]
async fn test_private_claims_and_response_extensions() {
    let app = TestApp::with_backend(|backend| backend.with_issuer_hooks(Arc::new(ExtraFields)));

    let response = app.request_token(LOGIN, PASSWORD).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["refresh_token"], 54321);
    assert_eq!(response.body["data"]["api_key"], 12345);

    let token = response.body["access_token"].as_str().unwrap();
    let claims = codec::decode(token, SECRET.as_bytes()).unwrap();
    assert_eq!(claims.private_claims["api_key"], 12345);
    assert_eq!(claims.data.user.extra["role"], "subscriber");

    // Private claims survive validation
    let response = app.whoami(Method::POST, Some(token)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_resolve_user_error_is_returned_verbatim() {
    let app = TestApp::with_backend(|backend| backend.with_issuer_hooks(Arc::new(Lockdown)));

    let response = app.request_token(LOGIN, PASSWORD).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.error_code(), Some("issuance-disabled"));
    assert_eq!(
        response.body["error"]["message"],
        "Token issuance is disabled."
    );
}

#[tokio::test]
async fn test_resolve_user_hook_runs_after_credentials() {
    let app = TestApp::with_backend(|backend| backend.with_issuer_hooks(Arc::new(Lockdown)));

    let response = app.request_token(LOGIN, "wrong").await;
    assert_eq!(response.error_code(), Some("incorrect-password"));
}

#[tokio::test]
async fn test_resolved_user_without_email() {
    let app = TestApp::with_backend(|backend| backend.with_issuer_hooks(Arc::new(NoEmail)));

    let response = app.request_token(LOGIN, PASSWORD).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), Some("missing-user-email"));
}

/// Treats only `/api/private/*` as protected API surface
struct PrivateOnly;

impl GatePolicy for PrivateOnly {
    fn is_api_request(&self, ctx: &RequestContext<'_>, _config: &AuthConfig) -> bool {
        ctx.path.starts_with("/api/private")
    }
}

#[tokio::test]
async fn test_gate_policy_narrows_api_surface() {
    let app = TestApp::with_backend(|backend| backend.with_gate_policy(Arc::new(PrivateOnly)));

    // /api/whoami is no longer API surface, so anonymous writes pass
    let response = app.whoami(Method::POST, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["authenticated"], false);

    // Invalid tokens are not even looked at
    let response = app.whoami(Method::POST, Some("garbage")).await;
    assert_eq!(response.status, StatusCode::OK);
}
