//! Token validation
//!
//! Each step is a standalone function; [`TokenValidator`] composes them in
//! a fixed order: header, bearer token, decode, issuer, subject, expiration.
//! The issuer is checked before any account lookup so that tokens minted
//! elsewhere never reach the store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::Utc;

use crate::claims::Claims;
use crate::codec;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::store::UserStore;
use crate::types::Account;

/// Anything that can turn request headers into verified claims
#[async_trait]
pub trait ValidateToken: Send + Sync {
    async fn validate(&self, headers: &HeaderMap) -> Result<Claims, AuthError>;
}

/// Read the raw authorization value, falling back to `fallback_header`.
///
/// An empty header counts as absent.
pub fn auth_header<'a>(headers: &'a HeaderMap, fallback_header: &str) -> Result<&'a str, AuthError> {
    let present = move |name: &str| headers.get(name).filter(|value| !value.is_empty());

    let value = present(AUTHORIZATION.as_str())
        .or_else(|| present(fallback_header))
        .ok_or(AuthError::NoHeader)?;

    // A header that is not visible ASCII cannot carry a bearer token
    value.to_str().map_err(|_| AuthError::NoToken)
}

/// Extract the token from a `Bearer <token>` value
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    header
        .strip_prefix("Bearer ")
        .and_then(|rest| rest.split_whitespace().next())
        .ok_or(AuthError::NoToken)
}

/// The issuer must match the canonical service URL exactly
pub fn validate_issuer(claims: &Claims, site_url: &str) -> Result<(), AuthError> {
    if claims.issuer != site_url {
        return Err(AuthError::InvalidTokenIssuer);
    }
    Ok(())
}

/// Compare the token subject with the live account it refers to
pub fn validate_user(claims: &Claims, account: Option<&Account>) -> Result<(), AuthError> {
    if claims.user_id().is_none() {
        return Err(AuthError::MissingTokenUserId);
    }

    let account = account.ok_or(AuthError::InvalidTokenUser)?;
    let user = &claims.data.user;

    if account.login != user.login {
        return Err(AuthError::InvalidTokenUserLogin);
    }

    if account.email != user.email {
        return Err(AuthError::InvalidTokenUserEmail);
    }

    Ok(())
}

/// The token must carry an expiry that lies in the future
pub fn validate_expiration(claims: &Claims, now: i64) -> Result<(), AuthError> {
    let expires_at = claims
        .expires_at
        .ok_or(AuthError::MissingTokenExpiration)?;

    if expires_at <= now {
        return Err(AuthError::TokenExpired);
    }

    Ok(())
}

/// Validates bearer tokens against the configured secret and the user store
#[derive(Clone)]
pub struct TokenValidator {
    config: Arc<AuthConfig>,
    store: Arc<dyn UserStore>,
}

impl TokenValidator {
    pub fn new(config: Arc<AuthConfig>, store: Arc<dyn UserStore>) -> Self {
        Self { config, store }
    }

    /// Decode a raw token and run the claim checks
    pub async fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = codec::decode(token, self.config.secret_key.as_bytes()).map_err(|e| {
            tracing::debug!(error = %e, "Token validation failed");
            AuthError::TokenError
        })?;

        self.validate_claims(claims).await
    }

    /// Run issuer, subject, and expiration checks on decoded claims
    pub async fn validate_claims(&self, claims: Claims) -> Result<Claims, AuthError> {
        validate_issuer(&claims, &self.config.site_url)?;

        let user_id = claims.user_id().ok_or(AuthError::MissingTokenUserId)?;
        let account = self.store.find_by_id(user_id).await.map_err(|e| {
            tracing::error!(error = %e, user_id, "Failed to load user");
            AuthError::UserStore
        })?;
        validate_user(&claims, account.as_ref())?;

        validate_expiration(&claims, Utc::now().timestamp())?;

        Ok(claims)
    }
}

#[async_trait]
impl ValidateToken for TokenValidator {
    async fn validate(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let header = auth_header(headers, &self.config.fallback_header)?;
        let token = bearer_token(header)?;
        self.validate_token(token).await
    }
}
