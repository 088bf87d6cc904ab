//! Extension points injected into the issuer and the gate
//!
//! Collaborators implement these traits to reshape issuance or tighten the
//! gate without touching the core. Every method has a neutral default, so
//! an implementation only overrides what it needs.

use axum::http::Method;

use crate::claims::Claims;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::gate::RequestContext;
use crate::issuer::TokenResponse;
use crate::types::{Account, UserCandidate};

/// Issuance hooks
pub trait IssuerHooks: Send + Sync {
    /// Resolve the identity a token is minted for.
    ///
    /// May replace the identity entirely. An error is returned to the
    /// client unchanged.
    fn resolve_user(&self, account: &Account) -> Result<UserCandidate, AuthError> {
        Ok(UserCandidate::from(account))
    }

    /// Transform the full claims payload before it is signed
    fn private_claims(&self, claims: Claims, _account: &Account) -> Claims {
        claims
    }

    /// Transform the full issuance response before it is returned
    fn token_response(&self, response: TokenResponse, _account: &Account) -> TokenResponse {
        response
    }
}

/// Gate policy hooks
pub trait GatePolicy: Send + Sync {
    /// Whether the request belongs to the API surface at all
    fn is_api_request(&self, ctx: &RequestContext<'_>, config: &AuthConfig) -> bool {
        is_api_path(&ctx.path, &config.api_prefix)
    }

    /// Require a token on read-only requests too
    fn force_token(&self, _ctx: &RequestContext<'_>) -> bool {
        false
    }
}

/// Neutral hooks: no claim or response changes, tokens only on writes
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl IssuerHooks for DefaultHooks {}
impl GatePolicy for DefaultHooks {}

/// Gate policy that requires a token on every API request except issuance
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictReads;

impl GatePolicy for StrictReads {
    fn force_token(&self, _ctx: &RequestContext<'_>) -> bool {
        true
    }
}

/// Whether `path` is `prefix` itself or sits below it
pub(crate) fn is_api_path(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Methods that never modify state
pub(crate) fn is_read_only(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}
