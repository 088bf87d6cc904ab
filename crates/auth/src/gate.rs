//! Request-level authentication decision
//!
//! The gate never overrides a decision made by another mechanism, stays
//! silent for requests outside the API, and only validates a token when
//! the request requires one.

use std::borrow::Cow;
use std::sync::Arc;

use axum::http::{request::Parts, HeaderMap, Method};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::extractors::CurrentUser;
use crate::hooks::{is_read_only, GatePolicy};
use crate::validator::ValidateToken;

/// Result of an authentication mechanism for one request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthOutcome {
    /// No decision; default anonymous handling applies
    #[default]
    NoOpinion,
    /// Processing must stop with this error
    Error(AuthError),
    /// The caller is the account with this id
    Authenticated(i64),
}

/// The parts of a request the gate looks at.
///
/// Headers are borrowed from the request when built with `from_parts`.
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    pub method: Method,
    pub path: String,
    pub headers: Cow<'a, HeaderMap>,
    /// Caller already established for this request, if any
    pub caller: Option<i64>,
}

impl<'a> RequestContext<'a> {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Cow::Owned(HeaderMap::new()),
            caller: None,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Cow::Owned(headers);
        self
    }

    pub fn with_caller(mut self, caller: i64) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn from_parts(parts: &'a Parts) -> Self {
        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            headers: Cow::Borrowed(&parts.headers),
            caller: parts.extensions.get::<CurrentUser>().map(|user| user.0),
        }
    }
}

/// Decides, per request, whether a bearer token is required and checks it
#[derive(Clone)]
pub struct AuthGate {
    config: Arc<AuthConfig>,
    validator: Arc<dyn ValidateToken>,
    policy: Arc<dyn GatePolicy>,
}

impl AuthGate {
    pub fn new(
        config: Arc<AuthConfig>,
        validator: Arc<dyn ValidateToken>,
        policy: Arc<dyn GatePolicy>,
    ) -> Self {
        Self {
            config,
            validator,
            policy,
        }
    }

    /// Whether this request must present a valid token
    pub fn require_token(&self, ctx: &RequestContext<'_>) -> bool {
        if ctx.caller.is_some() {
            return false;
        }

        if !self.policy.is_api_request(ctx, &self.config) || ctx.path.contains(".well-known") {
            return false;
        }

        if ctx.path.trim_end_matches('/') == self.config.token_path() {
            return false;
        }

        if is_read_only(&ctx.method) {
            return self.policy.force_token(ctx);
        }

        true
    }

    /// Authenticate one request, given the outcome of earlier mechanisms
    pub async fn on_request(
        &self,
        ctx: &RequestContext<'_>,
        previous: AuthOutcome,
    ) -> AuthOutcome {
        if previous != AuthOutcome::NoOpinion {
            return previous;
        }

        if !self.policy.is_api_request(ctx, &self.config) {
            return AuthOutcome::NoOpinion;
        }

        if !self.require_token(ctx) {
            return AuthOutcome::NoOpinion;
        }

        match self.validator.validate(&ctx.headers).await {
            Ok(claims) => match claims.user_id() {
                Some(id) => {
                    tracing::debug!(user_id = id, path = %ctx.path, "Bearer token accepted");
                    AuthOutcome::Authenticated(id)
                }
                None => AuthOutcome::Error(AuthError::MissingTokenUserId),
            },
            Err(e) => {
                tracing::info!(code = e.code(), method = %ctx.method, path = %ctx.path, "Bearer token rejected");
                AuthOutcome::Error(e)
            }
        }
    }
}
