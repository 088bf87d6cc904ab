//! Authentication errors
//!
//! Every failure carries a stable machine-readable code, a human-readable
//! message, and an HTTP status. Errors raised by extension hooks travel as
//! `AuthError::Custom` and are returned verbatim.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    // Usage / transport
    #[error("Authorization header was not found.")]
    NoHeader,
    #[error("Authentication token is missing.")]
    NoToken,
    #[error("Missing parameter(s): {0}")]
    MissingParam(String),

    // Cryptographic / structural
    #[error("Invalid bearer token.")]
    TokenError,

    // Policy
    #[error("The token issuer does not match with this server.")]
    InvalidTokenIssuer,
    #[error("The token has expired.")]
    TokenExpired,
    #[error("The token must have an expiration date.")]
    MissingTokenExpiration,

    // Identity consistency
    #[error("User ID not found in the token.")]
    MissingTokenUserId,
    #[error("The user in the token does not exist.")]
    InvalidTokenUser,
    #[error("The token login does not match the user.")]
    InvalidTokenUserLogin,
    #[error("The token email address does not match the user.")]
    InvalidTokenUserEmail,

    // Credential check
    #[error("Unknown username.")]
    InvalidUsername,
    #[error("The password you entered is incorrect.")]
    IncorrectPassword,

    // Issuance input
    #[error("The user ID is missing from the user object.")]
    MissingUserId,
    #[error("The username is missing from the user object.")]
    MissingUserLogin,
    #[error("The email address is missing from the user object.")]
    MissingUserEmail,

    // Handler guard
    #[error("Authentication required.")]
    NotAuthenticated,

    // Infrastructure
    #[error("Failed to load user.")]
    UserStore,
    #[error("Failed to sign token.")]
    TokenSigning,
    #[error("Private claims may not override the reserved claim \"{0}\".")]
    ReservedClaim(String),

    /// Error produced by an extension hook, propagated as-is
    #[error("{message}")]
    Custom {
        code: String,
        message: String,
        status: StatusCode,
    },
}

impl AuthError {
    /// Build a hook error
    pub fn custom(code: impl Into<String>, message: impl Into<String>, status: StatusCode) -> Self {
        AuthError::Custom {
            code: code.into(),
            message: message.into(),
            status,
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &str {
        match self {
            AuthError::NoHeader => "no-header",
            AuthError::NoToken => "no-token",
            AuthError::MissingParam(_) => "missing-param",
            AuthError::TokenError => "token-error",
            AuthError::InvalidTokenIssuer => "invalid-token-issuer",
            AuthError::TokenExpired => "token-expired",
            AuthError::MissingTokenExpiration => "missing-token-expiration",
            AuthError::MissingTokenUserId => "missing-token-user-id",
            AuthError::InvalidTokenUser => "invalid-token-wp-user",
            AuthError::InvalidTokenUserLogin => "invalid-token-user-login",
            AuthError::InvalidTokenUserEmail => "invalid-token-user-email",
            AuthError::InvalidUsername => "invalid-username",
            AuthError::IncorrectPassword => "incorrect-password",
            AuthError::MissingUserId => "missing-user-id",
            AuthError::MissingUserLogin => "missing-user-login",
            AuthError::MissingUserEmail => "missing-user-email",
            AuthError::NotAuthenticated => "not-authenticated",
            AuthError::UserStore => "user-store-error",
            AuthError::TokenSigning => "token-signing-error",
            AuthError::ReservedClaim(_) => "reserved-claim",
            AuthError::Custom { code, .. } => code,
        }
    }

    /// HTTP status hint
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingParam(_) => StatusCode::BAD_REQUEST,
            AuthError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AuthError::UserStore | AuthError::TokenSigning | AuthError::ReservedClaim(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AuthError::Custom { status, .. } => *status,
            _ => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
