//! Token issuance

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::claims::{Claims, TokenData, TokenUser};
use crate::codec::{self, CodecError};
use crate::config::AuthConfig;
use crate::credentials::verify_credentials;
use crate::error::AuthError;
use crate::hooks::IssuerHooks;
use crate::store::UserStore;
use crate::types::Account;

/// Body returned by the token endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub data: Claims,
    /// Fields added by the response hook, flattened into the body
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl TokenResponse {
    pub fn new(access_token: String, data: Claims) -> Self {
        Self {
            access_token,
            data,
            extensions: Map::new(),
        }
    }
}

/// Mints tokens for users who present valid credentials
#[derive(Clone)]
pub struct TokenIssuer {
    config: Arc<AuthConfig>,
    store: Arc<dyn UserStore>,
    hooks: Arc<dyn IssuerHooks>,
}

impl TokenIssuer {
    pub fn new(
        config: Arc<AuthConfig>,
        store: Arc<dyn UserStore>,
        hooks: Arc<dyn IssuerHooks>,
    ) -> Self {
        Self {
            config,
            store,
            hooks,
        }
    }

    /// Verify credentials and issue a signed token
    pub async fn issue(&self, username: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let account = verify_credentials(self.store.as_ref(), username, password).await?;

        let claims = self.build_claims(&account, Utc::now().timestamp())?;
        let claims = self.hooks.private_claims(claims, &account);

        let token = codec::encode(&claims, self.config.secret_key.as_bytes()).map_err(|e| {
            tracing::error!(error = %e, user_id = account.id, "Failed to sign token");
            match e {
                CodecError::ReservedClaim(key) => AuthError::ReservedClaim(key),
                _ => AuthError::TokenSigning,
            }
        })?;

        tracing::info!(user_id = account.id, "Issued access token");

        let response = TokenResponse::new(token, claims);
        Ok(self.hooks.token_response(response, &account))
    }

    /// Build the unsigned claims for an authenticated account
    pub fn build_claims(&self, account: &Account, now: i64) -> Result<Claims, AuthError> {
        let user = self.hooks.resolve_user(account)?;

        let id = user.id.ok_or(AuthError::MissingUserId)?;
        let login = user
            .login
            .filter(|login| !login.is_empty())
            .ok_or(AuthError::MissingUserLogin)?;
        let email = user
            .email
            .filter(|email| !email.is_empty())
            .ok_or(AuthError::MissingUserEmail)?;

        Ok(Claims {
            issuer: self.config.site_url.clone(),
            issued_at: now,
            not_before: now,
            expires_at: Some(now.saturating_add(self.config.token_lifetime.num_seconds())),
            data: TokenData {
                user: TokenUser {
                    id: Some(id),
                    user_type: user.user_type,
                    login,
                    email,
                    extra: Map::new(),
                },
                extra: Map::new(),
            },
            private_claims: Map::new(),
        })
    }
}
