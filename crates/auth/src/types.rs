//! Account read-model types
//!
//! Lightweight view of the account rows owned by the user store. Carries
//! only what credential checks and identity re-verification need.

use serde::Serialize;

use crate::claims::DEFAULT_USER_TYPE;

/// Account as seen by the authentication core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub role: String,
}

/// Identity resolved for token issuance.
///
/// Produced from the authenticated [`Account`] and open to replacement by
/// `IssuerHooks::resolve_user`, which is why every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCandidate {
    pub id: Option<i64>,
    pub user_type: String,
    pub login: Option<String>,
    pub email: Option<String>,
}

impl From<&Account> for UserCandidate {
    fn from(account: &Account) -> Self {
        Self {
            id: Some(account.id),
            user_type: DEFAULT_USER_TYPE.to_string(),
            login: Some(account.login.clone()),
            email: Some(account.email.clone()),
        }
    }
}
