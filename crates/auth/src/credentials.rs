//! Credential verification against the user store

use tollgate_common::Error;

use crate::error::AuthError;
use crate::store::UserStore;
use crate::types::Account;

fn store_failure(e: Error) -> AuthError {
    tracing::error!(error = %e, "Failed to load user for credential check");
    AuthError::UserStore
}

/// Verify a login identifier and password.
///
/// The identifier is matched against login names first; identifiers that
/// look like an email address fall back to an email lookup. Only the two
/// coarse outcomes `InvalidUsername` and `IncorrectPassword` are reported.
pub async fn verify_credentials(
    store: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<Account, AuthError> {
    let mut account = store.find_by_login(username).await.map_err(store_failure)?;

    if account.is_none() && username.contains('@') {
        account = store.find_by_email(username).await.map_err(store_failure)?;
    }

    let account = account.ok_or(AuthError::InvalidUsername)?;

    if !store
        .check_password(&account, password)
        .await
        .map_err(store_failure)?
    {
        tracing::debug!(user_id = account.id, "Password check failed");
        return Err(AuthError::IncorrectPassword);
    }

    Ok(account)
}
