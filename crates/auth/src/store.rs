//! User store boundary
//!
//! The account datastore is owned elsewhere; the core only reads from it.

use async_trait::async_trait;
use tollgate_common::Error;

use crate::types::Account;

/// Read access to user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find an account by numeric id
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, Error>;

    /// Find an account by login name (exact match)
    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, Error>;

    /// Find an account by email address (case-insensitive)
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, Error>;

    /// Check a plaintext password against the account's stored secret
    async fn check_password(&self, account: &Account, password: &str) -> Result<bool, Error>;
}
