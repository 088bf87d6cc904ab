//! In-memory user store for local development and tests

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tollgate_auth::{Account, UserStore};
use tollgate_common::{hash_secret, verify_secret_hash, Error, Result};

const DEFAULT_ROLE: &str = "subscriber";

#[derive(Debug, Clone)]
struct StoredAccount {
    account: Account,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    accounts: HashMap<i64, StoredAccount>,
}

/// Process-local account table
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| Error::Internal("account table lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| Error::Internal("account table lock poisoned".to_string()))
    }

    /// Create an account with the next free id
    pub fn add_account(&self, login: &str, email: &str, password: &str) -> Result<Account> {
        let password_hash = hash_secret(password)?;
        let mut inner = self.write()?;

        let taken = inner.accounts.values().any(|stored| {
            stored.account.login == login || stored.account.email.eq_ignore_ascii_case(email)
        });
        if taken {
            return Err(Error::Conflict(format!(
                "An account with login {login:?} or email {email:?} already exists"
            )));
        }

        inner.next_id += 1;
        let account = Account {
            id: inner.next_id,
            login: login.to_string(),
            email: email.to_string(),
            role: DEFAULT_ROLE.to_string(),
        };
        inner.accounts.insert(
            account.id,
            StoredAccount {
                account: account.clone(),
                password_hash,
            },
        );

        tracing::debug!(user_id = account.id, login, "Account created");
        Ok(account)
    }

    pub fn update_email(&self, id: i64, email: &str) -> Result<Account> {
        self.update(id, |stored| stored.account.email = email.to_string())
    }

    pub fn update_login(&self, id: i64, login: &str) -> Result<Account> {
        self.update(id, |stored| stored.account.login = login.to_string())
    }

    /// Replace the password. Tokens already issued stay valid.
    pub fn update_password(&self, id: i64, password: &str) -> Result<Account> {
        let password_hash = hash_secret(password)?;
        self.update(id, |stored| stored.password_hash = password_hash)
    }

    pub fn remove_account(&self, id: i64) -> Result<()> {
        self.write()?
            .accounts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("Account {id} not found")))
    }

    fn update(&self, id: i64, apply: impl FnOnce(&mut StoredAccount)) -> Result<Account> {
        let mut inner = self.write()?;
        let stored = inner
            .accounts
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Account {id} not found")))?;
        apply(stored);
        Ok(stored.account.clone())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>> {
        Ok(self.read()?.accounts.get(&id).map(|s| s.account.clone()))
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Account>> {
        Ok(self
            .read()?
            .accounts
            .values()
            .find(|s| s.account.login == login)
            .map(|s| s.account.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self
            .read()?
            .accounts
            .values()
            .find(|s| s.account.email.eq_ignore_ascii_case(email))
            .map(|s| s.account.clone()))
    }

    async fn check_password(&self, account: &Account, password: &str) -> Result<bool> {
        let inner = self.read()?;
        Ok(inner
            .accounts
            .get(&account.id)
            .is_some_and(|stored| verify_secret_hash(password, &stored.password_hash)))
    }
}
