//! In-crate user store double for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use tollgate_common::Error;

use crate::store::UserStore;
use crate::types::Account;

#[derive(Default)]
pub(crate) struct MockUserStore {
    accounts: RwLock<HashMap<i64, (Account, String)>>,
    unavailable: AtomicBool,
}

impl MockUserStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, id: i64, login: &str, email: &str, password: &str) -> Account {
        let account = Account {
            id,
            login: login.to_string(),
            email: email.to_string(),
            role: "administrator".to_string(),
        };
        self.accounts
            .write()
            .unwrap()
            .insert(id, (account.clone(), password.to_string()));
        account
    }

    pub(crate) fn set_email(&self, id: i64, email: &str) {
        if let Some((account, _)) = self.accounts.write().unwrap().get_mut(&id) {
            account.email = email.to_string();
        }
    }

    pub(crate) fn set_login(&self, id: i64, login: &str) {
        if let Some((account, _)) = self.accounts.write().unwrap().get_mut(&id) {
            account.login = login.to_string();
        }
    }

    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), Error> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::Internal("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, Error> {
        self.check_available()?;
        Ok(self
            .accounts
            .read()
            .unwrap()
            .get(&id)
            .map(|(a, _)| a.clone()))
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, Error> {
        self.check_available()?;
        Ok(self
            .accounts
            .read()
            .unwrap()
            .values()
            .find(|(a, _)| a.login == login)
            .map(|(a, _)| a.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, Error> {
        self.check_available()?;
        Ok(self
            .accounts
            .read()
            .unwrap()
            .values()
            .find(|(a, _)| a.email.eq_ignore_ascii_case(email))
            .map(|(a, _)| a.clone()))
    }

    async fn check_password(&self, account: &Account, password: &str) -> Result<bool, Error> {
        self.check_available()?;
        Ok(self
            .accounts
            .read()
            .unwrap()
            .get(&account.id)
            .is_some_and(|(_, stored)| stored == password))
    }
}
