//! PostgreSQL user store

use async_trait::async_trait;
use sqlx::PgPool;
use tollgate_auth::{Account, UserStore};
use tollgate_common::{hash_secret, verify_secret_hash, Error, Result};

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the bundled migrations
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Create account
    pub async fn create_account(&self, login: &str, email: &str, password: &str) -> Result<Account> {
        let password_hash = hash_secret(password)?;

        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (login, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, login, email, role
            "#,
        )
        .bind(login)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.constraint().is_some() => Error::Conflict(
                format!("An account with login {login:?} or email {email:?} already exists"),
            ),
            _ => Error::from(e),
        })?;

        tracing::debug!(user_id = account.id, login, "Account created");
        Ok(account)
    }

    /// Replace the password hash. Tokens already issued stay valid.
    pub async fn update_password(&self, id: i64, password: &str) -> Result<()> {
        let password_hash = hash_secret(password)?;

        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Account {id} not found")));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(
            "SELECT id, login, email, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(
            "SELECT id, login, email, role FROM users WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(
            "SELECT id, login, email, role FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn check_password(&self, account: &Account, password: &str) -> Result<bool> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
                .bind(account.id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(stored.is_some_and(|hash| verify_secret_hash(password, &hash)))
    }
}
