//! Common test utilities and fixtures for integration tests
//!
//! - Test application built on the in-memory account store
//! - Token issuance and request helpers
//! - Hand-built tokens for expiry and tamper cases

use std::sync::{Arc, Once};

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tollgate_accounts::InMemoryUserStore;
use tollgate_auth::{codec, Account, AuthBackend, AuthConfig, Claims};
use tower::ServiceExt;

pub const SECRET: &str = "test_secret_key_for_testing_only";
pub const SITE_URL: &str = "https://tollgate.test";

pub const LOGIN: &str = "testuser";
pub const EMAIL: &str = "testuser@sample.org";
pub const PASSWORD: &str = "testpassword";

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn test_config() -> AuthConfig {
    AuthConfig::new(SECRET, SITE_URL)
}

/// Response status and decoded JSON body
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn error_code(&self) -> Option<&str> {
        self.body["error"]["code"].as_str()
    }
}

/// Test application with one registered account
pub struct TestApp {
    pub store: Arc<InMemoryUserStore>,
    pub account: Account,
    pub router: Router,
}

impl TestApp {
    /// Create a test application with neutral hooks
    pub fn new() -> Self {
        Self::with_backend(|backend| backend)
    }

    /// Create a test application, customizing the backend before the
    /// router is built
    pub fn with_backend(customize: impl FnOnce(AuthBackend) -> AuthBackend) -> Self {
        Self::with_config(test_config(), customize)
    }

    pub fn with_config(
        config: AuthConfig,
        customize: impl FnOnce(AuthBackend) -> AuthBackend,
    ) -> Self {
        init_tracing();

        let store = Arc::new(InMemoryUserStore::new());
        let account = store
            .add_account(LOGIN, EMAIL, PASSWORD)
            .expect("seed account");

        let backend = customize(AuthBackend::new(config, store.clone()));
        let router = tollgate_app::create_app(backend);

        Self {
            store,
            account,
            router,
        }
    }

    /// Send a request, with an optional header and JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        header: Option<(&str, String)>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }

        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }

    /// Request a token with the given credentials
    pub async fn request_token(&self, username: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/token",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Issue a token for the seeded account
    pub async fn token(&self) -> String {
        let response = self.request_token(LOGIN, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["access_token"]
            .as_str()
            .expect("access_token")
            .to_string()
    }

    /// Call the protected demonstration endpoint
    pub async fn whoami(&self, method: Method, token: Option<&str>) -> TestResponse {
        let header = token.map(|t| (AUTHORIZATION.as_str(), format!("Bearer {}", t)));
        self.send(method, "/api/whoami", header, None).await
    }
}

/// Claims for `account` as the issuer would build them, expiring at `exp`
pub fn claims_for(account: &Account, exp: i64) -> Claims {
    let now = Utc::now().timestamp();
    serde_json::from_value(json!({
        "iss": SITE_URL,
        "iat": now,
        "nbf": now,
        "exp": exp,
        "data": {
            "user": {
                "id": account.id,
                "type": "registered-user",
                "user_login": account.login,
                "user_email": account.email,
            }
        }
    }))
    .expect("claims")
}

/// Sign claims with the test secret
pub fn sign(claims: &Claims) -> String {
    codec::encode(claims, SECRET.as_bytes()).expect("sign")
}
