//! Authentication configuration

use chrono::Duration;

/// Default token lifetime: 7 days
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 7 * 24 * 60 * 60;

/// Longest accepted token lifetime: 10 years
const MAX_TOKEN_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Default URL prefix of the API surface
const DEFAULT_API_PREFIX: &str = "/api";

/// Header some proxy configurations move `Authorization` to
const DEFAULT_FALLBACK_HEADER: &str = "redirect-http-authorization";

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC signing secret
    pub secret_key: String,
    /// Canonical service URL; used as the token issuer
    pub site_url: String,
    /// How long issued tokens stay valid
    pub token_lifetime: Duration,
    /// Path prefix that identifies API requests
    pub api_prefix: String,
    /// Header checked when `Authorization` is absent
    pub fallback_header: String,
}

impl std::fmt::Debug for AuthConfig {
    #[mutants::skip] // Debug output only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &"[REDACTED]")
            .field("site_url", &self.site_url)
            .field("token_lifetime", &self.token_lifetime)
            .field("api_prefix", &self.api_prefix)
            .field("fallback_header", &self.fallback_header)
            .finish()
    }
}

impl AuthConfig {
    /// Create a config with default lifetime, prefix, and fallback header
    pub fn new(secret_key: impl Into<String>, site_url: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            site_url: site_url.into(),
            token_lifetime: Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            fallback_header: DEFAULT_FALLBACK_HEADER.to_string(),
        }
    }

    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Load configuration from environment variables
    ///
    /// Requires `AUTH_SECRET_KEY` and `SITE_URL`. Optional:
    /// `AUTH_TOKEN_LIFETIME_SECS`, `API_PREFIX`, `AUTH_FALLBACK_HEADER`.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let secret_key = std::env::var("AUTH_SECRET_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("AUTH_SECRET_KEY environment variable is required"))?;

        let site_url = std::env::var("SITE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("SITE_URL environment variable is required"))?;

        let mut config = Self::new(secret_key, site_url);

        if let Ok(raw) = std::env::var("AUTH_TOKEN_LIFETIME_SECS") {
            let secs: i64 = raw.parse().map_err(|_| {
                anyhow::anyhow!("AUTH_TOKEN_LIFETIME_SECS must be an integer, got {raw:?}")
            })?;
            if !(1..=MAX_TOKEN_LIFETIME_SECS).contains(&secs) {
                anyhow::bail!(
                    "AUTH_TOKEN_LIFETIME_SECS must be between 1 and {MAX_TOKEN_LIFETIME_SECS}, got {secs}"
                );
            }
            config.token_lifetime = Duration::try_seconds(secs).ok_or_else(|| {
                anyhow::anyhow!("AUTH_TOKEN_LIFETIME_SECS is out of range, got {secs}")
            })?;
        }

        if let Ok(prefix) = std::env::var("API_PREFIX") {
            config.api_prefix = prefix;
        }

        if let Ok(header) = std::env::var("AUTH_FALLBACK_HEADER") {
            config.fallback_header = header.to_ascii_lowercase();
        }

        Ok(config)
    }

    /// Path of the token issuance route, e.g. `/api/token`
    pub fn token_path(&self) -> String {
        format!("{}/token", self.api_prefix.trim_end_matches('/'))
    }
}
