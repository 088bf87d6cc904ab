//! Authentication backend
//!
//! Bundles the configuration, the user store, and the injected hooks, and
//! hands out issuer, validator, and gate instances built from them.
//!
//! Application states expose this via `FromRef`:
//! ```ignore
//! impl FromRef<AppState> for AuthBackend {
//!     fn from_ref(state: &AppState) -> Self {
//!         state.auth.clone()
//!     }
//! }
//! ```

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::gate::AuthGate;
use crate::hooks::{DefaultHooks, GatePolicy, IssuerHooks};
use crate::issuer::TokenIssuer;
use crate::store::UserStore;
use crate::validator::TokenValidator;

#[derive(Clone)]
pub struct AuthBackend {
    config: Arc<AuthConfig>,
    store: Arc<dyn UserStore>,
    issuer_hooks: Arc<dyn IssuerHooks>,
    gate_policy: Arc<dyn GatePolicy>,
}

impl AuthBackend {
    /// Create a backend with neutral hooks
    pub fn new(config: AuthConfig, store: Arc<dyn UserStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            issuer_hooks: Arc::new(DefaultHooks),
            gate_policy: Arc::new(DefaultHooks),
        }
    }

    pub fn with_issuer_hooks(mut self, hooks: Arc<dyn IssuerHooks>) -> Self {
        self.issuer_hooks = hooks;
        self
    }

    pub fn with_gate_policy(mut self, policy: Arc<dyn GatePolicy>) -> Self {
        self.gate_policy = policy;
        self
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn issuer(&self) -> TokenIssuer {
        TokenIssuer::new(
            self.config.clone(),
            self.store.clone(),
            self.issuer_hooks.clone(),
        )
    }

    pub fn validator(&self) -> TokenValidator {
        TokenValidator::new(self.config.clone(), self.store.clone())
    }

    pub fn gate(&self) -> AuthGate {
        AuthGate::new(
            self.config.clone(),
            Arc::new(self.validator()),
            self.gate_policy.clone(),
        )
    }
}
