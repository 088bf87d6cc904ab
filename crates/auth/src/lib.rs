//! Bearer-token authentication for the Tollgate API
//!
//! Issues signed, time-limited tokens to users who present valid credentials
//! and validates them on later requests. The request gate decides when a
//! token is mandatory and establishes the caller identity for handlers.
//!
//! Everything is reached through [`AuthBackend`], which any axum state can
//! expose via `FromRef<S>`.

mod backend;
mod claims;
pub mod codec;
mod config;
mod credentials;
mod error;
mod extractors;
mod gate;
mod hooks;
mod issuer;
mod middleware;
#[cfg(test)]
mod mock;
mod routes;
mod schema;
mod store;
mod types;
pub mod validator;

pub use backend::AuthBackend;
pub use claims::{Claims, TokenData, TokenUser, DEFAULT_USER_TYPE};
pub use codec::CodecError;
pub use config::AuthConfig;
pub use credentials::verify_credentials;
pub use error::AuthError;
pub use extractors::CurrentUser;
pub use gate::{AuthGate, AuthOutcome, RequestContext};
pub use hooks::{DefaultHooks, GatePolicy, IssuerHooks, StrictReads};
pub use issuer::{TokenIssuer, TokenResponse};
pub use middleware::authenticate;
pub use routes::{routes, TokenRequest};
pub use schema::token_schema;
pub use store::UserStore;
pub use types::{Account, UserCandidate};
pub use validator::{TokenValidator, ValidateToken};
