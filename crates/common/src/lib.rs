//! Shared utilities, configuration, and error handling for Tollgate
//!
//! This crate provides common functionality used across the Tollgate workspace:
//! - Server configuration following 12-factor principles
//! - Error types and handling
//! - Salted secret hashing for stored passwords
//! - Request parameter extraction

pub mod config;
pub mod crypto;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use crypto::{hash_secret, verify_secret_hash};
pub use error::{Error, Result};
pub use extractors::Params;
