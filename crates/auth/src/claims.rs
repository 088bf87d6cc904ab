//! Token claims types
//!
//! Wire format of the token payload:
//!
//! ```json
//! {
//!   "iss": "https://example.com",
//!   "iat": 1700000000,
//!   "nbf": 1700000000,
//!   "exp": 1700604800,
//!   "data": {
//!     "user": { "id": 1, "type": "registered-user", "user_login": "jdoe", "user_email": "jdoe@example.com" }
//!   }
//! }
//! ```
//!
//! Unknown top-level keys land in `private_claims`; unknown keys under
//! `data` and `data.user` are preserved as well, so private claims added
//! at issuance survive a decode.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type tag carried by tokens issued for registered accounts
pub const DEFAULT_USER_TYPE: &str = "registered-user";

/// Keys owned by the typed fields at each flattened level
const RESERVED_CLAIMS: &[&str] = &["iss", "iat", "nbf", "exp", "data"];
const RESERVED_DATA_KEYS: &[&str] = &["user"];
const RESERVED_USER_KEYS: &[&str] = &["id", "type", "user_login", "user_email"];

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer; must equal the service's canonical URL
    #[serde(rename = "iss", default)]
    pub issuer: String,
    /// Issued at (seconds since epoch)
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Not valid before (seconds since epoch)
    #[serde(rename = "nbf")]
    pub not_before: i64,
    /// Expires at (seconds since epoch)
    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// Subject
    #[serde(default)]
    pub data: TokenData,
    /// Extension data added by the private-claims hook
    #[serde(flatten)]
    pub private_claims: Map<String, Value>,
}

/// Subject envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenData {
    #[serde(default)]
    pub user: TokenUser,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Identity embedded in a token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type", default)]
    pub user_type: String,
    #[serde(rename = "user_login", default)]
    pub login: String,
    #[serde(rename = "user_email", default)]
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Account id of the token subject, if present
    pub fn user_id(&self) -> Option<i64> {
        self.data.user.id
    }

    /// First extension key that collides with a typed field.
    ///
    /// Such a payload serializes with a duplicate key and cannot be decoded.
    pub fn reserved_key_conflict(&self) -> Option<&str> {
        fn find<'a>(extra: &'a Map<String, Value>, reserved: &[&str]) -> Option<&'a str> {
            extra
                .keys()
                .map(String::as_str)
                .find(|key| reserved.contains(key))
        }

        find(&self.private_claims, RESERVED_CLAIMS)
            .or_else(|| find(&self.data.extra, RESERVED_DATA_KEYS))
            .or_else(|| find(&self.data.user.extra, RESERVED_USER_KEYS))
    }
}
