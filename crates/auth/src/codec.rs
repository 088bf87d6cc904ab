//! Signed token encoding and decoding (HS256)
//!
//! Pure functions of the claims and the secret key. Issuer, subject, and
//! expiry policy are enforced by the validator, not here.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{
    decode as jwt_decode, encode as jwt_encode, errors::ErrorKind, Algorithm, DecodingKey,
    EncodingKey, Header, Validation,
};
use serde_json::Value;

use crate::claims::Claims;

/// The only algorithm tokens are signed with
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Token codec failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("malformed token")]
    Malformed,

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("token claims are invalid: {0}")]
    InvalidClaims(String),

    #[error("token is not valid yet")]
    Immature,

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("extension claims override reserved claim {0:?}")]
    ReservedClaim(String),
}

/// Sign claims into a compact token string
pub fn encode(claims: &Claims, secret: &[u8]) -> Result<String, CodecError> {
    if let Some(key) = claims.reserved_key_conflict() {
        return Err(CodecError::ReservedClaim(key.to_string()));
    }

    jwt_encode(
        &Header::new(ALGORITHM),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| CodecError::Signing(e.to_string()))
}

/// Verify a token's signature and decode its claims
pub fn decode(token: &str, secret: &[u8]) -> Result<Claims, CodecError> {
    check_header(token)?;

    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.validate_nbf = true;
    validation.validate_aud = false;
    validation.set_required_spec_claims::<&str>(&[]);

    let token_data = jwt_decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| {
            tracing::debug!(error = %e, "Token decode failed");
            match e.kind() {
                ErrorKind::InvalidSignature => CodecError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => {
                    CodecError::UnsupportedAlgorithm("unknown".to_string())
                }
                ErrorKind::ImmatureSignature => CodecError::Immature,
                ErrorKind::Json(err) => CodecError::InvalidClaims(err.to_string()),
                _ => CodecError::Malformed,
            }
        })?;

    Ok(token_data.claims)
}

/// Check the token has three segments and an HS256 header.
///
/// Runs before signature verification so that an unknown `alg` (including
/// `none`) is reported as unsupported rather than as a malformed header.
fn check_header(token: &str) -> Result<(), CodecError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
        return Err(CodecError::Malformed);
    }

    let raw = URL_SAFE_NO_PAD
        .decode(segments[0])
        .map_err(|_| CodecError::Malformed)?;
    let header: Value = serde_json::from_slice(&raw).map_err(|_| CodecError::Malformed)?;

    match header.get("alg").and_then(Value::as_str) {
        Some("HS256") => Ok(()),
        Some(alg) => Err(CodecError::UnsupportedAlgorithm(alg.to_string())),
        None => Err(CodecError::Malformed),
    }
}
