//! Cryptographic utilities shared across Tollgate crates
//!
//! Provides secret hashing and verification using SHA-256 with random salts
//! and constant-time comparison to prevent timing attacks.

use sha2::{Digest, Sha256};

use crate::error::Error;

/// Salt length in bytes
const SALT_LEN: usize = 16;

fn digest(secret: &str, salt: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(salt);
    hasher.finalize().to_vec()
}

/// Hash a secret with a fresh random salt.
///
/// The output format is `hex(salt):hex(sha256(secret || salt))`.
pub fn hash_secret(secret: &str) -> Result<String, Error> {
    let mut salt = [0u8; SALT_LEN];
    getrandom::getrandom(&mut salt)
        .map_err(|e| Error::Internal(format!("Failed to generate salt: {}", e)))?;

    Ok(format!(
        "{}:{}",
        hex::encode(salt),
        hex::encode(digest(secret, &salt))
    ))
}

/// Verify a secret against a stored hash using constant-time comparison.
///
/// The stored hash format is `hex(salt):hex(sha256(secret || salt))`.
pub fn verify_secret_hash(candidate: &str, stored_hash: &str) -> bool {
    let Some((salt_hex, hash_hex)) = stored_hash.split_once(':') else {
        return false;
    };

    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };

    let Ok(hash) = hex::decode(hash_hex) else {
        return false;
    };

    let candidate_hash = digest(candidate, &salt);

    if hash.len() != candidate_hash.len() {
        return false;
    }

    let mut result = 0u8;
    for (a, b) in hash.iter().zip(candidate_hash.iter()) {
        result |= a ^ b;
    }
    result == 0
}
