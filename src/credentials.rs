//! Salted scrypt credential records.
//!
//! A record is stored as `<hex_digest>.<hex_salt>`. The salt is fed to the
//! KDF as the bytes of its hex representation, so a record can be verified
//! from the string alone.

use std::fmt;

use rand::Rng;
use scrypt::Params;
use thiserror::Error;

/// log2 of the scrypt cost parameter N (N = 16384).
pub const SCRYPT_LOG_N: u8 = 14;
pub const SCRYPT_R: u32 = 8;
pub const SCRYPT_P: u32 = 1;
/// Digest length in bytes (128 hex characters).
pub const DIGEST_LEN: usize = 64;
/// Salt length in random bytes (16 hex characters).
pub const SALT_LEN: usize = 8;

const SEPARATOR: char = '.';

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Malformed credential record: expected exactly one '.' separator")]
    MalformedRecord,

    #[error("Key derivation failed: {0}")]
    Kdf(String),
}

/// Stored, salted hash of a password. Deliberately not `Serialize`.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord(String);

impl CredentialRecord {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wraps a record string that was produced by [`derive`] earlier.
    #[must_use]
    pub fn from_stored(record: impl Into<String>) -> Self {
        Self(record.into())
    }

    pub fn verify(&self, password: &str) -> Result<bool, CredentialError> {
        verify(password, &self.0)
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialRecord(<redacted>)")
    }
}

impl fmt::Display for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash a password with a freshly generated salt.
pub fn derive(password: &str) -> Result<CredentialRecord, CredentialError> {
    let salt_hex = generate_salt();
    let digest_hex = scrypt_hex(password, &salt_hex)?;

    Ok(CredentialRecord(format!("{digest_hex}{SEPARATOR}{salt_hex}")))
}

/// Check a password against a stored record.
///
/// # Errors
///
/// Returns [`CredentialError::MalformedRecord`] when the record does not
/// contain exactly one separator.
pub fn verify(password: &str, record: &str) -> Result<bool, CredentialError> {
    let (stored_digest, salt_hex) = record
        .split_once(SEPARATOR)
        .ok_or(CredentialError::MalformedRecord)?;

    if salt_hex.contains(SEPARATOR) {
        return Err(CredentialError::MalformedRecord);
    }

    let candidate = scrypt_hex(password, salt_hex)?;
    Ok(constant_time_eq(candidate.as_bytes(), stored_digest.as_bytes()))
}

fn scrypt_hex(password: &str, salt_hex: &str) -> Result<String, CredentialError> {
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, DIGEST_LEN)
        .map_err(|e| CredentialError::Kdf(e.to_string()))?;

    let mut output = [0u8; DIGEST_LEN];
    scrypt::scrypt(password.as_bytes(), salt_hex.as_bytes(), &params, &mut output)
        .map_err(|e| CredentialError::Kdf(e.to_string()))?;

    Ok(hex::encode(output))
}

fn generate_salt() -> String {
    let bytes: [u8; SALT_LEN] = rand::rng().random();
    hex::encode(bytes)
}

/// Byte comparison whose running time does not depend on where the inputs differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
