//! Password hashing and verification
//!
//! One-way Argon2id hashing with per-password random salts. Only PHC-format
//! hash strings ever reach the store; plaintext never leaves the request.

use argon2::password_hash::{
    rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier,
    SaltString,
};
use argon2::Argon2;

/// Hash a plaintext password into a PHC-format string.
pub fn hash_password(plain: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(plain.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Compare a plaintext password against a stored hash.
///
/// A mismatch is `Ok(false)`; `Err` is reserved for unparseable hashes.
pub fn verify_password(plain: &str, stored_hash: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(stored_hash)?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(e),
    }
}
