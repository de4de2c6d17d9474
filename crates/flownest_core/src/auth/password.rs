use super::{AuthError, AuthResult};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

/// Hashes `password` with Argon2id and a random salt into a PHC string.
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hash(format!("failed to hash password: {err}")))
}

/// Checks `password` against a stored PHC string.
///
/// A mismatch is `InvalidCredentials`; a malformed stored hash is `Hash`.
pub fn verify_password(password: &str, password_hash: &str) -> AuthResult<()> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|err| AuthError::Hash(format!("invalid stored password hash: {err}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}
