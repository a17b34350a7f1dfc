use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use tracing::instrument;

/// Argon2id hashing with a fresh random salt per password.
pub struct PasswordHasherService;

impl PasswordHasherService {
    #[instrument(skip(password))]
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// `Ok(false)` on mismatch; `Err` only when `hash` is not a PHC string.
    #[instrument(skip(password, hash))]
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;
        let argon2 = Argon2::default();

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted_and_not_plaintext() {
        let first = PasswordHasherService::hash_password("pw").unwrap();
        let second = PasswordHasherService::hash_password("pw").unwrap();

        assert!(first.starts_with("$argon2"));
        assert_ne!(first, "pw");
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify() {
        let hash = PasswordHasherService::hash_password("correct horse").unwrap();

        assert!(PasswordHasherService::verify_password("correct horse", &hash).unwrap());
        assert!(!PasswordHasherService::verify_password("wrong", &hash).unwrap());
        assert!(PasswordHasherService::verify_password("x", "not-a-phc-string").is_err());
    }
}
