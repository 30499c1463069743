use argon2::{
    Algorithm, Argon2, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString},
};
use rand_core::OsRng;
use thiserror::Error;

pub use argon2::Params;

#[derive(Debug, Error)]
pub enum CredentialError {
    /// The hasher itself failed, or a stored hash could not be parsed.
    #[error("password hashing failed")]
    Hashing,
    #[error("password does not match")]
    Mismatch,
}

/// Hashes and verifies account passwords with Argon2id.
///
/// Each hash gets a fresh random salt which is embedded in the PHC string,
/// so verification only needs the stored string.
#[derive(Clone)]
pub struct CredentialService {
    argon2: Argon2<'static>,
}

impl Default for CredentialService {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialService {
    /// Build a service with explicit Argon2id cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|_| CredentialError::Hashing)?;
        Ok(hash.to_string())
    }

    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<(), CredentialError> {
        let parsed = PasswordHash::new(hash).map_err(|_| CredentialError::Hashing)?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(password_hash::Error::Password) => Err(CredentialError::Mismatch),
            Err(_) => Err(CredentialError::Hashing),
        }
    }
}

#[cfg(test)]
pub(crate) fn fast_service() -> CredentialService {
    CredentialService::with_params(Params::new(1024, 1, 1, None).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let creds = fast_service();
        let hash = creds.hash("secret1").unwrap();

        assert_ne!(hash, "secret1");
        assert!(hash.starts_with("$argon2id$"));
        creds.verify("secret1", &hash).unwrap();
    }

    #[test]
    fn wrong_password_is_mismatch() {
        let creds = fast_service();
        let hash = creds.hash("secret1").unwrap();

        let err = creds.verify("secret2", &hash).unwrap_err();
        assert!(matches!(err, CredentialError::Mismatch));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let creds = fast_service();
        let a = creds.hash("secret1").unwrap();
        let b = creds.hash("secret1").unwrap();

        assert_ne!(a, b);
        creds.verify("secret1", &a).unwrap();
        creds.verify("secret1", &b).unwrap();
    }

    #[test]
    fn garbage_hash_is_internal_failure() {
        let creds = fast_service();
        let err = creds.verify("secret1", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, CredentialError::Hashing));
    }

    #[test]
    fn hashes_verify_across_cost_settings() {
        // Parameters live in the PHC string, so a default-cost service can
        // check a cheap hash and vice versa.
        let hash = fast_service().hash("secret1").unwrap();
        CredentialService::default().verify("secret1", &hash).unwrap();
    }
}
