use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use crate::config::Argon2Config;

/// Argon2id password hasher built from `auth.argon2`.
///
/// Hashes are stored in PHC string form, so verification reads the parameters
/// from the stored hash and keeps working after the configuration changes.
/// [`needs_rehash`](Self::needs_rehash) tells the login flow when a stored
/// hash was produced with other parameters.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    #[::tracing::instrument(skip(config))]
    pub fn from_config(config: &Argon2Config) -> Result<Self, HashError> {
        let params = Params::new(
            config.memory_cost,
            config.time_cost,
            config.parallelism,
            Some(config.hash_length as usize),
        )?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    #[::tracing::instrument(skip(self, password))]
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2.hash_password(password.as_bytes(), &salt)?;

        Ok(hash.to_string())
    }

    /// `Ok(false)` on mismatch, `Err` only for malformed hashes.
    #[::tracing::instrument(skip(self, password, hash))]
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(hash)?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn needs_rehash(&self, hash: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(hash)?;

        if parsed.algorithm.as_str() != "argon2id" {
            return Ok(true);
        }

        let current = self.argon2.params();
        let m_cost = parsed.params.get_decimal("m").unwrap_or(0);
        let t_cost = parsed.params.get_decimal("t").unwrap_or(0);
        let p_cost = parsed.params.get_decimal("p").unwrap_or(0);

        Ok(m_cost != current.m_cost() || t_cost != current.t_cost() || p_cost != current.p_cost())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}
