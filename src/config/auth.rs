use serde::{Deserialize, Serialize};

use super::{ConfigError, Validate};

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Token lifetime in seconds
    pub token_expiration: u64,
    /// Password reset token lifetime in seconds
    pub password_reset_expiration: u64,
    pub argon2: Argon2Config,
}

/// Argon2id parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Argon2Config {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Iterations
    pub time_cost: u32,
    pub parallelism: u32,
    /// Output length in bytes
    pub hash_length: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_expiration: 60 * 60 * 24,
            password_reset_expiration: 15 * 60,
            argon2: Argon2Config::default(),
        }
    }
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
            hash_length: 32,
        }
    }
}

impl AuthConfig {
    /// Longest accepted token lifetime, ten years
    pub const MAX_TOKEN_EXPIRATION: u64 = 10 * 365 * 24 * 60 * 60;

    pub fn token_lifetime(&self) -> chrono::Duration {
        let seconds = self.token_expiration.min(Self::MAX_TOKEN_EXPIRATION);

        chrono::Duration::seconds(seconds as i64)
    }

    pub fn password_reset_lifetime(&self) -> chrono::Duration {
        let seconds = self
            .password_reset_expiration
            .min(Self::MAX_TOKEN_EXPIRATION);

        chrono::Duration::seconds(seconds as i64)
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.token_expiration == 0 {
            return Err(ConfigError::ValidationError(
                "auth.token_expiration must be > 0".to_string(),
            ));
        }
        if self.token_expiration > Self::MAX_TOKEN_EXPIRATION {
            return Err(ConfigError::ValidationError(format!(
                "auth.token_expiration must be <= {}",
                Self::MAX_TOKEN_EXPIRATION
            )));
        }
        if self.password_reset_expiration == 0
            || self.password_reset_expiration > Self::MAX_TOKEN_EXPIRATION
        {
            return Err(ConfigError::ValidationError(format!(
                "auth.password_reset_expiration must be between 1 and {}",
                Self::MAX_TOKEN_EXPIRATION
            )));
        }
        self.argon2.validate()
    }
}

impl Validate for Argon2Config {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_cost < 8 * self.parallelism {
            return Err(ConfigError::ValidationError(
                "auth.argon2.memory_cost must be at least 8 * parallelism".to_string(),
            ));
        }
        if self.time_cost == 0 {
            return Err(ConfigError::ValidationError(
                "auth.argon2.time_cost must be > 0".to_string(),
            ));
        }
        if self.parallelism == 0 {
            return Err(ConfigError::ValidationError(
                "auth.argon2.parallelism must be > 0".to_string(),
            ));
        }
        if self.hash_length < 16 {
            return Err(ConfigError::ValidationError(
                "auth.argon2.hash_length must be >= 16".to_string(),
            ));
        }
        Ok(())
    }
}
