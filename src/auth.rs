use crate::config::Config;
use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

/// Password used for the admin account when no hash is configured.
pub const DEFAULT_ADMIN_PASSWORD: &str = "12345";

/// Decides whether a password grants admin access.
pub trait CredentialVerifier {
    fn verify(&self, password: &str) -> bool;
}

/// Checks passwords against a stored bcrypt hash.
#[derive(Debug, Clone)]
pub struct BcryptVerifier {
    hash: String,
}

impl BcryptVerifier {
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn from_password(password: &str, cost: u32) -> Result<Self> {
        let hash = hash(password, cost).context("Failed to hash password")?;
        Ok(Self { hash })
    }
}

impl CredentialVerifier for BcryptVerifier {
    fn verify(&self, password: &str) -> bool {
        match verify(password, &self.hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!("Failed to verify password: {e}");
                false
            }
        }
    }
}

/// Builds the admin verifier from config, hashing the default password when none is set.
pub fn admin_verifier(config: &Config) -> Result<BcryptVerifier> {
    match &config.admin_password_hash {
        Some(hash) => Ok(BcryptVerifier::from_hash(hash.clone())),
        None => {
            tracing::warn!("no admin_password_hash configured, using the default admin password");
            BcryptVerifier::from_password(DEFAULT_ADMIN_PASSWORD, DEFAULT_COST)
        }
    }
}
