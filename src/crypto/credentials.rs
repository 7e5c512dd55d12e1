//! Operator credentials: username → hex SHA-256 digest, kept in a small
//! JSON file that is rewritten whole on every change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::CredentialError;
use crate::db::write_atomic;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Pair written by the reset utility.
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "password";

/// Username → hex digest.
pub type Credentials = BTreeMap<String, String>;

/// Unsalted SHA-256 of the password, lowercase hex.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Check a password against an in-memory credential map.
pub fn verify(users: &Credentials, username: &str, password: &str) -> bool {
    let Some(stored) = users.get(username) else {
        return false;
    };
    let candidate = hash_password(password);
    // Constant-time comparison of the two digests
    stored
        .to_ascii_lowercase()
        .as_bytes()
        .ct_eq(candidate.as_bytes())
        .into()
}

/// File-backed credential map.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all credentials. A missing file means no user can log in.
    pub fn load(&self) -> Result<Credentials, CredentialError> {
        if !self.path.exists() {
            return Ok(Credentials::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(CredentialError::CorruptedFile)
    }

    pub fn save(&self, users: &Credentials) -> Result<(), CredentialError> {
        let json = serde_json::to_string(users).map_err(CredentialError::CorruptedFile)?;
        write_atomic(&self.path, json.as_bytes())?;
        Ok(())
    }

    pub fn check(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        Ok(verify(&self.load()?, username, password))
    }

    /// Change a password. Checks run in order: old password, confirmation,
    /// minimum length. Nothing is written unless all pass.
    pub fn change(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), CredentialError> {
        let mut users = self.load()?;
        if !verify(&users, username, old_password) {
            return Err(CredentialError::InvalidOldPassword);
        }
        if new_password != confirm_password {
            return Err(CredentialError::Mismatch);
        }
        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CredentialError::TooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        users.insert(username.to_string(), hash_password(new_password));
        self.save(&users)?;
        tracing::info!(username, "Password changed");
        Ok(())
    }

    /// Overwrite the file with the single default operator.
    pub fn reset_defaults(&self) -> Result<(), CredentialError> {
        let mut users = Credentials::new();
        users.insert(DEFAULT_USERNAME.to_string(), hash_password(DEFAULT_PASSWORD));
        self.save(&users)?;
        tracing::warn!(path = %self.path.display(), "Credentials reset to defaults");
        Ok(())
    }
}
