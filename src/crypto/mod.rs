pub mod credentials;

pub use credentials::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("The old password is not correct")]
    InvalidOldPassword,

    #[error("The new passwords do not match")]
    Mismatch,

    #[error("The new password must be at least {min} characters long")]
    TooShort { min: usize },

    #[error("Corrupted credential file")]
    CorruptedFile(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
