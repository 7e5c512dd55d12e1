//! Operator actions.
//!
//! Each command takes raw operator input, validates it, runs it against
//! `CoreState` and reports failures as one of five kinds. The console in
//! `main.rs` prints the error and exits non-zero.

pub mod appointment;
pub mod calendar;
pub mod profile;
pub mod reminder;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::calendar::CalendarError;
use crate::core_state::CoreError;
use crate::crypto::CredentialError;
use crate::db::StoreError;
use crate::models;
use crate::reminder::ReminderError;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Authentication failed: {0}")]
    AuthFailure(String),
    #[error("Invalid input: {0}")]
    ValidationFailure(String),
    #[error("Appointment no longer exists: {0}")]
    StaleReference(String),
    #[error("Invalid format: {0}")]
    FormatFailure(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotLoggedIn | CoreError::InvalidCredentials => {
                Self::AuthFailure(err.to_string())
            }
            CoreError::NoEditTarget => Self::StaleReference(err.to_string()),
            CoreError::Credentials(e) => e.into(),
            CoreError::Store(e) => e.into(),
            CoreError::Calendar(e) => e.into(),
        }
    }
}

impl From<CredentialError> for CommandError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::InvalidOldPassword => Self::AuthFailure(err.to_string()),
            CredentialError::Mismatch | CredentialError::TooShort { .. } => {
                Self::ValidationFailure(err.to_string())
            }
            CredentialError::CorruptedFile(_) | CredentialError::IoError(_) => {
                Self::Storage(err.to_string())
            }
        }
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => Self::StaleReference(id),
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<CalendarError> for CommandError {
    fn from(err: CalendarError) -> Self {
        Self::ValidationFailure(err.to_string())
    }
}

impl From<ReminderError> for CommandError {
    fn from(err: ReminderError) -> Self {
        match err {
            ReminderError::Unschedulable(_) => Self::FormatFailure(err.to_string()),
            ReminderError::MissingPhone(_) | ReminderError::NoAppointments(_) => {
                Self::ValidationFailure(err.to_string())
            }
        }
    }
}

/// Parse an appointment identifier typed by the operator.
pub fn parse_id(raw: &str) -> Result<Uuid, CommandError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| CommandError::FormatFailure(format!("'{raw}' is not an appointment id")))
}

/// Parse a date typed by the operator (`YYYY-MM-DD` or `DD/MM/YYYY`).
pub fn parse_date_arg(raw: &str) -> Result<NaiveDate, CommandError> {
    models::parse_date(raw).ok_or_else(|| {
        CommandError::FormatFailure(format!("'{raw}' is not a date. Use YYYY-MM-DD"))
    })
}
