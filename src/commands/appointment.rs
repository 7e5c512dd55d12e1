//! Appointment commands.
//!
//! - `add_appointment`: validate the form and append a record
//! - `edit_appointment`: load a record, overlay changed fields, save it back
//! - `delete_appointment`: remove a record by id
//! - `list_appointments`: every record, scheduled ones first

use serde::{Deserialize, Serialize};

use super::{parse_id, CommandError};
use crate::core_state::CoreState;
use crate::models::{self, Appointment, NewAppointment, VisitType};

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_PHONE_LENGTH: usize = 30;

/// Appointment fields as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub visit_type: String,
    pub date: String,
    pub time: String,
}

/// Fields to change on an existing appointment; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppointmentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub visit_type: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

impl AppointmentForm {
    /// Pre-fill the form from a stored record. Missing date or time stay blank.
    pub fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            first_name: appointment.first_name.clone(),
            last_name: appointment.last_name.clone(),
            phone: appointment.phone.clone(),
            visit_type: appointment.visit_type.to_string(),
            date: appointment.date_label(),
            time: appointment.time_label(),
        }
    }

    pub fn patched(mut self, patch: AppointmentPatch) -> Self {
        let fields = [
            (&mut self.first_name, patch.first_name),
            (&mut self.last_name, patch.last_name),
            (&mut self.phone, patch.phone),
            (&mut self.visit_type, patch.visit_type),
            (&mut self.date, patch.date),
            (&mut self.time, patch.time),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        self
    }

    /// Presence and length checks, then date/time parsing.
    pub fn validate(&self) -> Result<NewAppointment, CommandError> {
        let first_name = required("first name", &self.first_name, MAX_NAME_LENGTH)?;
        let last_name = required("last name", &self.last_name, MAX_NAME_LENGTH)?;
        let phone = required("phone", &self.phone, MAX_PHONE_LENGTH)?;
        let visit_type = parse_visit_type(required("visit type", &self.visit_type, MAX_NAME_LENGTH)?)?;
        let date_raw = required("date", &self.date, MAX_NAME_LENGTH)?;
        let time_raw = required("time", &self.time, MAX_NAME_LENGTH)?;

        let date = models::parse_date(date_raw).ok_or_else(|| {
            CommandError::FormatFailure(format!("'{date_raw}' is not a date. Use YYYY-MM-DD"))
        })?;
        let time = models::parse_time(time_raw).ok_or_else(|| {
            CommandError::FormatFailure(format!("'{time_raw}' is not a time. Use HH:MM"))
        })?;

        Ok(NewAppointment {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone: phone.to_string(),
            visit_type,
            date,
            time,
        })
    }
}

fn required<'a>(field: &str, value: &'a str, max: usize) -> Result<&'a str, CommandError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CommandError::ValidationFailure(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(CommandError::ValidationFailure(format!(
            "{field} is too long (max {max} characters)"
        )));
    }
    Ok(value)
}

/// Visit type by label, ignoring case.
fn parse_visit_type(raw: &str) -> Result<VisitType, CommandError> {
    VisitType::ALL
        .iter()
        .copied()
        .find(|v| v.as_str().eq_ignore_ascii_case(raw))
        .ok_or_else(|| {
            let known: Vec<&str> = VisitType::ALL.iter().map(VisitType::as_str).collect();
            CommandError::ValidationFailure(format!(
                "unknown visit type '{raw}'. Expected one of: {}",
                known.join(", ")
            ))
        })
}

pub fn add_appointment(
    state: &mut CoreState,
    form: &AppointmentForm,
) -> Result<Appointment, CommandError> {
    state.require_session()?;
    let input = form.validate()?;
    Ok(state.add_appointment(input)?)
}

pub fn edit_appointment(
    state: &mut CoreState,
    id: &str,
    patch: AppointmentPatch,
) -> Result<Appointment, CommandError> {
    let id = parse_id(id)?;
    let current = state.begin_edit(id)?;
    let input = match AppointmentForm::from_appointment(&current).patched(patch).validate() {
        Ok(input) => input,
        Err(e) => {
            state.cancel_edit();
            return Err(e);
        }
    };
    Ok(state.save_edit(input)?)
}

pub fn delete_appointment(state: &mut CoreState, id: &str) -> Result<Appointment, CommandError> {
    let id = parse_id(id)?;
    Ok(state.delete_appointment(id)?)
}

/// All records ordered by date and time; records missing either come last.
pub fn list_appointments(state: &CoreState) -> Result<Vec<Appointment>, CommandError> {
    let mut appointments = state.appointments()?;
    appointments.sort_by_key(|a| (a.scheduled_at().is_none(), a.scheduled_at()));
    Ok(appointments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::crypto::CredentialStore;
    use chrono::NaiveDate;

    fn test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn logged_in(dir: &tempfile::TempDir) -> CoreState {
        let config = AppConfig::with_data_dir(dir.path());
        CredentialStore::new(config.users_path()).reset_defaults().unwrap();
        let mut state = CoreState::with_today(config, NaiveDate::from_ymd_opt(2024, 10, 9).unwrap());
        state.login("admin", "password").unwrap();
        state
    }

    fn form() -> AppointmentForm {
        AppointmentForm {
            first_name: "Paolo".into(),
            last_name: "Esposito".into(),
            phone: "333 444 5555".into(),
            visit_type: "terapia".into(),
            date: "2024-10-10".into(),
            time: "16:30".into(),
        }
    }

    #[test]
    fn create_then_load_returns_same_date_and_time() {
        let dir = test_dir();
        let mut state = logged_in(&dir);
        add_appointment(&mut state, &form()).unwrap();

        let listed = list_appointments(&state).unwrap();
        let stored = &listed[0];
        assert_eq!(stored.date_label(), "2024-10-10");
        assert_eq!(stored.time_label(), "16:30");
        assert_eq!(stored.visit_type, VisitType::Therapy);
        assert_eq!(stored.phone, "3334445555");
    }

    #[test]
    fn empty_field_is_validation_failure() {
        let mut f = form();
        f.last_name = "   ".into();
        assert!(matches!(f.validate(), Err(CommandError::ValidationFailure(m)) if m.contains("last name")));
    }

    #[test]
    fn overlong_field_is_validation_failure() {
        let mut f = form();
        f.first_name = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(f.validate(), Err(CommandError::ValidationFailure(_))));
    }

    #[test]
    fn unknown_visit_type_lists_choices() {
        let mut f = form();
        f.visit_type = "Massaggio".into();
        let err = f.validate().unwrap_err();
        assert!(err.to_string().contains("Visita posturale"));
    }

    #[test]
    fn malformed_date_and_time_are_format_failures() {
        let mut f = form();
        f.date = "10 ottobre".into();
        assert!(matches!(f.validate(), Err(CommandError::FormatFailure(_))));

        let mut f = form();
        f.time = "sedici".into();
        assert!(matches!(f.validate(), Err(CommandError::FormatFailure(_))));
    }

    #[test]
    fn add_requires_login() {
        let dir = test_dir();
        let config = AppConfig::with_data_dir(dir.path());
        let mut state = CoreState::new(config);
        assert!(matches!(
            add_appointment(&mut state, &form()),
            Err(CommandError::AuthFailure(_))
        ));
    }

    #[test]
    fn edit_changes_only_patched_fields() {
        let dir = test_dir();
        let mut state = logged_in(&dir);
        let created = add_appointment(&mut state, &form()).unwrap();

        let patch = AppointmentPatch {
            time: Some("08:15".into()),
            visit_type: Some("Check-up Completo".into()),
            ..Default::default()
        };
        let updated = edit_appointment(&mut state, &created.id.to_string(), patch).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.time_label(), "08:15");
        assert_eq!(updated.visit_type, VisitType::FullCheckUp);
        assert_eq!(updated.first_name, "Paolo");
        assert_eq!(updated.date_label(), "2024-10-10");
        assert_eq!(state.view().editing, None);
    }

    #[test]
    fn invalid_edit_leaves_record_and_clears_target() {
        let dir = test_dir();
        let mut state = logged_in(&dir);
        let created = add_appointment(&mut state, &form()).unwrap();

        let patch = AppointmentPatch {
            date: Some("ieri".into()),
            ..Default::default()
        };
        let result = edit_appointment(&mut state, &created.id.to_string(), patch);
        assert!(matches!(result, Err(CommandError::FormatFailure(_))));
        assert_eq!(state.view().editing, None);
        assert_eq!(list_appointments(&state).unwrap()[0], created);
    }

    #[test]
    fn edit_or_delete_of_missing_id_is_stale() {
        let dir = test_dir();
        let mut state = logged_in(&dir);
        let ghost = uuid::Uuid::new_v4().to_string();

        assert!(matches!(
            edit_appointment(&mut state, &ghost, AppointmentPatch::default()),
            Err(CommandError::StaleReference(_))
        ));
        assert!(matches!(
            delete_appointment(&mut state, &ghost),
            Err(CommandError::StaleReference(_))
        ));
    }

    #[test]
    fn delete_shrinks_book_by_one() {
        let dir = test_dir();
        let mut state = logged_in(&dir);
        let keep = add_appointment(&mut state, &form()).unwrap();
        let gone = add_appointment(&mut state, &form()).unwrap();

        delete_appointment(&mut state, &gone.id.to_string()).unwrap();
        let remaining = list_appointments(&state).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
    }

    #[test]
    fn list_orders_by_date_and_time() {
        let dir = test_dir();
        let mut state = logged_in(&dir);
        let mut later = form();
        later.date = "2024-10-20".into();
        add_appointment(&mut state, &later).unwrap();
        add_appointment(&mut state, &form()).unwrap();

        let listed = list_appointments(&state).unwrap();
        assert_eq!(listed[0].date_label(), "2024-10-10");
        assert_eq!(listed[1].date_label(), "2024-10-20");
    }
}
