//! Reminder commands. Links are produced for the operator to open; nothing
//! is sent from here.

use super::{parse_date_arg, parse_id, CommandError};
use crate::core_state::{CoreState, Tab};
use crate::reminder::{self, Reminder};

/// Reminders for every appointment on `date`.
pub fn reminders_for_day(state: &mut CoreState, date: &str) -> Result<Vec<Reminder>, CommandError> {
    let date = parse_date_arg(date)?;
    let appointments = state.appointments()?;
    state.select_tab(Tab::Reminders);
    Ok(reminder::reminders_for_day(&appointments, date, state.config())?)
}

/// Reminder for a single appointment.
pub fn reminder_for_appointment(state: &mut CoreState, id: &str) -> Result<Reminder, CommandError> {
    let id = parse_id(id)?;
    let appointment = state
        .appointments()?
        .into_iter()
        .find(|a| a.id == id)
        .ok_or_else(|| CommandError::StaleReference(id.to_string()))?;
    state.select_tab(Tab::Reminders);
    Ok(reminder::reminder_for(&appointment, state.config())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::appointment::{add_appointment, AppointmentForm};
    use crate::config::AppConfig;
    use crate::crypto::CredentialStore;
    use chrono::NaiveDate;

    fn logged_in(dir: &tempfile::TempDir) -> CoreState {
        let config = AppConfig::with_data_dir(dir.path());
        CredentialStore::new(config.users_path()).reset_defaults().unwrap();
        let mut state = CoreState::with_today(config, NaiveDate::from_ymd_opt(2024, 10, 9).unwrap());
        state.login("admin", "password").unwrap();
        state
    }

    fn form(phone: &str, time: &str) -> AppointmentForm {
        AppointmentForm {
            first_name: "Marco".into(),
            last_name: "Ferrari".into(),
            phone: phone.into(),
            visit_type: "Check-up Completo".into(),
            date: "2024-10-11".into(),
            time: time.into(),
        }
    }

    #[test]
    fn day_reminders_link_each_patient() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in(&dir);
        add_appointment(&mut state, &form("333 111 2222", "11:00")).unwrap();
        add_appointment(&mut state, &form("+39 333 333 4444", "09:00")).unwrap();

        let reminders = reminders_for_day(&mut state, "2024-10-11").unwrap();
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].phone, "393333334444");
        assert_eq!(reminders[1].phone, "393331112222");
        assert!(reminders[0].message.contains("Venerdì 11 ottobre 2024 alle ore 09:00"));
        assert_eq!(state.view().tab, Tab::Reminders);
    }

    #[test]
    fn empty_day_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in(&dir);
        assert!(matches!(
            reminders_for_day(&mut state, "2024-10-12"),
            Err(CommandError::ValidationFailure(_))
        ));
    }

    #[test]
    fn legacy_row_without_phone_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in(&dir);
        std::fs::write(
            state.config().appointments_path(),
            "ID,Nome,Cognome,Cellulare,Tipo Visita,Giorno Visita,Ora Visita\n\
             ,Marco,Ferrari,,Terapia,2024-10-11,09:00\n",
        )
        .unwrap();

        let err = reminders_for_day(&mut state, "2024-10-11").unwrap_err();
        assert!(matches!(err, CommandError::ValidationFailure(ref m) if m.contains("phone")));
    }

    #[test]
    fn single_reminder_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in(&dir);
        let created = add_appointment(&mut state, &form("3331112222", "11:00")).unwrap();

        let reminder = reminder_for_appointment(&mut state, &created.id.to_string()).unwrap();
        assert_eq!(reminder.appointment_id, created.id);
        assert!(reminder.link.starts_with("https://wa.me/393331112222?text="));

        let ghost = uuid::Uuid::new_v4().to_string();
        assert!(matches!(
            reminder_for_appointment(&mut state, &ghost),
            Err(CommandError::StaleReference(_))
        ));
    }
}
