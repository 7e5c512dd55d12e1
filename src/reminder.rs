//! Reminder messages and chat deep links.
//!
//! A reminder is a pre-filled message plus a link that opens it in the
//! operator's chat app. Nothing here delivers anything: the operator opens
//! each link and presses send.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::calendar::{appointments_on, CalendarTerms};
use crate::config::AppConfig;
use crate::models::{clean_phone, Appointment};

#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("Appointment {0} has no valid date or time")]
    Unschedulable(Uuid),

    #[error("Appointment {0} has no phone number")]
    MissingPhone(Uuid),

    #[error("No appointments on {0}")]
    NoAppointments(NaiveDate),
}

/// One ready-to-open reminder.
#[derive(Debug, Clone, Serialize)]
pub struct Reminder {
    pub appointment_id: Uuid,
    pub patient: String,
    pub phone: String,
    pub message: String,
    pub link: String,
}

/// Reminder text for one appointment.
pub fn compose(appointment: &Appointment, practitioner: &str) -> Result<String, ReminderError> {
    let (Some(date), Some(time)) = (appointment.date, appointment.time) else {
        return Err(ReminderError::Unschedulable(appointment.id));
    };
    Ok(format!(
        "Gentile {} {}, ti ricordiamo il tuo appuntamento per {} il giorno {} alle ore {} presso lo studio della {}.",
        appointment.first_name,
        appointment.last_name,
        appointment.visit_type,
        CalendarTerms::ITALIAN.long_date(date),
        time.format("%H:%M"),
        practitioner,
    ))
}

/// Digits-only international form: separators removed, `+`/`00` dropped,
/// country code prepended when missing. Applying it twice changes nothing.
pub fn normalize_phone(phone: &str, country_code: &str) -> String {
    let cleaned = clean_phone(phone);
    let local = cleaned
        .strip_prefix('+')
        .or_else(|| cleaned.strip_prefix("00"))
        .unwrap_or(&cleaned);

    if local.starts_with(country_code) {
        local.to_string()
    } else {
        format!("{country_code}{local}")
    }
}

/// `{base}/{number}?text={message}` with the message percent-encoded.
pub fn link(base_url: &str, phone: &str, message: &str) -> String {
    format!(
        "{}/{}?text={}",
        base_url.trim_end_matches('/'),
        phone,
        urlencoding::encode(message)
    )
}

/// Build the reminder for a single appointment.
pub fn reminder_for(appointment: &Appointment, config: &AppConfig) -> Result<Reminder, ReminderError> {
    let message = compose(appointment, &config.practitioner)?;
    let phone = normalize_phone(&appointment.phone, &config.country_code);
    // Nothing left beyond the country code
    if phone.len() <= config.country_code.len() {
        return Err(ReminderError::MissingPhone(appointment.id));
    }
    let link = link(&config.chat_base_url, &phone, &message);
    Ok(Reminder {
        appointment_id: appointment.id,
        patient: appointment.full_name(),
        phone,
        message,
        link,
    })
}

/// Reminders for every patient booked on `date`, in time order.
pub fn reminders_for_day(
    appointments: &[Appointment],
    date: NaiveDate,
    config: &AppConfig,
) -> Result<Vec<Reminder>, ReminderError> {
    let day = appointments_on(appointments, date);
    if day.is_empty() {
        return Err(ReminderError::NoAppointments(date));
    }
    let reminders = day
        .into_iter()
        .map(|appointment| reminder_for(appointment, config))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(%date, count = reminders.len(), "Reminders prepared");
    Ok(reminders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAppointment, VisitType};
    use chrono::NaiveTime;

    fn appointment(phone: &str, day: u32, hour: u32) -> Appointment {
        Appointment::create(NewAppointment {
            first_name: "Anna".into(),
            last_name: "Bianchi".into(),
            phone: phone.into(),
            visit_type: VisitType::PosturalVisit,
            date: NaiveDate::from_ymd_opt(2024, 10, day).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 5, 0).unwrap(),
        })
    }

    fn config() -> AppConfig {
        AppConfig::with_data_dir("/tmp/agenda-test")
    }

    #[test]
    fn message_follows_template() {
        let message = compose(&appointment("3331234567", 7, 9), "dottoressa Pezzella").unwrap();
        assert_eq!(
            message,
            "Gentile Anna Bianchi, ti ricordiamo il tuo appuntamento per Visita posturale \
             il giorno Lunedì 07 ottobre 2024 alle ore 09:05 presso lo studio della \
             dottoressa Pezzella."
        );
    }

    #[test]
    fn message_requires_date_and_time() {
        let mut appt = appointment("3331234567", 7, 9);
        appt.date = None;
        assert!(matches!(
            compose(&appt, "x"),
            Err(ReminderError::Unschedulable(id)) if id == appt.id
        ));
    }

    #[test]
    fn phone_gets_prefix_once() {
        assert_eq!(normalize_phone("333 123 4567", "39"), "393331234567");
        assert_eq!(normalize_phone("+39 333 1234567", "39"), "393331234567");
        assert_eq!(normalize_phone("0039,3331234567", "39"), "393331234567");
        assert_eq!(normalize_phone("393331234567", "39"), "393331234567");
    }

    #[test]
    fn phone_normalization_is_idempotent() {
        for raw in ["333 123 4567", "+393331234567", "00393331234567", "06 1234, 567"] {
            let once = normalize_phone(raw, "39");
            assert_eq!(normalize_phone(&once, "39"), once, "{raw}");
            assert!(once.starts_with("39"));
        }
    }

    #[test]
    fn link_percent_encodes_message() {
        let url = link("https://wa.me/", "393331234567", "Ciao à tutti, 10:00 & più?");
        assert_eq!(
            url,
            "https://wa.me/393331234567?text=Ciao%20%C3%A0%20tutti%2C%2010%3A00%20%26%20pi%C3%B9%3F"
        );
    }

    #[test]
    fn reminder_bundles_link_and_message() {
        let appt = appointment("333 1234567", 7, 9);
        let reminder = reminder_for(&appt, &config()).unwrap();
        assert_eq!(reminder.phone, "393331234567");
        assert_eq!(reminder.patient, "Anna Bianchi");
        assert!(reminder.link.starts_with("https://wa.me/393331234567?text=Gentile%20Anna"));
        assert_eq!(reminder.appointment_id, appt.id);
    }

    #[test]
    fn blank_phone_gets_no_link() {
        for blank in ["", "  ", " , ", "+", "00", "+39"] {
            let mut appt = appointment("3331234567", 7, 9);
            appt.phone = blank.into();
            assert!(matches!(
                reminder_for(&appt, &config()),
                Err(ReminderError::MissingPhone(id)) if id == appt.id
            ));
        }
    }

    #[test]
    fn day_reminders_in_time_order() {
        let late = appointment("3330000001", 7, 16);
        let early = appointment("3330000002", 7, 8);
        let other = appointment("3330000003", 8, 8);
        let book = vec![late.clone(), other, early.clone()];

        let reminders = reminders_for_day(&book, NaiveDate::from_ymd_opt(2024, 10, 7).unwrap(), &config())
            .unwrap();
        let ids: Vec<Uuid> = reminders.iter().map(|r| r.appointment_id).collect();
        assert_eq!(ids, vec![early.id, late.id]);
    }

    #[test]
    fn empty_day_is_reported() {
        let book = vec![appointment("3330000001", 7, 16)];
        let date = NaiveDate::from_ymd_opt(2024, 10, 9).unwrap();
        assert!(matches!(
            reminders_for_day(&book, date, &config()),
            Err(ReminderError::NoAppointments(d)) if d == date
        ));
    }
}
