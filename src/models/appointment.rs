use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::VisitType;

/// One scheduled patient visit.
///
/// `date` and `time` are `None` when the stored value could not be parsed;
/// such records stay editable but are left out of calendar aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub visit_type: VisitType,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

impl Appointment {
    /// Build a record with a fresh identifier.
    pub fn create(input: NewAppointment) -> Self {
        let mut appointment = Self {
            id: Uuid::new_v4(),
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            visit_type: input.visit_type,
            date: None,
            time: None,
        };
        appointment.apply(input);
        appointment
    }

    /// Overwrite every editable field, keeping the identifier.
    pub fn apply(&mut self, input: NewAppointment) {
        self.first_name = input.first_name.trim().to_string();
        self.last_name = input.last_name.trim().to_string();
        self.phone = clean_phone(&input.phone);
        self.visit_type = input.visit_type;
        self.date = Some(input.date);
        self.time = Some(input.time);
    }

    /// Combined date and time, or `None` when either part is missing.
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        Some(self.date?.and_time(self.time?))
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// `YYYY-MM-DD`, or empty for the missing marker.
    pub fn date_label(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// `HH:MM`, or empty for the missing marker.
    pub fn time_label(&self) -> String {
        self.time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default()
    }
}

/// Editable fields of an appointment, already parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub visit_type: VisitType,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Strip the separators operators and spreadsheets leave in phone numbers.
pub fn clean_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect()
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S"];

/// Parse a visit date as written by operators or spreadsheet exports.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse `HH:MM` or `HH:MM:SS`; seconds are dropped.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
        .and_then(|t| t.with_second(0))
}
