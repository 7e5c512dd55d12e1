//! Appointment book persisted as a flat CSV file.
//!
//! The file is always rewritten whole. Rows are read as raw strings and go
//! through [`format_appointments`] before anyone else sees them, so a bad cell
//! degrades to the missing marker instead of failing the whole load.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{write_atomic, StoreError};
use crate::models::{clean_phone, parse_date, parse_time, Appointment, NewAppointment, VisitType};

/// Fixed column schema, in file order.
pub const COLUMNS: [&str; 7] = [
    "ID",
    "Nome",
    "Cognome",
    "Cellulare",
    "Tipo Visita",
    "Giorno Visita",
    "Ora Visita",
];

/// One line of the appointment file, exactly as stored.
///
/// Every column defaults to empty so files written before the `ID` column
/// existed still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRow {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "Nome", default)]
    pub first_name: String,
    #[serde(rename = "Cognome", default)]
    pub last_name: String,
    #[serde(rename = "Cellulare", default)]
    pub phone: String,
    #[serde(rename = "Tipo Visita", default)]
    pub visit_type: String,
    #[serde(rename = "Giorno Visita", default)]
    pub date: String,
    #[serde(rename = "Ora Visita", default)]
    pub time: String,
}

impl From<&Appointment> for AppointmentRow {
    fn from(appt: &Appointment) -> Self {
        Self {
            id: appt.id.to_string(),
            first_name: appt.first_name.clone(),
            last_name: appt.last_name.clone(),
            phone: appt.phone.clone(),
            visit_type: appt.visit_type.as_str().to_string(),
            date: appt.date_label(),
            time: appt.time_label(),
        }
    }
}

// ═══════════════════════════════════════════
// Row codec
// ═══════════════════════════════════════════

/// Read raw rows from CSV content with a header line.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<AppointmentRow>, StoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<AppointmentRow>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::from)
}

/// Serialize appointments to CSV. The header is written even for an empty
/// collection so the file always carries the column schema.
pub fn write_rows(appointments: &[Appointment]) -> Result<Vec<u8>, StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for appt in appointments {
        writer.serialize(AppointmentRow::from(appt))?;
    }

    writer
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))
}

/// Normalize raw rows into appointments.
///
/// Phone separators are stripped, dates and times parsed; cells that do not
/// parse become `None`. Rows without a valid identifier get a fresh one.
/// An unknown visit type is the only hard failure.
pub fn format_appointments(rows: Vec<AppointmentRow>) -> Result<Vec<Appointment>, StoreError> {
    rows.into_iter()
        .enumerate()
        .map(|(line, row)| format_row(line, row))
        .collect()
}

fn format_row(line: usize, row: AppointmentRow) -> Result<Appointment, StoreError> {
    let date = parse_date(&row.date);
    if date.is_none() && !row.date.is_empty() {
        tracing::warn!(line, value = %row.date, "Unreadable visit date, stored as missing");
    }
    let time = parse_time(&row.time);
    if time.is_none() && !row.time.is_empty() {
        tracing::warn!(line, value = %row.time, "Unreadable visit time, stored as missing");
    }

    Ok(Appointment {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::new_v4()),
        first_name: row.first_name,
        last_name: row.last_name,
        phone: clean_phone(&row.phone),
        visit_type: VisitType::from_str(&row.visit_type)?,
        date,
        time,
    })
}

// ═══════════════════════════════════════════
// Store
// ═══════════════════════════════════════════

/// File-backed appointment collection. Every mutation is a full
/// read-modify-write of the backing file; there is no locking.
#[derive(Debug, Clone)]
pub struct AppointmentStore {
    path: PathBuf,
}

impl AppointmentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every appointment. A missing file is an empty book.
    ///
    /// Rows that had no identifier are given one and written back at once,
    /// so identifiers stay stable across loads.
    pub fn load(&self) -> Result<Vec<Appointment>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = std::fs::File::open(&self.path)?;
        let rows = read_rows(file)?;
        let unidentified = rows
            .iter()
            .filter(|row| Uuid::parse_str(&row.id).is_err())
            .count();

        let appointments = format_appointments(rows)?;

        if unidentified > 0 {
            tracing::info!(count = unidentified, "Assigned identifiers to appointments");
            self.save(&appointments)?;
        }
        Ok(appointments)
    }

    /// Replace the whole file with `appointments`.
    pub fn save(&self, appointments: &[Appointment]) -> Result<(), StoreError> {
        let bytes = write_rows(appointments)?;
        write_atomic(&self.path, &bytes)?;
        tracing::debug!(count = appointments.len(), path = %self.path.display(), "Appointments saved");
        Ok(())
    }

    pub fn find(&self, id: &Uuid) -> Result<Appointment, StoreError> {
        self.load()?
            .into_iter()
            .find(|a| a.id == *id)
            .ok_or_else(|| not_found(id))
    }

    /// Append a new appointment and persist. Returns the stored record.
    pub fn add(&self, input: NewAppointment) -> Result<Appointment, StoreError> {
        let mut appointments = self.load()?;
        let created = Appointment::create(input);
        appointments.push(created.clone());
        self.save(&appointments)?;
        tracing::info!(appointment_id = %created.id, "Appointment created");
        Ok(created)
    }

    /// Overwrite the editable fields of an existing appointment in place.
    pub fn update(&self, id: &Uuid, input: NewAppointment) -> Result<Appointment, StoreError> {
        let mut appointments = self.load()?;
        let target = appointments
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or_else(|| not_found(id))?;
        target.apply(input);
        let updated = target.clone();
        self.save(&appointments)?;
        tracing::info!(appointment_id = %id, "Appointment updated");
        Ok(updated)
    }

    /// Remove an appointment and persist. Returns the removed record.
    pub fn delete(&self, id: &Uuid) -> Result<Appointment, StoreError> {
        let mut appointments = self.load()?;
        let index = appointments
            .iter()
            .position(|a| a.id == *id)
            .ok_or_else(|| not_found(id))?;
        let removed = appointments.remove(index);
        self.save(&appointments)?;
        tracing::info!(appointment_id = %id, "Appointment deleted");
        Ok(removed)
    }
}

fn not_found(id: &Uuid) -> StoreError {
    StoreError::NotFound {
        entity_type: "Appointment".into(),
        id: id.to_string(),
    }
}
