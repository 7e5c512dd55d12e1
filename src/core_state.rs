//! Application state for one operator sitting.
//!
//! `CoreState` owns the configured stores, the login session and the view
//! state (tab, displayed week, selected day, edit target). Every data
//! operation goes through the session gate first.

use chrono::{Days, Local, NaiveDate};
use uuid::Uuid;

use crate::calendar::{self, CalendarError, MonthView, WeekView};
use crate::config::AppConfig;
use crate::crypto::{CredentialError, CredentialStore};
use crate::db::{AppointmentStore, StoreError};
use crate::models::{Appointment, NewAppointment};

// ═══════════════════════════════════════════════════════════
// Session and view state
// ═══════════════════════════════════════════════════════════

/// Present only after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Calendar,
    NewAppointment,
    Reminders,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub tab: Tab,
    /// First day of the displayed 7-day strip.
    pub week_start: NaiveDate,
    pub selected_day: Option<NaiveDate>,
    /// Appointment currently loaded into the form, if any.
    pub editing: Option<Uuid>,
}

impl ViewState {
    fn starting(today: NaiveDate) -> Self {
        Self {
            tab: Tab::Calendar,
            week_start: calendar::week_start(today),
            selected_day: None,
            editing: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    config: AppConfig,
    credentials: CredentialStore,
    appointments: AppointmentStore,
    session: Option<Session>,
    view: ViewState,
    today: NaiveDate,
}

impl CoreState {
    pub fn new(config: AppConfig) -> Self {
        Self::with_today(config, Local::now().date_naive())
    }

    /// Fixed "today", used for the initial week and after logout.
    pub fn with_today(config: AppConfig, today: NaiveDate) -> Self {
        Self {
            credentials: CredentialStore::new(config.users_path()),
            appointments: AppointmentStore::new(config.appointments_path()),
            config,
            session: None,
            view: ViewState::starting(today),
            today,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    // ── Session gate ────────────────────────────────────────

    pub fn login(&mut self, username: &str, password: &str) -> Result<&Session, CoreError> {
        if !self.credentials.check(username, password)? {
            tracing::warn!(username, "Login rejected");
            return Err(CoreError::InvalidCredentials);
        }
        tracing::info!(username, "Logged in");
        let session = self.session.insert(Session {
            username: username.to_string(),
        });
        Ok(&*session)
    }

    /// Drop the session and reset the view.
    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(username = %session.username, "Logged out");
        }
        self.view = ViewState::starting(self.today);
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn require_session(&self) -> Result<&Session, CoreError> {
        self.session.as_ref().ok_or(CoreError::NotLoggedIn)
    }

    // ── Navigation ──────────────────────────────────────────

    pub fn next_week(&mut self) {
        if let Some(next) = self.view.week_start.checked_add_days(Days::new(7)) {
            self.view.week_start = next;
        }
    }

    pub fn previous_week(&mut self) {
        if let Some(previous) = self.view.week_start.checked_sub_days(Days::new(7)) {
            self.view.week_start = previous;
        }
    }

    /// Show the 7-day strip starting at `start`.
    pub fn show_week_from(&mut self, start: NaiveDate) {
        self.view.week_start = start;
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.view.tab = tab;
    }

    /// Select a day for drill-down and return its appointments.
    pub fn select_day(&mut self, date: NaiveDate) -> Result<Vec<Appointment>, CoreError> {
        let all = self.appointments()?;
        self.view.selected_day = Some(date);
        self.view.tab = Tab::Calendar;
        Ok(calendar::appointments_on(&all, date).into_iter().cloned().collect())
    }

    // ── Calendar reads ──────────────────────────────────────

    pub fn appointments(&self) -> Result<Vec<Appointment>, CoreError> {
        self.require_session()?;
        Ok(self.appointments.load()?)
    }

    pub fn current_week(&self) -> Result<WeekView, CoreError> {
        Ok(calendar::week_view(&self.appointments()?, self.view.week_start))
    }

    pub fn month(&self, year: i32, month: u32) -> Result<MonthView, CoreError> {
        Ok(calendar::month_view(&self.appointments()?, year, month)?)
    }

    // ── Appointment mutations ───────────────────────────────

    pub fn add_appointment(&mut self, input: NewAppointment) -> Result<Appointment, CoreError> {
        self.require_session()?;
        self.view.editing = None;
        Ok(self.appointments.add(input)?)
    }

    /// Load an existing appointment into the form.
    pub fn begin_edit(&mut self, id: Uuid) -> Result<Appointment, CoreError> {
        self.require_session()?;
        let appointment = self.appointments.find(&id)?;
        self.view.editing = Some(id);
        self.view.tab = Tab::NewAppointment;
        Ok(appointment)
    }

    pub fn cancel_edit(&mut self) {
        self.view.editing = None;
    }

    /// Write the form back to the appointment being edited.
    ///
    /// The target is looked up again before writing; if it was deleted in the
    /// meantime the edit is dropped and `NotFound` is returned.
    pub fn save_edit(&mut self, input: NewAppointment) -> Result<Appointment, CoreError> {
        self.require_session()?;
        let id = self.view.editing.ok_or(CoreError::NoEditTarget)?;
        let result = self.appointments.update(&id, input);
        if matches!(result, Ok(_) | Err(StoreError::NotFound { .. })) {
            self.view.editing = None;
        }
        Ok(result?)
    }

    pub fn delete_appointment(&mut self, id: Uuid) -> Result<Appointment, CoreError> {
        self.require_session()?;
        let removed = self.appointments.delete(&id)?;
        self.view.editing = None;
        Ok(removed)
    }

    // ── Credentials ─────────────────────────────────────────

    /// Change the logged-in operator's password. Success ends the session.
    pub fn change_password(
        &mut self,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), CoreError> {
        let username = self.require_session()?.username.clone();
        self.credentials
            .change(&username, old_password, new_password, confirm_password)?;
        self.logout();
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("No appointment selected for editing")]
    NoEditTarget,
    #[error("Credential error: {0}")]
    Credentials(#[from] CredentialError),
    #[error("Appointment store error: {0}")]
    Store(#[from] StoreError),
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),
}
