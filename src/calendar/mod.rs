//! Calendar views over the appointment book.
//!
//! Everything here is a pure function of the appointment collection and a
//! date: per-day counts, a 7-day week strip, a Monday-first month grid and
//! the drill-down list for one day. Which day is selected is UI state and
//! lives in `core_state`, not here.

mod aggregates;
mod types;
mod vocabulary;

pub use aggregates::*;
pub use types::*;
pub use vocabulary::*;

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Invalid month {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },
}

// ── Tests ──────────────────────────────────────────────────────────────────
