use chrono::NaiveDate;
use serde::Serialize;

/// One day with its appointment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub day: u32,
    pub count: usize,
}

/// Seven consecutive days starting at `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// "Lunedì 07 ottobre 2024 - Domenica 13 ottobre 2024"
    pub label: String,
    pub days: Vec<DaySummary>,
    pub total: usize,
}

/// Monday-first month grid. Cells outside the month are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub weekday_headers: [&'static str; 7],
    pub weeks: Vec<[Option<DaySummary>; 7]>,
    pub total: usize,
}

impl MonthView {
    /// Non-blank cells in calendar order.
    pub fn days(&self) -> impl Iterator<Item = &DaySummary> {
        self.weeks.iter().flat_map(|week| week.iter().flatten())
    }
}
