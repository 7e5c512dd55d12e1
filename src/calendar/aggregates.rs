use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};

use super::types::*;
use super::vocabulary::CalendarTerms;
use super::CalendarError;
use crate::models::Appointment;

/// Per-day appointment counts. Records whose date or time is missing have
/// no timestamp and are not counted.
pub fn counts_by_day(appointments: &[Appointment]) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for scheduled in appointments.iter().filter_map(Appointment::scheduled_at) {
        *counts.entry(scheduled.date()).or_insert(0) += 1;
    }
    counts
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Seven consecutive days from `anchor` (inclusive) with their counts.
pub fn week_view(appointments: &[Appointment], anchor: NaiveDate) -> WeekView {
    week_view_with(appointments, anchor, &CalendarTerms::ITALIAN)
}

pub fn week_view_with(
    appointments: &[Appointment],
    anchor: NaiveDate,
    terms: &CalendarTerms,
) -> WeekView {
    let counts = counts_by_day(appointments);
    let days: Vec<DaySummary> = anchor
        .iter_days()
        .take(7)
        .map(|date| summarize(date, &counts, terms))
        .collect();

    let end = days.last().map(|d| d.date).unwrap_or(anchor);
    let total = days.iter().map(|d| d.count).sum();
    let label = format!("{} - {}", terms.long_date(anchor), terms.long_date(end));

    WeekView {
        start: anchor,
        end,
        label,
        days,
        total,
    }
}

/// Full Monday-first grid for one month.
pub fn month_view(
    appointments: &[Appointment],
    year: i32,
    month: u32,
) -> Result<MonthView, CalendarError> {
    month_view_with(appointments, year, month, &CalendarTerms::ITALIAN)
}

pub fn month_view_with(
    appointments: &[Appointment],
    year: i32,
    month: u32,
    terms: &CalendarTerms,
) -> Result<MonthView, CalendarError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(CalendarError::InvalidMonth { year, month })?;
    let counts = counts_by_day(appointments);

    let leading = first.weekday().num_days_from_monday() as usize;
    let mut cells: Vec<Option<DaySummary>> = vec![None; leading];
    cells.extend(
        first
            .iter_days()
            .take_while(|date| date.month() == month)
            .map(|date| Some(summarize(date, &counts, terms))),
    );
    let trailing = (7 - cells.len() % 7) % 7;
    cells.extend(std::iter::repeat(None).take(trailing));

    let weeks: Vec<[Option<DaySummary>; 7]> = cells
        .chunks(7)
        .map(|row| std::array::from_fn(|i| row[i].clone()))
        .collect();
    let total = weeks
        .iter()
        .flat_map(|week| week.iter().flatten())
        .map(|d| d.count)
        .sum();

    Ok(MonthView {
        year,
        month,
        title: terms.month_title(first),
        weekday_headers: terms.weekdays_short,
        weeks,
        total,
    })
}

/// Appointments on `date` that have a timestamp, earliest first.
pub fn appointments_on(appointments: &[Appointment], date: NaiveDate) -> Vec<&Appointment> {
    let mut day: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.scheduled_at().is_some_and(|at| at.date() == date))
        .collect();
    day.sort_by_key(|a| a.scheduled_at());
    day
}

/// Records left out of every view because their date or time is missing.
pub fn unscheduled(appointments: &[Appointment]) -> Vec<&Appointment> {
    appointments
        .iter()
        .filter(|a| a.scheduled_at().is_none())
        .collect()
}

fn summarize(
    date: NaiveDate,
    counts: &BTreeMap<NaiveDate, usize>,
    terms: &CalendarTerms,
) -> DaySummary {
    DaySummary {
        date,
        weekday: terms.weekday(date),
        day: date.day(),
        count: counts.get(&date).copied().unwrap_or(0),
    }
}
