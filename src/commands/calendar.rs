//! Calendar commands: week strip, month grid, day drill-down.

use chrono::{Datelike, Days, NaiveDate};

use super::{parse_date_arg, CommandError};
use crate::calendar::{MonthView, WeekView};
use crate::core_state::CoreState;
use crate::models::Appointment;

/// Week strip from `from` (default: the current week's Monday), moved by
/// `offset` whole weeks.
pub fn week(
    state: &mut CoreState,
    from: Option<&str>,
    offset: i32,
) -> Result<WeekView, CommandError> {
    if let Some(raw) = from {
        state.show_week_from(parse_date_arg(raw)?);
    }
    if offset != 0 {
        let start = state.view().week_start;
        let days = Days::new(7 * u64::from(offset.unsigned_abs()));
        let moved = if offset > 0 {
            start.checked_add_days(days)
        } else {
            start.checked_sub_days(days)
        };
        let moved = moved.ok_or_else(|| {
            CommandError::ValidationFailure(format!("week offset {offset} is out of range"))
        })?;
        state.show_week_from(moved);
    }
    Ok(state.current_week()?)
}

/// Month grid; missing year or month default to today's.
pub fn month(
    state: &CoreState,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<MonthView, CommandError> {
    let today = state.today();
    Ok(state.month(year.unwrap_or(today.year()), month.unwrap_or(today.month()))?)
}

/// Appointments on one day, earliest first.
pub fn day(state: &mut CoreState, date: &str) -> Result<(NaiveDate, Vec<Appointment>), CommandError> {
    let date = parse_date_arg(date)?;
    let appointments = state.select_day(date)?;
    Ok((date, appointments))
}
