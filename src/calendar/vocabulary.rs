use chrono::{Datelike, NaiveDate};

/// Fixed table of calendar words. Every view and every reminder reads its
/// names from here; the system locale is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarTerms {
    /// Monday first.
    pub weekdays: [&'static str; 7],
    pub weekdays_short: [&'static str; 7],
    /// January first.
    pub months: [&'static str; 12],
}

impl CalendarTerms {
    pub const ITALIAN: CalendarTerms = CalendarTerms {
        weekdays: [
            "Lunedì",
            "Martedì",
            "Mercoledì",
            "Giovedì",
            "Venerdì",
            "Sabato",
            "Domenica",
        ],
        weekdays_short: ["Lun", "Mar", "Mer", "Gio", "Ven", "Sab", "Dom"],
        months: [
            "gennaio",
            "febbraio",
            "marzo",
            "aprile",
            "maggio",
            "giugno",
            "luglio",
            "agosto",
            "settembre",
            "ottobre",
            "novembre",
            "dicembre",
        ],
    };

    pub fn weekday(&self, date: NaiveDate) -> &'static str {
        self.weekdays[date.weekday().num_days_from_monday() as usize]
    }

    pub fn weekday_short(&self, date: NaiveDate) -> &'static str {
        self.weekdays_short[date.weekday().num_days_from_monday() as usize]
    }

    /// Month name for a 1-based month number.
    pub fn month(&self, month: u32) -> Option<&'static str> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.months.get(index).copied()
    }

    /// "Lunedì 07 ottobre 2024"
    pub fn long_date(&self, date: NaiveDate) -> String {
        format!(
            "{} {:02} {} {}",
            self.weekday(date),
            date.day(),
            self.months[date.month0() as usize],
            date.year()
        )
    }

    /// "ottobre 2024"
    pub fn month_title(&self, date: NaiveDate) -> String {
        format!("{} {}", self.months[date.month0() as usize], date.year())
    }
}

impl Default for CalendarTerms {
    fn default() -> Self {
        Self::ITALIAN
    }
}
