//! Weekend and holiday rules for due dates.

use crate::dates::format_br_date;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do with a due date that falls on a weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekendHandling {
    /// Move back to the previous Friday.
    #[serde(alias = "anticipate")]
    Advance,
    /// Move forward to the next Monday.
    Postpone,
    /// Same as `Postpone`; the name the settings screen stores.
    #[default]
    NextBusinessDay,
    /// Leave the date on the weekend.
    Keep,
}

impl WeekendHandling {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekendHandling::Advance => "advance",
            WeekendHandling::Postpone => "postpone",
            WeekendHandling::NextBusinessDay => "next_business_day",
            WeekendHandling::Keep => "keep",
        }
    }
}

impl fmt::Display for WeekendHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeekendHandling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "advance" | "anticipate" => Ok(WeekendHandling::Advance),
            "postpone" => Ok(WeekendHandling::Postpone),
            "next_business_day" => Ok(WeekendHandling::NextBusinessDay),
            "keep" => Ok(WeekendHandling::Keep),
            other => Err(format!(
                "unknown weekend handling '{}': expected advance, postpone, next_business_day or keep",
                other
            )),
        }
    }
}

/// National holidays (yyyy, mm, dd) the office calendar knows about.
const NATIONAL_HOLIDAYS: &[(i32, u32, u32)] = &[
    // 2025
    (2025, 1, 1),   // Confraternização Universal
    (2025, 3, 3),   // Carnaval
    (2025, 3, 4),   // Carnaval
    (2025, 4, 18),  // Paixão de Cristo
    (2025, 4, 20),  // Páscoa
    (2025, 4, 21),  // Tiradentes
    (2025, 5, 1),   // Dia do Trabalho
    (2025, 6, 19),  // Corpus Christi
    (2025, 9, 7),   // Independência
    (2025, 10, 12), // Nossa Senhora Aparecida
    (2025, 11, 2),  // Finados
    (2025, 11, 15), // Proclamação da República
    (2025, 11, 20), // Consciência Negra
    (2025, 12, 25), // Natal
    // 2026
    (2026, 1, 1),
    (2026, 2, 16),
    (2026, 2, 17),
    (2026, 4, 3),
    (2026, 4, 5),
    (2026, 4, 21),
    (2026, 5, 1),
    (2026, 6, 4),
    (2026, 9, 7),
    (2026, 10, 12),
    (2026, 11, 2),
    (2026, 11, 15),
    (2026, 11, 20),
    (2026, 12, 25),
];

/// Why a date is not a business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NonBusinessDay {
    Weekend,
    Holiday,
    /// A holiday that also falls on a weekend.
    Both,
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_holiday(date: NaiveDate) -> bool {
    NATIONAL_HOLIDAYS
        .iter()
        .any(|&(y, m, d)| date.year() == y && date.month() == m && date.day() == d)
}

pub fn classify_day(date: NaiveDate) -> Option<NonBusinessDay> {
    match (is_weekend(date), is_holiday(date)) {
        (true, true) => Some(NonBusinessDay::Both),
        (true, false) => Some(NonBusinessDay::Weekend),
        (false, true) => Some(NonBusinessDay::Holiday),
        (false, false) => None,
    }
}

/// Monday after a weekend date; other dates unchanged.
pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

/// Friday before a weekend date; other dates unchanged.
pub fn previous_business_day(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date - Duration::days(2),
        _ => date,
    }
}

/// Moves a weekend due date according to `handling`. Holidays are reported but not moved.
pub fn adjust_due_date_for_weekend(date: NaiveDate, handling: WeekendHandling) -> NaiveDate {
    if !is_weekend(date) {
        return date;
    }

    match handling {
        WeekendHandling::Advance => previous_business_day(date),
        WeekendHandling::Postpone | WeekendHandling::NextBusinessDay => next_business_day(date),
        WeekendHandling::Keep => date,
    }
}

/// `dd/mm/yyyy`, plus ` (orig: dd/mm/yyyy)` when the original differs.
pub fn format_adjusted_date(due: NaiveDate, original: Option<NaiveDate>) -> String {
    match original {
        Some(orig) if orig != due => {
            format!("{} (orig: {})", format_br_date(due), format_br_date(orig))
        }
        _ => format_br_date(due),
    }
}

/// Short pt-BR weekday name.
pub fn weekday_abbreviation(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Sun => "Dom",
        Weekday::Mon => "Seg",
        Weekday::Tue => "Ter",
        Weekday::Wed => "Qua",
        Weekday::Thu => "Qui",
        Weekday::Fri => "Sex",
        Weekday::Sat => "Sáb",
    }
}

/// Warning shown next to the due-date field when the date is not a business day.
pub fn non_business_day_message(date: NaiveDate) -> Option<String> {
    let kind = classify_day(date)?;
    let day = format_br_date(date);
    let message = match kind {
        NonBusinessDay::Weekend => format!(
            "{} cai em um final de semana ({}).",
            day,
            weekday_abbreviation(date)
        ),
        NonBusinessDay::Holiday => format!("{} é feriado nacional.", day),
        NonBusinessDay::Both => format!(
            "{} é feriado nacional e cai em um final de semana ({}).",
            day,
            weekday_abbreviation(date)
        ),
    };
    Some(message)
}
