//! Fiscal recurrence calculator.
//!
//! Competence-period labels, forward projection of due dates and the month checks
//! used to decide when a recurring obligation comes due again.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of occurrences projected when the caller does not ask for a specific count.
pub const DEFAULT_OCCURRENCE_COUNT: usize = 12;

const SHORT_MONTHS_PT_BR: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// How often an obligation repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    #[default]
    None,
    Monthly,
    Quarterly,
    Semiannual,
    Annual,
}

impl RecurrenceType {
    pub const ALL: [RecurrenceType; 5] = [
        RecurrenceType::None,
        RecurrenceType::Monthly,
        RecurrenceType::Quarterly,
        RecurrenceType::Semiannual,
        RecurrenceType::Annual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceType::None => "none",
            RecurrenceType::Monthly => "monthly",
            RecurrenceType::Quarterly => "quarterly",
            RecurrenceType::Semiannual => "semiannual",
            RecurrenceType::Annual => "annual",
        }
    }

    /// pt-BR label shown to the office staff.
    pub fn label(&self) -> &'static str {
        match self {
            RecurrenceType::None => "Única",
            RecurrenceType::Monthly => "Mensal",
            RecurrenceType::Quarterly => "Trimestral",
            RecurrenceType::Semiannual => "Semestral",
            RecurrenceType::Annual => "Anual",
        }
    }

    /// Months between two consecutive occurrences. Zero for one-off obligations.
    pub fn month_increment(&self) -> u32 {
        match self {
            RecurrenceType::None => 0,
            RecurrenceType::Monthly => 1,
            RecurrenceType::Quarterly => 3,
            RecurrenceType::Semiannual => 6,
            RecurrenceType::Annual => 12,
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, RecurrenceType::None)
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a recurrence name is not one of the known kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRecurrence(pub String);

impl fmt::Display for UnknownRecurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown recurrence '{}': expected none, monthly, quarterly, semiannual or annual",
            self.0
        )
    }
}

impl std::error::Error for UnknownRecurrence {}

impl FromStr for RecurrenceType {
    type Err = UnknownRecurrence;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        RecurrenceType::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| UnknownRecurrence(s.to_string()))
    }
}

/// Competence-period label for `date`.
///
/// - quarterly: `1º Trim/2024`
/// - semiannual: `2º Sem/2024`
/// - annual: `2024`
/// - monthly and one-off: `jan/2024`
pub fn format_reference_date(date: NaiveDate, recurrence: RecurrenceType) -> String {
    match recurrence {
        RecurrenceType::Quarterly => {
            format!("{}º Trim/{:04}", date.month0() / 3 + 1, date.year())
        }
        RecurrenceType::Semiannual => {
            let semester = if date.month0() < 6 { 1 } else { 2 };
            format!("{}º Sem/{:04}", semester, date.year())
        }
        RecurrenceType::Annual => format!("{:04}", date.year()),
        RecurrenceType::Monthly | RecurrenceType::None => format!(
            "{}/{:04}",
            SHORT_MONTHS_PT_BR[date.month0() as usize],
            date.year()
        ),
    }
}

/// Lazy projection of future due dates. See [`occurrences`].
#[derive(Debug, Clone)]
pub struct Occurrences {
    current: NaiveDate,
    increment: u32,
    remaining: usize,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.remaining == 0 || self.increment == 0 {
            return None;
        }

        match self.current.checked_add_months(Months::new(self.increment)) {
            Some(next) => {
                self.current = next;
                self.remaining -= 1;
                Some(next)
            }
            None => {
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.increment == 0 {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}

impl std::iter::FusedIterator for Occurrences {}

/// Iterates the next `count` due dates after `base`, each one the previous plus the
/// recurrence's month increment. Steps accumulate, so a day clamped at a short month
/// stays clamped (Jan 31 → Feb 29 → Mar 29). One-off recurrences yield nothing.
pub fn occurrences(base: NaiveDate, recurrence: RecurrenceType, count: usize) -> Occurrences {
    Occurrences {
        current: base,
        increment: recurrence.month_increment(),
        remaining: count,
    }
}

/// Eager form of [`occurrences`].
pub fn generate_next_occurrences(
    base: NaiveDate,
    recurrence: RecurrenceType,
    count: usize,
) -> Vec<NaiveDate> {
    occurrences(base, recurrence, count).collect()
}

/// Quarterly obligations fall due in the month after each quarter closes:
/// January, April, July and October.
pub fn is_quarterly_due_date(date: NaiveDate) -> bool {
    matches!(date.month(), 1 | 4 | 7 | 10)
}

/// Whether a recurring item should be re-created in `date`'s month.
pub fn is_recurrence_month(recurrence: RecurrenceType, date: NaiveDate) -> bool {
    match recurrence {
        RecurrenceType::Monthly => true,
        RecurrenceType::Quarterly => is_quarterly_due_date(date),
        RecurrenceType::Semiannual => matches!(date.month(), 1 | 7),
        RecurrenceType::Annual => date.month() == 1,
        RecurrenceType::None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reference_labels() {
        assert_eq!(
            format_reference_date(ymd(2024, 2, 1), RecurrenceType::Quarterly),
            "1º Trim/2024"
        );
        assert_eq!(
            format_reference_date(ymd(2024, 12, 31), RecurrenceType::Quarterly),
            "4º Trim/2024"
        );
        assert_eq!(
            format_reference_date(ymd(2024, 5, 1), RecurrenceType::Semiannual),
            "1º Sem/2024"
        );
        assert_eq!(
            format_reference_date(ymd(2024, 8, 1), RecurrenceType::Semiannual),
            "2º Sem/2024"
        );
        assert_eq!(
            format_reference_date(ymd(2024, 1, 1), RecurrenceType::Annual),
            "2024"
        );
        assert_eq!(
            format_reference_date(ymd(2024, 1, 10), RecurrenceType::Monthly),
            "jan/2024"
        );
        assert_eq!(
            format_reference_date(ymd(2024, 9, 10), RecurrenceType::None),
            "set/2024"
        );
    }

    #[test]
    fn test_monthly_occurrences() {
        assert_eq!(
            generate_next_occurrences(ymd(2024, 1, 1), RecurrenceType::Monthly, 3),
            vec![ymd(2024, 2, 1), ymd(2024, 3, 1), ymd(2024, 4, 1)]
        );
    }

    #[test]
    fn test_none_produces_nothing() {
        assert!(generate_next_occurrences(ymd(2024, 1, 1), RecurrenceType::None, 5).is_empty());
    }

    #[test]
    fn test_clamping_accumulates() {
        assert_eq!(
            generate_next_occurrences(ymd(2024, 1, 31), RecurrenceType::Monthly, 3),
            vec![ymd(2024, 2, 29), ymd(2024, 3, 29), ymd(2024, 4, 29)]
        );
    }

    #[test]
    fn test_default_count() {
        let dates = generate_next_occurrences(
            ymd(2024, 1, 15),
            RecurrenceType::Annual,
            DEFAULT_OCCURRENCE_COUNT,
        );
        assert_eq!(dates.len(), 12);
        assert_eq!(dates.last(), Some(&ymd(2036, 1, 15)));
    }

    #[test]
    fn test_quarterly_due_months() {
        let due: Vec<u32> = (1..=12)
            .filter(|m| is_quarterly_due_date(ymd(2024, *m, 10)))
            .collect();
        assert_eq!(due, vec![1, 4, 7, 10]);
    }

    #[test]
    fn test_recurrence_months() {
        let months = |r: RecurrenceType| -> Vec<u32> {
            (1..=12)
                .filter(|m| is_recurrence_month(r, ymd(2025, *m, 1)))
                .collect()
        };
        assert_eq!(months(RecurrenceType::Monthly).len(), 12);
        assert_eq!(months(RecurrenceType::Quarterly), vec![1, 4, 7, 10]);
        assert_eq!(months(RecurrenceType::Semiannual), vec![1, 7]);
        assert_eq!(months(RecurrenceType::Annual), vec![1]);
        assert!(months(RecurrenceType::None).is_empty());
    }

    #[test]
    fn test_parse_recurrence() {
        assert_eq!(
            "Quarterly".parse::<RecurrenceType>(),
            Ok(RecurrenceType::Quarterly)
        );
        assert_eq!(" none ".parse::<RecurrenceType>(), Ok(RecurrenceType::None));
        assert!("weekly".parse::<RecurrenceType>().is_err());
    }
}
