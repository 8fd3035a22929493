//! Calendar-date helpers shared by the rule modules.
//!
//! Due dates travel as text between the dashboard, the database and this service,
//! in several shapes (`2024-01-15`, `2024-01-15T00:00:00Z`, `15/01/2024`). Everything
//! is reduced to a `NaiveDate` before any rule looks at it.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime};

/// Parses a due date from any of the textual forms accepted on the wire.
///
/// Timestamps resolve to the calendar date written in their own offset, so
/// `2024-01-15` and `2024-01-15T00:00:00Z` are the same due date.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            // Postgres timestamptz text form: "2024-01-15 00:00:00+00"
            DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z")
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| parse_br_date(raw).ok())
}

/// Parses the Brazilian `dd/mm/yyyy` form.
pub fn parse_br_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, "%d/%m/%Y")
}

/// Formats a date as `dd/mm/yyyy`.
pub fn format_br_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Adds calendar months, clamping to the last day of the target month
/// (Jan 31 + 1 month = Feb 29 in a leap year).
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Builds `year-month-day`, pulling `day` back to the month's last day when the month
/// is shorter.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last_day = first.checked_add_months(Months::new(1))?.pred_opt()?.day();
    NaiveDate::from_ymd_opt(year, month, day.min(last_day))
}

/// Serde adapter for due dates: accepts every form `parse_due_date` does and always
/// writes `YYYY-MM-DD`.
pub mod flexible_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_due_date(&raw).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid date '{}': expected YYYY-MM-DD, RFC 3339 or dd/mm/yyyy",
                raw
            ))
        })
    }
}

/// Same as [`flexible_date`] for optional fields.
pub mod flexible_date_opt {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => super::flexible_date::serialize(d, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse_due_date(&s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date '{}'", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_due_date_forms() {
        let expected = ymd(2024, 1, 15);
        assert_eq!(parse_due_date("2024-01-15"), Some(expected));
        assert_eq!(parse_due_date("2024-01-15T00:00:00Z"), Some(expected));
        assert_eq!(parse_due_date("2024-01-15T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_due_date("2024-01-15T21:30:00-03:00"), Some(expected));
        assert_eq!(parse_due_date("2024-01-15 00:00:00+00"), Some(expected));
        assert_eq!(parse_due_date("2024-01-15T08:00:00"), Some(expected));
        assert_eq!(parse_due_date("2024-01-15 08:00:00"), Some(expected));
        assert_eq!(parse_due_date("15/01/2024"), Some(expected));
        assert_eq!(parse_due_date(" 2024-01-15 "), Some(expected));
    }

    #[test]
    fn test_parse_due_date_rejects_garbage() {
        assert_eq!(parse_due_date(""), None);
        assert_eq!(parse_due_date("amanhã"), None);
        assert_eq!(parse_due_date("2024-02-30"), None);
    }

    #[test]
    fn test_add_months_clamps() {
        assert_eq!(add_months(ymd(2024, 1, 31), 1), Some(ymd(2024, 2, 29)));
        assert_eq!(add_months(ymd(2023, 1, 31), 1), Some(ymd(2023, 2, 28)));
        assert_eq!(add_months(ymd(2024, 11, 15), 3), Some(ymd(2025, 2, 15)));
    }

    #[test]
    fn test_clamped_date() {
        assert_eq!(clamped_date(2024, 2, 31), Some(ymd(2024, 2, 29)));
        assert_eq!(clamped_date(2024, 4, 31), Some(ymd(2024, 4, 30)));
        assert_eq!(clamped_date(2024, 12, 31), Some(ymd(2024, 12, 31)));
        assert_eq!(clamped_date(2024, 13, 1), None);
    }

    #[test]
    fn test_format_br_date() {
        assert_eq!(format_br_date(ymd(2024, 3, 5)), "05/03/2024");
    }
}
