//! Monthly installment schedule for a newly registered obligation.

use crate::business_days::{adjust_due_date_for_weekend, WeekendHandling};
use crate::dates::add_months;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedInstallment {
    pub installment_number: u32,
    pub total_installments: u32,
    #[serde(with = "crate::dates::flexible_date")]
    pub due_date: NaiveDate,
    /// Unadjusted date, kept only when a weekend moved it.
    #[serde(with = "crate::dates::flexible_date_opt")]
    pub original_due_date: Option<NaiveDate>,
}

/// Lays out `total` monthly installments starting at `first_due`.
///
/// Installment `i` falls `i - 1` months after the first one, counted from the first
/// date every time, so a 31st keeps coming back to the 31st when the month allows it.
/// A plan of zero or one installment is empty: the obligation's own due date covers it.
pub fn plan_installments(
    first_due: NaiveDate,
    total: u32,
    handling: WeekendHandling,
) -> Vec<PlannedInstallment> {
    if total <= 1 {
        return Vec::new();
    }

    (1..=total)
        .map_while(|number| {
            let base = add_months(first_due, number - 1)?;
            let due = adjust_due_date_for_weekend(base, handling);
            Some(PlannedInstallment {
                installment_number: number,
                total_installments: total,
                due_date: due,
                original_due_date: (due != base).then_some(base),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_end_plan() {
        let plan = plan_installments(ymd(2024, 1, 31), 3, WeekendHandling::NextBusinessDay);
        let dues: Vec<_> = plan.iter().map(|p| p.due_date).collect();
        assert_eq!(dues, vec![ymd(2024, 1, 31), ymd(2024, 2, 29), ymd(2024, 4, 1)]);
        assert_eq!(plan[2].original_due_date, Some(ymd(2024, 3, 31)));
        assert_eq!(plan[0].original_due_date, None);
        assert!(plan.iter().all(|p| p.total_installments == 3));
    }

    #[test]
    fn test_keep_leaves_weekends() {
        let plan = plan_installments(ymd(2024, 1, 31), 3, WeekendHandling::Keep);
        assert_eq!(plan[2].due_date, ymd(2024, 3, 31));
        assert_eq!(plan[2].original_due_date, None);
    }

    #[test]
    fn test_single_installment_is_empty() {
        assert!(plan_installments(ymd(2024, 1, 10), 1, WeekendHandling::Advance).is_empty());
        assert!(plan_installments(ymd(2024, 1, 10), 0, WeekendHandling::Advance).is_empty());
    }
}
