//! Monthly auto-creation of recurring obligations and taxes.
//!
//! On the first day of each month every settled recurring item whose cadence falls
//! in that month is copied forward as a pending item, keeping its original due day.

use crate::business_days::{adjust_due_date_for_weekend, WeekendHandling};
use crate::dates::clamped_date;
use crate::db_storage::{FiscalStorage, InsertOutcome};
use crate::errors::{AppError, ResultExt};
use crate::fiscal::is_recurrence_month;
use crate::models::{RecurringKind, RecurringSource};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Due date planned for a copied item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedRecurrence {
    pub due_date: NaiveDate,
    /// Date before the weekend adjustment, when it moved.
    pub original_due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurrenceRunSummary {
    #[serde(with = "crate::dates::flexible_date")]
    pub date: NaiveDate,
    pub skipped: bool,
    pub created: u32,
    pub duplicates: u32,
    pub failures: u32,
    pub message: String,
}

impl RecurrenceRunSummary {
    fn skipped(date: NaiveDate) -> Self {
        Self {
            date,
            skipped: true,
            created: 0,
            duplicates: 0,
            failures: 0,
            message: "Not the first day of month, skipping".to_string(),
        }
    }
}

pub fn is_run_day(today: NaiveDate) -> bool {
    today.day() == 1
}

/// Whether `source` gets a copy when the job runs on `today`.
pub fn is_due_for_copy(source: &RecurringSource, today: NaiveDate) -> bool {
    source.recurrence.is_recurring() && is_recurrence_month(source.recurrence, today)
}

/// Source's due day moved into `today`'s month, clamped to the month's last day, then
/// weekend-adjusted.
pub fn next_due_date(
    source_due: NaiveDate,
    today: NaiveDate,
    handling: WeekendHandling,
) -> Option<PlannedRecurrence> {
    let base = clamped_date(today.year(), today.month(), source_due.day())?;
    let due_date = adjust_due_date_for_weekend(base, handling);
    Some(PlannedRecurrence {
        due_date,
        original_due_date: (due_date != base).then_some(base),
    })
}

/// Runs the job for `today`.
///
/// Per-item failures are logged and counted; only a failure to load the sources
/// aborts the run.
pub async fn run_recurrences(
    storage: &FiscalStorage,
    today: NaiveDate,
    default_handling: WeekendHandling,
) -> Result<RecurrenceRunSummary, AppError> {
    tracing::info!(
        "Running recurrence job for {} (first day: {})",
        today,
        is_run_day(today)
    );

    if !is_run_day(today) {
        return Ok(RecurrenceRunSummary::skipped(today));
    }

    let mut summary = RecurrenceRunSummary {
        date: today,
        skipped: false,
        created: 0,
        duplicates: 0,
        failures: 0,
        message: "Recurrences processed".to_string(),
    };

    for kind in [RecurringKind::Obligation, RecurringKind::Tax] {
        let sources = storage
            .recurring_sources(kind)
            .await
            .with_context(|| format!("recurrence job for {}", today))?;

        tracing::info!(
            "Found {} settled {} with recurrence",
            sources.len(),
            kind.table()
        );

        for source in sources.iter().filter(|s| is_due_for_copy(s, today)) {
            let handling = source.weekend_handling.unwrap_or(default_handling);
            let Some(planned) = next_due_date(source.due_date, today, handling) else {
                tracing::error!("No due date for {} {}", kind.entity_type(), source.id);
                summary.failures += 1;
                continue;
            };

            match storage
                .insert_recurrence(source, planned.due_date, planned.original_due_date, today)
                .await
            {
                Ok(InsertOutcome::Created(id)) => {
                    tracing::info!(
                        "Created {} {} from {} due {}",
                        kind.entity_type(),
                        id,
                        source.id,
                        planned.due_date
                    );
                    summary.created += 1;
                }
                Ok(InsertOutcome::Duplicate) => {
                    tracing::debug!(
                        "{} {} already copied for {}",
                        kind.entity_type(),
                        source.id,
                        planned.due_date
                    );
                    summary.duplicates += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to copy {} {}: {}", kind.entity_type(), source.id, e);
                    summary.failures += 1;
                }
            }
        }
    }

    tracing::info!(
        "Recurrence job done for {}: {} created, {} duplicates, {} failures",
        today,
        summary.created,
        summary.duplicates,
        summary.failures
    );

    Ok(summary)
}
