use crate::business_days::{
    adjust_due_date_for_weekend, format_adjusted_date, is_holiday, is_weekend,
    non_business_day_message, weekday_abbreviation,
};
use crate::client_duplication::check_client_duplication;
use crate::client_form::validate_new_client;
use crate::config::Config;
use crate::db_storage::FiscalStorage;
use crate::documents::{format_document, normalize_document, CPF_DIGITS};
use crate::errors::{AppError, ResultExt};
use crate::fiscal::{
    format_reference_date, generate_next_occurrences, is_quarterly_due_date,
    DEFAULT_OCCURRENCE_COUNT,
};
use crate::installment_duplication::check_installment_duplication;
use crate::installment_plan::plan_installments;
use crate::models::*;
use crate::obligation_duplication::check_obligation_duplication;
use crate::recurrence_job::{is_run_day, run_recurrences, RecurrenceRunSummary};
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use moka::future::Cache;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Application configuration.
    pub config: Config,
    /// Run dates of recurrence jobs triggered over HTTP, with the trigger timestamp.
    /// Blocks a second run for the same day while the entry lives.
    pub recent_runs_cache: Cache<NaiveDate, i64>,
}

impl AppState {
    fn storage(&self) -> FiscalStorage {
        FiscalStorage::new(self.db.clone())
    }
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-fiscal-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/v1/clients/check
///
/// Validates the registration form, then looks for a client with the same document
/// or a similar name. Invalid forms answer 422 with the field errors and skip the
/// duplicate check.
pub async fn check_client(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClientCheckRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let Json(payload) = payload?;
    let validation = validate_new_client(&payload.client);
    if !validation.is_valid() {
        tracing::warn!(
            "Client form rejected ({} field errors)",
            validation.errors.len()
        );
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "Dados do cliente inválidos",
                "validation": validation,
            })),
        ));
    }

    let existing = match payload.existing {
        Some(existing) => existing,
        None => state
            .storage()
            .clients()
            .await
            .context("client duplication check")?,
    };

    let check = check_client_duplication(&payload.client, &existing);
    tracing::info!(
        "Client check against {} clients: {:?}",
        existing.len(),
        check.level
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "validation": validation,
            "duplication": check,
        })),
    ))
}

/// POST /api/v1/installments/check
pub async fn check_installment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InstallmentCheckRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(payload) = payload?;
    let candidate = payload.installment;
    let existing = match payload.existing {
        Some(existing) => existing,
        None => state
            .storage()
            .installments_for_client(&candidate.client_id)
            .await?,
    };

    let check = check_installment_duplication(&candidate, &existing);
    tracing::info!(
        "Installment {} of client {} checked: {:?}",
        candidate.installment_number,
        candidate.client_id,
        check.level
    );

    Ok(Json(json!(check)))
}

/// POST /api/v1/obligations/check
pub async fn check_obligation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ObligationCheckRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(payload) = payload?;
    let candidate = payload.obligation;
    let existing = match payload.existing {
        Some(existing) => existing,
        None => state
            .storage()
            .obligations_for_client(&candidate.client_id)
            .await?,
    };

    let check = check_obligation_duplication(&candidate, &existing);
    tracing::info!(
        "Obligation '{}' of client {} checked: {:?}",
        candidate.title,
        candidate.client_id,
        check.level
    );

    Ok(Json(json!(check)))
}

/// POST /api/v1/installments/plan
pub async fn plan_installment_schedule(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InstallmentPlanRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(payload) = payload?;
    let max = state.config.max_occurrence_count;
    if payload.total_installments as usize > max {
        return Err(AppError::BadRequest(format!(
            "total_installments must be at most {}",
            max
        )));
    }

    let handling = payload
        .weekend_handling
        .unwrap_or(state.config.default_weekend_handling);
    let plan = plan_installments(payload.first_due_date, payload.total_installments, handling);

    Ok(Json(json!({
        "weekend_handling": handling,
        "installments": plan,
    })))
}

/// GET /api/v1/fiscal/reference-label
pub async fn reference_label(Query(query): Query<ReferenceLabelQuery>) -> Json<serde_json::Value> {
    Json(json!({
        "date": query.date.to_string(),
        "recurrence": query.recurrence,
        "label": format_reference_date(query.date, query.recurrence),
    }))
}

/// GET /api/v1/fiscal/occurrences
pub async fn next_occurrences(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OccurrencesQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let count = query.count.unwrap_or(DEFAULT_OCCURRENCE_COUNT);
    if count > state.config.max_occurrence_count {
        return Err(AppError::BadRequest(format!(
            "count must be at most {}",
            state.config.max_occurrence_count
        )));
    }

    let dates: Vec<String> = generate_next_occurrences(query.base_date, query.recurrence, count)
        .into_iter()
        .map(|d| d.to_string())
        .collect();

    Ok(Json(json!({
        "base_date": query.base_date.to_string(),
        "recurrence": query.recurrence,
        "occurrences": dates,
    })))
}

/// GET /api/v1/fiscal/quarterly-due
pub async fn quarterly_due(Query(query): Query<DateQuery>) -> Json<serde_json::Value> {
    Json(json!({
        "date": query.date.to_string(),
        "is_quarterly_due_date": is_quarterly_due_date(query.date),
    }))
}

/// GET /api/v1/business-days/adjust
pub async fn adjust_due_date(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdjustDueDateQuery>,
) -> Json<AdjustedDueDate> {
    let handling = query
        .handling
        .unwrap_or(state.config.default_weekend_handling);
    let due_date = adjust_due_date_for_weekend(query.date, handling);
    let original_due_date = (due_date != query.date).then_some(query.date);

    Json(AdjustedDueDate {
        due_date,
        original_due_date,
        handling,
        is_weekend: is_weekend(query.date),
        is_holiday: is_holiday(query.date),
        weekday: weekday_abbreviation(due_date),
        display: format_adjusted_date(due_date, original_due_date),
        warning: non_business_day_message(query.date),
    })
}

/// GET /api/v1/documents/format
pub async fn format_document_value(
    Query(query): Query<DocumentQuery>,
) -> Result<Json<FormattedDocument>, AppError> {
    let digits = normalize_document(&query.value);
    if digits.is_empty() {
        return Err(AppError::BadRequest(
            "Documento deve conter dígitos".to_string(),
        ));
    }

    let kind = if digits.len() <= CPF_DIGITS { "cpf" } else { "cnpj" };

    Ok(Json(FormattedDocument {
        formatted: format_document(&digits),
        digits,
        kind,
    }))
}

/// A run that errored or left items uncopied.
fn run_failed(result: &Result<RecurrenceRunSummary, AppError>) -> bool {
    match result {
        Ok(summary) => summary.failures > 0,
        Err(_) => true,
    }
}

/// POST /api/v1/recurrences/run
///
/// Runs the monthly recurrence job for `date` (today by default). A run day that was
/// already triggered within the cache window answers 409.
pub async fn run_recurrence_job(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<RecurrenceRunSummary>, AppError> {
    // An empty body means "today"; anything else must parse
    let request: RecurrenceRunRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RecurrenceRunRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?
    };
    let today = request
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    if is_run_day(today) {
        let now = chrono::Utc::now().timestamp();
        let entry = state
            .recent_runs_cache
            .entry(today)
            .or_insert(now)
            .await;

        if !entry.is_fresh() {
            let seconds_ago = now - entry.into_value();
            tracing::warn!(
                "Recurrence run for {} blocked, triggered {} seconds ago",
                today,
                seconds_ago
            );
            return Err(AppError::Conflict(format!(
                "Recurrence job for {} was already triggered",
                today
            )));
        }
    }

    let result = run_recurrences(
        &state.storage(),
        today,
        state.config.default_weekend_handling,
    )
    .await;

    if run_failed(&result) {
        // Let a retry through after a failed run
        state.recent_runs_cache.invalidate(&today).await;
    }

    Ok(Json(result?))
}
