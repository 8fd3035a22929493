use crate::business_days::WeekendHandling;
use crate::fiscal::RecurrenceType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============ Domain Models ============

/// A client of the accounting office.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Client {
    /// Opaque identifier assigned by the backend.
    pub id: String,
    /// Display name (legal or trade name).
    pub name: String,
    /// CNPJ or CPF, formatted or not.
    #[serde(alias = "cnpj")]
    pub document: String,
}

/// Client being registered, as submitted by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    #[serde(alias = "cnpj")]
    pub document: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// One installment of a client's installment plan (parcelamento).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Installment {
    pub id: String,
    /// Owning client.
    pub client_id: String,
    /// Sequence number inside the plan, starting at 1.
    pub installment_number: i32,
    #[serde(with = "crate::dates::flexible_date")]
    pub due_date: NaiveDate,
    /// Protocol reference issued by the tax authority, if any.
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Installment being registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstallment {
    pub client_id: String,
    pub installment_number: i32,
    #[serde(with = "crate::dates::flexible_date")]
    pub due_date: NaiveDate,
    #[serde(default)]
    pub protocol: Option<String>,
}

/// A tax obligation or tax (prazo) tracked for a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obligation {
    pub id: String,
    pub client_id: String,
    pub title: String,
    #[serde(with = "crate::dates::flexible_date")]
    pub due_date: NaiveDate,
    /// "obligation" or "tax".
    #[serde(rename = "type", default = "default_obligation_type")]
    pub obligation_type: String,
    #[serde(default)]
    pub recurrence: Option<RecurrenceType>,
}

/// Obligation being registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewObligation {
    pub client_id: String,
    pub title: String,
    #[serde(with = "crate::dates::flexible_date")]
    pub due_date: NaiveDate,
    #[serde(rename = "type", default = "default_obligation_type")]
    pub obligation_type: String,
    #[serde(default)]
    pub recurrence: Option<RecurrenceType>,
}

fn default_obligation_type() -> String {
    "obligation".to_string()
}

/// Which kind of recurring item the recurrence job is copying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringKind {
    Obligation,
    Tax,
}

impl RecurringKind {
    /// Table holding this kind of item.
    pub fn table(&self) -> &'static str {
        match self {
            RecurringKind::Obligation => "obligations",
            RecurringKind::Tax => "taxes",
        }
    }

    /// Status a source row must have before it is copied forward.
    pub fn settled_status(&self) -> &'static str {
        match self {
            RecurringKind::Obligation => "completed",
            RecurringKind::Tax => "paid",
        }
    }

    /// Value stored in `recurrence_history.entity_type`.
    pub fn entity_type(&self) -> &'static str {
        match self {
            RecurringKind::Obligation => "obligation",
            RecurringKind::Tax => "tax",
        }
    }
}

/// A settled recurring obligation or tax the job may copy forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringSource {
    pub id: uuid::Uuid,
    pub kind: RecurringKind,
    pub due_date: NaiveDate,
    pub recurrence: RecurrenceType,
    /// Row's own handling, falling back to the owner's default.
    pub weekend_handling: Option<WeekendHandling>,
}

// ============ API Request/Response Models ============

/// Request payload for `POST /api/v1/clients/check`.
#[derive(Debug, Deserialize)]
pub struct ClientCheckRequest {
    pub client: NewClient,
    /// Snapshot to check against. Loaded from the database when omitted.
    #[serde(default)]
    pub existing: Option<Vec<Client>>,
}

/// Request payload for `POST /api/v1/installments/check`.
#[derive(Debug, Deserialize)]
pub struct InstallmentCheckRequest {
    pub installment: NewInstallment,
    #[serde(default)]
    pub existing: Option<Vec<Installment>>,
}

/// Request payload for `POST /api/v1/obligations/check`.
#[derive(Debug, Deserialize)]
pub struct ObligationCheckRequest {
    pub obligation: NewObligation,
    #[serde(default)]
    pub existing: Option<Vec<Obligation>>,
}

/// Request payload for `POST /api/v1/installments/plan`.
#[derive(Debug, Deserialize)]
pub struct InstallmentPlanRequest {
    #[serde(with = "crate::dates::flexible_date")]
    pub first_due_date: NaiveDate,
    pub total_installments: u32,
    #[serde(default)]
    pub weekend_handling: Option<WeekendHandling>,
}

/// Query for `GET /api/v1/fiscal/reference-label`.
#[derive(Debug, Deserialize)]
pub struct ReferenceLabelQuery {
    #[serde(with = "crate::dates::flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub recurrence: RecurrenceType,
}

/// Query for `GET /api/v1/fiscal/occurrences`.
#[derive(Debug, Deserialize)]
pub struct OccurrencesQuery {
    #[serde(with = "crate::dates::flexible_date")]
    pub base_date: NaiveDate,
    pub recurrence: RecurrenceType,
    pub count: Option<usize>,
}

/// Query carrying a single date.
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    #[serde(with = "crate::dates::flexible_date")]
    pub date: NaiveDate,
}

/// Query for `GET /api/v1/business-days/adjust`.
#[derive(Debug, Deserialize)]
pub struct AdjustDueDateQuery {
    #[serde(with = "crate::dates::flexible_date")]
    pub date: NaiveDate,
    pub handling: Option<WeekendHandling>,
}

/// Response for `GET /api/v1/business-days/adjust`.
#[derive(Debug, Serialize)]
pub struct AdjustedDueDate {
    #[serde(with = "crate::dates::flexible_date")]
    pub due_date: NaiveDate,
    /// Set when the date was moved off a weekend.
    #[serde(with = "crate::dates::flexible_date_opt")]
    pub original_due_date: Option<NaiveDate>,
    pub handling: WeekendHandling,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub weekday: &'static str,
    /// `dd/mm/yyyy`, with the original date appended when it moved.
    pub display: String,
    pub warning: Option<String>,
}

/// Query for `GET /api/v1/documents/format`.
#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    pub value: String,
}

/// Response for `GET /api/v1/documents/format`.
#[derive(Debug, Serialize)]
pub struct FormattedDocument {
    pub formatted: String,
    pub digits: String,
    /// "cpf" up to 11 digits, "cnpj" beyond.
    pub kind: &'static str,
}

/// Request payload for `POST /api/v1/recurrences/run`.
#[derive(Debug, Default, Deserialize)]
pub struct RecurrenceRunRequest {
    /// Day to run for. Defaults to today.
    #[serde(default, with = "crate::dates::flexible_date_opt")]
    pub date: Option<NaiveDate>,
}
