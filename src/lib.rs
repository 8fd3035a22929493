//! Fiscal Rules API Library
//!
//! Business rules of an accounting office's obligation tracker: duplicate detection
//! for clients, installments and obligations, recurrence and business-day date
//! arithmetic, CPF/CNPJ formatting, and the monthly job that re-creates recurring
//! obligations and taxes. The HTTP layer and Postgres storage sit on top.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `data`: Data access layer.
//! - `business_days`: Weekend and holiday handling for due dates.
//! - `client_duplication`: Client duplicate detection.
//! - `client_form`: Client registration form validation.
//! - `config`: Configuration management.
//! - `dates`: Due-date parsing and month arithmetic.
//! - `db`: Database connection and pool management.
//! - `db_storage`: Snapshot reads and recurrence writes.
//! - `documents`: CPF/CNPJ normalization and masks.
//! - `duplication`: Severity levels and label matching shared by the validators.
//! - `errors`: Error handling types.
//! - `fiscal`: Recurrence labels and occurrence projection.
//! - `handlers`: HTTP request handlers.
//! - `installment_duplication`: Installment duplicate detection.
//! - `installment_plan`: Monthly installment schedules.
//! - `models`: Core data models.
//! - `obligation_duplication`: Obligation duplicate detection.
//! - `recurrence_job`: Monthly auto-creation of recurring items.
//! - `routes`: Router assembly and HTTP middleware.

pub mod api;
pub mod core;
pub mod data;

// Re-export primary modules for shared use in tests and other binaries
pub mod business_days;
pub mod client_duplication;
pub mod client_form;
pub mod config;
pub mod dates;
pub mod db;
pub mod db_storage;
pub mod documents;
pub mod duplication;
pub mod errors;
pub mod fiscal;
pub mod handlers;
pub mod installment_duplication;
pub mod installment_plan;
pub mod models;
pub mod obligation_duplication;
pub mod recurrence_job;
pub mod routes;
