//! Field-level validation of the client registration form.
//!
//! Runs before the duplicate check: name and document are required, e-mail and phone
//! are optional but must be well-formed when filled in.

use crate::documents::normalize_document;
use crate::models::NewClient;
use phonenumber::country::Id as CountryId;
use phonenumber::Mode;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

// RFC 5322 simplified: local@domain.tld
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

/// A rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Result of [`validate_new_client`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientValidation {
    pub errors: Vec<FieldError>,
    /// Phone in E.164 form, when one was given and is valid.
    pub normalized_phone: Option<String>,
}

impl ClientValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Basic e-mail format check.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 5 || !email.contains('@') || !email.contains('.') {
        return false;
    }

    EMAIL_REGEX.is_match(email)
}

/// Validates and normalizes a Brazilian phone number.
///
/// Returns: (is_valid, normalized_phone_or_error_msg)
pub fn validate_br_phone(raw: &str) -> (bool, String) {
    if raw.trim().is_empty() || raw.len() < 8 {
        return (false, "Phone too short".to_string());
    }

    match phonenumber::parse(Some(CountryId::BR), raw) {
        Ok(number) => {
            if phonenumber::is_valid(&number) {
                let formatted = number.format().mode(Mode::E164).to_string();
                tracing::debug!("Valid BR phone: {} -> {}", raw, formatted);
                (true, formatted)
            } else {
                (false, "Invalid Brazilian phone number".to_string())
            }
        }
        Err(e) => (false, format!("Parse error: {:?}", e)),
    }
}

fn filled(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn validate_new_client(client: &NewClient) -> ClientValidation {
    let mut report = ClientValidation::default();

    if client.name.trim().is_empty() {
        report
            .errors
            .push(FieldError::new("name", "Nome é obrigatório"));
    }

    if client.document.trim().is_empty() {
        report
            .errors
            .push(FieldError::new("document", "CNPJ é obrigatório"));
    } else if normalize_document(&client.document).is_empty() {
        report
            .errors
            .push(FieldError::new("document", "CNPJ deve conter dígitos"));
    }

    if let Some(email) = filled(client.email.as_deref()) {
        if !is_valid_email(email) {
            report
                .errors
                .push(FieldError::new("email", "Email inválido"));
        }
    }

    if let Some(phone) = filled(client.phone.as_deref()) {
        let (valid, normalized) = validate_br_phone(phone);
        if valid {
            report.normalized_phone = Some(normalized);
        } else {
            tracing::warn!("Rejected client phone '{}': {}", phone, normalized);
            report
                .errors
                .push(FieldError::new("phone", "Telefone inválido"));
        }
    }

    report
}
