//! Installment duplicate detection.
//!
//! Only installments of the candidate's client are compared. Two levels, both blocking:
//! 1. `exact`: same installment number and same calendar due date
//! 2. `protocol`: same protocol reference, trimmed and case-insensitive

use crate::dates::format_br_date;
use crate::duplication::Severity;
use crate::models::{Installment, NewInstallment};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentDuplicationLevel {
    Exact,
    Protocol,
    None,
}

impl InstallmentDuplicationLevel {
    pub fn severity(self) -> Severity {
        match self {
            InstallmentDuplicationLevel::Exact | InstallmentDuplicationLevel::Protocol => {
                Severity::Hard
            }
            InstallmentDuplicationLevel::None => Severity::Clear,
        }
    }
}

/// Outcome of [`check_installment_duplication`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallmentDuplicationCheck<'a> {
    pub is_duplicate: bool,
    pub level: InstallmentDuplicationLevel,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_installment: Option<&'a Installment>,
    pub message: String,
}

impl<'a> InstallmentDuplicationCheck<'a> {
    fn matched(
        level: InstallmentDuplicationLevel,
        installment: &'a Installment,
        message: String,
    ) -> Self {
        Self {
            is_duplicate: true,
            level,
            severity: level.severity(),
            existing_installment: Some(installment),
            message,
        }
    }

    fn clear() -> Self {
        Self {
            is_duplicate: false,
            level: InstallmentDuplicationLevel::None,
            severity: Severity::Clear,
            existing_installment: None,
            message: String::new(),
        }
    }
}

fn normalize_protocol(protocol: &str) -> String {
    protocol.trim().to_lowercase()
}

/// Classifies `candidate` against a snapshot of existing installments, which may span
/// several clients.
pub fn check_installment_duplication<'a>(
    candidate: &NewInstallment,
    existing: &'a [Installment],
) -> InstallmentDuplicationCheck<'a> {
    let same_client: Vec<&'a Installment> = existing
        .iter()
        .filter(|i| i.client_id == candidate.client_id)
        .collect();

    if let Some(found) = same_client.iter().copied().find(|i| {
        i.installment_number == candidate.installment_number && i.due_date == candidate.due_date
    }) {
        return InstallmentDuplicationCheck::matched(
            InstallmentDuplicationLevel::Exact,
            found,
            format!(
                "Já existe a parcela {} para este cliente com vencimento em {}.",
                found.installment_number,
                format_br_date(found.due_date)
            ),
        );
    }

    let wanted = candidate
        .protocol
        .as_deref()
        .map(normalize_protocol)
        .filter(|p| !p.is_empty());

    if let Some(wanted) = wanted {
        if let Some(found) = same_client.iter().copied().find(|i| {
            i.protocol
                .as_deref()
                .is_some_and(|p| normalize_protocol(p) == wanted)
        }) {
            return InstallmentDuplicationCheck::matched(
                InstallmentDuplicationLevel::Protocol,
                found,
                format!(
                    "Já existe uma parcela com o protocolo \"{}\" para este cliente.",
                    found.protocol.as_deref().unwrap_or_default()
                ),
            );
        }
    }

    InstallmentDuplicationCheck::clear()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn installment(id: &str, client_id: &str, number: i32, due: NaiveDate) -> Installment {
        Installment {
            id: id.to_string(),
            client_id: client_id.to_string(),
            installment_number: number,
            due_date: due,
            protocol: None,
            name: None,
        }
    }

    #[test]
    fn test_exact_message() {
        let existing = vec![installment("i1", "c1", 3, ymd(2024, 3, 5))];
        let candidate = NewInstallment {
            client_id: "c1".to_string(),
            installment_number: 3,
            due_date: ymd(2024, 3, 5),
            protocol: None,
        };

        let check = check_installment_duplication(&candidate, &existing);
        assert_eq!(check.level, InstallmentDuplicationLevel::Exact);
        assert_eq!(
            check.message,
            "Já existe a parcela 3 para este cliente com vencimento em 05/03/2024."
        );
    }

    #[test]
    fn test_same_number_other_date_is_clear() {
        let existing = vec![installment("i1", "c1", 3, ymd(2024, 3, 5))];
        let candidate = NewInstallment {
            client_id: "c1".to_string(),
            installment_number: 3,
            due_date: ymd(2024, 4, 5),
            protocol: Some("   ".to_string()),
        };

        let check = check_installment_duplication(&candidate, &existing);
        assert!(!check.is_duplicate);
        assert_eq!(check.severity, Severity::Clear);
    }

    #[test]
    fn test_protocol_message_uses_existing_value() {
        let mut with_protocol = installment("i1", "c1", 1, ymd(2024, 3, 5));
        with_protocol.protocol = Some("ABC-123".to_string());
        let existing = vec![with_protocol];

        let candidate = NewInstallment {
            client_id: "c1".to_string(),
            installment_number: 2,
            due_date: ymd(2024, 4, 5),
            protocol: Some(" abc-123 ".to_string()),
        };

        let check = check_installment_duplication(&candidate, &existing);
        assert_eq!(check.level, InstallmentDuplicationLevel::Protocol);
        assert_eq!(check.severity, Severity::Hard);
        assert_eq!(
            check.message,
            "Já existe uma parcela com o protocolo \"ABC-123\" para este cliente."
        );
    }
}
