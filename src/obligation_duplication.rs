//! Obligation duplicate detection.
//!
//! Same-client obligations are compared within the candidate's due month:
//! 1. `exact`: same normalized title and same type (blocks creation)
//! 2. `recurrence`: same title registered with a different recurrence (asks for confirmation)
//! 3. `probable`: similar title (asks for confirmation)
//!
//! The recurrence conflict is checked before the similarity one; an identical title is
//! always "similar", so the other order would never report it.

use crate::dates::format_br_date;
use crate::duplication::{labels_similar, normalize_label, Severity};
use crate::fiscal::RecurrenceType;
use crate::models::{NewObligation, Obligation};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Titles shorter than this only match when identical.
pub const TITLE_CONTAINMENT_MIN_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObligationDuplicationLevel {
    Exact,
    Probable,
    Recurrence,
    None,
}

impl ObligationDuplicationLevel {
    pub fn severity(self) -> Severity {
        match self {
            ObligationDuplicationLevel::Exact => Severity::Hard,
            ObligationDuplicationLevel::Probable | ObligationDuplicationLevel::Recurrence => {
                Severity::Soft
            }
            ObligationDuplicationLevel::None => Severity::Clear,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObligationDuplicationCheck<'a> {
    pub is_duplicate: bool,
    pub level: ObligationDuplicationLevel,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_obligation: Option<&'a Obligation>,
    pub message: String,
}

impl<'a> ObligationDuplicationCheck<'a> {
    fn matched(
        level: ObligationDuplicationLevel,
        obligation: &'a Obligation,
        message: String,
    ) -> Self {
        Self {
            is_duplicate: true,
            level,
            severity: level.severity(),
            existing_obligation: Some(obligation),
            message,
        }
    }

    fn clear() -> Self {
        Self {
            is_duplicate: false,
            level: ObligationDuplicationLevel::None,
            severity: Severity::Clear,
            existing_obligation: None,
            message: String::new(),
        }
    }
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn check_obligation_duplication<'a>(
    candidate: &NewObligation,
    existing: &'a [Obligation],
) -> ObligationDuplicationCheck<'a> {
    let title = normalize_label(&candidate.title);
    let same_client_month: Vec<&'a Obligation> = existing
        .iter()
        .filter(|o| o.client_id == candidate.client_id && same_month(o.due_date, candidate.due_date))
        .collect();

    if let Some(found) = same_client_month.iter().copied().find(|o| {
        normalize_label(&o.title) == title && o.obligation_type == candidate.obligation_type
    }) {
        return ObligationDuplicationCheck::matched(
            ObligationDuplicationLevel::Exact,
            found,
            format!(
                "Já existe uma obrigação \"{}\" para este cliente em {}/{}.",
                found.title,
                candidate.due_date.month(),
                candidate.due_date.year()
            ),
        );
    }

    let wanted = candidate.recurrence.filter(RecurrenceType::is_recurring);
    if let Some(wanted) = wanted {
        let conflict = same_client_month.iter().copied().find_map(|o| {
            let theirs = o.recurrence.filter(RecurrenceType::is_recurring)?;
            (normalize_label(&o.title) == title && theirs != wanted).then_some((o, theirs))
        });

        if let Some((found, theirs)) = conflict {
            return ObligationDuplicationCheck::matched(
                ObligationDuplicationLevel::Recurrence,
                found,
                format!(
                    "Já existe \"{}\" com recorrência {}. Você está criando com recorrência {}.",
                    found.title,
                    theirs.label(),
                    wanted.label()
                ),
            );
        }
    }

    if let Some(found) = same_client_month
        .iter()
        .copied()
        .find(|o| labels_similar(&o.title, &candidate.title, TITLE_CONTAINMENT_MIN_LEN))
    {
        return ObligationDuplicationCheck::matched(
            ObligationDuplicationLevel::Probable,
            found,
            format!(
                "Encontrada obrigação similar: \"{}\" ({}). Deseja criar mesmo assim?",
                found.title,
                format_br_date(found.due_date)
            ),
        );
    }

    ObligationDuplicationCheck::clear()
}
