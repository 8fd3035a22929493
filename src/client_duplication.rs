//! Client duplicate detection.
//!
//! Two levels, checked in order:
//! 1. `cnpj`: same document once reduced to digits (blocks creation)
//! 2. `name`: similar name (asks for confirmation)

use crate::documents::normalize_document;
use crate::duplication::{labels_similar, Severity};
use crate::models::{Client, NewClient};
use serde::Serialize;

/// Names shorter than this only match when identical.
pub const NAME_CONTAINMENT_MIN_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientDuplicationLevel {
    Cnpj,
    Name,
    None,
}

impl ClientDuplicationLevel {
    pub fn severity(self) -> Severity {
        match self {
            ClientDuplicationLevel::Cnpj => Severity::Hard,
            ClientDuplicationLevel::Name => Severity::Soft,
            ClientDuplicationLevel::None => Severity::Clear,
        }
    }
}

/// Outcome of [`check_client_duplication`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientDuplicationCheck<'a> {
    pub is_duplicate: bool,
    pub level: ClientDuplicationLevel,
    pub severity: Severity,
    /// First existing client that triggered the level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_client: Option<&'a Client>,
    pub message: String,
}

impl<'a> ClientDuplicationCheck<'a> {
    fn matched(level: ClientDuplicationLevel, client: &'a Client, message: String) -> Self {
        Self {
            is_duplicate: true,
            level,
            severity: level.severity(),
            existing_client: Some(client),
            message,
        }
    }

    fn clear() -> Self {
        Self {
            is_duplicate: false,
            level: ClientDuplicationLevel::None,
            severity: Severity::Clear,
            existing_client: None,
            message: String::new(),
        }
    }
}

/// Classifies `candidate` against a snapshot of existing clients.
///
/// Only the first match (in snapshot order) is reported, and a document match always
/// wins over a name match.
pub fn check_client_duplication<'a>(
    candidate: &NewClient,
    existing: &'a [Client],
) -> ClientDuplicationCheck<'a> {
    let document = normalize_document(&candidate.document);

    if let Some(found) = existing
        .iter()
        .find(|c| normalize_document(&c.document) == document)
    {
        return ClientDuplicationCheck::matched(
            ClientDuplicationLevel::Cnpj,
            found,
            format!(
                "Já existe um cliente cadastrado com este CNPJ: \"{}\".",
                found.name
            ),
        );
    }

    if let Some(found) = existing
        .iter()
        .find(|c| labels_similar(&c.name, &candidate.name, NAME_CONTAINMENT_MIN_LEN))
    {
        return ClientDuplicationCheck::matched(
            ClientDuplicationLevel::Name,
            found,
            format!(
                "Já existe um cliente com nome similar: \"{}\" (CNPJ: {}). Deseja criar mesmo assim?",
                found.name, found.document
            ),
        );
    }

    ClientDuplicationCheck::clear()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str, name: &str, document: &str) -> Client {
        Client {
            id: id.to_string(),
            name: name.to_string(),
            document: document.to_string(),
        }
    }

    fn candidate(name: &str, document: &str) -> NewClient {
        NewClient {
            name: name.to_string(),
            document: document.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_document_match_ignores_formatting() {
        let existing = vec![client("1", "Padaria Pão Quente", "11.222.333/0001-81")];
        let check = check_client_duplication(&candidate("Outra", "11222333000181"), &existing);

        assert!(check.is_duplicate);
        assert_eq!(check.level, ClientDuplicationLevel::Cnpj);
        assert_eq!(check.severity, Severity::Hard);
        assert_eq!(check.existing_client.map(|c| c.id.as_str()), Some("1"));
        assert_eq!(
            check.message,
            "Já existe um cliente cadastrado com este CNPJ: \"Padaria Pão Quente\"."
        );
    }

    #[test]
    fn test_name_match_message() {
        let existing = vec![client("1", "ABC Consultoria", "11222333000181")];
        let check =
            check_client_duplication(&candidate("abc  consultoria filial", "999"), &existing);

        assert_eq!(check.level, ClientDuplicationLevel::Name);
        assert_eq!(check.severity, Severity::Soft);
        assert_eq!(
            check.message,
            "Já existe um cliente com nome similar: \"ABC Consultoria\" (CNPJ: 11222333000181). Deseja criar mesmo assim?"
        );
    }

    #[test]
    fn test_clear_result() {
        let existing = vec![client("1", "ABC Consultoria", "11222333000181")];
        let check = check_client_duplication(&candidate("Mercado Central", "999"), &existing);

        assert!(!check.is_duplicate);
        assert_eq!(check.level, ClientDuplicationLevel::None);
        assert!(check.existing_client.is_none());
        assert!(check.message.is_empty());
    }
}
