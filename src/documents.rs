//! CPF/CNPJ handling.
//!
//! Documents are compared digits-only; masks are applied progressively so a
//! half-typed document still renders sensibly in the form.

/// CPF length in digits.
pub const CPF_DIGITS: usize = 11;
/// CNPJ length in digits.
pub const CNPJ_DIGITS: usize = 14;

/// Strips every non-digit character.
pub fn normalize_document(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Inserts `separators` (digit position, char) into up to `limit` digits of `value`.
/// A separator is only written when a digit follows it.
fn apply_mask(value: &str, limit: usize, separators: &[(usize, char)]) -> String {
    let digits: Vec<char> = normalize_document(value).chars().take(limit).collect();
    let mut masked = String::with_capacity(digits.len() + separators.len());

    for (i, digit) in digits.iter().enumerate() {
        if let Some((_, sep)) = separators.iter().find(|(pos, _)| *pos == i) {
            masked.push(*sep);
        }
        masked.push(*digit);
    }

    masked
}

/// `XXX.XXX.XXX-XX`
pub fn format_cpf(value: &str) -> String {
    apply_mask(value, CPF_DIGITS, &[(3, '.'), (6, '.'), (9, '-')])
}

/// `XX.XXX.XXX/XXXX-XX`
pub fn format_cnpj(value: &str) -> String {
    apply_mask(value, CNPJ_DIGITS, &[(2, '.'), (5, '.'), (8, '/'), (12, '-')])
}

/// Picks the CPF mask up to 11 digits and the CNPJ mask beyond.
pub fn format_document(value: &str) -> String {
    if normalize_document(value).len() <= CPF_DIGITS {
        format_cpf(value)
    } else {
        format_cnpj(value)
    }
}
