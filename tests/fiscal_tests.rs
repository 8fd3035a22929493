/// Recurrence labels, occurrence projection and business-day adjustment
use chrono::NaiveDate;
use rust_fiscal_api::business_days::{
    adjust_due_date_for_weekend, format_adjusted_date, non_business_day_message, WeekendHandling,
};
use rust_fiscal_api::documents::{format_cnpj, format_cpf, format_document};
use rust_fiscal_api::fiscal::{
    format_reference_date, generate_next_occurrences, is_quarterly_due_date, RecurrenceType,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_reference_labels() {
    assert_eq!(
        format_reference_date(ymd(2024, 2, 1), RecurrenceType::Quarterly),
        "1º Trim/2024"
    );
    assert_eq!(
        format_reference_date(ymd(2024, 5, 1), RecurrenceType::Semiannual),
        "1º Sem/2024"
    );
    assert_eq!(
        format_reference_date(ymd(2024, 8, 1), RecurrenceType::Semiannual),
        "2º Sem/2024"
    );
    assert_eq!(
        format_reference_date(ymd(2024, 1, 1), RecurrenceType::Annual),
        "2024"
    );
}

#[test]
fn test_monthly_occurrences() {
    assert_eq!(
        generate_next_occurrences(ymd(2024, 1, 1), RecurrenceType::Monthly, 3),
        vec![ymd(2024, 2, 1), ymd(2024, 3, 1), ymd(2024, 4, 1)]
    );
}

#[test]
fn test_no_recurrence_has_no_occurrences() {
    assert!(generate_next_occurrences(ymd(2024, 1, 1), RecurrenceType::None, 5).is_empty());
}

#[test]
fn test_quarterly_due_months() {
    let due_months: Vec<u32> = (1..=12)
        .filter(|&m| is_quarterly_due_date(ymd(2024, m, 10)))
        .collect();
    assert_eq!(due_months, vec![1, 4, 7, 10]);
}

#[test]
fn test_weekend_adjustment_per_handling() {
    let saturday = ymd(2024, 6, 15);
    let sunday = ymd(2024, 6, 16);
    let monday = ymd(2024, 6, 17);

    assert_eq!(
        adjust_due_date_for_weekend(saturday, WeekendHandling::Advance),
        ymd(2024, 6, 14)
    );
    assert_eq!(
        adjust_due_date_for_weekend(sunday, WeekendHandling::Advance),
        ymd(2024, 6, 14)
    );
    assert_eq!(
        adjust_due_date_for_weekend(saturday, WeekendHandling::Postpone),
        monday
    );
    assert_eq!(
        adjust_due_date_for_weekend(sunday, WeekendHandling::NextBusinessDay),
        monday
    );
    assert_eq!(adjust_due_date_for_weekend(sunday, WeekendHandling::Keep), sunday);
    assert_eq!(
        adjust_due_date_for_weekend(monday, WeekendHandling::Advance),
        monday
    );
}

#[test]
fn test_adjusted_display_and_warning() {
    let original = ymd(2024, 6, 15);
    let due = adjust_due_date_for_weekend(original, WeekendHandling::Postpone);
    assert_eq!(
        format_adjusted_date(due, Some(original)),
        "17/06/2024 (orig: 15/06/2024)"
    );
    assert_eq!(
        non_business_day_message(original).as_deref(),
        Some("15/06/2024 cai em um final de semana (Sáb).")
    );
    assert_eq!(
        non_business_day_message(ymd(2025, 12, 25)).as_deref(),
        Some("25/12/2025 é feriado nacional.")
    );
    assert_eq!(non_business_day_message(ymd(2024, 6, 17)), None);
}

#[test]
fn test_document_masks() {
    assert_eq!(format_cnpj("11222333000181"), "11.222.333/0001-81");
    assert_eq!(format_cpf("12345678901"), "123.456.789-01");
    assert_eq!(format_document("123.456.789-01"), "123.456.789-01");
    assert_eq!(format_document("11222333000181"), "11.222.333/0001-81");
}
