/// Property-based tests using proptest
/// Tests invariants that should hold for all inputs
use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use rust_fiscal_api::business_days::{adjust_due_date_for_weekend, is_weekend, WeekendHandling};
use rust_fiscal_api::client_duplication::{check_client_duplication, ClientDuplicationLevel};
use rust_fiscal_api::client_form::{is_valid_email, validate_br_phone};
use rust_fiscal_api::documents::{format_document, normalize_document};
use rust_fiscal_api::fiscal::{generate_next_occurrences, RecurrenceType};
use rust_fiscal_api::models::{Client, NewClient};

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn any_handling() -> impl Strategy<Value = WeekendHandling> {
    prop_oneof![
        Just(WeekendHandling::Advance),
        Just(WeekendHandling::Postpone),
        Just(WeekendHandling::NextBusinessDay),
        Just(WeekendHandling::Keep),
    ]
}

fn any_recurring() -> impl Strategy<Value = RecurrenceType> {
    prop_oneof![
        Just(RecurrenceType::Monthly),
        Just(RecurrenceType::Quarterly),
        Just(RecurrenceType::Semiannual),
        Just(RecurrenceType::Annual),
    ]
}

// Property: Client duplication precedence
proptest! {
    #[test]
    fn same_digits_always_report_cnpj(
        digits in "[0-9]{14}",
        name_a in "[A-Za-z ]{0,20}",
        name_b in "[A-Za-z ]{0,20}",
    ) {
        let masked = format_document(&digits);
        let existing = vec![Client {
            id: "c1".to_string(),
            name: name_b,
            document: masked,
        }];
        let candidate = NewClient {
            name: name_a,
            document: digits,
            ..Default::default()
        };

        let result = check_client_duplication(&candidate, &existing);
        prop_assert_eq!(result.level, ClientDuplicationLevel::Cnpj);
    }

    #[test]
    fn contained_long_names_report_name(
        base in "[a-z]{5,12}",
        suffix in "[a-z]{1,8}",
    ) {
        let existing = vec![Client {
            id: "c1".to_string(),
            name: base.to_uppercase(),
            document: "11111111000111".to_string(),
        }];
        let candidate = NewClient {
            name: format!("{} {}", base, suffix),
            document: "22222222000122".to_string(),
            ..Default::default()
        };

        let result = check_client_duplication(&candidate, &existing);
        prop_assert_eq!(result.level, ClientDuplicationLevel::Name);
    }

    #[test]
    fn client_check_never_panics(name in "\\PC*", document in "\\PC*") {
        let existing = vec![Client {
            id: "c1".to_string(),
            name: "Mercado Central".to_string(),
            document: "11.222.333/0001-81".to_string(),
        }];
        let candidate = NewClient { name, document, ..Default::default() };
        let _ = check_client_duplication(&candidate, &existing);
    }
}

// Property: Documents
proptest! {
    #[test]
    fn normalized_documents_are_digits_only(value in "\\PC*") {
        prop_assert!(normalize_document(&value).chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn formatting_keeps_digits(digits in "[0-9]{1,14}") {
        prop_assert_eq!(normalize_document(&format_document(&digits)), digits);
    }
}

// Property: Calendar arithmetic
proptest! {
    #[test]
    fn occurrences_are_ascending_and_counted(
        base in any_date(),
        recurrence in any_recurring(),
        count in 0usize..40,
    ) {
        let dates = generate_next_occurrences(base, recurrence, count);
        prop_assert_eq!(dates.len(), count);
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(dates.iter().all(|d| *d > base));
    }

    #[test]
    fn adjusted_dates_avoid_weekends(date in any_date(), handling in any_handling()) {
        let adjusted = adjust_due_date_for_weekend(date, handling);
        if handling == WeekendHandling::Keep || !is_weekend(date) {
            prop_assert_eq!(adjusted, date);
        } else {
            prop_assert!(!is_weekend(adjusted));
            prop_assert!((adjusted - date).num_days().abs() <= 2);
        }
    }

    #[test]
    fn monthly_occurrences_keep_day_when_possible(base in any_date(), count in 1usize..24) {
        let dates = generate_next_occurrences(base, RecurrenceType::Monthly, count);
        prop_assert!(dates.iter().all(|d| d.day() == base.day()));
    }
}

// Property: Form validators never panic
proptest! {
    #[test]
    fn email_validation_never_panics(email in "\\PC*") {
        let _ = is_valid_email(&email);
    }

    #[test]
    fn phone_validation_never_panics(phone in "\\PC*") {
        let _ = validate_br_phone(&phone);
    }
}
