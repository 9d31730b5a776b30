//! Unit tests for error classification, display, and aggregation.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]

use std::io;
use std::sync::Arc;

use camino::Utf8Path;
use rstest::rstest;

use super::SettingsError;
use crate::coerce::CoercionError;

fn missing(field: &str) -> Arc<SettingsError> {
    SettingsError::missing_field(field, &[field.to_uppercase()])
}

fn invalid(field: &str) -> Arc<SettingsError> {
    SettingsError::coercion(
        field,
        &field.to_uppercase(),
        "x",
        false,
        CoercionError {
            expected: "int".to_owned(),
            reason: "not an integer".to_owned(),
        },
    )
}

fn aggregated(errors: Vec<Arc<SettingsError>>) -> Arc<SettingsError> {
    SettingsError::collect(errors).expect("at least one error")
}

#[rstest]
fn collect_yields_nothing_for_no_errors() {
    assert!(SettingsError::collect(Vec::new()).is_none());
}

#[rstest]
fn collect_returns_a_lone_error_unwrapped() {
    let lone = missing("port");
    let outcome = aggregated(vec![Arc::clone(&lone)]);
    assert!(Arc::ptr_eq(&outcome, &lone));
}

#[rstest]
fn collect_groups_several_errors_by_kind() {
    let outcome = aggregated(vec![missing("host"), invalid("port"), missing("database.name")]);
    let SettingsError::Aggregate(errors) = outcome.as_ref() else {
        panic!("expected an aggregate, got {outcome}");
    };
    assert_eq!(errors.len(), 3);
    assert_eq!(errors.fields().collect::<Vec<_>>(), ["host", "port", "database.name"]);
    assert_eq!(errors.missing().collect::<Vec<_>>(), ["host", "database.name"]);
    assert_eq!(errors.invalid().collect::<Vec<_>>(), ["port"]);
    assert_eq!(errors.for_field("port").count(), 1);
    assert_eq!(errors.for_field("name").count(), 0);
}

#[rstest]
fn aggregate_display_lists_each_field_error() {
    let outcome = aggregated(vec![missing("host"), invalid("port")]);
    let message = outcome.to_string();
    let lines: Vec<_> = message.lines().collect();
    assert_eq!(lines.first(), Some(&"2 settings fields failed to resolve:"));
    assert_eq!(lines.len(), 3, "{message}");
    assert!(lines.iter().skip(1).all(|line| line.starts_with("  - ")), "{message}");
    assert!(message.contains("'host'") && message.contains("'port'"), "{message}");
}

#[rstest]
fn aggregate_hands_back_owned_errors() {
    let outcome = aggregated(vec![missing("host"), missing("port")]);
    let Ok(SettingsError::Aggregate(errors)) = Arc::try_unwrap(outcome) else {
        panic!("expected a uniquely owned aggregate");
    };
    let owned: Vec<Arc<SettingsError>> = (*errors).into_iter().collect();
    assert_eq!(owned.len(), 2);
}

#[rstest]
fn coercion_errors_mask_sensitive_values() {
    let failure = || CoercionError {
        expected: "SecretStr".to_owned(),
        reason: "rejected".to_owned(),
    };
    let plain = SettingsError::coercion("token", "APP_TOKEN", "hunter2", false, failure());
    let masked = SettingsError::coercion("token", "APP_TOKEN", "hunter2", true, failure());

    assert!(plain.to_string().contains("\"hunter2\""));
    assert!(!masked.to_string().contains("hunter2"));
    assert!(masked.to_string().contains("**********"));
    assert!(!masked.to_string().contains("rejected"));
    assert!(plain.to_string().contains("rejected"));
    assert_eq!(masked.field(), Some("token"));
    assert!(masked.is_field_error());
}

#[rstest]
#[case(vec![], "no env-name candidates")]
#[case(vec!["APP_PORT".to_owned()], "looked for APP_PORT")]
#[case(vec!["A".to_owned(), "B".to_owned()], "looked for A, B")]
fn missing_field_lists_candidates(#[case] candidates: Vec<String>, #[case] fragment: &str) {
    let err = SettingsError::missing_field("port", &candidates);
    let message = err.to_string();
    assert!(message.contains("'port'"), "{message}");
    assert!(message.contains(fragment), "{message}");
}

#[rstest]
fn file_errors_are_not_field_errors() {
    let err = SettingsError::file_read(
        Utf8Path::new("/etc/app/.env"),
        io::Error::from(io::ErrorKind::PermissionDenied),
    );
    assert!(!err.is_field_error());
    assert_eq!(err.field(), None);
    assert!(err.to_string().contains("/etc/app/.env"));
    assert!(std::error::Error::source(err.as_ref()).is_some());
}

#[rstest]
fn json_errors_convert_to_decode() {
    let source = serde_json::from_str::<u8>("300").expect_err("overflow");
    assert!(matches!(SettingsError::from(source), SettingsError::Decode(_)));
}
