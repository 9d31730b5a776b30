//! Unit tests for raw-value coercion.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]

use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::schema::{Constraint, Schema};

fn ok(raw: &str, kind: &FieldKind) -> Value {
    coerce(raw, kind).expect("value coerces")
}

fn err(raw: &str, kind: &FieldKind) -> CoercionError {
    coerce(raw, kind).expect_err("value is rejected")
}

#[rstest]
#[case("true")]
#[case("1")]
#[case("yes")]
#[case("on")]
#[case("TRUE")]
#[case(" Yes ")]
fn truthy_strings_coerce_to_true(#[case] raw: &str) {
    assert_eq!(ok(raw, &FieldKind::Bool), json!(true));
}

#[rstest]
#[case("false")]
#[case("0")]
#[case("no")]
#[case("off")]
#[case("Off")]
fn falsy_strings_coerce_to_false(#[case] raw: &str) {
    assert_eq!(ok(raw, &FieldKind::Bool), json!(false));
}

#[rstest]
#[case("maybe")]
#[case("")]
#[case("2")]
fn unknown_booleans_fail(#[case] raw: &str) {
    let error = err(raw, &FieldKind::Bool);
    assert_eq!(error.expected, "bool");
}

#[rstest]
fn strings_pass_through_untouched() {
    assert_eq!(ok("  spaced  ", &FieldKind::Str), json!("  spaced  "));
    assert_eq!(ok("", &FieldKind::Str), json!(""));
}

#[rstest]
#[case("42", json!(42))]
#[case(" -7 ", json!(-7))]
#[case("0", json!(0))]
fn integers_parse_after_trimming(#[case] raw: &str, #[case] expected: Value) {
    assert_eq!(ok(raw, &FieldKind::Int), expected);
}

#[rstest]
#[case("4.2")]
#[case("")]
#[case("forty")]
fn non_integers_fail(#[case] raw: &str) {
    assert_eq!(err(raw, &FieldKind::Int).expected, "int");
}

#[rstest]
fn floats_parse_and_reject_non_finite() {
    assert_eq!(ok(" 1.5", &FieldKind::Float), json!(1.5));
    assert_eq!(ok("3", &FieldKind::Float), json!(3.0));
    assert!(coerce("NaN", &FieldKind::Float).is_err());
    assert!(coerce("abc", &FieldKind::Float).is_err());
}

#[rstest]
fn list_of_strings_parses_json_array() {
    let kind = FieldKind::list(FieldKind::Str);
    assert_eq!(ok(r#"["auth","api"]"#, &kind), json!(["auth", "api"]));
}

#[rstest]
#[case("not-json", "invalid JSON")]
#[case(r#"{"a":1}"#, "expected a JSON array, found object")]
#[case(r#"["a",1]"#, "element 1: expected a JSON string, found number")]
fn list_shape_mismatches_fail(#[case] raw: &str, #[case] fragment: &str) {
    let error = err(raw, &FieldKind::list(FieldKind::Str));
    assert_eq!(error.expected, "list[str]");
    assert!(
        error.reason.contains(fragment),
        "{} should mention {fragment}",
        error.reason
    );
}

#[rstest]
fn maps_check_every_value() {
    let kind = FieldKind::map(FieldKind::Int);
    assert_eq!(ok(r#"{"a":1,"b":2}"#, &kind), json!({"a": 1, "b": 2}));
    let error = err(r#"{"a":1,"b":"two"}"#, &kind);
    assert!(error.reason.contains(r#"key "b""#));
}

#[rstest]
fn json_kind_accepts_any_document() {
    assert_eq!(ok("[1, {\"x\": null}]", &FieldKind::Json), json!([1, {"x": null}]));
    assert_eq!(ok("12", &FieldKind::Json), json!(12));
}

#[rstest]
fn nested_kind_requires_an_object() {
    let schema = Schema::builder("Database").build();
    let kind = FieldKind::nested(schema);
    assert_eq!(ok(r#"{"port":5432}"#, &kind), json!({"port": 5432}));
    assert_eq!(err("[1]", &kind).expected, "Database");
}

#[rstest]
fn optional_coerces_its_inner_kind() {
    let kind = FieldKind::optional(FieldKind::Int);
    assert_eq!(ok("5", &kind), json!(5));
    assert!(coerce("", &kind).is_err());
    let list = FieldKind::list(FieldKind::optional(FieldKind::Int));
    assert_eq!(ok("[1, null]", &list), json!([1, null]));
}

#[rstest]
#[case(Constraint::PositiveInt, "3", true)]
#[case(Constraint::PositiveInt, "0", false)]
#[case(Constraint::NegativeInt, "-1", true)]
#[case(Constraint::NegativeInt, "0", false)]
#[case(Constraint::NonNegativeInt, "0", true)]
#[case(Constraint::NonNegativeInt, "-2", false)]
#[case(Constraint::NonPositiveInt, "0", true)]
#[case(Constraint::NonPositiveInt, "1", false)]
#[case(Constraint::PositiveFloat, "0.5", true)]
#[case(Constraint::PositiveFloat, "0.0", false)]
#[case(Constraint::NegativeFloat, "-0.5", true)]
#[case(Constraint::NonNegativeFloat, "0", true)]
#[case(Constraint::NonPositiveFloat, "0.1", false)]
#[case(Constraint::Email, "ops@example.com", true)]
#[case(Constraint::Email, " ops@example.com ", true)]
#[case(Constraint::Email, "not-an-email", false)]
#[case(Constraint::Email, "a@", false)]
#[case(Constraint::HttpUrl, "https://example.com/path", true)]
#[case(Constraint::HttpUrl, "HTTP://EXAMPLE.COM", true)]
#[case(Constraint::HttpUrl, "ftp://example.com", false)]
#[case(Constraint::HttpUrl, "", false)]
#[case(Constraint::AnyUrl, "ftp://example.com", true)]
#[case(Constraint::AnyUrl, "mailto:ops@example.com", true)]
#[case(Constraint::AnyUrl, "no scheme", false)]
#[case(Constraint::PostgresDsn, "postgresql://user:pw@db:5432/app", true)]
#[case(Constraint::PostgresDsn, "postgres://db/app", true)]
#[case(Constraint::PostgresDsn, "postgres://db", false)]
#[case(Constraint::PostgresDsn, "mysql://db/app", false)]
#[case(Constraint::RedisDsn, "redis://cache:6379/0", true)]
#[case(Constraint::RedisDsn, "rediss://cache", true)]
#[case(Constraint::RedisDsn, "http://cache", false)]
#[case(Constraint::Secret, "  hunter2 ", true)]
fn constrained_values(#[case] constraint: Constraint, #[case] raw: &str, #[case] valid: bool) {
    let result = coerce(raw, &FieldKind::Constrained(constraint));
    assert_eq!(result.is_ok(), valid, "{constraint:?} with {raw:?}: {result:?}");
    if let Err(error) = result {
        assert_eq!(error.expected, constraint.name());
    }
}

#[rstest]
fn secret_keeps_raw_value() {
    let kind = FieldKind::Constrained(Constraint::Secret);
    assert_eq!(ok(" s3cret ", &kind), json!(" s3cret "));
}

#[rstest]
#[case("4111 1111 1111 1111", Some("4111111111111111"))]
#[case("4111-1111-1111-1111", Some("4111111111111111"))]
#[case("4111 1111 1111 1112", None)]
#[case("4111", None)]
#[case("4111 1111 abcd 1111", None)]
fn payment_cards_are_normalised_and_luhn_checked(
    #[case] raw: &str,
    #[case] expected: Option<&str>,
) {
    let kind = FieldKind::Constrained(Constraint::PaymentCard);
    assert_eq!(coerce(raw, &kind).ok(), expected.map(|digits| json!(digits)));
}

#[rstest]
fn path_constraints_check_the_filesystem() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let file = dir.path().join("settings.env");
    std::fs::write(&file, "A=1").expect("write file");
    let dir_str = dir.path().to_str().expect("utf-8 temp dir");
    let file_str = file.to_str().expect("utf-8 temp file");

    let file_kind = FieldKind::Constrained(Constraint::FilePath);
    let dir_kind = FieldKind::Constrained(Constraint::DirectoryPath);
    assert_eq!(ok(file_str, &file_kind), json!(file_str));
    assert_eq!(ok(dir_str, &dir_kind), json!(dir_str));
    assert!(err(dir_str, &file_kind).reason.contains("not a file"));
    assert!(err(file_str, &dir_kind).reason.contains("not a directory"));
    assert!(
        err(&format!("{dir_str}/missing"), &file_kind)
            .reason
            .contains("does not exist")
    );
}

#[rstest]
fn structured_constraint_values_check_primitive_shape() {
    let ports = FieldKind::list(FieldKind::Constrained(Constraint::PositiveInt));
    assert_eq!(ok("[80, 443]", &ports), json!([80, 443]));
    assert!(coerce(r#"["80"]"#, &ports).is_err());
}
