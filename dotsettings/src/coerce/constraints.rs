//! Refined scalar types: numeric bounds and validated strings.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{float_value, parse_float, parse_int};
use crate::schema::Constraint;

const EMAIL_MIN_LEN: usize = 3;
const EMAIL_MAX_LEN: usize = 320;
const URL_MAX_LEN: usize = 2083;
const CARD_MIN_DIGITS: usize = 13;
const CARD_MAX_DIGITS: usize = 19;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"));
static HTTP_URL: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^https?://[^\s/$.?#].[^\s]*$"));
static ANY_URL: LazyLock<Regex> = LazyLock::new(|| compile(r"^[a-zA-Z][a-zA-Z0-9+.-]*:.+$"));

#[expect(
    clippy::expect_used,
    reason = "patterns are constants exercised by the unit tests"
)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern compiles")
}

pub(super) fn apply(constraint: Constraint, raw: &str) -> Result<Value, String> {
    match constraint {
        Constraint::PositiveInt => bounded_int(raw, |n| n > 0, "greater than 0"),
        Constraint::NegativeInt => bounded_int(raw, |n| n < 0, "less than 0"),
        Constraint::NonNegativeInt => bounded_int(raw, |n| n >= 0, "at least 0"),
        Constraint::NonPositiveInt => bounded_int(raw, |n| n <= 0, "at most 0"),
        Constraint::PositiveFloat => bounded_float(raw, |n| n > 0.0, "greater than 0.0"),
        Constraint::NegativeFloat => bounded_float(raw, |n| n < 0.0, "less than 0.0"),
        Constraint::NonNegativeFloat => bounded_float(raw, |n| n >= 0.0, "at least 0.0"),
        Constraint::NonPositiveFloat => bounded_float(raw, |n| n <= 0.0, "at most 0.0"),
        Constraint::Email => email(raw.trim()),
        Constraint::HttpUrl => http_url(raw.trim()),
        Constraint::AnyUrl => any_url(raw.trim()),
        Constraint::Secret => Ok(Value::String(raw.to_owned())),
        Constraint::PostgresDsn => postgres_dsn(raw.trim()),
        Constraint::RedisDsn => redis_dsn(raw.trim()),
        Constraint::PaymentCard => payment_card(raw),
        Constraint::FilePath => existing_path(raw.trim(), Path::is_file, "a file"),
        Constraint::DirectoryPath => existing_path(raw.trim(), Path::is_dir, "a directory"),
    }
}

fn bounded_int(raw: &str, accept: fn(i64) -> bool, bound: &str) -> Result<Value, String> {
    let n = parse_int(raw)?;
    if accept(n) {
        Ok(Value::from(n))
    } else {
        Err(format!("must be {bound}"))
    }
}

fn bounded_float(raw: &str, accept: fn(f64) -> bool, bound: &str) -> Result<Value, String> {
    let n = parse_float(raw)?;
    if accept(n) {
        float_value(n)
    } else {
        Err(format!("must be {bound}"))
    }
}

fn email(value: &str) -> Result<Value, String> {
    let len = value.chars().count();
    if len < EMAIL_MIN_LEN {
        return Err(format!("must be at least {EMAIL_MIN_LEN} characters"));
    }
    if len > EMAIL_MAX_LEN {
        return Err(format!("must be at most {EMAIL_MAX_LEN} characters"));
    }
    if !EMAIL.is_match(value) {
        return Err(String::from("invalid e-mail format"));
    }
    Ok(Value::String(value.to_owned()))
}

fn http_url(value: &str) -> Result<Value, String> {
    if value.is_empty() {
        return Err(String::from("URL cannot be empty"));
    }
    if value.chars().count() > URL_MAX_LEN {
        return Err(format!("must be at most {URL_MAX_LEN} characters"));
    }
    if !HTTP_URL.is_match(value) {
        return Err(String::from("invalid HTTP URL; the scheme must be http or https"));
    }
    Ok(Value::String(value.to_owned()))
}

fn any_url(value: &str) -> Result<Value, String> {
    if value.is_empty() {
        return Err(String::from("URL cannot be empty"));
    }
    if !ANY_URL.is_match(value) {
        return Err(String::from("invalid URL format"));
    }
    Ok(Value::String(value.to_owned()))
}

fn strip_scheme<'a>(value: &'a str, schemes: &[&str]) -> Option<&'a str> {
    schemes.iter().find_map(|scheme| {
        value
            .get(..scheme.len())
            .filter(|head| head.eq_ignore_ascii_case(scheme))
            .and_then(|_| value.get(scheme.len()..))
    })
}

fn postgres_dsn(value: &str) -> Result<Value, String> {
    let Some(rest) = strip_scheme(value, &["postgresql://", "postgres://"]) else {
        return Err(String::from(
            "PostgreSQL DSN must start with 'postgresql://' or 'postgres://'",
        ));
    };
    if rest.is_empty() || !rest.contains('/') {
        return Err(String::from("PostgreSQL DSN must name a host and database"));
    }
    Ok(Value::String(value.to_owned()))
}

fn redis_dsn(value: &str) -> Result<Value, String> {
    if strip_scheme(value, &["redis://", "rediss://"]).is_none() {
        return Err(String::from(
            "Redis DSN must start with 'redis://' or 'rediss://'",
        ));
    }
    Ok(Value::String(value.to_owned()))
}

fn payment_card(raw: &str) -> Result<Value, String> {
    let digits: String = raw.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(String::from("card number must contain only digits"));
    }
    if !(CARD_MIN_DIGITS..=CARD_MAX_DIGITS).contains(&digits.len()) {
        return Err(format!(
            "card number must be {CARD_MIN_DIGITS}-{CARD_MAX_DIGITS} digits"
        ));
    }
    if !luhn_valid(&digits) {
        return Err(String::from("card number failed the Luhn check"));
    }
    Ok(Value::String(digits))
}

/// `digits` must be ASCII digits only.
fn luhn_valid(digits: &str) -> bool {
    let total: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(idx, byte)| {
            let digit = u32::from(byte - b'0');
            if idx.is_multiple_of(2) {
                digit
            } else if digit * 2 > 9 {
                digit * 2 - 9
            } else {
                digit * 2
            }
        })
        .sum();
    total.is_multiple_of(10)
}

fn existing_path(value: &str, kind_ok: fn(&Path) -> bool, noun: &str) -> Result<Value, String> {
    let path = Path::new(value);
    if !path.exists() {
        return Err(String::from("path does not exist"));
    }
    if !kind_ok(path) {
        return Err(format!("path is not {noun}"));
    }
    Ok(Value::String(value.to_owned()))
}
