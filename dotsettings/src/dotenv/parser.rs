//! Line-oriented `.env` parser.

use std::fmt;

use super::RawMapping;

/// Failure to parse one `.env` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// One-based line number where the offending entry starts.
    pub line: usize,
    /// Human-readable description of the problem.
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parse `.env` text into an ordered mapping.
///
/// Later assignments to the same key overwrite earlier ones. The key keeps
/// the position of its first assignment.
///
/// # Errors
///
/// Returns a [`ParseError`] for the first line that lacks `=`, has an empty
/// or invalid key, leaves a quoted value unterminated, or carries stray
/// characters after a closing quote.
///
/// # Examples
///
/// ```
/// use dotsettings::parse_env_text;
///
/// let mapping = parse_env_text("export PORT=3000 # http\nNAME='demo'\n")?;
/// assert_eq!(mapping.get("PORT").map(String::as_str), Some("3000"));
/// assert_eq!(mapping.get("NAME").map(String::as_str), Some("demo"));
/// # Ok::<_, dotsettings::ParseError>(())
/// ```
pub fn parse_env_text(text: &str) -> Result<RawMapping, ParseError> {
    let mut mapping = RawMapping::new();
    let mut lines = text.lines().enumerate();
    while let Some((idx, line)) = lines.next() {
        let number = idx + 1;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let at_line = |message: String| ParseError {
            line: number,
            message,
        };
        let (key, rest) = split_assignment(trimmed).map_err(at_line)?;
        let value = parse_value(rest, &mut lines).map_err(at_line)?;
        mapping.insert(key.to_owned(), value);
    }
    Ok(mapping)
}

fn strip_export(line: &str) -> &str {
    line.strip_prefix("export")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(str::trim_start)
        .filter(|rest| !rest.starts_with('='))
        .unwrap_or(line)
}

fn split_assignment(line: &str) -> Result<(&str, &str), String> {
    let body = strip_export(line);
    let Some((raw_key, rest)) = body.split_once('=') else {
        return Err(format!("expected `KEY=VALUE`, found {:?}", body.trim_end()));
    };
    let key = raw_key.trim();
    if key.is_empty() {
        return Err(String::from("missing key before `=`"));
    }
    if key
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\''))
    {
        return Err(format!("invalid key {key:?}"));
    }
    Ok((key, rest))
}

fn parse_value<'a, I>(rest: &'a str, lines: &mut I) -> Result<String, String>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let value = rest.trim_start();
    match value.chars().next() {
        Some(quote @ ('\'' | '"')) => {
            let body = quoted_body(value, quote, lines)?;
            Ok(if quote == '"' { unescape(&body) } else { body })
        }
        _ => Ok(unquoted(rest)),
    }
}

/// Collect the text between `value`'s opening quote and its closing quote,
/// pulling further physical lines from `lines` while the quote is open.
fn quoted_body<'a, I>(value: &'a str, quote: char, lines: &mut I) -> Result<String, String>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut body = String::new();
    let mut segment = value.get(quote.len_utf8()..).unwrap_or_default();
    loop {
        if let Some(end) = closing_quote(segment, quote) {
            body.push_str(segment.get(..end).unwrap_or_default());
            let trailing = segment
                .get(end + quote.len_utf8()..)
                .unwrap_or_default()
                .trim();
            if !trailing.is_empty() && !trailing.starts_with('#') {
                return Err(format!(
                    "unexpected characters {trailing:?} after closing quote"
                ));
            }
            return Ok(body);
        }
        body.push_str(segment);
        body.push('\n');
        let Some((_, next)) = lines.next() else {
            return Err(format!("unterminated {quote}-quoted value"));
        };
        segment = next;
    }
}

fn closing_quote(segment: &str, quote: char) -> Option<usize> {
    let mut chars = segment.char_indices();
    while let Some((idx, c)) = chars.next() {
        if c == '\\' && quote == '"' {
            chars.next();
        } else if c == quote {
            return Some(idx);
        }
    }
    None
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// An unquoted value ends at the first `#` preceded by whitespace.
fn unquoted(rest: &str) -> String {
    let mut after_space = false;
    let end = rest
        .char_indices()
        .find(|&(_, c)| {
            let starts_comment = c == '#' && after_space;
            after_space = c.is_whitespace();
            starts_comment
        })
        .map_or(rest.len(), |(idx, _)| idx);
    rest.get(..end).unwrap_or(rest).trim().to_owned()
}
