//! Netscape HTTP cookie file codec (`cookies.txt`).
//!
//! Each data line carries 7 fields:
//! `domain`, `flag`, `path`, `secure`, `expiration`, `name`, `value`.
//! The format has no `HttpOnly` or `SameSite` column, so those always take
//! their canonical defaults on parse.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::cookie::{CookieRecord, normalize_expiration, normalize_expiration_f64};
use crate::error::InterchangeError;

const FORMAT: &str = "netscape";
const FIELD_COUNT: usize = 7;

/// Header written at the top of every exported file.
pub const FILE_HEADER: &str = "# Netscape HTTP Cookie File\n\
# This is a generated file! Do not edit.\n\
# https://curl.haxx.se/rfc/cookie_spec.html\n";

/// Domain written for records without one.
pub const FALLBACK_DOMAIN: &str = ".localhost";

/// Runs of TAB characters separate fields; hand-edited files often contain doubled tabs.
#[allow(clippy::expect_used)]
static FIELD_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\t+").expect("field separator regex is valid")); // Static pattern, safe to panic

/// Parses a Netscape cookie file.
///
/// Blank lines and lines starting with `#` are skipped. Lines are split on
/// runs of TABs, falling back to any whitespace when that yields fewer than
/// 7 fields. Everything after the sixth field is the value, rejoined with TABs.
/// Lines that still lack 7 fields, or have an empty domain or name, are skipped.
///
/// # Errors
///
/// Returns [`InterchangeError::Format`] when no line yields a cookie.
#[instrument(level = "debug", skip(text))]
pub fn parse(text: &str) -> Result<Vec<CookieRecord>, InterchangeError> {
    let mut records = Vec::new();
    let mut skipped = 0_usize;

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        if is_comment_or_blank(raw_line) {
            continue;
        }

        match parse_line(raw_line) {
            Ok(record) => {
                debug!(
                    line = line_number,
                    domain = %record.domain,
                    name = %record.name,
                    "parsed cookie"
                );
                records.push(record);
            }
            Err(reason) => {
                skipped += 1;
                warn!(line = line_number, reason, "skipping malformed cookie line");
            }
        }
    }

    if records.is_empty() {
        debug!(skipped, "no cookie line survived");
        return Err(InterchangeError::no_valid_cookies(FORMAT));
    }

    Ok(records)
}

/// Serializes records as a Netscape cookie file.
///
/// Records without a name are omitted. A missing domain becomes `.localhost`
/// and a session cookie is written with expiration `0`.
#[must_use]
pub fn stringify(records: &[CookieRecord]) -> String {
    let mut output = String::from(FILE_HEADER);
    output.push('\n');

    for record in records.iter().filter(|record| !record.name.is_empty()) {
        let domain = if record.domain.is_empty() {
            FALLBACK_DOMAIN
        } else {
            record.domain.as_str()
        };
        let flag = bool_field(domain.starts_with('.'));
        let path = if record.path.is_empty() {
            "/"
        } else {
            record.path.as_str()
        };
        let secure = bool_field(record.secure);
        let expiration = record.expiration_date.unwrap_or(0);

        output.push_str(&format!(
            "{domain}\t{flag}\t{path}\t{secure}\t{expiration}\t{}\t{}\n",
            record.name,
            record.value()
        ));
    }

    output
}

/// Cheap format sniff: `true` if any non-comment line has exactly 7
/// TAB-separated fields. Looser than [`parse`] and independent of it.
#[must_use]
pub fn validate(content: &str) -> bool {
    content
        .lines()
        .filter(|line| !is_comment_or_blank(line))
        .any(|line| line.trim().split('\t').count() == FIELD_COUNT)
}

fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn parse_line(raw_line: &str) -> Result<CookieRecord, &'static str> {
    // Keep trailing TABs: they delimit an empty value column.
    let line = raw_line
        .trim_start()
        .trim_end_matches(|c: char| c.is_whitespace() && c != '\t');

    let mut fields: Vec<&str> = FIELD_SEPARATOR.split(line).collect();
    if fields.len() < FIELD_COUNT {
        fields = line.split_whitespace().collect();
    }
    if fields.len() < FIELD_COUNT {
        return Err("expected 7 TAB-separated fields");
    }

    let domain = fields[0].trim();
    let name = fields[5].trim();
    if domain.is_empty() {
        return Err("domain field is empty");
    }
    if name.is_empty() {
        return Err("cookie name field is empty");
    }

    Ok(CookieRecord::new(name, fields[FIELD_COUNT - 1..].join("\t"))
        .with_domain(domain)
        .with_path(fields[2])
        .with_secure(fields[3].trim().eq_ignore_ascii_case("TRUE"))
        .with_expiration(parse_expiration(fields[4])))
}

fn parse_expiration(field: &str) -> Option<i64> {
    let field = field.trim();
    field
        .parse::<i64>()
        .ok()
        .and_then(normalize_expiration)
        .or_else(|| field.parse::<f64>().ok().and_then(normalize_expiration_f64))
}

fn bool_field(flag: bool) -> &'static str {
    if flag { "TRUE" } else { "FALSE" }
}
