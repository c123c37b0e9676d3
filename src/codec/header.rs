//! HTTP `Cookie` header string codec (`a=1; b=2; flag`).
//!
//! The header carries only names and values, so every other field takes its
//! canonical default on parse and is dropped on stringify.

use tracing::{debug, instrument, warn};

use crate::cookie::{CookieRecord, validate};
use crate::error::InterchangeError;

const FORMAT: &str = "header";

/// Parses a `;`-delimited cookie header string.
///
/// Each token is trimmed and split on its first `=`. The name is trimmed, the
/// value is kept verbatim. A token without `=` becomes a cookie with an empty
/// value. Tokens with an empty name are skipped.
///
/// # Errors
///
/// Returns [`InterchangeError::Format`] when no token yields a cookie.
#[instrument(level = "debug", skip(text))]
pub fn parse(text: &str) -> Result<Vec<CookieRecord>, InterchangeError> {
    let mut records = Vec::new();

    for (index, token) in text
        .split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .enumerate()
    {
        let record = match token.split_once('=') {
            Some((name, value)) => CookieRecord::new(name.trim(), value),
            None => CookieRecord::new(token, ""),
        };

        if !validate(&record) {
            warn!(token = index + 1, "skipping header token with empty name");
            continue;
        }

        records.push(record);
    }

    if records.is_empty() {
        return Err(InterchangeError::no_valid_cookies(FORMAT));
    }

    debug!(cookies = records.len(), "parsed header cookies");
    Ok(records)
}

/// Joins `name=value` pairs with `"; "`, discarding every other field.
#[must_use]
pub fn stringify(records: &[CookieRecord]) -> String {
    records
        .iter()
        .map(|record| format!("{}={}", record.name, record.value()))
        .collect::<Vec<_>>()
        .join("; ")
}
