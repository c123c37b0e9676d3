//! JSON cookie codec.
//!
//! Accepts a single cookie object or an array of them, as produced by browser
//! extension exports. Every entry must carry `name` and `value`; one bad entry
//! fails the whole input. Emits a 2-space indented array of canonical records.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::cookie::{CookieRecord, SameSite, normalize_expiration_f64, validate};
use crate::error::InterchangeError;

const FORMAT: &str = "json";

// Optional fields stay untyped so a wrongly typed one falls back to its default
// instead of failing the batch.
#[derive(Debug, Deserialize)]
struct JsonCookieEntry {
    name: Option<Value>,
    value: Option<Value>,
    domain: Option<Value>,
    path: Option<Value>,
    secure: Option<Value>,
    #[serde(rename = "httpOnly")]
    http_only: Option<Value>,
    #[serde(rename = "sameSite")]
    same_site: Option<Value>,
    #[serde(rename = "expirationDate")]
    expiration_date: Option<Value>,
}

/// Parses a JSON cookie export.
///
/// # Errors
///
/// Returns [`InterchangeError::Format`] for malformed JSON, a top-level value
/// that is neither object nor array, or an empty array. Returns
/// [`InterchangeError::Validation`] naming the 1-based entry when any entry
/// lacks a usable `name` or `value`.
#[instrument(level = "debug", skip(text))]
pub fn parse(text: &str) -> Result<Vec<CookieRecord>, InterchangeError> {
    let payload: Value = serde_json::from_str(text.trim())
        .map_err(|error| InterchangeError::format(FORMAT, error.to_string()))?;

    let entries = match payload {
        Value::Array(entries) => entries,
        entry @ Value::Object(_) => vec![entry],
        _ => {
            return Err(InterchangeError::format(
                FORMAT,
                "expected a cookie object or an array of cookie objects",
            ));
        }
    };

    if entries.is_empty() {
        return Err(InterchangeError::no_valid_cookies(FORMAT));
    }

    let records = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| convert_entry(index + 1, entry))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(cookies = records.len(), "parsed JSON cookies");
    Ok(records)
}

/// Serializes records as a 2-space indented JSON array, preserving order.
///
/// # Errors
///
/// Returns [`InterchangeError::Format`] if serialization fails.
pub fn stringify(records: &[CookieRecord]) -> Result<String, InterchangeError> {
    serde_json::to_string_pretty(records)
        .map_err(|error| InterchangeError::format(FORMAT, error.to_string()))
}

fn convert_entry(entry_number: usize, entry: Value) -> Result<CookieRecord, InterchangeError> {
    if !entry.is_object() {
        return Err(InterchangeError::validation(format!(
            "entry {entry_number}: each cookie must be a JSON object"
        )));
    }

    let entry: JsonCookieEntry = serde_json::from_value(entry).map_err(|error| {
        InterchangeError::validation(format!("entry {entry_number}: {error}"))
    })?;

    let missing = || {
        InterchangeError::validation(format!(
            "entry {entry_number}: each cookie must have name and value"
        ))
    };

    let name = match entry.name {
        Some(Value::String(name)) => name,
        _ => return Err(missing()),
    };
    let value = entry.value.as_ref().and_then(scalar_text).ok_or_else(missing)?;

    let same_site = match entry.same_site.as_ref().and_then(Value::as_str) {
        None => SameSite::NoRestriction,
        Some(label) => SameSite::from_label(label).unwrap_or_else(|| {
            warn!(
                entry = entry_number,
                same_site = label,
                "unknown sameSite value; using no_restriction"
            );
            SameSite::NoRestriction
        }),
    };

    let mut record = CookieRecord::new(name, value)
        .with_domain(string_field(entry.domain.as_ref()).unwrap_or_default())
        .with_path(string_field(entry.path.as_ref()).unwrap_or_default())
        .with_secure(bool_field(entry.secure.as_ref()))
        .with_http_only(bool_field(entry.http_only.as_ref()))
        .with_same_site(same_site);
    record.expiration_date = entry.expiration_date.as_ref().and_then(expiration_field);

    if !validate(&record) {
        return Err(missing());
    }

    Ok(record)
}

fn string_field(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str)
}

/// `true`, or the string `"true"` in any case. Anything else is `false`.
fn bool_field(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Seconds from a number or numeric string. Unparseable values are a session cookie.
fn expiration_field(value: &Value) -> Option<i64> {
    let seconds = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    normalize_expiration_f64(seconds)
}

/// Text form of a JSON scalar usable as a cookie value. `null`, arrays and
/// objects have none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
