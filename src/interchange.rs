//! Import and export pipelines tying codecs, encryption and the cookie store together.
//!
//! Import: detect ciphertext and decrypt, parse with the selected codec, then
//! write each record to the store independently. A partially imported batch
//! is a normal outcome, reported through [`ImportReport`].
//!
//! Export: list records, stringify with the selected codec, and encrypt when a
//! password is given.

use tracing::{debug, info, instrument, warn};
use url::Url;
use zeroize::Zeroizing;

use crate::codec::{self, CookieFormat};
use crate::cookie::{CookieRecord, normalize_path};
use crate::crypto;
use crate::error::InterchangeError;
use crate::store::{CookieFilter, CookieStore, SetCookieRequest, StoreError};

/// Domain used when neither the record nor the caller supplies one.
pub const FALLBACK_DOMAIN: &str = "example.com";

/// Records recovered from raw import text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    /// Parsed records, never empty.
    pub records: Vec<CookieRecord>,
    /// Whether the input had to be decrypted first.
    pub decrypted: bool,
}

/// A single record the store refused during import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    /// Name of the cookie that failed.
    pub name: String,
    /// Store error message.
    pub reason: String,
}

/// Aggregate outcome of writing a batch of records to a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Records written successfully.
    pub success_count: usize,
    /// Records the store refused.
    pub error_count: usize,
    /// Per-record failures, in input order.
    pub errors: Vec<ImportFailure>,
}

/// Outcome of a full import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Whether the input was encrypted.
    pub decrypted: bool,
    /// Per-record write results.
    pub report: ImportReport,
}

/// Serialized export text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    /// Codec output, or its encrypted form.
    pub text: String,
    /// Whether `text` is an encrypted blob.
    pub encrypted: bool,
}

/// Turns raw import text into records.
///
/// When the text looks encrypted a password is required and the text is
/// decrypted before parsing.
///
/// # Errors
///
/// - [`InterchangeError::Validation`] for blank input
/// - [`InterchangeError::PasswordRequired`] when ciphertext is detected without a password
/// - [`InterchangeError::Decryption`] when decryption fails
/// - any codec error from parsing
#[instrument(level = "debug", skip(raw_text, password))]
pub async fn decode_payload(
    raw_text: &str,
    format: CookieFormat,
    password: Option<&str>,
) -> Result<DecodedPayload, InterchangeError> {
    let trimmed = raw_text.trim();
    if trimmed.is_empty() {
        return Err(InterchangeError::validation("no cookie data provided"));
    }

    let (text, decrypted) = if crypto::is_encrypted(trimmed) {
        let password = password
            .filter(|password| !password.is_empty())
            .ok_or(InterchangeError::PasswordRequired)?;
        let plaintext = crypto::decrypt_in_background(
            trimmed.to_string(),
            Zeroizing::new(password.to_string()),
        )
        .await?;
        debug!("decrypted import payload");
        (Zeroizing::new(plaintext), true)
    } else {
        (Zeroizing::new(trimmed.to_string()), false)
    };

    let records = codec::parse(format, &text)?;
    Ok(DecodedPayload { records, decrypted })
}

/// Builds the store write for `record`.
///
/// The URL uses `https` for secure cookies and `http` otherwise, the record's
/// domain (or `fallback_domain`, or [`FALLBACK_DOMAIN`]) without a leading dot,
/// and the record's path. The record keeps its own domain only if it had one.
#[must_use]
pub fn normalize_for_store(record: &CookieRecord, fallback_domain: Option<&str>) -> SetCookieRequest {
    let domain = [Some(record.domain.as_str()), fallback_domain]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|domain| !domain.is_empty())
        .unwrap_or(FALLBACK_DOMAIN);

    let scheme = if record.secure { "https" } else { "http" };
    let path = normalize_path(&record.path);
    let url = format!("{scheme}://{}{path}", domain.trim_start_matches('.'));

    let mut normalized = record.clone();
    normalized.path = path;

    SetCookieRequest {
        url,
        record: normalized,
    }
}

/// Writes records to `store` one at a time. Failures are counted, never raised.
#[instrument(level = "debug", skip(store, records))]
pub async fn materialize(
    store: &dyn CookieStore,
    records: &[CookieRecord],
    fallback_domain: Option<&str>,
) -> ImportReport {
    let mut report = ImportReport::default();

    for record in records {
        let request = normalize_for_store(record, fallback_domain);
        match store.set_cookie(&request).await {
            Ok(()) => {
                debug!(name = %record.name, url = %request.url, "imported cookie");
                report.success_count += 1;
            }
            Err(error) => {
                warn!(name = %record.name, error = %error, "error importing cookie");
                report.error_count += 1;
                report.errors.push(ImportFailure {
                    name: record.name.clone(),
                    reason: error.to_string(),
                });
            }
        }
    }

    report
}

/// Decodes `raw_text` and writes the resulting records to `store`.
///
/// # Errors
///
/// Returns the [`decode_payload`] error when the payload as a whole cannot be
/// read. Per-record store failures are reported in the summary instead.
#[instrument(level = "debug", skip(store, raw_text, password))]
pub async fn import_payload(
    store: &dyn CookieStore,
    raw_text: &str,
    format: CookieFormat,
    password: Option<&str>,
    fallback_domain: Option<&str>,
) -> Result<ImportSummary, InterchangeError> {
    let decoded = decode_payload(raw_text, format, password).await?;
    let report = materialize(store, &decoded.records, fallback_domain).await;

    info!(
        format = %format,
        decrypted = decoded.decrypted,
        imported = report.success_count,
        failed = report.error_count,
        "import complete"
    );

    Ok(ImportSummary {
        decrypted: decoded.decrypted,
        report,
    })
}

/// Serializes `records`, encrypting the result when `password` is non-empty.
///
/// # Errors
///
/// Returns codec serialization errors, [`InterchangeError::Validation`] when
/// there is nothing to encrypt, or [`InterchangeError::Encryption`].
#[instrument(level = "debug", skip(records, password), fields(records = records.len()))]
pub async fn export_payload(
    records: &[CookieRecord],
    format: CookieFormat,
    password: Option<&str>,
) -> Result<ExportPayload, InterchangeError> {
    let text = codec::stringify(format, records)?;

    match password.filter(|password| !password.is_empty()) {
        Some(password) => {
            let text =
                crypto::encrypt_in_background(text, Zeroizing::new(password.to_string())).await?;
            Ok(ExportPayload {
                text,
                encrypted: true,
            })
        }
        None => Ok(ExportPayload {
            text,
            encrypted: false,
        }),
    }
}

/// Lists cookies matching `filter` from `store` and exports them.
///
/// # Errors
///
/// Returns [`InterchangeError::Validation`] if listing fails, plus any
/// [`export_payload`] error.
pub async fn export_from_store(
    store: &dyn CookieStore,
    filter: &CookieFilter,
    format: CookieFormat,
    password: Option<&str>,
) -> Result<ExportPayload, InterchangeError> {
    let records = store
        .list_cookies(filter)
        .await
        .map_err(|error| InterchangeError::validation(format!("cannot list cookies: {error}")))?;
    debug!(cookies = records.len(), "loaded cookies for export");
    export_payload(&records, format, password).await
}

/// URL addressing `record` for store removal.
///
/// # Errors
///
/// Returns [`InterchangeError::Validation`] when the record's domain and path
/// do not form a valid URL.
pub fn cookie_url(record: &CookieRecord) -> Result<Url, InterchangeError> {
    let scheme = if record.secure { "https" } else { "http" };
    let raw = format!("{scheme}://{}{}", record.host(), normalize_path(&record.path));
    Url::parse(&raw)
        .map_err(|error| InterchangeError::validation(format!("invalid cookie URL '{raw}': {error}")))
}

/// Removes every cookie matching `filter`. Returns the number removed.
///
/// # Errors
///
/// Returns [`InterchangeError::Validation`] if listing fails. Individual
/// removal failures are logged and skipped.
#[instrument(level = "debug", skip(store))]
pub async fn clear_cookies(
    store: &dyn CookieStore,
    filter: &CookieFilter,
) -> Result<usize, InterchangeError> {
    let cookies = store
        .list_cookies(filter)
        .await
        .map_err(|error| InterchangeError::validation(format!("cannot list cookies: {error}")))?;

    let mut removed = 0;
    for cookie in &cookies {
        let outcome = match cookie_url(cookie) {
            Ok(url) => store.remove_cookie(&url, &cookie.name).await.map_err(|e| e.to_string()),
            Err(error) => Err(error.to_string()),
        };
        match outcome {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(error) => warn!(name = %cookie.name, error = %error, "error removing cookie"),
        }
    }

    Ok(removed)
}

/// Creates or replaces a single cookie, resolving its URL like an import does.
///
/// # Errors
///
/// Returns the store's [`StoreError`] when it refuses the cookie.
#[instrument(level = "debug", skip(store, record), fields(name = %record.name))]
pub async fn upsert_cookie(
    store: &dyn CookieStore,
    record: &CookieRecord,
    fallback_domain: Option<&str>,
) -> Result<SetCookieRequest, StoreError> {
    let request = normalize_for_store(record, fallback_domain);
    store.set_cookie(&request).await?;
    debug!(url = %request.url, "saved cookie");
    Ok(request)
}

/// Removes the cookie called `name` on `domain` visible at `path`.
/// Returns whether one existed.
///
/// # Errors
///
/// Returns [`InterchangeError::Validation`] for a blank name or domain, an
/// invalid URL, or a store failure.
#[instrument(level = "debug", skip(store))]
pub async fn delete_cookie(
    store: &dyn CookieStore,
    name: &str,
    domain: &str,
    path: &str,
) -> Result<bool, InterchangeError> {
    if name.trim().is_empty() || domain.trim().is_empty() {
        return Err(InterchangeError::validation(
            "cookie name and domain are required",
        ));
    }
    let target = CookieRecord::new(name, "")
        .with_domain(domain.trim())
        .with_path(path);
    let url = cookie_url(&target)?;
    store
        .remove_cookie(&url, name)
        .await
        .map_err(|error| InterchangeError::validation(format!("cannot remove cookie: {error}")))
}

/// Suggested download name: `cookies_<domain|all>_<unix millis>.<ext>`.
#[must_use]
pub fn suggested_file_name(format: CookieFormat, domain: Option<&str>, unix_millis: u128) -> String {
    let domain = domain
        .map(str::trim)
        .filter(|domain| !domain.is_empty())
        .unwrap_or("all");
    format!(
        "cookies_{domain}_{unix_millis}.{}",
        format.file_extension()
    )
}
