//! The canonical cookie record shared by every codec and the orchestrator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default cookie path applied whenever a path is absent or blank.
pub const DEFAULT_PATH: &str = "/";

/// `SameSite` policy of a cookie, using the browser extension API vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    /// Only sent on same-site requests.
    Strict,
    /// Sent on same-site requests and top-level navigations.
    Lax,
    /// No restriction (`SameSite=None`).
    #[default]
    NoRestriction,
}

impl SameSite {
    /// Returns the stable label used in JSON exports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lax => "lax",
            Self::NoRestriction => "no_restriction",
        }
    }

    /// Parses a policy label case-insensitively.
    ///
    /// `none` and `unspecified` (Chrome's value for "not set") map to
    /// [`SameSite::NoRestriction`]. Returns `None` for anything else.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "lax" => Some(Self::Lax),
            "no_restriction" | "none" | "unspecified" => Some(Self::NoRestriction),
            _ => None,
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cookie in canonical form.
///
/// An empty `domain` means the caller supplies one when the cookie is written
/// to a store. `expiration_date` is Unix seconds; `None` is a session cookie.
///
/// The value field is redacted in Debug output to keep cookie secrets out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    /// Cookie name (non-empty for a valid record).
    pub name: String,
    /// Cookie value (sensitive, never log).
    value: String,
    /// Cookie domain, possibly with a leading dot. Empty when unknown.
    #[serde(default)]
    pub domain: String,
    /// URL path scope; never empty.
    #[serde(default = "default_path")]
    pub path: String,
    /// Only sent over HTTPS.
    #[serde(default)]
    pub secure: bool,
    /// Hidden from scripts.
    #[serde(default)]
    pub http_only: bool,
    /// Cross-site policy.
    #[serde(default)]
    pub same_site: SameSite,
    /// Expiry in Unix seconds, `None` for a session cookie.
    #[serde(default)]
    pub expiration_date: Option<i64>,
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

impl CookieRecord {
    /// Creates a session cookie with canonical defaults for every structural field.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: default_path(),
            secure: false,
            http_only: false,
            same_site: SameSite::NoRestriction,
            expiration_date: None,
        }
    }

    /// Sets the domain.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Sets the path, falling back to `/` when blank.
    #[must_use]
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = normalize_path(path);
        self
    }

    /// Sets the secure flag.
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets the http-only flag.
    #[must_use]
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Sets the `SameSite` policy.
    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Sets the expiration; non-positive timestamps become a session cookie.
    #[must_use]
    pub fn with_expiration(mut self, expiration: Option<i64>) -> Self {
        self.expiration_date = expiration.and_then(normalize_expiration);
        self
    }

    /// Returns the cookie value. Do not log it.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns `true` when the cookie has no expiration.
    #[must_use]
    pub fn is_session(&self) -> bool {
        self.expiration_date.is_none()
    }

    /// Returns the domain with any leading dot removed.
    #[must_use]
    pub fn host(&self) -> &str {
        self.domain.strip_prefix('.').unwrap_or(&self.domain)
    }
}

// Custom Debug impl that redacts the cookie value.
impl fmt::Debug for CookieRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieRecord")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("domain", &self.domain)
            .field("path", &self.path)
            .field("secure", &self.secure)
            .field("http_only", &self.http_only)
            .field("same_site", &self.same_site)
            .field("expiration_date", &self.expiration_date)
            .finish()
    }
}

/// Returns `true` if the record may be accepted by a codec.
///
/// The name must contain non-whitespace text. Any value, including an empty
/// one, is acceptable.
#[must_use]
pub fn validate(record: &CookieRecord) -> bool {
    !record.name.trim().is_empty()
}

/// Maps a raw expiration to canonical form: positive seconds or session.
#[must_use]
pub fn normalize_expiration(raw: i64) -> Option<i64> {
    (raw > 0).then_some(raw)
}

/// Maps a fractional expiration (browser exports carry sub-second precision)
/// to canonical form, flooring to whole seconds.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn normalize_expiration_f64(raw: f64) -> Option<i64> {
    if !raw.is_finite() || raw < 1.0 {
        return None;
    }
    // Saturating float-to-int cast; anything past i64::MAX is effectively permanent.
    normalize_expiration(raw.floor() as i64)
}

/// Returns `/` for blank paths, otherwise the path unchanged.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    if path.trim().is_empty() {
        default_path()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_canonical_defaults() {
        let record = CookieRecord::new("a", "b");
        assert_eq!(record.name, "a");
        assert_eq!(record.value(), "b");
        assert_eq!(record.domain, "");
        assert_eq!(record.path, "/");
        assert!(!record.secure);
        assert!(!record.http_only);
        assert_eq!(record.same_site, SameSite::NoRestriction);
        assert!(record.is_session());
    }

    #[test]
    fn test_with_path_blank_falls_back_to_root() {
        let record = CookieRecord::new("a", "b").with_path("  ");
        assert_eq!(record.path, "/");
    }

    #[test]
    fn test_with_expiration_non_positive_is_session() {
        assert!(CookieRecord::new("a", "b").with_expiration(Some(0)).is_session());
        assert!(CookieRecord::new("a", "b").with_expiration(Some(-5)).is_session());
        assert_eq!(
            CookieRecord::new("a", "b")
                .with_expiration(Some(1_700_000_000))
                .expiration_date,
            Some(1_700_000_000)
        );
    }

    #[test]
    fn test_normalize_expiration_f64_floors() {
        assert_eq!(normalize_expiration_f64(1_700_000_000.9), Some(1_700_000_000));
        assert_eq!(normalize_expiration_f64(0.5), None);
        assert_eq!(normalize_expiration_f64(-1.0), None);
        assert_eq!(normalize_expiration_f64(f64::NAN), None);
    }

    #[test]
    fn test_validate_requires_name() {
        assert!(validate(&CookieRecord::new("a", "")));
        assert!(!validate(&CookieRecord::new("", "value")));
        assert!(!validate(&CookieRecord::new("   ", "value")));
    }

    #[test]
    fn test_same_site_labels() {
        assert_eq!(SameSite::from_label("Strict"), Some(SameSite::Strict));
        assert_eq!(SameSite::from_label("lax"), Some(SameSite::Lax));
        assert_eq!(SameSite::from_label("none"), Some(SameSite::NoRestriction));
        assert_eq!(
            SameSite::from_label("unspecified"),
            Some(SameSite::NoRestriction)
        );
        assert_eq!(SameSite::from_label("sideways"), None);
        assert_eq!(SameSite::NoRestriction.to_string(), "no_restriction");
    }

    #[test]
    fn test_host_strips_leading_dot() {
        let record = CookieRecord::new("a", "b").with_domain(".example.com");
        assert_eq!(record.host(), "example.com");
    }

    #[test]
    fn test_debug_redacts_value() {
        let record = CookieRecord::new("session", "super_secret_token");
        let debug_str = format!("{record:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(
            !debug_str.contains("super_secret_token"),
            "Debug output must NOT contain the actual value"
        );
    }

    #[test]
    fn test_serialize_uses_camel_case_fields() {
        let record = CookieRecord::new("a", "b");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["httpOnly"], false);
        assert_eq!(json["sameSite"], "no_restriction");
        assert!(json["expirationDate"].is_null());
    }
}
