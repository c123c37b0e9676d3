//! Cookie store contract and the bundled store implementations.
//!
//! The interchange engine never owns cookies itself; it reads from and writes
//! to a [`CookieStore`]. A browser integration implements the trait over its
//! native cookie API. [`MemoryCookieStore`] and [`FileCookieStore`] cover tests
//! and the command-line tool.
//!
//! Both bundled stores share the same write rules:
//! - the target URL must be `http`/`https` with a host
//! - a record without a domain becomes host-only for the URL host
//! - a `secure` cookie cannot be set through an `http` URL
//! - an already expired cookie deletes any existing match instead of being stored
//! - otherwise the cookie replaces the one with the same name, domain and path

mod file;
mod memory;

pub use file::FileCookieStore;
pub use memory::MemoryCookieStore;

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use url::Url;

use crate::cookie::{CookieRecord, DEFAULT_PATH};

/// Errors returned by cookie store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The target URL is malformed or unsuitable for cookies.
    #[error("invalid cookie URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The store refused the cookie.
    #[error("cookie '{name}' rejected: {reason}")]
    Rejected {
        /// Cookie name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Filesystem I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Stored cookie data could not be (de)serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Selects which cookies [`CookieStore::list_cookies`] returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieFilter {
    /// Restrict to this domain and its subdomains. `None` lists everything.
    pub domain: Option<String>,
}

impl CookieFilter {
    /// Matches every cookie.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches cookies whose domain is `domain` or one of its subdomains.
    #[must_use]
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
        }
    }

    /// Returns `true` if `record` passes the filter.
    #[must_use]
    pub fn matches(&self, record: &CookieRecord) -> bool {
        match &self.domain {
            None => true,
            Some(domain) => domain_matches(domain, record.host()),
        }
    }
}

/// A cookie write: the canonical record plus the URL it is associated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookieRequest {
    /// URL the cookie is set for (scheme, host and path).
    pub url: String,
    /// Cookie to write. An empty domain means host-only for the URL host.
    pub record: CookieRecord,
}

/// External cookie jar the interchange engine reads from and writes to.
///
/// This trait uses `async_trait` to support dynamic dispatch via `&dyn CookieStore`.
#[async_trait]
pub trait CookieStore: Send + Sync {
    /// Lists cookies passing `filter`.
    async fn list_cookies(&self, filter: &CookieFilter) -> Result<Vec<CookieRecord>, StoreError>;

    /// Creates or replaces a cookie.
    async fn set_cookie(&self, request: &SetCookieRequest) -> Result<(), StoreError>;

    /// Removes the cookie called `name` visible at `url`. Returns whether one existed.
    async fn remove_cookie(&self, url: &Url, name: &str) -> Result<bool, StoreError>;
}

/// Returns `true` if `host` equals `domain` or is one of its subdomains.
/// Leading dots and ASCII case are ignored.
#[must_use]
pub fn domain_matches(domain: &str, host: &str) -> bool {
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    let host = host.trim_start_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return false;
    }
    host == domain || host.ends_with(&format!(".{domain}"))
}

pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| {
            i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
        })
}

/// Applies a set request to an in-memory cookie list.
pub(crate) fn apply_set(
    jar: &mut Vec<CookieRecord>,
    request: &SetCookieRequest,
    now: i64,
) -> Result<(), StoreError> {
    let url = parse_cookie_url(&request.url)?;
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

    let mut record = request.record.clone();
    if record.name.trim().is_empty() {
        return Err(StoreError::Rejected {
            name: record.name,
            reason: "name is empty".to_string(),
        });
    }
    if record.secure && url.scheme() == "http" {
        return Err(StoreError::Rejected {
            name: record.name,
            reason: "secure cookie requires an https URL".to_string(),
        });
    }
    if record.domain.is_empty() {
        record.domain = host;
    } else if !domain_matches(&record.domain, &host) {
        return Err(StoreError::Rejected {
            name: record.name,
            reason: format!("domain '{}' does not match URL host '{host}'", record.domain),
        });
    }
    if record.path.is_empty() {
        record.path = DEFAULT_PATH.to_string();
    }

    jar.retain(|existing| !same_identity(existing, &record));

    if record.expiration_date.is_some_and(|expires| expires <= now) {
        return Ok(());
    }

    jar.push(record);
    Ok(())
}

/// Removes cookies named `name` visible at `url`. Returns whether any matched.
pub(crate) fn apply_remove(jar: &mut Vec<CookieRecord>, url: &Url, name: &str) -> bool {
    let host = url.host_str().unwrap_or_default();
    let url_path = url.path();
    let before = jar.len();
    jar.retain(|cookie| {
        !(cookie.name == name
            && domain_matches(&cookie.domain, host)
            && url_path.starts_with(cookie.path.as_str()))
    });
    jar.len() != before
}

fn same_identity(a: &CookieRecord, b: &CookieRecord) -> bool {
    a.name == b.name && a.domain.eq_ignore_ascii_case(&b.domain) && a.path == b.path
}

fn parse_cookie_url(raw: &str) -> Result<Url, StoreError> {
    let invalid = |reason: String| StoreError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("scheme '{}' is not supported", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("URL has no host".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str, record: CookieRecord) -> SetCookieRequest {
        SetCookieRequest {
            url: url.to_string(),
            record,
        }
    }

    #[test]
    fn test_domain_matches() {
        assert!(domain_matches(".example.com", "example.com"));
        assert!(domain_matches("example.com", "sub.example.com"));
        assert!(domain_matches("Example.COM", "example.com"));
        assert!(!domain_matches("example.com", "badexample.com"));
        assert!(!domain_matches("sub.example.com", "example.com"));
        assert!(!domain_matches("", "example.com"));
    }

    #[test]
    fn test_filter_matches_domain_and_subdomains() {
        let filter = CookieFilter::for_domain("example.com");
        assert!(filter.matches(&CookieRecord::new("a", "1").with_domain(".example.com")));
        assert!(filter.matches(&CookieRecord::new("a", "1").with_domain("api.example.com")));
        assert!(!filter.matches(&CookieRecord::new("a", "1").with_domain("other.com")));
        assert!(CookieFilter::all().matches(&CookieRecord::new("a", "1")));
    }

    #[test]
    fn test_apply_set_host_only_when_domain_missing() {
        let mut jar = Vec::new();
        apply_set(
            &mut jar,
            &request("http://Example.com/", CookieRecord::new("a", "1")),
            0,
        )
        .unwrap();
        assert_eq!(jar[0].domain, "example.com");
    }

    #[test]
    fn test_apply_set_replaces_same_identity() {
        let mut jar = Vec::new();
        let cookie = CookieRecord::new("a", "1").with_domain(".x.com");
        apply_set(&mut jar, &request("http://x.com/", cookie), 0).unwrap();
        let updated = CookieRecord::new("a", "2").with_domain(".x.com");
        apply_set(&mut jar, &request("http://x.com/", updated), 0).unwrap();
        assert_eq!(jar.len(), 1);
        assert_eq!(jar[0].value(), "2");
    }

    #[test]
    fn test_apply_set_expired_deletes_existing() {
        let mut jar = Vec::new();
        let cookie = CookieRecord::new("a", "1").with_domain(".x.com");
        apply_set(&mut jar, &request("http://x.com/", cookie), 0).unwrap();
        let expired = CookieRecord::new("a", "1")
            .with_domain(".x.com")
            .with_expiration(Some(100));
        apply_set(&mut jar, &request("http://x.com/", expired), 200).unwrap();
        assert!(jar.is_empty());
    }

    #[test]
    fn test_apply_set_rejects_bad_urls() {
        let mut jar = Vec::new();
        let cookie = CookieRecord::new("a", "1");
        assert!(matches!(
            apply_set(&mut jar, &request("not a url", cookie.clone()), 0),
            Err(StoreError::InvalidUrl { .. })
        ));
        assert!(matches!(
            apply_set(&mut jar, &request("ftp://x.com/", cookie), 0),
            Err(StoreError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_apply_set_rejects_secure_over_http() {
        let mut jar = Vec::new();
        let cookie = CookieRecord::new("a", "1").with_secure(true);
        assert!(matches!(
            apply_set(&mut jar, &request("http://x.com/", cookie), 0),
            Err(StoreError::Rejected { .. })
        ));
    }

    #[test]
    fn test_apply_set_rejects_foreign_domain() {
        let mut jar = Vec::new();
        let cookie = CookieRecord::new("a", "1").with_domain("other.com");
        assert!(matches!(
            apply_set(&mut jar, &request("http://x.com/", cookie), 0),
            Err(StoreError::Rejected { .. })
        ));
    }

    #[test]
    fn test_apply_remove_matches_name_host_and_path() {
        let mut jar = vec![
            CookieRecord::new("a", "1").with_domain(".x.com").with_path("/app"),
            CookieRecord::new("a", "2").with_domain("y.com"),
            CookieRecord::new("b", "3").with_domain(".x.com"),
        ];
        let url = Url::parse("https://x.com/other").unwrap();
        assert!(!apply_remove(&mut jar, &url, "a"));

        let url = Url::parse("https://x.com/app/page").unwrap();
        assert!(apply_remove(&mut jar, &url, "a"));
        assert_eq!(jar.len(), 2);
    }
}
