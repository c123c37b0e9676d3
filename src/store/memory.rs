use async_trait::async_trait;
use tokio::sync::RwLock;
use url::Url;

use super::{
    CookieFilter, CookieStore, SetCookieRequest, StoreError, apply_remove, apply_set, unix_now,
};
use crate::cookie::CookieRecord;

/// Process-local cookie store.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookies: RwLock<Vec<CookieRecord>>,
}

impl MemoryCookieStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `cookies`.
    #[must_use]
    pub fn with_cookies(cookies: Vec<CookieRecord>) -> Self {
        Self {
            cookies: RwLock::new(cookies),
        }
    }

    /// Returns a copy of every stored cookie, in insertion order.
    pub async fn snapshot(&self) -> Vec<CookieRecord> {
        self.cookies.read().await.clone()
    }
}

#[async_trait]
impl CookieStore for MemoryCookieStore {
    async fn list_cookies(&self, filter: &CookieFilter) -> Result<Vec<CookieRecord>, StoreError> {
        Ok(self
            .cookies
            .read()
            .await
            .iter()
            .filter(|cookie| filter.matches(cookie))
            .cloned()
            .collect())
    }

    async fn set_cookie(&self, request: &SetCookieRequest) -> Result<(), StoreError> {
        let mut cookies = self.cookies.write().await;
        apply_set(&mut cookies, request, unix_now())
    }

    async fn remove_cookie(&self, url: &Url, name: &str) -> Result<bool, StoreError> {
        let mut cookies = self.cookies.write().await;
        Ok(apply_remove(&mut cookies, url, name))
    }
}
