//! JSON-file backed cookie store used by the command-line tool.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use super::{
    CookieFilter, CookieStore, SetCookieRequest, StoreError, apply_remove, apply_set, unix_now,
};
use crate::cookie::CookieRecord;

/// Cookie store persisted as a JSON array on disk.
///
/// The file is created on first write. Every operation re-reads the file, so
/// edits made by other tools between calls are picked up.
#[derive(Debug)]
pub struct FileCookieStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileCookieStore {
    /// Creates a store backed by `path`. Nothing is read until the first operation.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<CookieRecord>, StoreError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path).await?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    async fn save(&self, cookies: &[CookieRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let payload = serde_json::to_string_pretty(cookies)?;
        fs::write(&self.path, payload).await?;
        set_owner_only_permissions(&self.path).await?;
        debug!(path = %self.path.display(), cookies = cookies.len(), "saved cookie store");
        Ok(())
    }
}

#[async_trait]
impl CookieStore for FileCookieStore {
    async fn list_cookies(&self, filter: &CookieFilter) -> Result<Vec<CookieRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut cookies = self.load().await?;
        cookies.retain(|cookie| filter.matches(cookie));
        Ok(cookies)
    }

    async fn set_cookie(&self, request: &SetCookieRequest) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut cookies = self.load().await?;
        apply_set(&mut cookies, request, unix_now())?;
        self.save(&cookies).await
    }

    async fn remove_cookie(&self, url: &Url, name: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut cookies = self.load().await?;
        let removed = apply_remove(&mut cookies, url, name);
        if removed {
            self.save(&cookies).await?;
        }
        Ok(removed)
    }
}

#[cfg(unix)]
async fn set_owner_only_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = std::fs::Permissions::from_mode(0o600);
    fs::set_permissions(path, permissions).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn set_owner_only_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn sample_request() -> SetCookieRequest {
        SetCookieRequest {
            url: "https://example.com/".to_string(),
            record: CookieRecord::new("sid", "secret")
                .with_domain(".example.com")
                .with_secure(true),
        }
    }

    #[tokio::test]
    async fn test_missing_file_lists_nothing() {
        let tempdir = TempDir::new().unwrap();
        let store = FileCookieStore::new(tempdir.path().join("cookies.json"));
        assert!(
            store
                .list_cookies(&CookieFilter::all())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_set_persists_across_instances() {
        let tempdir = TempDir::new().unwrap();
        let path = tempdir.path().join("nested").join("cookies.json");

        FileCookieStore::new(&path)
            .set_cookie(&sample_request())
            .await
            .unwrap();

        let reopened = FileCookieStore::new(&path);
        let cookies = reopened.list_cookies(&CookieFilter::all()).await.unwrap();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "sid");
        assert_eq!(cookies[0].value(), "secret");
        assert!(cookies[0].secure);
    }

    #[tokio::test]
    async fn test_remove_rewrites_file() {
        let tempdir = TempDir::new().unwrap();
        let store = FileCookieStore::new(tempdir.path().join("cookies.json"));
        store.set_cookie(&sample_request()).await.unwrap();

        let url = Url::parse("https://example.com/").unwrap();
        assert!(store.remove_cookie(&url, "sid").await.unwrap());
        assert!(
            store
                .list_cookies(&CookieFilter::all())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_json_error() {
        let tempdir = TempDir::new().unwrap();
        let path = tempdir.path().join("cookies.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = FileCookieStore::new(&path)
            .list_cookies(&CookieFilter::all())
            .await;
        assert!(matches!(result, Err(StoreError::Json(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_store_sets_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tempdir = TempDir::new().unwrap();
        let path = tempdir.path().join("cookies.json");
        FileCookieStore::new(&path)
            .set_cookie(&sample_request())
            .await
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
