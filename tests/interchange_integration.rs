//! Integration tests for import/export pipelines over a file-backed store.

use cookieport_core::{
    CookieFilter, CookieFormat, CookieRecord, CookieStore, FileCookieStore, InterchangeError,
    SameSite, export_from_store, import_payload, is_encrypted,
};
use tempfile::TempDir;

const NETSCAPE_SAMPLE: &str = "# Netscape HTTP Cookie File\n\
.example.com\tTRUE\t/\tTRUE\t4102444800\tsid\tabc123\n\
example.com\tFALSE\t/app\tFALSE\t0\tpref\tdark\n\
not a cookie line\n";

fn store_in(tempdir: &TempDir) -> FileCookieStore {
    FileCookieStore::new(tempdir.path().join("cookies.json"))
}

#[tokio::test]
async fn test_netscape_import_skips_bad_lines_and_persists() {
    let tempdir = TempDir::new().unwrap();
    let store = store_in(&tempdir);

    let summary = import_payload(&store, NETSCAPE_SAMPLE, CookieFormat::Netscape, None, None)
        .await
        .unwrap();
    assert!(!summary.decrypted);
    assert_eq!(summary.report.success_count, 2);
    assert_eq!(summary.report.error_count, 0);

    let reopened = store_in(&tempdir);
    let cookies = reopened.list_cookies(&CookieFilter::all()).await.unwrap();
    assert_eq!(cookies.len(), 2);

    let sid = cookies.iter().find(|cookie| cookie.name == "sid").unwrap();
    assert_eq!(sid.domain, ".example.com");
    assert!(sid.secure);
    assert_eq!(sid.expiration_date, Some(4_102_444_800));

    let pref = cookies.iter().find(|cookie| cookie.name == "pref").unwrap();
    assert_eq!(pref.path, "/app");
    assert!(pref.is_session());
}

#[tokio::test]
async fn test_encrypted_json_round_trip_between_stores() {
    let tempdir = TempDir::new().unwrap();
    let source = FileCookieStore::new(tempdir.path().join("source.json"));
    let target = FileCookieStore::new(tempdir.path().join("target.json"));

    let json = r#"[{
        "name": "token",
        "value": "s3cr3t",
        "domain": ".example.com",
        "path": "/",
        "secure": true,
        "httpOnly": true,
        "sameSite": "Strict",
        "expirationDate": 4102444800.5
    }]"#;
    import_payload(&source, json, CookieFormat::Json, None, None)
        .await
        .unwrap();

    let exported = export_from_store(
        &source,
        &CookieFilter::for_domain("example.com"),
        CookieFormat::Json,
        Some("correct horse"),
    )
    .await
    .unwrap();
    assert!(exported.encrypted);
    assert!(is_encrypted(&exported.text));

    let missing = import_payload(&target, &exported.text, CookieFormat::Json, None, None).await;
    assert_eq!(missing.unwrap_err(), InterchangeError::PasswordRequired);

    let wrong = import_payload(
        &target,
        &exported.text,
        CookieFormat::Json,
        Some("battery staple"),
        None,
    )
    .await;
    assert_eq!(wrong.unwrap_err(), InterchangeError::Decryption);

    let summary = import_payload(
        &target,
        &exported.text,
        CookieFormat::Json,
        Some("correct horse"),
        None,
    )
    .await
    .unwrap();
    assert!(summary.decrypted);
    assert_eq!(summary.report.success_count, 1);

    let cookies = target.list_cookies(&CookieFilter::all()).await.unwrap();
    let expected = CookieRecord::new("token", "s3cr3t")
        .with_domain(".example.com")
        .with_secure(true)
        .with_http_only(true)
        .with_same_site(SameSite::Strict)
        .with_expiration(Some(4_102_444_800));
    assert_eq!(cookies, vec![expected]);
}

#[tokio::test]
async fn test_partial_failure_batch_keeps_successes() {
    let tempdir = TempDir::new().unwrap();
    let store = store_in(&tempdir);

    let json = r#"[
        {"name": "ok", "value": "1", "domain": "good.example"},
        {"name": "bad", "value": "2", "domain": "has space.example"},
        {"name": "expired", "value": "3", "domain": "good.example", "expirationDate": 1},
        {"name": "hostless", "value": "4"}
    ]"#;

    let summary = import_payload(&store, json, CookieFormat::Json, None, Some("fallback.test"))
        .await
        .unwrap();
    assert_eq!(summary.report.success_count, 3);
    assert_eq!(summary.report.error_count, 1);
    assert_eq!(summary.report.errors[0].name, "bad");

    let names: Vec<String> = store
        .list_cookies(&CookieFilter::all())
        .await
        .unwrap()
        .into_iter()
        .map(|cookie| cookie.name)
        .collect();
    assert_eq!(names, vec!["ok".to_string(), "hostless".to_string()]);

    let hostless = store
        .list_cookies(&CookieFilter::for_domain("fallback.test"))
        .await
        .unwrap();
    assert_eq!(hostless.len(), 1);
}

#[tokio::test]
async fn test_netscape_export_reimports_losslessly_for_its_fields() {
    let tempdir = TempDir::new().unwrap();
    let source = FileCookieStore::new(tempdir.path().join("a.json"));
    let target = FileCookieStore::new(tempdir.path().join("b.json"));

    import_payload(&source, NETSCAPE_SAMPLE, CookieFormat::Netscape, None, None)
        .await
        .unwrap();
    let exported = export_from_store(&source, &CookieFilter::all(), CookieFormat::Netscape, None)
        .await
        .unwrap();
    assert!(!exported.encrypted);
    assert!(exported.text.starts_with("# Netscape HTTP Cookie File"));

    import_payload(&target, &exported.text, CookieFormat::Netscape, None, None)
        .await
        .unwrap();

    let before = source.list_cookies(&CookieFilter::all()).await.unwrap();
    let after = target.list_cookies(&CookieFilter::all()).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_invalid_payloads_leave_store_untouched() {
    let tempdir = TempDir::new().unwrap();
    let store = store_in(&tempdir);

    let err = import_payload(&store, "   ", CookieFormat::Header, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, InterchangeError::Validation(_)));

    let err = import_payload(&store, "# only comments\n", CookieFormat::Netscape, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, InterchangeError::Format { .. }));

    let err = import_payload(&store, "{broken", CookieFormat::Json, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, InterchangeError::Format { .. }));

    assert!(!tempdir.path().join("cookies.json").exists());
}
