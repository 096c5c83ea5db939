use super::*;

fn at(unix: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(unix).expect("valid timestamp")
}

// =============================================================================
// Credential
// =============================================================================

#[test]
fn issue_adds_lifetime_to_issue_time() {
    let credential = Credential::issue("T", 3600, at(1_700_000_000));
    assert_eq!(credential.token(), "T");
    assert_eq!(credential.expires_at(), at(1_700_003_600));
}

#[test]
fn issue_drops_sub_second_precision() {
    let issued = at(1_700_000_000) + Duration::milliseconds(750);
    let credential = Credential::issue("T", 60, issued);
    assert_eq!(credential.expires_at(), at(1_700_000_060));
}

#[test]
fn issue_saturates_huge_lifetime() {
    let credential = Credential::issue("T", i64::MAX, at(1_700_000_000));
    assert_eq!(credential.expires_at().year(), 9999);
    assert!(!credential.is_expired_at(at(1_700_000_000)));
}

#[test]
fn issue_saturates_huge_negative_lifetime() {
    let credential = Credential::issue("T", i64::MIN, at(1_700_000_000));
    assert!(credential.is_expired_at(at(0)));
}

#[test]
fn expired_exactly_at_expiry_instant() {
    let credential = Credential::issue("T", 10, at(1_000));
    assert!(!credential.is_expired_at(at(1_009)));
    assert!(credential.is_expired_at(at(1_010)));
}

#[test]
fn cookie_carries_name_path_and_same_site() {
    let cookie = Credential::issue("abc.def", 60, at(1_700_000_000)).to_cookie();
    assert_eq!(cookie.name(), CREDENTIAL_COOKIE);
    assert_eq!(cookie.value(), "abc.def");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    assert_eq!(cookie.expires_datetime(), Some(at(1_700_000_060)));
}

#[test]
fn cookie_string_parses_back() {
    let credential = Credential::issue("tok-1", 86_400, at(1_700_000_000));
    let parsed = Credential::from_cookie_str(&credential.to_cookie().to_string()).expect("parse");
    assert_eq!(parsed, credential);
}

#[test]
fn from_cookie_str_rejects_other_cookie_names() {
    let err = Credential::from_cookie_str("session=abc; Expires=Wed, 21 Oct 2015 07:28:00 GMT").unwrap_err();
    assert!(matches!(err, StoreError::Malformed(_)));
}

#[test]
fn from_cookie_str_rejects_missing_expiry() {
    let err = Credential::from_cookie_str("access_token=abc; Path=/").unwrap_err();
    assert!(matches!(err, StoreError::Malformed(msg) if msg.contains("Expires")));
}

#[test]
fn from_cookie_str_rejects_empty_token() {
    let err = Credential::from_cookie_str("access_token=; Expires=Wed, 21 Oct 2015 07:28:00 GMT").unwrap_err();
    assert!(matches!(err, StoreError::Malformed(_)));
}

#[test]
fn debug_output_redacts_token() {
    let credential = Credential::issue("super-secret", 60, at(0));
    let rendered = format!("{credential:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("<redacted>"));
}

// =============================================================================
// MemoryCredentialStore
// =============================================================================

#[test]
fn memory_store_starts_empty() {
    let store = MemoryCredentialStore::new();
    assert!(store.read().expect("read").is_none());
    assert!(!store.is_present());
}

#[test]
fn memory_store_write_then_current() {
    let store = MemoryCredentialStore::new();
    let credential = Credential::issue("T", 3600, OffsetDateTime::now_utc());
    store.write(&credential).expect("write");
    assert_eq!(store.current(), Some(credential));
}

#[test]
fn memory_store_reports_expired_credential_absent() {
    let store = MemoryCredentialStore::with_credential(Credential::issue("T", 60, at(1_000)));
    assert!(store.current_at(at(1_059)).is_some());
    assert!(store.current_at(at(1_060)).is_none());
    // Still stored: expiry is passive.
    assert!(store.read().expect("read").is_some());
}

#[test]
fn memory_store_remove_is_idempotent() {
    let store = MemoryCredentialStore::with_credential(Credential::issue("T", 60, OffsetDateTime::now_utc()));
    store.remove().expect("first remove");
    store.remove().expect("second remove");
    assert!(store.read().expect("read").is_none());
}

// =============================================================================
// FileCredentialStore
// =============================================================================

#[test]
fn file_store_missing_file_reads_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileCredentialStore::new(dir.path().join("session"));
    assert!(store.read().expect("read").is_none());
}

#[test]
fn file_store_survives_new_instance() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("session");
    let credential = Credential::issue("T", 3600, OffsetDateTime::now_utc());

    FileCredentialStore::new(&path).write(&credential).expect("write");

    let reopened = FileCredentialStore::new(&path);
    assert_eq!(reopened.current(), Some(credential));
}

#[test]
fn file_store_writes_set_cookie_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileCredentialStore::new(dir.path().join("session"));
    store.write(&Credential::issue("T", 3600, OffsetDateTime::now_utc())).expect("write");

    let raw = std::fs::read_to_string(store.path()).expect("read file");
    assert!(raw.starts_with("access_token=T"));
    assert!(raw.contains("SameSite=Strict"));
    assert!(raw.contains("Expires="));
}

#[test]
fn file_store_remove_deletes_and_tolerates_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileCredentialStore::new(dir.path().join("session"));
    store.write(&Credential::issue("T", 3600, OffsetDateTime::now_utc())).expect("write");

    store.remove().expect("remove");
    assert!(!store.path().exists());
    store.remove().expect("remove again");
}

#[test]
fn file_store_garbage_reads_as_absent_through_current() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileCredentialStore::new(dir.path().join("session"));
    std::fs::write(store.path(), "not a cookie at all; ;;").expect("seed file");

    assert!(store.read().is_err());
    assert!(store.current().is_none());
}

#[test]
fn file_store_expired_cookie_reads_as_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileCredentialStore::new(dir.path().join("session"));
    store.write(&Credential::issue("T", 60, at(1_000))).expect("write");
    assert!(store.current().is_none());
}
