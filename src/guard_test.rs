use super::*;

fn redirect(target: &str) -> GuardAction {
    GuardAction::Redirect(target.to_owned())
}

// =============================================================================
// classify
// =============================================================================

#[test]
fn classify_root() {
    assert_eq!(classify("/"), PathClass::Root);
    assert_eq!(classify(""), PathClass::Root);
}

#[test]
fn classify_login_and_sub_paths_are_public() {
    assert_eq!(classify("/login"), PathClass::Public);
    assert_eq!(classify("/login/"), PathClass::Public);
    assert_eq!(classify("/login/reset"), PathClass::Public);
}

#[test]
fn classify_login_lookalike_is_protected() {
    assert_eq!(classify("/loginx"), PathClass::Protected);
}

#[test]
fn classify_static_and_api_are_excluded() {
    for path in ["/_next/static/chunk.js", "/_next/image", "/_next/x.js", "/api", "/api/admin/stats", "/favicon.ico", "/healthz"] {
        assert_eq!(classify(path), PathClass::Excluded, "{path}");
    }
}

#[test]
fn classify_api_keys_page_is_protected() {
    assert_eq!(classify("/api-keys"), PathClass::Protected);
}

#[test]
fn classify_dashboard_pages_are_protected() {
    for path in ["/dashboard", "/domains", "/emails", "/emails/a@b.test", "/settings"] {
        assert_eq!(classify(path), PathClass::Protected, "{path}");
    }
}

// =============================================================================
// evaluate: one row per test
// =============================================================================

#[test]
fn public_with_credential_redirects_to_dashboard() {
    assert_eq!(evaluate("/login", true), redirect("/dashboard"));
}

#[test]
fn public_without_credential_is_allowed() {
    assert_eq!(evaluate("/login", false), GuardAction::Allow);
}

#[test]
fn root_with_credential_redirects_to_dashboard() {
    assert_eq!(evaluate("/", true), redirect("/dashboard"));
}

#[test]
fn root_without_credential_redirects_to_login() {
    assert_eq!(evaluate("/", false), redirect("/login"));
}

#[test]
fn settings_page_is_protected() {
    assert_eq!(classify("/settings"), PathClass::Protected);
    assert_eq!(evaluate("/settings", false), redirect("/login?redirect=/settings"));
}

#[test]
fn protected_with_credential_is_allowed() {
    assert_eq!(evaluate("/domains", true), GuardAction::Allow);
}

#[test]
fn protected_without_credential_redirects_with_return_target() {
    assert_eq!(evaluate("/domains", false), redirect("/login?redirect=/domains"));
}

#[test]
fn excluded_is_allowed_either_way() {
    assert_eq!(evaluate("/_next/x.js", false), GuardAction::Allow);
    assert_eq!(evaluate("/_next/x.js", true), GuardAction::Allow);
    assert_eq!(evaluate("/favicon.ico", false), GuardAction::Allow);
}

// =============================================================================
// return target escaping
// =============================================================================

#[test]
fn return_target_keeps_nested_path_readable() {
    assert_eq!(evaluate("/emails/user@mail.test", false), redirect("/login?redirect=/emails/user@mail.test"));
}

#[test]
fn return_target_escapes_query_breaking_characters() {
    assert_eq!(login_with_return_target("/a b&c=d#e?f%"), "/login?redirect=/a%20b%26c%3Dd%23e%3Ff%25");
}

#[test]
fn return_target_escapes_non_ascii_bytes() {
    assert_eq!(login_with_return_target("/é"), "/login?redirect=/%C3%A9");
}
