// crates/restrict-gate-config/tests/sections.rs
// ============================================================================
// Module: Config Section Tests
// Description: Validate access, search, and audit section semantics.
// Purpose: Ensure parsed configuration maps onto engine settings correctly.
// Dependencies: restrict-gate-config, restrict-gate-core, tempfile
// ============================================================================

//! Configuration section validation tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use restrict_gate_config::AuditConfig;
use restrict_gate_config::AuditMode;
use restrict_gate_config::ConfigSettingsStore;
use restrict_gate_config::RestrictGateConfig;
use restrict_gate_core::AccessAuditSink;
use restrict_gate_core::CallSite;
use restrict_gate_core::Locale;
use restrict_gate_core::SettingsStore;
use restrict_gate_core::UserId;
use restrict_gate_core::audit::AccessAuditEvent;
use restrict_gate_core::audit::AccessAuditEventParams;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn invalid(toml: &str) -> String {
    RestrictGateConfig::from_toml_str(toml).unwrap_err().to_string()
}

// ============================================================================
// SECTION: Access
// ============================================================================

#[test]
fn access_section_maps_onto_settings() -> TestResult {
    let config = RestrictGateConfig::from_toml_str(
        r#"
[access]
custom_message = "Members only."
redirect_on_deny = true
login_path = "/account/login"
return_param = "next"
locale = "ca"
"#,
    )?;
    let settings = config.settings();
    assert_eq!(settings.custom_message.as_deref(), Some("Members only."));
    assert!(settings.redirect_on_deny);
    assert_eq!(settings.locale, Locale::Ca);
    assert_eq!(settings.login_redirect_url("/docs"), "/account/login?next=%2Fdocs");
    Ok(())
}

#[test]
fn defaults_match_engine_defaults() {
    let config = RestrictGateConfig::default();
    assert_eq!(config.settings(), restrict_gate_core::Settings::default());
    assert_eq!(config.engine_config(), restrict_gate_core::RestrictEngineConfig::default());
}

#[test]
fn access_rejects_relative_login_path() {
    let message = invalid("[access]\nlogin_path = \"wp-login.php\"\n");
    assert!(message.contains("access.login_path must be absolute"), "{message}");
}

#[test]
fn access_rejects_login_path_with_whitespace() {
    let message = invalid("[access]\nlogin_path = \"/log in\"\n");
    assert!(message.contains("whitespace"), "{message}");
}

#[test]
fn access_rejects_bad_return_param() {
    let message = invalid("[access]\nreturn_param = \"Redirect To\"\n");
    assert!(message.contains("access.return_param"), "{message}");
}

#[test]
fn access_rejects_oversized_message() {
    let toml = format!("[access]\ncustom_message = \"{}\"\n", "x".repeat(4097));
    assert!(invalid(&toml).contains("access.custom_message exceeds"));
}

#[test]
fn access_rejects_unknown_locale() {
    assert!(invalid("[access]\nlocale = \"fr\"\n").contains("config parse error"));
}

// ============================================================================
// SECTION: Search
// ============================================================================

#[test]
fn search_section_sets_content_type() -> TestResult {
    let config = RestrictGateConfig::from_toml_str("[search]\ncontent_type = \"doc\"\n")?;
    assert_eq!(config.engine_config().restricted_content_type, "doc");
    Ok(())
}

#[test]
fn search_rejects_empty_content_type() {
    assert!(invalid("[search]\ncontent_type = \"\"\n").contains("search.content_type must be"));
}

// ============================================================================
// SECTION: Audit
// ============================================================================

#[test]
fn audit_file_mode_requires_path() {
    assert!(invalid("[audit]\nmode = \"file\"\n").contains("audit.path is required"));
}

#[test]
fn audit_path_requires_file_mode() {
    assert!(invalid("[audit]\nmode = \"stderr\"\npath = \"a.log\"\n").contains("only valid"));
}

#[test]
fn audit_file_sink_writes_events() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("audit.log");
    let audit = AuditConfig {
        mode: AuditMode::File,
        path: Some(path.to_string_lossy().into_owned()),
    };
    let sink = audit.build_sink()?;
    sink.record(&AccessAuditEvent::new(AccessAuditEventParams {
        call_site: CallSite::Search,
        content_id: None,
        user_id: UserId::ANONYMOUS,
        outcome: "applied",
        action: None,
        catalog_size: 2,
        excluded_count: Some(1),
    }));
    let contents = std::fs::read_to_string(&path)?;
    assert!(contents.contains("\"call_site\":\"search\""));
    assert!(contents.contains("\"excluded_count\":1"));
    Ok(())
}

#[test]
fn audit_file_sink_reports_unopenable_path() -> TestResult {
    let dir = tempfile::tempdir()?;
    let audit = AuditConfig {
        mode: AuditMode::File,
        path: Some(dir.path().join("missing").join("audit.log").to_string_lossy().into_owned()),
    };
    let err = audit.build_sink().err().expect("expected an io error");
    assert!(err.to_string().starts_with("config io error"));
    Ok(())
}

// ============================================================================
// SECTION: Settings Store
// ============================================================================

#[test]
fn config_settings_store_serves_configured_values() -> TestResult {
    let config = RestrictGateConfig::from_toml_str(
        "[access]\ncustom_message = \"Hidden\"\nredirect_on_deny = true\n",
    )?;
    let store = ConfigSettingsStore::new(&config);
    assert_eq!(store.custom_message()?.as_deref(), Some("Hidden"));
    assert!(store.redirect_on_deny()?);
    assert_eq!(store.load_settings()?, config.settings());
    Ok(())
}
