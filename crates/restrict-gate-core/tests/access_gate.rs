// crates/restrict-gate-core/tests/access_gate.rs
// ============================================================================
// Module: Access Gate Tests
// Description: Validate rendering actions for allowed and denied content.
// Purpose: Ensure deny treatment follows the redirect and message settings.
// Dependencies: restrict-gate-core
// ============================================================================

//! Access gate rendering behavior tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

use restrict_gate_core::AccessDecision;
use restrict_gate_core::AccessGate;
use restrict_gate_core::Action;
use restrict_gate_core::ContentItem;
use restrict_gate_core::Locale;
use restrict_gate_core::PermissionCatalog;
use restrict_gate_core::PermissionEvaluator;
use restrict_gate_core::RequestContext;
use restrict_gate_core::Settings;
use restrict_gate_core::User;

const DEFAULT_MESSAGE: &str =
    "Sorry, this content is restricted to users who are logged in with the correct permissions.";

fn resolve(content: &ContentItem, user: &User, settings: &Settings) -> Action {
    let catalog = PermissionCatalog::from_tags(["editor", "viewer"]);
    let gate = AccessGate::new(PermissionEvaluator::new(&catalog), settings);
    gate.resolve(content, user, &RequestContext::front_end("/members/handbook"))
}

fn viewer_only() -> User {
    User::authenticated(7).with_grants([("editor", false), ("viewer", true)])
}

#[test]
fn allowed_content_is_served() {
    let content = ContentItem::new(1, ["editor"]);
    let user = User::authenticated(7).with_grants([("editor", true)]);
    assert_eq!(resolve(&content, &user, &Settings::default()), Action::ServeContent);
}

#[test]
fn denied_content_substitutes_default_message_when_custom_is_empty() {
    let content = ContentItem::new(1, ["editor"]);
    let settings = Settings {
        custom_message: Some(String::new()),
        ..Settings::default()
    };
    assert_eq!(
        resolve(&content, &viewer_only(), &settings),
        Action::SubstituteMessage(DEFAULT_MESSAGE.to_string())
    );
}

#[test]
fn denied_content_substitutes_default_message_without_settings() {
    let content = ContentItem::new(1, ["editor"]);
    assert_eq!(
        resolve(&content, &User::anonymous(), &Settings::default()),
        Action::SubstituteMessage(DEFAULT_MESSAGE.to_string())
    );
}

#[test]
fn denied_content_uses_custom_message() {
    let content = ContentItem::new(1, ["editor"]);
    let settings = Settings {
        custom_message: Some("Members only.".to_string()),
        ..Settings::default()
    };
    assert_eq!(
        resolve(&content, &viewer_only(), &settings),
        Action::SubstituteMessage("Members only.".to_string())
    );
}

#[test]
fn denied_content_redirects_to_login_with_return_path() {
    let content = ContentItem::new(1, ["editor"]);
    let settings = Settings {
        redirect_on_deny: true,
        ..Settings::default()
    };
    assert_eq!(
        resolve(&content, &viewer_only(), &settings),
        Action::RedirectTo("/wp-login.php?redirect_to=%2Fmembers%2Fhandbook".to_string())
    );
}

#[test]
fn redirect_takes_precedence_over_custom_message() {
    let content = ContentItem::new(1, ["editor"]);
    let settings = Settings {
        custom_message: Some("Members only.".to_string()),
        redirect_on_deny: true,
        login_path: "/account/login?theme=dark".to_string(),
        return_param: "next".to_string(),
        locale: Locale::En,
    };
    assert_eq!(
        resolve(&content, &User::anonymous(), &settings),
        Action::RedirectTo("/account/login?theme=dark&next=%2Fmembers%2Fhandbook".to_string())
    );
}

#[test]
fn login_path_ending_in_a_separator_is_not_given_another() {
    let content = ContentItem::new(1, ["editor"]);
    for (login_path, expected) in [
        ("/login?", "/login?redirect_to=%2Fmembers%2Fhandbook"),
        ("/login?lang=ca&", "/login?lang=ca&redirect_to=%2Fmembers%2Fhandbook"),
    ] {
        let settings = Settings {
            redirect_on_deny: true,
            login_path: login_path.to_string(),
            ..Settings::default()
        };
        assert_eq!(
            resolve(&content, &User::anonymous(), &settings),
            Action::RedirectTo(expected.to_string())
        );
    }
}

#[test]
fn default_message_is_localized() {
    let content = ContentItem::new(1, ["editor"]);
    let settings = Settings {
        locale: Locale::Ca,
        ..Settings::default()
    };
    match resolve(&content, &User::anonymous(), &settings) {
        Action::SubstituteMessage(message) => assert!(message.starts_with("Ho sentim")),
        other => panic!("unexpected action {other:?}"),
    }
}

#[test]
fn unrestricted_content_is_served_even_with_redirect_enabled() {
    let content = ContentItem::unrestricted(2);
    let settings = Settings {
        redirect_on_deny: true,
        ..Settings::default()
    };
    assert_eq!(resolve(&content, &User::anonymous(), &settings), Action::ServeContent);
}

#[test]
fn substitution_leaves_content_untouched() {
    let content = ContentItem::new(1, ["editor"]);
    let before = content.clone();
    let _ = resolve(&content, &viewer_only(), &Settings::default());
    assert_eq!(content, before);
}

#[test]
fn action_for_maps_allow_to_serve() {
    let catalog = PermissionCatalog::default();
    let settings = Settings::default();
    let gate = AccessGate::new(PermissionEvaluator::new(&catalog), &settings);
    assert_eq!(
        gate.action_for(AccessDecision::Allow, &RequestContext::default()),
        Action::ServeContent
    );
}
