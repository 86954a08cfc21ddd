// crates/restrict-gate-core/src/core/request.rs
// ============================================================================
// Module: Restrict Gate Request Context
// Description: Settings snapshot and request/query descriptors.
// Purpose: Pass configuration and request shape explicitly into decisions.
// Dependencies: crate::i18n, serde, url
// ============================================================================

//! ## Overview
//! Settings are loaded once per request and passed into the gates explicitly
//! so decision functions stay pure. [`RequestContext`] describes a rendering
//! or API request; [`QueryContext`] describes a listing/search query that the
//! search filter may narrow.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use url::form_urlencoded;

use crate::i18n::DEFAULT_RESTRICTED_MESSAGE_KEY;
use crate::i18n::Locale;
use crate::i18n::translate_in;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default login path used for deny redirects.
pub const DEFAULT_LOGIN_PATH: &str = "/wp-login.php";
/// Default query parameter carrying the return path.
pub const DEFAULT_RETURN_PARAM: &str = "redirect_to";

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Request-scoped restriction settings.
///
/// # Invariants
/// - Absent settings behave as [`Settings::default`]: default message, no redirect.
/// - Immutable for the duration of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Operator-defined restriction message; empty means "use the default".
    #[serde(default)]
    pub custom_message: Option<String>,
    /// Redirect denied viewers to the login page instead of substituting a message.
    #[serde(default)]
    pub redirect_on_deny: bool,
    /// Login path used for deny redirects.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Query parameter name carrying the return path.
    #[serde(default = "default_return_param")]
    pub return_param: String,
    /// Locale for the built-in messages.
    #[serde(default)]
    pub locale: Locale,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            custom_message: None,
            redirect_on_deny: false,
            login_path: default_login_path(),
            return_param: default_return_param(),
            locale: Locale::En,
        }
    }
}

impl Settings {
    /// Returns the message substituted for restricted content.
    #[must_use]
    pub fn restricted_message(&self) -> String {
        match self.custom_message.as_deref() {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => translate_in(self.locale, DEFAULT_RESTRICTED_MESSAGE_KEY, Vec::new()),
        }
    }

    /// Builds the login URL that returns the viewer to `request_uri`.
    #[must_use]
    pub fn login_redirect_url(&self, request_uri: &str) -> String {
        let separator = if self.login_path.ends_with(['?', '&']) {
            ""
        } else if self.login_path.contains('?') {
            "&"
        } else {
            "?"
        };
        let encoded: String = form_urlencoded::byte_serialize(request_uri.as_bytes()).collect();
        format!("{}{separator}{}={encoded}", self.login_path, self.return_param)
    }
}

/// Serde default for [`Settings::login_path`].
fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

/// Serde default for [`Settings::return_param`].
fn default_return_param() -> String {
    DEFAULT_RETURN_PARAM.to_string()
}

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Inbound request descriptor for rendering and API calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Request path and query, used as the login return path.
    #[serde(default)]
    pub request_uri: String,
    /// Whether the request originates from an administrative context.
    #[serde(default)]
    pub is_admin: bool,
}

impl RequestContext {
    /// Creates a front-end request context.
    #[must_use]
    pub fn front_end(request_uri: impl Into<String>) -> Self {
        Self {
            request_uri: request_uri.into(),
            is_admin: false,
        }
    }

    /// Creates an administrative request context.
    #[must_use]
    pub fn admin(request_uri: impl Into<String>) -> Self {
        Self {
            request_uri: request_uri.into(),
            is_admin: true,
        }
    }
}

// ============================================================================
// SECTION: Query Context
// ============================================================================

/// Listing/search query descriptor handed to the query modifier hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    /// Whether the query is a search query.
    #[serde(default)]
    pub is_search: bool,
    /// Content types targeted by the query; empty means unconstrained.
    #[serde(default)]
    pub content_types: Vec<String>,
    /// Whether the query runs in an administrative context.
    #[serde(default)]
    pub is_admin: bool,
    /// Whether the query serves an API request.
    #[serde(default)]
    pub is_rest_request: bool,
    /// Search term when one was supplied.
    #[serde(default)]
    pub search_term: Option<String>,
}

impl QueryContext {
    /// Creates a front-end search query over any content type.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            is_search: true,
            search_term: Some(term.into()),
            ..Self::default()
        }
    }

    /// Restricts the query to the given content types.
    #[must_use]
    pub fn with_content_types<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.content_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true when the query may return items of `content_type`.
    #[must_use]
    pub fn targets(&self, content_type: &str) -> bool {
        self.content_types.is_empty() || self.content_types.iter().any(|t| t == content_type)
    }
}
