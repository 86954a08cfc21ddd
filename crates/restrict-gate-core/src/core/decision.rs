// crates/restrict-gate-core/src/core/decision.rs
// ============================================================================
// Module: Restrict Gate Decisions
// Description: Access decisions, rendering actions, and API denial envelopes.
// Purpose: Provide the stable outcome types shared by all call sites.
// Dependencies: crate::i18n, serde, serde_json
// ============================================================================

//! ## Overview
//! An [`AccessDecision`] is the pure output of evaluation. Rendering maps it to
//! an [`Action`]; API enforcement maps a deny to a [`RestDenial`] carrying an
//! HTTP status and a JSON error envelope.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::i18n::Locale;
use crate::i18n::REST_DENIED_MESSAGE_KEY;
use crate::i18n::translate_in;

// ============================================================================
// SECTION: Decisions
// ============================================================================

/// Allow/deny outcome of evaluating one content item for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    /// The viewer may see the content.
    Allow,
    /// The viewer may not see the content.
    Deny,
}

impl AccessDecision {
    /// Returns true for [`AccessDecision::Allow`].
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns a stable label for audit logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Externally visible treatment chosen for a rendering request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Action {
    /// Render the content unchanged.
    ServeContent,
    /// Redirect the viewer to the given URL.
    RedirectTo(String),
    /// Render the given text instead of the content body.
    SubstituteMessage(String),
}

impl Action {
    /// Returns a stable label for audit logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ServeContent => "serve_content",
            Self::RedirectTo(_) => "redirect_to",
            Self::SubstituteMessage(_) => "substitute_message",
        }
    }
}

// ============================================================================
// SECTION: API Denials
// ============================================================================

/// HTTP status used for API denials.
pub const REST_DENIED_STATUS: u16 = 403;

/// JSON error envelope returned to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestErrorBody {
    /// Always `false` for error envelopes.
    pub success: bool,
    /// Human-readable denial message.
    pub data: String,
}

/// Structured API denial: status code plus error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestDenial {
    /// HTTP status code.
    pub status: u16,
    /// JSON error body.
    pub body: RestErrorBody,
}

impl RestDenial {
    /// Builds the restricted-content denial in the given locale.
    #[must_use]
    pub fn restricted(locale: Locale) -> Self {
        Self {
            status: REST_DENIED_STATUS,
            body: RestErrorBody {
                success: false,
                data: translate_in(locale, REST_DENIED_MESSAGE_KEY, Vec::new()),
            },
        }
    }

    /// Serializes the error envelope as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.body)
    }
}
