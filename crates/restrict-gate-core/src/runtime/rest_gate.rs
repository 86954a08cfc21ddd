// crates/restrict-gate-core/src/runtime/rest_gate.rs
// ============================================================================
// Module: Restrict Gate API Enforcement
// Description: Capability-based enforcement for API responses.
// Purpose: Deny restricted content to API callers lacking the editing capability.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! API enforcement is coarser than rendering: administrative contexts and
//! callers holding the editing capability see everything, unrestricted
//! content is always served, and everything else is denied with a 403 error
//! envelope.
//!
//! Per-tag matching is not applied here. This differs from the rendering and
//! search paths and is kept as-is until per-tag API checks are specified.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::AccessDecision;
use crate::core::ContentItem;
use crate::core::RestDenial;
use crate::core::User;
use crate::i18n::Locale;

// ============================================================================
// SECTION: Rest Gate
// ============================================================================

/// API response gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestGate {
    /// Locale for the denial message.
    locale: Locale,
}

/// Outcome of API enforcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestOutcome {
    /// Serve the API response unchanged.
    Allow,
    /// Replace the response with a structured denial.
    Deny(RestDenial),
}

impl RestGate {
    /// Creates a gate that localizes denials in `locale`.
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self {
            locale,
        }
    }

    /// Decides whether the API response for `content` may be returned.
    #[must_use]
    pub fn enforce(&self, content: &ContentItem, user: &User, is_admin: bool) -> AccessDecision {
        if is_admin || !content.is_restricted() || user.can_edit_content {
            AccessDecision::Allow
        } else {
            AccessDecision::Deny
        }
    }

    /// Enforces and translates a deny into a structured denial.
    #[must_use]
    pub fn respond(&self, content: &ContentItem, user: &User, is_admin: bool) -> RestOutcome {
        match self.enforce(content, user, is_admin) {
            AccessDecision::Allow => RestOutcome::Allow,
            AccessDecision::Deny => RestOutcome::Deny(RestDenial::restricted(self.locale)),
        }
    }
}
