// crates/restrict-gate-core/src/runtime/access_gate.rs
// ============================================================================
// Module: Restrict Gate Access Gate
// Description: Maps evaluator decisions to rendering actions.
// Purpose: Apply the configured deny treatment for direct content rendering.
// Dependencies: crate::core, crate::runtime::evaluator
// ============================================================================

//! ## Overview
//! The access gate serves allowed content unchanged. Denied content is either
//! redirected to the login page (returning to the current request) or
//! replaced, for this response only, by the configured or default
//! restriction message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::AccessDecision;
use crate::core::Action;
use crate::core::ContentItem;
use crate::core::RequestContext;
use crate::core::Settings;
use crate::core::User;
use crate::runtime::evaluator::PermissionEvaluator;

// ============================================================================
// SECTION: Access Gate
// ============================================================================

/// Rendering gate combining an evaluator with request settings.
#[derive(Debug, Clone, Copy)]
pub struct AccessGate<'a> {
    /// Evaluator bound to the request catalog.
    evaluator: PermissionEvaluator<'a>,
    /// Settings snapshot for the request.
    settings: &'a Settings,
}

impl<'a> AccessGate<'a> {
    /// Creates an access gate.
    #[must_use]
    pub const fn new(evaluator: PermissionEvaluator<'a>, settings: &'a Settings) -> Self {
        Self {
            evaluator,
            settings,
        }
    }

    /// Chooses the rendering action for `content` viewed by `user`.
    #[must_use]
    pub fn resolve(&self, content: &ContentItem, user: &User, request: &RequestContext) -> Action {
        let decision = self.evaluator.evaluate(content, user);
        self.action_for(decision, request)
    }

    /// Maps a decision to the configured action.
    #[must_use]
    pub fn action_for(&self, decision: AccessDecision, request: &RequestContext) -> Action {
        match decision {
            AccessDecision::Allow => Action::ServeContent,
            AccessDecision::Deny if self.settings.redirect_on_deny => {
                Action::RedirectTo(self.settings.login_redirect_url(&request.request_uri))
            }
            AccessDecision::Deny => Action::SubstituteMessage(self.settings.restricted_message()),
        }
    }
}
