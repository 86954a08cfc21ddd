// crates/restrict-gate-core/src/runtime/engine.rs
// ============================================================================
// Module: Restrict Gate Engine
// Description: Request-scoped orchestration of the three access call sites.
// Purpose: Fetch collaborator data once per request and route every call site
//          through the same evaluator.
// Dependencies: crate::{audit, core, interfaces, runtime}, thiserror
// ============================================================================

//! ## Overview
//! [`RestrictEngine`] is created per inbound request. Each entry point
//! re-reads the catalog and settings from the collaborator stores, evaluates
//! through the shared [`PermissionEvaluator`], records an audit event, and
//! returns the outcome. Store failures propagate unchanged as
//! [`EngineError::Store`]; they never turn into an allow or a deny.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::audit::AccessAuditEvent;
use crate::audit::AccessAuditEventParams;
use crate::audit::AccessAuditSink;
use crate::audit::CallSite;
use crate::core::Action;
use crate::core::ContentId;
use crate::core::QueryContext;
use crate::core::RequestContext;
use crate::interfaces::ContentStore;
use crate::interfaces::QueryModifier;
use crate::interfaces::ResponseSink;
use crate::interfaces::SettingsStore;
use crate::interfaces::StoreError;
use crate::interfaces::TagStore;
use crate::interfaces::UserStore;
use crate::runtime::access_gate::AccessGate;
use crate::runtime::catalog::PermissionCatalog;
use crate::runtime::evaluator::PermissionEvaluator;
use crate::runtime::rest_gate::RestGate;
use crate::runtime::rest_gate::RestOutcome;
use crate::runtime::search_filter::DEFAULT_RESTRICTED_CONTENT_TYPE;
use crate::runtime::search_filter::FilterOutcome;
use crate::runtime::search_filter::SearchFilter;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Engine configuration that is not owned by the settings store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictEngineConfig {
    /// Content type narrowed by the search filter.
    pub restricted_content_type: String,
}

impl Default for RestrictEngineConfig {
    fn default() -> Self {
        Self {
            restricted_content_type: DEFAULT_RESTRICTED_CONTENT_TYPE.to_string(),
        }
    }
}

/// Collaborator stores consulted by the engine.
pub struct Collaborators<'a, C: ?Sized, U: ?Sized, T: ?Sized, S: ?Sized> {
    /// Content store.
    pub content: &'a C,
    /// User/session store.
    pub users: &'a U,
    /// Permission tag store.
    pub tags: &'a T,
    /// Settings store.
    pub settings: &'a S,
}

impl<'a, H> Collaborators<'a, H, H, H, H>
where
    H: ContentStore + UserStore + TagStore + SettingsStore + ?Sized,
{
    /// Uses one host object for every collaborator role.
    #[must_use]
    pub const fn single(host: &'a H) -> Self {
        Self {
            content: host,
            users: host,
            tags: host,
            settings: host,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A collaborator store failed; the failure is surfaced as-is.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Request-scoped access engine.
pub struct RestrictEngine<'a, C: ?Sized, U: ?Sized, T: ?Sized, S: ?Sized, A> {
    /// Collaborator stores.
    stores: Collaborators<'a, C, U, T, S>,
    /// Search filter holding the request's reentrancy flag.
    search_filter: SearchFilter,
    /// Audit sink for decisions.
    audit: A,
}

impl<'a, C, U, T, S, A> RestrictEngine<'a, C, U, T, S, A>
where
    C: ContentStore + ?Sized,
    U: UserStore + ?Sized,
    T: TagStore + ?Sized,
    S: SettingsStore + ?Sized,
    A: AccessAuditSink,
{
    /// Creates an engine for one request.
    #[must_use]
    pub fn new(
        stores: Collaborators<'a, C, U, T, S>,
        config: &RestrictEngineConfig,
        audit: A,
    ) -> Self {
        Self {
            stores,
            search_filter: SearchFilter::new(config.restricted_content_type.clone()),
            audit,
        }
    }

    /// Returns the request's search filter.
    #[must_use]
    pub const fn search_filter(&self) -> &SearchFilter {
        &self.search_filter
    }

    /// Decides how to render `content_id` for the current user.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when a collaborator store fails.
    pub fn render(
        &self,
        content_id: ContentId,
        request: &RequestContext,
    ) -> Result<Action, EngineError> {
        let catalog = PermissionCatalog::load(self.stores.tags)?;
        let settings = self.stores.settings.load_settings()?;
        let content = self.stores.content.content(content_id)?;
        let user = self.stores.users.current_user()?;

        let gate = AccessGate::new(PermissionEvaluator::new(&catalog), &settings);
        let action = gate.resolve(&content, &user, request);
        let outcome = if action == Action::ServeContent { "allow" } else { "deny" };
        self.audit.record(&AccessAuditEvent::new(AccessAuditEventParams {
            call_site: CallSite::Render,
            content_id: Some(content_id),
            user_id: user.id,
            outcome,
            action: Some(action.as_str()),
            catalog_size: catalog.len(),
            excluded_count: None,
        }));
        Ok(action)
    }

    /// Renders `content_id` and hands the action to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when a collaborator store fails; the sink is
    /// not called in that case.
    pub fn render_to<R: ResponseSink + ?Sized>(
        &self,
        content_id: ContentId,
        request: &RequestContext,
        sink: &mut R,
    ) -> Result<Action, EngineError> {
        let action = self.render(content_id, request)?;
        sink.realize(&action);
        Ok(action)
    }

    /// Runs the search filter for `query`, excluding denied ids via `modifier`.
    ///
    /// Out-of-scope queries and nested invocations return without touching
    /// any store.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when a collaborator store fails.
    pub fn filter_query<M: QueryModifier + ?Sized>(
        &self,
        query: &QueryContext,
        modifier: &mut M,
    ) -> Result<FilterOutcome, EngineError> {
        if !self.search_filter.applies_to(query) {
            return Ok(FilterOutcome::NotApplicable);
        }
        if self.search_filter.is_active() {
            return Ok(FilterOutcome::Suppressed);
        }
        let catalog = PermissionCatalog::load(self.stores.tags)?;
        let user = self.stores.users.current_user()?;
        let evaluator = PermissionEvaluator::new(&catalog);
        let outcome =
            self.search_filter.run(query, self.stores.content, &user, &evaluator, modifier)?;
        if let FilterOutcome::Applied(excluded) = &outcome {
            self.audit.record(&AccessAuditEvent::new(AccessAuditEventParams {
                call_site: CallSite::Search,
                content_id: None,
                user_id: user.id,
                outcome: "applied",
                action: None,
                catalog_size: catalog.len(),
                excluded_count: Some(excluded.len()),
            }));
        }
        Ok(outcome)
    }

    /// Enforces API access to `content_id` for the current user.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when a collaborator store fails.
    pub fn enforce_rest(
        &self,
        content_id: ContentId,
        request: &RequestContext,
    ) -> Result<RestOutcome, EngineError> {
        let settings = self.stores.settings.load_settings()?;
        let content = self.stores.content.content(content_id)?;
        let user = self.stores.users.current_user()?;

        let outcome = RestGate::new(settings.locale).respond(&content, &user, request.is_admin);
        let label = match outcome {
            RestOutcome::Allow => "allow",
            RestOutcome::Deny(_) => "deny",
        };
        self.audit.record(&AccessAuditEvent::new(AccessAuditEventParams {
            call_site: CallSite::Rest,
            content_id: Some(content_id),
            user_id: user.id,
            outcome: label,
            action: None,
            catalog_size: 0,
            excluded_count: None,
        }));
        Ok(outcome)
    }

    /// Enforces API access and hands any denial to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when a collaborator store fails.
    pub fn respond_rest<R: ResponseSink + ?Sized>(
        &self,
        content_id: ContentId,
        request: &RequestContext,
        sink: &mut R,
    ) -> Result<RestOutcome, EngineError> {
        let outcome = self.enforce_rest(content_id, request)?;
        if let RestOutcome::Deny(denial) = &outcome {
            sink.reject(denial);
        }
        Ok(outcome)
    }
}
