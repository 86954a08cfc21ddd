// crates/restrict-gate-core/src/runtime/search_filter.rs
// ============================================================================
// Module: Restrict Gate Search Filter
// Description: Exclusion-set computation for listing and search queries.
// Purpose: Hide restricted content from search results without reentrancy.
// Dependencies: crate::core, crate::interfaces, crate::runtime::evaluator
// ============================================================================

//! ## Overview
//! The search filter runs inside the host's query-modification hook. It lists
//! candidate content, re-reads each candidate's tags, evaluates every
//! candidate with the same evaluator used for rendering, and asks the host to
//! exclude the denied ids.
//!
//! Candidate lookups run queries of their own, which can re-trigger the same
//! hook. A scoped [`FilterGuard`] marks the filter active for the duration of
//! a run; nested invocations observe the flag and return
//! [`FilterOutcome::Suppressed`] without doing any work. The guard is released
//! on every exit path, including store failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::Cell;
use std::collections::BTreeSet;

use crate::core::AccessDecision;
use crate::core::ContentId;
use crate::core::ContentItem;
use crate::core::QueryContext;
use crate::core::User;
use crate::interfaces::ContentStore;
use crate::interfaces::QueryModifier;
use crate::interfaces::StoreError;
use crate::runtime::evaluator::PermissionEvaluator;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Content type restricted by default.
pub const DEFAULT_RESTRICTED_CONTENT_TYPE: &str = "page";

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of one search filter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The query is outside the filter's scope; nothing was evaluated.
    NotApplicable,
    /// A filter run was already in progress; this nested call did nothing.
    Suppressed,
    /// Candidates were evaluated; the ids listed were excluded (possibly none).
    Applied(BTreeSet<ContentId>),
}

// ============================================================================
// SECTION: Search Filter
// ============================================================================

/// Request-scoped search filter with a reentrancy flag.
#[derive(Debug)]
pub struct SearchFilter {
    /// Content type whose listings are filtered.
    content_type: String,
    /// True while a filter run is in progress.
    active: Cell<bool>,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self::new(DEFAULT_RESTRICTED_CONTENT_TYPE)
    }
}

impl SearchFilter {
    /// Creates a filter for listings of `content_type`.
    #[must_use]
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            active: Cell::new(false),
        }
    }

    /// Returns the filtered content type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns true while a filter run is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Returns true when `query` falls within the filter's scope.
    ///
    /// Only search queries that may return the filtered content type are
    /// narrowed, and only on front-end requests or API requests carrying a
    /// search term.
    #[must_use]
    pub fn applies_to(&self, query: &QueryContext) -> bool {
        if !query.is_search || !query.targets(&self.content_type) {
            return false;
        }
        !query.is_admin || (query.is_rest_request && query.search_term.is_some())
    }

    /// Runs the filter for `query` and applies exclusions through `modifier`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when a content lookup fails; no exclusions are
    /// applied in that case and the reentrancy flag is released.
    pub fn run<C, M>(
        &self,
        query: &QueryContext,
        store: &C,
        user: &User,
        evaluator: &PermissionEvaluator<'_>,
        modifier: &mut M,
    ) -> Result<FilterOutcome, StoreError>
    where
        C: ContentStore + ?Sized,
        M: QueryModifier + ?Sized,
    {
        if !self.applies_to(query) {
            return Ok(FilterOutcome::NotApplicable);
        }
        let Some(guard) = self.acquire() else {
            return Ok(FilterOutcome::Suppressed);
        };
        let mut candidates = Vec::new();
        for candidate in store.list_candidates(query)? {
            candidates.push(store.content(candidate.id)?);
        }
        let excluded = compute_excluded_ids(&candidates, user, evaluator);
        drop(guard);

        if !excluded.is_empty() {
            modifier.exclude_ids(&excluded);
        }
        Ok(FilterOutcome::Applied(excluded))
    }

    /// Marks the filter active, or returns `None` if it already is.
    fn acquire(&self) -> Option<FilterGuard<'_>> {
        if self.active.replace(true) {
            return None;
        }
        Some(FilterGuard {
            active: &self.active,
        })
    }
}

/// Scoped marker that clears the reentrancy flag when dropped.
#[derive(Debug)]
pub struct FilterGuard<'a> {
    /// Flag owned by the search filter.
    active: &'a Cell<bool>,
}

impl Drop for FilterGuard<'_> {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

// ============================================================================
// SECTION: Exclusion Set
// ============================================================================

/// Returns the ids of candidates the user may not view.
#[must_use]
pub fn compute_excluded_ids(
    candidates: &[ContentItem],
    user: &User,
    evaluator: &PermissionEvaluator<'_>,
) -> BTreeSet<ContentId> {
    candidates
        .iter()
        .filter(|candidate| evaluator.evaluate(candidate, user) == AccessDecision::Deny)
        .map(|candidate| candidate.id)
        .collect()
}
