// crates/restrict-gate-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Restrict Gate Permission Evaluator
// Description: Tag-intersection access decisions for one content item and user.
// Purpose: Provide the single decision function shared by rendering and search.
// Dependencies: crate::core, crate::runtime::catalog
// ============================================================================

//! ## Overview
//! A user may view restricted content when at least one of the content's
//! required tags is both defined in the catalog and explicitly granted to the
//! user. The decision is a pure function of the required tags, the user's
//! grants and authentication state, and the request's catalog.
//!
//! ## Invariants
//! - No required tags: always [`AccessDecision::Allow`].
//! - Anonymous users facing restricted content: always [`AccessDecision::Deny`];
//!   grants are not consulted.
//! - Duplicate or reordered required tags never change the outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::AccessDecision;
use crate::core::ContentItem;
use crate::core::PermissionTag;
use crate::core::User;
use crate::runtime::catalog::PermissionCatalog;

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Evaluates content items against users using one request's catalog.
#[derive(Debug, Clone, Copy)]
pub struct PermissionEvaluator<'a> {
    /// Catalog loaded for the current request.
    catalog: &'a PermissionCatalog,
}

impl<'a> PermissionEvaluator<'a> {
    /// Creates an evaluator bound to a request catalog.
    #[must_use]
    pub const fn new(catalog: &'a PermissionCatalog) -> Self {
        Self {
            catalog,
        }
    }

    /// Returns the catalog used by this evaluator.
    #[must_use]
    pub const fn catalog(&self) -> &'a PermissionCatalog {
        self.catalog
    }

    /// Decides whether `user` may view `content`.
    #[must_use]
    pub fn evaluate(&self, content: &ContentItem, user: &User) -> AccessDecision {
        self.evaluate_tags(&content.required_tags, user)
    }

    /// Decides access for a raw list of required tags.
    #[must_use]
    pub fn evaluate_tags(&self, required: &[PermissionTag], user: &User) -> AccessDecision {
        if required.is_empty() {
            return AccessDecision::Allow;
        }
        if !user.is_authenticated() {
            return AccessDecision::Deny;
        }
        let granted = self.granted_tags(user);
        if required.iter().any(|tag| granted.contains(tag)) {
            AccessDecision::Allow
        } else {
            AccessDecision::Deny
        }
    }

    /// Returns the catalog tags explicitly granted to `user`.
    ///
    /// Anonymous users hold no tags.
    #[must_use]
    pub fn granted_tags(&self, user: &User) -> BTreeSet<&'a PermissionTag> {
        if !user.is_authenticated() {
            return BTreeSet::new();
        }
        self.catalog.tags().iter().filter(|tag| user.is_granted(tag)).collect()
    }
}

/// Decides whether `user` may view `content` under `catalog`.
#[must_use]
pub fn evaluate(content: &ContentItem, user: &User, catalog: &PermissionCatalog) -> AccessDecision {
    PermissionEvaluator::new(catalog).evaluate(content, user)
}
