// crates/restrict-gate-core/tests/search_filter.rs
// ============================================================================
// Module: Search Filter Tests
// Description: Validate exclusion sets, hook scope, and reentrancy protection.
// Purpose: Ensure search listings hide denied content without recursing.
// Dependencies: restrict-gate-core
// ============================================================================

//! Search filter behavior tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::BTreeSet;

use restrict_gate_core::ContentId;
use restrict_gate_core::ContentItem;
use restrict_gate_core::ContentStore;
use restrict_gate_core::FilterOutcome;
use restrict_gate_core::PermissionCatalog;
use restrict_gate_core::PermissionEvaluator;
use restrict_gate_core::PermissionTag;
use restrict_gate_core::QueryContext;
use restrict_gate_core::QueryModifier;
use restrict_gate_core::SearchFilter;
use restrict_gate_core::StoreError;
use restrict_gate_core::User;
use restrict_gate_core::runtime::compute_excluded_ids;

// ============================================================================
// SECTION: Helpers
// ============================================================================

#[derive(Default)]
struct RecordingModifier {
    calls: Vec<BTreeSet<ContentId>>,
}

impl QueryModifier for RecordingModifier {
    fn exclude_ids(&mut self, ids: &BTreeSet<ContentId>) {
        self.calls.push(ids.clone());
    }
}

struct StaticContent {
    items: Vec<ContentItem>,
}

impl ContentStore for StaticContent {
    fn required_tags(&self, content_id: ContentId) -> Result<Vec<PermissionTag>, StoreError> {
        self.items
            .iter()
            .find(|item| item.id == content_id)
            .map(|item| item.required_tags.clone())
            .ok_or_else(|| StoreError::NotFound(content_id.to_string()))
    }

    fn list_candidates(&self, _query: &QueryContext) -> Result<Vec<ContentItem>, StoreError> {
        Ok(self.items.clone())
    }
}

/// Content store whose tag lookups re-trigger the search hook.
struct ReentrantContent<'a> {
    filter: &'a SearchFilter,
    catalog: &'a PermissionCatalog,
    items: Vec<ContentItem>,
    depth: Cell<usize>,
    max_depth: Cell<usize>,
    nested: RefCell<Vec<FilterOutcome>>,
    fail_lookups: bool,
}

impl ContentStore for ReentrantContent<'_> {
    fn required_tags(&self, content_id: ContentId) -> Result<Vec<PermissionTag>, StoreError> {
        let query = QueryContext::search("nested");
        let evaluator = PermissionEvaluator::new(self.catalog);
        let mut modifier = RecordingModifier::default();
        let nested =
            self.filter.run(&query, self, &User::anonymous(), &evaluator, &mut modifier)?;
        self.nested.borrow_mut().push(nested);
        if self.fail_lookups {
            return Err(StoreError::Io("term lookup failed".to_string()));
        }
        self.items
            .iter()
            .find(|item| item.id == content_id)
            .map(|item| item.required_tags.clone())
            .ok_or_else(|| StoreError::NotFound(content_id.to_string()))
    }

    fn list_candidates(&self, _query: &QueryContext) -> Result<Vec<ContentItem>, StoreError> {
        let depth = self.depth.get() + 1;
        self.depth.set(depth);
        self.max_depth.set(self.max_depth.get().max(depth));
        let items = self.items.clone();
        self.depth.set(depth - 1);
        Ok(items)
    }
}

fn scenario_items() -> Vec<ContentItem> {
    vec![ContentItem::new(1, ["editor"]), ContentItem::unrestricted(2)]
}

// ============================================================================
// SECTION: Exclusion Sets
// ============================================================================

#[test]
fn user_without_grants_excludes_restricted_candidate() {
    let catalog = PermissionCatalog::from_tags(["editor"]);
    let evaluator = PermissionEvaluator::new(&catalog);
    let user = User::authenticated(5);
    let excluded = compute_excluded_ids(&scenario_items(), &user, &evaluator);
    assert_eq!(excluded, BTreeSet::from([ContentId::new(1)]));
}

#[test]
fn granted_user_excludes_nothing() {
    let catalog = PermissionCatalog::from_tags(["editor"]);
    let evaluator = PermissionEvaluator::new(&catalog);
    let user = User::authenticated(5).with_grants([("editor", true)]);
    assert!(compute_excluded_ids(&scenario_items(), &user, &evaluator).is_empty());
}

#[test]
fn run_applies_exclusions_through_modifier() -> Result<(), StoreError> {
    let catalog = PermissionCatalog::from_tags(["editor"]);
    let evaluator = PermissionEvaluator::new(&catalog);
    let store = StaticContent {
        items: scenario_items(),
    };
    let filter = SearchFilter::default();
    let mut modifier = RecordingModifier::default();
    let outcome = filter.run(
        &QueryContext::search("handbook"),
        &store,
        &User::anonymous(),
        &evaluator,
        &mut modifier,
    )?;
    let expected = BTreeSet::from([ContentId::new(1)]);
    assert_eq!(outcome, FilterOutcome::Applied(expected.clone()));
    assert_eq!(modifier.calls, vec![expected]);
    assert!(!filter.is_active());
    Ok(())
}

#[test]
fn empty_exclusion_set_leaves_query_untouched() -> Result<(), StoreError> {
    let catalog = PermissionCatalog::from_tags(["editor"]);
    let evaluator = PermissionEvaluator::new(&catalog);
    let store = StaticContent {
        items: vec![ContentItem::unrestricted(2), ContentItem::unrestricted(3)],
    };
    let filter = SearchFilter::default();
    let mut modifier = RecordingModifier::default();
    let outcome = filter.run(
        &QueryContext::search("x"),
        &store,
        &User::anonymous(),
        &evaluator,
        &mut modifier,
    )?;
    assert_eq!(outcome, FilterOutcome::Applied(BTreeSet::new()));
    assert!(modifier.calls.is_empty());
    Ok(())
}

// ============================================================================
// SECTION: Hook Scope
// ============================================================================

#[test]
fn scope_requires_search_query() {
    let filter = SearchFilter::default();
    assert!(!filter.applies_to(&QueryContext::default()));
    assert!(filter.applies_to(&QueryContext::search("a")));
}

#[test]
fn scope_requires_restricted_content_type() {
    let filter = SearchFilter::default();
    assert!(filter.applies_to(&QueryContext::search("a").with_content_types(["page"])));
    assert!(filter.applies_to(&QueryContext::search("a").with_content_types(["post", "page"])));
    assert!(!filter.applies_to(&QueryContext::search("a").with_content_types(["post"])));
    let custom = SearchFilter::new("doc");
    assert!(custom.applies_to(&QueryContext::search("a").with_content_types(["doc"])));
}

#[test]
fn admin_queries_are_filtered_only_for_rest_searches() {
    let filter = SearchFilter::default();
    let mut admin = QueryContext::search("a");
    admin.is_admin = true;
    assert!(!filter.applies_to(&admin));

    admin.is_rest_request = true;
    assert!(filter.applies_to(&admin));

    admin.search_term = None;
    assert!(!filter.applies_to(&admin));
}

#[test]
fn out_of_scope_query_touches_nothing() -> Result<(), StoreError> {
    let catalog = PermissionCatalog::from_tags(["editor"]);
    let evaluator = PermissionEvaluator::new(&catalog);
    let store = StaticContent {
        items: scenario_items(),
    };
    let mut modifier = RecordingModifier::default();
    let outcome = SearchFilter::default().run(
        &QueryContext::default(),
        &store,
        &User::anonymous(),
        &evaluator,
        &mut modifier,
    )?;
    assert_eq!(outcome, FilterOutcome::NotApplicable);
    assert!(modifier.calls.is_empty());
    Ok(())
}

// ============================================================================
// SECTION: Reentrancy
// ============================================================================

#[test]
fn nested_lookups_do_not_reenter_the_filter() -> Result<(), StoreError> {
    let catalog = PermissionCatalog::from_tags(["editor"]);
    let evaluator = PermissionEvaluator::new(&catalog);
    let filter = SearchFilter::default();
    let store = ReentrantContent {
        filter: &filter,
        catalog: &catalog,
        items: scenario_items(),
        depth: Cell::new(0),
        max_depth: Cell::new(0),
        nested: RefCell::new(Vec::new()),
        fail_lookups: false,
    };
    let mut modifier = RecordingModifier::default();
    let outcome = filter.run(
        &QueryContext::search("handbook"),
        &store,
        &User::anonymous(),
        &evaluator,
        &mut modifier,
    )?;
    assert_eq!(outcome, FilterOutcome::Applied(BTreeSet::from([ContentId::new(1)])));
    assert_eq!(store.max_depth.get(), 1);
    assert_eq!(
        *store.nested.borrow(),
        vec![FilterOutcome::Suppressed, FilterOutcome::Suppressed]
    );
    assert!(!filter.is_active());
    Ok(())
}

#[test]
fn guard_is_released_when_a_lookup_fails() {
    let catalog = PermissionCatalog::from_tags(["editor"]);
    let evaluator = PermissionEvaluator::new(&catalog);
    let filter = SearchFilter::default();
    let store = ReentrantContent {
        filter: &filter,
        catalog: &catalog,
        items: scenario_items(),
        depth: Cell::new(0),
        max_depth: Cell::new(0),
        nested: RefCell::new(Vec::new()),
        fail_lookups: true,
    };
    let mut modifier = RecordingModifier::default();
    let err = filter
        .run(
            &QueryContext::search("handbook"),
            &store,
            &User::anonymous(),
            &evaluator,
            &mut modifier,
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "store io error: term lookup failed");
    assert!(!filter.is_active());
    assert!(modifier.calls.is_empty());

    let healthy = StaticContent {
        items: scenario_items(),
    };
    let outcome = filter
        .run(&QueryContext::search("again"), &healthy, &User::anonymous(), &evaluator, &mut modifier)
        .unwrap();
    assert_eq!(outcome, FilterOutcome::Applied(BTreeSet::from([ContentId::new(1)])));
}

#[test]
fn candidate_tags_are_reread_from_the_store() -> Result<(), StoreError> {
    struct StaleListing;

    impl ContentStore for StaleListing {
        fn required_tags(&self, _content_id: ContentId) -> Result<Vec<PermissionTag>, StoreError> {
            Ok(Vec::new())
        }

        fn list_candidates(&self, _query: &QueryContext) -> Result<Vec<ContentItem>, StoreError> {
            Ok(vec![ContentItem::new(1, ["editor"])])
        }
    }

    let catalog = PermissionCatalog::from_tags(["editor"]);
    let evaluator = PermissionEvaluator::new(&catalog);
    let mut modifier = RecordingModifier::default();
    let outcome = SearchFilter::default().run(
        &QueryContext::search("x"),
        &StaleListing,
        &User::anonymous(),
        &evaluator,
        &mut modifier,
    )?;
    assert_eq!(outcome, FilterOutcome::Applied(BTreeSet::new()));
    Ok(())
}
