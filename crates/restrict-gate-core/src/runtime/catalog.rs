// crates/restrict-gate-core/src/runtime/catalog.rs
// ============================================================================
// Module: Restrict Gate Permission Catalog
// Description: Sorted, deduplicated view of every defined permission tag.
// Purpose: Provide the per-request tag universe used by the evaluator.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The catalog is re-read from the [`TagStore`] on every request because tags
//! may be added or removed between requests. An empty store yields an empty
//! catalog rather than an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::PermissionTag;
use crate::interfaces::StoreError;
use crate::interfaces::TagStore;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Ordered permission tag catalog.
///
/// # Invariants
/// - Tags are sorted ascending and unique.
/// - Empty tags are never present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionCatalog {
    /// Sorted, unique tags.
    tags: Vec<PermissionTag>,
}

impl PermissionCatalog {
    /// Builds a catalog from raw tags, sorting and deduplicating them.
    #[must_use]
    pub fn from_tags<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PermissionTag>,
    {
        let mut tags: Vec<PermissionTag> =
            tags.into_iter().map(Into::into).filter(|tag| !tag.is_empty()).collect();
        tags.sort();
        tags.dedup();
        Self {
            tags,
        }
    }

    /// Loads the catalog from a tag store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store listing fails.
    pub fn load<S: TagStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(Self::from_tags(store.list_all_tags()?))
    }

    /// Returns the tags in ascending order.
    #[must_use]
    pub fn tags(&self) -> &[PermissionTag] {
        &self.tags
    }

    /// Returns true when `tag` is defined.
    #[must_use]
    pub fn contains(&self, tag: &PermissionTag) -> bool {
        self.tags.binary_search(tag).is_ok()
    }

    /// Returns the number of defined tags.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true when no tags are defined.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Returns all defined tags sorted by name, deduplicated, empties excluded.
///
/// # Errors
///
/// Returns [`StoreError`] when the store listing fails.
pub fn load_tags<S: TagStore + ?Sized>(store: &S) -> Result<Vec<PermissionTag>, StoreError> {
    Ok(PermissionCatalog::load(store)?.tags)
}
