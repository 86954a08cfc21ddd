// crates/restrict-gate-core/src/core/content.rs
// ============================================================================
// Module: Restrict Gate Content and User Snapshots
// Description: Narrow read-only views of host content items and users.
// Purpose: Expose only the fields the access-decision core reads.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! Host platforms hand the core richly shaped content and user objects. These
//! snapshots keep only what the decision path needs: the content identifier
//! and its required tags, and the user's identity, authentication state,
//! tag grants, and coarse editing capability.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ContentId;
use crate::core::identifiers::PermissionTag;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Content Items
// ============================================================================

/// Content item snapshot with its required permission tags.
///
/// # Invariants
/// - An empty `required_tags` list means the item is unrestricted.
/// - Duplicate tags are tolerated and carry set semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Content identifier.
    pub id: ContentId,
    /// Tags of which the viewer must hold at least one.
    #[serde(default)]
    pub required_tags: Vec<PermissionTag>,
}

impl ContentItem {
    /// Creates a content item with the given required tags.
    #[must_use]
    pub fn new<I, T>(id: impl Into<ContentId>, required_tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PermissionTag>,
    {
        Self {
            id: id.into(),
            required_tags: required_tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an unrestricted content item.
    #[must_use]
    pub fn unrestricted(id: impl Into<ContentId>) -> Self {
        Self {
            id: id.into(),
            required_tags: Vec::new(),
        }
    }

    /// Returns true when the item requires at least one tag.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        !self.required_tags.is_empty()
    }
}

// ============================================================================
// SECTION: Users
// ============================================================================

/// User snapshot used for access decisions.
///
/// # Invariants
/// - A tag absent from `grants` is treated as not granted.
/// - When a grant record repeats, the last observed value wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier (`0` for anonymous).
    pub id: UserId,
    /// Whether the host considers the session authenticated.
    #[serde(default)]
    pub authenticated: bool,
    /// Tag grants keyed by permission tag.
    #[serde(default)]
    pub grants: BTreeMap<PermissionTag, bool>,
    /// Coarse editing capability checked by API enforcement.
    #[serde(default)]
    pub can_edit_content: bool,
}

impl User {
    /// Returns the anonymous user.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            id: UserId::ANONYMOUS,
            authenticated: false,
            grants: BTreeMap::new(),
            can_edit_content: false,
        }
    }

    /// Returns an authenticated user with no grants.
    #[must_use]
    pub fn authenticated(id: impl Into<UserId>) -> Self {
        let id = id.into();
        Self {
            id,
            authenticated: !id.is_anonymous(),
            grants: BTreeMap::new(),
            can_edit_content: false,
        }
    }

    /// Adds grant records in order; later records override earlier ones.
    #[must_use]
    pub fn with_grants<I, T>(mut self, grants: I) -> Self
    where
        I: IntoIterator<Item = (T, bool)>,
        T: Into<PermissionTag>,
    {
        for (tag, granted) in grants {
            self.grants.insert(tag.into(), granted);
        }
        self
    }

    /// Sets the coarse editing capability.
    #[must_use]
    pub fn with_edit_capability(mut self, can_edit: bool) -> Self {
        self.can_edit_content = can_edit;
        self
    }

    /// Returns true when the user is logged in.
    ///
    /// The anonymous identifier never counts as authenticated, whatever the
    /// session flag says.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated && !self.id.is_anonymous()
    }

    /// Returns true when the user holds an explicit `true` grant for `tag`.
    #[must_use]
    pub fn is_granted(&self, tag: &PermissionTag) -> bool {
        self.grants.get(tag).copied().unwrap_or(false)
    }
}
