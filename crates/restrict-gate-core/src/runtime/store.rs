// crates/restrict-gate-core/src/runtime/store.rs
// ============================================================================
// Module: Restrict Gate In-Memory Stores
// Description: Simple in-memory collaborator stores for tests and tooling.
// Purpose: Provide deterministic store implementations without a host platform.
// Dependencies: crate::core, crate::interfaces, serde
// ============================================================================

//! ## Overview
//! [`InMemoryHost`] implements every collaborator store over plain maps. It
//! deserializes from a JSON fixture so tooling can evaluate access decisions
//! offline. It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::ContentId;
use crate::core::ContentItem;
use crate::core::PermissionTag;
use crate::core::QueryContext;
use crate::core::Settings;
use crate::core::User;
use crate::core::UserId;
use crate::interfaces::ContentStore;
use crate::interfaces::SettingsStore;
use crate::interfaces::StoreError;
use crate::interfaces::TagStore;
use crate::interfaces::UserStore;

// ============================================================================
// SECTION: Fixture Records
// ============================================================================

/// Content record stored by [`InMemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Content identifier.
    pub id: ContentId,
    /// Host content type (for example `page` or `post`).
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Required permission tags.
    #[serde(default)]
    pub required_tags: Vec<PermissionTag>,
}

/// Serde default for [`ContentRecord::content_type`].
fn default_content_type() -> String {
    "page".to_string()
}

// ============================================================================
// SECTION: In-Memory Host
// ============================================================================

/// In-memory host implementing every collaborator store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryHost {
    /// Defined permission tags in store order (may contain duplicates).
    ///
    /// Required tags missing from this list are dropped from every lookup.
    #[serde(default)]
    pub tags: Vec<PermissionTag>,
    /// Content records.
    #[serde(default)]
    pub content: Vec<ContentRecord>,
    /// Known users.
    #[serde(default)]
    pub users: Vec<User>,
    /// Saved settings; `None` behaves as no settings row.
    #[serde(default)]
    pub settings: Option<Settings>,
    /// Identifier of the user bound to the current request.
    #[serde(default)]
    pub current_user: Option<UserId>,
}

impl InMemoryHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a permission tag definition.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<PermissionTag>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Adds a content record.
    #[must_use]
    pub fn with_content(mut self, record: ContentRecord) -> Self {
        self.content.push(record);
        self
    }

    /// Adds a user.
    #[must_use]
    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    /// Stores settings.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Binds the current request to `user_id`.
    #[must_use]
    pub fn acting_as(mut self, user_id: impl Into<UserId>) -> Self {
        self.current_user = Some(user_id.into());
        self
    }

    /// Returns the set of defined permission tags.
    fn defined_tags(&self) -> BTreeSet<&PermissionTag> {
        self.tags.iter().collect()
    }

    /// Returns the stored record for `content_id`.
    fn record(&self, content_id: ContentId) -> Result<&ContentRecord, StoreError> {
        self.content
            .iter()
            .find(|record| record.id == content_id)
            .ok_or_else(|| StoreError::NotFound(format!("content {content_id}")))
    }
}

impl ContentStore for InMemoryHost {
    fn required_tags(&self, content_id: ContentId) -> Result<Vec<PermissionTag>, StoreError> {
        let defined = self.defined_tags();
        Ok(defined_only(self.record(content_id)?, &defined))
    }

    fn list_candidates(&self, query: &QueryContext) -> Result<Vec<ContentItem>, StoreError> {
        let defined = self.defined_tags();
        Ok(self
            .content
            .iter()
            .filter(|record| query.targets(&record.content_type))
            .map(|record| ContentItem {
                id: record.id,
                required_tags: defined_only(record, &defined),
            })
            .filter(|item| !item.required_tags.is_empty())
            .collect())
    }
}

/// Returns the record's required tags that are still defined.
///
/// A tag missing from the tag list no longer restricts anything, the same way
/// deleting a taxonomy term detaches it from every item.
fn defined_only(record: &ContentRecord, defined: &BTreeSet<&PermissionTag>) -> Vec<PermissionTag> {
    record.required_tags.iter().filter(|tag| defined.contains(tag)).cloned().collect()
}

impl UserStore for InMemoryHost {
    fn current_user(&self) -> Result<User, StoreError> {
        let Some(user_id) = self.current_user.filter(|id| !id.is_anonymous()) else {
            return Ok(User::anonymous());
        };
        self.users
            .iter()
            .rev()
            .find(|user| user.id == user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))
    }
}

impl TagStore for InMemoryHost {
    fn list_all_tags(&self) -> Result<Vec<PermissionTag>, StoreError> {
        Ok(self.tags.clone())
    }
}

impl SettingsStore for InMemoryHost {
    fn custom_message(&self) -> Result<Option<String>, StoreError> {
        Ok(self.settings.as_ref().and_then(|settings| settings.custom_message.clone()))
    }

    fn redirect_on_deny(&self) -> Result<bool, StoreError> {
        Ok(self.settings.as_ref().is_some_and(|settings| settings.redirect_on_deny))
    }

    fn load_settings(&self) -> Result<Settings, StoreError> {
        Ok(self.settings.clone().unwrap_or_default())
    }
}
