// crates/restrict-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Restrict Gate Interfaces
// Description: Host collaborator interfaces for content, users, tags, and settings.
// Purpose: Define the contract surfaces consumed by the access-decision core.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how Restrict Gate integrates with a host platform without
//! modelling the host's object shapes. Store failures are reported through
//! [`StoreError`] and must reach the caller unchanged; they are never folded
//! into an allow or deny outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::Action;
use crate::core::ContentId;
use crate::core::ContentItem;
use crate::core::PermissionTag;
use crate::core::QueryContext;
use crate::core::RestDenial;
use crate::core::Settings;
use crate::core::User;

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Collaborator store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("store io error: {0}")]
    Io(String),
    /// Requested record does not exist.
    #[error("store record not found: {0}")]
    NotFound(String),
    /// Store data is invalid.
    #[error("store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Content Store
// ============================================================================

/// Host content store.
pub trait ContentStore {
    /// Returns the permission tags required by a content item.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn required_tags(&self, content_id: ContentId) -> Result<Vec<PermissionTag>, StoreError>;

    /// Lists candidate content items for a listing/search query.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the listing fails.
    fn list_candidates(&self, query: &QueryContext) -> Result<Vec<ContentItem>, StoreError>;

    /// Fetches a content item snapshot with its current required tags.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn content(&self, content_id: ContentId) -> Result<ContentItem, StoreError> {
        Ok(ContentItem {
            id: content_id,
            required_tags: self.required_tags(content_id)?,
        })
    }
}

// ============================================================================
// SECTION: User Store
// ============================================================================

/// Host session/user store.
pub trait UserStore {
    /// Returns the user bound to the current request.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the session cannot be resolved.
    fn current_user(&self) -> Result<User, StoreError>;
}

// ============================================================================
// SECTION: Tag Store
// ============================================================================

/// Host taxonomy store holding the defined permission tags.
pub trait TagStore {
    /// Lists every defined permission tag in store order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the listing fails.
    fn list_all_tags(&self) -> Result<Vec<PermissionTag>, StoreError>;
}

// ============================================================================
// SECTION: Settings Store
// ============================================================================

/// Host settings store.
pub trait SettingsStore {
    /// Returns the operator-defined restriction message, if saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when settings cannot be read.
    fn custom_message(&self) -> Result<Option<String>, StoreError>;

    /// Returns whether denied viewers are redirected to the login page.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when settings cannot be read.
    fn redirect_on_deny(&self) -> Result<bool, StoreError>;

    /// Loads a settings snapshot for one request.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when settings cannot be read.
    fn load_settings(&self) -> Result<Settings, StoreError> {
        Ok(Settings {
            custom_message: self.custom_message()?,
            redirect_on_deny: self.redirect_on_deny()?,
            ..Settings::default()
        })
    }
}

// ============================================================================
// SECTION: Response Sink
// ============================================================================

/// Host response sink that realizes gate outcomes.
pub trait ResponseSink {
    /// Realizes a rendering action (serve, redirect, or substitute).
    fn realize(&mut self, action: &Action);

    /// Realizes an API denial as a JSON error response.
    fn reject(&mut self, denial: &RestDenial);
}

// ============================================================================
// SECTION: Query Modifier
// ============================================================================

/// Host query hook that removes ids from a listing/search query.
pub trait QueryModifier {
    /// Excludes the given content ids from the pending query.
    fn exclude_ids(&mut self, ids: &BTreeSet<ContentId>);
}
