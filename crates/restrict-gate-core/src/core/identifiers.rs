// crates/restrict-gate-core/src/core/identifiers.rs
// ============================================================================
// Module: Restrict Gate Identifiers
// Description: Canonical opaque identifiers for permission tags, content, and users.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the identifiers used throughout Restrict Gate. A
//! [`PermissionTag`] is an opaque, case-sensitive slug compared by exact
//! equality; it is a distinct type so tags never collide with host-defined
//! field names. Content and user identifiers are numeric, with user `0`
//! reserved for anonymous callers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Permission Tags
// ============================================================================

/// Permission tag slug required by content and granted to users.
///
/// # Invariants
/// - Comparison is exact and case-sensitive; there is no wildcard matching.
/// - Ordering is alphabetical and used for display only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTag(String);

impl PermissionTag {
    /// Creates a new permission tag.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Returns the tag slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the slug is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PermissionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PermissionTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PermissionTag {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Numeric Identifiers
// ============================================================================

/// Content item identifier assigned by the host content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(u64);

impl ContentId {
    /// Creates a new content identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for ContentId {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

/// User identifier assigned by the host user store.
///
/// # Invariants
/// - [`UserId::ANONYMOUS`] (`0`) denotes an unauthenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Sentinel identifier for anonymous callers.
    pub const ANONYMOUS: Self = Self(0);

    /// Creates a new user identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns true for the anonymous sentinel.
    #[must_use]
    pub const fn is_anonymous(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}
