// crates/restrict-gate-core/src/core/mod.rs
// ============================================================================
// Module: Restrict Gate Core Types
// Description: Canonical identifiers, snapshots, settings, and outcomes.
// Purpose: Provide stable, serializable types for access decisions.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types are the canonical source of truth for every call site: direct
//! rendering, search filtering, and API enforcement all consume the same
//! snapshots and produce the same decision type.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod content;
pub mod decision;
pub mod identifiers;
pub mod request;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use content::ContentItem;
pub use content::User;
pub use decision::AccessDecision;
pub use decision::Action;
pub use decision::REST_DENIED_STATUS;
pub use decision::RestDenial;
pub use decision::RestErrorBody;
pub use identifiers::ContentId;
pub use identifiers::PermissionTag;
pub use identifiers::UserId;
pub use request::DEFAULT_LOGIN_PATH;
pub use request::DEFAULT_RETURN_PARAM;
pub use request::QueryContext;
pub use request::RequestContext;
pub use request::Settings;
