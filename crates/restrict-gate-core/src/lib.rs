// crates/restrict-gate-core/src/lib.rs
// ============================================================================
// Module: Restrict Gate Core Library
// Description: Public API surface for the Restrict Gate access-decision core.
// Purpose: Expose core types, collaborator interfaces, and runtime gates.
// Dependencies: crate::{audit, core, i18n, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Restrict Gate decides whether content guarded by permission tags is
//! visible to a user. A content item requiring tags is visible to
//! authenticated users holding at least one of them; the outcome is applied
//! consistently to direct rendering, search listings, and API responses.
//! The core integrates with a host platform through explicit store interfaces
//! and never models the host's object shapes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod i18n;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use audit::AccessAuditEvent;
pub use audit::AccessAuditSink;
pub use audit::CallSite;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use i18n::Locale;
pub use interfaces::ContentStore;
pub use interfaces::QueryModifier;
pub use interfaces::ResponseSink;
pub use interfaces::SettingsStore;
pub use interfaces::StoreError;
pub use interfaces::TagStore;
pub use interfaces::UserStore;
pub use runtime::AccessGate;
pub use runtime::Collaborators;
pub use runtime::EngineError;
pub use runtime::FilterOutcome;
pub use runtime::InMemoryHost;
pub use runtime::PermissionCatalog;
pub use runtime::PermissionEvaluator;
pub use runtime::RestGate;
pub use runtime::RestOutcome;
pub use runtime::RestrictEngine;
pub use runtime::RestrictEngineConfig;
pub use runtime::SearchFilter;
