// crates/restrict-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Restrict Gate Runtime
// Description: Catalog, evaluator, gates, search filter, and engine.
// Purpose: Decide content visibility consistently across every call site.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the access-decision core. Rendering, search
//! filtering, and API enforcement are separate entry points, but rendering
//! and search both call the same [`PermissionEvaluator`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod access_gate;
pub mod catalog;
pub mod engine;
pub mod evaluator;
pub mod rest_gate;
pub mod search_filter;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use access_gate::AccessGate;
pub use catalog::PermissionCatalog;
pub use catalog::load_tags;
pub use engine::Collaborators;
pub use engine::EngineError;
pub use engine::RestrictEngine;
pub use engine::RestrictEngineConfig;
pub use evaluator::PermissionEvaluator;
pub use evaluator::evaluate;
pub use rest_gate::RestGate;
pub use rest_gate::RestOutcome;
pub use search_filter::DEFAULT_RESTRICTED_CONTENT_TYPE;
pub use search_filter::FilterGuard;
pub use search_filter::FilterOutcome;
pub use search_filter::SearchFilter;
pub use search_filter::compute_excluded_ids;
pub use store::ContentRecord;
pub use store::InMemoryHost;
