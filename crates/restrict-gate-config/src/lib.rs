// crates/restrict-gate-config/src/lib.rs
// ============================================================================
// Module: Restrict Gate Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for restrict-gate.toml semantics.
// Dependencies: restrict-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `restrict-gate-config` defines the configuration model for Restrict Gate.
//! Loading is strict and fail-closed: oversized, non-UTF-8, or malformed
//! files are rejected before any value reaches the access engine.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
