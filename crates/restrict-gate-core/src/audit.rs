// crates/restrict-gate-core/src/audit.rs
// ============================================================================
// Module: Restrict Gate Audit Logging
// Description: Structured audit events for access decisions.
// Purpose: Emit JSON-line audit logs without hard logging dependencies.
// Dependencies: crate::core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every call site records one [`AccessAuditEvent`] per decision (or per
//! search filter run). Sinks serialize events as JSON lines so deployments can
//! route them into their preferred logging pipeline. Events carry identifiers
//! and labels only; message bodies and grant maps are never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::ContentId;
use crate::core::UserId;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Call site that produced an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallSite {
    /// Direct content rendering.
    Render,
    /// Listing/search filtering.
    Search,
    /// API response enforcement.
    Rest,
}

/// Access decision audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Call site that produced the event.
    pub call_site: CallSite,
    /// Content identifier (absent for search runs).
    pub content_id: Option<ContentId>,
    /// Requesting user identifier.
    pub user_id: UserId,
    /// Decision or outcome label.
    pub outcome: &'static str,
    /// Rendering action label when applicable.
    pub action: Option<&'static str>,
    /// Number of catalog tags at decision time.
    pub catalog_size: usize,
    /// Number of excluded ids for search runs.
    pub excluded_count: Option<usize>,
}

/// Inputs required to construct an access audit event.
pub struct AccessAuditEventParams {
    /// Call site that produced the event.
    pub call_site: CallSite,
    /// Content identifier (absent for search runs).
    pub content_id: Option<ContentId>,
    /// Requesting user identifier.
    pub user_id: UserId,
    /// Decision or outcome label.
    pub outcome: &'static str,
    /// Rendering action label when applicable.
    pub action: Option<&'static str>,
    /// Number of catalog tags at decision time.
    pub catalog_size: usize,
    /// Number of excluded ids for search runs.
    pub excluded_count: Option<usize>,
}

impl AccessAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: AccessAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "access_decision",
            timestamp_ms,
            call_site: params.call_site,
            content_id: params.content_id,
            user_id: params.user_id,
            outcome: params.outcome,
            action: params.action,
            catalog_size: params.catalog_size,
            excluded_count: params.excluded_count,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for access decisions.
pub trait AccessAuditSink {
    /// Record an audit event.
    fn record(&self, event: &AccessAuditEvent);
}

impl<T: AccessAuditSink + ?Sized> AccessAuditSink for Box<T> {
    fn record(&self, event: &AccessAuditEvent) {
        (**self).record(event);
    }
}

impl<T: AccessAuditSink + ?Sized> AccessAuditSink for &T {
    fn record(&self, event: &AccessAuditEvent) {
        (**self).record(event);
    }
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AccessAuditSink for StderrAuditSink {
    fn record(&self, event: &AccessAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AccessAuditSink for FileAuditSink {
    fn record(&self, event: &AccessAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AccessAuditSink for NoopAuditSink {
    fn record(&self, _event: &AccessAuditEvent) {}
}
