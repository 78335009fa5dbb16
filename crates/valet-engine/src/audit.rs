//! # Audit Sink
//!
//! Fire-and-forget notification of check-in/check-out events.
//!
//! ## Contract
//! The engine calls [`AuditSink::record`] after a transition has fully
//! committed. The sink must not block meaningfully and cannot fail the
//! operation - audit is an observer, never a participant. Durable activity
//! logging lives in a collaborator behind this trait.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use valet_core::{AreaId, Money};

/// A committed session transition, as seen by the audit trail.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A vehicle entered and a session opened.
    CheckedIn {
        ticket: String,
        plate: String,
        area_id: AreaId,
        officer_id: String,
        at: DateTime<Utc>,
    },
    /// A session completed and the bill was finalized.
    CheckedOut {
        ticket: String,
        plate: String,
        area_id: AreaId,
        billed_hours: i64,
        cost: Money,
        at: DateTime<Utc>,
    },
}

/// Receiver of committed session events.
pub trait AuditSink: Send + Sync {
    /// Records one event. Must not panic; must not block on I/O.
    fn record(&self, event: &AuditEvent);
}

/// Discards every event. The default when no collaborator is wired up.
#[derive(Debug, Default)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _event: &AuditEvent) {}
}

/// Emits events as structured `tracing` logs with a JSON payload.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        let payload = serde_json::to_string(event).unwrap_or_default();
        match event {
            AuditEvent::CheckedIn { ticket, plate, .. } => {
                info!(ticket = %ticket, plate = %plate, payload = %payload, "vehicle checked in");
            }
            AuditEvent::CheckedOut {
                ticket, plate, cost, ..
            } => {
                info!(ticket = %ticket, plate = %plate, cost = %cost, payload = %payload, "vehicle checked out");
            }
        }
    }
}

/// Collects events in memory. Test double for asserting on the trail.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: std::sync::Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit sink lock poisoned").clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &AuditEvent) {
        self.events
            .lock()
            .expect("audit sink lock poisoned")
            .push(event.clone());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
