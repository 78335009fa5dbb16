//! # Engine Error Types
//!
//! The engine's boundary error taxonomy.
//!
//! ## Two Families
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EXPECTED business-rule rejections      FATAL invariant faults          │
//! │  ─────────────────────────────────      ──────────────────────          │
//! │  Validation        CapacityFull         InvariantViolation              │
//! │  AreaNotFound      AlreadyParked        (release-without-acquire,       │
//! │  AreaInactive      SessionNotFound       ticket space exhausted)        │
//! │  RateNotFound      SessionAlreadyClosed                                 │
//! │  VehicleNotFound   InvalidDuration                                      │
//! │                                                                         │
//! │  Returned synchronously, never         Logged via tracing::error!      │
//! │  retried internally - the caller       before being surfaced - these   │
//! │  owns user-facing messaging.           indicate a caller or engine bug.│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use valet_core::{AreaId, FareError, ValidationError};

/// Business-rule and invariant errors surfaced at the engine boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input, caught before any business logic runs.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The requested area has never been registered.
    #[error("parking area {area_id} not found")]
    AreaNotFound { area_id: AreaId },

    /// The area exists but is not accepting check-ins.
    #[error("parking area {area_id} is not accepting check-ins")]
    AreaInactive { area_id: AreaId },

    /// No rate is configured for the vehicle type.
    #[error("no rate configured for vehicle type '{vehicle_type}'")]
    RateNotFound { vehicle_type: String },

    /// Every slot in the area is held by an active session.
    #[error("parking area {area_id} is full")]
    CapacityFull { area_id: AreaId },

    /// The vehicle already holds an active session.
    #[error("vehicle {plate} is already parked (ticket {ticket})")]
    AlreadyParked { plate: String, ticket: String },

    /// No session exists for the ticket.
    #[error("no session found for ticket {ticket}")]
    SessionNotFound { ticket: String },

    /// The session was already completed by an earlier check-out.
    #[error("session {ticket} is already closed")]
    SessionAlreadyClosed { ticket: String },

    /// Check-out timestamp precedes check-in (clock skew, surfaced not clamped).
    #[error(transparent)]
    InvalidDuration(#[from] FareError),

    /// The plate has never been registered (parked-search only).
    #[error("no vehicle registered with plate {plate}")]
    VehicleNotFound { plate: String },

    /// Engine-internal invariant broken. A bug, not a business rejection.
    #[error("invariant violation: {detail}")]
    InvariantViolation { detail: String },
}

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
