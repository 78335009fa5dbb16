//! # Domain Types
//!
//! Core domain types used throughout the Valet parking engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Area       │   │     Vehicle     │   │      Rate       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (AreaId)    │   │  id (UUID)      │   │  id (RateId)    │       │
//! │  │  code           │   │  plate (canon.) │   │  vehicle_type   │       │
//! │  │  capacity       │   │  visit_count    │   │  hourly_rate    │       │
//! │  │  occupied       │   │  last_visit_at  │   │  daily_max_rate │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Session      │   │  SessionStatus  │   │  PaymentStatus  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  ticket         │   │  Active         │   │  Pending        │       │
//! │  │  rate snapshot  │   │  Completed      │   │  Paid           │       │
//! │  │  cost?          │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! - `Vehicle.id`: UUID v4 - immutable, used for relations
//! - `Vehicle.plate`: canonical plate - human-readable business key
//! - `Session.ticket`: the sole check-out key, immutable once issued

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Identifier Newtypes
// =============================================================================

/// Identifier of a parking area.
///
/// ## Why a Newtype?
/// Area ids and rate ids are both small integers; wrapping them makes it a
/// compile error to pass one where the other is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(pub i64);

impl std::fmt::Display for AreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a parking rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateId(pub i64);

impl std::fmt::Display for RateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Area
// =============================================================================

/// A physical parking zone with fixed slot capacity.
///
/// ## Invariant
/// `0 <= occupied <= capacity` at all times. Only the engine's capacity
/// allocator may mutate `occupied` - no other code path touches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// Unique identifier.
    pub id: AreaId,

    /// Display name shown to officers (e.g. "Basement (Mobil)").
    pub name: String,

    /// Short code used on signage and tickets (e.g. "B1").
    pub code: String,

    /// Total number of slots in this area.
    pub capacity: u32,

    /// Number of slots currently held by active sessions.
    pub occupied: u32,

    /// Inactive areas reject new check-ins but still allow check-outs.
    pub is_active: bool,
}

impl Area {
    /// Returns the number of free slots.
    pub fn available(&self) -> u32 {
        self.capacity.saturating_sub(self.occupied)
    }

    /// True when every slot is taken.
    pub fn is_full(&self) -> bool {
        self.occupied >= self.capacity
    }
}

// =============================================================================
// Vehicle
// =============================================================================

/// A vehicle known to the system, keyed by canonical license plate.
///
/// ## Lifecycle
/// Created on first check-in for a plate; on every later check-in the visit
/// counter and last-visit timestamp are refreshed. Never deleted by the
/// engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Canonical license plate (trimmed, uppercased, single-spaced).
    /// Uniqueness is on this canonical form, never on raw operator input.
    pub plate: String,

    /// Vehicle type, canonical lowercase (e.g. "motor", "mobil", "truck").
    /// Drives the rate lookup at check-in.
    pub vehicle_type: String,

    /// Owner name, if the officer captured one.
    pub owner_name: Option<String>,

    /// Owner phone, if the officer captured one.
    pub owner_phone: Option<String>,

    /// Number of completed check-ins for this vehicle.
    pub visit_count: u64,

    /// When the vehicle last checked in.
    pub last_visit_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Rate
// =============================================================================

/// Pricing for one vehicle type.
///
/// ## Semantics
/// `daily_max_rate == 0` means **uncapped**: the stay bills pure hourly no
/// matter how long it lasts. A positive cap bounds each 24-hour block.
///
/// Read-only from the engine's perspective - rate administration is a
/// collaborator concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// Unique identifier.
    pub id: RateId,

    /// Vehicle type this rate applies to (unique across the rate book).
    pub vehicle_type: String,

    /// Price per billed hour, in minor units.
    pub hourly_rate: Money,

    /// Cap per 24-hour block, in minor units. Zero disables the cap.
    pub daily_max_rate: Money,
}

impl Rate {
    /// True when this rate has a daily cap.
    pub fn is_capped(&self) -> bool {
        self.daily_max_rate.is_positive()
    }
}

// =============================================================================
// Session Status
// =============================================================================

/// Lifecycle state of a parking session.
///
/// ## State Machine
/// ```text
/// Active ──► Completed   (terminal; no cancel, no reopen)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Vehicle is parked; slot is held; bill is still open.
    Active,
    /// Vehicle has checked out; bill is final.
    Completed,
}

impl SessionStatus {
    /// Stable string form, used in logs and audit payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        }
    }
}

/// Payment state of a session's bill.
///
/// The engine marks the bill `Paid` at check-out; actual payment capture
/// is a collaborator concern (out of scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Session is open; nothing owed yet.
    Pending,
    /// Bill settled at check-out.
    Paid,
}

// =============================================================================
// Session
// =============================================================================

/// One parking visit from check-in to check-out.
///
/// ## Invariants
/// - exactly one `Active` session exists per vehicle at any time
/// - `check_out_at >= check_in_at` when present
/// - `cost` and `billed_hours` are set if and only if status is `Completed`
/// - `ticket` is globally unique and immutable once assigned
///
/// ## Rate Freezing
/// `hourly_rate` and `daily_max_rate` are copied from the rate book at
/// check-in. If an administrator edits rates while a vehicle is parked,
/// the bill still uses the rates that were posted when it entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique ticket identifier - the sole check-out key.
    pub ticket: String,

    /// Vehicle this session belongs to.
    pub vehicle_id: String,

    /// Area holding the slot.
    pub area_id: AreaId,

    /// Rate applied at check-in (for reporting joins).
    pub rate_id: RateId,

    /// Officer who performed the check-in.
    pub officer_id: String,

    /// Hourly rate at time of check-in (frozen).
    pub hourly_rate: Money,

    /// Daily cap at time of check-in (frozen; zero = uncapped).
    pub daily_max_rate: Money,

    /// When the vehicle entered.
    pub check_in_at: DateTime<Utc>,

    /// When the vehicle left. `None` while active.
    pub check_out_at: Option<DateTime<Utc>>,

    /// Duration rounded up to whole hours, minimum 1. Set at check-out.
    pub billed_hours: Option<i64>,

    /// Final bill in minor units. Set at check-out.
    pub cost: Option<Money>,

    /// Lifecycle state.
    pub status: SessionStatus,

    /// Bill settlement state.
    pub payment_status: PaymentStatus,
}

impl Session {
    /// True while the vehicle is still parked.
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
