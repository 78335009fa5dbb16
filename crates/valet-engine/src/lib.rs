//! # valet-engine: Session Lifecycle Engine
//!
//! Manages bounded-capacity parking areas: vehicles check in (claim one of
//! N slots, open a billable session) and check out (release the slot,
//! settle the bill computed by `valet-core`).
//!
//! ## Guarantees
//! - an area's occupancy never exceeds capacity, under any interleaving of
//!   concurrent check-ins
//! - a vehicle never holds two simultaneous sessions
//! - billing is deterministic from the check-in/check-out timestamps and
//!   the rate frozen at entry
//!
//! ## Components
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        valet-engine                                     │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐            │
//! │  │ ParkingEngine│──►│SessionLedger │──►│CapacityAllocator │            │
//! │  │   (facade)   │   │ open / close │   │ acquire / release│            │
//! │  └──────┬───────┘   └──────┬───────┘   └──────────────────┘            │
//! │         │                  │                                            │
//! │         │                  └──► TicketIdGenerator                       │
//! │         ├──► VehicleRegistry (find-or-create, visit counters)          │
//! │         ├──► RateLookup      (collaborator trait)                      │
//! │         └──► AuditSink       (collaborator trait, fire-and-forget)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use valet_core::{Area, AreaId, Money};
//! use valet_engine::{CheckInRequest, CheckOutRequest, ParkingEngine, RateBook};
//!
//! let rates = RateBook::new().with_rate(
//!     "motor",
//!     Money::from_minor(2000),
//!     Money::from_minor(10000),
//! );
//! let engine = ParkingEngine::new(Arc::new(rates));
//! engine
//!     .register_area(Area {
//!         id: AreaId(1),
//!         name: "Front Lot".to_string(),
//!         code: "A1".to_string(),
//!         capacity: 100,
//!         occupied: 0,
//!         is_active: true,
//!     })
//!     .unwrap();
//!
//! let session = engine
//!     .check_in(CheckInRequest {
//!         plate: "b 1234 xy".to_string(),
//!         vehicle_type: "motor".to_string(),
//!         area_id: AreaId(1),
//!         owner_name: None,
//!         owner_phone: None,
//!         officer_id: "officer-1".to_string(),
//!     })
//!     .unwrap();
//!
//! let closed = engine
//!     .check_out(CheckOutRequest {
//!         ticket: session.ticket,
//!     })
//!     .unwrap();
//! assert_eq!(closed.billed_hours, Some(1)); // one-hour minimum
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod audit;
pub mod capacity;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod rates;
pub mod registry;
pub mod ticket;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use audit::{AuditEvent, AuditSink, MemoryAuditSink, NullAuditSink, TracingAuditSink};
pub use capacity::CapacityAllocator;
pub use engine::{CheckInRequest, CheckOutRequest, ParkedSearch, ParkingEngine};
pub use error::{EngineError, EngineResult};
pub use ledger::SessionLedger;
pub use rates::{RateBook, RateLookup};
pub use registry::{OwnerInfo, VehicleRegistry};
pub use ticket::TicketIdGenerator;
