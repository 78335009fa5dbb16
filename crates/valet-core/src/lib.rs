//! # valet-core: Pure Business Logic for the Valet Parking Engine
//!
//! This crate is the **heart** of the parking engine. It contains all
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Valet Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Request Handlers (out of tree)                  │   │
//! │  │        check-in endpoint ──► check-out endpoint                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    valet-engine                                 │   │
//! │  │    CapacityAllocator • SessionLedger • VehicleRegistry         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ valet-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   fare    │  │ validation│  │   │
//! │  │   │  Session  │  │   Money   │  │  tiering  │  │   plate   │  │   │
//! │  │   │  Vehicle  │  │ integer   │  │  daily cap│  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO LOCKS • PURE FUNCTIONS                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Area, Vehicle, Rate, Session)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`fare`] - Duration-to-cost calculation with daily-cap tiering
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation (plates, vehicle types, owner info)
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, clock access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are integer minor units (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use valet_core::fare::compute_fare;
//! use valet_core::money::Money;
//!
//! let check_in = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
//! let check_out = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
//!
//! // 90 minutes at 2000/hour with a 10000 daily cap: bills 2 hours.
//! let fare = compute_fare(
//!     check_in,
//!     check_out,
//!     Money::from_minor(2000),
//!     Money::from_minor(10000),
//! )
//! .unwrap();
//!
//! assert_eq!(fare.billed_hours, 2);
//! assert_eq!(fare.cost, Money::from_minor(4000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fare;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use valet_core::Money` instead of
// `use valet_core::money::Money`

pub use error::{FareError, ValidationError};
pub use fare::{compute_fare, Fare};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum accepted length of a license plate after normalization.
///
/// ## Business Reason
/// The longest real-world plate formats sit well under 20 characters;
/// anything longer is operator input error, not a vehicle.
pub const MAX_PLATE_LEN: usize = 20;

/// Maximum accepted length of a vehicle type name.
pub const MAX_VEHICLE_TYPE_LEN: usize = 30;

/// Maximum accepted length of an owner name.
pub const MAX_OWNER_NAME_LEN: usize = 255;

/// Maximum accepted length of an owner phone number.
pub const MAX_OWNER_PHONE_LEN: usize = 20;
