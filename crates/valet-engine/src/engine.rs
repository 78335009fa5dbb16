//! # Parking Engine Facade
//!
//! The two boundary operations - CheckIn and CheckOut - plus the parked
//! queries, wired over the components.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  check_in(plate, type, area, owner?, officer)                           │
//! │      │                                                                  │
//! │      ▼ validation (normalize plate/type, owner rules)                   │
//! │      ▼ rate lookup          ──► RateNotFound                            │
//! │      ▼ area open check      ──► AreaNotFound / AreaInactive             │
//! │      ▼ registry.find_or_create   (no visit counted yet)                 │
//! │      ▼ ledger.open          ──► AlreadyParked / CapacityFull            │
//! │      ▼ registry.record_visit     (only after the slot is ours)          │
//! │      ▼ audit.record(CheckedIn)                                          │
//! │      ▼ Session { status: Active }                                       │
//! │                                                                         │
//! │  check_out(ticket)                                                      │
//! │      │                                                                  │
//! │      ▼ ledger.close         ──► SessionNotFound / SessionAlreadyClosed  │
//! │      │                          / InvalidDuration                       │
//! │      ▼ audit.record(CheckedOut)                                         │
//! │      ▼ Session { status: Completed, billed_hours, cost }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use valet_core::validation::{
    normalize_plate, normalize_vehicle_type, validate_owner_name, validate_owner_phone,
};
use valet_core::{Area, AreaId, Session, Vehicle};

use crate::audit::{AuditEvent, AuditSink, NullAuditSink};
use crate::capacity::CapacityAllocator;
use crate::error::{EngineError, EngineResult};
use crate::ledger::SessionLedger;
use crate::rates::RateLookup;
use crate::registry::{OwnerInfo, VehicleRegistry};

// =============================================================================
// Boundary Types
// =============================================================================

/// Typed check-in request, validated before any business logic runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRequest {
    /// Raw license plate as typed at the desk; normalized internally.
    pub plate: String,

    /// Vehicle type driving the rate lookup (e.g. "motor", "mobil").
    pub vehicle_type: String,

    /// Target parking area.
    pub area_id: AreaId,

    /// Owner name, if captured.
    pub owner_name: Option<String>,

    /// Owner phone, if captured.
    pub owner_phone: Option<String>,

    /// Officer performing the check-in.
    pub officer_id: String,
}

/// Typed check-out request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutRequest {
    /// The ticket issued at check-in - the sole check-out key.
    pub ticket: String,
}

/// Result of a parked-vehicle search by plate.
#[derive(Debug, Clone, Serialize)]
pub struct ParkedSearch {
    /// The registered vehicle.
    pub vehicle: Vehicle,

    /// Its most recent session, active or completed.
    pub latest_session: Option<Session>,

    /// True when the latest session is still active.
    pub is_currently_parked: bool,
}

// =============================================================================
// Parking Engine
// =============================================================================

/// The session-lifecycle engine: owns capacity, registry, and ledger;
/// borrows rates and audit from collaborators.
pub struct ParkingEngine {
    capacity: CapacityAllocator,
    registry: VehicleRegistry,
    ledger: SessionLedger,
    rates: Arc<dyn RateLookup>,
    audit: Arc<dyn AuditSink>,
}

impl ParkingEngine {
    /// Creates an engine over a rate collaborator, with audit discarded.
    pub fn new(rates: Arc<dyn RateLookup>) -> Self {
        ParkingEngine {
            capacity: CapacityAllocator::new(),
            registry: VehicleRegistry::new(),
            ledger: SessionLedger::new(),
            rates,
            audit: Arc::new(NullAuditSink),
        }
    }

    /// Attaches an audit sink. Builder-style for setup code.
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Registers a parking area. Typically called once at startup.
    pub fn register_area(&self, area: Area) -> EngineResult<()> {
        self.capacity.register(area)
    }

    /// Checks a vehicle in: open a billable session and claim a slot.
    ///
    /// ## Errors
    /// `Validation`, `RateNotFound`, `AreaNotFound`, `AreaInactive`,
    /// `AlreadyParked`, `CapacityFull`. On any failure no slot is held and
    /// the vehicle's visit counter is untouched.
    pub fn check_in(&self, request: CheckInRequest) -> EngineResult<Session> {
        let plate = normalize_plate(&request.plate)?;
        let vehicle_type = normalize_vehicle_type(&request.vehicle_type)?;
        let owner = OwnerInfo {
            name: validate_owner_name(request.owner_name.as_deref())?,
            phone: validate_owner_phone(request.owner_phone.as_deref())?,
        };
        if request.officer_id.trim().is_empty() {
            return Err(EngineError::Validation(
                valet_core::ValidationError::Required {
                    field: "officer_id".to_string(),
                },
            ));
        }

        let rate = self
            .rates
            .rate_for(&vehicle_type)
            .ok_or_else(|| EngineError::RateNotFound {
                vehicle_type: vehicle_type.clone(),
            })?;

        // Fail fast on a bad area before touching the registry.
        self.capacity.ensure_open(request.area_id)?;

        let vehicle = self.registry.find_or_create(&plate, &vehicle_type, &owner);

        let now = Utc::now();
        let session = self.ledger.open(
            &vehicle,
            request.area_id,
            &rate,
            &request.officer_id,
            &self.capacity,
            now,
        )?;

        // Visit statistics move only once the open has committed; a
        // capacity rejection above leaves the counter untouched.
        self.registry.record_visit(&plate, now, &owner)?;

        info!(
            ticket = %session.ticket,
            plate = %plate,
            area_id = %session.area_id,
            "check-in complete"
        );
        self.audit.record(&AuditEvent::CheckedIn {
            ticket: session.ticket.clone(),
            plate,
            area_id: session.area_id,
            officer_id: session.officer_id.clone(),
            at: session.check_in_at,
        });

        Ok(session)
    }

    /// Checks a vehicle out: finalize the bill and release the slot.
    ///
    /// ## Errors
    /// `SessionNotFound`, `SessionAlreadyClosed`, `InvalidDuration`.
    pub fn check_out(&self, request: CheckOutRequest) -> EngineResult<Session> {
        let session = self
            .ledger
            .close(&request.ticket, &self.capacity, Utc::now())?;

        let plate = self.plate_of(&session);

        info!(
            ticket = %session.ticket,
            plate = %plate,
            billed_hours = session.billed_hours.unwrap_or_default(),
            cost = %session.cost.unwrap_or_default(),
            "check-out complete"
        );
        self.audit.record(&AuditEvent::CheckedOut {
            ticket: session.ticket.clone(),
            plate,
            area_id: session.area_id,
            billed_hours: session.billed_hours.unwrap_or_default(),
            cost: session.cost.unwrap_or_default(),
            at: session.check_out_at.unwrap_or(session.check_in_at),
        });

        Ok(session)
    }

    /// All currently active sessions (the "parked" board).
    pub fn parked(&self) -> Vec<Session> {
        self.ledger.active_sessions()
    }

    /// Finds a vehicle by plate with its latest session.
    ///
    /// ## Errors
    /// `Validation` on a malformed plate, `VehicleNotFound` when the plate
    /// has never been registered.
    pub fn search_parked(&self, raw_plate: &str) -> EngineResult<ParkedSearch> {
        let plate = normalize_plate(raw_plate)?;
        let vehicle = self
            .registry
            .find(&plate)
            .ok_or(EngineError::VehicleNotFound { plate })?;

        let latest_session = self.ledger.latest_for_vehicle(&vehicle.id);
        let is_currently_parked = latest_session
            .as_ref()
            .is_some_and(Session::is_active);

        Ok(ParkedSearch {
            vehicle,
            latest_session,
            is_currently_parked,
        })
    }

    /// Point-in-time occupancy snapshot of one area.
    pub fn occupancy(&self, area_id: AreaId) -> EngineResult<Area> {
        self.capacity.occupancy(area_id)
    }

    /// Looks up any session by ticket without changing it.
    pub fn session(&self, ticket: &str) -> Option<Session> {
        self.ledger.get(ticket)
    }

    /// Resolves a session's vehicle id back to its plate for logging.
    fn plate_of(&self, session: &Session) -> String {
        self.registry
            .find_plate_by_vehicle_id(&session.vehicle_id)
            .unwrap_or_default()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
