//! # Vehicle Registry
//!
//! Find-or-create vehicles by canonical plate; track visit counters.
//!
//! ## Side-Effect Ordering
//! ```text
//! check-in ──► find_or_create (no visit yet)
//!          ──► ledger opens session (capacity acquired)
//!          ──► record_visit (visit_count++, last_visit_at, owner refresh)
//!
//! A check-in that fails on capacity must NOT bump the visit counter,
//! so the counter update is a separate call made only after the ledger
//! open succeeded.
//! ```
//!
//! ## Owner Refresh Semantics
//! Non-destructive: owner fields supplied on a repeat check-in replace the
//! stored values; omitted fields are left untouched. Blank input never
//! erases a known owner.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use valet_core::Vehicle;

use crate::error::{EngineError, EngineResult};

/// Optional owner details captured at the check-in desk.
#[derive(Debug, Clone, Default)]
pub struct OwnerInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// In-memory vehicle registry keyed by canonical plate.
///
/// Vehicles are never deleted by the engine, so the map only grows; lookups
/// dominate, hence `RwLock` over `Mutex`.
#[derive(Debug, Default)]
pub struct VehicleRegistry {
    vehicles: RwLock<HashMap<String, Vehicle>>,
}

impl VehicleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the vehicle for the plate, creating it on first sight.
    ///
    /// `plate` and `vehicle_type` must already be canonical (the engine
    /// facade normalizes before calling in). A new vehicle starts with
    /// `visit_count = 0` - the counter moves in [`record_visit`] only.
    ///
    /// [`record_visit`]: VehicleRegistry::record_visit
    pub fn find_or_create(&self, plate: &str, vehicle_type: &str, owner: &OwnerInfo) -> Vehicle {
        let mut vehicles = self.vehicles.write().expect("vehicle registry lock poisoned");
        vehicles
            .entry(plate.to_string())
            .or_insert_with(|| Vehicle {
                id: Uuid::new_v4().to_string(),
                plate: plate.to_string(),
                vehicle_type: vehicle_type.to_string(),
                owner_name: owner.name.clone(),
                owner_phone: owner.phone.clone(),
                visit_count: 0,
                last_visit_at: None,
            })
            .clone()
    }

    /// Records a successful check-in for the plate.
    ///
    /// Increments the visit counter, stamps the visit time, and applies the
    /// non-destructive owner refresh. Only called after capacity was
    /// acquired and the session opened.
    ///
    /// ## Errors
    /// `InvariantViolation` if the plate is unknown - check-in always
    /// creates the vehicle first, so a miss here is an engine bug.
    pub fn record_visit(
        &self,
        plate: &str,
        at: DateTime<Utc>,
        owner: &OwnerInfo,
    ) -> EngineResult<Vehicle> {
        let mut vehicles = self.vehicles.write().expect("vehicle registry lock poisoned");
        let vehicle = vehicles
            .get_mut(plate)
            .ok_or_else(|| EngineError::InvariantViolation {
                detail: format!("visit recorded for unregistered plate {}", plate),
            })?;

        vehicle.visit_count += 1;
        vehicle.last_visit_at = Some(at);
        if let Some(name) = &owner.name {
            vehicle.owner_name = Some(name.clone());
        }
        if let Some(phone) = &owner.phone {
            vehicle.owner_phone = Some(phone.clone());
        }

        Ok(vehicle.clone())
    }

    /// Looks up a vehicle by canonical plate.
    pub fn find(&self, plate: &str) -> Option<Vehicle> {
        self.vehicles
            .read()
            .expect("vehicle registry lock poisoned")
            .get(plate)
            .cloned()
    }

    /// Resolves a vehicle id back to its plate.
    ///
    /// Sessions carry vehicle ids; logs and audit events want plates. The
    /// registry stays small (one entry per distinct vehicle), so a scan
    /// beats maintaining a reverse index.
    pub fn find_plate_by_vehicle_id(&self, vehicle_id: &str) -> Option<String> {
        self.vehicles
            .read()
            .expect("vehicle registry lock poisoned")
            .values()
            .find(|v| v.id == vehicle_id)
            .map(|v| v.plate.clone())
    }

    /// Number of distinct vehicles ever seen.
    pub fn len(&self) -> usize {
        self.vehicles
            .read()
            .expect("vehicle registry lock poisoned")
            .len()
    }

    /// True when no vehicle has ever checked in.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
