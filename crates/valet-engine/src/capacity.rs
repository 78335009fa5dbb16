//! # Capacity Allocator
//!
//! Per-area atomic slot accounting with a hard ceiling.
//!
//! ## Why Per-Area Locks?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Capacity Critical Sections                           │
//! │                                                                         │
//! │  Area A1 ──► Mutex ──► occupied: 97/100   ┐                            │
//! │  Area B1 ──► Mutex ──► occupied: 12/50    │ independent - check-ins    │
//! │  Area C1 ──► Mutex ──► occupied: 20/20    ┘ against A1 never block B1  │
//! │                                                                         │
//! │  acquire(area): lock area ──► occupied < capacity? ──► occupied += 1   │
//! │                 (single critical section; full ⇒ fail, NO mutation)    │
//! │                                                                         │
//! │  release(area): lock area ──► occupied > 0? ──► occupied -= 1          │
//! │                 (underflow ⇒ caller bug ⇒ InvariantViolation, logged)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Capacity is the one truly concurrent shared resource: every check-in
//! against the same area races for the same counter, so the
//! read-check-increment is one atomic unit per area, not per system.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tracing::error;
use valet_core::{Area, AreaId};

use crate::error::{EngineError, EngineResult};

/// One registered area: immutable metadata plus the guarded slot counter.
#[derive(Debug)]
struct AreaSlots {
    name: String,
    code: String,
    capacity: u32,
    is_active: bool,
    /// The only place `occupied` is ever mutated.
    occupied: Mutex<u32>,
}

/// Per-area slot accounting.
///
/// The outer map is read-mostly (areas are registered at startup), so it
/// sits behind an `RwLock`; each area's counter has its own `Mutex`.
#[derive(Debug, Default)]
pub struct CapacityAllocator {
    areas: RwLock<HashMap<AreaId, Arc<AreaSlots>>>,
}

impl CapacityAllocator {
    /// Creates an allocator with no registered areas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an area, adopting its starting occupancy.
    ///
    /// A non-zero `area.occupied` supports restoring state handed back by
    /// the storage collaborator.
    ///
    /// ## Errors
    /// - `InvariantViolation` if the id is already registered or the
    ///   starting occupancy exceeds capacity.
    pub fn register(&self, area: Area) -> EngineResult<()> {
        if area.occupied > area.capacity {
            return Err(EngineError::InvariantViolation {
                detail: format!(
                    "area {} registered with occupancy {} above capacity {}",
                    area.id, area.occupied, area.capacity
                ),
            });
        }

        let mut areas = self.areas.write().expect("area registry lock poisoned");
        if areas.contains_key(&area.id) {
            return Err(EngineError::InvariantViolation {
                detail: format!("area {} is already registered", area.id),
            });
        }

        areas.insert(
            area.id,
            Arc::new(AreaSlots {
                name: area.name,
                code: area.code,
                capacity: area.capacity,
                is_active: area.is_active,
                occupied: Mutex::new(area.occupied),
            }),
        );
        Ok(())
    }

    /// Atomically claims one slot in the area.
    ///
    /// ## Errors
    /// - `AreaNotFound` for unregistered ids
    /// - `AreaInactive` when the area is closed to new check-ins
    /// - `CapacityFull` when every slot is held (no mutation in that case)
    pub fn acquire(&self, area_id: AreaId) -> EngineResult<()> {
        let area = self.slots(area_id)?;
        if !area.is_active {
            return Err(EngineError::AreaInactive { area_id });
        }

        let mut occupied = area.occupied.lock().expect("area slot lock poisoned");
        if *occupied >= area.capacity {
            return Err(EngineError::CapacityFull { area_id });
        }
        *occupied += 1;
        Ok(())
    }

    /// Atomically returns one slot to the area.
    ///
    /// Releasing works on inactive areas too: a closed area still empties.
    ///
    /// ## Errors
    /// - `AreaNotFound` for unregistered ids
    /// - `InvariantViolation` on underflow - release without a matching
    ///   acquire is a caller bug, logged and surfaced, never silently
    ///   floored away.
    pub fn release(&self, area_id: AreaId) -> EngineResult<()> {
        let area = self.slots(area_id)?;

        let mut occupied = area.occupied.lock().expect("area slot lock poisoned");
        if *occupied == 0 {
            error!(area_id = %area_id, "occupancy underflow: release without acquire");
            return Err(EngineError::InvariantViolation {
                detail: format!("area {} released below zero occupancy", area_id),
            });
        }
        *occupied -= 1;
        Ok(())
    }

    /// Verifies the area exists and accepts check-ins, without mutating it.
    pub fn ensure_open(&self, area_id: AreaId) -> EngineResult<()> {
        let area = self.slots(area_id)?;
        if !area.is_active {
            return Err(EngineError::AreaInactive { area_id });
        }
        Ok(())
    }

    /// Returns a point-in-time snapshot of the area.
    pub fn occupancy(&self, area_id: AreaId) -> EngineResult<Area> {
        let area = self.slots(area_id)?;
        let occupied = *area.occupied.lock().expect("area slot lock poisoned");
        Ok(Area {
            id: area_id,
            name: area.name.clone(),
            code: area.code.clone(),
            capacity: area.capacity,
            occupied,
            is_active: area.is_active,
        })
    }

    fn slots(&self, area_id: AreaId) -> EngineResult<Arc<AreaSlots>> {
        self.areas
            .read()
            .expect("area registry lock poisoned")
            .get(&area_id)
            .cloned()
            .ok_or(EngineError::AreaNotFound { area_id })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
