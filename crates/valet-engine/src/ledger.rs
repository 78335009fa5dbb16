//! # Session Ledger
//!
//! The authoritative set of sessions, active and completed, and the
//! `Active → Completed` state machine.
//!
//! ## Locking Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Ledger Critical Sections                            │
//! │                                                                         │
//! │  active reservations          sessions               area slots         │
//! │  (16 stripes, by vehicle)     (one RwLock map)       (per-area Mutex)   │
//! │  ┌──────────────────┐         ┌───────────────┐      ┌──────────────┐  │
//! │  │ stripe 0: Mutex  │         │ ticket ──►    │      │ A1: Mutex    │  │
//! │  │ stripe 1: Mutex  │         │   Session     │      │ B1: Mutex    │  │
//! │  │ ...              │         │               │      │ ...          │  │
//! │  └──────────────────┘         └───────────────┘      └──────────────┘  │
//! │                                                                         │
//! │  OPEN:  stripe lock ──► capacity.acquire ──► insert session            │
//! │         (the already-parked check and the session creation share        │
//! │          one per-vehicle critical section: of two concurrent opens      │
//! │          for the same vehicle, exactly one wins)                        │
//! │                                                                         │
//! │  CLOSE: sessions lock (fare + release + mark completed)                 │
//! │         ──► then clear the reservation, outside the sessions lock       │
//! │                                                                         │
//! │  Lock order is always stripe ──► sessions / stripe ──► area; close      │
//! │  drops the sessions lock before touching a stripe, so no cycle exists.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rollback Discipline
//! Open either completes all of its side effects or none: a capacity
//! failure happens before any session exists, and a ticket-generation
//! failure releases the just-acquired slot before surfacing.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};
use tracing::warn;
use valet_core::{
    compute_fare, AreaId, PaymentStatus, Rate, Session, SessionStatus, Vehicle,
};

use crate::capacity::CapacityAllocator;
use crate::error::{EngineError, EngineResult};
use crate::ticket::TicketIdGenerator;

/// Number of per-vehicle reservation stripes.
///
/// Sixteen stripes keep unrelated vehicles off each other's lock while the
/// table stays small; the critical section is a single map probe.
const ACTIVE_STRIPES: usize = 16;

/// Bounded retries for ticket-collision regeneration.
const MAX_TICKET_ATTEMPTS: usize = 5;

/// Owns all sessions and enforces one active session per vehicle.
#[derive(Debug)]
pub struct SessionLedger {
    /// Every session ever opened, keyed by ticket. Completed sessions are
    /// retained for queries; history pruning is a collaborator concern.
    sessions: RwLock<HashMap<String, Session>>,

    /// Active reservation per vehicle: `vehicle_id -> ticket`, striped so
    /// concurrent opens for different vehicles never contend.
    active: Vec<Mutex<HashMap<String, String>>>,

    tickets: TicketIdGenerator,
}

impl Default for SessionLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        SessionLedger {
            sessions: RwLock::new(HashMap::new()),
            active: (0..ACTIVE_STRIPES).map(|_| Mutex::new(HashMap::new())).collect(),
            tickets: TicketIdGenerator::new(),
        }
    }

    /// Opens a session: reserve the vehicle, claim a slot, issue a ticket.
    ///
    /// ## Errors
    /// - `AlreadyParked` when the vehicle holds an active session
    /// - `AreaNotFound` / `AreaInactive` / `CapacityFull` from the allocator
    ///   (propagated before any session exists - nothing to roll back)
    /// - `InvariantViolation` if ticket generation keeps colliding
    pub fn open(
        &self,
        vehicle: &Vehicle,
        area_id: AreaId,
        rate: &Rate,
        officer_id: &str,
        capacity: &CapacityAllocator,
        now: DateTime<Utc>,
    ) -> EngineResult<Session> {
        let mut stripe = self
            .stripe(&vehicle.id)
            .lock()
            .expect("active reservation lock poisoned");

        // The reservation may be stale if a concurrent close has marked the
        // session completed but not yet cleared its entry; only a live
        // Active session blocks the open.
        if let Some(ticket) = stripe.get(&vehicle.id) {
            let sessions = self.sessions.read().expect("session map lock poisoned");
            if sessions.get(ticket).is_some_and(Session::is_active) {
                return Err(EngineError::AlreadyParked {
                    plate: vehicle.plate.clone(),
                    ticket: ticket.clone(),
                });
            }
        }

        capacity.acquire(area_id)?;

        let session = match self.insert_with_fresh_ticket(vehicle, area_id, rate, officer_id, now) {
            Ok(session) => session,
            Err(err) => {
                // Slot was claimed but no session exists: give it back.
                let _ = capacity.release(area_id);
                return Err(err);
            }
        };

        stripe.insert(vehicle.id.clone(), session.ticket.clone());
        Ok(session)
    }

    /// Closes a session: compute the fare, release the slot, mark completed.
    ///
    /// ## Errors
    /// - `SessionNotFound` / `SessionAlreadyClosed` on lookup
    /// - `InvalidDuration` when `now` precedes check-in (nothing mutated)
    pub fn close(
        &self,
        ticket: &str,
        capacity: &CapacityAllocator,
        now: DateTime<Utc>,
    ) -> EngineResult<Session> {
        let completed = {
            let mut sessions = self.sessions.write().expect("session map lock poisoned");
            let session =
                sessions
                    .get_mut(ticket)
                    .ok_or_else(|| EngineError::SessionNotFound {
                        ticket: ticket.to_string(),
                    })?;

            if !session.is_active() {
                return Err(EngineError::SessionAlreadyClosed {
                    ticket: ticket.to_string(),
                });
            }

            // Fare first: a clock-skew rejection must leave the session
            // active and the slot held.
            let fare = compute_fare(
                session.check_in_at,
                now,
                session.hourly_rate,
                session.daily_max_rate,
            )?;

            capacity.release(session.area_id)?;

            session.check_out_at = Some(now);
            session.billed_hours = Some(fare.billed_hours);
            session.cost = Some(fare.cost);
            session.status = SessionStatus::Completed;
            session.payment_status = PaymentStatus::Paid;
            session.clone()
        };

        // Reservation cleanup happens outside the sessions lock. Guard
        // against a racing re-open that already replaced the entry.
        let mut stripe = self
            .stripe(&completed.vehicle_id)
            .lock()
            .expect("active reservation lock poisoned");
        if stripe.get(&completed.vehicle_id).map(String::as_str) == Some(completed.ticket.as_str())
        {
            stripe.remove(&completed.vehicle_id);
        }

        Ok(completed)
    }

    /// Looks up any session, active or completed, by ticket.
    pub fn get(&self, ticket: &str) -> Option<Session> {
        self.sessions
            .read()
            .expect("session map lock poisoned")
            .get(ticket)
            .cloned()
    }

    /// All currently active sessions.
    pub fn active_sessions(&self) -> Vec<Session> {
        self.sessions
            .read()
            .expect("session map lock poisoned")
            .values()
            .filter(|s| s.is_active())
            .cloned()
            .collect()
    }

    /// The most recent session (by check-in time) for a vehicle, if any.
    pub fn latest_for_vehicle(&self, vehicle_id: &str) -> Option<Session> {
        self.sessions
            .read()
            .expect("session map lock poisoned")
            .values()
            .filter(|s| s.vehicle_id == vehicle_id)
            .max_by_key(|s| s.check_in_at)
            .cloned()
    }

    /// Total number of sessions ever opened.
    pub fn session_count(&self) -> usize {
        self.sessions.read().expect("session map lock poisoned").len()
    }

    fn stripe(&self, vehicle_id: &str) -> &Mutex<HashMap<String, String>> {
        let mut hasher = DefaultHasher::new();
        vehicle_id.hash(&mut hasher);
        &self.active[(hasher.finish() as usize) % ACTIVE_STRIPES]
    }

    /// Generates a ticket, verifying uniqueness against the session map and
    /// regenerating on collision (bounded).
    fn insert_with_fresh_ticket(
        &self,
        vehicle: &Vehicle,
        area_id: AreaId,
        rate: &Rate,
        officer_id: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<Session> {
        for attempt in 0..MAX_TICKET_ATTEMPTS {
            let ticket = self.tickets.next();
            let mut sessions = self.sessions.write().expect("session map lock poisoned");
            if sessions.contains_key(&ticket) {
                warn!(ticket = %ticket, attempt, "ticket collision, regenerating");
                continue;
            }

            let session = Session {
                ticket: ticket.clone(),
                vehicle_id: vehicle.id.clone(),
                area_id,
                rate_id: rate.id,
                officer_id: officer_id.to_string(),
                hourly_rate: rate.hourly_rate,
                daily_max_rate: rate.daily_max_rate,
                check_in_at: now,
                check_out_at: None,
                billed_hours: None,
                cost: None,
                status: SessionStatus::Active,
                payment_status: PaymentStatus::Pending,
            };
            sessions.insert(ticket, session.clone());
            return Ok(session);
        }

        Err(EngineError::InvariantViolation {
            detail: format!(
                "could not issue a unique ticket after {} attempts",
                MAX_TICKET_ATTEMPTS
            ),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use valet_core::{Area, Money, RateId};

    fn allocator(capacity: u32) -> CapacityAllocator {
        let alloc = CapacityAllocator::new();
        alloc
            .register(Area {
                id: AreaId(1),
                name: "Front Lot".to_string(),
                code: "A1".to_string(),
                capacity,
                occupied: 0,
                is_active: true,
            })
            .unwrap();
        alloc
    }

    fn motor_rate() -> Rate {
        Rate {
            id: RateId(1),
            vehicle_type: "motor".to_string(),
            hourly_rate: Money::from_minor(2000),
            daily_max_rate: Money::from_minor(10000),
        }
    }

    fn vehicle(id: &str, plate: &str) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            plate: plate.to_string(),
            vehicle_type: "motor".to_string(),
            owner_name: None,
            owner_phone: None,
            visit_count: 0,
            last_visit_at: None,
        }
    }

    #[test]
    fn test_open_close_round_trip() {
        let ledger = SessionLedger::new();
        let alloc = allocator(10);
        let v = vehicle("v1", "B 1 A");
        let t0 = Utc::now();

        let session = ledger
            .open(&v, AreaId(1), &motor_rate(), "officer-1", &alloc, t0)
            .unwrap();
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.cost, None);
        assert_eq!(alloc.occupancy(AreaId(1)).unwrap().occupied, 1);

        // 90 minutes later: 2 billed hours at 2000/h.
        let closed = ledger
            .close(&session.ticket, &alloc, t0 + Duration::minutes(90))
            .unwrap();
        assert_eq!(closed.status, SessionStatus::Completed);
        assert_eq!(closed.payment_status, PaymentStatus::Paid);
        assert_eq!(closed.billed_hours, Some(2));
        assert_eq!(closed.cost, Some(Money::from_minor(4000)));

        // Occupancy is back to its pre-open value.
        assert_eq!(alloc.occupancy(AreaId(1)).unwrap().occupied, 0);
    }

    #[test]
    fn test_second_open_for_same_vehicle_fails() {
        let ledger = SessionLedger::new();
        let alloc = allocator(10);
        let v = vehicle("v1", "B 1 A");
        let now = Utc::now();

        let first = ledger
            .open(&v, AreaId(1), &motor_rate(), "officer-1", &alloc, now)
            .unwrap();
        let err = ledger
            .open(&v, AreaId(1), &motor_rate(), "officer-1", &alloc, now)
            .unwrap_err();

        match err {
            EngineError::AlreadyParked { plate, ticket } => {
                assert_eq!(plate, "B 1 A");
                assert_eq!(ticket, first.ticket);
            }
            other => panic!("expected AlreadyParked, got {other:?}"),
        }

        // The failed open claimed nothing.
        assert_eq!(alloc.occupancy(AreaId(1)).unwrap().occupied, 1);
    }

    #[test]
    fn test_vehicle_can_reenter_after_close() {
        let ledger = SessionLedger::new();
        let alloc = allocator(10);
        let v = vehicle("v1", "B 1 A");
        let t0 = Utc::now();

        let first = ledger
            .open(&v, AreaId(1), &motor_rate(), "officer-1", &alloc, t0)
            .unwrap();
        ledger
            .close(&first.ticket, &alloc, t0 + Duration::hours(1))
            .unwrap();

        let second = ledger
            .open(&v, AreaId(1), &motor_rate(), "officer-1", &alloc, t0 + Duration::hours(2))
            .unwrap();
        assert_ne!(first.ticket, second.ticket);
    }

    #[test]
    fn test_capacity_full_leaves_no_session_or_reservation() {
        let ledger = SessionLedger::new();
        let alloc = allocator(1);
        let now = Utc::now();

        ledger
            .open(&vehicle("v1", "B 1 A"), AreaId(1), &motor_rate(), "officer-1", &alloc, now)
            .unwrap();

        let err = ledger
            .open(&vehicle("v2", "B 2 B"), AreaId(1), &motor_rate(), "officer-1", &alloc, now)
            .unwrap_err();
        assert!(matches!(err, EngineError::CapacityFull { .. }));
        assert_eq!(ledger.session_count(), 1);

        // Once the slot frees up, the rejected vehicle gets in.
        let first_ticket = ledger.active_sessions()[0].ticket.clone();
        ledger.close(&first_ticket, &alloc, now + Duration::hours(1)).unwrap();
        ledger
            .open(
                &vehicle("v2", "B 2 B"),
                AreaId(1),
                &motor_rate(),
                "officer-1",
                &alloc,
                now + Duration::hours(2),
            )
            .unwrap();
    }

    #[test]
    fn test_close_unknown_ticket() {
        let ledger = SessionLedger::new();
        let alloc = allocator(1);
        let err = ledger.close("T-000000-000000-0000-000", &alloc, Utc::now()).unwrap_err();
        assert!(matches!(err, EngineError::SessionNotFound { .. }));
    }

    #[test]
    fn test_double_close() {
        let ledger = SessionLedger::new();
        let alloc = allocator(1);
        let t0 = Utc::now();

        let session = ledger
            .open(&vehicle("v1", "B 1 A"), AreaId(1), &motor_rate(), "officer-1", &alloc, t0)
            .unwrap();
        ledger.close(&session.ticket, &alloc, t0 + Duration::hours(1)).unwrap();

        let err = ledger
            .close(&session.ticket, &alloc, t0 + Duration::hours(2))
            .unwrap_err();
        assert!(matches!(err, EngineError::SessionAlreadyClosed { .. }));

        // The double close must not release a second slot.
        assert_eq!(alloc.occupancy(AreaId(1)).unwrap().occupied, 0);
    }

    #[test]
    fn test_clock_skew_close_mutates_nothing() {
        let ledger = SessionLedger::new();
        let alloc = allocator(1);
        let t0 = Utc::now();

        let session = ledger
            .open(&vehicle("v1", "B 1 A"), AreaId(1), &motor_rate(), "officer-1", &alloc, t0)
            .unwrap();

        let err = ledger
            .close(&session.ticket, &alloc, t0 - Duration::minutes(5))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDuration(_)));

        // Session still active, slot still held; a sane clock closes it.
        assert_eq!(alloc.occupancy(AreaId(1)).unwrap().occupied, 1);
        let closed = ledger
            .close(&session.ticket, &alloc, t0 + Duration::minutes(30))
            .unwrap();
        assert_eq!(closed.billed_hours, Some(1));
    }

    #[test]
    fn test_rate_is_frozen_at_check_in() {
        let ledger = SessionLedger::new();
        let alloc = allocator(1);
        let t0 = Utc::now();

        let session = ledger
            .open(&vehicle("v1", "B 1 A"), AreaId(1), &motor_rate(), "officer-1", &alloc, t0)
            .unwrap();

        // The bill uses the rate snapshot carried in the session, so it
        // matches the rate posted at entry no matter what the rate book
        // says by check-out time.
        assert_eq!(session.hourly_rate, Money::from_minor(2000));
        assert_eq!(session.daily_max_rate, Money::from_minor(10000));

        let closed = ledger
            .close(&session.ticket, &alloc, t0 + Duration::hours(25))
            .unwrap();
        assert_eq!(closed.cost, Some(Money::from_minor(12000)));
    }

    #[test]
    fn test_latest_for_vehicle() {
        let ledger = SessionLedger::new();
        let alloc = allocator(5);
        let v = vehicle("v1", "B 1 A");
        let t0 = Utc::now();

        let first = ledger
            .open(&v, AreaId(1), &motor_rate(), "officer-1", &alloc, t0)
            .unwrap();
        ledger.close(&first.ticket, &alloc, t0 + Duration::hours(1)).unwrap();
        let second = ledger
            .open(&v, AreaId(1), &motor_rate(), "officer-1", &alloc, t0 + Duration::hours(3))
            .unwrap();

        let latest = ledger.latest_for_vehicle("v1").unwrap();
        assert_eq!(latest.ticket, second.ticket);
    }
}
