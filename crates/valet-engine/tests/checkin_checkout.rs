//! Concurrency properties of the check-in/check-out engine.
//!
//! These tests hammer one engine from many OS threads and assert the two
//! hard invariants: occupancy never exceeds capacity, and a vehicle never
//! holds two active sessions.

use std::sync::{Arc, Barrier};
use std::thread;

use valet_core::{Area, AreaId, Money};
use valet_engine::{
    CheckInRequest, CheckOutRequest, EngineError, ParkingEngine, RateBook,
};

fn engine_with_area(capacity: u32) -> Arc<ParkingEngine> {
    // Honors RUST_LOG when debugging a failing interleaving.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let rates = RateBook::new().with_rate(
        "motor",
        Money::from_minor(2000),
        Money::from_minor(10000),
    );
    let engine = ParkingEngine::new(Arc::new(rates));
    engine
        .register_area(Area {
            id: AreaId(1),
            name: "Front Lot".to_string(),
            code: "A1".to_string(),
            capacity,
            occupied: 0,
            is_active: true,
        })
        .unwrap();
    Arc::new(engine)
}

fn check_in(plate: &str) -> CheckInRequest {
    CheckInRequest {
        plate: plate.to_string(),
        vehicle_type: "motor".to_string(),
        area_id: AreaId(1),
        owner_name: None,
        owner_phone: None,
        officer_id: "officer-1".to_string(),
    }
}

#[test]
fn concurrent_check_ins_for_one_slot_admit_exactly_one() {
    // Area capacity 1, two different vehicles racing: exactly one succeeds,
    // the other sees CapacityFull.
    for _ in 0..50 {
        let engine = engine_with_area(1);
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = ["B 1 A", "B 2 B"]
            .into_iter()
            .map(|plate| {
                let engine = engine.clone();
                let barrier = barrier.clone();
                let request = check_in(plate);
                thread::spawn(move || {
                    barrier.wait();
                    engine.check_in(request)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one racer should win the slot");
        assert!(results.iter().any(|r| matches!(
            r,
            Err(EngineError::CapacityFull { .. })
        )));
        assert_eq!(engine.occupancy(AreaId(1)).unwrap().occupied, 1);
    }
}

#[test]
fn concurrent_check_ins_for_same_vehicle_admit_exactly_one() {
    // Same plate from two desks at once: at most one active session.
    for _ in 0..50 {
        let engine = engine_with_area(10);
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let engine = engine.clone();
                let barrier = barrier.clone();
                let request = check_in("B 1234 XY");
                thread::spawn(move || {
                    barrier.wait();
                    engine.check_in(request)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(EngineError::AlreadyParked { .. })
        )));
        assert_eq!(engine.parked().len(), 1);
        assert_eq!(engine.occupancy(AreaId(1)).unwrap().occupied, 1);
    }
}

#[test]
fn occupancy_never_exceeds_capacity_under_load() {
    // 32 vehicles fight over 8 slots, checking in and out repeatedly.
    // Whatever the interleaving, admissions never exceed free slots.
    let capacity = 8;
    let engine = engine_with_area(capacity);
    let barrier = Arc::new(Barrier::new(32));

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let engine = engine.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let plate = format!("B {} ZZ", i);
                let mut admitted = 0u32;
                for _ in 0..20 {
                    match engine.check_in(check_in(&plate)) {
                        Ok(session) => {
                            admitted += 1;
                            let occupied =
                                engine.occupancy(AreaId(1)).unwrap().occupied;
                            assert!(
                                occupied <= capacity,
                                "occupancy {occupied} exceeded capacity {capacity}"
                            );
                            engine
                                .check_out(CheckOutRequest {
                                    ticket: session.ticket,
                                })
                                .unwrap();
                        }
                        Err(EngineError::CapacityFull { .. }) => {}
                        Err(other) => panic!("unexpected failure: {other}"),
                    }
                }
                admitted
            })
        })
        .collect();

    let total_admitted: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert!(total_admitted > 0, "nobody ever got in");

    // Every admission was paired with a check-out: the lot ends empty.
    assert_eq!(engine.occupancy(AreaId(1)).unwrap().occupied, 0);
    assert!(engine.parked().is_empty());
}

#[test]
fn tickets_stay_unique_under_concurrent_check_ins() {
    let engine = engine_with_area(64);
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let engine = engine.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let session = engine.check_in(check_in(&format!("B {} QQ", i))).unwrap();
                session.ticket
            })
        })
        .collect();

    let tickets: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let mut deduped = tickets.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), tickets.len(), "duplicate ticket issued");
}

#[test]
fn open_close_round_trip_restores_occupancy() {
    let engine = engine_with_area(10);
    let before = engine.occupancy(AreaId(1)).unwrap().occupied;

    let session = engine.check_in(check_in("B 77 RT")).unwrap();
    assert_eq!(engine.occupancy(AreaId(1)).unwrap().occupied, before + 1);

    engine
        .check_out(CheckOutRequest {
            ticket: session.ticket,
        })
        .unwrap();
    assert_eq!(engine.occupancy(AreaId(1)).unwrap().occupied, before);
}
