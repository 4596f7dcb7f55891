//! Spot layout, nearest-spot allocation and floor selection

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use parking_sim::simulation::{
    allocate, count_available, layout_spots, Credential, ErrorKind, FloorConfig, FloorNumber,
    LotConfig, ManualClock, ParkingError, ParkingFloor, ParkingLot, Spot, SpotId, SpotRequest,
    TicketId, VehicleCategory,
};

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    ))
}

fn spot(id: &str, handicap: bool, reserved: bool, proximity: u32) -> Spot {
    Spot::new(SpotId(id.to_string()), handicap, reserved, proximity)
}

#[test]
fn test_layout_assigns_handicap_then_reserved() {
    let spots = layout_spots(VehicleCategory::Car, FloorNumber(1), 10, 2, 3);
    assert_eq!(spots.len(), 10);

    let handicap: Vec<u32> = spots.iter().filter(|s| s.handicap).map(|s| s.proximity).collect();
    let reserved: Vec<u32> = spots.iter().filter(|s| s.reserved).map(|s| s.proximity).collect();
    assert_eq!(handicap, vec![1, 2]);
    assert_eq!(reserved, vec![3, 4, 5]);
    assert!(spots.iter().all(|s| !(s.handicap && s.reserved)));
    assert!(spots.iter().all(|s| !s.is_occupied()));

    assert_eq!(spots[0].id, SpotId("CAR-F1-1".to_string()));
    assert_eq!(spots[9].id, SpotId("CAR-F1-10".to_string()));
}

#[test]
fn test_spot_double_occupy_and_double_release_fail() {
    let mut s = spot("S1", false, false, 1);
    s.occupy(TicketId(1)).unwrap();

    let err = s.occupy(TicketId(2)).unwrap_err();
    assert!(matches!(err, ParkingError::SpotAlreadyOccupied(_)));
    assert_eq!(err.kind(), ErrorKind::State);

    // Only the holder may release
    let err = s.release(TicketId(2)).unwrap_err();
    assert!(matches!(err, ParkingError::SpotHeldByOtherTicket { .. }));
    assert_eq!(s.occupant(), Some(TicketId(1)));

    s.release(TicketId(1)).unwrap();
    let err = s.release(TicketId(1)).unwrap_err();
    assert!(matches!(err, ParkingError::SpotAlreadyFree(_)));
    assert_eq!(err.kind(), ErrorKind::State);
}

#[test]
fn test_allocate_picks_lowest_proximity() {
    let spots = vec![
        spot("A", false, false, 7),
        spot("B", false, false, 3),
        spot("C", false, false, 5),
    ];
    let index = allocate(&spots, &SpotRequest::standard()).unwrap();
    assert_eq!(index, Some(1));
}

#[test]
fn test_allocate_tie_goes_to_first_in_floor_order() {
    let spots = vec![
        spot("A", false, false, 4),
        spot("B", false, false, 2),
        spot("C", false, false, 2),
    ];
    let index = allocate(&spots, &SpotRequest::standard()).unwrap();
    assert_eq!(index, Some(1));
}

#[test]
fn test_allocate_skips_occupied_and_non_matching() {
    let mut spots = vec![
        spot("H1", true, false, 1),
        spot("H2", true, false, 2),
        spot("R1", false, true, 3),
        spot("N1", false, false, 4),
    ];
    spots[0].occupy(TicketId(10)).unwrap();

    let handicap = allocate(&spots, &SpotRequest::handicap(true)).unwrap();
    assert_eq!(handicap, Some(1));

    let reserved = allocate(&spots, &SpotRequest::reserved(true)).unwrap();
    assert_eq!(reserved, Some(2));

    // A regular request may use any free spot, restricted or not
    let regular = allocate(&spots, &SpotRequest::standard()).unwrap();
    assert_eq!(regular, Some(1));
}

#[test]
fn test_allocate_returns_none_when_nothing_matches() {
    let spots = vec![spot("N1", false, false, 1), spot("N2", false, false, 2)];
    assert_eq!(allocate(&spots, &SpotRequest::handicap(true)).unwrap(), None);
    assert_eq!(allocate(&[], &SpotRequest::standard()).unwrap(), None);
}

#[test]
fn test_allocate_without_credentials_is_permission_error() {
    let spots = layout_spots(VehicleCategory::Car, FloorNumber(1), 10, 2, 2);

    let err = allocate(&spots, &SpotRequest::handicap(false)).unwrap_err();
    assert!(matches!(err, ParkingError::Permission(Credential::HandicapPermit)));
    assert_eq!(err.kind(), ErrorKind::Permission);

    let err = allocate(&spots, &SpotRequest::reserved(false)).unwrap_err();
    assert!(matches!(err, ParkingError::Permission(Credential::Reservation)));

    assert!(spots.iter().all(|s| !s.is_occupied()));
}

#[test]
fn test_count_available_by_flags() {
    let mut spots = layout_spots(VehicleCategory::Bike, FloorNumber(1), 20, 3, 4);
    assert_eq!(count_available(&spots, false, false), 20);
    assert_eq!(count_available(&spots, true, false), 3);
    assert_eq!(count_available(&spots, false, true), 4);
    assert_eq!(count_available(&spots, true, true), 0);

    spots[0].occupy(TicketId(1)).unwrap();
    spots[5].occupy(TicketId(2)).unwrap();
    assert_eq!(count_available(&spots, false, false), 18);
    assert_eq!(count_available(&spots, true, false), 2);
    assert_eq!(count_available(&spots, false, true), 3);
}

#[test]
fn test_floor_claim_occupies_closest_spot() {
    let floor = ParkingFloor::new(VehicleCategory::Car, FloorNumber(3), 5, 1, 1);
    let claimed = floor
        .claim_spot(&SpotRequest::reserved(true), || TicketId(42))
        .unwrap();
    assert_eq!(claimed, Some((SpotId("CAR-F3-2".to_string()), TicketId(42))));
    assert_eq!(floor.occupied_count().unwrap(), 1);
    assert_eq!(
        floor.occupant_of(&SpotId("CAR-F3-2".to_string())).unwrap(),
        Some(TicketId(42))
    );
}

#[test]
fn test_floor_claim_on_full_floor_draws_no_ticket() {
    let floor = ParkingFloor::new(VehicleCategory::Heavy, FloorNumber(1), 1, 0, 0);
    floor
        .claim_spot(&SpotRequest::standard(), || TicketId(1))
        .unwrap();

    let mut drawn = false;
    let claimed = floor
        .claim_spot(&SpotRequest::standard(), || {
            drawn = true;
            TicketId(2)
        })
        .unwrap();
    assert_eq!(claimed, None);
    assert!(!drawn);
}

#[test]
fn test_occupied_count_never_exceeds_capacity() {
    let floor = ParkingFloor::new(VehicleCategory::Bike, FloorNumber(1), 4, 1, 1);
    let mut ticket = 0;
    for _ in 0..10 {
        ticket += 1;
        let _ = floor.claim_spot(&SpotRequest::standard(), || TicketId(ticket));
        let occupied = floor.occupied_count().unwrap();
        assert!(occupied <= floor.capacity());
    }
    assert_eq!(floor.occupied_count().unwrap(), 4);
    assert_eq!(floor.available_count(false, false).unwrap(), 0);
}

#[test]
fn test_select_floor_prefers_most_available() {
    let config = LotConfig::empty()
        .with_floor(FloorConfig::new(VehicleCategory::Car, 1, 5, 0, 0))
        .with_floor(FloorConfig::new(VehicleCategory::Car, 2, 8, 0, 0))
        .with_floor(FloorConfig::new(VehicleCategory::Car, 3, 6, 0, 0));
    let lot = ParkingLot::from_config(&config, clock()).unwrap();

    let floor = lot
        .select_floor(VehicleCategory::Car, false, false)
        .unwrap()
        .unwrap();
    assert_eq!(floor.number, FloorNumber(2));
}

#[test]
fn test_select_floor_tie_goes_to_first_registered() {
    let config = LotConfig::empty()
        .with_floor(FloorConfig::new(VehicleCategory::Car, 7, 10, 2, 0))
        .with_floor(FloorConfig::new(VehicleCategory::Car, 4, 10, 2, 0));
    let lot = ParkingLot::from_config(&config, clock()).unwrap();

    let floor = lot
        .select_floor(VehicleCategory::Car, true, false)
        .unwrap()
        .unwrap();
    assert_eq!(floor.number, FloorNumber(7));
}

#[test]
fn test_select_floor_counts_only_matching_spots() {
    let config = LotConfig::empty()
        .with_floor(FloorConfig::new(VehicleCategory::Car, 1, 50, 1, 0))
        .with_floor(FloorConfig::new(VehicleCategory::Car, 2, 10, 3, 0));
    let lot = ParkingLot::from_config(&config, clock()).unwrap();

    let regular = lot
        .select_floor(VehicleCategory::Car, false, false)
        .unwrap()
        .unwrap();
    assert_eq!(regular.number, FloorNumber(1));

    let handicap = lot
        .select_floor(VehicleCategory::Car, true, false)
        .unwrap()
        .unwrap();
    assert_eq!(handicap.number, FloorNumber(2));
}

#[test]
fn test_select_floor_none_when_nothing_free() {
    let config = LotConfig::empty().with_floor(FloorConfig::new(VehicleCategory::Heavy, 1, 3, 0, 0));
    let lot = ParkingLot::from_config(&config, clock()).unwrap();

    let selected = lot.select_floor(VehicleCategory::Heavy, false, true).unwrap();
    assert!(selected.is_none());
}

#[test]
fn test_select_floor_unknown_category() {
    let config = LotConfig::empty().with_floor(FloorConfig::new(VehicleCategory::Car, 1, 3, 0, 0));
    let lot = ParkingLot::from_config(&config, clock()).unwrap();

    let err = lot.select_floor(VehicleCategory::Bike, false, false).unwrap_err();
    assert!(matches!(err, ParkingError::UnknownCategory(VehicleCategory::Bike)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_layout_validation() {
    let mut lot = ParkingLot::new(clock());
    lot.add_floor(&FloorConfig::new(VehicleCategory::Car, 1, 10, 2, 2))
        .unwrap();

    let err = lot
        .add_floor(&FloorConfig::new(VehicleCategory::Car, 1, 10, 0, 0))
        .unwrap_err();
    assert!(matches!(err, ParkingError::DuplicateFloor { .. }));
    assert_eq!(err.kind(), ErrorKind::Layout);

    // Same number is fine for another category
    lot.add_floor(&FloorConfig::new(VehicleCategory::Bike, 1, 10, 0, 0))
        .unwrap();

    let err = lot
        .add_floor(&FloorConfig::new(VehicleCategory::Heavy, 1, 3, 2, 2))
        .unwrap_err();
    assert!(matches!(
        err,
        ParkingError::RestrictedExceedsCapacity {
            restricted: 4,
            capacity: 3,
            ..
        }
    ));
    assert_eq!(lot.total_capacity(), 20);
}

#[test]
fn test_huge_restricted_counts_are_rejected() {
    let mut lot = ParkingLot::new(clock());

    let err = lot
        .add_floor(&FloorConfig::new(VehicleCategory::Car, 1, 10, u32::MAX, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        ParkingError::RestrictedExceedsCapacity { capacity: 10, .. }
    ));
    assert_eq!(err.kind(), ErrorKind::Layout);
    assert!(lot.floors(VehicleCategory::Car).is_err());

    // Building the layout directly does not overflow either
    let spots = layout_spots(VehicleCategory::Car, FloorNumber(1), 4, u32::MAX, u32::MAX);
    assert_eq!(spots.len(), 4);
    assert!(spots.iter().all(|s| s.handicap && !s.reserved));

    let spots = layout_spots(VehicleCategory::Car, FloorNumber(1), 4, 1, u32::MAX);
    assert!(spots[0].handicap);
    assert!(spots[1..].iter().all(|s| s.reserved));
}

#[test]
fn test_default_availability_board() {
    let lot = ParkingLot::from_config(&LotConfig::default(), clock()).unwrap();
    let rows = lot.availability().unwrap();

    let summary: Vec<(VehicleCategory, u32, usize, usize, usize)> = rows
        .iter()
        .map(|r| (r.category, r.floor.0, r.regular, r.handicap, r.reserved))
        .collect();
    assert_eq!(
        summary,
        vec![
            (VehicleCategory::Car, 1, 50, 5, 5),
            (VehicleCategory::Car, 2, 50, 5, 5),
            (VehicleCategory::Bike, 1, 100, 10, 10),
            (VehicleCategory::Heavy, 1, 20, 2, 2),
        ]
    );
    assert_eq!(
        lot.available_count(VehicleCategory::Car, FloorNumber(2), true, false)
            .unwrap(),
        5
    );
    assert!(matches!(
        lot.available_count(VehicleCategory::Car, FloorNumber(9), false, false),
        Err(ParkingError::UnknownFloor { .. })
    ));
}
