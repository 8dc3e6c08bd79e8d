// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, ReservationStatus, RestaurantStatus, TableStatus};
use std::str::FromStr;

const ALL_RESERVATION_STATUSES: [ReservationStatus; 6] = [
    ReservationStatus::Pending,
    ReservationStatus::Confirmed,
    ReservationStatus::Seated,
    ReservationStatus::Completed,
    ReservationStatus::Canceled,
    ReservationStatus::NoShow,
];

#[test]
fn test_reservation_status_string_round_trip() {
    for status in ALL_RESERVATION_STATUSES {
        let parsed: ReservationStatus = ReservationStatus::from_str(status.as_str()).unwrap();
        assert_eq!(parsed, status);
    }
}

#[test]
fn test_reservation_status_aliases() {
    assert_eq!(
        ReservationStatus::from_str("cancelled").unwrap(),
        ReservationStatus::Canceled
    );
    assert_eq!(
        ReservationStatus::from_str("closed").unwrap(),
        ReservationStatus::Completed
    );
    let parsed: ReservationStatus = serde_json::from_str("\"cancelled\"").unwrap();
    assert_eq!(parsed, ReservationStatus::Canceled);
}

#[test]
fn test_reservation_status_rejects_unknown() {
    let result: Result<ReservationStatus, DomainError> = ReservationStatus::from_str("booked");
    assert_eq!(
        result,
        Err(DomainError::InvalidReservationStatus(String::from("booked")))
    );
}

#[test]
fn test_happy_path_transitions() {
    assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Confirmed));
    assert!(ReservationStatus::Confirmed.can_transition_to(ReservationStatus::Seated));
    assert!(ReservationStatus::Seated.can_transition_to(ReservationStatus::Completed));
}

#[test]
fn test_cancellation_and_no_show_transitions() {
    assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Canceled));
    assert!(ReservationStatus::Confirmed.can_transition_to(ReservationStatus::Canceled));
    assert!(ReservationStatus::Confirmed.can_transition_to(ReservationStatus::NoShow));
    assert!(ReservationStatus::Seated.can_transition_to(ReservationStatus::NoShow));

    assert!(!ReservationStatus::Seated.can_transition_to(ReservationStatus::Canceled));
    assert!(!ReservationStatus::Pending.can_transition_to(ReservationStatus::NoShow));
    assert!(!ReservationStatus::Pending.can_transition_to(ReservationStatus::Seated));
}

#[test]
fn test_terminal_statuses_do_not_move() {
    for from in ALL_RESERVATION_STATUSES.iter().filter(|s| s.is_terminal()) {
        for to in ALL_RESERVATION_STATUSES {
            if *from == to {
                continue;
            }
            assert!(
                from.validate_transition(to).is_err(),
                "{from} -> {to} should be rejected"
            );
        }
    }
}

#[test]
fn test_same_status_is_a_no_op() {
    for status in ALL_RESERVATION_STATUSES {
        assert!(status.can_transition_to(status));
    }
}

#[test]
fn test_table_hold_follows_status() {
    assert_eq!(
        ReservationStatus::Pending.table_hold(),
        Some(TableStatus::Reserved)
    );
    assert_eq!(
        ReservationStatus::Confirmed.table_hold(),
        Some(TableStatus::Reserved)
    );
    assert_eq!(
        ReservationStatus::Seated.table_hold(),
        Some(TableStatus::Occupied)
    );
    assert_eq!(ReservationStatus::Canceled.table_hold(), None);
    assert_eq!(ReservationStatus::Completed.table_hold(), None);
    assert_eq!(ReservationStatus::NoShow.table_hold(), None);
}

#[test]
fn test_staff_only_statuses() {
    assert!(ReservationStatus::Confirmed.requires_staff());
    assert!(ReservationStatus::Seated.requires_staff());
    assert!(!ReservationStatus::Canceled.requires_staff());
    assert!(!ReservationStatus::Pending.requires_staff());
}

#[test]
fn test_restaurant_status_strings_with_spaces() {
    assert_eq!(
        RestaurantStatus::from_str("tables available").unwrap(),
        RestaurantStatus::TablesAvailable
    );
    assert_eq!(RestaurantStatus::FullyBooked.as_str(), "fully booked");
    let json: String = serde_json::to_string(&RestaurantStatus::FullyBooked).unwrap();
    assert_eq!(json, "\"fully booked\"");
    assert!(RestaurantStatus::from_str("open").is_err());
}

#[test]
fn test_table_status_parsing() {
    assert_eq!(
        TableStatus::from_str("unavailable").unwrap(),
        TableStatus::Reserved
    );
    assert!(TableStatus::Reserved.is_held());
    assert!(TableStatus::Occupied.is_held());
    assert!(!TableStatus::Maintenance.is_held());
    assert!(TableStatus::from_str("broken").is_err());
}
