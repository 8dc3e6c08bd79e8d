// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Restaurants, zones, and tables.

use tablebook_persistence::Persistence;

use crate::{
    ApiError, AuthenticatedActor, CreateRestaurantRequest, CreateTableRequest, CreateZoneRequest,
    RestaurantInfo, TableInfo, UpdateRestaurantRequest, UpdateTableRequest, UpdateZoneRequest,
    ZoneInfo, create_reservation, create_restaurant, create_table, create_zone, delete_restaurant,
    delete_table, delete_zone, get_table, list_restaurant_zones, list_zone_tables,
    update_restaurant, update_table, update_zone,
};

use super::helpers::{
    Venue, create_reservation_request, create_test_admin, create_test_customer,
    create_test_restaurant, create_test_supervisor, setup_test_persistence, setup_test_venue,
};

fn table_request(restaurant_id: i64, name: &str) -> CreateTableRequest {
    CreateTableRequest {
        restaurant_id,
        zone_id: None,
        name: name.to_string(),
        capacity: 2,
        status: None,
    }
}

fn restaurant_request(name: &str, supervisor_email: &str) -> CreateRestaurantRequest {
    CreateRestaurantRequest {
        name: name.to_string(),
        business_name: Some(String::from("Test Holdings")),
        business_email: Some(String::from("books@tablebook.test")),
        food_type: None,
        phone: None,
        description: None,
        capacity: 40,
        supervisor_id: None,
        supervisor_email: Some(supervisor_email.to_string()),
        opening_time: None,
        closing_time: None,
        status: None,
        zones: vec![String::from("Main"), String::from("Patio")],
    }
}

#[test]
fn test_create_restaurant_with_zones_by_supervisor_email() {
    let mut persistence: Persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let supervisor: AuthenticatedActor =
        create_test_supervisor(&mut persistence, "host@tablebook.test");

    let restaurant: RestaurantInfo = create_restaurant(
        &mut persistence,
        restaurant_request("Harbor House", "HOST@tablebook.test"),
        &admin,
    )
    .unwrap();

    assert_eq!(restaurant.supervisor_id, supervisor.user_id());
    assert_eq!(restaurant.status, "active");
    let zones = list_restaurant_zones(&mut persistence, restaurant.restaurant_id, &supervisor)
        .unwrap();
    let names: Vec<&str> = zones.zones.iter().map(|z: &ZoneInfo| z.name.as_str()).collect();
    assert_eq!(names, vec!["Main", "Patio"]);
}

#[test]
fn test_create_restaurant_requires_a_supervisor_account() {
    let mut persistence: Persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let customer: AuthenticatedActor = create_test_customer(&mut persistence, "guest@tablebook.test");

    let mut missing: CreateRestaurantRequest = restaurant_request("Harbor House", "x@y.test");
    missing.supervisor_email = None;
    assert!(matches!(
        create_restaurant(&mut persistence, missing, &admin),
        Err(ApiError::InvalidInput { field, .. }) if field == "supervisor_id"
    ));

    let mut not_staff: CreateRestaurantRequest = restaurant_request("Harbor House", "x@y.test");
    not_staff.supervisor_email = None;
    not_staff.supervisor_id = Some(customer.user_id());
    assert!(matches!(
        create_restaurant(&mut persistence, not_staff, &admin),
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "supervisor_role"
    ));

    assert!(persistence.list_restaurants().unwrap().is_empty());
}

#[test]
fn test_create_restaurant_validates_fields() {
    let mut persistence: Persistence = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    create_test_supervisor(&mut persistence, "host@tablebook.test");

    let mut zero_capacity: CreateRestaurantRequest =
        restaurant_request("Harbor House", "host@tablebook.test");
    zero_capacity.capacity = 0;
    assert!(matches!(
        create_restaurant(&mut persistence, zero_capacity, &admin),
        Err(ApiError::InvalidInput { field, .. }) if field == "capacity"
    ));

    let mut inverted: CreateRestaurantRequest =
        restaurant_request("Harbor House", "host@tablebook.test");
    inverted.opening_time = Some(String::from("22:00"));
    inverted.closing_time = Some(String::from("10:00"));
    assert!(matches!(
        create_restaurant(&mut persistence, inverted, &admin),
        Err(ApiError::InvalidInput { field, .. }) if field == "opening_hours"
    ));

    let mut duplicate_zone: CreateRestaurantRequest =
        restaurant_request("Harbor House", "host@tablebook.test");
    duplicate_zone.zones = vec![String::from("Main"), String::from("Main")];
    assert!(matches!(
        create_restaurant(&mut persistence, duplicate_zone, &admin),
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "unique_zone_name"
    ));

    assert!(persistence.list_restaurants().unwrap().is_empty());
}

#[test]
fn test_update_restaurant_checks_merged_opening_hours() {
    let mut persistence: Persistence = setup_test_persistence();
    let venue: Venue = setup_test_venue(&mut persistence);

    let result = update_restaurant(
        &mut persistence,
        venue.restaurant.restaurant_id,
        UpdateRestaurantRequest {
            closing_time: Some(String::from("09:00")),
            ..UpdateRestaurantRequest::default()
        },
        &venue.supervisor,
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "opening_hours"
    ));
}

#[test]
fn test_duplicate_table_name_is_rejected_without_insert() {
    let mut persistence: Persistence = setup_test_persistence();
    let venue: Venue = setup_test_venue(&mut persistence);
    let restaurant_id: i64 = venue.restaurant.restaurant_id;

    create_table(
        &mut persistence,
        table_request(restaurant_id, "Booth"),
        &venue.supervisor,
    )
    .unwrap();
    let second = create_table(
        &mut persistence,
        table_request(restaurant_id, "Booth"),
        &venue.supervisor,
    );

    assert!(matches!(
        second,
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "unique_table_name"
    ));
    let booths: usize = persistence
        .list_tables_for_restaurant(restaurant_id)
        .unwrap()
        .iter()
        .filter(|t| t.name == "Booth")
        .count();
    assert_eq!(booths, 1);
}

#[test]
fn test_same_table_name_in_other_restaurant_is_fine() {
    let mut persistence: Persistence = setup_test_persistence();
    let venue: Venue = setup_test_venue(&mut persistence);
    let other: RestaurantInfo = create_test_restaurant(
        &mut persistence,
        &venue.admin,
        venue.supervisor.user_id(),
        "Second Sitting",
    );

    let table: TableInfo = create_table(
        &mut persistence,
        table_request(other.restaurant_id, "T1"),
        &venue.supervisor,
    )
    .unwrap();

    assert_eq!(table.restaurant_id, other.restaurant_id);
    assert_eq!(table.status, "available");
}

#[test]
fn test_table_zone_must_belong_to_same_restaurant() {
    let mut persistence: Persistence = setup_test_persistence();
    let venue: Venue = setup_test_venue(&mut persistence);
    let other: RestaurantInfo = create_test_restaurant(
        &mut persistence,
        &venue.admin,
        venue.supervisor.user_id(),
        "Second Sitting",
    );
    let foreign_zone: ZoneInfo = create_zone(
        &mut persistence,
        CreateZoneRequest {
            restaurant_id: other.restaurant_id,
            name: String::from("Cellar"),
        },
        &venue.supervisor,
    )
    .unwrap();

    let mut request: CreateTableRequest =
        table_request(venue.restaurant.restaurant_id, "Corner");
    request.zone_id = Some(foreign_zone.zone_id);

    assert!(matches!(
        create_table(&mut persistence, request, &venue.supervisor),
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "zone_in_restaurant"
    ));
}

#[test]
fn test_zone_lifecycle() {
    let mut persistence: Persistence = setup_test_persistence();
    let venue: Venue = setup_test_venue(&mut persistence);
    let restaurant_id: i64 = venue.restaurant.restaurant_id;

    let zone: ZoneInfo = create_zone(
        &mut persistence,
        CreateZoneRequest {
            restaurant_id,
            name: String::from("Bar"),
        },
        &venue.supervisor,
    )
    .unwrap();
    let duplicate = create_zone(
        &mut persistence,
        CreateZoneRequest {
            restaurant_id,
            name: String::from("Bar"),
        },
        &venue.supervisor,
    );
    assert!(matches!(duplicate, Err(ApiError::DomainRuleViolation { .. })));

    let mut request: CreateTableRequest = table_request(restaurant_id, "Stool 1");
    request.zone_id = Some(zone.zone_id);
    let table: TableInfo = create_table(&mut persistence, request, &venue.supervisor).unwrap();

    let renamed: ZoneInfo = update_zone(
        &mut persistence,
        zone.zone_id,
        UpdateZoneRequest {
            name: String::from("Lounge"),
        },
        &venue.supervisor,
    )
    .unwrap();
    assert_eq!(renamed.name, "Lounge");

    let in_zone = list_zone_tables(&mut persistence, zone.zone_id, &venue.supervisor).unwrap();
    assert_eq!(in_zone.tables.len(), 1);

    delete_zone(&mut persistence, zone.zone_id, &venue.supervisor).unwrap();
    let detached: TableInfo = get_table(&mut persistence, table.table_id, &venue.supervisor).unwrap();
    assert_eq!(detached.zone_id, None);
}

#[test]
fn test_update_table_detaches_zone_with_explicit_null() {
    let mut persistence: Persistence = setup_test_persistence();
    let venue: Venue = setup_test_venue(&mut persistence);
    let zone: ZoneInfo = create_zone(
        &mut persistence,
        CreateZoneRequest {
            restaurant_id: venue.restaurant.restaurant_id,
            name: String::from("Garden"),
        },
        &venue.supervisor,
    )
    .unwrap();

    let attached: TableInfo = update_table(
        &mut persistence,
        venue.first_table.table_id,
        UpdateTableRequest {
            zone_id: Some(Some(zone.zone_id)),
            ..UpdateTableRequest::default()
        },
        &venue.supervisor,
    )
    .unwrap();
    assert_eq!(attached.zone_id, Some(zone.zone_id));

    let request: UpdateTableRequest = serde_json::from_str(r#"{"zone_id": null}"#).unwrap();
    let detached: TableInfo = update_table(
        &mut persistence,
        venue.first_table.table_id,
        request,
        &venue.supervisor,
    )
    .unwrap();
    assert_eq!(detached.zone_id, None);
}

#[test]
fn test_held_statuses_cannot_be_set_by_hand() {
    let mut persistence: Persistence = setup_test_persistence();
    let venue: Venue = setup_test_venue(&mut persistence);

    let result = update_table(
        &mut persistence,
        venue.first_table.table_id,
        UpdateTableRequest {
            status: Some(String::from("reserved")),
            ..UpdateTableRequest::default()
        },
        &venue.supervisor,
    );
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "status"
    ));

    let maintenance: TableInfo = update_table(
        &mut persistence,
        venue.first_table.table_id,
        UpdateTableRequest {
            status: Some(String::from("maintenance")),
            ..UpdateTableRequest::default()
        },
        &venue.supervisor,
    )
    .unwrap();
    assert_eq!(maintenance.status, "maintenance");
}

#[test]
fn test_held_table_cannot_be_changed_or_deleted() {
    let mut persistence: Persistence = setup_test_persistence();
    let venue: Venue = setup_test_venue(&mut persistence);
    create_reservation(
        &mut persistence,
        create_reservation_request(
            venue.restaurant.restaurant_id,
            vec![venue.first_table.table_id],
        ),
        &venue.customer,
    )
    .unwrap();

    let status_change = update_table(
        &mut persistence,
        venue.first_table.table_id,
        UpdateTableRequest {
            status: Some(String::from("maintenance")),
            ..UpdateTableRequest::default()
        },
        &venue.supervisor,
    );
    assert!(matches!(
        status_change,
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "table_held"
    ));

    let deletion = delete_table(&mut persistence, venue.first_table.table_id, &venue.supervisor);
    assert!(matches!(
        deletion,
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "table_held"
    ));

    delete_table(&mut persistence, venue.second_table.table_id, &venue.supervisor).unwrap();
    assert!(
        persistence
            .get_table(venue.second_table.table_id)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_restaurant_deletion_blocked_by_active_reservations() {
    let mut persistence: Persistence = setup_test_persistence();
    let venue: Venue = setup_test_venue(&mut persistence);
    let restaurant_id: i64 = venue.restaurant.restaurant_id;
    let reservation = create_reservation(
        &mut persistence,
        create_reservation_request(restaurant_id, vec![venue.first_table.table_id]),
        &venue.customer,
    )
    .unwrap();

    assert!(matches!(
        delete_restaurant(&mut persistence, restaurant_id, &venue.admin),
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "no_active_reservations"
    ));

    crate::delete_reservation(&mut persistence, reservation.reservation_id, &venue.customer)
        .unwrap();
    delete_restaurant(&mut persistence, restaurant_id, &venue.admin).unwrap();

    assert!(persistence.get_restaurant(restaurant_id).unwrap().is_none());
    assert!(
        persistence
            .list_tables_for_restaurant(restaurant_id)
            .unwrap()
            .is_empty()
    );
}
