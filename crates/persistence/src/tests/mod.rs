// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod backend_validation_tests;
mod initialization_tests;

use tablebook_domain::{Email, ReservationStatus, RestaurantStatus, Role, TableSet, TableStatus};

use crate::{
    NewReservation, NewRestaurant, NewTable, NewUser, Persistence, RestaurantData, TableData,
    UserData,
};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn create_test_user(persistence: &mut Persistence, email: &str, role: Role) -> UserData {
    persistence
        .create_user(&NewUser {
            name: format!("User {email}"),
            email: Email::parse(email).expect("valid email"),
            password: String::from("correct horse battery"),
            role,
            created_by: None,
            phone: None,
        })
        .expect("user created")
}

pub fn create_test_restaurant(
    persistence: &mut Persistence,
    supervisor_id: i64,
    name: &str,
) -> RestaurantData {
    persistence
        .create_restaurant(&NewRestaurant {
            name: name.to_string(),
            business_name: None,
            business_email: None,
            food_type: Some(String::from("Bistro")),
            phone: None,
            description: None,
            capacity: 40,
            supervisor_id,
            opening_time: Some(String::from("09:00")),
            closing_time: Some(String::from("22:00")),
            status: RestaurantStatus::Active,
            zones: vec![String::from("Terrace"), String::from("Main Hall")],
        })
        .expect("restaurant created")
}

pub fn create_test_table(
    persistence: &mut Persistence,
    restaurant_id: i64,
    name: &str,
    capacity: u32,
) -> TableData {
    persistence
        .create_table(&NewTable {
            restaurant_id,
            zone_id: None,
            name: name.to_string(),
            capacity,
            status: TableStatus::Available,
        })
        .expect("table created")
}

pub fn create_test_booking(
    user_id: i64,
    restaurant_id: i64,
    table_ids: &[i64],
    party_size: Option<u32>,
) -> NewReservation {
    NewReservation {
        user_id,
        restaurant_id,
        reservation_at: String::from("2030-06-01T19:30:00Z"),
        party_size,
        comment: None,
        status: ReservationStatus::Pending,
        table_hold: TableStatus::Reserved,
        tables: TableSet::new(table_ids.iter().copied()).expect("non-empty table set"),
    }
}

/// A supervisor, a customer, and a restaurant with two tables of four.
pub struct Venue {
    pub persistence: Persistence,
    pub supervisor: UserData,
    pub customer: UserData,
    pub restaurant: RestaurantData,
    pub table_a: TableData,
    pub table_b: TableData,
}

pub fn create_test_venue() -> Venue {
    let mut persistence: Persistence = create_test_persistence();
    let supervisor: UserData =
        create_test_user(&mut persistence, "sup@example.com", Role::Supervisor);
    let customer: UserData = create_test_user(&mut persistence, "guest@example.com", Role::Customer);
    let restaurant: RestaurantData =
        create_test_restaurant(&mut persistence, supervisor.user_id, "Chez Test");
    let table_a: TableData = create_test_table(&mut persistence, restaurant.restaurant_id, "T1", 4);
    let table_b: TableData = create_test_table(&mut persistence, restaurant.restaurant_id, "T2", 4);

    Venue {
        persistence,
        supervisor,
        customer,
        restaurant,
        table_a,
        table_b,
    }
}
