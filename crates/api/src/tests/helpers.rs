// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use tablebook_domain::{Email, Role};
use tablebook_persistence::{NewUser, Persistence, UserData};

use crate::{
    AuthenticatedActor, CreateReservationRequest, CreateRestaurantRequest, CreateTableRequest,
    RestaurantInfo, TableInfo, create_restaurant, create_table,
};

/// Password shared by every seeded account.
pub const TEST_PASSWORD: &str = "Tables4Two!";

/// A reservation time far enough ahead to stay in the future.
pub const FUTURE_AT: &str = "2099-06-01T19:30:00Z";

pub fn setup_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn create_test_account(
    persistence: &mut Persistence,
    email: &str,
    role: Role,
    created_by: Option<i64>,
) -> AuthenticatedActor {
    let user: UserData = persistence
        .create_user(&NewUser {
            name: format!("Test {}", role.as_str()),
            email: Email::parse(email).expect("Valid test email"),
            password: TEST_PASSWORD.to_string(),
            role,
            created_by,
            phone: None,
        })
        .expect("Failed to create test account");
    AuthenticatedActor::from_user(&user)
}

pub fn create_test_admin(persistence: &mut Persistence) -> AuthenticatedActor {
    create_test_account(persistence, "admin@tablebook.test", Role::Admin, None)
}

pub fn create_test_supervisor(persistence: &mut Persistence, email: &str) -> AuthenticatedActor {
    create_test_account(persistence, email, Role::Supervisor, None)
}

pub fn create_test_customer(persistence: &mut Persistence, email: &str) -> AuthenticatedActor {
    create_test_account(persistence, email, Role::Customer, None)
}

pub fn create_test_restaurant(
    persistence: &mut Persistence,
    admin: &AuthenticatedActor,
    supervisor_id: i64,
    name: &str,
) -> RestaurantInfo {
    let request: CreateRestaurantRequest = CreateRestaurantRequest {
        name: name.to_string(),
        business_name: None,
        business_email: None,
        food_type: Some(String::from("bistro")),
        phone: None,
        description: None,
        capacity: 60,
        supervisor_id: Some(supervisor_id),
        supervisor_email: None,
        opening_time: Some(String::from("11:00")),
        closing_time: Some(String::from("23:00")),
        status: None,
        zones: vec![String::from("Terrace")],
    };
    create_restaurant(persistence, request, admin).expect("Failed to create test restaurant")
}

pub fn create_test_table(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    restaurant_id: i64,
    name: &str,
) -> TableInfo {
    let request: CreateTableRequest = CreateTableRequest {
        restaurant_id,
        zone_id: None,
        name: name.to_string(),
        capacity: 4,
        status: None,
    };
    create_table(persistence, request, actor).expect("Failed to create test table")
}

pub fn create_reservation_request(restaurant_id: i64, tables: Vec<i64>) -> CreateReservationRequest {
    CreateReservationRequest {
        restaurant_id,
        user_id: None,
        tables,
        reservation_at: FUTURE_AT.to_string(),
        party_size: Some(2),
        comment: None,
        status: None,
    }
}

/// A restaurant owned by a supervisor with two tables, plus a customer.
pub struct Venue {
    pub admin: AuthenticatedActor,
    pub supervisor: AuthenticatedActor,
    pub customer: AuthenticatedActor,
    pub restaurant: RestaurantInfo,
    pub first_table: TableInfo,
    pub second_table: TableInfo,
}

pub fn setup_test_venue(persistence: &mut Persistence) -> Venue {
    let admin: AuthenticatedActor = create_test_admin(persistence);
    let supervisor: AuthenticatedActor =
        create_test_supervisor(persistence, "host@tablebook.test");
    let customer: AuthenticatedActor = create_test_customer(persistence, "guest@tablebook.test");
    let restaurant: RestaurantInfo =
        create_test_restaurant(persistence, &admin, supervisor.user_id(), "Chez Test");
    let first_table: TableInfo =
        create_test_table(persistence, &supervisor, restaurant.restaurant_id, "T1");
    let second_table: TableInfo =
        create_test_table(persistence, &supervisor, restaurant.restaurant_id, "T2");
    Venue {
        admin,
        supervisor,
        customer,
        restaurant,
        first_table,
        second_table,
    }
}
